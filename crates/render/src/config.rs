use crate::canvas::Rgba;

/// Colors used for the field background, the sprites, and glyph cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Field background and the empty-cell sprite.
    pub background: Rgba,
    pub wall: Rgba,
    pub wall_mortar: Rgba,
    pub container: Rgba,
    pub container_edge: Rgba,
    /// Cross drawn on a container that sits on a plate.
    pub container_marker: Rgba,
    pub plate: Rgba,
    pub plate_stripe: Rgba,
    pub player: Rgba,
    pub player_eye: Rgba,
    pub glyph: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(0, 0, 40),
            wall: Rgba::rgb(255, 0, 0),
            wall_mortar: Rgba::rgb(139, 0, 0),
            container: Rgba::rgb(184, 134, 11),
            container_edge: Rgba::rgb(255, 255, 0),
            container_marker: Rgba::rgb(255, 215, 0),
            plate: Rgba::rgb(0, 0, 0),
            plate_stripe: Rgba::rgb(255, 140, 0),
            player: Rgba::rgb(0, 0, 255),
            player_eye: Rgba::rgb(255, 255, 255),
            glyph: Rgba::rgb(255, 255, 255),
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Cell size to attach new renderers at. `None` leaves them detached
    /// until the host calls `resize`.
    pub cell_size: Option<u32>,
    pub palette: Palette,
}

impl RenderConfig {
    pub fn with_cell_size(cell_size: u32) -> Self {
        Self {
            cell_size: Some(cell_size),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_background_is_deep_blue() {
        assert_eq!(Palette::default().background, Rgba::rgb(0, 0, 40));
    }

    #[test]
    fn default_config_is_detached() {
        assert_eq!(RenderConfig::default().cell_size, None);
        assert_eq!(RenderConfig::with_cell_size(32).cell_size, Some(32));
    }
}
