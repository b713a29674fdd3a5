use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Grid coordinate or grid size, in cells. `x` is the column, `y` the row.
pub type GridPos = glam::UVec2;

/// Unique identifier for a loaded level.
///
/// Two levels with identical layouts are still distinct entries in a catalog;
/// lookups compare ids, never contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(pub Uuid);

impl LevelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single grid cell.
///
/// The five named states cover the game itself. Anything else arrives as a
/// raw byte code: printable codes become [`Cell::Glyph`] and are drawn as a
/// literal character, the rest become [`Cell::Unrenderable`] and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Container,
    Plate,
    ContainerOnPlate,
    /// Diagnostic or decorative character (menu titles, markers).
    Glyph(char),
    /// Reserved or out-of-range code. Never drawn.
    Unrenderable(u8),
}

impl Cell {
    /// Byte codes that decode to [`Cell::Glyph`].
    pub const GLYPH_CODES: RangeInclusive<u8> = 8..=254;

    /// Decode a byte code. Never fails: unknown codes map to `Glyph` or
    /// `Unrenderable`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Empty,
            1 => Self::Wall,
            2 => Self::Container,
            3 => Self::Plate,
            4 => Self::ContainerOnPlate,
            c if Self::GLYPH_CODES.contains(&c) => Self::Glyph(char::from(c)),
            c => Self::Unrenderable(c),
        }
    }

    /// Build a glyph cell, falling back to `Unrenderable` for characters
    /// outside the glyph code range.
    pub fn glyph(ch: char) -> Self {
        match u8::try_from(ch) {
            Ok(code) if Self::GLYPH_CODES.contains(&code) => Self::Glyph(ch),
            Ok(code) => Self::Unrenderable(code),
            Err(_) => Self::Unrenderable(u8::MAX),
        }
    }

    /// Byte code of this cell; inverse of [`Cell::from_code`].
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Container => 2,
            Self::Plate => 3,
            Self::ContainerOnPlate => 4,
            Self::Glyph(ch) => u8::try_from(ch).unwrap_or(u8::MAX),
            Self::Unrenderable(code) => code,
        }
    }

    /// True for cells holding a container, on a plate or not.
    pub fn has_container(self) -> bool {
        matches!(self, Self::Container | Self::ContainerOnPlate)
    }

    /// True for target cells, covered or not.
    pub fn has_plate(self) -> bool {
        matches!(self, Self::Plate | Self::ContainerOnPlate)
    }
}
