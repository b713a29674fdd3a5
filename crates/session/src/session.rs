use pushbox_assets::{LevelCatalog, LoadError, NextLevel, PackLoader};
use pushbox_common::Level;
use pushbox_kernel::{Board, Logic};
use pushbox_render::{FieldRenderer, RenderConfig, RenderError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::format_elapsed;

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no splash level loaded")]
    NoSplashLevel,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The level being played, with the logic and renderer built for it.
#[derive(Debug)]
pub struct ActiveGame<L> {
    level: Arc<Level>,
    logic: L,
    renderer: FieldRenderer,
    started_at: Instant,
    is_splash: bool,
}

impl<L: Logic> ActiveGame<L> {
    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn renderer(&self) -> &FieldRenderer {
        &self.renderer
    }

    pub fn is_splash(&self) -> bool {
        self.is_splash
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Owns the level catalog and the game currently being played.
///
/// A host constructs one session and drives it from its UI loop: start a
/// level, forward simulation steps through [`Session::logic_mut`], call
/// [`Session::update`] to redraw what changed, and present
/// [`Session::renderer`]'s canvas.
#[derive(Debug)]
pub struct Session<L = Board> {
    catalog: LevelCatalog,
    config: RenderConfig,
    game: Option<ActiveGame<L>>,
}

impl<L: Logic> Session<L> {
    /// Session with an empty catalog.
    pub fn new(config: RenderConfig) -> Self {
        Self::with_catalog(LevelCatalog::new(), config)
    }

    pub fn with_catalog(catalog: LevelCatalog, config: RenderConfig) -> Self {
        Self {
            catalog,
            config,
            game: None,
        }
    }

    /// Append external packs, then the bundled packs, to the catalog.
    pub fn load<S: AsRef<str>>(
        &mut self,
        loader: &dyn PackLoader,
        sources: &[S],
    ) -> Result<(), SessionError> {
        self.catalog.load(loader, sources)?;
        tracing::info!(levels = self.catalog.len(), "catalog loaded");
        Ok(())
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Start a playable level.
    pub fn start(&mut self, level: Arc<Level>) -> Result<(), SessionError> {
        self.start_level(level, false)
    }

    /// Start the splash level.
    pub fn start_splash_level(&mut self) -> Result<(), SessionError> {
        let splash = self
            .catalog
            .splash()
            .cloned()
            .ok_or(SessionError::NoSplashLevel)?;
        self.start_level(splash, true)
    }

    /// Start the level after `current` in play order, or the splash level if
    /// there is none.
    pub fn start_next_level(&mut self, current: &Level) -> Result<(), SessionError> {
        match self.catalog.next_after(current) {
            NextLevel::Level(next) => self.start(next),
            NextLevel::EndOfCatalog => {
                tracing::info!(level = current.name(), "last level finished");
                self.start_splash_level()
            }
            NextLevel::NotInCatalog => {
                tracing::warn!(
                    level = current.name(),
                    "level not in catalog, falling back to splash"
                );
                self.start_splash_level()
            }
        }
    }

    /// Start whatever follows the active level. With no active game this
    /// starts the splash level.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        match self.game.as_ref().map(|g| Arc::clone(&g.level)) {
            Some(current) => self.start_next_level(&current),
            None => self.start_splash_level(),
        }
    }

    fn start_level(&mut self, level: Arc<Level>, is_splash: bool) -> Result<(), SessionError> {
        self.shutdown();

        let logic = L::from_level(Arc::clone(&level));
        let renderer = FieldRenderer::with_palette(logic.dimensions(), self.config.palette);
        tracing::info!(level = level.name(), is_splash, "level started");

        self.game = Some(ActiveGame {
            level,
            logic,
            renderer,
            started_at: Instant::now(),
            is_splash,
        });

        match self.config.cell_size {
            Some(cell_size) => self.attach(cell_size),
            None => Ok(()),
        }
    }

    /// Set the cell size for the active renderer and every later one, then
    /// redraw the whole field.
    pub fn resize(&mut self, cell_size: u32) -> Result<(), SessionError> {
        self.config.cell_size = Some(cell_size);
        self.attach(cell_size)
    }

    fn attach(&mut self, cell_size: u32) -> Result<(), SessionError> {
        let Some(game) = self.game.as_mut() else {
            return Ok(());
        };
        game.renderer.resize(cell_size)?;
        game.renderer.draw_field(&game.logic);
        Ok(())
    }

    /// Redraw the cells the logic reports as changed, plus the player.
    /// Returns the number of cells redrawn.
    pub fn update(&mut self) -> usize {
        match self.game.as_mut() {
            Some(game) => game.renderer.update_cells(&mut game.logic, true),
            None => 0,
        }
    }

    /// Repaint the whole field.
    pub fn redraw(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.renderer.draw_field(&game.logic);
        }
    }

    pub fn game(&self) -> Option<&ActiveGame<L>> {
        self.game.as_ref()
    }

    pub fn active_level(&self) -> Option<&Arc<Level>> {
        self.game.as_ref().map(|g| &g.level)
    }

    pub fn is_splash_level(&self) -> bool {
        self.game.as_ref().is_some_and(|g| g.is_splash)
    }

    pub fn logic(&self) -> Option<&L> {
        self.game.as_ref().map(|g| &g.logic)
    }

    /// Mutable logic, for the rules engine to apply moves.
    pub fn logic_mut(&mut self) -> Option<&mut L> {
        self.game.as_mut().map(|g| &mut g.logic)
    }

    pub fn renderer(&self) -> Option<&FieldRenderer> {
        self.game.as_ref().map(|g| &g.renderer)
    }

    /// Time since the active level started; zero with no active level.
    pub fn elapsed(&self) -> Duration {
        self.game.as_ref().map(ActiveGame::elapsed).unwrap_or_default()
    }

    /// Elapsed play time as `[Dd ]H:MM:SS`.
    pub fn elapsed_time_long_string(&self) -> String {
        format_elapsed(self.elapsed())
    }
}

impl<L> Session<L> {
    /// End the active game, releasing its render surface.
    pub fn shutdown(&mut self) {
        if let Some(mut game) = self.game.take() {
            game.renderer.release();
            tracing::debug!(level = game.level.name(), "game ended");
        }
    }
}

impl<L> Drop for Session<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
