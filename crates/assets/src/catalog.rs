use pushbox_common::Level;
use std::sync::Arc;

use crate::pack::{BUNDLED_LEVELS, BUNDLED_MENU, LoadError, PackLoader};

/// What follows a level in play order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextLevel {
    /// The catalog entry immediately after the queried level.
    Level(Arc<Level>),
    /// The queried level is the last entry.
    EndOfCatalog,
    /// The queried level is not part of the play sequence (for example the
    /// splash level, or a level from another catalog).
    NotInCatalog,
}

/// Ordered playable levels plus one splash level held apart from them.
///
/// Insertion order is play order.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<Arc<Level>>,
    splash: Option<Arc<Level>>,
}

impl LevelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level to the play sequence.
    pub fn push(&mut self, level: Level) -> Arc<Level> {
        let level = Arc::new(level);
        self.levels.push(Arc::clone(&level));
        level
    }

    /// Append levels to the play sequence, preserving their order.
    pub fn extend(&mut self, levels: impl IntoIterator<Item = Level>) {
        self.levels.extend(levels.into_iter().map(Arc::new));
    }

    pub fn set_splash(&mut self, level: Level) -> Arc<Level> {
        let level = Arc::new(level);
        self.splash = Some(Arc::clone(&level));
        level
    }

    pub fn splash(&self) -> Option<&Arc<Level>> {
        self.splash.as_ref()
    }

    /// Playable levels in play order.
    pub fn levels(&self) -> &[Arc<Level>] {
        &self.levels
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Level>> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Position of `level` in play order, by identity.
    pub fn position(&self, level: &Level) -> Option<usize> {
        self.levels.iter().position(|l| l.id() == level.id())
    }

    /// The level that follows `level` in play order.
    pub fn next_after(&self, level: &Level) -> NextLevel {
        match self.position(level) {
            None => NextLevel::NotInCatalog,
            Some(i) => match self.levels.get(i + 1) {
                Some(next) => NextLevel::Level(Arc::clone(next)),
                None => NextLevel::EndOfCatalog,
            },
        }
    }

    /// Populate the catalog from packs.
    ///
    /// External `sources` come first, in order, followed by the bundled level
    /// pack. The first level of the bundled menu pack becomes the splash
    /// level. Nothing is added unless every pack loads.
    pub fn load<S: AsRef<str>>(
        &mut self,
        loader: &dyn PackLoader,
        sources: &[S],
    ) -> Result<(), LoadError> {
        let mut loaded = Vec::new();

        for name in sources {
            let name = name.as_ref();
            let mut reader = loader.open_file(name)?;
            let levels = loader.load_pack(&mut reader)?;
            tracing::info!(pack = name, levels = levels.len(), "loaded external pack");
            loaded.extend(levels);
        }

        let mut reader = loader.open_bundled(BUNDLED_LEVELS)?;
        let bundled = loader.load_pack(&mut reader)?;
        tracing::info!(pack = BUNDLED_LEVELS, levels = bundled.len(), "loaded bundled pack");
        loaded.extend(bundled);

        let mut reader = loader.open_bundled(BUNDLED_MENU)?;
        let splash = loader
            .load_pack(&mut reader)?
            .into_iter()
            .next()
            .ok_or_else(|| LoadError::EmptySplashPack(BUNDLED_MENU.to_string()))?;

        self.extend(loaded);
        self.set_splash(splash);
        Ok(())
    }
}
