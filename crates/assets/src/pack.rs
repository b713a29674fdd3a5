//! Level pack format and the loader seam.
//!
//! A pack is a JSON document:
//! ```text
//! {
//!   "name": "Pack name",
//!   "levels": [
//!     { "name": "Level name", "rows": ["#####", "#@$.#", "#####"] }
//!   ]
//! }
//! ```
//!
//! Rows use XSB notation:
//! ```text
//! '#'          wall
//! ' ' '-' '_'  empty
//! '$'          container
//! '.'          plate
//! '*'          container on plate
//! '@'          player
//! '+'          player on plate
//! ```
//! Any other character becomes a glyph cell. Short rows are padded with
//! empty cells.

use pushbox_common::{Cell, GridPos, Level, LevelError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Bundled pack appended after all external packs.
pub const BUNDLED_LEVELS: &str = "levels.pack";
/// Bundled pack whose first level is the splash level.
pub const BUNDLED_MENU: &str = "menu.pack";

const BUNDLED_LEVELS_JSON: &str = include_str!("../packs/levels.pack");
const BUNDLED_MENU_JSON: &str = include_str!("../packs/menu.pack");

/// Errors from opening or decoding level packs.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open pack {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bundled pack not found: {0}")]
    BundledNotFound(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level {index} ({name:?}) is invalid: {source}")]
    InvalidLevel {
        index: usize,
        name: String,
        #[source]
        source: LevelError,
    },
    #[error("splash pack {0} contains no levels")]
    EmptySplashPack(String),
}

/// Serialized form of a pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackFile {
    #[serde(default)]
    pub name: String,
    pub levels: Vec<LevelRows>,
}

/// Serialized form of one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRows {
    #[serde(default)]
    pub name: String,
    pub rows: Vec<String>,
}

/// Source of level packs: opens named streams and decodes them.
pub trait PackLoader {
    /// Open an external pack, typically a file path.
    fn open_file(&self, name: &str) -> Result<Box<dyn Read + '_>, LoadError>;

    /// Open a pack compiled into the program.
    fn open_bundled(&self, name: &str) -> Result<Box<dyn Read + '_>, LoadError>;

    /// Decode a stream into levels, in stream order.
    fn load_pack(&self, reader: &mut dyn Read) -> Result<Vec<Level>, LoadError>;
}

/// Loader for JSON packs on disk, with the default bundled packs built in.
#[derive(Debug, Clone)]
pub struct JsonPackLoader {
    bundled: BTreeMap<String, Cow<'static, str>>,
}

impl Default for JsonPackLoader {
    fn default() -> Self {
        let mut bundled = BTreeMap::new();
        bundled.insert(BUNDLED_LEVELS.to_string(), Cow::Borrowed(BUNDLED_LEVELS_JSON));
        bundled.insert(BUNDLED_MENU.to_string(), Cow::Borrowed(BUNDLED_MENU_JSON));
        Self { bundled }
    }
}

impl JsonPackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace or add a bundled pack.
    pub fn with_bundled(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.bundled.insert(name.into(), Cow::Owned(json.into()));
        self
    }
}

impl PackLoader for JsonPackLoader {
    fn open_file(&self, name: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        let file = File::open(Path::new(name)).map_err(|source| LoadError::Open {
            name: name.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_bundled(&self, name: &str) -> Result<Box<dyn Read + '_>, LoadError> {
        let json = self
            .bundled
            .get(name)
            .ok_or_else(|| LoadError::BundledNotFound(name.to_string()))?;
        Ok(Box::new(json.as_bytes()))
    }

    fn load_pack(&self, reader: &mut dyn Read) -> Result<Vec<Level>, LoadError> {
        let pack: PackFile = serde_json::from_reader(reader)?;
        tracing::debug!(pack = %pack.name, levels = pack.levels.len(), "decoded pack");
        pack.levels
            .into_iter()
            .enumerate()
            .map(|(index, rows)| {
                level_from_rows(&rows.name, &rows.rows).map_err(|source| {
                    LoadError::InvalidLevel {
                        index,
                        name: rows.name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }
}

/// Build a level from XSB rows.
///
/// A level without a player starts it at the origin. If several players are
/// present the first one wins.
pub fn level_from_rows(name: &str, rows: &[impl AsRef<str>]) -> Result<Level, LevelError> {
    let width = rows
        .iter()
        .map(|r| r.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    let height = rows.len();

    let mut cells = Vec::with_capacity(width * height);
    let mut player: Option<GridPos> = None;

    for (y, row) in rows.iter().enumerate() {
        let mut count = 0;
        for (x, ch) in row.as_ref().chars().enumerate() {
            let pos = GridPos::new(x as u32, y as u32);
            let cell = match ch {
                '#' => Cell::Wall,
                ' ' | '-' | '_' => Cell::Empty,
                '$' => Cell::Container,
                '.' => Cell::Plate,
                '*' => Cell::ContainerOnPlate,
                '@' | '+' => {
                    if player.is_some() {
                        tracing::warn!(level = name, ?pos, "extra player start ignored");
                    } else {
                        player = Some(pos);
                    }
                    if ch == '+' { Cell::Plate } else { Cell::Empty }
                }
                other => Cell::glyph(other),
            };
            cells.push(cell);
            count += 1;
        }
        cells.extend(std::iter::repeat_n(Cell::Empty, width - count));
    }

    let player = player.unwrap_or_else(|| {
        tracing::debug!(level = name, "no player start, using origin");
        GridPos::ZERO
    });

    Level::new(
        name,
        GridPos::new(width as u32, height as u32),
        cells,
        player,
    )
}
