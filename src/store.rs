//! Where palettes are read from.
//!
//! Reading goes through [`PaletteStore`] so the derivation code never touches
//! fixed filesystem paths.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::logs::debug;
use crate::palette::Palette;

/// Source of a palette cache document.
pub trait PaletteStore {
    /// Read the raw JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn read_palette(&self) -> Result<String>;

    /// Human readable location, for messages.
    fn describe(&self) -> String;
}

/// Palette cache stored in a file.
#[derive(Debug, Clone)]
pub struct FsStore {
    path: PathBuf,
}

impl FsStore {
    /// Store reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PaletteStore for FsStore {
    fn read_palette(&self) -> Result<String> {
        fs::read_to_string(&self.path).with_context(|| {
            format!(
                "No palette found at {}; run the theming tool first",
                self.path.display()
            )
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Palette cache held in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    json: String,
}

impl MemoryStore {
    /// Store returning `json` verbatim.
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl PaletteStore for MemoryStore {
    fn read_palette(&self) -> Result<String> {
        Ok(self.json.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Read and parse a palette from `store`.
///
/// # Errors
///
/// Returns an error if the store cannot be read or its content is not a
/// complete palette.
pub fn load_palette(store: &dyn PaletteStore) -> Result<Palette> {
    let location = store.describe();
    debug(&format!("palette source={location}"));

    let json = store.read_palette()?;
    Palette::from_json(&json).with_context(|| format!("Failed to load palette from {location}"))
}
