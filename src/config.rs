//! Tunable thresholds and palette location.
//!
//! The thresholds used to judge colors as "too dark" or "too similar" are
//! empirical, so they live here with their usual defaults instead of being
//! scattered through the derivation code.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Environment variable naming the color cache directory.
pub const CACHE_DIR_ENV: &str = "WAL_CACHE_DIR";

/// File name of the palette inside the cache directory.
pub const COLORS_FILE: &str = "colors.json";

/// Thresholds and factors used when deriving a scheme from a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Regular palette slots at or below this luminance are never cursor candidates.
    pub too_dark: f64,
    /// color0 is lifted away from the background when their luminance
    /// difference is below this.
    pub too_similar: f64,
    /// Backgrounds with luminance below this are dark.
    pub dark_threshold: f64,
    /// Accents closer than this in luminance to the background get adjusted.
    pub accent_similarity: f64,
    /// Brightness factor applied to weak accents on dark backgrounds.
    pub accent_brighten: f64,
    /// Brightness factor applied to weak accents on light backgrounds.
    pub accent_darken: f64,
    /// Per-channel shift applied to color0 when it blends into the background.
    pub color0_shift: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            too_dark: 0.1,
            too_similar: 0.1,
            dark_threshold: 0.5,
            accent_similarity: 0.3,
            accent_brighten: 1.2,
            accent_darken: 0.8,
            color0_shift: 0.2,
        }
    }
}

impl Thresholds {
    /// Check that every value is usable.
    ///
    /// Luminance thresholds must lie in `[0, 1]`, the color0 shift too, and
    /// brightness factors must be finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("too_dark", self.too_dark),
            ("too_similar", self.too_similar),
            ("dark_threshold", self.dark_threshold),
            ("accent_similarity", self.accent_similarity),
            ("color0_shift", self.color0_shift),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{name} must be between 0 and 1, got {value}"));
            }
        }

        for (name, value) in [
            ("accent_brighten", self.accent_brighten),
            ("accent_darken", self.accent_darken),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!("{name} must be a finite, non-negative factor, got {value}"));
            }
        }

        Ok(())
    }
}

/// Decide where the palette cache lives.
///
/// Precedence: an explicit path, then `$WAL_CACHE_DIR/colors.json`, then
/// `~/.cache/wal/colors.json`. Inputs are passed in so the caller decides
/// where they come from.
///
/// # Errors
///
/// Returns an error when no explicit path or cache directory is given and
/// the home directory is unknown.
pub fn resolve_colors_path(
    explicit: Option<&Path>,
    cache_dir: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = cache_dir.filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir).join(COLORS_FILE));
    }

    let home = home.context("Cannot locate the home directory; pass --colors")?;
    Ok(home.join(".cache").join("wal").join(COLORS_FILE))
}

/// [`resolve_colors_path`] fed from the process environment.
///
/// # Errors
///
/// See [`resolve_colors_path`].
pub fn colors_path_from_env(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_colors_path(
        explicit,
        std::env::var_os(CACHE_DIR_ENV),
        dirs::home_dir(),
    )
}
