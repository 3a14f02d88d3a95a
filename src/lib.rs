//! Legible colors from a wallpaper-generated palette.
//!
//! Wallpaper theming tools cache a 16-color palette plus background and
//! foreground. This library loads that palette and derives colors that stay
//! readable against the background: a cursor color, a `color0` that does not
//! vanish, and accents with enough contrast.
//!
//! The math lives in [`color`]; [`scheme`] applies it to a [`Palette`].

pub mod color;
pub mod config;
pub mod logs;
pub mod palette;
pub mod scheme;
pub mod store;

use anyhow::{Context, Result};

pub use color::{Color, ColorError, Rgb};
pub use config::Thresholds;
pub use palette::{Appearance, Palette};
pub use scheme::{CursorChoice, Scheme};
pub use store::{FsStore, MemoryStore, PaletteStore};

use logs::debug;

/// Load a palette from `store` and derive its scheme.
///
/// This function orchestrates the whole process:
/// 1. Validate the thresholds
/// 2. Read and parse the palette
/// 3. Derive cursor, `color0`, accents and UI colors
///
/// # Errors
///
/// Returns an error if:
/// - A threshold is out of range
/// - The palette cannot be read or is incomplete
/// - A color computation rejects its input (only possible with thresholds
///   that skipped validation)
pub fn load_scheme(store: &dyn PaletteStore, thresholds: &Thresholds) -> Result<Scheme> {
    thresholds.validate().context("Invalid thresholds")?;
    debug(&format!("thresholds={thresholds:?}"));

    let palette = store::load_palette(store)?;
    debug(&format!(
        "background={} foreground={}",
        palette.background(),
        palette.foreground()
    ));

    let scheme = scheme::derive_scheme(&palette, thresholds).context("Failed to derive colors")?;
    debug(&format!(
        "appearance={} cursor={} contrast={:.2}",
        scheme.appearance, scheme.cursor.color, scheme.cursor.contrast
    ));

    Ok(scheme)
}
