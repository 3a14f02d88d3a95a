//! Colors derived from a palette.
//!
//! The theming tool's raw output is not always legible: its cursor slot is
//! often the background, `color0` tends to vanish into the background, and
//! mid-tone accents can sit too close to it. The functions here pick and
//! adjust colors so they stay readable, driven by [`Thresholds`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::color::{
    Color, ColorError, adjust_brightness, best_contrast_candidate, blend, contrast_ratio,
    relative_luminance, shift,
};
use crate::config::Thresholds;
use crate::palette::{Appearance, Palette};

/// Brightness factor for de-emphasized text.
const MUTED_TEXT: f64 = 0.7;
/// Foreground weight in the hover color.
const HOVER_MIX: f64 = 0.1;
/// Accent weight in the selection color.
const SELECTION_MIX: f64 = 0.3;
/// Slot used as the primary accent.
const PRIMARY_ACCENT: usize = 4;

/// Chosen cursor color and how well it stands out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CursorChoice {
    /// The cursor color.
    pub color: Color,
    /// Contrast ratio of `color` against the background.
    pub contrast: f64,
}

/// Cursor candidates in priority order.
///
/// Foreground first, then the bright slots, then the regular slots that are
/// not too dark. `color0` never qualifies.
#[must_use]
pub fn cursor_candidates(palette: &Palette, thresholds: &Thresholds) -> Vec<Color> {
    let regular = palette
        .regular()
        .iter()
        .copied()
        .filter(|&c| relative_luminance(c) > thresholds.too_dark);

    std::iter::once(palette.foreground())
        .chain(palette.bright().iter().copied())
        .chain(regular)
        .collect()
}

/// Pick the cursor color with the best contrast against the background.
///
/// Only the regular slots are filtered for darkness (in
/// [`cursor_candidates`]); the foreground and bright slots always compete,
/// even pure black. The foreground is always a candidate and wins ties, so
/// a palette with nothing better still gets its foreground.
#[must_use]
pub fn smart_cursor(palette: &Palette, thresholds: &Thresholds) -> CursorChoice {
    let background = palette.background();
    let candidates = cursor_candidates(palette, thresholds);
    let color = best_contrast_candidate(&candidates, background, f64::NEG_INFINITY);

    CursorChoice {
        color,
        contrast: contrast_ratio(color, background),
    }
}

/// `color0`, lifted away from the background when the two are too similar.
///
/// On dark backgrounds every channel is raised by `color0_shift`, on light
/// ones lowered by it.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if `color0_shift` is not finite.
pub fn distinguishable_color0(palette: &Palette, thresholds: &Thresholds) -> Result<Color, ColorError> {
    let color0 = palette.colors()[0];
    let background = palette.background();
    let difference = (relative_luminance(color0) - relative_luminance(background)).abs();
    if difference >= thresholds.too_similar {
        return Ok(color0);
    }

    let delta = match palette.appearance(thresholds.dark_threshold) {
        Appearance::Dark => thresholds.color0_shift,
        Appearance::Light => -thresholds.color0_shift,
    };
    shift(color0, delta)
}

/// Palette slot `index` as an accent, adjusted when it is too close to the
/// background in luminance.
///
/// Indexes past the palette yield the foreground.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if the brightness factor is not finite.
pub fn accent(palette: &Palette, thresholds: &Thresholds, index: usize) -> Result<Color, ColorError> {
    let Some(color) = palette.color(index) else {
        return Ok(palette.foreground());
    };

    let background = palette.background();
    let difference = (relative_luminance(color) - relative_luminance(background)).abs();
    if difference >= thresholds.accent_similarity {
        return Ok(color);
    }

    let factor = if palette.appearance(thresholds.dark_threshold).is_dark() {
        thresholds.accent_brighten
    } else {
        thresholds.accent_darken
    };
    adjust_brightness(color, factor)
}

/// Everything derived from one palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scheme {
    /// Dark or light.
    pub appearance: Appearance,
    /// Background, unchanged.
    pub background: Color,
    /// Foreground, unchanged.
    pub foreground: Color,
    /// Cursor color cached by the theming tool, before any correction.
    pub original_cursor: Option<Color>,
    /// Most legible cursor color.
    pub cursor: CursorChoice,
    /// Color of text under the cursor.
    pub cursor_text: Color,
    /// `color0` made distinguishable from the background.
    pub color0: Color,
    /// Accents for `color1`..`color6`, keyed by slot name.
    pub accents: BTreeMap<String, Color>,
    /// De-emphasized text.
    pub muted_text: Color,
    /// Hovered element background.
    pub hover: Color,
    /// Selection background.
    pub selection: Color,
}

/// Derive a full scheme from `palette`.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if a threshold factor is not finite.
/// Thresholds that passed [`Thresholds::validate`] never fail.
pub fn derive_scheme(palette: &Palette, thresholds: &Thresholds) -> Result<Scheme, ColorError> {
    let background = palette.background();
    let foreground = palette.foreground();

    let accents = (1..=6)
        .map(|index| accent(palette, thresholds, index).map(|color| (format!("color{index}"), color)))
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let primary = accent(palette, thresholds, PRIMARY_ACCENT)?;

    Ok(Scheme {
        appearance: palette.appearance(thresholds.dark_threshold),
        background,
        foreground,
        original_cursor: palette.cursor(),
        cursor: smart_cursor(palette, thresholds),
        cursor_text: background,
        color0: distinguishable_color0(palette, thresholds)?,
        accents,
        muted_text: adjust_brightness(foreground, MUTED_TEXT)?,
        hover: blend(background, foreground, HOVER_MIX)?,
        selection: blend(background, primary, SELECTION_MIX)?,
    })
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "appearance: {}", self.appearance)?;
        writeln!(f, "background: {}", self.background)?;
        writeln!(f, "foreground: {}", self.foreground)?;
        if let Some(original) = self.original_cursor {
            writeln!(f, "original_cursor: {original}")?;
        }
        writeln!(
            f,
            "cursor: {} (contrast {:.2})",
            self.cursor.color, self.cursor.contrast
        )?;
        writeln!(f, "cursor_text: {}", self.cursor_text)?;
        writeln!(f, "color0: {}", self.color0)?;
        for (slot, color) in &self.accents {
            writeln!(f, "accent.{slot}: {color}")?;
        }
        writeln!(f, "muted_text: {}", self.muted_text)?;
        writeln!(f, "hover: {}", self.hover)?;
        write!(f, "selection: {}", self.selection)
    }
}
