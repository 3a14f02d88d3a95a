//! Palettes produced by the wallpaper theming tool.
//!
//! The tool caches its result as JSON with the 16 ANSI slots under `colors`
//! and the distinguished colors under `special`:
//!
//! ```json
//! {
//!   "special": { "background": "#1d2021", "foreground": "#ebdbb2", "cursor": "#ebdbb2" },
//!   "colors": { "color0": "#1d2021", "color1": "#cc241d", "...": "..." }
//! }
//! ```
//!
//! Extra keys (wallpaper path, alpha, ...) are ignored.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::{Color, hex_to_rgb_unit, relative_luminance};

/// Number of ANSI slots in a palette.
pub const SLOTS: usize = 16;

/// Whether a scheme is built on a dark or a light background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    /// Background luminance below the dark threshold.
    Dark,
    /// Background luminance at or above the dark threshold.
    Light,
}

impl Appearance {
    /// Classify a background color.
    ///
    /// # Returns
    ///
    /// - `Dark` if luminance < `dark_threshold`
    /// - `Light` otherwise
    #[must_use]
    pub fn of(background: Color, dark_threshold: f64) -> Self {
        if relative_luminance(background) < dark_threshold {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// `"dark"` or `"light"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// True for [`Appearance::Dark`].
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 16 ANSI colors plus background, foreground and an optional cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [Color; SLOTS],
    background: Color,
    foreground: Color,
    cursor: Option<Color>,
}

#[derive(Deserialize)]
struct RawPalette {
    special: RawSpecial,
    colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawSpecial {
    background: Color,
    foreground: Color,
    #[serde(default)]
    cursor: Option<Color>,
}

impl Palette {
    /// Assemble a palette from already parsed colors.
    #[must_use]
    pub const fn new(
        colors: [Color; SLOTS],
        background: Color,
        foreground: Color,
        cursor: Option<Color>,
    ) -> Self {
        Self {
            colors,
            background,
            foreground,
            cursor,
        }
    }

    /// Parse the theming tool's JSON cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a special color is not a
    /// valid hex color, a `colorN` slot holds an invalid color, or any of
    /// `color0`..`color15` is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPalette =
            serde_json::from_str(json).context("Failed to parse palette JSON")?;

        let slot_key = Regex::new(r"^color(0|[1-9]\d?)$").context("Failed to compile slot regex")?;
        let mut slots: [Option<Color>; SLOTS] = [None; SLOTS];

        for (key, value) in &raw.colors {
            let Some(index) = slot_key
                .captures(key)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .filter(|&index| index < SLOTS)
            else {
                continue;
            };
            let color = hex_to_rgb_unit(value).with_context(|| format!("Invalid {key}"))?;
            slots[index] = Some(color);
        }

        let missing: Vec<String> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| format!("color{index}"))
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!("Palette is missing {}", missing.join(", ")));
        }

        let colors = slots.map(|slot| slot.unwrap_or(Color::BLACK));
        Ok(Self::new(
            colors,
            raw.special.background,
            raw.special.foreground,
            raw.special.cursor,
        ))
    }

    /// All 16 slots in order.
    #[must_use]
    pub const fn colors(&self) -> &[Color; SLOTS] {
        &self.colors
    }

    /// Slot `index`, if it exists.
    #[must_use]
    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Regular colors `color1`..`color7`. `color0` is left out: it is
    /// usually the background or near it.
    #[must_use]
    pub fn regular(&self) -> &[Color] {
        &self.colors[1..8]
    }

    /// Bright colors `color8`..`color15`.
    #[must_use]
    pub fn bright(&self) -> &[Color] {
        &self.colors[8..SLOTS]
    }

    /// Background color.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Foreground color.
    #[must_use]
    pub const fn foreground(&self) -> Color {
        self.foreground
    }

    /// Cursor color as written by the theming tool, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<Color> {
        self.cursor
    }

    /// Dark or light, judged from the background.
    #[must_use]
    pub fn appearance(&self, dark_threshold: f64) -> Appearance {
        Appearance::of(self.background, dark_threshold)
    }
}
