//! Color conversion and contrast utilities.
//!
//! This module provides functions for:
//! - Parsing and formatting 6-digit hex colors
//! - Converting between 8-bit display values and unit computation values
//! - Calculating relative luminance and contrast ratios for accessibility
//! - Adjusting brightness, blending, and picking the most legible candidate
//!
//! Two representations are used throughout the crate. [`Rgb`] holds the
//! 8-bit display form found in color caches and config files, while [`Color`]
//! holds unit channels in `[0, 1]` and is the only form the math accepts.
//! Luminance is never computed on 8-bit values directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Default luminance floor for [`best_contrast_candidate`].
///
/// Only pure black sits at or below it, so every other color is eligible.
pub const DEFAULT_MIN_LUMINANCE: f64 = 0.0;

/// Unit channel value at or below which sRGB linearization is linear.
const LINEAR_THRESHOLD: f64 = 0.03928;

/// Errors produced by color parsing and color arithmetic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// The input is not exactly 6 hex digits, optionally prefixed with `#`.
    #[error("invalid hex color {input:?}: expected 6 hex digits, optionally prefixed with '#'")]
    InvalidFormat {
        /// The rejected input, as given.
        input: String,
    },
    /// A numeric argument is non-finite or outside its valid range.
    #[error("{name} is out of range: {value}")]
    OutOfRange {
        /// Name of the offending argument.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// 8-bit RGB color, the display form used by color caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color from individual components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Render as 6 lowercase hex digits, without a `#` prefix.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to the unit form used for color math.
    #[must_use]
    pub fn to_unit(self) -> Color {
        Color {
            r: f64::from(self.r) / 255.0,
            g: f64::from(self.g) / 255.0,
            b: f64::from(self.b) / 255.0,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_unit()
    }
}

/// RGB color with unit channels in `[0, 1]`.
///
/// Channels are private so the range invariant always holds: constructors
/// validate, and every arithmetic helper clamps its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Pure white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a color from unit channels.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::OutOfRange`] if any channel is non-finite or
    /// outside `[0, 1]`. Passing 8-bit values such as `255.0` is the usual
    /// way to hit this; convert through [`Rgb`] instead.
    pub fn new(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        Ok(Self {
            r: unit_channel("red", r)?,
            g: unit_channel("green", g)?,
            b: unit_channel("blue", b)?,
        })
    }

    /// Build a color from arbitrary finite channels, clamping each to `[0, 1]`.
    fn clamped(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Red channel in `[0, 1]`.
    #[must_use]
    pub const fn r(self) -> f64 {
        self.r
    }

    /// Green channel in `[0, 1]`.
    #[must_use]
    pub const fn g(self) -> f64 {
        self.g
    }

    /// Blue channel in `[0, 1]`.
    #[must_use]
    pub const fn b(self) -> f64 {
        self.b
    }

    /// Quantize to the 8-bit display form, rounding to the nearest integer.
    #[must_use]
    pub fn to_rgb8(self) -> Rgb {
        Rgb::new(quantize(self.r), quantize(self.g), quantize(self.b))
    }

    /// Apply `f` to every channel and clamp the result.
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::clamped(f(self.r), f(self.g), f(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", rgb_to_hex(*self))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb_unit(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex_to_rgb_unit(&hex).map_err(serde::de::Error::custom)
    }
}

fn unit_channel(name: &'static str, value: f64) -> Result<f64, ColorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ColorError::OutOfRange { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, ColorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ColorError::OutOfRange { name, value })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parse a hex color into its 8-bit form.
///
/// Accepts exactly 6 hex digits, optionally prefixed with `#`. Digit case is
/// not significant. Whitespace is not stripped.
///
/// # Errors
///
/// Returns [`ColorError::InvalidFormat`] for any other input, including the
/// 3-digit shorthand and 8-digit colors with alpha.
///
/// # Examples
///
/// ```
/// # use walkit::color::{Rgb, hex_to_rgb255};
/// assert_eq!(hex_to_rgb255("#ff8000").unwrap(), Rgb::new(255, 128, 0));
/// assert_eq!(hex_to_rgb255("AbC123").unwrap(), Rgb::new(171, 193, 35));
/// assert!(hex_to_rgb255("#f80").is_err());
/// ```
pub fn hex_to_rgb255(hex: &str) -> Result<Rgb, ColorError> {
    let invalid = || ColorError::InvalidFormat {
        input: hex.to_string(),
    };

    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| invalid());
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Parse a hex color into its unit form.
///
/// # Errors
///
/// Returns [`ColorError::InvalidFormat`] under the same rules as
/// [`hex_to_rgb255`].
pub fn hex_to_rgb_unit(hex: &str) -> Result<Color, ColorError> {
    hex_to_rgb255(hex).map(Rgb::to_unit)
}

/// Render a color as 6 lowercase hex digits, without a `#` prefix.
///
/// Each channel is rounded to the nearest 8-bit value.
#[must_use]
pub fn rgb_to_hex(color: Color) -> String {
    color.to_rgb8().to_hex()
}

/// Calculate relative luminance of a color using the sRGB formula.
///
/// Each unit channel is linearized (`c / 12.92` up to 0.03928, otherwise
/// `((c + 0.055) / 1.055)^2.4`) and weighted:
///
/// L = 0.2126 × R + 0.7152 × G + 0.0722 × B
///
/// # Returns
///
/// Relative luminance between 0.0 (black) and 1.0 (white).
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    let lin = |c: f64| -> f64 {
        if c <= LINEAR_THRESHOLD {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };

    0.2126f64.mul_add(lin(color.r), 0.7152f64.mul_add(lin(color.g), 0.0722 * lin(color.b)))
}

/// Compute the contrast ratio between two colors.
///
/// `(L_lighter + 0.05) / (L_darker + 0.05)`, always in `[1.0, 21.0]` and
/// independent of argument order.
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Scale every channel by `factor`, clamping to `[0, 1]`.
///
/// Factors above 1 brighten, factors below 1 darken.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if `factor` is NaN or infinite.
pub fn adjust_brightness(color: Color, factor: f64) -> Result<Color, ColorError> {
    let factor = finite("factor", factor)?;
    Ok(color.map(|c| c * factor))
}

/// Add `delta` to every channel, clamping to `[0, 1]`.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if `delta` is NaN or infinite.
pub fn shift(color: Color, delta: f64) -> Result<Color, ColorError> {
    let delta = finite("delta", delta)?;
    Ok(color.map(|c| c + delta))
}

/// Linearly interpolate from `a` to `b`.
///
/// A `ratio` of 0 yields `a` and 1 yields `b`. Ratios outside `[0, 1]`
/// extrapolate; the result is still clamped to the valid channel range.
///
/// # Errors
///
/// Returns [`ColorError::OutOfRange`] if `ratio` is NaN or infinite.
pub fn blend(a: Color, b: Color, ratio: f64) -> Result<Color, ColorError> {
    let ratio = finite("ratio", ratio)?;
    let mix = |x: f64, y: f64| x * (1.0 - ratio) + y * ratio;
    Ok(Color::clamped(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b)))
}

/// Pick the candidate with the highest contrast against `reference`.
///
/// Candidates whose luminance is not strictly above `min_luminance` are
/// skipped. Among the rest the strictly greatest contrast ratio wins, so on
/// a tie the earlier candidate is kept and callers can encode priority in
/// the order. When nothing is eligible, `reference` itself is returned; its
/// self-contrast of 1.0 tells the caller no usable candidate was found.
///
/// # Examples
///
/// ```
/// # use walkit::color::{Color, best_contrast_candidate, hex_to_rgb_unit, DEFAULT_MIN_LUMINANCE};
/// let candidates = ["#333333", "#eeeeee", "#888888"]
///     .map(|hex| hex_to_rgb_unit(hex).unwrap());
/// let best = best_contrast_candidate(&candidates, Color::BLACK, DEFAULT_MIN_LUMINANCE);
/// assert_eq!(best.to_string(), "#eeeeee");
/// ```
#[must_use]
pub fn best_contrast_candidate(candidates: &[Color], reference: Color, min_luminance: f64) -> Color {
    candidates
        .iter()
        .copied()
        .filter(|&candidate| relative_luminance(candidate) > min_luminance)
        .fold(None, |best: Option<(Color, f64)>, candidate| {
            let ratio = contrast_ratio(candidate, reference);
            match best {
                Some((_, best_ratio)) if ratio <= best_ratio => best,
                _ => Some((candidate, ratio)),
            }
        })
        .map_or(reference, |(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn hex(s: &str) -> Color {
        hex_to_rgb_unit(s).expect("valid test color")
    }

    #[test]
    fn test_hex_to_rgb255() -> Result<()> {
        assert_eq!(hex_to_rgb255("#000000")?, Rgb::new(0, 0, 0));
        assert_eq!(hex_to_rgb255("#ff0000")?, Rgb::new(255, 0, 0));
        assert_eq!(hex_to_rgb255("00ff00")?, Rgb::new(0, 255, 0));
        assert_eq!(hex_to_rgb255("#AbC123")?, Rgb::new(171, 193, 35));
        assert_eq!(hex_to_rgb255("#001122")?, Rgb::new(0, 17, 34));

        assert!(hex_to_rgb255("#gg0000").is_err());
        assert!(hex_to_rgb255("#f00").is_err());
        assert!(hex_to_rgb255("#ff0000ff").is_err());
        assert!(hex_to_rgb255("##ff0000").is_err());
        assert!(hex_to_rgb255("+f0000").is_err());
        assert!(hex_to_rgb255("").is_err());
        assert!(hex_to_rgb255("ééé").is_err());

        // Padding is not part of a hex color.
        assert!(hex_to_rgb255("  #001122  ").is_err());
        assert_eq!(
            hex_to_rgb255(" #ffffff\n"),
            Err(ColorError::InvalidFormat {
                input: " #ffffff\n".to_string()
            })
        );
        assert!(hex_to_rgb255("ffffff ").is_err());
        assert!(hex_to_rgb255("# ffffff").is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_format_keeps_input() {
        assert_eq!(
            hex_to_rgb255("#12345"),
            Err(ColorError::InvalidFormat {
                input: "#12345".to_string()
            })
        );
    }

    #[test]
    fn test_hex_round_trip() -> Result<()> {
        for h in ["000000", "ffffff", "0a1b2c", "7f8081", "c0ffee", "fe01fe"] {
            assert_eq!(rgb_to_hex(hex_to_rgb_unit(h)?), h);
            assert_eq!(hex_to_rgb255(h)?.to_hex(), h);
        }
        for v in 0..=255u8 {
            let h = format!("{v:02x}{:02x}{:02x}", 255 - v, v / 3);
            assert_eq!(rgb_to_hex(hex_to_rgb_unit(&h)?), h);
        }
        Ok(())
    }

    #[test]
    fn test_rgb_to_hex_rounds_to_nearest() -> Result<()> {
        assert_eq!(rgb_to_hex(Color::new(0.5, 0.5, 0.5)?), "808080");
        assert_eq!(rgb_to_hex(Color::new(0.001, 0.999, 0.0)?), "00ff00");
        assert_eq!(Color::WHITE.to_string(), "#ffffff");
        Ok(())
    }

    #[test]
    fn test_color_new_rejects_out_of_range() {
        assert!(Color::new(0.0, 0.5, 1.0).is_ok());
        assert!(matches!(
            Color::new(255.0, 0.0, 0.0),
            Err(ColorError::OutOfRange { name: "red", .. })
        ));
        assert!(Color::new(0.0, -0.1, 0.0).is_err());
        assert!(Color::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_luminance() {
        assert!(approx_eq(relative_luminance(hex("#000000")), 0.0, 1e-12));
        assert!(approx_eq(relative_luminance(hex("#ffffff")), 1.0, 1e-6));
        assert!(approx_eq(relative_luminance(hex("#ff0000")), 0.2126, 1e-6));
        assert!(approx_eq(relative_luminance(hex("#00ff00")), 0.7152, 1e-6));
        assert!(approx_eq(relative_luminance(hex("#0000ff")), 0.0722, 1e-6));

        let mid_gray = relative_luminance(hex("#808080"));
        assert!(mid_gray > 0.2 && mid_gray < 0.23, "mid gray: {mid_gray}");

        assert!(relative_luminance(hex("#020202")) > relative_luminance(hex("#010101")));
    }

    #[test]
    fn test_luminance_linear_segment() -> Result<()> {
        let at_threshold = Color::new(LINEAR_THRESHOLD, LINEAR_THRESHOLD, LINEAR_THRESHOLD)?;
        assert!(approx_eq(
            relative_luminance(at_threshold),
            LINEAR_THRESHOLD / 12.92,
            1e-12
        ));
        Ok(())
    }

    #[test]
    fn test_luminance_needs_unit_channels() {
        // 8-bit values must go through Rgb, never straight into Color.
        assert!(Color::new(255.0, 255.0, 255.0).is_err());
        let red: Color = Rgb::new(255, 0, 0).into();
        assert!(approx_eq(relative_luminance(red), 0.2126, 1e-6));
    }

    #[test]
    fn test_contrast_ratio() {
        assert!(approx_eq(contrast_ratio(Color::BLACK, Color::WHITE), 21.0, 1e-3));
        assert!(approx_eq(
            contrast_ratio(hex("#000000"), hex("#ffffff")),
            21.0,
            1e-3
        ));

        for c in ["#000000", "#ffffff", "#3b4252", "#ebcb8b", "#808080"] {
            assert!(approx_eq(contrast_ratio(hex(c), hex(c)), 1.0, 1e-12));
        }

        let pairs = [
            ("#1d2021", "#ebdbb2"),
            ("#ff0000", "#00ff00"),
            ("#0a0a0a", "#0b0b0b"),
        ];
        for (a, b) in pairs {
            let ab = contrast_ratio(hex(a), hex(b));
            assert!(approx_eq(ab, contrast_ratio(hex(b), hex(a)), 1e-12));
            assert!(ab >= 1.0);
        }
    }

    #[test]
    fn test_adjust_brightness() -> Result<()> {
        let c = hex("#3b4252");
        assert_eq!(adjust_brightness(c, 1.0)?, c);
        assert_eq!(adjust_brightness(c, 0.0)?, Color::BLACK);
        assert_eq!(adjust_brightness(c, -2.0)?, Color::BLACK);

        let bright = adjust_brightness(Color::new(0.6, 0.4, 0.2)?, 2.0)?;
        assert!(approx_eq(bright.r(), 1.0, 1e-12));
        assert!(approx_eq(bright.g(), 0.8, 1e-12));
        assert!(approx_eq(bright.b(), 0.4, 1e-12));

        assert!(matches!(
            adjust_brightness(c, f64::NAN),
            Err(ColorError::OutOfRange { name: "factor", .. })
        ));
        assert!(adjust_brightness(c, f64::INFINITY).is_err());
        Ok(())
    }

    #[test]
    fn test_shift() -> Result<()> {
        assert_eq!(rgb_to_hex(shift(hex("#1d2021"), 0.2)?), "505354");
        assert_eq!(rgb_to_hex(shift(hex("#f5f5f5"), -0.2)?), "c2c2c2");
        assert_eq!(shift(hex("#f0f0f0"), 0.5)?, Color::WHITE);
        assert_eq!(shift(hex("#101010"), -0.5)?, Color::BLACK);
        assert!(shift(Color::BLACK, f64::NAN).is_err());
        Ok(())
    }

    #[test]
    fn test_blend() -> Result<()> {
        let a = hex("#1d2021");
        let b = hex("#ebdbb2");
        assert_eq!(blend(a, b, 0.0)?, a);
        assert_eq!(blend(a, b, 1.0)?, b);
        assert_eq!(rgb_to_hex(blend(Color::BLACK, Color::WHITE, 0.5)?), "808080");
        Ok(())
    }

    #[test]
    fn test_blend_extrapolates_and_clamps() -> Result<()> {
        assert_eq!(blend(Color::BLACK, Color::WHITE, 1.5)?, Color::WHITE);
        assert_eq!(blend(Color::BLACK, Color::WHITE, -1.0)?, Color::BLACK);

        let gray = Color::new(0.5, 0.5, 0.5)?;
        let past = blend(Color::BLACK, gray, 1.5)?;
        assert!(approx_eq(past.r(), 0.75, 1e-12));

        assert!(matches!(
            blend(Color::BLACK, Color::WHITE, f64::NAN),
            Err(ColorError::OutOfRange { name: "ratio", .. })
        ));
        assert!(blend(Color::BLACK, Color::WHITE, f64::NEG_INFINITY).is_err());
        Ok(())
    }

    #[test]
    fn test_best_contrast_candidate() {
        let reference = hex("#000000");
        assert_eq!(
            best_contrast_candidate(&[], reference, DEFAULT_MIN_LUMINANCE),
            reference
        );

        let candidates = [hex("#333333"), hex("#eeeeee"), hex("#888888")];
        let best = best_contrast_candidate(&candidates, reference, DEFAULT_MIN_LUMINANCE);
        assert_eq!(rgb_to_hex(best), "eeeeee");

        // Against white the darkest eligible candidate wins.
        let best = best_contrast_candidate(&candidates, Color::WHITE, DEFAULT_MIN_LUMINANCE);
        assert_eq!(rgb_to_hex(best), "333333");
    }

    #[test]
    fn test_best_contrast_candidate_filters_dark() {
        let candidates = [Color::BLACK, hex("#111111"), hex("#5e81ac")];
        let best = best_contrast_candidate(&candidates, Color::WHITE, 0.1);
        assert_eq!(rgb_to_hex(best), "5e81ac");

        // Nothing bright enough: the reference comes back.
        let dark = [Color::BLACK, hex("#111111")];
        assert_eq!(best_contrast_candidate(&dark, Color::WHITE, 0.1), Color::WHITE);

        // Pure black is excluded by the default floor.
        assert_eq!(
            best_contrast_candidate(&[Color::BLACK], Color::WHITE, DEFAULT_MIN_LUMINANCE),
            Color::WHITE
        );
    }

    #[test]
    fn test_best_contrast_candidate_order_independent_winner() {
        let a = hex("#bf616a");
        let b = hex("#eceff4");
        let c = hex("#4c566a");
        let bg = hex("#2e3440");
        assert_eq!(best_contrast_candidate(&[a, b, c], bg, 0.0), b);
        assert_eq!(best_contrast_candidate(&[c, b, a], bg, 0.0), b);
    }

    #[test]
    fn test_color_serde() -> Result<()> {
        let c: Color = serde_json::from_str("\"#C0FFEE\"")?;
        assert_eq!(serde_json::to_string(&c)?, "\"#c0ffee\"");
        assert!(serde_json::from_str::<Color>("\"#c0ffe\"").is_err());
        assert_eq!("#5e81ac".parse::<Color>()?, hex("5e81ac"));
        Ok(())
    }

    #[test]
    fn test_rgb_struct() {
        let rgb = Rgb::new(100, 150, 200);
        assert_eq!(rgb.to_unit().to_rgb8(), rgb);
        assert_eq!(rgb.to_hex(), "6496c8");
    }
}
