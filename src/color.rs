//! Accent color parsing for canvas fills.
//!
//! The site exposes its accent through a CSS custom property that may hold
//! `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`. Parsing is strict
//! and typed; [`ThemeColors::from_css_value`] is the lenient entry point that
//! falls back to the default accent.

use crate::constants::{FALLBACK_ACCENT, FILL_ALPHA_DARK, FILL_ALPHA_LIGHT, STROKE_ALPHA};
use crate::theme::ThemeMode;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color value")]
    Empty,
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
    #[error("invalid rgb() color: {0}")]
    InvalidRgb(String),
    #[error("unsupported color syntax: {0}")]
    Unsupported(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse(raw: &str) -> Result<Rgb, ColorParseError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return parse_rgb_fn(&lower).ok_or_else(|| ColorParseError::InvalidRgb(s.to_string()));
        }
        Err(ColorParseError::Unsupported(s.to_string()))
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Rgb::new(it.next()??, it.next()??, it.next()??))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn parse_rgb_fn(s: &str) -> Option<Rgb> {
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    let name = s[..open].trim();
    if name != "rgb" && name != "rgba" {
        return None;
    }
    let args = &s[open + 1..close];
    // Accept both comma and space separated forms; ignore an alpha channel.
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }
    let channel = |p: &str| -> Option<u8> {
        let v: f32 = p.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    Some(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    /// Multiply alpha, used for the paused fade and link falloff.
    pub fn faded(self, factor: f32) -> Rgba {
        self.rgb.with_alpha(self.alpha * factor)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {:.3})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

/// Fill and stroke pair used by the petal renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeColors {
    pub fill: Rgba,
    pub stroke: Rgba,
}

impl ThemeColors {
    pub fn from_rgb(base: Rgb, mode: ThemeMode) -> Self {
        let fill_alpha = match mode {
            ThemeMode::Dark => FILL_ALPHA_DARK,
            ThemeMode::Light => FILL_ALPHA_LIGHT,
        };
        Self {
            fill: base.with_alpha(fill_alpha),
            stroke: base.with_alpha(STROKE_ALPHA),
        }
    }

    /// Never fails: empty or unparseable input yields the fallback accent.
    pub fn from_css_value(raw: &str, mode: ThemeMode) -> Self {
        let base = match Rgb::parse(raw) {
            Ok(rgb) => rgb,
            Err(e) => {
                log::debug!("[theme] accent fallback: {}", e);
                fallback_accent()
            }
        };
        Self::from_rgb(base, mode)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_rgb(fallback_accent(), ThemeMode::Dark)
    }
}

pub fn fallback_accent() -> Rgb {
    Rgb::parse(FALLBACK_ACCENT).unwrap_or(Rgb::new(255, 143, 171))
}
