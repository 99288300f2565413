//! Dark/light mode and accent selection for the navigation shell.

use crate::color::{Rgb, ThemeColors};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Accent {
    #[default]
    Pink,
    Purple,
    Blue,
    Green,
    Orange,
}

impl Accent {
    pub const ALL: [Accent; 5] = [
        Accent::Pink,
        Accent::Purple,
        Accent::Blue,
        Accent::Green,
        Accent::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Pink => "pink",
            Accent::Purple => "purple",
            Accent::Blue => "blue",
            Accent::Green => "green",
            Accent::Orange => "orange",
        }
    }

    /// Default swatch per mode; the light variants are darker so petals
    /// stay visible on a pale background.
    pub fn rgb(self, mode: ThemeMode) -> Rgb {
        match (self, mode) {
            (Accent::Pink, ThemeMode::Dark) => Rgb::new(0xff, 0x8f, 0xab),
            (Accent::Pink, ThemeMode::Light) => Rgb::new(0xe0, 0x5a, 0x84),
            (Accent::Purple, ThemeMode::Dark) => Rgb::new(0xc0, 0x84, 0xfc),
            (Accent::Purple, ThemeMode::Light) => Rgb::new(0x93, 0x33, 0xea),
            (Accent::Blue, ThemeMode::Dark) => Rgb::new(0x60, 0xa5, 0xfa),
            (Accent::Blue, ThemeMode::Light) => Rgb::new(0x25, 0x63, 0xeb),
            (Accent::Green, ThemeMode::Dark) => Rgb::new(0x4a, 0xde, 0x80),
            (Accent::Green, ThemeMode::Light) => Rgb::new(0x16, 0xa3, 0x4a),
            (Accent::Orange, ThemeMode::Dark) => Rgb::new(0xfb, 0x92, 0x3c),
            (Accent::Orange, ThemeMode::Light) => Rgb::new(0xea, 0x58, 0x0c),
        }
    }
}

impl FromStr for Accent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Accent::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub accent: Accent,
}

impl Theme {
    pub fn new(mode: ThemeMode, accent: Accent) -> Self {
        Self { mode, accent }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Classes applied to the document root element.
    pub fn root_classes(&self) -> SmallVec<[String; 2]> {
        smallvec![
            self.mode.as_str().to_string(),
            format!("accent-{}", self.accent.as_str()),
        ]
    }

    /// Classes the shell removes before applying [`Theme::root_classes`].
    pub fn all_theme_classes() -> impl Iterator<Item = String> {
        ["dark".to_string(), "light".to_string()]
            .into_iter()
            .chain(Accent::ALL.into_iter().map(|a| format!("accent-{}", a.as_str())))
    }

    pub fn data_theme(&self) -> &'static str {
        self.mode.as_str()
    }

    pub fn accent_hex(&self) -> String {
        self.accent.rgb(self.mode).to_hex()
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_rgb(self.accent.rgb(self.mode), self.mode)
    }
}
