use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Color, FreqVizError, Result};

/// Four-colour palette shared by every rendering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    /// Persistent surface background, never painted by the renderer itself.
    pub background: Color,
}

impl Theme {
    /// Colours the renderer may paint with, i.e. everything except the
    /// background.
    pub fn foreground(&self) -> [Color; 3] {
        [self.primary, self.secondary, self.tertiary]
    }
}

/// Closed set of built-in palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Neon,
    Retro,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Default, ThemeName::Neon, ThemeName::Retro];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Neon => "neon",
            ThemeName::Retro => "retro",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeName::Default => DEFAULT,
            ThemeName::Neon => NEON,
            ThemeName::Retro => RETRO,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = FreqVizError;

    fn from_str(name: &str) -> Result<Self> {
        ThemeName::ALL
            .into_iter()
            .find(|theme| theme.as_str() == name)
            .ok_or_else(|| FreqVizError::UnknownTheme(name.to_string()))
    }
}

const DEFAULT: Theme = Theme {
    primary: Color::from_hex(0x1db954),
    secondary: Color::from_hex(0x1ed760),
    tertiary: Color::from_hex(0x1fdf64),
    background: Color::from_hex(0x282828),
};

const NEON: Theme = Theme {
    primary: Color::from_hex(0xff00ff),
    secondary: Color::from_hex(0x00ffff),
    tertiary: Color::from_hex(0xffff00),
    background: Color::from_hex(0x000000),
};

const RETRO: Theme = Theme {
    primary: Color::from_hex(0xff5722),
    secondary: Color::from_hex(0xff9800),
    tertiary: Color::from_hex(0xffc107),
    background: Color::from_hex(0x263238),
};

/// Looks up a palette by name. Names outside the built-in set are a
/// configuration error.
pub fn resolve_theme(name: &str) -> Result<Theme> {
    name.parse::<ThemeName>().map(|theme| theme.theme())
}
