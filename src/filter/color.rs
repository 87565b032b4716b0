use super::error::FilterError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An RGB color attached to a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse an optional color where the empty string means "no color".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, FilterError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            trimmed.parse().map(Some)
        }
    }
}

/// Named token the desktop filter editor stores for its light gray option
const LIGHT_GRAY_TOKEN: &str = "#gray-300";
const LIGHT_GRAY: Color = Color::rgb(0xd1, 0xd5, 0xdb);

impl FromStr for Color {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidColor(s.to_string());
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(LIGHT_GRAY_TOKEN) {
            return Ok(LIGHT_GRAY);
        }
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // #abc expands to #aabbcc
            3 => {
                let mut parts = [0u8; 3];
                for (slot, digit) in parts.iter_mut().zip(hex.chars()) {
                    *slot = channel(&format!("{digit}{digit}"))?;
                }
                Ok(Color::rgb(parts[0], parts[1], parts[2]))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Named text/background color pairs offered when creating a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorPreset {
    Default,
    WhiteBlack,
    BlackYellow,
    WhiteRed,
    WhiteGreen,
    WhiteBlue,
    OrangeBlack,
    CyanBlack,
    PurpleBlack,
}

const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

impl ColorPreset {
    /// Returns the `(text, background)` colors of the preset.
    pub fn colors(self) -> (Option<Color>, Option<Color>) {
        match self {
            ColorPreset::Default => (None, None),
            ColorPreset::WhiteBlack => (Some(WHITE), Some(BLACK)),
            ColorPreset::BlackYellow => (Some(BLACK), Some(Color::rgb(0xff, 0xff, 0x00))),
            ColorPreset::WhiteRed => (Some(WHITE), Some(Color::rgb(0xdc, 0x26, 0x26))),
            ColorPreset::WhiteGreen => (Some(WHITE), Some(Color::rgb(0x16, 0xa3, 0x4a))),
            ColorPreset::WhiteBlue => (Some(WHITE), Some(Color::rgb(0x25, 0x63, 0xeb))),
            ColorPreset::OrangeBlack => (Some(Color::rgb(0xf9, 0x73, 0x16)), Some(BLACK)),
            ColorPreset::CyanBlack => (Some(Color::rgb(0x22, 0xd3, 0xee)), Some(BLACK)),
            ColorPreset::PurpleBlack => (Some(Color::rgb(0xa8, 0x55, 0xf7)), Some(BLACK)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!("#dc2626".parse::<Color>().unwrap(), Color::rgb(0xdc, 0x26, 0x26));
        assert_eq!("#FFF".parse::<Color>().unwrap(), WHITE);
        assert_eq!("#a1b".parse::<Color>().unwrap(), Color::rgb(0xaa, 0x11, 0xbb));
    }

    #[test]
    fn test_rejects_malformed_colors() {
        assert!("dc2626".parse::<Color>().is_err());
        assert!("#gray-400".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#".parse::<Color>().is_err());
    }

    #[test]
    fn test_light_gray_token_maps_to_hex() {
        assert_eq!("#gray-300".parse::<Color>().unwrap(), LIGHT_GRAY);
        assert_eq!(LIGHT_GRAY.to_string(), "#d1d5db");
    }

    #[test]
    fn test_empty_string_is_no_color() {
        assert_eq!(Color::parse_optional("").unwrap(), None);
        assert_eq!(Color::parse_optional("  ").unwrap(), None);
        assert_eq!(Color::parse_optional("#000000").unwrap(), Some(BLACK));
    }

    #[test]
    fn test_display_is_lowercase_long_form() {
        assert_eq!("#ABC".parse::<Color>().unwrap().to_string(), "#aabbcc");
    }

    #[test]
    fn test_default_preset_has_no_colors() {
        assert_eq!(ColorPreset::Default.colors(), (None, None));
        assert_eq!(ColorPreset::WhiteRed.colors().0, Some(WHITE));
    }
}
