use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The built-in Latin font families.
///
/// Each maps to one font file in the configured font directory (see
/// [`FontConfig`](super::FontConfig)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Black,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Regular,
        FontFamily::Bold,
        FontFamily::Italic,
        FontFamily::BoldItalic,
        FontFamily::Black,
    ];

    /// File name used when the configuration does not override it
    pub fn default_file(self) -> &'static str {
        match self {
            FontFamily::Regular => "arial.ttf",
            FontFamily::Bold => "arialbd.ttf",
            FontFamily::Italic => "ariali.ttf",
            FontFamily::BoldItalic => "arialbi.ttf",
            FontFamily::Black => "arialblk.ttf",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Regular => "regular",
            FontFamily::Bold => "bold",
            FontFamily::Italic => "italic",
            FontFamily::BoldItalic => "bold-italic",
            FontFamily::Black => "black",
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontFamily::Italic | FontFamily::BoldItalic)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        FontFamily::ALL
            .into_iter()
            .find(|family| family.name() == normalized)
            .ok_or_else(|| format!("unknown font family '{s}'"))
    }
}
