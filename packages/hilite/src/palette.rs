//! The fixed set of highlight colours.

use std::fmt;
use std::str::FromStr;

use color::Rgba8;
use hilite_dom::style::parse_css_color;
use serde::{Deserialize, Serialize};

use crate::HighlightError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum HighlightColor {
    Yellow,
    Green,
    Cyan,
    Pink,
    Peach,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 5] = [
        HighlightColor::Yellow,
        HighlightColor::Green,
        HighlightColor::Cyan,
        HighlightColor::Pink,
        HighlightColor::Peach,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HighlightColor::Yellow => "yellow",
            HighlightColor::Green => "green",
            HighlightColor::Cyan => "cyan",
            HighlightColor::Pink => "pink",
            HighlightColor::Peach => "peach",
        }
    }

    /// The CSS background value painted behind highlighted text
    pub fn background(self) -> &'static str {
        match self {
            HighlightColor::Yellow => "#fef08a",
            HighlightColor::Green => "#bbf7d0",
            HighlightColor::Cyan => "#a5f3fc",
            HighlightColor::Pink => "#fbcfe8",
            HighlightColor::Peach => "#fed7aa",
        }
    }

    pub fn rgba8(self) -> Rgba8 {
        // The palette values are literals above; they always parse
        parse_css_color(self.background()).unwrap_or(Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        })
    }

    /// The class carrying this colour's stylesheet rule
    pub fn class_name(self) -> String {
        format!("hilite-{}", self.as_str())
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        HighlightColor::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| HighlightError::UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for color in HighlightColor::ALL {
            assert_eq!(color.as_str().parse::<HighlightColor>().unwrap(), color);
        }
        assert_eq!("  Cyan ".parse::<HighlightColor>().unwrap(), HighlightColor::Cyan);
        assert!(matches!(
            "mauve".parse::<HighlightColor>(),
            Err(HighlightError::UnknownColor(name)) if name == "mauve"
        ));
    }

    #[test]
    fn backgrounds_parse() {
        let peach = HighlightColor::Peach.rgba8();
        assert_eq!((peach.r, peach.g, peach.b, peach.a), (0xfe, 0xd7, 0xaa, 0xff));
        assert_eq!(HighlightColor::Pink.class_name(), "hilite-pink");
    }
}
