//! Inline `style` attribute handling.
//!
//! Content reaching the document is sanitized and carries no author styles, so the only
//! inline styles we see are the ones written by native editing commands. A declaration list
//! parser is all that's needed here.

use color::{Rgba8, Srgb};

/// The parsed declarations of a `style` attribute, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(css: &str) -> Self {
        let declarations = css
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim();
                if name.is_empty() || value.is_empty() {
                    return None;
                }
                Some((name, value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.declarations.push((name, value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let len = self.declarations.len();
        self.declarations.retain(|(n, _)| n != name);
        len != self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn to_css_string(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse any CSS color value (`#fef08a`, `rgb(254, 240, 138)`, `yellow`, ...) into 8-bit sRGB
pub fn parse_css_color(value: &str) -> Option<Rgba8> {
    let color = color::parse_color(value.trim()).ok()?;
    Some(color.to_alpha_color::<Srgb>().to_rgba8())
}

/// Serialize a color the way browsers report computed background colors
pub fn serialize_rgb(color: Rgba8) -> String {
    if color.a == 255 {
        format!("rgb({}, {}, {})", color.r, color.g, color.b)
    } else {
        let alpha = (color.a as f32 / 255.0 * 100.0).round() / 100.0;
        format!("rgba({}, {}, {}, {alpha})", color.r, color.g, color.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_reserializes_declarations() {
        let mut style = InlineStyle::parse("color: red; Background-Color : #fff ;;bogus");
        assert_eq!(style.get("background-color"), Some("#fff"));
        assert_eq!(style.get("color"), Some("red"));

        style.set("color", "blue");
        assert!(style.remove("background-color"));
        assert_eq!(style.to_css_string(), "color: blue;");
    }

    #[test]
    fn color_formats_compare_equal() {
        let hex = parse_css_color("#fef08a").unwrap();
        let rgb = parse_css_color("rgb(254, 240, 138)").unwrap();
        assert_eq!(hex, rgb);
        assert_eq!(serialize_rgb(hex), "rgb(254, 240, 138)");
    }
}
