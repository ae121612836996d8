use color::Rgba8;
use markup5ever::{QualName, local_name};

use super::{Attribute, Attributes};
use crate::style::InlineStyle;

#[derive(Debug, Clone)]
pub struct ElementData {
    /// The elements tag name, namespace and prefix
    pub name: QualName,

    /// The elements id attribute (if it has one)
    pub id: Option<String>,

    /// The element's attributes
    pub attrs: Attributes,

    /// The element's parsed style attribute
    pub style_attribute: InlineStyle,
}

impl ElementData {
    pub fn new(name: QualName, attrs: Vec<Attribute>) -> Self {
        let id = attrs
            .iter()
            .find(|attr| attr.name.local == local_name!("id"))
            .map(|attr| attr.value.clone());

        let mut data = ElementData {
            name,
            id,
            attrs: Attributes::new(attrs),
            style_attribute: InlineStyle::default(),
        };
        data.flush_style_attribute();
        data
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.get(name).is_some()
    }

    pub fn tag_name(&self) -> &str {
        self.name.local.as_ref()
    }

    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|c| c == class)
    }

    /// Re-parse the `style` attribute into `style_attribute`
    pub fn flush_style_attribute(&mut self) {
        self.style_attribute = self
            .attrs
            .get("style")
            .map(InlineStyle::parse)
            .unwrap_or_default();
    }

    /// Re-sync the cached `id` after the id attribute changed
    pub(crate) fn flush_id(&mut self) {
        self.id = self.attrs.get("id").map(str::to_string);
    }

    /// The `background-color` of the inline style, if it parses as a color
    pub fn inline_background(&self) -> Option<Rgba8> {
        self.style_attribute
            .get("background-color")
            .or_else(|| self.style_attribute.get("background"))
            .and_then(crate::style::parse_css_color)
    }
}
