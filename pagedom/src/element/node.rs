use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;
use crate::types::{Edges, Length, Position, Transform};

/// Tag name used for text nodes.
pub const TEXT_TAG: &str = "#text";

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    /// True when `id` was generated rather than taken from markup or set by the caller.
    /// Generated ids are never serialized.
    pub auto_id: bool,
    pub tag: String,
    pub classes: Vec<String>,
    /// Remaining attributes in source order (`id` and `class` are lifted out).
    pub attributes: Vec<(String, String)>,

    // Content
    pub content: Content,

    // Positioning
    pub position: Position,
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
    pub z_index: Option<i16>,
    pub padding: Edges,
    pub transform: Option<Transform>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            auto_id: true,
            tag: "div".to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            content: Content::None,
            position: Position::Static,
            top: None,
            right: None,
            bottom: None,
            left: None,
            z_index: None,
            padding: Edges::default(),
            transform: None,
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        Self {
            id: generate_id(&tag),
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            tag: TEXT_TAG.to_string(),
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.auto_id = false;
        self
    }

    /// Give the element a fresh generated id.
    pub fn regenerate_id(mut self) -> Self {
        self.id = generate_id(&self.tag);
        self.auto_id = true;
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    // Attributes
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "id" => {
                self.id = value;
                self.auto_id = false;
            }
            "class" => {
                self.classes = value.split_ascii_whitespace().map(str::to_string).collect();
            }
            _ => match self.attributes.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = value,
                None => self.attributes.push((name, value)),
            },
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    // Positioning
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn top(mut self, top: Length) -> Self {
        self.top = Some(top);
        self
    }

    pub fn right(mut self, right: Length) -> Self {
        self.right = Some(right);
        self
    }

    pub fn bottom(mut self, bottom: Length) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn left(mut self, left: Length) -> Self {
        self.left = Some(left);
        self
    }

    pub fn z_index(mut self, z_index: i16) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Whether any structured positioning has been applied.
    pub fn has_layout(&self) -> bool {
        self.position != Position::Static
            || self.top.is_some()
            || self.right.is_some()
            || self.bottom.is_some()
            || self.left.is_some()
            || self.z_index.is_some()
            || !self.padding.is_zero()
            || self.transform.is_some()
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        for child in new_children {
            self.push_child(child);
        }
        self
    }

    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            // Text nodes have no children; anything else is replaced
            _ => self.content = Content::Children(vec![child]),
        }
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Children(children) => children.iter().map(Element::text_content).collect(),
        }
    }
}
