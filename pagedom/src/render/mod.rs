//! Markup serialization.
//!
//! Structured positioning (`position`, offsets, `z_index`, padding,
//! transform) is emitted as declarations appended to the element's own
//! `style` attribute. Generated ids are omitted.

use std::fmt::Write;

use crate::element::{Content, Element};
use crate::parse::is_void;
use crate::types::Position;

/// Serialize an element and its subtree.
pub fn render(element: &Element) -> String {
    let mut out = String::new();
    render_into(element, &mut out);
    out
}

/// Serialize only the children of an element (its "inner markup").
pub fn render_children(element: &Element) -> String {
    let mut out = String::new();
    for child in element.content.children() {
        render_into(child, &mut out);
    }
    out
}

fn render_into(element: &Element, out: &mut String) {
    if let Content::Text(text) = &element.content {
        if element.is_text() {
            out.push_str(&escape_text(text));
            return;
        }
    }

    out.push('<');
    out.push_str(&element.tag);

    if !element.auto_id {
        push_attribute(out, "id", &element.id);
    }
    if !element.classes.is_empty() {
        push_attribute(out, "class", &element.classes.join(" "));
    }

    let inline_style = inline_style(element);
    for (name, value) in &element.attributes {
        if name == "style" && inline_style.is_some() {
            continue;
        }
        push_attribute(out, name, value);
    }
    if let Some(style) = inline_style {
        push_attribute(out, "style", &style);
    }

    out.push('>');
    if is_void(&element.tag) {
        return;
    }

    match &element.content {
        Content::None => {}
        Content::Text(text) => out.push_str(&escape_text(text)),
        Content::Children(children) => {
            for child in children {
                render_into(child, out);
            }
        }
    }

    let _ = write!(out, "</{}>", element.tag);
}

/// The `style` attribute value: the element's own declarations followed by
/// its structured layout. `None` when there is no structured layout.
pub fn inline_style(element: &Element) -> Option<String> {
    if !element.has_layout() {
        return None;
    }

    let mut declarations: Vec<String> = element
        .get_attribute("style")
        .map(|s| {
            s.split(';')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if element.position != Position::Static {
        declarations.push(format!("position: {}", element.position.as_css()));
    }
    if let Some(z) = element.z_index {
        declarations.push(format!("z-index: {z}"));
    }
    if !element.padding.is_zero() {
        declarations.push(format!("padding: {}", element.padding.to_css()));
    }
    for (property, value) in [
        ("top", element.top),
        ("right", element.right),
        ("bottom", element.bottom),
        ("left", element.left),
    ] {
        if let Some(value) = value {
            declarations.push(format!("{property}: {value}"));
        }
    }
    if let Some(transform) = element.transform {
        declarations.push(format!("transform: {transform}"));
    }

    Some(declarations.join("; "))
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
