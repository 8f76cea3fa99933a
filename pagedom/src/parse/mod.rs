//! Lenient markup parser.
//!
//! Parsing never fails: like a browser, malformed input is recovered from
//! (stray end tags are dropped, unclosed elements are closed at the end of
//! input). Comments, doctypes and processing instructions are skipped.

mod entities;

pub use entities::decode_entities;

use crate::element::{Content, Element};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose body is read verbatim up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse a fragment into its top-level nodes.
pub fn parse_fragment(markup: &str) -> Vec<Element> {
    let mut parser = Parser::new(markup);
    parser.run();
    parser.finish()
}

/// Parse a page and return its body element.
///
/// A full document (`<html><body>...`) yields its `body`; anything else is
/// wrapped in a fresh `body` with id `body`.
pub fn parse_document(markup: &str) -> Element {
    let nodes = parse_fragment(markup);

    let body = crate::element::find_first_in(&nodes, &|e: &Element| e.tag == "body").cloned();
    match body {
        Some(mut body) => {
            if body.auto_id {
                body = body.id("body");
            }
            body
        }
        None => Element::new("body").id("body").children(strip_document_shell(nodes)),
    }
}

/// Drop `html`/`head` wrappers from a document that has no `body`.
fn strip_document_shell(nodes: Vec<Element>) -> Vec<Element> {
    nodes
        .into_iter()
        .flat_map(|node| match node.tag.as_str() {
            "html" => match node.content {
                Content::Children(children) => strip_document_shell(children),
                _ => Vec::new(),
            },
            "head" => Vec::new(),
            _ => vec![node],
        })
        .collect()
}

enum Token {
    Text(String),
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    End(String),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Open elements; index 0 is a synthetic container for the top level.
    stack: Vec<Element>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            stack: vec![Element::new("#fragment")],
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn run(&mut self) {
        while let Some(token) = self.next_token() {
            match token {
                Token::Text(text) => self.append_text(text),
                Token::Start {
                    name,
                    attributes,
                    self_closing,
                } => self.open(name, attributes, self_closing),
                Token::End(name) => self.close(&name),
            }
        }
    }

    fn finish(mut self) -> Vec<Element> {
        while self.stack.len() > 1 {
            self.pop_into_parent();
        }
        match self.stack.pop().map(|root| root.content) {
            Some(Content::Children(children)) => children,
            _ => Vec::new(),
        }
    }

    fn append(&mut self, element: Element) {
        if let Some(top) = self.stack.last_mut() {
            top.push_child(element);
        }
    }

    /// Append character data, merging with a preceding text node.
    fn append_text(&mut self, text: String) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Content::Children(children) = &mut top.content {
            if let Some(Content::Text(prev)) = children.last_mut().map(|last| &mut last.content) {
                prev.push_str(&text);
                return;
            }
        }
        top.push_child(Element::text(text));
    }

    fn pop_into_parent(&mut self) {
        if self.stack.len() > 1 {
            if let Some(done) = self.stack.pop() {
                self.append(done);
            }
        }
    }

    fn open(&mut self, name: String, attributes: Vec<(String, String)>, self_closing: bool) {
        let mut element = Element::new(name);
        for (attr, value) in attributes {
            element.set_attribute(attr, value);
        }

        if is_void(&element.tag) || self_closing {
            self.append(element);
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&element.tag.as_str()) {
            let body = self.raw_text_until_end_tag(&element.tag);
            if !body.is_empty() {
                element.push_child(Element::text(body));
            }
            self.append(element);
            return;
        }

        self.stack.push(element);
    }

    fn close(&mut self, name: &str) {
        // Find the nearest open element with this tag; stray end tags are ignored
        let Some(depth) = self.stack.iter().skip(1).rposition(|e| e.tag == name) else {
            log::trace!("[parse] ignoring stray </{name}>");
            return;
        };
        let target_len = depth + 1;
        while self.stack.len() > target_len {
            self.pop_into_parent();
        }
    }

    fn raw_text_until_end_tag(&mut self, tag: &str) -> String {
        let rest = self.rest();
        let needle = format!("</{tag}");
        let lower = rest.to_ascii_lowercase();
        match lower.find(&needle) {
            Some(end) => {
                let body = rest[..end].to_string();
                self.pos += end;
                // Consume the end tag itself
                match self.rest().find('>') {
                    Some(gt) => self.pos += gt + 1,
                    None => self.pos = self.src.len(),
                }
                body
            }
            None => {
                self.pos = self.src.len();
                rest.to_string()
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return None;
            }

            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                self.pos += end;
                return Some(Token::Text(decode_entities(&rest[..end])));
            }

            if rest.starts_with("<!--") {
                self.pos += rest[4..].find("-->").map_or(rest.len(), |i| i + 4 + 3);
                continue;
            }

            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
                continue;
            }

            if let Some(after) = rest.strip_prefix("</") {
                let name_len = tag_name_len(after);
                if name_len == 0 {
                    // `</>` or `</ ...`: treated as a bogus comment
                    self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
                    continue;
                }
                let name = after[..name_len].to_ascii_lowercase();
                self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
                return Some(Token::End(name));
            }

            let name_len = tag_name_len(&rest[1..]);
            if name_len == 0 {
                // A lone `<` is text
                self.pos += 1;
                return Some(Token::Text("<".to_string()));
            }

            let name = rest[1..1 + name_len].to_ascii_lowercase();
            self.pos += 1 + name_len;
            let (attributes, self_closing) = self.attributes();
            return Some(Token::Start {
                name,
                attributes,
                self_closing,
            });
        }
    }

    /// Read attributes up to and including the closing `>` of a start tag.
    fn attributes(&mut self) -> (Vec<(String, String)>, bool) {
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                return (attributes, false);
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                return (attributes, true);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return (attributes, false);
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name_len = rest
                .find(|c: char| c.is_ascii_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(rest.len());
            if name_len == 0 {
                // A bare `=`; skip it
                self.pos += 1;
                continue;
            }
            let name = rest[..name_len].to_ascii_lowercase();
            self.pos += name_len;

            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attribute_value()
            } else {
                String::new()
            };

            // First occurrence wins
            if !attributes.iter().any(|(n, _)| *n == name) {
                attributes.push((name, value));
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        let rest = self.rest();
        let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
            let len = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(rest.len());
            self.pos += len;
            return decode_entities(&rest[..len]);
        };

        let body = &rest[1..];
        match body.find(quote) {
            Some(end) => {
                self.pos += 1 + end + 1;
                decode_entities(&body[..end])
            }
            None => {
                self.pos = self.src.len();
                decode_entities(body)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

fn tag_name_len(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => s
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
            .unwrap_or(s.len()),
        _ => 0,
    }
}
