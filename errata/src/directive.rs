//! Placement directives embedded in error responses.
//!
//! A response carries its directive as hidden inputs next to the
//! error-message element:
//!
//! ```html
//! <input type="hidden" name="mode" value="toast_tr">
//! <input type="hidden" name="persistence" value="3000">
//! <div class="error-message">Could not save.</div>
//! ```

use std::fmt;
use std::time::Duration;

use pagedom::{Element, find_first_in};

use crate::config::PresenterConfig;
use crate::error::PresenterError;

// =============================================================================
// PlacementMode
// =============================================================================

/// Where an error element is put relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementMode {
    /// Take the target's place in the tree.
    Replace,
    /// Immediately before the target.
    Above,
    /// Immediately after the target.
    #[default]
    Below,
    ToastTopRight,
    ToastTopCenter,
    ToastTopLeft,
    ToastBottomRight,
    ToastBottomCenter,
    ToastBottomLeft,
}

/// Which viewport edge a toast hugs vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastRow {
    Top,
    Bottom,
}

/// Where a toast sits horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastColumn {
    Left,
    Center,
    Right,
}

impl PlacementMode {
    pub const ALL: [PlacementMode; 9] = [
        Self::Replace,
        Self::Above,
        Self::Below,
        Self::ToastTopRight,
        Self::ToastTopCenter,
        Self::ToastTopLeft,
        Self::ToastBottomRight,
        Self::ToastBottomCenter,
        Self::ToastBottomLeft,
    ];

    /// The wire keyword for this mode.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Above => "above",
            Self::Below => "below",
            Self::ToastTopRight => "toast_tr",
            Self::ToastTopCenter => "toast_tm",
            Self::ToastTopLeft => "toast_tl",
            Self::ToastBottomRight => "toast_br",
            Self::ToastBottomCenter => "toast_bm",
            Self::ToastBottomLeft => "toast_bl",
        }
    }

    /// Exact keyword lookup, ignoring case and surrounding whitespace.
    pub fn from_keyword(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.keyword().eq_ignore_ascii_case(value))
    }

    /// Lenient lookup used for server directives: anything unrecognized
    /// (including the empty string) is `Below`.
    pub fn from_directive(value: &str) -> Self {
        Self::from_keyword(value).unwrap_or_else(|| {
            if !value.trim().is_empty() {
                log::debug!("[directive] unrecognized mode {value:?}, using below");
            }
            Self::Below
        })
    }

    pub fn is_toast(&self) -> bool {
        self.toast_anchor().is_some()
    }

    /// Row and column of a toast mode; `None` for inline modes.
    pub fn toast_anchor(&self) -> Option<(ToastRow, ToastColumn)> {
        match self {
            Self::ToastTopRight => Some((ToastRow::Top, ToastColumn::Right)),
            Self::ToastTopCenter => Some((ToastRow::Top, ToastColumn::Center)),
            Self::ToastTopLeft => Some((ToastRow::Top, ToastColumn::Left)),
            Self::ToastBottomRight => Some((ToastRow::Bottom, ToastColumn::Right)),
            Self::ToastBottomCenter => Some((ToastRow::Bottom, ToastColumn::Center)),
            Self::ToastBottomLeft => Some((ToastRow::Bottom, ToastColumn::Left)),
            Self::Replace | Self::Above | Self::Below => None,
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// Directive
// =============================================================================

/// Mode and auto-dismiss delay for one error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directive {
    pub mode: PlacementMode,
    /// Milliseconds before the error is removed; 0 keeps it until replaced.
    pub persistence_ms: u64,
}

impl Directive {
    pub fn new(mode: PlacementMode, persistence_ms: u64) -> Self {
        Self {
            mode,
            persistence_ms,
        }
    }

    /// Auto-dismiss delay, if any.
    pub fn persistence(&self) -> Option<Duration> {
        (self.persistence_ms > 0).then(|| Duration::from_millis(self.persistence_ms))
    }
}

/// Read a millisecond count the way lenient integer parsers do: leading
/// whitespace, optional sign, then as many digits as there are.
///
/// Anything that does not yield a positive number (no digits, negative,
/// overflow) is 0.
pub fn parse_persistence(value: &str) -> u64 {
    let trimmed = value.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_len == 0 || negative {
        return 0;
    }

    unsigned[..digits_len].parse().unwrap_or(0)
}

// =============================================================================
// Extraction
// =============================================================================

/// What a parsed error response asks to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub directive: Directive,
    /// The error-message element, detached from the response.
    pub element: Element,
}

/// `value` of the first `<input name="{name}">` in the fragment.
fn field_value<'a>(fragment: &'a [Element], name: &str) -> Option<&'a str> {
    find_first_in(fragment, &|e: &Element| {
        e.tag == "input" && e.get_attribute("name") == Some(name)
    })
    .and_then(|input| input.get_attribute("value"))
}

/// Pull the directive and the error-message element out of a parsed response.
///
/// Missing or malformed fields fall back to defaults; only a missing
/// error-message element is an error.
pub fn extract(fragment: &[Element], config: &PresenterConfig) -> Result<Extracted, PresenterError> {
    let element = find_first_in(fragment, &|e: &Element| config.is_marker(e))
        .cloned()
        .ok_or_else(|| PresenterError::MissingMarker {
            class: config.marker_class.clone(),
        })?;

    let mode = field_value(fragment, &config.mode_field)
        .map(PlacementMode::from_directive)
        .unwrap_or_default();
    let persistence_ms = field_value(fragment, &config.persistence_field)
        .map(parse_persistence)
        .unwrap_or(0);

    Ok(Extracted {
        directive: Directive::new(mode, persistence_ms),
        element,
    })
}
