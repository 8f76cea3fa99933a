//! Placement resolution.
//!
//! [`resolve_placement`] is pure: it turns a directive and an anchor into a
//! [`MutationPlan`]. [`MutationPlan::apply`] is the only code that touches
//! the page tree.

use pagedom::mutate::{append_to_root, insert_after, insert_before, replace_element};
use pagedom::{Edges, Element, Length, Position, Transform, TreeError};

use crate::config::PresenterConfig;
use crate::directive::{Directive, PlacementMode, ToastColumn, ToastRow};

/// The node an inline error is positioned against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The failed request's target, present in the page.
    Target(String),
    /// A live error that replaced the (now detached) target and stands in for it.
    StandIn(String),
}

impl Anchor {
    pub fn id(&self) -> &str {
        match self {
            Self::Target(id) | Self::StandIn(id) => id,
        }
    }
}

/// Fixed-position layout applied to a toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastLayout {
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
    pub transform: Option<Transform>,
    pub z_index: i16,
    pub padding: Edges,
}

impl ToastLayout {
    pub fn new(row: ToastRow, column: ToastColumn, config: &PresenterConfig) -> Self {
        let offset = Some(Length::Px(config.toast_offset));
        let (top, bottom) = match row {
            ToastRow::Top => (offset, None),
            ToastRow::Bottom => (None, offset),
        };
        let (left, right, transform) = match column {
            ToastColumn::Left => (offset, None, None),
            ToastColumn::Right => (None, offset, None),
            ToastColumn::Center => (
                Some(Length::Percent(50.0)),
                None,
                Some(Transform::TranslateX(Length::Percent(-50.0))),
            ),
        };

        Self {
            top,
            right,
            bottom,
            left,
            transform,
            z_index: config.toast_z_index,
            padding: Edges::all(config.toast_padding),
        }
    }

    /// Pin `element` to the viewport with this layout.
    pub fn apply_to(&self, mut element: Element) -> Element {
        element.position = Position::Fixed;
        element.top = self.top;
        element.right = self.right;
        element.bottom = self.bottom;
        element.left = self.left;
        element.transform = self.transform;
        element.z_index = Some(self.z_index);
        element.padding = self.padding;
        element
    }
}

/// A single page mutation that places an error element.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationPlan {
    ReplaceAnchor { anchor: String },
    InsertBefore { anchor: String },
    InsertAfter { anchor: String },
    AppendToRoot { layout: ToastLayout },
}

impl MutationPlan {
    /// Whether applying this plan removes the node with `id` from the page.
    pub fn displaces(&self, id: &str) -> bool {
        matches!(self, Self::ReplaceAnchor { anchor } if anchor == id)
    }

    /// Carry out the plan against the page root.
    pub fn apply(self, root: &mut Element, element: Element) -> Result<(), TreeError> {
        match self {
            Self::ReplaceAnchor { anchor } => replace_element(root, &anchor, element).map(drop),
            Self::InsertBefore { anchor } => insert_before(root, &anchor, element),
            Self::InsertAfter { anchor } => insert_after(root, &anchor, element),
            Self::AppendToRoot { layout } => {
                append_to_root(root, layout.apply_to(element));
                Ok(())
            }
        }
    }
}

/// Decide where an error goes.
///
/// Inline modes are relative to the anchor. When the anchor is a stand-in
/// error, every inline mode takes the stand-in's place so the new error
/// occupies the slot the target had. Toast modes ignore the anchor.
pub fn resolve_placement(
    directive: &Directive,
    anchor: &Anchor,
    config: &PresenterConfig,
) -> MutationPlan {
    if let Some((row, column)) = directive.mode.toast_anchor() {
        return MutationPlan::AppendToRoot {
            layout: ToastLayout::new(row, column, config),
        };
    }

    let id = anchor.id().to_string();
    match (anchor, directive.mode) {
        (Anchor::StandIn(_), _) | (_, PlacementMode::Replace) => {
            MutationPlan::ReplaceAnchor { anchor: id }
        }
        (_, PlacementMode::Above) => MutationPlan::InsertBefore { anchor: id },
        _ => MutationPlan::InsertAfter { anchor: id },
    }
}
