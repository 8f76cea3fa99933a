//! Structural mutations addressed by element id.
//!
//! Every operation either applies completely or leaves the tree untouched.

use crate::element::{Content, Element};
use crate::error::TreeError;

/// The sibling list holding `id`, and its index in that list.
fn sibling_slot<'a>(node: &'a mut Element, id: &str) -> Option<(&'a mut Vec<Element>, usize)> {
    let Content::Children(children) = &mut node.content else {
        return None;
    };

    if let Some(index) = children.iter().position(|c| c.id == id) {
        return Some((children, index));
    }

    for child in children.iter_mut() {
        if let Some(found) = sibling_slot(child, id) {
            return Some(found);
        }
    }

    None
}

fn slot_or_err<'a>(
    root: &'a mut Element,
    id: &str,
) -> Result<(&'a mut Vec<Element>, usize), TreeError> {
    if root.id == id {
        return Err(TreeError::NoParent { id: id.to_string() });
    }
    sibling_slot(root, id).ok_or_else(|| TreeError::NotFound { id: id.to_string() })
}

/// Detach the element with `id` and hand it back.
pub fn remove_element(root: &mut Element, id: &str) -> Result<Element, TreeError> {
    let (siblings, index) = slot_or_err(root, id)?;
    let removed = siblings.remove(index);
    log::trace!("[tree] removed {} ({})", removed.id, removed.tag);
    Ok(removed)
}

/// Insert `element` as the sibling immediately preceding `anchor`.
pub fn insert_before(root: &mut Element, anchor: &str, element: Element) -> Result<(), TreeError> {
    let (siblings, index) = slot_or_err(root, anchor)?;
    log::trace!("[tree] insert {} before {}", element.id, anchor);
    siblings.insert(index, element);
    Ok(())
}

/// Insert `element` as the sibling immediately following `anchor`.
pub fn insert_after(root: &mut Element, anchor: &str, element: Element) -> Result<(), TreeError> {
    let (siblings, index) = slot_or_err(root, anchor)?;
    log::trace!("[tree] insert {} after {}", element.id, anchor);
    siblings.insert(index + 1, element);
    Ok(())
}

/// Put `element` where `anchor` was, returning the displaced node.
pub fn replace_element(
    root: &mut Element,
    anchor: &str,
    element: Element,
) -> Result<Element, TreeError> {
    let (siblings, index) = slot_or_err(root, anchor)?;
    log::trace!("[tree] replace {} with {}", anchor, element.id);
    Ok(std::mem::replace(&mut siblings[index], element))
}

/// Append `element` as the last child of `root`.
pub fn append_to_root(root: &mut Element, element: Element) {
    log::trace!("[tree] append {} to {}", element.id, root.id);
    root.push_child(element);
}
