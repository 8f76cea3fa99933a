mod content;
mod node;

pub use content::Content;
pub use node::{Element, TEXT_TAG};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.content.children() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children.iter_mut() {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// First element in document order (pre-order, `root` included) matching `pred`.
pub fn find_first<'a, F>(root: &'a Element, pred: &F) -> Option<&'a Element>
where
    F: Fn(&Element) -> bool,
{
    if pred(root) {
        return Some(root);
    }
    find_first_in(root.content.children(), pred)
}

/// Same as [`find_first`] over a list of sibling roots, such as a parsed fragment.
pub fn find_first_in<'a, F>(nodes: &'a [Element], pred: &F) -> Option<&'a Element>
where
    F: Fn(&Element) -> bool,
{
    nodes.iter().find_map(|node| find_first(node, pred))
}

/// The parent of the element with `id`, and the element's index among its siblings.
pub fn find_parent<'a>(root: &'a Element, id: &str) -> Option<(&'a Element, usize)> {
    let children = root.content.children();
    if let Some(index) = children.iter().position(|c| c.id == id) {
        return Some((root, index));
    }

    children.iter().find_map(|child| find_parent(child, id))
}

pub fn contains(root: &Element, id: &str) -> bool {
    find_element(root, id).is_some()
}
