use std::sync::{Arc, PoisonError, RwLock};

use pagedom::{Element, parse_document, render};

/// Shared handle to the live page tree.
///
/// Cloning is cheap; all clones see the same tree. The surrounding page and
/// the presenter's dismiss timers both go through this handle.
#[derive(Debug, Clone)]
pub struct Page {
    root: Arc<RwLock<Element>>,
}

impl Page {
    pub fn new(root: Element) -> Self {
        Self {
            root: Arc::new(RwLock::new(root)),
        }
    }

    /// Parse a page; see [`pagedom::parse_document`].
    pub fn from_markup(markup: &str) -> Self {
        Self::new(parse_document(markup))
    }

    /// Run `f` with shared access to the root.
    pub fn read<R>(&self, f: impl FnOnce(&Element) -> R) -> R {
        let guard = self.root.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    /// Run `f` with exclusive access to the root.
    pub fn write<R>(&self, f: impl FnOnce(&mut Element) -> R) -> R {
        let mut guard = self.root.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read(|root| pagedom::contains(root, id))
    }

    /// A copy of the element with `id`, if present.
    pub fn element(&self, id: &str) -> Option<Element> {
        self.read(|root| pagedom::find_element(root, id).cloned())
    }

    /// Ids of the page elements with `class`, in document order.
    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        fn collect(element: &Element, class: &str, out: &mut Vec<String>) {
            if element.has_class(class) {
                out.push(element.id.clone());
            }
            for child in element.content.children() {
                collect(child, class, out);
            }
        }

        self.read(|root| {
            let mut out = Vec::new();
            collect(root, class, &mut out);
            out
        })
    }

    /// Serialize the whole page.
    pub fn render(&self) -> String {
        self.read(render)
    }
}
