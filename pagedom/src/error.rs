//! Page tree error types

/// Errors from structural mutations of the page tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No element with this id exists in the tree.
    #[error("element not found: {id}")]
    NotFound { id: String },

    /// The element is the tree root and has no siblings to place next to.
    #[error("element has no parent: {id}")]
    NoParent { id: String },
}
