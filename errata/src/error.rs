//! Presenter error types
//!
//! None of these ever leave [`ErrorPresenter::handle`](crate::ErrorPresenter::handle);
//! they are reported through [`Outcome::Skipped`](crate::Outcome::Skipped).

use std::path::PathBuf;

use pagedom::TreeError;

/// Reasons a failure notification produced no visible error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenterError {
    /// The notification carried no target element.
    #[error("failure event has no target")]
    MissingTarget,

    /// The response is not markup (JSON, binary, ...). Left to default handling.
    #[error("response is not markup: {content_type:?}")]
    NotMarkup { content_type: String },

    /// The response has no error-message element to show.
    #[error("response has no .{class} element")]
    MissingMarker { class: String },

    /// The target is gone from the page and nothing stands in for it.
    #[error("target {target} is not in the page")]
    TargetDetached { target: String },

    /// A page mutation failed.
    #[error("page mutation failed: {0}")]
    Tree(#[from] TreeError),
}

impl PresenterError {
    /// Whether this is an expected, non-applicable failure rather than a fault.
    pub fn is_benign(&self) -> bool {
        !matches!(self, Self::Tree(_))
    }
}

/// Errors that can occur while loading a [`PresenterConfig`](crate::PresenterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
