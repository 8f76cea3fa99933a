//! Presentation of errors from failed page-fragment requests.
//!
//! When a request for a page fragment fails with a markup body, the server
//! can embed an error-message element plus a placement directive:
//!
//! ```html
//! <input type="hidden" name="mode" value="toast_br">
//! <input type="hidden" name="persistence" value="3000">
//! <div class="error-message">Session expired.</div>
//! ```
//!
//! [`ErrorPresenter::handle`] shows that element next to the request's target
//! (or as a fixed-position toast), replacing whatever error the target showed
//! before, and removes it again after `persistence` milliseconds.
//!
//! # Example
//!
//! ```ignore
//! let page = Page::from_markup(r#"<form id="signup"></form>"#);
//! let presenter = ErrorPresenter::new(page.clone());
//!
//! let outcome = presenter.handle(FailureEvent::html("signup", response_body));
//! assert!(outcome.is_shown());
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod event;
pub mod page;
pub mod placement;
pub mod presenter;

pub use config::PresenterConfig;
pub use directive::{Directive, PlacementMode, parse_persistence};
pub use error::{ConfigError, PresenterError};
pub use event::FailureEvent;
pub use page::Page;
pub use placement::{Anchor, MutationPlan, ToastLayout, resolve_placement};
pub use presenter::{ErrorPresenter, Outcome};
