//! The error presenter.
//!
//! Turns a failed-request notification into a visible error element:
//!
//! 1. guard: a target is present and the response is markup
//! 2. parse the response and extract the directive and error element
//! 3. remove the target's previous error (and cancel its timer)
//! 4. resolve and apply the placement
//! 5. schedule auto-dismiss
//!
//! Nothing escapes [`ErrorPresenter::handle`]: every failure path is a
//! logged no-op, because it runs inside someone else's error handling.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use log::{debug, trace, warn};
use pagedom::mutate::remove_element;
use pagedom::{Content, Element, TreeError, find_parent, parse_fragment};
use tokio_util::sync::CancellationToken;

use crate::config::PresenterConfig;
use crate::directive::{PlacementMode, extract};
use crate::error::PresenterError;
use crate::event::FailureEvent;
use crate::page::Page;
use crate::placement::{Anchor, MutationPlan, resolve_placement};

// =============================================================================
// Outcome
// =============================================================================

/// What a handling pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An error element was inserted.
    Shown {
        element_id: String,
        mode: PlacementMode,
        dismiss_after: Option<Duration>,
    },
    /// Nothing was shown.
    Skipped(PresenterError),
}

impl Outcome {
    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }

    /// Id of the inserted error element.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            Self::Shown { element_id, .. } => Some(element_id),
            Self::Skipped(_) => None,
        }
    }
}

// =============================================================================
// ErrorPresenter
// =============================================================================

/// The error currently shown for a target.
#[derive(Debug)]
struct LiveError {
    element_id: String,
    /// The error took the target's place in the tree and anchors later errors.
    stands_in: bool,
    /// Cancels the pending auto-dismiss, if one was scheduled.
    cancel: CancellationToken,
}

type LiveMap = HashMap<String, LiveError>;

/// Shows errors from failed requests on a [`Page`].
///
/// Keeps at most one live error per target. Cloning shares the page and
/// the live-error state.
#[derive(Debug, Clone)]
pub struct ErrorPresenter {
    page: Page,
    config: Arc<PresenterConfig>,
    live: Arc<RwLock<LiveMap>>,
}

impl ErrorPresenter {
    pub fn new(page: Page) -> Self {
        Self::with_config(page, PresenterConfig::default())
    }

    pub fn with_config(page: Page, config: PresenterConfig) -> Self {
        Self {
            page,
            config: Arc::new(config),
            live: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Handle one failure notification. Never panics, never errors.
    pub fn handle(&self, event: FailureEvent) -> Outcome {
        match self.try_handle(event) {
            Ok(outcome) => outcome,
            Err(err) => {
                if err.is_benign() {
                    debug!("[presenter] skipped: {err}");
                } else {
                    warn!("[presenter] failed to show error: {err}");
                }
                Outcome::Skipped(err)
            }
        }
    }

    /// Id of the error element currently shown for `target`.
    pub fn live_error(&self, target: &str) -> Option<String> {
        self.read_live(|live| live.get(target).map(|l| l.element_id.clone()))
    }

    /// Number of targets with a live error.
    pub fn live_count(&self) -> usize {
        self.read_live(|live| live.len())
    }

    /// Remove the error shown for `target` and cancel its auto-dismiss.
    ///
    /// Returns whether an element was removed from the page.
    pub fn dismiss(&self, target: &str) -> bool {
        self.page.write(|root| {
            let Some(stale) = self.write_live(|live| live.remove(target)) else {
                return false;
            };
            stale.cancel.cancel();
            debug!("[presenter] dismissed {} for {target}", stale.element_id);
            remove_element(root, &stale.element_id).is_ok()
        })
    }

    fn try_handle(&self, event: FailureEvent) -> Result<Outcome, PresenterError> {
        let target = event.target.ok_or(PresenterError::MissingTarget)?;
        if !self.config.is_markup(&event.content_type) {
            return Err(PresenterError::NotMarkup {
                content_type: event.content_type,
            });
        }

        // Parsing is detached from the page; nothing is mutated before the
        // error element is known to exist.
        let fragment = parse_fragment(&event.response_body);
        let extracted = extract(&fragment, &self.config)?;
        let directive = extracted.directive;
        trace!("[presenter] {target}: {directive:?}");

        let (element_id, cancel) = self.page.write(|root| {
            let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
            prune_orphans(root, &mut live);

            let anchor = resolve_anchor(root, &live, &target)?;
            let plan = resolve_placement(&directive, &anchor, &self.config);

            let mut displaced = None;
            if let Some(stale) = live.remove(&target) {
                stale.cancel.cancel();
                if plan.displaces(&stale.element_id) {
                    displaced = Some(stale.element_id);
                } else {
                    match remove_element(root, &stale.element_id) {
                        Ok(_) => trace!("[presenter] removed stale {}", stale.element_id),
                        // Already removed by the surrounding page
                        Err(TreeError::NotFound { .. }) => {}
                        Err(err) => return Err(PresenterError::from(err)),
                    }
                }
            }
            if let Anchor::Target(id) = &anchor {
                remove_untracked_markers(root, id, &live, &self.config);
            }

            let element = unique_ids(root, &target, extracted.element, displaced.as_deref());
            let element_id = element.id.clone();
            let stands_in = matches!(plan, MutationPlan::ReplaceAnchor { .. });
            plan.apply(root, element)?;

            let cancel = CancellationToken::new();
            live.insert(
                target.clone(),
                LiveError {
                    element_id: element_id.clone(),
                    stands_in,
                    cancel: cancel.clone(),
                },
            );
            Ok::<_, PresenterError>((element_id, cancel))
        })?;

        debug!(
            "[presenter] showing {element_id} for {target} ({})",
            directive.mode
        );

        let dismiss_after = directive.persistence();
        if let Some(delay) = dismiss_after {
            self.schedule_dismiss(target, element_id.clone(), delay, cancel);
        }

        Ok(Outcome::Shown {
            element_id,
            mode: directive.mode,
            dismiss_after,
        })
    }

    fn schedule_dismiss(
        &self,
        target: String,
        element_id: String,
        delay: Duration,
        cancel: CancellationToken,
    ) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("[presenter] no tokio runtime, {element_id} will not auto-dismiss");
            return;
        };

        // The delay counts from insertion, not from when the task first runs
        let deadline = tokio::time::Instant::now() + delay;
        let presenter = self.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    trace!("[presenter] auto-dismiss of {element_id} cancelled");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    presenter.expire(&target, &element_id);
                }
            }
        });
    }

    /// Remove `element_id` if it is still the live error for `target`.
    fn expire(&self, target: &str, element_id: &str) {
        self.page.write(|root| {
            let still_live = self.write_live(|live| {
                let current = live.get(target).is_some_and(|l| l.element_id == element_id);
                if current {
                    live.remove(target);
                }
                current
            });
            if still_live && remove_element(root, element_id).is_ok() {
                debug!("[presenter] auto-dismissed {element_id} for {target}");
            }
        });
    }

    fn read_live<R>(&self, f: impl FnOnce(&LiveMap) -> R) -> R {
        let guard = self.live.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    fn write_live<R>(&self, f: impl FnOnce(&mut LiveMap) -> R) -> R {
        let mut guard = self.live.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The target itself, or the error that replaced it and stands in for it.
fn resolve_anchor(
    root: &Element,
    live: &LiveMap,
    target: &str,
) -> Result<Anchor, PresenterError> {
    if pagedom::contains(root, target) {
        return Ok(Anchor::Target(target.to_string()));
    }

    match live.get(target) {
        Some(stale) if stale.stands_in && pagedom::contains(root, &stale.element_id) => {
            Ok(Anchor::StandIn(stale.element_id.clone()))
        }
        _ => Err(PresenterError::TargetDetached {
            target: target.to_string(),
        }),
    }
}

/// Drop entries whose error element the page removed on its own.
fn prune_orphans(root: &Element, live: &mut LiveMap) {
    live.retain(|target, l| {
        let present = pagedom::contains(root, &l.element_id);
        if !present {
            l.cancel.cancel();
            trace!("[presenter] {} for {target} left the page", l.element_id);
        }
        present
    });
}

/// Keep explicit ids in the error subtree unless they would clash with the
/// page, the target, or each other. Ids inside `displaced` are about to leave
/// the page, so sharing them is fine.
fn unique_ids(
    root: &Element,
    target: &str,
    mut element: Element,
    displaced: Option<&str>,
) -> Element {
    let displaced = displaced.and_then(|id| pagedom::find_element(root, id));
    let taken = |id: &str| {
        id == target
            || (pagedom::contains(root, id)
                && !displaced.is_some_and(|d| pagedom::contains(d, id)))
    };
    regenerate_taken(&mut element, &taken, &mut HashSet::new());
    element
}

fn regenerate_taken(
    element: &mut Element,
    taken: &impl Fn(&str) -> bool,
    seen: &mut HashSet<String>,
) {
    if !element.auto_id && (taken(element.id.as_str()) || !seen.insert(element.id.clone())) {
        trace!("[presenter] id {} already in use, generating one", element.id);
        *element = std::mem::take(element).regenerate_id();
    }
    if let Content::Children(children) = &mut element.content {
        for child in children {
            regenerate_taken(child, taken, seen);
        }
    }
}

/// Remove error-message siblings of the target that no presenter entry owns
/// (for example server-rendered errors). Matches on class alone, whatever
/// the tag.
fn remove_untracked_markers(
    root: &mut Element,
    target: &str,
    live: &LiveMap,
    config: &PresenterConfig,
) {
    let untracked: Vec<String> = match find_parent(root, target) {
        Some((parent, _)) => parent
            .content
            .children()
            .iter()
            .filter(|c| c.id != target && c.has_class(&config.marker_class))
            .filter(|c| !live.values().any(|l| l.element_id == c.id))
            .map(|c| c.id.clone())
            .collect(),
        None => return,
    };

    for id in untracked {
        if remove_element(root, &id).is_ok() {
            trace!("[presenter] removed untracked error {id}");
        }
    }
}
