use errata::{ErrorPresenter, FailureEvent, Outcome, Page, PlacementMode, PresenterError};
use pagedom::render::inline_style;
use pagedom::{Element, find_element};

const PAGE: &str = r#"<main id="main"><p id="intro">Hi</p><form id="signup"><input name="email"></form><footer id="foot"></footer></main>"#;

fn response(mode: Option<&str>, persistence: Option<&str>, message: &str) -> String {
    let mut body = String::new();
    if let Some(mode) = mode {
        body.push_str(&format!(r#"<input type="hidden" name="mode" value="{mode}">"#));
    }
    if let Some(persistence) = persistence {
        body.push_str(&format!(
            r#"<input type="hidden" name="persistence" value="{persistence}">"#
        ));
    }
    body.push_str(&format!(r#"<div class="error-message">{message}</div>"#));
    body
}

fn setup() -> (Page, ErrorPresenter) {
    let page = Page::from_markup(PAGE);
    let presenter = ErrorPresenter::new(page.clone());
    (page, presenter)
}

/// Children of `parent`, errors shown as `error`.
fn layout(page: &Page, parent: &str) -> Vec<String> {
    page.read(|root| {
        find_element(root, parent)
            .map(|p| {
                p.content
                    .children()
                    .iter()
                    .map(|c| {
                        if c.has_class("error-message") {
                            "error".to_string()
                        } else {
                            c.id.clone()
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn show(presenter: &ErrorPresenter, mode: &str) -> Outcome {
    presenter.handle(FailureEvent::html(
        "signup",
        response(Some(mode), None, "Could not save"),
    ))
}

// =============================================================================
// Inline Placement Tests
// =============================================================================

#[test]
fn test_replace_substitutes_target() {
    let (page, presenter) = setup();

    let outcome = show(&presenter, "replace");

    assert!(outcome.is_shown());
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"]);
    assert!(!page.contains("signup"));
}

#[test]
fn test_above_inserts_before_target() {
    let (page, presenter) = setup();

    show(&presenter, "above");

    assert_eq!(layout(&page, "main"), vec!["intro", "error", "signup", "foot"]);
}

#[test]
fn test_below_inserts_after_target() {
    let (page, presenter) = setup();

    show(&presenter, "below");

    assert_eq!(layout(&page, "main"), vec!["intro", "signup", "error", "foot"]);
}

#[test]
fn test_missing_mode_defaults_to_below() {
    let (page, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::html("signup", response(None, None, "x")));

    assert!(matches!(
        outcome,
        Outcome::Shown {
            mode: PlacementMode::Below,
            dismiss_after: None,
            ..
        }
    ));
    assert_eq!(layout(&page, "main"), vec!["intro", "signup", "error", "foot"]);
}

#[test]
fn test_unknown_mode_places_like_below() {
    let (below_page, below) = setup();
    let (sideways_page, sideways) = setup();

    show(&below, "below");
    show(&sideways, "sideways");

    assert_eq!(layout(&sideways_page, "main"), layout(&below_page, "main"));
}

#[test]
fn test_mode_is_case_insensitive() {
    for keyword in ["REPLACE", "Replace", "replace"] {
        let (page, presenter) = setup();

        let outcome = show(&presenter, keyword);

        assert!(
            matches!(outcome, Outcome::Shown { mode: PlacementMode::Replace, .. }),
            "{keyword}"
        );
        assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"], "{keyword}");
    }
}

#[test]
fn test_error_markup_is_kept() {
    let (page, presenter) = setup();

    presenter.handle(FailureEvent::html(
        "signup",
        r#"<div class="error-message alert" role="alert"><strong>Oops</strong> try again</div>"#,
    ));

    let rendered = page.render();
    assert!(rendered.contains(
        r#"</form><div class="error-message alert" role="alert"><strong>Oops</strong> try again</div><footer"#
    ));
}

// =============================================================================
// Toast Placement Tests
// =============================================================================

fn toast_cases() -> Vec<(&'static str, &'static str)> {
    vec![
        ("toast_tr", "top: 10px; right: 10px"),
        ("toast_tm", "top: 10px; left: 50%; transform: translateX(-50%)"),
        ("toast_tl", "top: 10px; left: 10px"),
        ("toast_br", "right: 10px; bottom: 10px"),
        ("toast_bm", "bottom: 10px; left: 50%; transform: translateX(-50%)"),
        ("toast_bl", "bottom: 10px; left: 10px"),
    ]
}

#[test]
fn test_toasts_attach_to_page_root_with_fixed_layout() {
    for (keyword, offsets) in toast_cases() {
        let (page, presenter) = setup();

        let outcome = show(&presenter, keyword);
        let id = outcome.element_id().expect("toast shown").to_string();

        // Target untouched, toast is the root's last child
        assert_eq!(layout(&page, "main"), vec!["intro", "signup", "foot"], "{keyword}");
        assert_eq!(layout(&page, "body").last().map(String::as_str), Some("error"));

        let toast = page.element(&id).expect("toast in page");
        assert_eq!(
            inline_style(&toast).as_deref(),
            Some(format!("position: fixed; z-index: 1000; padding: 10px; {offsets}").as_str()),
            "{keyword}"
        );
    }
}

#[test]
fn test_toast_keywords_are_case_insensitive() {
    let (page, presenter) = setup();

    let outcome = show(&presenter, "TOAST_BL");

    assert!(matches!(
        outcome,
        Outcome::Shown { mode: PlacementMode::ToastBottomLeft, .. }
    ));
    assert_eq!(layout(&page, "body").last().map(String::as_str), Some("error"));
}

#[test]
fn test_toast_from_nested_target_still_goes_to_root() {
    let page = Page::from_markup(
        r#"<section id="s"><div id="wrap"><button id="save"></button></div></section>"#,
    );
    let presenter = ErrorPresenter::new(page.clone());

    presenter.handle(FailureEvent::html("save", response(Some("toast_tm"), None, "x")));

    assert_eq!(layout(&page, "body"), vec!["s", "error"]);
    assert_eq!(layout(&page, "wrap"), vec!["save"]);
}

// =============================================================================
// Stale Element Cleanup Tests
// =============================================================================

#[test]
fn test_consecutive_failures_leave_one_error() {
    let (page, presenter) = setup();

    presenter.handle(FailureEvent::html("signup", response(None, None, "first")));
    let second = presenter.handle(FailureEvent::html("signup", response(None, None, "second")));

    let errors = page.ids_with_class("error-message");
    assert_eq!(errors.len(), 1);
    assert_eq!(second.element_id(), Some(errors[0].as_str()));
    assert_eq!(page.element(&errors[0]).map(|e| e.text_content()), Some("second".to_string()));
    assert_eq!(presenter.live_count(), 1);
}

#[test]
fn test_toast_replaced_by_inline_error() {
    let (page, presenter) = setup();

    show(&presenter, "toast_tr");
    show(&presenter, "above");

    assert_eq!(page.ids_with_class("error-message").len(), 1);
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "signup", "foot"]);
    assert_eq!(layout(&page, "body"), vec!["main"]);
}

#[test]
fn test_inline_error_replaced_by_toast() {
    let (page, presenter) = setup();

    show(&presenter, "below");
    show(&presenter, "toast_br");

    assert_eq!(page.ids_with_class("error-message").len(), 1);
    assert_eq!(layout(&page, "main"), vec!["intro", "signup", "foot"]);
    assert_eq!(layout(&page, "body"), vec!["main", "error"]);
}

#[test]
fn test_replaced_target_is_anchored_by_its_error() {
    let (page, presenter) = setup();

    show(&presenter, "replace");
    let outcome = show(&presenter, "below");

    assert!(outcome.is_shown());
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"]);
    assert_eq!(page.ids_with_class("error-message").len(), 1);
}

#[test]
fn test_stand_in_persists_across_inline_failures() {
    let (page, presenter) = setup();

    show(&presenter, "replace");
    show(&presenter, "above");
    let third = show(&presenter, "below");

    assert!(third.is_shown());
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"]);
}

#[test]
fn test_replaced_target_then_toast() {
    let (page, presenter) = setup();

    show(&presenter, "replace");
    show(&presenter, "toast_tl");

    assert_eq!(layout(&page, "main"), vec!["intro", "foot"]);
    assert_eq!(layout(&page, "body"), vec!["main", "error"]);
}

#[test]
fn test_untracked_sibling_error_removed() {
    let page = Page::from_markup(
        r#"<main id="main"><div id="old" class="error-message">server said no</div><form id="signup"></form></main>"#,
    );
    let presenter = ErrorPresenter::new(page.clone());

    presenter.handle(FailureEvent::html("signup", response(None, None, "new")));

    assert!(!page.contains("old"));
    assert_eq!(layout(&page, "main"), vec!["signup", "error"]);
}

#[test]
fn test_untracked_sibling_error_of_any_tag_removed() {
    let page = Page::from_markup(
        r#"<main id="main"><p id="old" class="error-message">server said no</p><form id="signup"></form></main>"#,
    );
    let presenter = ErrorPresenter::new(page.clone());

    presenter.handle(FailureEvent::html("signup", response(None, None, "new")));

    assert!(!page.contains("old"));
    assert_eq!(layout(&page, "main"), vec!["signup", "error"]);
}

#[test]
fn test_errors_for_different_targets_coexist() {
    let page = Page::from_markup(
        r#"<main id="main"><form id="a"></form><form id="b"></form></main>"#,
    );
    let presenter = ErrorPresenter::new(page.clone());

    presenter.handle(FailureEvent::html("a", response(None, None, "a failed")));
    presenter.handle(FailureEvent::html("b", response(None, None, "b failed")));
    presenter.handle(FailureEvent::html("a", response(None, None, "a failed again")));

    assert_eq!(layout(&page, "main"), vec!["a", "error", "b", "error"]);
    assert_eq!(presenter.live_count(), 2);
}

#[test]
fn test_explicit_error_id_kept_across_failures() {
    let (page, presenter) = setup();
    let body = r#"<div id="signup-error" class="error-message">nope</div>"#;

    presenter.handle(FailureEvent::html("signup", body));
    presenter.handle(FailureEvent::html("signup", body));

    assert_eq!(presenter.live_error("signup").as_deref(), Some("signup-error"));
    assert_eq!(page.ids_with_class("error-message"), vec!["signup-error".to_string()]);
}

#[test]
fn test_clashing_error_id_is_regenerated() {
    let (page, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::html(
        "signup",
        r#"<div id="intro" class="error-message">nope</div>"#,
    ));

    let id = outcome.element_id().expect("shown");
    assert_ne!(id, "intro");
    assert_eq!(page.element("intro").map(|e| e.tag), Some("p".to_string()));
}

#[test]
fn test_nested_clashing_id_is_regenerated() {
    let (page, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::html(
        "signup",
        r#"<div class="error-message"><b id="intro">nope</b></div>"#,
    ));

    let error = page.element(outcome.element_id().expect("shown")).unwrap();
    let nested = &error.content.children()[0];
    assert_eq!(nested.tag, "b");
    assert_ne!(nested.id, "intro");
    assert_eq!(page.element("intro").map(|e| e.tag), Some("p".to_string()));
}

#[test]
fn test_nested_target_id_does_not_hijack_stand_in() {
    let (page, presenter) = setup();

    let first = presenter.handle(FailureEvent::html(
        "signup",
        r#"<input name="mode" value="replace"><div class="error-message"><span id="signup">x</span></div>"#,
    ));
    assert!(first.is_shown());
    assert!(!page.contains("signup"));

    let second = show(&presenter, "above");

    assert!(second.is_shown());
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"]);
    assert_eq!(page.ids_with_class("error-message").len(), 1);
}

#[test]
fn test_nested_ids_of_displaced_error_are_kept() {
    let (page, presenter) = setup();
    let body = r#"<input name="mode" value="replace"><div class="error-message"><span id="detail">x</span></div>"#;

    presenter.handle(FailureEvent::html("signup", body));
    presenter.handle(FailureEvent::html("signup", body));

    assert!(page.contains("detail"));
    assert_eq!(layout(&page, "main"), vec!["intro", "error", "foot"]);
}

#[test]
fn test_duplicate_ids_within_error_are_regenerated() {
    let (page, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::html(
        "signup",
        r#"<div class="error-message"><i id="dup">a</i><i id="dup">b</i></div>"#,
    ));

    let error = page.element(outcome.element_id().expect("shown")).unwrap();
    let ids: Vec<&str> = error
        .content
        .children()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids[0], "dup");
    assert_ne!(ids[1], "dup");
}

// =============================================================================
// Guard Tests
// =============================================================================

#[test]
fn test_non_markup_response_is_ignored() {
    let (page, presenter) = setup();
    let before = page.render();

    let outcome = presenter.handle(FailureEvent::new(
        "signup",
        response(Some("replace"), None, "x"),
        "application/json",
    ));

    assert_eq!(
        outcome,
        Outcome::Skipped(PresenterError::NotMarkup {
            content_type: "application/json".to_string()
        })
    );
    assert_eq!(page.render(), before);
}

#[test]
fn test_empty_content_type_is_ignored() {
    let (page, presenter) = setup();
    let before = page.render();

    let outcome = presenter.handle(FailureEvent::new("signup", response(None, None, "x"), ""));

    assert!(!outcome.is_shown());
    assert_eq!(page.render(), before);
}

#[test]
fn test_content_type_parameters_and_case() {
    let (_, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::new(
        "signup",
        response(None, None, "x"),
        "TEXT/HTML; charset=UTF-8",
    ));

    assert!(outcome.is_shown());
}

#[test]
fn test_missing_marker_is_ignored() {
    let (page, presenter) = setup();
    let before = page.render();
    let body = r#"<input type="hidden" name="mode" value="replace"><input type="hidden" name="persistence" value="3000"><p>error</p>"#;

    let outcome = presenter.handle(FailureEvent::html("signup", body));

    assert_eq!(
        outcome,
        Outcome::Skipped(PresenterError::MissingMarker {
            class: "error-message".to_string()
        })
    );
    assert_eq!(page.render(), before);
}

#[test]
fn test_missing_marker_keeps_previous_error() {
    let (page, presenter) = setup();
    show(&presenter, "below");
    let before = page.render();

    presenter.handle(FailureEvent::html("signup", "<p>no marker here</p>"));

    assert_eq!(page.render(), before);
    assert!(presenter.live_error("signup").is_some());
}

#[test]
fn test_marker_must_be_a_div() {
    let (page, presenter) = setup();
    let before = page.render();

    let outcome =
        presenter.handle(FailureEvent::html("signup", r#"<span class="error-message">x</span>"#));

    assert!(!outcome.is_shown());
    assert_eq!(page.render(), before);
}

#[test]
fn test_missing_target_is_ignored() {
    let (page, presenter) = setup();
    let before = page.render();

    let outcome = presenter.handle(FailureEvent::untargeted(
        response(None, None, "x"),
        "text/html",
    ));

    assert_eq!(outcome, Outcome::Skipped(PresenterError::MissingTarget));
    assert_eq!(page.render(), before);
}

#[test]
fn test_detached_target_is_ignored() {
    let (page, presenter) = setup();
    let before = page.render();

    let outcome = presenter.handle(FailureEvent::html("ghost", response(None, None, "x")));

    assert_eq!(
        outcome,
        Outcome::Skipped(PresenterError::TargetDetached {
            target: "ghost".to_string()
        })
    );
    assert_eq!(page.render(), before);
}

#[test]
fn test_persistence_without_runtime_keeps_element() {
    let (page, presenter) = setup();

    let outcome = presenter.handle(FailureEvent::html(
        "signup",
        response(None, Some("3000"), "x"),
    ));

    let id = outcome.element_id().expect("shown").to_string();
    assert!(page.contains(&id));
}

// =============================================================================
// Dismiss Tests
// =============================================================================

#[test]
fn test_dismiss_removes_live_error() {
    let (page, presenter) = setup();
    show(&presenter, "above");

    assert!(presenter.dismiss("signup"));

    assert_eq!(layout(&page, "main"), vec!["intro", "signup", "foot"]);
    assert!(presenter.live_error("signup").is_none());
    assert!(!presenter.dismiss("signup"));
}

#[test]
fn test_dismiss_after_page_removed_element() {
    let (page, presenter) = setup();
    let id = show(&presenter, "above").element_id().unwrap().to_string();

    page.write(|root| pagedom::mutate::remove_element(root, &id)).unwrap();

    assert!(!presenter.dismiss("signup"));
    assert_eq!(presenter.live_count(), 0);
}

#[test]
fn test_error_removed_by_page_then_new_failure() {
    let (page, presenter) = setup();
    let id = show(&presenter, "below").element_id().unwrap().to_string();
    page.write(|root| pagedom::mutate::remove_element(root, &id)).unwrap();

    let outcome = show(&presenter, "below");

    assert!(outcome.is_shown());
    assert_eq!(layout(&page, "main"), vec!["intro", "signup", "error", "foot"]);
}

#[test]
fn test_live_entry_dropped_when_page_removes_error() {
    let page = Page::from_markup(
        r#"<main id="main"><form id="a"></form></main><aside id="side"><form id="b"></form></aside>"#,
    );
    let presenter = ErrorPresenter::new(page.clone());
    show_on(&presenter, "a");
    page.write(|root| pagedom::mutate::remove_element(root, "main")).unwrap();

    show_on(&presenter, "b");

    assert!(presenter.live_error("a").is_none());
    assert_eq!(presenter.live_count(), 1);
    assert_eq!(layout(&page, "side"), vec!["b", "error"]);
}

#[test]
fn test_presenter_on_built_page() {
    let page = Page::new(
        Element::new("body")
            .id("root")
            .child(Element::new("button").id("go")),
    );
    let presenter = ErrorPresenter::new(page.clone());

    show_on(&presenter, "go");

    assert_eq!(layout(&page, "root"), vec!["go", "error"]);
}

fn show_on(presenter: &ErrorPresenter, target: &str) -> Outcome {
    presenter.handle(FailureEvent::html(target, response(None, None, "x")))
}
