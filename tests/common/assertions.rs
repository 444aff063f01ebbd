//! Domain-specific assertion macros for lcon harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *what* invariant was violated.

// ---------------------------------------------------------------------------
// Preview assertions
// ---------------------------------------------------------------------------

/// Assert that a `Preview` lists `name` with the expected value.
///
/// ```rust
/// assert_preview_has!(preview, "level", "INFO");
/// ```
#[macro_export]
macro_rules! assert_preview_has {
    ($preview:expr, $name:expr, $value:expr) => {{
        let preview: &lcon_core::Preview = &$preview;
        let name: &str = $name;
        let expected: &str = $value;
        match preview.get(name) {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_preview_has! failed:\n  preview[{:?}]\n  expected: {:?}\n  actual:   {:?}",
                name, expected, actual
            ),
            None => panic!(
                "assert_preview_has! failed: field {:?} not in preview.\n  Available: {:?}",
                name,
                preview.entries().iter().map(|e| &e.name).collect::<Vec<_>>()
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Host event ordering
// ---------------------------------------------------------------------------

/// Assert that every `Changed` event caused by an edit is immediately
/// preceded by a `Preview(None)` event. The first event (the initial
/// notification) is exempt.
pub fn assert_preview_cleared_before_each_change(events: &[crate::common::HostEvent]) {
    use crate::common::HostEvent;
    for (i, event) in events.iter().enumerate().skip(1) {
        if matches!(event, HostEvent::Changed(_)) {
            assert!(
                matches!(events[i - 1], HostEvent::Preview(None)),
                "change at index {} was not preceded by a preview clear.\n  events: {:#?}",
                i,
                events
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Annotation assertions
// ---------------------------------------------------------------------------

/// Assert that an annotation text mentions every given fragment.
///
/// ```rust
/// assert_annotation_mentions!(text, "Stream One", "d1");
/// ```
#[macro_export]
macro_rules! assert_annotation_mentions {
    ($text:expr, $($fragment:expr),+ $(,)?) => {{
        let text: &str = &$text;
        $(
            let fragment: &str = $fragment;
            if !text.contains(fragment) {
                panic!(
                    "assert_annotation_mentions! failed: {:?} not found in\n  {:?}",
                    fragment, text
                );
            }
        )+
    }};
}
