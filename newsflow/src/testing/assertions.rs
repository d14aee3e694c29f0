//! Assertions over result sets and diagnostics.

use crate::content::ResultSet;
use crate::events::CollectingEventSink;

/// Asserts that the result set is numbered `1..=N` without gaps.
pub fn assert_contiguous_indices(result_set: &ResultSet) {
    let indices: Vec<usize> = result_set.iter().map(|(i, _)| i).collect();
    let expected: Vec<usize> = (1..=result_set.len()).collect();
    assert_eq!(indices, expected, "Expected contiguous indices 1..={}", result_set.len());
}

/// Asserts that the titles appear in the given order.
pub fn assert_titles(result_set: &ResultSet, expected: &[&str]) {
    let titles: Vec<&str> = result_set.iter().map(|(_, a)| a.title.as_str()).collect();
    assert_eq!(titles, expected, "Unexpected titles or order");
}

/// Asserts that no collected event payload contains `secret`.
pub fn assert_secret_not_emitted(sink: &CollectingEventSink, secret: &str) {
    assert!(
        !sink.any_payload_mentions(secret),
        "Secret value leaked into an event payload: {:?}",
        sink.event_types()
    );
}
