//! Property-based test generators using proptest.
//!
//! Provides strategies for document text and for editing sessions.

use proptest::prelude::*;
use std::time::Duration;

/// Strategy for arbitrary document text, including empty text and any
/// Unicode scalar values.
pub fn document_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        2 => whitespace_text_strategy(),
        6 => any::<String>(),
        3 => prop::string::string_regex("[a-zA-Z0-9 ,.!?\n\t]{0,512}").expect("Invalid regex"),
    ]
}

/// Strategy for text made only of whitespace.
pub fn whitespace_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \t\r\n]{1,64}").expect("Invalid regex")
}

/// One step of a simulated editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// The editor text becomes this value.
    Type(String),
    /// The user stops typing for this long.
    Pause(Duration),
    /// The user presses Save Now.
    SaveNow,
}

/// Strategy for a burst of edits, each following the previous one within
/// `max_gap`. The last element is the final text.
pub fn edit_burst_strategy(
    max_gap: Duration,
    min_edits: usize,
    max_edits: usize,
) -> impl Strategy<Value = Vec<(String, Duration)>> {
    let max_gap_ms = max_gap.as_millis().max(1) as u64;
    prop::collection::vec(
        (
            prop::string::string_regex("[a-z ]{1,32}").expect("Invalid regex"),
            0..max_gap_ms,
        )
            .prop_map(|(text, gap)| (text, Duration::from_millis(gap))),
        min_edits..max_edits,
    )
}

/// Strategy for a mixed editing session.
pub fn edit_session_strategy(max_steps: usize) -> impl Strategy<Value = Vec<EditStep>> {
    let step = prop_oneof![
        5 => prop::string::string_regex("[a-c]{0,3}")
            .expect("Invalid regex")
            .prop_map(EditStep::Type),
        3 => (0u64..4000).prop_map(|ms| EditStep::Pause(Duration::from_millis(ms))),
        1 => Just(EditStep::SaveNow),
    ];
    prop::collection::vec(step, 1..max_steps)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
