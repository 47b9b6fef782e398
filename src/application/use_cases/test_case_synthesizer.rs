use crate::domain::recording::{Action, Recording};
use crate::domain::test_case::{Step, TestCaseDraft};
use std::collections::BTreeSet;

pub const TITLE_PREFIX: &str = "AI Generated: ";

pub const EXPECTED_RESULTS: [&str; 4] = [
    "All actions execute without errors",
    "Page loads successfully",
    "No console errors",
    "All elements are accessible",
];

pub const TAGS: [&str; 3] = ["ai-generated", "automated", "functional"];

/// Builds a reviewable test case draft from a recording. Pure and
/// deterministic: the same recording always yields the same draft.
pub fn synthesize_test_case(recording: &Recording) -> TestCaseDraft {
    TestCaseDraft {
        title: format!("{}{}", TITLE_PREFIX, recording.name),
        description: format!(
            "Automated test case generated from recording on {}",
            recording.url
        ),
        steps: recording
            .actions
            .iter()
            .enumerate()
            .map(|(index, action)| step_for(index, action))
            .collect(),
        expected_results: EXPECTED_RESULTS.iter().map(|s| s.to_string()).collect(),
        tags: TAGS.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
    }
}

fn step_for(index: usize, action: &Action) -> Step {
    Step {
        id: index as u32 + 1,
        action: action.action_type,
        element: action.element,
        value: action.value.clone(),
        expected: format!(
            "Should successfully {} {}",
            action.action_type, action.element
        ),
    }
}
