use crate::domain::recording::{ActionType, ElementKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseStatus {
    #[default]
    Draft,
    Ready,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position within the test case.
    pub id: u32,
    pub action: ActionType,
    pub element: ElementKind,
    pub value: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expected_results: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub status: TestCaseStatus,
    pub created_at: DateTime<Utc>,
}

/// Test case under construction, either synthesized from a recording or
/// authored by hand. Also the payload of the test case store's `create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expected_results: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TestCaseDraft {
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
