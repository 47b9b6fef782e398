use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
}

/// A single run of a test case. `test_case_id` is a copied reference, not a
/// checked foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Execution {
    pub id: String,
    pub test_case_id: String,
    #[serde(default)]
    pub test_case_title: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExecution {
    pub test_case_id: String,
    #[serde(default)]
    pub test_case_title: String,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}
