use crate::domain::execution::{Execution, NewExecution};
use crate::domain::recording::{NewRecording, Recording};
use crate::domain::test_case::{TestCase, TestCaseDraft, TestCaseStatus};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record kept by [`super::MockStore`].
pub trait StoreEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Payload accepted by `create`.
    type Draft: Send + 'static;

    /// Used in error messages, e.g. "Recording not found".
    const LABEL: &'static str;
    /// JSON key of the server-assigned timestamp. Never overwritten by `update`.
    const TIMESTAMP_KEY: &'static str;

    fn id(&self) -> &str;
    fn from_draft(draft: Self::Draft, id: String, created_at: DateTime<Utc>) -> Self;
}

impl StoreEntity for Recording {
    type Draft = NewRecording;

    const LABEL: &'static str = "Recording";
    const TIMESTAMP_KEY: &'static str = "createdAt";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: NewRecording, id: String, created_at: DateTime<Utc>) -> Self {
        Recording {
            id,
            name: draft.name,
            url: draft.url,
            actions: draft.actions,
            duration: draft.duration,
            created_at,
        }
    }
}

impl StoreEntity for TestCase {
    type Draft = TestCaseDraft;

    const LABEL: &'static str = "Test case";
    const TIMESTAMP_KEY: &'static str = "createdAt";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: TestCaseDraft, id: String, created_at: DateTime<Utc>) -> Self {
        TestCase {
            id,
            title: draft.title,
            description: draft.description,
            steps: draft.steps,
            expected_results: draft.expected_results,
            tags: draft.tags,
            status: TestCaseStatus::Draft,
            created_at,
        }
    }
}

impl StoreEntity for Execution {
    type Draft = NewExecution;

    const LABEL: &'static str = "Execution";
    const TIMESTAMP_KEY: &'static str = "startTime";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: NewExecution, id: String, created_at: DateTime<Utc>) -> Self {
        Execution {
            id,
            test_case_id: draft.test_case_id,
            test_case_title: draft.test_case_title,
            start_time: created_at,
            status: draft.status,
            duration_ms: draft.duration_ms,
            notes: draft.notes,
        }
    }
}
