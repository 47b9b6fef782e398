use crate::domain::error::{AppError, Result};
use crate::domain::execution::Execution;
use crate::domain::recording::Recording;
use crate::domain::test_case::TestCase;
use once_cell::sync::Lazy;

const RECORDINGS_JSON: &str = include_str!("seeds/recordings.json");
const TEST_CASES_JSON: &str = include_str!("seeds/test_cases.json");
const EXECUTIONS_JSON: &str = include_str!("seeds/executions.json");

static EMBEDDED: Lazy<Result<SeedCatalog>> = Lazy::new(|| {
    Ok(SeedCatalog {
        recordings: parse_seed("recordings", RECORDINGS_JSON)?,
        test_cases: parse_seed("test cases", TEST_CASES_JSON)?,
        executions: parse_seed("executions", EXECUTIONS_JSON)?,
    })
});

/// Records each store starts with.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    pub recordings: Vec<Recording>,
    pub test_cases: Vec<TestCase>,
    pub executions: Vec<Execution>,
}

impl SeedCatalog {
    /// The demo data compiled into the binary.
    pub fn embedded() -> Result<Self> {
        (*EMBEDDED).clone()
    }
}

fn parse_seed<T: serde::de::DeserializeOwned>(label: &str, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::ParseError(format!("Failed to parse {} seed: {}", label, e)))
}
