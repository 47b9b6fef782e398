use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Recorder,
    TestCases,
    Execution,
}

/// Lifecycle of the recording simulator as seen by the workbench.
///
/// `Idle -> Recording` on start, `Recording -> Stopping` on manual or automatic
/// stop, `Stopping -> Idle` once the recording has been handed to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderPhase {
    #[default]
    Idle,
    Recording,
    Stopping,
}

impl RecorderPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderPhase::Idle => "idle",
            RecorderPhase::Recording => "recording",
            RecorderPhase::Stopping => "stopping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Manual,
    Ceiling,
}
