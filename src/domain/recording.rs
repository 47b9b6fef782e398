use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds of simulated activity attributed to each recorded action.
pub const SECONDS_PER_ACTION: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Click,
    Type,
    Navigate,
    Scroll,
    Hover,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::Click,
        ActionType::Type,
        ActionType::Navigate,
        ActionType::Scroll,
        ActionType::Hover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Click => "click",
            ActionType::Type => "type",
            ActionType::Navigate => "navigate",
            ActionType::Scroll => "scroll",
            ActionType::Hover => "hover",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Button,
    Input,
    Link,
    Dropdown,
    Checkbox,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Button,
        ElementKind::Input,
        ElementKind::Link,
        ElementKind::Dropdown,
        ElementKind::Checkbox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::Link => "link",
            ElementKind::Dropdown => "dropdown",
            ElementKind::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated user interaction captured during a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub element: ElementKind,
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Recording {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub duration: u64,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by the recording store's `create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecording {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub duration: u64,
}

/// The in-progress recording buffer edited by the workbench.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingDraft {
    pub name: String,
    pub url: String,
    pub actions: Vec<Action>,
}

impl RecordingDraft {
    pub fn is_ready(&self) -> bool {
        !self.name.trim().is_empty() && !self.url.trim().is_empty()
    }

    pub fn duration(&self) -> u64 {
        self.actions.len() as u64 * SECONDS_PER_ACTION
    }

    pub fn to_new_recording(&self) -> NewRecording {
        NewRecording {
            name: self.name.clone(),
            url: self.url.clone(),
            actions: self.actions.clone(),
            duration: self.duration(),
        }
    }
}
