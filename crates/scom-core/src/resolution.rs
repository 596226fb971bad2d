use serde::{Deserialize, Serialize};

/// Operator-defined resolution state. Codes are meant to be unique but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionState {
    pub label: String,
    pub value: String,
}

impl ResolutionState {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub fn default_resolution_states() -> Vec<ResolutionState> {
    [
        ("0 - New", "0"),
        ("200 - Closed", "200"),
        ("247 - Awaiting Evidence", "247"),
        ("248 - Assigned to Engineering", "248"),
        ("249 - Acknowledged", "249"),
        ("250 - Scheduled", "250"),
        ("254 - Resolved", "254"),
        ("255 - Custom", "255"),
    ]
    .into_iter()
    .map(|(label, value)| ResolutionState::new(label, value))
    .collect()
}

/// Label for a code, if the vocabulary knows it.
pub fn label_for<'a>(states: &'a [ResolutionState], value: &str) -> Option<&'a str> {
    states
        .iter()
        .find(|s| s.value == value)
        .map(|s| s.label.as_str())
}
