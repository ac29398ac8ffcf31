//! Structured explanations attached to states and surfaced in the final report.

use serde::{Deserialize, Serialize};

/// A single append-only justification entry. `link` is an optional pointer
/// to further reading (an advisory ID, a changelog URL, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Justification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Justification {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}
