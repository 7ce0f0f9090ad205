use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processing mode chosen before any option can be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Scheduled,
    Realtime,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Scheduled => "scheduled",
            Mode::Realtime => "realtime",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown processing mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "scheduled" => Ok(Mode::Scheduled),
            "realtime" => Ok(Mode::Realtime),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

pub type OptionId = u32;

/// One entry of the option catalogue served for a mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOption {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub processing_stage: Option<String>,
    #[serde(default)]
    pub storage_type: Option<String>,
    /// Presentation-only fields (flow, advantages, ...) kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
