//! Built-in result-processing policies.

use serde::{Deserialize, Serialize};

/// How a signal reduces its slots' results into one outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Ordered array of every slot result
    #[default]
    Collect,
    /// Boolean AND of every slot result, `true` with no slots
    Veto,
    /// Always `null`
    Discard,
}

impl Policy {
    /// Policy name as written in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Veto => "veto",
            Self::Discard => "discard",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
