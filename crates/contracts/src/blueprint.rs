//! HookBlueprint - Config Loader output
//!
//! Describes a set of named hook points: parameter count, result policy and
//! the scripted slots attached at startup.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Policy, Value};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete hook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HookBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Hook point definitions
    #[serde(default)]
    #[validate(nested)]
    pub signals: Vec<SignalConfig>,
}

impl HookBlueprint {
    /// Total number of scripted slots across all signals
    pub fn slot_count(&self) -> usize {
        self.signals.iter().map(|s| s.slots.len()).sum()
    }
}

/// One hook point
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignalConfig {
    /// Unique name
    #[validate(length(min = 1, message = "signal name cannot be empty"))]
    pub name: String,

    /// Number of data arguments, must be >= 0
    #[validate(range(min = 0, message = "param_count must be >= 0"))]
    pub param_count: i64,

    /// Result policy
    #[serde(default)]
    pub policy: Policy,

    /// Slots registered in declaration order
    #[serde(default)]
    #[validate(nested)]
    pub slots: Vec<SlotConfig>,
}

/// Scripted slot declaration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SlotConfig {
    /// Name, unique within its signal
    #[validate(length(min = 1, message = "slot name cannot be empty"))]
    pub name: String,

    /// Delay before the slot reports (milliseconds)
    #[serde(default)]
    pub delay_ms: u64,

    /// What the slot reports
    pub behavior: SlotBehavior,
}

/// Outcome produced by a scripted slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotBehavior {
    /// Report a fixed value
    Constant { value: Value },
    /// Report the emitted argument at `index`
    Echo { index: usize },
    /// Report an error with `message`
    Fail { message: String },
}
