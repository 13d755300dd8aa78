//! HookRegistry - named signals built from a `HookBlueprint`

use std::sync::Arc;

use tracing::{info, instrument};

use contracts::{HookBlueprint, SignalConfig, SignalError};

use crate::scripted::ScriptedSlot;
use crate::signal::Signal;
use crate::slot::Slot;

/// Named hook points, in declaration order
#[derive(Debug, Default)]
pub struct HookRegistry {
    signals: Vec<Arc<Signal>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one signal per configured hook point and register its scripted slots
    ///
    /// # Errors
    /// The first construction or registration error.
    #[instrument(
        name = "hook_registry_from_blueprint",
        skip(blueprint),
        fields(signals = blueprint.signals.len())
    )]
    pub fn from_blueprint(blueprint: &HookBlueprint) -> Result<Self, SignalError> {
        let mut registry = Self::new();
        for config in &blueprint.signals {
            registry.insert(build_signal(config)?);
        }

        info!(
            signals = registry.len(),
            slots = blueprint.slot_count(),
            "Hook registry built"
        );
        Ok(registry)
    }

    /// Add a signal, replacing any signal with the same name
    pub fn insert(&mut self, signal: Signal) -> Arc<Signal> {
        let signal = Arc::new(signal);
        match self.position(signal.name()) {
            Some(index) => self.signals[index] = Arc::clone(&signal),
            None => self.signals.push(Arc::clone(&signal)),
        }
        signal
    }

    /// Look up a signal by name
    pub fn get(&self, name: &str) -> Option<Arc<Signal>> {
        self.position(name).map(|index| Arc::clone(&self.signals[index]))
    }

    /// Signal names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|s| s.name())
    }

    /// Number of signals
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Whether the registry holds no signal
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|s| s.name() == name)
    }
}

fn build_signal(config: &SignalConfig) -> Result<Signal, SignalError> {
    let signal = Signal::with_policy(config.policy, config.param_count)?.with_name(&config.name);
    for slot in &config.slots {
        signal.register(Slot::from_handler(ScriptedSlot::new(
            slot,
            signal.param_count(),
        )))?;
    }
    Ok(signal)
}
