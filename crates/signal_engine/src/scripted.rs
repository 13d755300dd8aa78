//! ScriptedSlot - slot behavior declared in configuration

use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;

use contracts::{Args, BoxError, SlotBehavior, SlotConfig, SlotHandler, Value};

/// Slot that reports a configured constant, echoes an argument or fails
#[derive(Debug, Clone)]
pub struct ScriptedSlot {
    name: String,
    arity: usize,
    delay: Duration,
    behavior: SlotBehavior,
}

impl ScriptedSlot {
    /// Create a scripted slot for a signal taking `arity` arguments
    pub fn new(config: &SlotConfig, arity: usize) -> Self {
        Self {
            name: config.name.clone(),
            arity,
            delay: Duration::from_millis(config.delay_ms),
            behavior: config.behavior.clone(),
        }
    }

    /// Slot name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SlotHandler for ScriptedSlot {
    fn arity(&self) -> usize {
        self.arity
    }

    async fn call(&self, args: Args) -> Result<Value, BoxError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        trace!(slot = %self.name, behavior = ?self.behavior, "Scripted slot reporting");

        match &self.behavior {
            SlotBehavior::Constant { value } => Ok(value.clone()),
            SlotBehavior::Echo { index } => args.get(*index).cloned().ok_or_else(|| {
                format!(
                    "slot '{}' echoes argument {index} but only {} were emitted",
                    self.name,
                    args.len()
                )
                .into()
            }),
            SlotBehavior::Fail { message } => Err(message.clone().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Instant;

    fn config(behavior: SlotBehavior, delay_ms: u64) -> SlotConfig {
        SlotConfig {
            name: "scripted".to_string(),
            delay_ms,
            behavior,
        }
    }

    #[tokio::test]
    async fn test_constant_and_echo() {
        let args: Args = vec![json!("a"), json!(2)].into();

        let constant = ScriptedSlot::new(
            &config(SlotBehavior::Constant { value: json!({"ok": true}) }, 0),
            2,
        );
        assert_eq!(constant.call(Arc::clone(&args)).await.unwrap(), json!({"ok": true}));

        let echo = ScriptedSlot::new(&config(SlotBehavior::Echo { index: 1 }, 0), 2);
        assert_eq!(echo.call(args).await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_fail_and_out_of_range_echo() {
        let fail = ScriptedSlot::new(
            &config(
                SlotBehavior::Fail {
                    message: "storage offline".to_string(),
                },
                0,
            ),
            0,
        );
        let err = fail.call(Args::from(vec![])).await.unwrap_err();
        assert_eq!(err.to_string(), "storage offline");

        let echo = ScriptedSlot::new(&config(SlotBehavior::Echo { index: 3 }, 0), 1);
        let err = echo.call(vec![json!(1)].into()).await.unwrap_err();
        assert!(err.to_string().contains("echoes argument 3"), "{err}");
    }

    #[tokio::test]
    async fn test_delay_before_reporting() {
        let slot = ScriptedSlot::new(&config(SlotBehavior::Constant { value: json!(1) }, 25), 0);
        assert_eq!(slot.arity(), 0);
        assert_eq!(slot.name(), "scripted");

        let started = Instant::now();
        slot.call(Args::from(vec![])).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(25));
    }
}
