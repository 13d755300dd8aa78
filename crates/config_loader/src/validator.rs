//! 配置校验模块
//!
//! 校验规则：
//! - 字段规则 (derive `Validate`)：名称非空，param_count >= 0
//! - signal name 唯一
//! - 同一 signal 内 slot name 唯一
//! - echo slot 的 index < param_count

use std::collections::HashSet;

use ::validator::Validate;
use contracts::{ContractError, HookBlueprint, SignalConfig, SlotBehavior};

/// 校验 HookBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &HookBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_signal_names(blueprint)?;
    for signal in &blueprint.signals {
        validate_slot_names(signal)?;
        validate_echo_indices(signal)?;
    }
    Ok(())
}

/// 字段级规则
fn validate_fields(blueprint: &HookBlueprint) -> Result<(), ContractError> {
    blueprint
        .validate()
        .map_err(|e| ContractError::config_validation("signals", e.to_string()))
}

/// 校验 signal name 唯一性
fn validate_signal_names(blueprint: &HookBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for signal in &blueprint.signals {
        if !seen.insert(signal.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("signals[name={}]", signal.name),
                "duplicate signal name",
            ));
        }
    }
    Ok(())
}

/// 校验 slot name 唯一性 (signal 内)
fn validate_slot_names(signal: &SignalConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for slot in &signal.slots {
        if !seen.insert(slot.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("signals[{}].slots[name={}]", signal.name, slot.name),
                "duplicate slot name",
            ));
        }
    }
    Ok(())
}

/// 校验 echo 参数下标
fn validate_echo_indices(signal: &SignalConfig) -> Result<(), ContractError> {
    for slot in &signal.slots {
        if let SlotBehavior::Echo { index } = slot.behavior {
            if i64::try_from(index).map_or(true, |i| i >= signal.param_count) {
                return Err(ContractError::config_validation(
                    format!("signals[{}].slots[{}].behavior.index", signal.name, slot.name),
                    format!(
                        "echo index {} out of range for param_count {}",
                        index, signal.param_count
                    ),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ConfigVersion, Policy, SlotConfig, Value};

    fn minimal_blueprint() -> HookBlueprint {
        HookBlueprint {
            version: ConfigVersion::V1,
            signals: vec![SignalConfig {
                name: "before_save".into(),
                param_count: 1,
                policy: Policy::Veto,
                slots: vec![
                    SlotConfig {
                        name: "allow".into(),
                        delay_ms: 0,
                        behavior: SlotBehavior::Constant {
                            value: Value::Bool(true),
                        },
                    },
                    SlotConfig {
                        name: "echo".into(),
                        delay_ms: 0,
                        behavior: SlotBehavior::Echo { index: 0 },
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
    }

    #[test]
    fn test_empty_blueprint_is_valid() {
        assert!(validate(&HookBlueprint::default()).is_ok());
    }

    #[test]
    fn test_duplicate_signal_name() {
        let mut bp = minimal_blueprint();
        bp.signals.push(bp.signals[0].clone());

        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("duplicate signal name"));
    }

    #[test]
    fn test_duplicate_slot_name() {
        let mut bp = minimal_blueprint();
        bp.signals[0].slots[1].name = "allow".into();

        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("duplicate slot name"));
    }

    #[test]
    fn test_negative_param_count() {
        let mut bp = minimal_blueprint();
        bp.signals[0].param_count = -2;
        bp.signals[0].slots.clear();

        let err = validate(&bp).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
        assert!(err.to_string().contains("param_count"), "{err}");
    }

    #[test]
    fn test_empty_slot_name() {
        let mut bp = minimal_blueprint();
        bp.signals[0].slots[0].name = String::new();

        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("slot name cannot be empty"), "{err}");
    }

    #[test]
    fn test_echo_index_out_of_range() {
        let mut bp = minimal_blueprint();
        bp.signals[0].slots[1].behavior = SlotBehavior::Echo { index: 1 };

        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("echo index 1 out of range"));
    }

    #[test]
    fn test_echo_index_beyond_i64() {
        let content = r#"{"signals":[{"name":"s","param_count":1,"slots":[
            {"name":"e","behavior":{"kind":"echo","index":18446744073709551615}}]}]}"#;
        let bp = crate::parser::parse_json(content).unwrap();

        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }
}
