//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{HookBlueprint, SlotBehavior};

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    signals: Vec<SignalInfo>,
}

#[derive(Serialize)]
struct SignalInfo {
    name: String,
    param_count: i64,
    policy: String,
    slot_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<SlotInfo>,
}

#[derive(Serialize)]
struct SlotInfo {
    name: String,
    delay_ms: u64,
    behavior: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn describe(behavior: &SlotBehavior) -> String {
    match behavior {
        SlotBehavior::Constant { value } => format!("constant {value}"),
        SlotBehavior::Echo { index } => format!("echo argument #{index}"),
        SlotBehavior::Fail { message } => format!("fail \"{message}\""),
    }
}

fn build_config_info(blueprint: &HookBlueprint, args: &InfoArgs) -> ConfigInfo {
    let signals = blueprint
        .signals
        .iter()
        .map(|s| SignalInfo {
            name: s.name.clone(),
            param_count: s.param_count,
            policy: s.policy.to_string(),
            slot_count: s.slots.len(),
            slots: if args.slots {
                s.slots
                    .iter()
                    .map(|slot| SlotInfo {
                        name: slot.name.clone(),
                        delay_ms: slot.delay_ms,
                        behavior: describe(&slot.behavior),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        signals,
    }
}

fn print_config_info(blueprint: &HookBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Sigslot Hook Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Version: {:?}", blueprint.version);

    println!("\n🔔 Signals ({})", blueprint.signals.len());
    for (i, signal) in blueprint.signals.iter().enumerate() {
        let is_last = i == blueprint.signals.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} ({} params, {})",
            prefix, signal.name, signal.param_count, signal.policy
        );

        if args.slots && !signal.slots.is_empty() {
            println!("   {}  🔌 Slots ({}):", child_prefix, signal.slots.len());
            for (j, slot) in signal.slots.iter().enumerate() {
                let slot_prefix = if j == signal.slots.len() - 1 { "└─" } else { "├─" };
                println!(
                    "   {}     {} {} ({}, {} ms)",
                    child_prefix,
                    slot_prefix,
                    slot.name,
                    describe(&slot.behavior),
                    slot.delay_ms
                );
            }
        } else {
            println!("   {}  └─ {} slots", child_prefix, signal.slots.len());
        }
    }

    println!();
}
