//! `emit` command implementation.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use contracts::Value;
use observability::EmissionStats;
use signal_engine::{HookRegistry, MetricsSnapshot};

use crate::cli::EmitArgs;
use crate::error::CliError;

/// One emission outcome for JSON output
#[derive(Serialize)]
struct EmissionReport {
    emission: u32,
    ok: bool,
    latency_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EmitReport {
    signal: String,
    emissions: Vec<EmissionReport>,
    succeeded: u64,
    failed: u64,
    late_errors: u64,
}

/// Execute the `emit` command
pub async fn run_emit(args: &EmitArgs) -> Result<()> {
    info!(
        config = %args.config.display(),
        signal = %args.signal,
        repeat = args.repeat,
        "Emitting signal"
    );

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let registry =
        HookRegistry::from_blueprint(&blueprint).context("Failed to build hook registry")?;

    let signal = registry
        .get(&args.signal)
        .ok_or_else(|| CliError::signal_not_found(&args.signal, registry.names()))?;
    let values = parse_arguments(&args.args)?;

    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!(port = args.metrics_port, "Metrics exporter started");
    }

    let mut stats = EmissionStats::new();
    let mut reports = Vec::with_capacity(args.repeat as usize);

    for emission in 1..=args.repeat {
        let start = Instant::now();
        let call = signal.call(values.clone());
        let outcome = if args.timeout > 0 {
            tokio::time::timeout(Duration::from_secs(args.timeout), call)
                .await
                .map_err(|_| CliError::timeout(signal.name(), args.timeout))?
        } else {
            call.await
        };
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let report = match outcome {
            Ok(value) => EmissionReport {
                emission,
                ok: true,
                latency_ms,
                value: Some(value),
                error: None,
            },
            Err(e) if e.is_synchronous() => return Err(CliError::from(e).into()),
            Err(e) => {
                warn!(signal = %signal.name(), emission, error = %e, "Emission failed");
                EmissionReport {
                    emission,
                    ok: false,
                    latency_ms,
                    value: None,
                    error: Some(e.to_string()),
                }
            }
        };
        stats.update(report.ok, latency_ms);
        reports.push(report);
    }

    let summary = stats.summary();
    let snapshot = signal.metrics().snapshot();

    if args.json {
        let report = EmitReport {
            signal: signal.name().to_string(),
            emissions: reports,
            succeeded: summary.succeeded,
            failed: summary.failed,
            late_errors: snapshot.late_errors,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_reports(signal.name(), &reports, &snapshot);
        println!("\n{}", summary);
    }

    if summary.failed > 0 {
        anyhow::bail!(
            "{} of {} emissions of '{}' failed",
            summary.failed,
            summary.total,
            signal.name()
        );
    }
    Ok(())
}

/// Parse each `--arg` as a JSON value
fn parse_arguments(raw: &[String]) -> Result<Vec<Value>, CliError> {
    raw.iter()
        .enumerate()
        .map(|(position, text)| {
            serde_json::from_str(text)
                .map_err(|e| CliError::invalid_argument(position, e.to_string()))
        })
        .collect()
}

fn print_reports(signal: &str, reports: &[EmissionReport], snapshot: &MetricsSnapshot) {
    println!("Signal '{}'", signal);
    for report in reports {
        match (&report.value, &report.error) {
            (Some(value), _) => println!(
                "  #{:<3} ✓ {} ({:.3} ms)",
                report.emission, value, report.latency_ms
            ),
            (None, Some(error)) => println!(
                "  #{:<3} ✗ {} ({:.3} ms)",
                report.emission, error, report.latency_ms
            ),
            (None, None) => {}
        }
    }
    if snapshot.late_errors > 0 {
        println!("  {} slot errors arrived after their outcome", snapshot.late_errors);
    }
}
