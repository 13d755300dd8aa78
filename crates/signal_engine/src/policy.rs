//! Policy factories - signals with a built-in result processor

use contracts::{BoxError, Policy, SignalError, Value};

use crate::signal::Signal;

/// Signal whose outcome is the array of slot results, in registration order
pub fn collect(param_count: i64) -> Result<Signal, SignalError> {
    Signal::new(param_count, collect_results)
}

/// Signal whose outcome is the AND of boolean slot results (`true` with no slots)
///
/// A slot reporting anything other than a boolean fails the emission with a
/// processor error.
pub fn veto(param_count: i64) -> Result<Signal, SignalError> {
    Signal::new(param_count, veto_results)
}

/// Signal whose outcome is always `null`
pub fn discard(param_count: i64) -> Result<Signal, SignalError> {
    Signal::new(param_count, discard_results)
}

/// Signal using the processor selected by `policy`
pub fn with_policy(policy: Policy, param_count: i64) -> Result<Signal, SignalError> {
    match policy {
        Policy::Collect => collect(param_count),
        Policy::Veto => veto(param_count),
        Policy::Discard => discard(param_count),
    }
}

impl Signal {
    /// See [`collect`]
    pub fn collect(param_count: i64) -> Result<Self, SignalError> {
        collect(param_count)
    }

    /// See [`veto`]
    pub fn veto(param_count: i64) -> Result<Self, SignalError> {
        veto(param_count)
    }

    /// See [`discard`]
    pub fn discard(param_count: i64) -> Result<Self, SignalError> {
        discard(param_count)
    }

    /// See [`with_policy`]
    pub fn with_policy(policy: Policy, param_count: i64) -> Result<Self, SignalError> {
        with_policy(policy, param_count)
    }
}

fn collect_results(results: Vec<Value>) -> Result<Value, BoxError> {
    Ok(Value::Array(results))
}

fn veto_results(results: Vec<Value>) -> Result<Value, BoxError> {
    results
        .iter()
        .enumerate()
        .try_fold(true, |allowed, (index, result)| match result {
            Value::Bool(vote) => Ok(allowed && *vote),
            other => Err::<bool, BoxError>(
                format!("veto slot #{index} returned non-boolean {other}").into(),
            ),
        })
        .map(Value::Bool)
}

fn discard_results(_results: Vec<Value>) -> Result<Value, BoxError> {
    Ok(Value::Null)
}
