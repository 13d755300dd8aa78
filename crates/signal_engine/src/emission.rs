//! Emission - one fan-out of arguments to a snapshot of slots

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use futures::future::{self, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, instrument, trace, warn};

use contracts::{Args, BoxError, SignalError, Value};

use crate::metrics::SignalMetrics;
use crate::signal::Processor;
use crate::slot::{Slot, SlotFuture};

/// Per-emission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmissionState {
    /// Created, no slot started yet
    Pending,
    /// Slots started, waiting for results
    FanningOut,
    /// A slot failed and the error was delivered; remaining slots are drained
    Erred,
    /// Every slot succeeded, processor running
    Processing,
    /// Outcome delivered
    Completed,
}

/// Everything one emission needs, captured when it was requested
pub(crate) struct Emission {
    pub(crate) id: u64,
    pub(crate) signal: String,
    pub(crate) args: Args,
    pub(crate) slots: Vec<Slot>,
    pub(crate) processor: Processor,
    pub(crate) metrics: Arc<SignalMetrics>,
}

impl Emission {
    /// Drive every slot to completion and deliver exactly one outcome
    ///
    /// The callback receives the first slot error, or the processor's result
    /// once every slot succeeded. Slots still running when an error is
    /// delivered are polled to completion; what they report is only logged.
    #[instrument(
        name = "signal_emission",
        skip_all,
        fields(signal = %self.signal, emission = self.id, slots = self.slots.len())
    )]
    pub(crate) async fn run<F>(self, callback: F)
    where
        F: FnOnce(Result<Value, SignalError>),
    {
        let started = Instant::now();
        let mut state = EmissionState::Pending;
        let mut callback = Some(callback);
        let mut results: Vec<Option<Value>> = vec![None; self.slots.len()];

        // Every handler is called here, before anything is awaited.
        let mut pending: FuturesUnordered<_> = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let invocation = invoke_guarded(slot, Arc::clone(&self.args));
                async move { (index, invocation.await) }
            })
            .collect();
        advance(&mut state, EmissionState::FanningOut);

        while let Some((index, outcome)) = pending.next().await {
            match outcome {
                Ok(value) => {
                    trace!(slot_index = index, "Slot reported");
                    results[index] = Some(value);
                }
                Err(source) => {
                    self.metrics.inc_slot_failures();
                    observability::record_slot_failure(&self.signal);

                    if state == EmissionState::FanningOut {
                        warn!(slot_index = index, error = %source, "Slot failed, short-circuiting emission");
                        advance(&mut state, EmissionState::Erred);
                        self.deliver(&mut callback, Err(SignalError::slot(index, source)), started);
                    } else {
                        self.metrics.inc_late_errors();
                        debug!(slot_index = index, error = %source, "Slot error after outcome delivered, ignored");
                    }
                }
            }
        }

        if state == EmissionState::Erred {
            debug!("In-flight slots drained after error");
            return;
        }

        advance(&mut state, EmissionState::Processing);
        let results: Vec<Value> = results.into_iter().flatten().collect();
        let outcome = self.process(results);
        self.deliver(&mut callback, outcome, started);
        advance(&mut state, EmissionState::Completed);
    }

    /// Run the processor, turning an error or a panic into `SignalError::Processor`
    fn process(&self, results: Vec<Value>) -> Result<Value, SignalError> {
        let processor = Arc::clone(&self.processor);
        let source = match panic::catch_unwind(AssertUnwindSafe(move || processor(results))) {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(source)) => source,
            Err(payload) => panic_error(payload),
        };

        self.metrics.inc_processor_failures();
        warn!(error = %source, "Result processor failed");
        Err(SignalError::processor(source))
    }

    fn deliver<F>(
        &self,
        callback: &mut Option<F>,
        outcome: Result<Value, SignalError>,
        started: Instant,
    ) where
        F: FnOnce(Result<Value, SignalError>),
    {
        let Some(callback) = callback.take() else {
            return;
        };

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.inc_completed();
        observability::record_emission_completed(&self.signal, outcome.is_ok(), latency_ms);
        debug!(success = outcome.is_ok(), latency_ms, "Emission outcome delivered");

        callback(outcome);
    }
}

fn advance(state: &mut EmissionState, next: EmissionState) {
    trace!(from = ?*state, to = ?next, "Emission state");
    *state = next;
}

/// Start a slot, converting a panic (while starting or while running) into an error
fn invoke_guarded(slot: &Slot, args: Args) -> SlotFuture {
    match panic::catch_unwind(AssertUnwindSafe(|| slot.invoke(args))) {
        Ok(invocation) => AssertUnwindSafe(invocation)
            .catch_unwind()
            .map(|outcome| outcome.unwrap_or_else(|payload| Err(panic_error(payload))))
            .boxed(),
        Err(payload) => future::ready(Err(panic_error(payload))).boxed(),
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> BoxError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("panicked: {message}").into()
}
