//! Signal - ordered slot set with concurrent emission

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

use contracts::{Args, BoxError, SignalError, Value};

use crate::emission::Emission;
use crate::metrics::SignalMetrics;
use crate::slot::Slot;

/// Synchronous reducer from ordered slot results to one outcome
pub type Processor = Arc<dyn Fn(Vec<Value>) -> Result<Value, BoxError> + Send + Sync>;

const DEFAULT_NAME: &str = "signal";

/// Hook point holding an ordered set of asynchronous slots
///
/// Emitting a signal runs every registered slot concurrently with the same
/// arguments and reduces their results, in registration order, through the
/// signal's processor. Share it behind an `Arc` to register or remove slots
/// from inside a running slot.
pub struct Signal {
    name: String,
    param_count: usize,
    processor: Processor,
    slots: Mutex<Vec<Slot>>,
    metrics: Arc<SignalMetrics>,
}

impl Signal {
    /// Create a signal taking `param_count` arguments
    ///
    /// # Errors
    /// `SignalError::Configuration` if `param_count` is negative.
    pub fn new<P, E>(param_count: i64, processor: P) -> Result<Self, SignalError>
    where
        P: Fn(Vec<Value>) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let param_count =
            usize::try_from(param_count).map_err(|_| SignalError::Configuration { param_count })?;

        Ok(Self {
            name: DEFAULT_NAME.to_string(),
            param_count,
            processor: Arc::new(move |results: Vec<Value>| -> Result<Value, BoxError> {
                processor(results).map_err(Into::into)
            }),
            slots: Mutex::new(Vec::new()),
            metrics: Arc::new(SignalMetrics::new()),
        })
    }

    /// Set the name used in logs and metrics
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name used in logs and metrics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of data arguments each emission carries
    pub fn param_count(&self) -> usize {
        self.param_count
    }

    /// Counters for this signal
    pub fn metrics(&self) -> &Arc<SignalMetrics> {
        &self.metrics
    }

    /// Append a slot
    ///
    /// The same slot may be registered several times; each registration is
    /// invoked once per emission.
    ///
    /// # Errors
    /// `SignalError::ArityMismatch` if the slot's arity differs from the
    /// parameter count. The slot is not added.
    #[instrument(
        name = "signal_register",
        level = "debug",
        skip(self, slot),
        fields(signal = %self.name, arity = slot.arity())
    )]
    pub fn register(&self, slot: Slot) -> Result<(), SignalError> {
        if slot.arity() != self.param_count {
            warn!(expected = self.param_count, "Slot arity mismatch");
            return Err(SignalError::ArityMismatch {
                declared: slot.arity(),
                expected: self.param_count,
            });
        }

        let mut slots = self.lock_slots();
        slots.push(slot);
        observability::record_slot_count(&self.name, slots.len());
        debug!(count = slots.len(), "Slot registered");
        Ok(())
    }

    /// Remove the most recent registration of `slot`
    ///
    /// Returns `false` (and changes nothing) if the slot is not registered.
    pub fn remove(&self, slot: &Slot) -> bool {
        let mut slots = self.lock_slots();
        let Some(position) = slots.iter().rposition(|s| s == slot) else {
            return false;
        };

        slots.remove(position);
        observability::record_slot_count(&self.name, slots.len());
        debug!(signal = %self.name, position, count = slots.len(), "Slot removed");
        true
    }

    /// Number of registrations, duplicates included
    pub fn count(&self) -> usize {
        self.lock_slots().len()
    }

    /// Whether no slot is registered
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Emit `args` to every registered slot
    ///
    /// Validation happens before any slot runs. The emission itself runs as a
    /// task on the current tokio runtime and calls `callback` exactly once,
    /// with either the first slot error or the processor's outcome, unless
    /// a slot never completes.
    ///
    /// # Errors
    /// - `SignalError::ArgumentCount` if `args.len()` differs from the parameter count
    /// - `SignalError::Runtime` if called outside a tokio runtime
    #[instrument(
        name = "signal_emit",
        level = "debug",
        skip(self, args, callback),
        fields(signal = %self.name, args = args.len())
    )]
    pub fn emit<F>(&self, args: Vec<Value>, callback: F) -> Result<(), SignalError>
    where
        F: FnOnce(Result<Value, SignalError>) + Send + 'static,
    {
        self.check_arguments(args.len())?;
        let runtime = Handle::try_current().map_err(|_| SignalError::Runtime)?;

        let emission = self.snapshot(args);
        runtime.spawn(emission.run(callback));
        Ok(())
    }

    /// Emit and wait for the outcome
    ///
    /// # Errors
    /// The synchronous errors of [`emit`](Self::emit), the emission's slot or
    /// processor error, or `SignalError::Aborted` if the emission task ended
    /// without reporting.
    pub async fn call(&self, args: Vec<Value>) -> Result<Value, SignalError> {
        let (tx, rx) = oneshot::channel();
        self.emit(args, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        rx.await.unwrap_or(Err(SignalError::Aborted))
    }

    fn check_arguments(&self, supplied: usize) -> Result<(), SignalError> {
        if supplied != self.param_count {
            warn!(
                signal = %self.name,
                supplied,
                expected = self.param_count,
                "Emit argument count mismatch"
            );
            return Err(SignalError::ArgumentCount {
                supplied,
                expected: self.param_count,
            });
        }
        Ok(())
    }

    /// Capture the current slots and arguments for one emission
    fn snapshot(&self, args: Vec<Value>) -> Emission {
        let slots = self.lock_slots().clone();
        observability::record_emission_started(&self.name);

        Emission {
            id: self.metrics.next_emission(),
            signal: self.name.clone(),
            args: Args::from(args),
            slots,
            processor: Arc::clone(&self.processor),
            metrics: Arc::clone(&self.metrics),
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("param_count", &self.param_count)
            .field("slots", &self.count())
            .finish_non_exhaustive()
    }
}
