//! # Signal Engine
//!
//! Signal/slot dispatch for extensible hook points.
//!
//! Responsibilities:
//! - Slot registration with arity checks
//! - Concurrent fan-out of emitted arguments to every slot
//! - Ordered result collection, first-error short-circuit
//! - Result policies: collect / veto / discard
//!
//! ## Example
//!
//! ```ignore
//! use signal_engine::{BoxError, Signal, Slot, Value};
//!
//! let before_save = Signal::veto(1)?;
//! before_save.register(Slot::from_fn(|doc: Value| async move {
//!     Ok::<_, BoxError>(!doc["locked"].as_bool().unwrap_or(false))
//! }))?;
//!
//! before_save.emit(vec![doc], |outcome| match outcome {
//!     Ok(allowed) => println!("allowed: {allowed}"),
//!     Err(e) => eprintln!("hook failed: {e}"),
//! })?;
//! ```

mod emission;
pub mod metrics;
pub mod policy;
mod registry;
mod scripted;
mod signal;
mod slot;

pub use contracts::{Args, BoxError, Policy, SignalError, SlotHandler, Value};
pub use metrics::{MetricsSnapshot, SignalMetrics};
pub use registry::HookRegistry;
pub use scripted::ScriptedSlot;
pub use signal::{Processor, Signal};
pub use slot::{IntoSlot, Slot, SlotFuture};
