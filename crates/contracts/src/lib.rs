//! # Contracts
//!
//! Shared interface contracts for the signal/slot workspace: dynamic values,
//! error taxonomy, the `SlotHandler` trait and the hook configuration model.
//! Every other crate depends on this one, never the other way round.
//!
//! ## Value Model
//! - Emitted arguments and slot results are `serde_json::Value`
//! - Arguments are shared read-only between slots as `Args` (`Arc<[Value]>`)

mod blueprint;
mod error;
mod policy;
mod slot_handler;
mod value;

pub use blueprint::*;
pub use error::*;
pub use policy::Policy;
pub use slot_handler::{LocalSlotHandler, SlotHandler};
pub use value::{Args, BoxError, Value};
