//! SlotHandler trait - struct-based slot interface
//!
//! Closures are the usual way to build slots; this trait covers handlers that
//! carry their own state or configuration.

use crate::{Args, BoxError, Value};

/// Asynchronous slot handler
///
/// `arity` is the number of data arguments the handler accepts. A signal only
/// accepts handlers whose arity equals its parameter count, and only invokes
/// them with exactly that many arguments.
#[trait_variant::make(SlotHandler: Send)]
pub trait LocalSlotHandler {
    /// Declared number of data arguments
    fn arity(&self) -> usize;

    /// Handle one emission
    ///
    /// # Errors
    /// Any error short-circuits the emission it belongs to.
    async fn call(&self, args: Args) -> Result<Value, BoxError>;
}
