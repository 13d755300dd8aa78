//! Dynamic value types shared by signals and slots.

use std::sync::Arc;

pub use serde_json::Value;

/// Boxed error reported by slots and processors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Argument tuple of one emission, shared read-only by every slot
pub type Args = Arc<[Value]>;
