//! Slot - registered asynchronous handler

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use contracts::{Args, BoxError, SlotHandler, Value};

/// Future produced by one slot invocation
pub type SlotFuture = BoxFuture<'static, Result<Value, BoxError>>;

type Handler = dyn Fn(Args) -> SlotFuture + Send + Sync;

/// Handle to an asynchronous slot handler
///
/// Cloning a `Slot` clones the handle, not the handler: clones compare equal
/// and count as the same handler for [`Signal::remove`](crate::Signal::remove).
/// Two slots built from separate constructor calls are always distinct.
#[derive(Clone)]
pub struct Slot {
    arity: usize,
    handler: Arc<Handler>,
}

impl Slot {
    /// Build a slot that receives the whole argument tuple
    ///
    /// `arity` is the number of arguments the handler expects; the signal it
    /// is registered on checks it against its own parameter count.
    pub fn new<F, Fut, R, E>(arity: usize, f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Into<Value>,
        E: Into<BoxError>,
    {
        let handler = move |args: Args| -> SlotFuture {
            let fut = f(args);
            Box::pin(async move { fut.await.map(Into::into).map_err(Into::into) })
        };
        Self {
            arity,
            handler: Arc::new(handler),
        }
    }

    /// Build a slot from a closure taking one `Value` per argument
    ///
    /// The arity is taken from the closure's parameter list.
    ///
    /// ```ignore
    /// let slot = Slot::from_fn(|flag: Value| async move { Ok::<_, BoxError>(flag) });
    /// assert_eq!(slot.arity(), 1);
    /// ```
    pub fn from_fn<M, F>(f: F) -> Self
    where
        F: IntoSlot<M>,
    {
        f.into_slot()
    }

    /// Build a slot from a struct implementing [`SlotHandler`]
    pub fn from_handler<H>(handler: H) -> Self
    where
        H: SlotHandler + Sync + 'static,
    {
        let arity = handler.arity();
        let handler = Arc::new(handler);
        Self::new(arity, move |args| {
            let handler = Arc::clone(&handler);
            async move { handler.call(args).await }
        })
    }

    /// Declared number of data arguments
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Start the handler; the returned future reports its result
    pub(crate) fn invoke(&self, args: Args) -> SlotFuture {
        (self.handler)(args)
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Eq for Slot {}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("arity", &self.arity)
            .field("handler", &Arc::as_ptr(&self.handler).cast::<()>())
            .finish()
    }
}

/// Conversion from a closure into a [`Slot`]
///
/// Implemented for `Fn(Value, ..) -> impl Future<Output = Result<R, E>>`
/// with up to six arguments. `M` only disambiguates the implementations.
pub trait IntoSlot<M>: Send + Sync + Sized + 'static {
    /// Wrap `self` into a slot with the arity of its parameter list
    fn into_slot(self) -> Slot;
}

macro_rules! value_ty {
    ($_arg:ident) => {
        Value
    };
}

macro_rules! impl_into_slot {
    ($arity:literal; $($arg:ident => $idx:tt),*) => {
        impl<F, Fut, R, E> IntoSlot<($(value_ty!($arg),)*)> for F
        where
            F: Fn($(value_ty!($arg)),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<R, E>> + Send + 'static,
            R: Into<Value>,
            E: Into<BoxError>,
        {
            fn into_slot(self) -> Slot {
                Slot::new($arity, move |args: Args| {
                    let _ = &args;
                    (self)($(args[$idx].clone()),*)
                })
            }
        }
    };
}

impl_into_slot!(0;);
impl_into_slot!(1; a => 0);
impl_into_slot!(2; a => 0, b => 1);
impl_into_slot!(3; a => 0, b => 1, c => 2);
impl_into_slot!(4; a => 0, b => 1, c => 2, d => 3);
impl_into_slot!(5; a => 0, b => 1, c => 2, d => 3, e => 4);
impl_into_slot!(6; a => 0, b => 1, c => 2, d => 3, e => 4, f => 5);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Doubler;

    impl SlotHandler for Doubler {
        fn arity(&self) -> usize {
            1
        }

        async fn call(&self, args: Args) -> Result<Value, BoxError> {
            let n = args[0].as_i64().ok_or("expected an integer")?;
            Ok(json!(n * 2))
        }
    }

    #[test]
    fn test_arity_from_closure_signature() {
        let zero = Slot::from_fn(|| async { Ok::<_, BoxError>(Value::Null) });
        let one = Slot::from_fn(|a: Value| async move { Ok::<_, BoxError>(a) });
        let three =
            Slot::from_fn(|_a: Value, _b: Value, c: Value| async move { Ok::<_, BoxError>(c) });

        assert_eq!(zero.arity(), 0);
        assert_eq!(one.arity(), 1);
        assert_eq!(three.arity(), 3);
    }

    #[test]
    fn test_clone_is_same_handler() {
        let slot = Slot::from_fn(|a: Value| async move { Ok::<_, BoxError>(a) });
        let other = Slot::from_fn(|a: Value| async move { Ok::<_, BoxError>(a) });

        assert_eq!(slot, slot.clone());
        assert_ne!(slot, other);
    }

    #[tokio::test]
    async fn test_invoke_passes_arguments_in_order() {
        let slot = Slot::from_fn(|a: Value, b: Value| async move {
            Ok::<_, BoxError>(json!([b, a]))
        });
        let args: Args = vec![json!(1), json!("two")].into();

        let result = slot.invoke(args).await.unwrap();
        assert_eq!(result, json!(["two", 1]));
    }

    #[tokio::test]
    async fn test_result_and_error_conversion() {
        let ok = Slot::new(0, |_args| async { Ok::<_, BoxError>("hello") });
        let err = Slot::new(0, |_args| async { Err::<bool, _>("nope") });

        assert_eq!(ok.invoke(Args::from(vec![])).await.unwrap(), json!("hello"));
        let message = err.invoke(Args::from(vec![])).await.unwrap_err().to_string();
        assert_eq!(message, "nope");
    }

    #[tokio::test]
    async fn test_from_handler() {
        let slot = Slot::from_handler(Doubler);
        assert_eq!(slot.arity(), 1);

        let result = slot.invoke(vec![json!(21)].into()).await.unwrap();
        assert_eq!(result, json!(42));

        let err = slot.invoke(vec![json!("x")].into()).await.unwrap_err();
        assert_eq!(err.to_string(), "expected an integer");
    }
}
