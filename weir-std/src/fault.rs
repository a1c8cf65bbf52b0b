//! Conversion of user-function faults into routing failures.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};
use weir_core::{BoxError, Exception, Message, RoutingError, Validation};

/// Run a user-supplied function, turning an `Err` or a panic into an exception.
pub(crate) fn catch<T, F>(stage: &'static str, f: F) -> Result<T, Exception>
where
    F: FnOnce() -> Result<T, BoxError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            tracing::warn!(stage, %error, "user function failed");
            Err(Exception::from(error))
        }
        Err(payload) => {
            let error = RoutingError::from_panic(payload);
            tracing::warn!(stage, %error, "user function panicked");
            let exception: Exception = Arc::new(error);
            Err(exception)
        }
    }
}

/// The failure delivered for `original` when a user function faults.
pub(crate) fn failure(original: &Message, exception: Exception) -> Validation {
    Validation::Failure(original.set_exception_shared(exception))
}
