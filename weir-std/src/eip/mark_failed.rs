//! Unconditional failure.

use std::sync::Arc;
use weir_core::{BoxError, Continuation, Exception, Message, Processor, Validation};

/// Marks every message as failed with a fixed error.
#[derive(Clone)]
pub struct MarkFailed {
    exception: Exception,
}

/// Fail every message with `error`.
pub fn mark_failed(error: impl Into<BoxError>) -> MarkFailed {
    let error: BoxError = error.into();
    MarkFailed {
        exception: Arc::from(error),
    }
}

impl Processor for MarkFailed {
    fn process(&self, message: Message, k: Continuation) {
        k(Validation::Failure(
            message.set_exception_shared(Arc::clone(&self.exception)),
        ));
    }
}
