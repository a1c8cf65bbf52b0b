//! Splitter.

use crate::fault::{catch, failure};
use weir_core::{BoxError, Continuation, Message, Processor, Validation};

/// Splits a message into parts and delivers each part as a success.
///
/// Parts are delivered in the order the split function returns them. If the
/// function fails, a single failure carrying the original message is
/// delivered instead.
pub struct Splitter<F> {
    split: F,
}

/// Build a splitter from `f`.
pub fn split<F, E>(f: F) -> Splitter<F>
where
    F: Fn(&Message) -> Result<Vec<Message>, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Splitter { split: f }
}

impl<F, E> Processor for Splitter<F>
where
    F: Fn(&Message) -> Result<Vec<Message>, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn process(&self, message: Message, k: Continuation) {
        match catch("split", || (self.split)(&message).map_err(Into::into)) {
            Ok(parts) => {
                for part in parts {
                    k(Validation::Success(part));
                }
            }
            Err(exception) => k(failure(&message, exception)),
        }
    }
}
