//! Logging step for message observation.

use weir_core::{Continuation, Message, Processor, Validation};

/// A processor that logs each message and passes it through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct LogProcessor {
    name: &'static str,
}

/// Log every message reaching this point of a route under `name`.
pub const fn log(name: &'static str) -> LogProcessor {
    LogProcessor { name }
}

impl Processor for LogProcessor {
    fn process(&self, message: Message, k: Continuation) {
        tracing::debug!(step = self.name, ?message, "processing message");
        k(Validation::from(message));
    }
}
