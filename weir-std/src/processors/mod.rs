//! Processors built from functions, plus observation steps.

pub mod function;
pub mod logging;
pub mod tracing;

pub use function::{FnProcessor, ResponderFn, invoke, process_fn, responder_fn};
pub use logging::{LogProcessor, log};
pub use tracing::{TRACE_ID, Traced, traced};
