//! The inbound exchange seen by the route adapter.

use std::sync::Arc;
use weir_core::{Exception, Message};

/// A request/response unit owned by the hosting endpoint.
///
/// The adapter reads the in-message, writes an out-message and possibly an
/// exception, then signals completion exactly once. Writes may come from any
/// thread, so implementations use interior mutability.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `ExternalExchange`",
    label = "missing `ExternalExchange` implementation"
)]
pub trait ExternalExchange: Send + Sync + 'static {
    /// Whether the caller expects a response.
    fn is_out_capable(&self) -> bool;

    /// The inbound message.
    fn in_message(&self) -> Message;

    /// Store the response message.
    fn set_out_message(&self, message: Message);

    /// Store the failure reported to the caller.
    fn set_exception(&self, exception: Exception);

    /// Signal completion. `asynchronous` is true when the exchange completes
    /// after the adapter's `handle` call has returned.
    fn complete(&self, asynchronous: bool);
}

/// A shared exchange.
pub type ExchangeRef = Arc<dyn ExternalExchange>;
