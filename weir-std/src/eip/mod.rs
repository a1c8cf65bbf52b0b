//! Enterprise integration pattern combinators.
//!
//! Every combinator is a [`Processor`](weir_core::Processor) and composes with
//! the rest of a route through `>>`. Functions supplied by the caller return
//! `Result`; an error or a panic inside them is turned into a failure on the
//! input message and never unwinds out of the route.

pub mod aggregate;
pub mod choice;
pub mod mark_failed;
pub mod multicast;
pub mod scatter_gather;
pub mod split;

pub use aggregate::{Aggregator, aggregate, filter};
pub use choice::{Choice, choose};
pub use mark_failed::{MarkFailed, mark_failed};
pub use multicast::{Multicast, POSITION, multicast};
pub use scatter_gather::{Scatter, ScatterGather, scatter};
pub use split::{Splitter, split};
