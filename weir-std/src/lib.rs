//! # weir-std
//!
//! Standard processors for the Weir message routing engine.
//!
//! This crate provides:
//! - **EIP combinators**: [`choose`](eip::choose), [`multicast`](eip::multicast),
//!   [`split`](eip::split), [`aggregate`](eip::aggregate), [`filter`](eip::filter),
//!   [`scatter`](eip::scatter) / gather and [`mark_failed`](eip::mark_failed)
//! - **Function processors**: [`process_fn`](processors::process_fn),
//!   [`responder_fn`](processors::responder_fn)
//! - **Observation steps**: [`log`](processors::log), [`traced`](processors::traced)
//! - **Configuration**: [`RoutingConfig`](config::RoutingConfig)
//! - **Testing**: [`RecordingSink`](testing::RecordingSink),
//!   [`ManualStrategy`](testing::ManualStrategy)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use weir_core;

pub mod config;
pub mod eip;
mod fault;
pub mod processors;
pub mod testing;
