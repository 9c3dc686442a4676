//! Orchestration: syntax lookup, extraction, rule evaluation and assembly of
//! the final [`DocumentDetails`](crate::core::DocumentDetails).
//!
//! Determination is synchronous and allocation-light; a [`Determinator`] is
//! `Send + Sync` and can be shared freely across threads.

mod determinator;
mod observer;

pub use determinator::{
    Determination, DeterminationConfig, Determinator, DeterminatorBuilder,
    FLAG_SWAP_SENDER_RECEIVER,
};
pub use observer::{
    CollectingObserver, DeterminationObserver, NoopObserver, ObservedLevel, TracingObserver,
};
