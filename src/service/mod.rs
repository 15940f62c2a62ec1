//! Document mutation services.
//!
//! [`mutation`] holds the pure document transformations, [`writer`] drives them through the
//! fetch, apply, conditional-write cycle, and [`retry`] bounds each individual store call.

pub mod mutation;
pub mod retry;
pub mod writer;

pub use mutation::{UpsertKind, UpsertOutcome};
pub use retry::RetryContext;
pub use writer::{Applied, Committed, ConflictPolicy, DocumentWriter};
