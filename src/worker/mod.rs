//! Serialized execution of store writes.

pub mod queue;

pub use queue::WriteQueue;
