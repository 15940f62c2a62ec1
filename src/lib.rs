//! Shared roster document for alliance availability scheduling.
//!
//! Members submit availability, car power, and tower level; officers curate the roster and
//! review registration applications. All state lives in one JSON document behind a versioned
//! contents API. This crate implements the optimistic-concurrency protocol used to mutate that
//! document from untrusted clients without a backend: every write is a read-modify-write against
//! the latest remote version, guarded by the version token returned by the read.
//!
//! The entry point is [`Scheduler`], an explicitly constructed service object holding the store
//! client, retry policy, write queue, and observable local state.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod state;
pub mod store;
pub mod util;
pub mod worker;

pub use config::Config;
pub use error::{Error, ErrorKind};
pub use scheduler::{CachePolicy, Scheduler};
