//! Shared test scaffolding: a mock contents API server, document fixtures, and a declarative
//! builder for the endpoints a test expects to be called.

pub mod builder;
pub mod constant;
pub mod fixtures;
pub mod setup;

pub use builder::TestBuilder;
pub use setup::TestSetup;

/// Everything a test module usually needs.
pub mod prelude {
    pub use crate::{constant::*, fixtures::factory, TestBuilder, TestSetup};
}
