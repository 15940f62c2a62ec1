//! Small stateless helpers shared by the model and the mutation operations.

pub mod id;
pub mod timezone;
pub mod username;
