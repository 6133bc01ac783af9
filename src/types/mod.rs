//! Core types for LiminalDB.

pub mod prompt;
pub mod responses;

pub use prompt::*;
pub use responses::*;
