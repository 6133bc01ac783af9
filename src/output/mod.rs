//! Rendering of command results for humans or as JSON.

mod help;
pub mod human;
pub mod json;

pub use help::QUICKSTART;
pub use json::{format_json, format_json_error};
