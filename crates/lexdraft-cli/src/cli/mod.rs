//! Command-line interface for lexdraft.

mod commands;
pub mod helpers;

pub use commands::{is_verbose, run};
