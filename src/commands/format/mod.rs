//! Shared output formatting helpers for commands

pub mod status;

pub use status::{format_marks, print_json_status};
