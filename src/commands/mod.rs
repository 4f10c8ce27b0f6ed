//! CLI commands for bandmark

pub mod check;
pub mod dispatch;
pub mod edit;
pub mod fmt;
pub mod format;
pub mod helpers;
pub mod list;
pub mod render;
pub mod show;
