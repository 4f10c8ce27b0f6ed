//! Bandmark Core Library
//!
//! Rubric model, deferral resolution, scoring and the marks table codec.

pub mod config;
pub mod deferral;
pub mod error;
pub mod format;
pub mod logging;
pub mod markdown;
pub mod rubric;
pub mod score;
pub mod template;
