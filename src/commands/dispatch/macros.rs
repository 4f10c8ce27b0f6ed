//! Macros for command timing and logging

/// Trace command execution without verbose check
///
/// Usage:
/// ```ignore
/// trace_command_always!(start, "check");
/// ```
macro_rules! trace_command_always {
    ($start:expr, $label:expr) => {
        ::tracing::debug!(elapsed = ?$start.elapsed(), $label);
    };
}

pub(crate) use trace_command_always;
