//! Error macros for bandmark

/// Macro for creating template errors
#[macro_export]
macro_rules! bail_template {
    ($($arg:tt)*) => {
        return Err($crate::error::BandmarkError::template(format!($($arg)*)))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::BandmarkError::UsageError($msg.to_string()))
    };
}
