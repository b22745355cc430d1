//! User-facing error reporting.
//!
//! Validation and resolution failures never panic and never surface as
//! exceptions to the host framework; they are reported here, one line each,
//! with the plugin prefix.

/// Renders a message with the plugin log prefix.
pub fn render(message: &str) -> String {
    format!("[mantra]: {}", message)
}

/// Reports a user-facing failure through the log facade. This is the sole
/// channel for validation and resolution errors.
pub fn error(message: &str) {
    log::error!("{}", render(message));
}
