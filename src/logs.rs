//! Diagnostic output.
//!
//! Intermediate values (palette source, chosen colors, ratios) are printed to
//! stderr when the `DEBUG` environment variable is set, and dropped otherwise.

use std::env;

/// Environment variable that turns diagnostics on.
pub const DEBUG_ENV: &str = "DEBUG";

/// Whether diagnostics are enabled for this process.
#[must_use]
pub fn debug_enabled() -> bool {
    env::var_os(DEBUG_ENV).is_some()
}

/// Print a diagnostic message to stderr if `DEBUG` is set.
///
/// # Examples
///
/// ```
/// # use walkit::logs::debug;
/// debug("palette loaded");
/// debug(&format!("cursor={}", "#ebdbb2"));
/// ```
pub fn debug(message: &str) {
    if debug_enabled() {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_panic() {
        debug("Test debug message");
        assert_eq!(debug_enabled(), env::var_os(DEBUG_ENV).is_some());
    }
}
