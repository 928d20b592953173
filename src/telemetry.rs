//! telemetry — opt-in `tracing` subscriber for binaries, tests, and Python.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. [`try_init_tracing`] installs a compact `fmt`
//! subscriber whose filter comes from `RUST_LOG` when set, falling back to
//! the given directive (e.g. `"info"` or `"rust_ddm=debug"`).
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed or the directive
/// cannot be parsed; the existing subscriber is left untouched.
pub fn try_init_tracing(default_directive: &str) -> bool {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match EnvFilter::try_new(default_directive) {
            Ok(filter) => filter,
            Err(_) => return false,
        },
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).compact().try_init().is_ok()
}

/// [`try_init_tracing`] ignoring whether installation succeeded.
pub fn init_tracing(default_directive: &str) {
    let _ = try_init_tracing(default_directive);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Ensure a second installation is refused without panicking.
    //
    // Given
    // -----
    // - Two consecutive initialisations in one process.
    //
    // Expect
    // ------
    // - The second call returns `false`.
    fn second_init_is_refused() {
        // Act
        init_tracing("warn");
        let second = try_init_tracing("warn");

        // Assert
        assert!(!second);
    }
}
