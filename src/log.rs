use std::env;

use once_cell::sync::Lazy;

pub const DEBUG_ENV_VAR: &str = "TOOLSHED_DEBUG";

pub static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var(DEBUG_ENV_VAR).map_or(false, |log_level| log_level.eq("true") || log_level.eq("1"))
});

pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED
}

/// Builds a message appending the details only when debugging is enabled.
///
/// # Arguments
///
/// * `message` - The main message.
/// * `details` - Additional details shown in debug mode.
///
/// # Returns
///
/// A formatted string containing the message and, optionally, the details.
pub fn debug_message<M, D>(message: M, details: D) -> String
where
    M: AsRef<str>,
    D: AsRef<str>,
{
    if *DEBUG_ENABLED {
        format!("{}{}", message.as_ref(), details.as_ref())
    } else {
        message.as_ref().to_string()
    }
}

/// Logs a debug message to stderr with optional formatted arguments.
///
/// Output is only produced when `TOOLSHED_DEBUG` is set to `true` or `1`,
/// so results written to stdout stay clean for piping.
///
/// # Examples
///
/// ```
/// use toolshed::debug;
///
/// debug!("Operation completed");
/// debug!("Applied {} to {} chars", "upper", 12);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:expr) => {
        if *$crate::log::DEBUG_ENABLED {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!("{}", $fmt)));
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        if *$crate::log::DEBUG_ENABLED {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!($fmt, $($arg)*)));
        }
    };
}
