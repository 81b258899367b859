//! Single alert channel for the whole crate.
//!
//! Semtex funnels every failure through one `message(routine, text, level)`
//! call (see `original_source/src/misc.cpp`). We keep that shape: every
//! fallible routine returns `DnsError` through `?`, and `alert` is the one
//! place that both logs and decides whether the condition is fatal.

use thiserror::Error;

/// Severity of a condition raised through [`alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Execution cannot continue; the caller must propagate this as `Err`.
    Error,
    /// Logged and execution continues.
    Warning,
}

/// The four error kinds from spec.md §7.
#[derive(Debug, Error)]
pub enum DnsError {
    /// Parameter out of range: nz odd, nz/Nproc not integral, unsupported
    /// FFT length, SVV bounds, etc.
    #[error("[{routine}] configuration error: {message}")]
    Configuration { routine: &'static str, message: String },

    /// Cannot open/parse a session, field, forcing, mapping or output file.
    #[error("[{routine}] I/O error: {message}")]
    Io { routine: &'static str, message: String },

    /// Solver failed to converge, NaN detected, or a trapped overflow.
    #[error("[{routine}] numeric error: {message}")]
    Numeric { routine: &'static str, message: String },
}

pub type DnsResult<T> = Result<T, DnsError>;

/// Raise a configuration-kind condition at the given level.
///
/// `Level::Error` returns `Err` for the caller to propagate with `?`;
/// `Level::Warning` logs to stderr via the `log` facade and returns `Ok(())`,
/// matching "WARNING returns" in spec.md §7.
pub fn alert(routine: &'static str, message: impl Into<String>, level: Level) -> DnsResult<()> {
    let message = message.into();
    match level {
        Level::Error => {
            log::error!("{routine}: {message}");
            Err(DnsError::Configuration { routine, message })
        }
        Level::Warning => {
            log::warn!("{routine}: {message}");
            Ok(())
        }
    }
}

/// Raise an I/O-kind condition. Always fatal per §7.
pub fn io_error(routine: &'static str, message: impl Into<String>) -> DnsError {
    let message = message.into();
    log::error!("{routine}: {message}");
    DnsError::Io { routine, message }
}

/// Raise a numeric-kind condition. Always fatal per §7.
pub fn numeric_error(routine: &'static str, message: impl Into<String>) -> DnsError {
    let message = message.into();
    log::error!("{routine}: {message}");
    DnsError::Numeric { routine, message }
}
