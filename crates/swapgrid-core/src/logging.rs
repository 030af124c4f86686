#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported so
//! the engine crates can write `swapgrid_core::debug!(...)` without a direct
//! dependency. Without it, the same macro names expand to nothing, so
//! instrumentation costs nothing in release builds that do not opt in.
//!
//! All SwapGrid events are emitted under the [`TARGET`] prefix, which makes
//! `RUST_LOG=swapgrid=debug` a convenient filter.

/// Common target prefix for SwapGrid log events.
pub const TARGET: &str = "swapgrid";

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Expands to nothing when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Yields an inert span when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::DisabledSpan
        };
    }

    /// Yields an inert span when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::DisabledSpan
        };
    }
}

/// Stand-in for `tracing::Span` when the feature is off.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    /// Entering an inert span returns an inert guard.
    pub fn enter(&self) -> DisabledGuard {
        DisabledGuard
    }
}

/// Guard returned by [`DisabledSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct DisabledGuard;
