// Conditional logging shim: uses `tracing` when enabled, compiles to nothing otherwise

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! __log_trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! __log_debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! __log_warn {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {__log_debug as debug, __log_trace as trace, __log_warn as warn};
