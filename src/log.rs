//! Conditional logging macros.
//!
//! With the `tracing` feature the pipeline reports skipped shapes, skipped
//! wall sides and unsupported path commands through `tracing`. Without it
//! these macros expand to nothing, so the library has no logging cost.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, info, warn};
