//! Error types for table construction and command parsing.
//!
//! Table operations themselves never fail: a missing key is reported through
//! [`Probe`](crate::Probe), not through this type.

use alloc::boxed::Box;
use alloc::string::String;
use core::num::ParseIntError;

use thiserror::Error;

/// Result type alias for fallible crate operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while validating a [`Config`](crate::Config) or parsing a
/// command stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The initial capacity was zero.
    #[error("initial capacity must be positive")]
    ZeroCapacity,

    /// The grow threshold is not in `(0, 1]`.
    #[error("grow threshold {0} is outside (0, 1]")]
    GrowThreshold(f64),

    /// The shrink threshold is not in `[0, 1)`.
    #[error("shrink threshold {0} is outside [0, 1)")]
    ShrinkThreshold(f64),

    /// The operation token is not recognised.
    #[error("unknown operation '{0}'")]
    UnknownOp(String),

    /// A command had an operation but no key.
    #[error("missing key")]
    MissingKey,

    /// The key is not a signed 64-bit integer.
    #[error("invalid key '{text}'")]
    InvalidKey {
        /// The offending key text.
        text: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Extra tokens followed the key.
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),

    /// A parse failure positioned at a line of the command stream.
    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number.
        line: usize,
        /// The failure on that line.
        #[source]
        source: Box<Error>,
    },
}
