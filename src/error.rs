//! Crate-wide error type.
//!
//! Mirrors the four failure kinds of the segmentation/chaining contract:
//! bad arguments, allocation failure, a singular (degenerate) regression,
//! and an internal invariant violation that must never fire on valid input.

use thiserror::Error;

/// The error type returned by every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Null/empty/out-of-range/unsupported-type argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failure inside a builder.
    #[error("out of memory")]
    OutOfMemory,

    /// A linear regression or shear fit degenerated (zero x-spread, or
    /// residual exceeded tolerance). Never returned to callers directly —
    /// callers see the chain silently dropped instead (see `spec.md` §7).
    #[error("singular regression")]
    Singular,

    /// An internal invariant was violated. Should not occur on valid input
    /// in a release build; guarded by `debug_assert!` at the call sites
    /// that can detect it cheaply.
    #[error("internal invariant violated: {0}")]
    Unexpected(String),
}

/// A specialized `Result` for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
