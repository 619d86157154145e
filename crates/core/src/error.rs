//! Error types for the linksim model.
//!
//! Almost every failure in this domain heals itself: unknown destinations are
//! flooded, collisions are retried, missing acknowledgments trigger a resend.
//! The variants below cover what is left: a payload that fails its parity
//! check (reported so the caller can discard it), configuration mistakes, and
//! the optional attempt guards on the retry loops.

use thiserror::Error;

/// Top-level error type for all operations in the system.
#[derive(Debug, Error)]
pub enum Error {
    /// Payload failed the even-parity check and must not be sent.
    #[error("corruption detected: payload {payload:?} carries {ones} one-bits (odd parity)")]
    Corruption { payload: String, ones: usize },

    /// A retry loop hit its configured attempt guard.
    #[error("{operation} gave up after {attempts} attempts")]
    AttemptsExhausted {
        operation: &'static str,
        attempts: u64,
    },

    /// Sliding window size must be at least one frame.
    #[error("invalid window size {0}: must be at least 1")]
    InvalidWindow(usize),

    /// Probability outside [0, 1].
    #[error("invalid probability {0}: must be within [0.0, 1.0]")]
    InvalidProbability(f64),

    /// Address token could not be parsed.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
