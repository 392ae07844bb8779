//! Error types for keycell.
//!
//! Every error variant is a distinct failure mode of the command protocol.
//! Error messages are intentionally minimal — they signal *what* failed
//! without revealing *why* in ways that could leak cryptographic state, and
//! they never contain key or payload bytes.

use std::fmt;

/// The single error type for all keycell operations.
#[derive(Debug)]
pub enum KeycellError {
    /// The request's parameter-slot pattern does not match the pattern
    /// defined for the command. Rejected before any buffer is touched.
    InvalidRequestShape,

    /// The command identifier is not one the enclave recognizes.
    UnknownCommand,

    /// The key slot could not be turned into an operation context
    /// (unsupported AES key size, empty MAC key).
    KeyCreationFailed,

    /// An input buffer is malformed — wrong IV length, or a ciphertext
    /// shorter than the authentication tag.
    InvalidInput,

    /// An output buffer's capacity is below what the operation needs.
    /// Carries the required length so the caller can retry with a larger
    /// buffer; the same length is also written back into the slot.
    ShortBuffer {
        /// Capacity the output slot must have for the retry to succeed.
        required: usize,
    },

    /// The underlying cryptographic engine failed. Internal fault, not a
    /// property of the caller's data.
    PrimitiveFailure,

    /// GCM tag verification failed: wrong key, wrong IV, or tampered
    /// ciphertext. Never conflated with `PrimitiveFailure` — callers should
    /// treat this as corruption or tampering, not a retryable fault. No
    /// plaintext is released.
    AuthenticationFailure,
}

impl KeycellError {
    /// Stable short identifier for diagnostics and audit records.
    /// Codes carry no lengths or data.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequestShape => "invalid_request_shape",
            Self::UnknownCommand => "unknown_command",
            Self::KeyCreationFailed => "key_creation_failed",
            Self::InvalidInput => "invalid_input",
            Self::ShortBuffer { .. } => "short_buffer",
            Self::PrimitiveFailure => "primitive_failure",
            Self::AuthenticationFailure => "authentication_failure",
        }
    }
}

impl fmt::Display for KeycellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequestShape => write!(f, "invalid request shape"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::KeyCreationFailed => write!(f, "key creation failed"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::ShortBuffer { required } => {
                write!(f, "output buffer too small, {} bytes required", required)
            }
            Self::PrimitiveFailure => write!(f, "cryptographic engine failure"),
            Self::AuthenticationFailure => write!(f, "authentication failed"),
        }
    }
}

impl std::error::Error for KeycellError {}
