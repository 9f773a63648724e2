//! Codec errors.

use thiserror::Error;

/// Errors produced while decoding an inbound frame.
///
/// Both variants are recoverable: the read loop reports them and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Frame is not a JSON object with a string `type` discriminator.
    #[error("malformed message: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// Discriminator is known but the variant's fields failed to parse.
    #[error("malformed {message_type} message: {reason}")]
    InvalidFields {
        /// Value of the `type` field.
        message_type: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Errors produced while encoding an outbound envelope.
#[derive(Debug, Error)]
#[error("failed to encode {message_type}: {source}")]
pub struct EncodeError {
    /// Wire type of the envelope that failed.
    pub message_type: &'static str,
    /// Underlying serializer error.
    #[source]
    pub source: serde_json::Error,
}
