//! Error taxonomy for the Toku framing engine.
//!
//! The core never panics and never performs I/O; every fallible operation
//! returns one of the enums below instead of a bare `String`. Encoder
//! errors leave the handler usable. Decoder errors are terminal: the
//! decode buffer is reset before the error is surfaced, but the embedding
//! is expected to close the connection rather than keep calling
//! `on_bytes_received`.

use thiserror::Error;

use crate::buffer::AllocError;

/// Failure appending a frame to the outbound buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError {
    /// The outbound buffer could not grow to hold the new frame.
    #[error("failed to allocate outbound buffer capacity")]
    Alloc,
}

impl From<AllocError> for EncoderError {
    fn from(_: AllocError) -> Self {
        EncoderError::Alloc
    }
}

/// Failure decoding bytes into a frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecoderError {
    /// The decode buffer could not grow to hold the incoming frame.
    #[error("failed to allocate decode buffer capacity")]
    Memory,
    /// The opcode byte did not match any known frame kind.
    #[error("invalid opcode byte: {opcode:#04x}")]
    InvalidOpcode {
        /// The offending opcode byte.
        opcode: u8,
    },
    /// `payload_size` exceeded `max_payload_size` or otherwise made no sense.
    #[error("invalid payload size {got} (max {max})")]
    InvalidSize {
        /// The payload_size field read from the wire.
        got: u32,
        /// The configured safety cap it was checked against.
        max: u32,
    },
    /// A Hello/HelloAck payload was not of the form `a|b`.
    #[error("malformed Hello/HelloAck payload")]
    BadHelloPayload,
}

impl From<AllocError> for DecoderError {
    fn from(_: AllocError) -> Self {
        DecoderError::Memory
    }
}
