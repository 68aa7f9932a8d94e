//! toku-codec: a sans-I/O framing engine for the Toku RPC protocol.
//!
//! Toku is a bidirectional, binary, stream-oriented protocol carrying
//! request/response, server push, and keepalive frames over a reliable
//! byte stream (typically TCP). Either endpoint may initiate frames;
//! request/response pairs are correlated with a 32-bit sequence number.
//!
//! This crate provides the framing engine only: the incremental decoder,
//! the frame encoder, and a per-connection [`StreamHandler`] that owns the
//! encode/decode buffers and the sequence space.
//!
//! # What this crate is not
//!
//! It does not open sockets, wait on readiness, negotiate a handshake
//! policy, retry a connection, or choose a payload codec (JSON/MessagePack/
//! ETF). Those are the job of the embedding transport layer; this crate
//! only turns bytes into [`Frame`]s and [`Frame`]s into bytes.
//!
//! # Quick start
//!
//! ```rust
//! use toku_codec::StreamHandler;
//!
//! let mut handler = StreamHandler::new();
//! let seq = handler.send_request(0, b"ping").unwrap();
//!
//! let bytes = handler.get_bytes(handler.write_buffer_len(), true);
//! // ... hand `bytes` to a socket ...
//!
//! let mut peer = StreamHandler::new();
//! let frames = peer.on_bytes_received(&bytes).unwrap();
//! assert_eq!(frames.len(), 1);
//! let _ = seq;
//! ```

pub mod backoff;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod opcode;

pub use backoff::Backoff;
pub use buffer::Buffer;
pub use codec::Decoder;
pub use config::Config;
pub use error::{DecoderError, EncoderError};
pub use handler::StreamHandler;
pub use opcode::{flag, opcode_id, Frame};
