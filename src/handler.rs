//! Per-connection stream handler: owns the outbound buffer, the decode
//! buffer, and the sequence space. Safe for exactly one task to drive —
//! see the crate-level concurrency notes.

use crate::buffer::Buffer;
use crate::codec::{self, Decoder};
use crate::config::Config;
use crate::error::{DecoderError, EncoderError};
use crate::opcode::Frame;

/// Owns the encode and decode byte buffers and the sequence counter for
/// one connection.
///
/// No operation here blocks or performs I/O: encoders append to memory,
/// the decoder consumes in-memory bytes, and buffer drains return
/// immediately. All I/O waiting belongs to the surrounding transport
/// driver, which calls these methods between its own reads/writes.
#[derive(Debug)]
pub struct StreamHandler {
    seq: u32,
    seq_max: u32,
    outbound: Buffer,
    write_position: usize,
    decoder: Decoder,
}

impl Default for StreamHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamHandler {
    /// Creates a handler using [`Config::default`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a handler with custom buffer/payload/sequence limits.
    pub fn with_config(cfg: Config) -> Self {
        Self {
            seq: 0,
            seq_max: cfg.seq_max,
            outbound: Buffer::with_limits(cfg.initial_buffer_size, cfg.big_buffer_size),
            write_position: 0,
            decoder: Decoder::with_max_payload_size(cfg.max_payload_size),
        }
    }

    /// The last sequence number assigned.
    pub fn current_seq(&self) -> u32 {
        self.seq
    }

    /// Allocates and returns the next sequence number, wrapping to 0 at
    /// `seq_max`.
    pub fn next_seq(&mut self) -> u32 {
        self.seq += 1;
        if self.seq >= self.seq_max {
            self.seq = 0;
        }
        self.seq
    }

    /// Appends a `Ping` frame, allocating a new sequence number.
    pub fn send_ping(&mut self, flags: u8) -> Result<u32, EncoderError> {
        let seq = self.next_seq();
        codec::encode_ping(&mut self.outbound, flags, seq)?;
        Ok(seq)
    }

    /// Appends a `Pong` frame echoing the peer's `seq`.
    pub fn send_pong(&mut self, flags: u8, seq: u32) -> Result<(), EncoderError> {
        codec::encode_pong(&mut self.outbound, flags, seq)?;
        Ok(())
    }

    /// Appends a `Request` frame, allocating a new sequence number.
    pub fn send_request(&mut self, flags: u8, data: &[u8]) -> Result<u32, EncoderError> {
        let seq = self.next_seq();
        codec::encode_request(&mut self.outbound, flags, seq, data)?;
        Ok(seq)
    }

    /// Appends a `Response` frame correlated to a prior `Request`'s `seq`.
    pub fn send_response(&mut self, flags: u8, seq: u32, data: &[u8]) -> Result<(), EncoderError> {
        codec::encode_response(&mut self.outbound, flags, seq, data)?;
        Ok(())
    }

    /// Appends a `Push` frame. The payload is transmitted verbatim.
    pub fn send_push(&mut self, flags: u8, data: &[u8]) -> Result<(), EncoderError> {
        codec::encode_push(&mut self.outbound, flags, data)?;
        Ok(())
    }

    /// Appends the handshake `Hello` frame. Always encodes `seq = 0` —
    /// Hello precedes any other sequence allocation and does not consume
    /// the counter.
    pub fn send_hello(
        &mut self,
        flags: u8,
        supported_encodings: &[Vec<u8>],
        supported_compressors: &[Vec<u8>],
    ) -> Result<(), EncoderError> {
        codec::encode_hello(&mut self.outbound, flags, 0, supported_encodings, supported_compressors)?;
        Ok(())
    }

    /// Appends the `HelloAck` handshake reply.
    pub fn send_hello_ack(
        &mut self,
        flags: u8,
        ping_interval: u32,
        selected_encoding: &[u8],
        selected_compressor: &[u8],
    ) -> Result<(), EncoderError> {
        codec::encode_hello_ack(&mut self.outbound, flags, ping_interval, selected_encoding, selected_compressor)?;
        Ok(())
    }

    /// Appends a `GoAway` frame. `reason` defaults to empty when `None`.
    pub fn send_goaway(&mut self, flags: u8, code: u16, reason: Option<&[u8]>) -> Result<(), EncoderError> {
        codec::encode_goaway(&mut self.outbound, flags, code, reason.unwrap_or(&[]))?;
        Ok(())
    }

    /// Appends an `Error` frame correlated to `seq`. `reason` defaults to
    /// empty when `None`.
    pub fn send_error(
        &mut self,
        flags: u8,
        code: u16,
        seq: u32,
        reason: Option<&[u8]>,
    ) -> Result<(), EncoderError> {
        codec::encode_error(&mut self.outbound, flags, code, seq, reason.unwrap_or(&[]))?;
        Ok(())
    }

    /// Unread bytes currently pending in the outbound buffer.
    pub fn write_buffer_len(&self) -> usize {
        self.outbound.len() - self.write_position
    }

    /// Returns up to `n` pending bytes starting at the current write
    /// position. If `consume` is true, advances the position and runs the
    /// reset/compact housekeeping below. Returns an empty `Vec` when
    /// nothing is pending.
    pub fn get_bytes(&mut self, n: usize, consume: bool) -> Vec<u8> {
        let take = n.min(self.write_buffer_len());
        if take == 0 {
            return Vec::new();
        }
        let start = self.write_position;
        let bytes = self.outbound.as_slice()[start..start + take].to_vec();
        if consume {
            self.write_position += take;
            self.reset_or_compact_outbound();
        }
        bytes
    }

    /// Advances the write position by `min(n, pending)` and returns the
    /// bytes still pending afterward.
    pub fn consume_bytes(&mut self, n: usize) -> usize {
        let take = n.min(self.write_buffer_len());
        self.write_position += take;
        self.reset_or_compact_outbound();
        self.write_buffer_len()
    }

    /// Feeds bytes into the decoder and returns all frames completed by
    /// this call, in the order they finished decoding. Fails on any
    /// decode error; per the protocol's error policy the stream is then
    /// considered terminal and should be closed by the caller.
    pub fn on_bytes_received(&mut self, data: &[u8]) -> Result<Vec<Frame>, DecoderError> {
        self.decoder.push(data)
    }

    /// After a drain: fully reset the outbound buffer if it is fully
    /// drained, compact it if the drained prefix exceeds half of
    /// capacity, or leave it alone otherwise. Bounds the "wasted head" of
    /// a partially-drained buffer to half its capacity without paying an
    /// O(n) shift on every small drain.
    fn reset_or_compact_outbound(&mut self) {
        if self.write_position == self.outbound.len() {
            self.outbound.reset();
            self.write_position = 0;
        } else if self.outbound.len() > self.write_position
            && self.write_position > self.outbound.capacity() / 2
        {
            self.outbound.compact(self.write_position);
            self.write_position = 0;
        }
    }
}
