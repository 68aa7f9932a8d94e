//! Frame encoder and the incremental frame decoder.
//!
//! Encoding never suspends, never performs I/O, and appends directly to a
//! caller-owned [`Buffer`]. Decoding is a small state machine that makes
//! progress on any byte prefix: a single call to [`Decoder::push`] may
//! consume a partial header, a frame split mid-payload, or several
//! complete frames back to back, and it never allocates per byte.

use crate::buffer::Buffer;
use crate::error::{DecoderError, EncoderError};
use crate::opcode::{self, header_spec, opcode_id, Frame, HeaderSpec};

/// Default safety cap on `payload_size` (16 MiB). Payloads larger than
/// this are rejected with [`DecoderError::InvalidSize`] rather than
/// allocated.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

fn push_header(
    header: &mut Vec<u8>,
    opcode: u8,
    flags: u8,
    seq: Option<u32>,
    code: Option<u16>,
    ping_interval: Option<u32>,
    payload_len: Option<u32>,
) {
    header.push(opcode);
    header.push(flags);
    if let Some(s) = seq {
        header.extend_from_slice(&s.to_be_bytes());
    }
    if let Some(c) = code {
        header.extend_from_slice(&c.to_be_bytes());
    }
    if let Some(p) = ping_interval {
        header.extend_from_slice(&p.to_be_bytes());
    }
    if let Some(l) = payload_len {
        header.extend_from_slice(&l.to_be_bytes());
    }
}

fn append_frame(
    buf: &mut Buffer,
    opcode: u8,
    flags: u8,
    seq: Option<u32>,
    code: Option<u16>,
    ping_interval: Option<u32>,
    payload: Option<&[u8]>,
) -> Result<usize, EncoderError> {
    let payload_len = payload.map(|p| p.len() as u32);
    let mut header = Vec::with_capacity(12);
    push_header(&mut header, opcode, flags, seq, code, ping_interval, payload_len);
    let header_len = header.len();
    buf.append(&header)?;
    if let Some(p) = payload {
        buf.append(p)?;
    }
    Ok(header_len + payload.map_or(0, |p| p.len()))
}

/// Appends a `Hello` frame: `flags, seq, encodings|compressors`.
pub fn encode_hello(
    buf: &mut Buffer,
    flags: u8,
    seq: u32,
    supported_encodings: &[Vec<u8>],
    supported_compressors: &[Vec<u8>],
) -> Result<usize, EncoderError> {
    let payload = opcode::encode_hello_payload(supported_encodings, supported_compressors);
    append_frame(buf, opcode_id::HELLO, flags, Some(seq), None, None, Some(&payload))
}

/// Appends a `HelloAck` frame: `flags, ping_interval, encoding|compressor`.
pub fn encode_hello_ack(
    buf: &mut Buffer,
    flags: u8,
    ping_interval: u32,
    selected_encoding: &[u8],
    selected_compressor: &[u8],
) -> Result<usize, EncoderError> {
    let payload = opcode::encode_hello_ack_payload(selected_encoding, selected_compressor);
    append_frame(buf, opcode_id::HELLO_ACK, flags, None, None, Some(ping_interval), Some(&payload))
}

/// Appends a `Ping` frame. Ping carries no payload.
pub fn encode_ping(buf: &mut Buffer, flags: u8, seq: u32) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::PING, flags, Some(seq), None, None, None)
}

/// Appends a `Pong` frame. Pong carries no payload.
pub fn encode_pong(buf: &mut Buffer, flags: u8, seq: u32) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::PONG, flags, Some(seq), None, None, None)
}

/// Appends a `Request` frame.
pub fn encode_request(buf: &mut Buffer, flags: u8, seq: u32, data: &[u8]) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::REQUEST, flags, Some(seq), None, None, Some(data))
}

/// Appends a `Response` frame.
pub fn encode_response(buf: &mut Buffer, flags: u8, seq: u32, data: &[u8]) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::RESPONSE, flags, Some(seq), None, None, Some(data))
}

/// Appends a `Push` frame. The payload is transmitted verbatim.
pub fn encode_push(buf: &mut Buffer, flags: u8, data: &[u8]) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::PUSH, flags, None, None, None, Some(data))
}

/// Appends a `GoAway` frame. `reason` may be empty.
pub fn encode_goaway(buf: &mut Buffer, flags: u8, code: u16, reason: &[u8]) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::GOAWAY, flags, None, Some(code), None, Some(reason))
}

/// Appends an `Error` frame. `data` may be empty.
pub fn encode_error(
    buf: &mut Buffer,
    flags: u8,
    code: u16,
    seq: u32,
    data: &[u8],
) -> Result<usize, EncoderError> {
    append_frame(buf, opcode_id::ERROR, flags, Some(seq), Some(code), None, Some(data))
}

fn parse_header_fields(buf: &[u8], spec: &HeaderSpec) -> (Option<u32>, Option<u16>, Option<u32>, u32) {
    let mut offset = 2usize;
    let seq = spec.has_seq.then(|| {
        let v = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap());
        offset += 4;
        v
    });
    let code = spec.has_code.then(|| {
        let v = u16::from_be_bytes(buf[offset..offset + 2].try_into().unwrap());
        offset += 2;
        v
    });
    let ping_interval = spec.has_ping_interval.then(|| {
        let v = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap());
        offset += 4;
        v
    });
    let payload_size = if spec.has_payload {
        let v = u32::from_be_bytes(buf[offset..offset + 4].try_into().unwrap());
        offset += 4;
        v
    } else {
        0
    };
    debug_assert_eq!(offset, spec.header_size as usize);
    (seq, code, ping_interval, payload_size)
}

fn extract_frame(
    opcode: u8,
    flags: u8,
    seq: Option<u32>,
    code: Option<u16>,
    ping_interval: Option<u32>,
    payload: &[u8],
) -> Result<Frame, DecoderError> {
    use opcode_id::*;
    Ok(match opcode {
        HELLO => {
            let (supported_encodings, supported_compressors) = opcode::decode_hello_payload(payload)?;
            Frame::Hello {
                flags,
                seq: seq.expect("HELLO header always carries seq"),
                supported_encodings,
                supported_compressors,
            }
        }
        HELLO_ACK => {
            let (selected_encoding, selected_compressor) = opcode::decode_hello_ack_payload(payload)?;
            Frame::HelloAck {
                flags,
                ping_interval: ping_interval.expect("HELLO_ACK header always carries ping_interval"),
                selected_encoding,
                selected_compressor,
            }
        }
        PING => Frame::Ping {
            flags,
            seq: seq.expect("PING header always carries seq"),
        },
        PONG => Frame::Pong {
            flags,
            seq: seq.expect("PONG header always carries seq"),
        },
        REQUEST => Frame::Request {
            flags,
            seq: seq.expect("REQUEST header always carries seq"),
            data: payload.to_vec(),
        },
        RESPONSE => Frame::Response {
            flags,
            seq: seq.expect("RESPONSE header always carries seq"),
            data: payload.to_vec(),
        },
        PUSH => Frame::Push {
            flags,
            data: payload.to_vec(),
        },
        GOAWAY => Frame::GoAway {
            flags,
            code: code.expect("GOAWAY header always carries code"),
            reason: payload.to_vec(),
        },
        ERROR => Frame::Error {
            flags,
            code: code.expect("ERROR header always carries code"),
            seq: seq.expect("ERROR header always carries seq"),
            data: payload.to_vec(),
        },
        _ => unreachable!("opcode already validated by header_spec lookup"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Payload,
}

/// Incremental decoder for exactly one inbound frame at a time.
///
/// Feed it arbitrary-sized byte chunks via [`Decoder::push`]; it reports
/// the frames each call completed, in the order they finished decoding.
#[derive(Debug)]
pub struct Decoder {
    buf: Buffer,
    state: State,
    opcode: Option<u8>,
    spec: Option<HeaderSpec>,
    seq: Option<u32>,
    code: Option<u16>,
    ping_interval: Option<u32>,
    remaining: u32,
    max_payload_size: u32,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Creates a decoder with the default [`MAX_PAYLOAD_SIZE`] cap.
    pub fn new() -> Self {
        Self::with_max_payload_size(MAX_PAYLOAD_SIZE)
    }

    /// Creates a decoder with a custom payload size cap.
    pub fn with_max_payload_size(max_payload_size: u32) -> Self {
        Self {
            buf: Buffer::new(),
            state: State::Header,
            opcode: None,
            spec: None,
            seq: None,
            code: None,
            ping_interval: None,
            remaining: 0,
            max_payload_size,
        }
    }

    /// Feeds `data` into the decoder and returns the frames it completed.
    ///
    /// Returns an empty `Vec` if `data` only advanced a partial frame. On
    /// error the decode buffer has already been reset; the decoder is not
    /// meant to be reused after an error (§7 of the protocol treats decode
    /// errors as terminal) but doing so is not memory-unsafe, just
    /// semantically undefined.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>, DecoderError> {
        let mut out = Vec::new();
        self.push_into(data, &mut out)?;
        Ok(out)
    }

    /// Same as [`Decoder::push`] but appends to a caller-provided `Vec`,
    /// avoiding an allocation per call for callers that already own one.
    pub fn push_into(&mut self, mut data: &[u8], out: &mut Vec<Frame>) -> Result<(), DecoderError> {
        loop {
            match self.state {
                State::Header => {
                    if self.spec.is_none() {
                        let opcode = if !self.buf.is_empty() {
                            self.buf.as_slice()[0]
                        } else if !data.is_empty() {
                            data[0]
                        } else {
                            return Ok(());
                        };
                        match header_spec(opcode) {
                            Some(spec) => {
                                self.opcode = Some(opcode);
                                self.spec = Some(spec);
                            }
                            None => {
                                self.reset();
                                return Err(DecoderError::InvalidOpcode { opcode });
                            }
                        }
                    }
                    let spec = self.spec.expect("just populated above");
                    let need = spec.header_size as usize - self.buf.len();
                    if need > 0 {
                        if data.is_empty() {
                            return Ok(());
                        }
                        let take = need.min(data.len());
                        if let Err(e) = self.buf.append(&data[..take]) {
                            self.reset();
                            return Err(e.into());
                        }
                        data = &data[take..];
                    }
                    if self.buf.len() < spec.header_size as usize {
                        return Ok(());
                    }

                    let (seq, code, ping_interval, payload_size) =
                        parse_header_fields(self.buf.as_slice(), &spec);
                    if payload_size > self.max_payload_size {
                        self.reset();
                        return Err(DecoderError::InvalidSize {
                            got: payload_size,
                            max: self.max_payload_size,
                        });
                    }
                    self.seq = seq;
                    self.code = code;
                    self.ping_interval = ping_interval;
                    self.remaining = payload_size;
                    self.state = State::Payload;
                    if self.remaining == 0 {
                        self.finish_frame(out)?;
                    }
                }
                State::Payload => {
                    if self.remaining > 0 {
                        if data.is_empty() {
                            return Ok(());
                        }
                        let take = (self.remaining as usize).min(data.len());
                        if let Err(e) = self.buf.append(&data[..take]) {
                            self.reset();
                            return Err(e.into());
                        }
                        data = &data[take..];
                        self.remaining -= take as u32;
                    }
                    if self.remaining == 0 {
                        self.finish_frame(out)?;
                    } else {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn finish_frame(&mut self, out: &mut Vec<Frame>) -> Result<(), DecoderError> {
        let spec = self.spec.expect("frame cannot complete without a header spec");
        let opcode = self.opcode.expect("frame cannot complete without an opcode");
        let header_size = spec.header_size as usize;
        let frame = extract_frame(
            opcode,
            self.buf.as_slice()[1],
            self.seq,
            self.code,
            self.ping_interval,
            &self.buf.as_slice()[header_size..],
        );
        self.reset();
        out.push(frame?);
        Ok(())
    }

    fn reset(&mut self) {
        self.buf.reset();
        self.state = State::Header;
        self.opcode = None;
        self.spec = None;
        self.seq = None;
        self.code = None;
        self.ping_interval = None;
        self.remaining = 0;
    }
}
