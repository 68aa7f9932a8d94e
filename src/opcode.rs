//! Tagged-variant frame model and the header layout table.
//!
//! Every frame on the wire decodes to exactly one [`Frame`] variant. The
//! byte layout of each opcode's fixed header is looked up from
//! [`header_spec`] rather than branched on per opcode, per the design note
//! in the protocol's own documentation: a table is smaller and easier to
//! audit for completeness than a chain of matches duplicated between the
//! encoder and decoder.

use crate::error::DecoderError;

/// Wire opcode values (§3 of the protocol's frame table). `8` is reserved.
pub mod opcode_id {
    pub const HELLO: u8 = 0;
    pub const HELLO_ACK: u8 = 1;
    pub const PING: u8 = 2;
    pub const PONG: u8 = 3;
    pub const REQUEST: u8 = 4;
    pub const RESPONSE: u8 = 5;
    pub const PUSH: u8 = 6;
    pub const GOAWAY: u8 = 7;
    // 8 is reserved and unused.
    pub const ERROR: u8 = 9;
}

/// Per-frame bitfield flags.
pub mod flag {
    /// Payload is compressed by whatever compressor the session negotiated.
    pub const COMPRESSED: u8 = 1 << 0;
}

/// A fully decoded protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Hello {
        flags: u8,
        seq: u32,
        supported_encodings: Vec<Vec<u8>>,
        supported_compressors: Vec<Vec<u8>>,
    },
    HelloAck {
        flags: u8,
        ping_interval: u32,
        selected_encoding: Vec<u8>,
        selected_compressor: Vec<u8>,
    },
    Ping {
        flags: u8,
        seq: u32,
    },
    Pong {
        flags: u8,
        seq: u32,
    },
    Request {
        flags: u8,
        seq: u32,
        data: Vec<u8>,
    },
    Response {
        flags: u8,
        seq: u32,
        data: Vec<u8>,
    },
    Push {
        flags: u8,
        data: Vec<u8>,
    },
    GoAway {
        flags: u8,
        code: u16,
        reason: Vec<u8>,
    },
    Error {
        flags: u8,
        code: u16,
        seq: u32,
        data: Vec<u8>,
    },
}

impl Frame {
    /// The opcode byte this frame would be encoded with.
    pub fn opcode(&self) -> u8 {
        use opcode_id::*;
        match self {
            Frame::Hello { .. } => HELLO,
            Frame::HelloAck { .. } => HELLO_ACK,
            Frame::Ping { .. } => PING,
            Frame::Pong { .. } => PONG,
            Frame::Request { .. } => REQUEST,
            Frame::Response { .. } => RESPONSE,
            Frame::Push { .. } => PUSH,
            Frame::GoAway { .. } => GOAWAY,
            Frame::Error { .. } => ERROR,
        }
    }

    /// This frame's flags byte.
    pub fn flags(&self) -> u8 {
        match self {
            Frame::Hello { flags, .. }
            | Frame::HelloAck { flags, .. }
            | Frame::Ping { flags, .. }
            | Frame::Pong { flags, .. }
            | Frame::Request { flags, .. }
            | Frame::Response { flags, .. }
            | Frame::Push { flags, .. }
            | Frame::GoAway { flags, .. }
            | Frame::Error { flags, .. } => *flags,
        }
    }
}

/// Layout of a frame's fixed header, keyed by opcode.
///
/// `header_size` is the number of bytes preceding the payload (including
/// `payload_size` itself, when present) — i.e. the offset at which the
/// payload bytes begin once the header is fully buffered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderSpec {
    pub header_size: u32,
    pub has_seq: bool,
    pub has_code: bool,
    pub has_ping_interval: bool,
    pub has_payload: bool,
}

/// Looks up the header layout for `opcode`, or `None` if the opcode is
/// unknown (including the reserved value `8`).
///
/// Field order on the wire, when present, is always:
/// `opcode, flags, seq, code, ping_interval, payload_size`.
pub(crate) fn header_spec(opcode: u8) -> Option<HeaderSpec> {
    use opcode_id::*;
    const OPCODE_FLAGS: u32 = 2; // opcode(1) + flags(1)
    Some(match opcode {
        HELLO => HeaderSpec {
            header_size: OPCODE_FLAGS + 4 + 4, // seq + payload_size
            has_seq: true,
            has_code: false,
            has_ping_interval: false,
            has_payload: true,
        },
        HELLO_ACK => HeaderSpec {
            header_size: OPCODE_FLAGS + 4 + 4, // ping_interval + payload_size
            has_seq: false,
            has_code: false,
            has_ping_interval: true,
            has_payload: true,
        },
        PING | PONG => HeaderSpec {
            header_size: OPCODE_FLAGS + 4, // seq
            has_seq: true,
            has_code: false,
            has_ping_interval: false,
            has_payload: false,
        },
        REQUEST | RESPONSE => HeaderSpec {
            header_size: OPCODE_FLAGS + 4 + 4, // seq + payload_size
            has_seq: true,
            has_code: false,
            has_ping_interval: false,
            has_payload: true,
        },
        PUSH => HeaderSpec {
            header_size: OPCODE_FLAGS + 4, // payload_size
            has_seq: false,
            has_code: false,
            has_ping_interval: false,
            has_payload: true,
        },
        GOAWAY => HeaderSpec {
            header_size: OPCODE_FLAGS + 2 + 4, // code + payload_size
            has_seq: false,
            has_code: true,
            has_ping_interval: false,
            has_payload: true,
        },
        ERROR => HeaderSpec {
            header_size: OPCODE_FLAGS + 4 + 2 + 4, // seq + code + payload_size
            has_seq: true,
            has_code: true,
            has_ping_interval: false,
            has_payload: true,
        },
        _ => return None,
    })
}

/// Joins `tokens` with `,`, the comma-separated-list half of the
/// Hello/HelloAck micro-format.
fn join_tokens(tokens: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(tok);
    }
    out
}

/// Splits a comma-separated token list; an empty slice yields an empty
/// list rather than a single empty token.
fn split_tokens(bytes: &[u8]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes.split(|&b| b == b',').map(|s| s.to_vec()).collect()
}

/// Encodes a Hello payload: `encodings|compressors`, each a comma list.
pub(crate) fn encode_hello_payload(encodings: &[Vec<u8>], compressors: &[Vec<u8>]) -> Vec<u8> {
    let mut out = join_tokens(encodings);
    out.push(b'|');
    out.extend(join_tokens(compressors));
    out
}

/// Encodes a HelloAck payload: `encoding|compressor`, each a single token
/// that may be empty.
pub(crate) fn encode_hello_ack_payload(encoding: &[u8], compressor: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoding.len() + 1 + compressor.len());
    out.extend_from_slice(encoding);
    out.push(b'|');
    out.extend_from_slice(compressor);
    out
}

/// Splits `bytes` at its single `|` separator. Rejects payloads with zero
/// or more than one separator.
fn split_pipe(bytes: &[u8]) -> Result<(&[u8], &[u8]), DecoderError> {
    let idx = bytes
        .iter()
        .position(|&b| b == b'|')
        .ok_or(DecoderError::BadHelloPayload)?;
    if bytes[idx + 1..].contains(&b'|') {
        return Err(DecoderError::BadHelloPayload);
    }
    Ok((&bytes[..idx], &bytes[idx + 1..]))
}

/// Decodes a Hello payload into its two comma-lists.
pub(crate) fn decode_hello_payload(
    bytes: &[u8],
) -> Result<(Vec<Vec<u8>>, Vec<Vec<u8>>), DecoderError> {
    let (a, b) = split_pipe(bytes)?;
    Ok((split_tokens(a), split_tokens(b)))
}

/// Decodes a HelloAck payload into its two (possibly empty) tokens.
pub(crate) fn decode_hello_ack_payload(bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), DecoderError> {
    let (a, b) = split_pipe(bytes)?;
    Ok((a.to_vec(), b.to_vec()))
}
