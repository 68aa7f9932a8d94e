//! Decode-error taxonomy, exercised end to end through `StreamHandler`
//! and the standalone `Decoder`.

use toku_codec::{Buffer, Decoder, DecoderError, StreamHandler};

#[test]
fn unknown_opcode_is_rejected() {
    let mut decoder = Decoder::new();
    let err = decoder.push(&[0x7F, 0, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err, DecoderError::InvalidOpcode { opcode: 0x7F });
}

#[test]
fn reserved_opcode_eight_is_rejected_just_like_an_unknown_one() {
    let mut decoder = Decoder::new();
    let err = decoder.push(&[8, 0, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err, DecoderError::InvalidOpcode { opcode: 8 });
}

#[test]
fn oversized_payload_is_rejected_before_allocating_it() {
    let mut buf = Buffer::new();
    toku_codec::codec::encode_push(&mut buf, 0, &vec![0u8; 100]).unwrap();
    let mut decoder = Decoder::with_max_payload_size(16);
    let err = decoder.push(buf.as_slice()).unwrap_err();
    assert_eq!(err, DecoderError::InvalidSize { got: 100, max: 16 });
}

#[test]
fn malformed_hello_payload_without_pipe_is_rejected() {
    // Hand-craft a Hello frame whose payload has no `|` separator.
    let mut header = vec![0u8, 0]; // opcode=HELLO, flags=0
    header.extend_from_slice(&0u32.to_be_bytes()); // seq
    let payload = b"jsonmsgpack";
    header.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    header.extend_from_slice(payload);

    let mut decoder = Decoder::new();
    let err = decoder.push(&header).unwrap_err();
    assert_eq!(err, DecoderError::BadHelloPayload);
}

#[test]
fn decoder_is_reset_after_an_error_and_does_not_resurrect_prior_state() {
    let mut decoder = Decoder::new();
    assert!(decoder.push(&[8, 0, 0, 0, 0, 0]).is_err());

    // A well-formed frame sent right after still decodes cleanly — the
    // decoder does not carry over any state from the rejected frame.
    let mut buf = Buffer::new();
    toku_codec::codec::encode_ping(&mut buf, 0, 5).unwrap();
    let frames = decoder.push(buf.as_slice()).unwrap();
    assert_eq!(frames.len(), 1);
}

#[test]
fn stream_handler_propagates_decode_errors_to_caller() {
    let mut handler = StreamHandler::new();
    let err = handler.on_bytes_received(&[8, 0, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err, DecoderError::InvalidOpcode { opcode: 8 });
}
