//! The protocol's own worked examples, reproduced byte-for-byte.

use toku_codec::{Backoff, Buffer, Config, Decoder, DecoderError, Frame, StreamHandler};

/// Scenario 1: `Ping(flags=0, seq=1)` encodes to exactly six bytes.
#[test]
fn scenario_ping_is_six_bytes() {
    let mut buf = Buffer::new();
    toku_codec::codec::encode_ping(&mut buf, 0, 1).unwrap();
    assert_eq!(buf.as_slice(), &[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
}

/// Scenario 2: `Request(flags=0, seq=7, data=b"hi")` encodes to twelve
/// bytes: a ten-byte header followed by the two-byte payload.
#[test]
fn scenario_request_is_twelve_bytes() {
    let mut buf = Buffer::new();
    toku_codec::codec::encode_request(&mut buf, 0, 7, b"hi").unwrap();
    assert_eq!(
        buf.as_slice(),
        &[0x04, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x02, b'h', b'i']
    );
}

/// Scenario 3: `Hello` with encodings `["json", "msgpack"]` and no
/// compressors serializes its payload as `"json,msgpack|"`.
#[test]
fn scenario_hello_payload_format() {
    let mut buf = Buffer::new();
    toku_codec::codec::encode_hello(
        &mut buf,
        0,
        0,
        &[b"json".to_vec(), b"msgpack".to_vec()],
        &[],
    )
    .unwrap();
    // header(10) + payload("json,msgpack|" = 13)
    let payload = &buf.as_slice()[10..];
    assert_eq!(payload, b"json,msgpack|");
}

/// Scenario 4: Hello always carries `seq = 0`, regardless of how many
/// frames were sent on the handler beforehand.
#[test]
fn scenario_hello_seq_is_always_zero() {
    let mut handler = StreamHandler::new();
    handler.send_ping(0).unwrap();
    handler.send_ping(0).unwrap();
    handler.send_hello(0, &[], &[]).unwrap();
    let bytes = handler.get_bytes(handler.write_buffer_len(), true);
    let mut decoder = Decoder::new();
    let frames = decoder.push(&bytes).unwrap();
    match frames.last().unwrap() {
        Frame::Hello { seq, .. } => assert_eq!(*seq, 0),
        other => panic!("expected Hello, got {other:?}"),
    }
}

/// Scenario 5: invalid and reserved opcodes are both rejected the same
/// way — neither `0xFF` (never assigned) nor `8` (reserved) is a live
/// frame kind.
#[test]
fn scenario_invalid_and_reserved_opcodes_both_fail_the_same_way() {
    let mut decoder = Decoder::new();
    assert_eq!(
        decoder.push(&[0xFF, 0, 0, 0, 0, 0]).unwrap_err(),
        DecoderError::InvalidOpcode { opcode: 0xFF }
    );

    let mut decoder = Decoder::new();
    assert_eq!(
        decoder.push(&[8, 0, 0, 0, 0, 0]).unwrap_err(),
        DecoderError::InvalidOpcode { opcode: 8 }
    );
}

/// Scenario 6: with `min_delay = 0.5`, `max_delay = 5.0`, jitter off, four
/// consecutive failures produce exactly `1.5, 4.5, 5.0, 5.0`.
#[test]
fn scenario_backoff_worked_example() {
    let mut backoff = Backoff::new(0.5, Some(5.0), false);
    assert_eq!(backoff.fail(), 1.5);
    assert_eq!(backoff.fail(), 4.5);
    assert_eq!(backoff.fail(), 5.0);
    assert_eq!(backoff.fail(), 5.0);
}

/// Scenario 7: a sequence counter one step from wrap (`SEQ_MAX - 1`)
/// allocates `SEQ_MAX - 1` once more and then wraps to `0`.
#[test]
fn scenario_sequence_wraps_at_seq_max() {
    let mut cfg = Config::default();
    cfg.seq_max = 4;
    let mut handler = StreamHandler::with_config(cfg);
    // Drive it to one allocation short of the wrap.
    handler.send_ping(0).unwrap(); // 1
    handler.send_ping(0).unwrap(); // 2
    assert_eq!(handler.send_ping(0).unwrap(), 3); // seq_max - 1
    assert_eq!(handler.send_ping(0).unwrap(), 0); // wraps
}

/// GoAway carries a `code`, never a `seq` — the frame has no correlation
/// to any particular in-flight request.
#[test]
fn scenario_goaway_has_no_sequence_field() {
    let mut handler = StreamHandler::new();
    handler.send_goaway(0, 7, Some(b"shutting down")).unwrap();
    let bytes = handler.get_bytes(handler.write_buffer_len(), true);
    let mut decoder = Decoder::new();
    let frames = decoder.push(&bytes).unwrap();
    assert_eq!(
        frames,
        vec![Frame::GoAway {
            flags: 0,
            code: 7,
            reason: b"shutting down".to_vec()
        }]
    );
}

/// `send_push`'s payload reaches the wire (and the far decoder) exactly
/// as given, with no truncation or re-encoding.
#[test]
fn scenario_push_payload_survives_verbatim() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let mut handler = StreamHandler::new();
    handler.send_push(0, &payload).unwrap();
    let bytes = handler.get_bytes(handler.write_buffer_len(), true);
    let mut decoder = Decoder::new();
    let frames = decoder.push(&bytes).unwrap();
    assert_eq!(
        frames,
        vec![Frame::Push {
            flags: 0,
            data: payload
        }]
    );
}
