//! Round-trip: encoding a frame into an empty buffer and feeding the
//! resulting bytes to a fresh decoder must yield exactly that frame back.

use toku_codec::{Buffer, Decoder, Frame, StreamHandler};

fn round_trip(encode: impl FnOnce(&mut Buffer)) -> Vec<Frame> {
    let mut buf = Buffer::new();
    encode(&mut buf);
    let mut decoder = Decoder::new();
    decoder.push(buf.as_slice()).unwrap()
}

#[test]
fn hello_round_trips() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_hello(
            buf,
            0,
            0,
            &[b"json".to_vec(), b"msgpack".to_vec()],
            &[b"gzip".to_vec()],
        )
        .unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::Hello {
            flags: 0,
            seq: 0,
            supported_encodings: vec![b"json".to_vec(), b"msgpack".to_vec()],
            supported_compressors: vec![b"gzip".to_vec()],
        }]
    );
}

#[test]
fn hello_ack_round_trips_with_empty_compressor() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_hello_ack(buf, 0, 5, b"json", b"").unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::HelloAck {
            flags: 0,
            ping_interval: 5,
            selected_encoding: b"json".to_vec(),
            selected_compressor: b"".to_vec(),
        }]
    );
}

#[test]
fn ping_pong_round_trip() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_ping(buf, 0, 1).unwrap();
    });
    assert_eq!(frames, vec![Frame::Ping { flags: 0, seq: 1 }]);

    let frames = round_trip(|buf| {
        toku_codec::codec::encode_pong(buf, 0, 1).unwrap();
    });
    assert_eq!(frames, vec![Frame::Pong { flags: 0, seq: 1 }]);
}

#[test]
fn request_response_round_trip() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_request(buf, 0, 7, b"hi").unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::Request {
            flags: 0,
            seq: 7,
            data: b"hi".to_vec()
        }]
    );

    let frames = round_trip(|buf| {
        toku_codec::codec::encode_response(buf, 0, 7, b"ok").unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::Response {
            flags: 0,
            seq: 7,
            data: b"ok".to_vec()
        }]
    );
}

#[test]
fn push_payload_is_transmitted_verbatim() {
    let payload = b"breaking news".to_vec();
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_push(buf, 0, &payload).unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::Push {
            flags: 0,
            data: payload
        }]
    );
}

#[test]
fn goaway_round_trips_with_code_not_seq() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_goaway(buf, 0, 42, b"bye").unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::GoAway {
            flags: 0,
            code: 42,
            reason: b"bye".to_vec()
        }]
    );
}

#[test]
fn error_round_trips_with_code_and_seq() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_error(buf, 0, 9, 3, b"boom").unwrap();
    });
    assert_eq!(
        frames,
        vec![Frame::Error {
            flags: 0,
            code: 9,
            seq: 3,
            data: b"boom".to_vec()
        }]
    );
}

#[test]
fn zero_length_payload_decodes_to_empty_not_missing() {
    let frames = round_trip(|buf| {
        toku_codec::codec::encode_request(buf, 0, 1, b"").unwrap();
    });
    match &frames[..] {
        [Frame::Request { data, .. }] => assert!(data.is_empty()),
        other => panic!("unexpected frames: {other:?}"),
    }
}

#[test]
fn stream_handler_send_and_receive_round_trip() {
    let mut sender = StreamHandler::new();
    let seq = sender.send_request(0, b"hello").unwrap();
    let bytes = sender.get_bytes(sender.write_buffer_len(), true);

    let mut receiver = StreamHandler::new();
    let frames = receiver.on_bytes_received(&bytes).unwrap();
    assert_eq!(
        frames,
        vec![Frame::Request {
            flags: 0,
            seq,
            data: b"hello".to_vec()
        }]
    );
}
