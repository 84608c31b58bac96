//! Decoder Tests
//!
//! Tests for reply decoding, covering every RESP2/RESP3 type, incomplete
//! input, resumption, and rejection of malformed or oversized input.

use bytes::Bytes;
use resp3string::protocol::{decode, decode_with_limits, Decoded, Decoder, Limits, Reply};
use resp3string::RespError;

// =============================================================================
// Helper Functions
// =============================================================================

fn decode_complete(bytes: &[u8]) -> Reply {
    match decode(bytes).unwrap() {
        Decoded::Complete { reply, consumed } => {
            assert_eq!(consumed, bytes.len(), "reply should use every byte");
            reply
        }
        Decoded::Incomplete => panic!("Expected complete reply for {:?}", bytes),
    }
}

fn bulk(s: &'static str) -> Reply {
    Reply::BulkString(Some(Bytes::from_static(s.as_bytes())))
}

fn assert_protocol_error(bytes: &[u8]) {
    match decode(bytes) {
        Err(RespError::Protocol(_)) => {}
        other => panic!("Expected protocol error for {:?}, got {:?}", bytes, other),
    }
}

// =============================================================================
// RESP2 Type Tests
// =============================================================================

#[test]
fn test_decode_simple_string() {
    assert_eq!(decode_complete(b"+OK\r\n"), Reply::SimpleString("OK".to_string()));
}

#[test]
fn test_decode_error() {
    let reply = decode_complete(b"-ERR wrong number of arguments\r\n");
    assert_eq!(reply, Reply::Error("ERR wrong number of arguments".to_string()));
    assert!(reply.is_error());
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode_complete(b":1000\r\n"), Reply::Integer(1000));
    assert_eq!(decode_complete(b":-42\r\n"), Reply::Integer(-42));
}

#[test]
fn test_decode_bulk_string() {
    assert_eq!(decode_complete(b"$5\r\nhello\r\n"), bulk("hello"));
    assert_eq!(decode_complete(b"$0\r\n\r\n"), bulk(""));
}

#[test]
fn test_decode_bulk_string_binary_payload() {
    // Payload containing CRLF is taken by length, not by terminator
    let reply = decode_complete(b"$4\r\na\r\nb\r\n");
    assert_eq!(reply, bulk("a\r\nb"));
}

#[test]
fn test_decode_null_bulk_string() {
    let reply = decode_complete(b"$-1\r\n");
    assert_eq!(reply, Reply::BulkString(None));
    assert!(reply.is_null());
}

#[test]
fn test_decode_array() {
    let reply = decode_complete(b"*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n");
    assert_eq!(reply, Reply::Array(Some(vec![bulk("foo"), bulk("bar")])));
}

#[test]
fn test_decode_empty_and_null_array() {
    assert_eq!(decode_complete(b"*0\r\n"), Reply::Array(Some(vec![])));
    assert_eq!(decode_complete(b"*-1\r\n"), Reply::Array(None));
}

#[test]
fn test_decode_nested_array() {
    let reply = decode_complete(b"*2\r\n*2\r\n:1\r\n:2\r\n*1\r\n+x\r\n");
    assert_eq!(
        reply,
        Reply::Array(Some(vec![
            Reply::Array(Some(vec![Reply::Integer(1), Reply::Integer(2)])),
            Reply::Array(Some(vec![Reply::SimpleString("x".to_string())])),
        ]))
    );
}

#[test]
fn test_decode_mixed_array() {
    let reply = decode_complete(b"*4\r\n:1\r\n$-1\r\n-ERR x\r\n*0\r\n");
    assert_eq!(
        reply,
        Reply::Array(Some(vec![
            Reply::Integer(1),
            Reply::BulkString(None),
            Reply::Error("ERR x".to_string()),
            Reply::Array(Some(vec![])),
        ]))
    );
}

// =============================================================================
// RESP3 Type Tests
// =============================================================================

#[test]
fn test_decode_null() {
    let reply = decode_complete(b"_\r\n");
    assert_eq!(reply, Reply::Null);
    assert!(reply.is_null());
}

#[test]
fn test_decode_boolean() {
    assert_eq!(decode_complete(b"#t\r\n"), Reply::Boolean(true));
    assert_eq!(decode_complete(b"#f\r\n"), Reply::Boolean(false));
}

#[test]
fn test_decode_double() {
    assert_eq!(decode_complete(b",2.75\r\n"), Reply::Double(2.75));
    assert_eq!(decode_complete(b",-2\r\n"), Reply::Double(-2.0));
    assert_eq!(decode_complete(b",1.5e3\r\n"), Reply::Double(1500.0));
    assert_eq!(decode_complete(b",inf\r\n"), Reply::Double(f64::INFINITY));
    assert_eq!(decode_complete(b",-inf\r\n"), Reply::Double(f64::NEG_INFINITY));

    match decode_complete(b",nan\r\n") {
        Reply::Double(d) => assert!(d.is_nan()),
        other => panic!("Expected double, got {:?}", other),
    }
}

#[test]
fn test_decode_big_number() {
    let reply = decode_complete(b"(3492890328409238509324850943850943825024385\r\n");
    assert_eq!(
        reply,
        Reply::BigNumber("3492890328409238509324850943850943825024385".to_string())
    );
    assert_eq!(decode_complete(b"(-12\r\n"), Reply::BigNumber("-12".to_string()));
}

#[test]
fn test_decode_map() {
    let reply = decode_complete(b"%2\r\n+first\r\n:1\r\n+second\r\n:2\r\n");
    assert_eq!(
        reply,
        Reply::Map(vec![
            (Reply::SimpleString("first".to_string()), Reply::Integer(1)),
            (Reply::SimpleString("second".to_string()), Reply::Integer(2)),
        ])
    );
}

#[test]
fn test_decode_empty_map() {
    assert_eq!(decode_complete(b"%0\r\n"), Reply::Map(vec![]));
}

#[test]
fn test_decode_set() {
    let reply = decode_complete(b"~3\r\n+a\r\n+b\r\n#t\r\n");
    assert_eq!(
        reply,
        Reply::Set(vec![
            Reply::SimpleString("a".to_string()),
            Reply::SimpleString("b".to_string()),
            Reply::Boolean(true),
        ])
    );
}

#[test]
fn test_decode_map_with_aggregate_values() {
    let reply = decode_complete(b"%1\r\n$4\r\nkeys\r\n~2\r\n$1\r\na\r\n_\r\n");
    assert_eq!(
        reply,
        Reply::Map(vec![(bulk("keys"), Reply::Set(vec![bulk("a"), Reply::Null]))])
    );
}

// =============================================================================
// Byte Accounting Tests
// =============================================================================

#[test]
fn test_decode_reports_consumed_with_trailing_bytes() {
    let bytes = b"+OK\r\n:5\r\n";
    match decode(bytes).unwrap() {
        Decoded::Complete { reply, consumed } => {
            assert_eq!(reply, Reply::SimpleString("OK".to_string()));
            assert_eq!(consumed, 5);
        }
        Decoded::Incomplete => panic!("Expected complete reply"),
    }
}

// =============================================================================
// Incomplete Input Tests
// =============================================================================

#[test]
fn test_decode_incomplete_prefixes() {
    let full: &[u8] = b"*3\r\n$3\r\nfoo\r\n%1\r\n+k\r\n:1\r\n,2.5\r\n";
    for end in 0..full.len() {
        assert_eq!(
            decode(&full[..end]).unwrap(),
            Decoded::Incomplete,
            "prefix of {} bytes",
            end
        );
    }
    assert!(matches!(decode(full).unwrap(), Decoded::Complete { .. }));
}

#[test]
fn test_decode_bulk_missing_terminator_is_incomplete() {
    assert_eq!(decode(b"$5\r\nhello").unwrap(), Decoded::Incomplete);
    assert_eq!(decode(b"$5\r\nhello\r").unwrap(), Decoded::Incomplete);
}

#[test]
fn test_decoder_resumes_bulk_string() {
    let mut decoder = Decoder::new();

    decoder.feed(b"$5\r\nhel");
    assert_eq!(decoder.next_reply().unwrap(), None);

    decoder.feed(b"lo\r\n");
    assert_eq!(decoder.next_reply().unwrap(), Some(bulk("hello")));
    assert_eq!(decoder.buffered(), 0);
}

#[test]
fn test_decoder_resumes_array_byte_by_byte() {
    let bytes: &[u8] = b"*3\r\n:1\r\n$3\r\nabc\r\n~1\r\n#f\r\n";
    let mut decoder = Decoder::new();

    for (i, byte) in bytes.iter().enumerate() {
        decoder.feed(&[*byte]);
        let reply = decoder.next_reply().unwrap();
        if i + 1 < bytes.len() {
            assert_eq!(reply, None, "reply completed early at byte {}", i);
        } else {
            assert_eq!(
                reply,
                Some(Reply::Array(Some(vec![
                    Reply::Integer(1),
                    bulk("abc"),
                    Reply::Set(vec![Reply::Boolean(false)]),
                ])))
            );
        }
    }
}

#[test]
fn test_decoder_keeps_leftover_bytes() {
    let mut decoder = Decoder::new();
    decoder.feed(b"+OK\r\n$3\r\nfo");

    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::SimpleString("OK".to_string())));
    assert_eq!(decoder.buffered(), 6);
    assert_eq!(decoder.next_reply().unwrap(), None);

    decoder.feed(b"o\r\n");
    assert_eq!(decoder.next_reply().unwrap(), Some(bulk("foo")));
    assert_eq!(decoder.next_reply().unwrap(), None);
}

#[test]
fn test_decoder_multiple_replies_in_one_feed() {
    let mut decoder = Decoder::new();
    decoder.feed(b":1\r\n:2\r\n:3\r\n");

    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::Integer(1)));
    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::Integer(2)));
    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::Integer(3)));
    assert_eq!(decoder.next_reply().unwrap(), None);
}

#[test]
fn test_decoder_clear_after_protocol_error() {
    let mut decoder = Decoder::new();
    decoder.feed(b"*2\r\n:1\r\n?bad\r\n");

    assert!(decoder.next_reply().unwrap_err().is_protocol());
    assert_eq!(decoder.buffered(), 0);

    decoder.feed(b"+OK\r\n");
    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::SimpleString("OK".to_string())));
}

#[test]
fn test_decoder_long_line_in_chunks() {
    let line = vec![b'a'; 4 * 1024 * 1024];
    let mut wire = Vec::with_capacity(line.len() + 3);
    wire.push(b'+');
    wire.extend_from_slice(&line);
    wire.extend_from_slice(b"\r\n");

    let mut decoder = Decoder::new();
    let mut reply = None;
    for chunk in wire.chunks(4096) {
        decoder.feed(chunk);
        reply = decoder.next_reply().unwrap();
    }

    match reply {
        Some(Reply::SimpleString(s)) => assert_eq!(s.len(), line.len()),
        other => panic!("Expected simple string, got {:?}", other),
    }
    assert_eq!(decoder.buffered(), 0);
}

#[test]
fn test_decoder_terminator_split_across_feeds() {
    let mut decoder = Decoder::new();

    decoder.feed(b":12");
    assert_eq!(decoder.next_reply().unwrap(), None);
    decoder.feed(b"34\r");
    assert_eq!(decoder.next_reply().unwrap(), None);
    decoder.feed(b"\n+OK");
    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::Integer(1234)));

    // The search state starts over for the next reply
    assert_eq!(decoder.next_reply().unwrap(), None);
    decoder.feed(b"\r\n");
    assert_eq!(decoder.next_reply().unwrap(), Some(Reply::SimpleString("OK".to_string())));
}

#[test]
fn test_decoder_bulk_header_split_then_payload() {
    let mut decoder = Decoder::new();

    decoder.feed(b"*1\r\n$1");
    assert_eq!(decoder.next_reply().unwrap(), None);
    decoder.feed(b"1\r\nhello");
    assert_eq!(decoder.next_reply().unwrap(), None);
    decoder.feed(b" world\r\n");
    assert_eq!(
        decoder.next_reply().unwrap(),
        Some(Reply::Array(Some(vec![bulk("hello world")])))
    );
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_malformed_length() {
    assert_protocol_error(b"$abc\r\n");
    assert_protocol_error(b"*x\r\n");
    assert_protocol_error(b"$\r\n");
}

#[test]
fn test_decode_lengths_are_plain_decimal() {
    assert_protocol_error(b"$+3\r\nabc\r\n");
    assert_protocol_error(b"$-0\r\n\r\n");
    assert_protocol_error(b"*+1\r\n:1\r\n");
    assert_protocol_error(b"*-01\r\n");
    assert_protocol_error(b"$ 3\r\nabc\r\n");
    assert_protocol_error(b"%+1\r\n:1\r\n:2\r\n");

    // Leading zeros are still digits
    assert_eq!(decode_complete(b"$03\r\nabc\r\n"), bulk("abc"));
}

#[test]
fn test_decode_negative_lengths() {
    assert_protocol_error(b"$-2\r\n");
    assert_protocol_error(b"*-5\r\n");
    assert_protocol_error(b"%-1\r\n");
    assert_protocol_error(b"~-1\r\n");
}

#[test]
fn test_decode_unknown_type_byte() {
    let err = decode(b"?what\r\n").unwrap_err();
    assert!(err.is_protocol());
    assert!(err.to_string().contains("Unknown reply type byte"));

    // Rejected before any terminator arrives
    assert_protocol_error(b"x");
}

#[test]
fn test_decode_invalid_scalars() {
    assert_protocol_error(b":12a\r\n");
    assert_protocol_error(b"#x\r\n");
    assert_protocol_error(b",abc\r\n");
    assert_protocol_error(b"(12x\r\n");
    assert_protocol_error(b"(\r\n");
    assert_protocol_error(b"_x\r\n");
}

#[test]
fn test_decode_invalid_utf8_simple_string() {
    assert_protocol_error(b"+\xff\xfe\r\n");
}

#[test]
fn test_decode_bulk_without_crlf_after_payload() {
    assert_protocol_error(b"$3\r\nfooXY");
}

// =============================================================================
// Limit Tests
// =============================================================================

fn small_limits() -> Limits {
    Limits {
        max_bulk_len: 8,
        max_aggregate_len: 3,
        max_depth: 2,
    }
}

#[test]
fn test_bulk_length_over_limit() {
    // Rejected from the header alone, before any payload is buffered
    let err = decode_with_limits(b"$1000000\r\n", &small_limits()).unwrap_err();
    assert!(err.to_string().contains("Bulk string too large"));

    assert!(decode_with_limits(b"$8\r\n12345678\r\n", &small_limits()).is_ok());
}

#[test]
fn test_aggregate_length_over_limit() {
    assert!(decode_with_limits(b"*4\r\n", &small_limits()).unwrap_err().is_protocol());
    assert!(decode_with_limits(b"%4\r\n", &small_limits()).unwrap_err().is_protocol());
    assert!(decode_with_limits(b"~4\r\n", &small_limits()).unwrap_err().is_protocol());
}

#[test]
fn test_huge_aggregate_header_does_not_allocate() {
    // Default limits allow the count; the header alone must not reserve it
    assert_eq!(decode(b"*16000000\r\n").unwrap(), Decoded::Incomplete);
}

#[test]
fn test_nesting_depth_over_limit() {
    assert!(decode_with_limits(b"*1\r\n*1\r\n:1\r\n", &small_limits()).is_ok());

    let err = decode_with_limits(b"*1\r\n*1\r\n*1\r\n:1\r\n", &small_limits()).unwrap_err();
    assert!(err.to_string().contains("nesting"));
}

#[test]
fn test_unterminated_line_over_limit() {
    let err = decode_with_limits(b"+0123456789", &small_limits()).unwrap_err();
    assert!(err.is_protocol());

    assert_eq!(
        decode_with_limits(b"+0123", &small_limits()).unwrap(),
        Decoded::Incomplete
    );
}

#[test]
fn test_decoder_with_limits() {
    let mut decoder = Decoder::with_limits(small_limits());
    assert_eq!(decoder.limits().max_bulk_len, 8);

    decoder.feed(b"$9\r\n");
    assert!(decoder.next_reply().unwrap_err().is_protocol());
}
