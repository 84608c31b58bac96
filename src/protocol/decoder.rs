//! Reply decoder
//!
//! Parses server replies out of a byte buffer. Decoding never fails because
//! bytes are missing: a truncated buffer yields [`Decoded::Incomplete`] and
//! the caller reads more and retries.
//!
//! The resumable [`Decoder`] keeps a cursor and a stack of partially built
//! aggregates between calls. Elements of an array that were already parsed
//! are never parsed again when more bytes arrive; only the element that was
//! cut short is retried, and its line terminator search picks up where the
//! previous search stopped.

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{RespError, Result};
use super::codec::{CRLF, MAX_BULK_LEN};
use super::Reply;

/// Upper bound on elements preallocated for an aggregate, whatever its header claims
const PREALLOC_LIMIT: usize = 1024;

/// Bounds applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest bulk string payload, and longest unterminated line
    pub max_bulk_len: usize,

    /// Largest element count of an array or set, or pair count of a map
    pub max_aggregate_len: usize,

    /// Deepest aggregate nesting
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_bulk_len: MAX_BULK_LEN,
            max_aggregate_len: 16 * 1024 * 1024,
            max_depth: 64,
        }
    }
}

/// Outcome of a decode attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// One full reply, and how many bytes from offset 0 it occupied
    Complete { reply: Reply, consumed: usize },

    /// More bytes are needed
    Incomplete,
}

// =============================================================================
// Stateless Decoding
// =============================================================================

/// Decode exactly one reply from the start of `bytes` with default limits
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    decode_with_limits(bytes, &Limits::default())
}

/// Decode exactly one reply from the start of `bytes`
pub fn decode_with_limits(bytes: &[u8], limits: &Limits) -> Result<Decoded> {
    let mut state = ParseState::default();
    match state.advance(bytes, limits)? {
        Some(reply) => Ok(Decoded::Complete {
            reply,
            consumed: state.cursor,
        }),
        None => Ok(Decoded::Incomplete),
    }
}

// =============================================================================
// Resumable Decoder
// =============================================================================

/// Buffering decoder that resumes where the previous attempt stopped
///
/// Bytes are appended with [`feed`](Decoder::feed) and replies taken out with
/// [`next_reply`](Decoder::next_reply). Bytes following a decoded reply stay
/// buffered for the next call.
#[derive(Debug, Default)]
pub struct Decoder {
    limits: Limits,
    buffer: BytesMut,
    state: ParseState,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            buffer: BytesMut::new(),
            state: ParseState::default(),
        }
    }

    /// Append bytes read from the stream
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete reply, or `None` if more bytes are needed
    ///
    /// A protocol error discards everything buffered: the stream position is
    /// unknown afterwards and the decoder must not be trusted with it.
    pub fn next_reply(&mut self) -> Result<Option<Reply>> {
        match self.state.advance(&self.buffer, &self.limits) {
            Ok(Some(reply)) => {
                self.buffer.advance(self.state.cursor);
                self.state = ParseState::default();
                Ok(Some(reply))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Bytes held in the buffer, including any partially parsed reply
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop all buffered bytes and partial state
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = ParseState::default();
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

// =============================================================================
// Parser State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregateKind {
    Array,
    Map,
    Set,
}

/// An aggregate whose header has been read but whose elements are not all in
#[derive(Debug)]
struct Pending {
    kind: AggregateKind,
    expected: usize,
    items: Vec<Reply>,
}

impl Pending {
    fn new(kind: AggregateKind, expected: usize) -> Self {
        Self {
            kind,
            expected,
            items: Vec::with_capacity(expected.min(PREALLOC_LIMIT)),
        }
    }

    fn finish(self) -> Reply {
        build_aggregate(self.kind, self.items)
    }
}

/// Cursor into the reply being decoded plus the aggregates still open
#[derive(Debug, Default)]
struct ParseState {
    cursor: usize,

    /// Line bytes after `cursor` already searched for CRLF
    scanned: usize,

    stack: Vec<Pending>,
}

impl ParseState {
    /// Parse from `cursor` onwards; `buf` must start at the first byte of the reply
    fn advance(&mut self, buf: &[u8], limits: &Limits) -> Result<Option<Reply>> {
        'next_token: loop {
            let rest = buf.get(self.cursor..).ok_or_else(|| {
                RespError::Protocol("decode buffer shrank below the parsed position".to_string())
            })?;

            let Some((token, used)) = parse_token(rest, limits, &mut self.scanned)? else {
                return Ok(None);
            };
            self.cursor += used;
            self.scanned = 0;

            let mut reply = match token {
                Token::Value(reply) => reply,
                Token::Aggregate(kind, 0) => build_aggregate(kind, Vec::new()),
                Token::Aggregate(kind, count) => {
                    if self.stack.len() >= limits.max_depth {
                        return Err(RespError::Protocol(format!(
                            "Aggregate nesting exceeds {} levels",
                            limits.max_depth
                        )));
                    }
                    let expected = match kind {
                        AggregateKind::Map => count.checked_mul(2).ok_or_else(|| {
                            RespError::Protocol(format!("Map pair count {} overflows", count))
                        })?,
                        _ => count,
                    };
                    self.stack.push(Pending::new(kind, expected));
                    continue 'next_token;
                }
            };

            // Fold the finished value into its parents
            loop {
                let Some(mut top) = self.stack.pop() else {
                    return Ok(Some(reply));
                };
                top.items.push(reply);
                if top.items.len() < top.expected {
                    self.stack.push(top);
                    continue 'next_token;
                }
                reply = top.finish();
            }
        }
    }
}

fn build_aggregate(kind: AggregateKind, items: Vec<Reply>) -> Reply {
    match kind {
        AggregateKind::Array => Reply::Array(Some(items)),
        AggregateKind::Set => Reply::Set(items),
        AggregateKind::Map => {
            let mut pairs = Vec::with_capacity(items.len() / 2);
            let mut iter = items.into_iter();
            while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
                pairs.push((key, value));
            }
            Reply::Map(pairs)
        }
    }
}

// =============================================================================
// Token Parsing
// =============================================================================

/// A scalar reply, or the header of an aggregate
enum Token {
    Value(Reply),
    Aggregate(AggregateKind, usize),
}

fn is_type_byte(byte: u8) -> bool {
    matches!(
        byte,
        b'+' | b'-' | b':' | b'$' | b'*' | b'_' | b'#' | b',' | b'(' | b'%' | b'~'
    )
}

/// Parse one token from the start of `buf`
///
/// Returns the token and the bytes it used, or `None` if `buf` ends first.
/// `scanned` counts line bytes searched by earlier attempts on this token.
fn parse_token(
    buf: &[u8],
    limits: &Limits,
    scanned: &mut usize,
) -> Result<Option<(Token, usize)>> {
    let Some(&prefix) = buf.first() else {
        return Ok(None);
    };

    if !is_type_byte(prefix) {
        return Err(RespError::Protocol(format!(
            "Unknown reply type byte: 0x{:02x}",
            prefix
        )));
    }

    let line_area = &buf[1..];
    // Back up one byte in case the last search ended between '\r' and '\n'
    let from = scanned.saturating_sub(1).min(line_area.len());
    let Some(line_len) = find_crlf(&line_area[from..]).map(|pos| from + pos) else {
        *scanned = line_area.len();
        if line_area.len() > limits.max_bulk_len {
            return Err(RespError::Protocol(format!(
                "Line exceeds {} bytes without a terminator",
                limits.max_bulk_len
            )));
        }
        return Ok(None);
    };

    let line = &buf[1..1 + line_len];
    let after_line = 1 + line_len + CRLF.len();

    let token = match prefix {
        b'+' => Token::Value(Reply::SimpleString(parse_text(line, "simple string")?)),
        b'-' => Token::Value(Reply::Error(parse_text(line, "error")?)),
        b':' => Token::Value(Reply::Integer(parse_integer(line)?)),
        b'$' => {
            let Some(len) = parse_length(line, "bulk string")? else {
                return Ok(Some((Token::Value(Reply::BulkString(None)), after_line)));
            };
            if len > limits.max_bulk_len {
                return Err(RespError::Protocol(format!(
                    "Bulk string too large: {} bytes (max {})",
                    len, limits.max_bulk_len
                )));
            }

            let end = after_line + len;
            let total = end + CRLF.len();
            if buf.len() < total {
                return Ok(None);
            }
            if &buf[end..total] != CRLF {
                return Err(RespError::Protocol(
                    "Bulk string payload not terminated by CRLF".to_string(),
                ));
            }

            let payload = Bytes::copy_from_slice(&buf[after_line..end]);
            return Ok(Some((Token::Value(Reply::BulkString(Some(payload))), total)));
        }
        b'*' => match parse_length(line, "array")? {
            None => Token::Value(Reply::Array(None)),
            Some(count) => Token::Aggregate(AggregateKind::Array, check_count(count, limits)?),
        },
        b'%' => Token::Aggregate(AggregateKind::Map, parse_count(line, "map", limits)?),
        b'~' => Token::Aggregate(AggregateKind::Set, parse_count(line, "set", limits)?),
        b'_' => {
            if !line.is_empty() {
                return Err(RespError::Protocol("Null reply carries a payload".to_string()));
            }
            Token::Value(Reply::Null)
        }
        b'#' => match line {
            b"t" => Token::Value(Reply::Boolean(true)),
            b"f" => Token::Value(Reply::Boolean(false)),
            _ => {
                return Err(RespError::Protocol(format!(
                    "Invalid boolean: {:?}",
                    String::from_utf8_lossy(line)
                )))
            }
        },
        b',' => Token::Value(Reply::Double(parse_double(line)?)),
        b'(' => Token::Value(Reply::BigNumber(parse_big_number(line)?)),
        _ => unreachable!("type byte validated above"),
    };

    Ok(Some((token, after_line)))
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

fn check_count(count: usize, limits: &Limits) -> Result<usize> {
    if count > limits.max_aggregate_len {
        return Err(RespError::Protocol(format!(
            "Aggregate too large: {} elements (max {})",
            count, limits.max_aggregate_len
        )));
    }
    Ok(count)
}

/// Count field of a RESP3 aggregate, which has no null form
fn parse_count(line: &[u8], what: &str, limits: &Limits) -> Result<usize> {
    match parse_length(line, what)? {
        Some(count) => check_count(count, limits),
        None => Err(RespError::Protocol(format!("Null {} is not allowed", what))),
    }
}

fn parse_text(line: &[u8], what: &str) -> Result<String> {
    String::from_utf8(line.to_vec())
        .map_err(|_| RespError::Protocol(format!("Invalid UTF-8 in {}", what)))
}

fn ascii(line: &[u8]) -> Option<&str> {
    std::str::from_utf8(line).ok().filter(|s| s.is_ascii())
}

fn parse_integer(line: &[u8]) -> Result<i64> {
    ascii(line)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            RespError::Protocol(format!(
                "Invalid integer: {:?}",
                String::from_utf8_lossy(line)
            ))
        })
}

/// Parse a length or count field: plain decimal digits, or `-1` for null
fn parse_length(line: &[u8], what: &str) -> Result<Option<usize>> {
    if line == b"-1" {
        return Ok(None);
    }

    let invalid = || {
        RespError::Protocol(format!(
            "Invalid {} length: {:?}",
            what,
            String::from_utf8_lossy(line)
        ))
    };

    if line.is_empty() || !line.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    ascii(line)
        .and_then(|s| s.parse::<usize>().ok())
        .map(Some)
        .ok_or_else(invalid)
}

fn parse_double(line: &[u8]) -> Result<f64> {
    ascii(line)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| {
            RespError::Protocol(format!(
                "Invalid double: {:?}",
                String::from_utf8_lossy(line)
            ))
        })
}

fn parse_big_number(line: &[u8]) -> Result<String> {
    let digits = match line.first() {
        Some(b'-') | Some(b'+') => &line[1..],
        _ => line,
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(RespError::Protocol(format!(
            "Invalid big number: {:?}",
            String::from_utf8_lossy(line)
        )));
    }
    parse_text(line, "big number")
}
