//! Reply definitions
//!
//! Represents one decoded server reply.

use std::fmt;

use bytes::Bytes;

/// A decoded RESP2/RESP3 reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `+OK`
    SimpleString(String),

    /// `-ERR message`
    Error(String),

    /// `:1000`
    Integer(i64),

    /// `$6\r\nfoobar`, or `$-1` for null
    BulkString(Option<Bytes>),

    /// `*2\r\n...`, or `*-1` for null
    Array(Option<Vec<Reply>>),

    /// `_` (RESP3)
    Null,

    /// `#t` / `#f` (RESP3)
    Boolean(bool),

    /// `,3.14` (RESP3)
    Double(f64),

    /// `(3492890328409238509324850943850943825024385` (RESP3), kept as digits
    BigNumber(String),

    /// `%2\r\n...` (RESP3), pairs in wire order
    Map(Vec<(Reply, Reply)>),

    /// `~2\r\n...` (RESP3)
    Set(Vec<Reply>),
}

impl Reply {
    /// Null bulk string, null array and RESP3 null
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Reply::Null | Reply::BulkString(None) | Reply::Array(None)
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Short type label used in error messages and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Reply::SimpleString(_) => "simple-string",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::BulkString(Some(_)) => "bulk-string",
            Reply::BulkString(None) => "null-bulk-string",
            Reply::Array(Some(_)) => "array",
            Reply::Array(None) => "null-array",
            Reply::Null => "null",
            Reply::Boolean(_) => "boolean",
            Reply::Double(_) => "double",
            Reply::BigNumber(_) => "big-number",
            Reply::Map(_) => "map",
            Reply::Set(_) => "set",
        }
    }

    /// Raw bytes of a string-like reply (simple or non-null bulk)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::SimpleString(s) => Some(s.as_bytes()),
            Reply::BulkString(Some(b)) => Some(b),
            _ => None,
        }
    }
}

/// Renders a reply the way `redis-cli` prints it
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::SimpleString(s) => write!(f, "{}", s),
            Reply::Error(msg) => write!(f, "(error) {}", msg),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::BulkString(Some(b)) => write!(f, "\"{}\"", String::from_utf8_lossy(b)),
            Reply::BulkString(None) | Reply::Array(None) | Reply::Null => f.write_str("(nil)"),
            Reply::Boolean(b) => write!(f, "({})", if *b { "true" } else { "false" }),
            Reply::Double(d) => write!(f, "(double) {}", d),
            Reply::BigNumber(n) => write!(f, "(big number) {}", n),
            Reply::Array(Some(items)) | Reply::Set(items) => {
                if items.is_empty() {
                    return f.write_str("(empty array)");
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Reply::Map(pairs) => {
                if pairs.is_empty() {
                    return f.write_str("(empty hash)");
                }
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}# {} => {}", i + 1, key, value)?;
                }
                Ok(())
            }
        }
    }
}
