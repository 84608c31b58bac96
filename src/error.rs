//! Error types for resp3string
//!
//! Provides a unified error type for all operations. Nothing in the crate
//! retries on error; every failure is handed back to the caller unchanged.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::protocol::Reply;

/// Result type alias using RespError
pub type Result<T> = std::result::Result<T, RespError>;

/// Unified error type for resp3string operations
#[derive(Debug, Error)]
pub enum RespError {
    // -------------------------------------------------------------------------
    // Connection Establishment Errors
    // -------------------------------------------------------------------------
    #[error("Connect to {addr} failed: {kind}")]
    Connect { addr: String, kind: ConnectErrorKind },

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error ({kind}): {message}")]
    Io { kind: IoErrorKind, message: String },

    // -------------------------------------------------------------------------
    // Wire Format Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Encode error: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected reply of type {}", .0.type_name())]
    UnexpectedReply(Reply),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a connection attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectErrorKind {
    /// The address could not be resolved to any socket address
    ResolutionFailed,

    /// The server actively refused the connection
    Refused,

    /// The connect timeout elapsed
    Timeout,

    /// Any other failure (unreachable network, permission, ...)
    Other,
}

/// Transport failure during a request/reply exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// Read or write deadline exceeded
    Timeout,

    /// Peer reset or aborted the connection
    ConnectionReset,

    /// Stream ended, or the connection was already closed or broken
    Closed,

    /// Anything the classification above does not cover
    Other,
}

impl fmt::Display for ConnectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectErrorKind::ResolutionFailed => "address resolution failed",
            ConnectErrorKind::Refused => "connection refused",
            ConnectErrorKind::Timeout => "timed out",
            ConnectErrorKind::Other => "connect failed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for IoErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoErrorKind::Timeout => "timeout",
            IoErrorKind::ConnectionReset => "connection reset",
            IoErrorKind::Closed => "closed",
            IoErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

impl From<io::Error> for RespError {
    fn from(err: io::Error) -> Self {
        // Read timeouts surface as WouldBlock on unix and TimedOut on Windows
        let kind = match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => IoErrorKind::Timeout,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => IoErrorKind::ConnectionReset,
            io::ErrorKind::UnexpectedEof | io::ErrorKind::NotConnected => IoErrorKind::Closed,
            _ => IoErrorKind::Other,
        };
        RespError::Io {
            kind,
            message: err.to_string(),
        }
    }
}

impl RespError {
    /// Shorthand for an `Io` error of kind `Closed`
    pub(crate) fn closed(message: impl Into<String>) -> Self {
        RespError::Io {
            kind: IoErrorKind::Closed,
            message: message.into(),
        }
    }

    /// The transport failure kind, if this is an `Io` error
    pub fn io_kind(&self) -> Option<IoErrorKind> {
        match self {
            RespError::Io { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The connect failure kind, if this is a `Connect` error
    pub fn connect_kind(&self) -> Option<ConnectErrorKind> {
        match self {
            RespError::Connect { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            RespError::Io { kind: IoErrorKind::Timeout, .. }
                | RespError::Connect { kind: ConnectErrorKind::Timeout, .. }
        )
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, RespError::Protocol(_))
    }

    /// The server's message, if the server answered with an error reply
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RespError::Server(msg) => Some(msg),
            _ => None,
        }
    }
}
