//! Abstraction of the PING command.
//!
//! Without an argument the server must answer `+PONG`. With an argument the
//! server echoes it back and the echo must match.

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{Frame, Reply};
use super::{reject, Command};

/// PING, optionally with a message to echo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ping {
    message: Option<Bytes>,
}

impl Ping {
    pub fn new() -> Self {
        Self::default()
    }

    /// PING with a message; the server replies with the same bytes
    pub fn with_message(message: impl Into<Bytes>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl Command for Ping {
    type Output = ();

    fn frame(&self) -> Frame {
        let frame = Frame::new("PING");
        match &self.message {
            Some(message) => frame.arg(message.clone()),
            None => frame,
        }
    }

    fn interpret(&self, reply: Reply) -> Result<()> {
        let matched = match &self.message {
            None => matches!(&reply, Reply::SimpleString(s) if s == "PONG"),
            Some(message) => reply.as_bytes() == Some(message.as_ref()),
        };

        if matched {
            Ok(())
        } else {
            Err(reject(reply))
        }
    }
}
