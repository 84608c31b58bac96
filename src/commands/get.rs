//! Abstraction of the GET command.
//!
//! A missing key is not an error: a null reply (`$-1` or RESP3 `_`) yields
//! `Ok(None)`.

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{Frame, Reply};
use super::{reject, Command};

/// GET key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get {
    key: Bytes,
}

impl Get {
    pub fn new(key: impl Into<Bytes>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl Command for Get {
    type Output = Option<Bytes>;

    fn frame(&self) -> Frame {
        Frame::new("GET").arg(self.key.clone())
    }

    fn interpret(&self, reply: Reply) -> Result<Option<Bytes>> {
        match reply {
            Reply::BulkString(Some(value)) => Ok(Some(value)),
            Reply::BulkString(None) | Reply::Null => Ok(None),
            other => Err(reject(other)),
        }
    }
}
