//! Abstraction of the SET command.

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{Frame, Reply};
use super::{reject, Command};

/// SET key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set {
    key: Bytes,
    value: Bytes,
}

impl Set {
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl Command for Set {
    type Output = ();

    fn frame(&self) -> Frame {
        Frame::new("SET").arg(self.key.clone()).arg(self.value.clone())
    }

    fn interpret(&self, reply: Reply) -> Result<()> {
        match reply {
            Reply::SimpleString(ref s) if s == "OK" => Ok(()),
            other => Err(reject(other)),
        }
    }
}
