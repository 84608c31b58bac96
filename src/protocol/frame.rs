//! Frame definitions
//!
//! A frame is one complete command as it is sent to the server.

use bytes::Bytes;

/// An outgoing command: the command name followed by its arguments.
///
/// A frame always holds at least the command name, so it can never encode to
/// an empty array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    parts: Vec<Bytes>,
}

impl Frame {
    /// Start a frame for the given command name
    pub fn new(name: impl Into<Bytes>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<Bytes>) -> Self {
        self.parts.push(arg.into());
        self
    }

    /// Append an argument in place
    pub fn push_arg(&mut self, arg: impl Into<Bytes>) {
        self.parts.push(arg.into());
    }

    /// The command name
    pub fn name(&self) -> &[u8] {
        &self.parts[0]
    }

    /// Arguments after the command name
    pub fn args(&self) -> &[Bytes] {
        &self.parts[1..]
    }

    /// Command name and arguments, in wire order
    pub fn parts(&self) -> &[Bytes] {
        &self.parts
    }

    /// Number of elements including the command name
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false: a frame contains at least the command name
    pub fn is_empty(&self) -> bool {
        false
    }
}
