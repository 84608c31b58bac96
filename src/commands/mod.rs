//! Command Objects
//!
//! Typed commands that build a [`Frame`] and interpret the matching
//! [`Reply`]. A command never holds a connection; it is executed *by* one.
//!
//! ```text
//! Command::frame() ──► Connection::send_command() ──► Command::interpret()
//! ```
//!
//! Every command turns a server error reply into [`RespError::Server`] and any
//! reply shape it does not accept into [`RespError::UnexpectedReply`].

mod ping;
mod set;
mod get;

pub use ping::Ping;
pub use set::Set;
pub use get::Get;

use crate::error::{RespError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::{Frame, Reply};

/// A command with a typed result
pub trait Command {
    /// High-level result produced from the reply
    type Output;

    /// Build the frame sent to the server
    fn frame(&self) -> Frame;

    /// Turn the server's reply into the typed result
    fn interpret(&self, reply: Reply) -> Result<Self::Output>;

    /// Send the frame on `connection` and interpret the reply
    fn execute<S: Transport>(&self, connection: &mut Connection<S>) -> Result<Self::Output> {
        let reply = connection.send_command(&self.frame())?;
        self.interpret(reply)
    }
}

/// Execute `command` on `connection`
pub fn execute<C, S>(command: &C, connection: &mut Connection<S>) -> Result<C::Output>
where
    C: Command,
    S: Transport,
{
    command.execute(connection)
}

/// Error for a reply the command does not accept
pub(crate) fn reject(reply: Reply) -> RespError {
    match reply {
        Reply::Error(message) => RespError::Server(message),
        other => RespError::UnexpectedReply(other),
    }
}
