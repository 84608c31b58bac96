//! Byte stream abstraction
//!
//! A connection runs over anything that reads and writes bytes. TCP is the
//! production transport; tests plug in an in-memory stream.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Duplex byte stream a [`Connection`](super::Connection) talks over
///
/// Both methods are required: a transport that cannot honor deadlines or
/// close itself should return `io::ErrorKind::Unsupported`.
pub trait Transport: Read + Write {
    /// Configure read and write deadlines (`None` blocks forever)
    fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> io::Result<()>;

    /// Close both directions of the stream
    fn shutdown(&self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_timeouts(&self, read: Option<Duration>, write: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(read)?;
        self.set_write_timeout(write)?;
        Ok(())
    }

    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}
