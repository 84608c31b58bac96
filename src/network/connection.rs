//! Client Connection
//!
//! Owns one byte stream to a server and runs request/reply exchanges on it.

use std::fmt;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ConnectErrorKind, RespError, Result};
use crate::protocol::{encode_frame_with_limit, Decoder, Frame, Reply};
use super::Transport;

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Ready for the next request
    Open,

    /// An I/O or protocol error left the stream at an unknown position
    Broken,

    /// Closed by the caller
    Closed,
}

/// A single-owner connection to a RESP server
///
/// Requests are strictly sequential: `send_command` takes `&mut self`, so
/// sharing one connection between threads needs a mutex held by the caller.
/// Nothing is retried and nothing reconnects; after an error the connection
/// reports `Broken` and must be replaced.
pub struct Connection<S: Transport = TcpStream> {
    /// Underlying byte stream
    stream: S,

    /// Incoming bytes and partially decoded reply
    decoder: Decoder,

    /// Scratch buffer for socket reads
    read_buf: Vec<u8>,

    /// Peer address for logging
    peer_addr: String,

    state: ConnectionState,
}

impl Connection<TcpStream> {
    /// Connect to `address` (host:port) with default settings
    pub fn connect(address: &str) -> Result<Self> {
        Self::connect_with(&Config::builder().address(address).build())
    }

    /// Connect using the address, timeouts and limits from `config`
    pub fn connect_with(config: &Config) -> Result<Self> {
        config.validate()?;

        let addrs: Vec<SocketAddr> = match config.address.to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                tracing::debug!("Failed to resolve {}: {}", config.address, e);
                Vec::new()
            }
        };
        if addrs.is_empty() {
            return Err(RespError::Connect {
                addr: config.address.clone(),
                kind: ConnectErrorKind::ResolutionFailed,
            });
        }

        let mut last_kind = ConnectErrorKind::Other;
        for addr in &addrs {
            let attempt = match config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };

            match attempt {
                Ok(stream) => {
                    // Disable Nagle's algorithm for low latency
                    let configured = stream.set_nodelay(true).and_then(|()| {
                        stream.set_timeouts(config.read_timeout(), config.write_timeout())
                    });
                    if let Err(e) = configured {
                        return Err(setup_failed(&config.address, e));
                    }

                    tracing::debug!("Connected to {} ({})", config.address, addr);
                    return Ok(Self::from_stream_with(stream, addr.to_string(), config));
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_kind = classify_connect_error(&e);
                }
            }
        }

        Err(RespError::Connect {
            addr: config.address.clone(),
            kind: last_kind,
        })
    }
}

impl<S: Transport> Connection<S> {
    /// Wrap an already established stream with default limits
    pub fn from_stream(stream: S, peer_addr: impl Into<String>) -> Self {
        Self::from_stream_with(stream, peer_addr, &Config::default())
    }

    /// Wrap an already established stream, taking limits and chunk size from `config`
    pub fn from_stream_with(stream: S, peer_addr: impl Into<String>, config: &Config) -> Self {
        Self {
            stream,
            decoder: Decoder::with_limits(config.limits()),
            read_buf: vec![0u8; config.read_chunk_size.max(1)],
            peer_addr: peer_addr.into(),
            state: ConnectionState::Open,
        }
    }

    /// Send one frame and block until its reply is decoded
    ///
    /// Server error replies come back as `Ok(Reply::Error(..))`; interpreting
    /// them is up to the caller. Bytes that arrive after the reply stay
    /// buffered for the next call.
    pub fn send_command(&mut self, frame: &Frame) -> Result<Reply> {
        self.ensure_open()?;

        let bytes = encode_frame_with_limit(frame, self.decoder.limits().max_bulk_len)?;
        tracing::trace!(
            "Sending {} ({} args) to {}",
            String::from_utf8_lossy(frame.name()),
            frame.args().len(),
            self.peer_addr
        );

        if let Err(e) = self.write_frame_bytes(&bytes) {
            return Err(self.fail(e.into()));
        }

        loop {
            match self.decoder.next_reply() {
                Ok(Some(reply)) => {
                    tracing::trace!("Received {} from {}", reply.type_name(), self.peer_addr);
                    return Ok(reply);
                }
                Ok(None) => {}
                Err(e) => return Err(self.fail(e)),
            }

            let n = match self.stream.read(&mut self.read_buf) {
                Ok(0) => {
                    return Err(self.fail(RespError::closed(
                        "stream ended before a full reply was read",
                    )))
                }
                Ok(n) => n,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.fail(e.into())),
            };
            self.decoder.feed(&self.read_buf[..n]);
        }
    }

    /// Configure read/write deadlines (`None` blocks forever)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        self.stream.set_timeouts(read, write)?;
        Ok(())
    }

    /// Shut the stream down; later requests fail with `IoErrorKind::Closed`
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        self.decoder.clear();

        tracing::debug!("Closing connection to {}", self.peer_addr);
        match self.stream.shutdown() {
            Ok(()) => Ok(()),
            // Peer already went away
            Err(ref e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Bytes received but not yet consumed by a reply
    pub fn buffered(&self) -> usize {
        self.decoder.buffered()
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            ConnectionState::Open => Ok(()),
            ConnectionState::Broken => Err(RespError::closed(format!(
                "connection to {} is broken by an earlier error",
                self.peer_addr
            ))),
            ConnectionState::Closed => Err(RespError::closed(format!(
                "connection to {} is closed",
                self.peer_addr
            ))),
        }
    }

    fn write_frame_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    /// Mark the connection unusable and hand the error back
    fn fail(&mut self, err: RespError) -> RespError {
        tracing::warn!("Connection to {} broken: {}", self.peer_addr, err);
        self.state = ConnectionState::Broken;
        self.decoder.clear();
        err
    }
}

impl<S: Transport> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("peer_addr", &self.peer_addr)
            .field("state", &self.state)
            .field("buffered", &self.decoder.buffered())
            .finish()
    }
}

impl<S: Transport> Drop for Connection<S> {
    fn drop(&mut self) {
        if self.state != ConnectionState::Closed {
            tracing::debug!("Dropping connection to {}", self.peer_addr);
            let _ = self.close();
        }
    }
}

/// A socket option failed on a freshly connected stream
fn setup_failed(address: &str, err: io::Error) -> RespError {
    tracing::debug!("Configuring connection to {} failed: {}", address, err);
    RespError::Connect {
        addr: address.to_string(),
        kind: ConnectErrorKind::Other,
    }
}

fn classify_connect_error(err: &io::Error) -> ConnectErrorKind {
    match err.kind() {
        ErrorKind::ConnectionRefused => ConnectErrorKind::Refused,
        ErrorKind::TimedOut | ErrorKind::WouldBlock => ConnectErrorKind::Timeout,
        _ => ConnectErrorKind::Other,
    }
}
