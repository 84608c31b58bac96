//! Protocol codec
//!
//! Encoding functions for outgoing commands.
//!
//! ## Wire Format
//! ```text
//! *3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n
//! └─┬─┘ └─┬─┘ └─┬─┘ └─┬─┘ └┬┘ └─┬─┘ └┬┘
//!  count  len  name   len arg  len arg
//! ```

use std::io::Write;

use crate::error::{RespError, Result};
use super::Frame;

/// Line terminator used throughout the protocol
pub const CRLF: &[u8] = b"\r\n";

/// Largest bulk string a Redis server accepts (512 MB)
pub const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command name and its arguments as an array of bulk strings
///
/// Fails only for an empty command name or an argument larger than
/// [`MAX_BULK_LEN`].
pub fn encode<N, I, A>(command_name: N, args: I) -> Result<Vec<u8>>
where
    N: AsRef<[u8]>,
    I: IntoIterator<Item = A>,
    A: AsRef<[u8]>,
{
    encode_with_limit(command_name, args, MAX_BULK_LEN)
}

/// Like [`encode`], with a caller-chosen ceiling on argument size
pub fn encode_with_limit<N, I, A>(command_name: N, args: I, max_arg_len: usize) -> Result<Vec<u8>>
where
    N: AsRef<[u8]>,
    I: IntoIterator<Item = A>,
    A: AsRef<[u8]>,
{
    let name = command_name.as_ref();
    if name.is_empty() {
        return Err(RespError::Encode("command name is empty".to_string()));
    }

    let owned: Vec<A> = args.into_iter().collect();
    let args: Vec<&[u8]> = owned.iter().map(|a| a.as_ref()).collect();
    if let Some(arg) = args.iter().find(|a| a.len() > max_arg_len) {
        return Err(RespError::Encode(format!(
            "argument of {} bytes exceeds the bulk string limit of {}",
            arg.len(),
            max_arg_len
        )));
    }

    let payload_len: usize = args.iter().map(|a| a.len() + 16).sum();

    let mut message = Vec::with_capacity(16 + name.len() + payload_len);
    write_header(&mut message, b'*', args.len() + 1);
    write_bulk(&mut message, name);
    for arg in &args {
        write_bulk(&mut message, arg);
    }

    Ok(message)
}

/// Encode a [`Frame`]
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
    encode(frame.name(), frame.args())
}

/// Encode a [`Frame`], rejecting arguments larger than `max_arg_len`
pub fn encode_frame_with_limit(frame: &Frame, max_arg_len: usize) -> Result<Vec<u8>> {
    encode_with_limit(frame.name(), frame.args(), max_arg_len)
}

/// Write a frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    let bytes = encode_frame(frame)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn write_header(message: &mut Vec<u8>, prefix: u8, len: usize) {
    message.push(prefix);
    message.extend_from_slice(itoa::Buffer::new().format(len).as_bytes());
    message.extend_from_slice(CRLF);
}

fn write_bulk(message: &mut Vec<u8>, bytes: &[u8]) {
    write_header(message, b'$', bytes.len());
    message.extend_from_slice(bytes);
    message.extend_from_slice(CRLF);
}
