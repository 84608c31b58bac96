//! Protocol Module
//!
//! Implements the REdis Serialization Protocol (RESP2 and RESP3) as seen
//! from the client side.
//!
//! ## Request Format
//! Every command goes out as an array of bulk strings:
//! ```text
//! *<N>\r\n
//! $<len>\r\n<arg 0: command name>\r\n
//! ...
//! $<len>\r\n<arg N-1>\r\n
//! ```
//!
//! ## Reply Format
//! One type byte, a payload line terminated by CRLF, and for bulk strings a
//! length-prefixed body:
//! ```text
//! ┌──────┬───────────────┬──────────────────────────────────┐
//! │ Byte │ Type          │ Payload                          │
//! ├──────┼───────────────┼──────────────────────────────────┤
//! │  +   │ SimpleString  │ line                             │
//! │  -   │ Error         │ line                             │
//! │  :   │ Integer       │ signed decimal                   │
//! │  $   │ BulkString    │ len, then len bytes + CRLF (-1 = null) │
//! │  *   │ Array         │ count, then count replies (-1 = null)  │
//! │  _   │ Null          │ empty line (RESP3)               │
//! │  #   │ Boolean       │ t / f (RESP3)                    │
//! │  ,   │ Double        │ decimal, inf, -inf, nan (RESP3)  │
//! │  (   │ BigNumber     │ signed digits (RESP3)            │
//! │  %   │ Map           │ pair count, then 2*count replies │
//! │  ~   │ Set           │ count, then count replies        │
//! └──────┴───────────────┴──────────────────────────────────┘
//! ```

mod frame;
mod reply;
mod codec;
mod decoder;

pub use frame::Frame;
pub use reply::Reply;
pub use codec::{
    encode, encode_frame, encode_frame_with_limit, encode_with_limit, write_frame, CRLF,
    MAX_BULK_LEN,
};
pub use decoder::{decode, decode_with_limits, Decoded, Decoder, Limits};
