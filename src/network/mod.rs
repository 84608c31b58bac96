//! Network Module
//!
//! Client-side connection handling.
//!
//! ## Model
//! - Blocking I/O, no background threads
//! - One request in flight per connection (strict request/reply alternation)
//! - A connection is owned by exactly one caller; share it behind a mutex
//! - No implicit retry or reconnect

mod transport;
mod connection;

pub use transport::Transport;
pub use connection::{Connection, ConnectionState};
