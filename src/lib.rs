//! # resp3string
//!
//! A small blocking Redis client with:
//! - A RESP2/RESP3 frame codec with a resumable decoder
//! - A single-owner TCP connection (one request in flight at a time)
//! - Typed command objects for PING, SET and GET
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Command Objects / Client                     │
//! │              (Ping, Set, Get -> typed results)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Frame            ▲ Reply
//! ┌─────────────────────▼──────────────────┴────────────────────┐
//! │                      Connection                              │
//! │           (write frame, read until one reply)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Encoder   │          │   Decoder   │
//!   │ (*N $len..) │          │ (resumable) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use resp3string::commands::{Command, Get, Set};
//! use resp3string::network::Connection;
//!
//! let mut conn = Connection::connect("127.0.0.1:6379")?;
//! Set::new("mykey", "myvalue").execute(&mut conn)?;
//! let value = Get::new("mykey").execute(&mut conn)?;
//! assert_eq!(value.as_deref(), Some(&b"myvalue"[..]));
//! # Ok::<(), resp3string::RespError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod commands;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConnectErrorKind, IoErrorKind, RespError, Result};
pub use config::Config;
pub use protocol::{Frame, Reply};
pub use network::Connection;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of resp3string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
