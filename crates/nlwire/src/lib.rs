//! Netlink message codec for Linux.
//!
//! This crate parses and serializes the netlink wire format used between the
//! kernel and userspace: the 16-byte message header, nfnetlink sub-headers,
//! nested `nlattr` TLVs, and typed rtnetlink (link, address, route, neighbor,
//! ND user option) and ctnetlink (conntrack) messages.
//!
//! It does not open sockets. Callers hand it buffers received from any
//! transport together with the byte order they were written in
//! ([`ByteOrder::Native`] for live kernel traffic).
//!
//! # Features
//!
//! - `serde` - Derive `serde::Serialize` on decoded messages and kernel structs
//!
//! # Example
//!
//! ```
//! use nlwire::{ByteOrder, NetlinkMessages, Protocol};
//!
//! # let buf: Vec<u8> = Vec::new();
//! for msg in NetlinkMessages::new(&buf, Protocol::Route, ByteOrder::Native) {
//!     match msg {
//!         Ok(msg) => println!("{msg}"),
//!         Err(e) => eprintln!("decode failed: {e}"),
//!     }
//! }
//! ```

pub mod netlink;

// Re-export common types at crate root for convenience
pub use netlink::{
    ByteOrder, Error, NetlinkMessage, NetlinkMessages, Protocol, RawAttr, Result,
};
