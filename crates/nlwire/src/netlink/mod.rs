//! Netlink wire format: headers, attributes and typed messages.
//!
//! Everything here works on byte slices already in memory. Decoders take a
//! `&mut &[u8]` cursor and the byte order the buffer was written in; encoders
//! write into any [`bytes::BufMut`].
//!
//! # Quick Start
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use nlwire::netlink::messages::{ConntrackMessage, IpProtocol, NetlinkMessage};
//! use nlwire::netlink::{ByteOrder, Protocol};
//!
//! let bytes = ConntrackMessage::new_ipv4_timeout_update_request(
//!     IpProtocol::Tcp,
//!     Ipv4Addr::new(192, 168, 80, 12),
//!     62449,
//!     Ipv4Addr::new(140, 112, 8, 116),
//!     433,
//!     120,
//! )?;
//!
//! let mut input = bytes.as_slice();
//! let NetlinkMessage::Conntrack(msg) =
//!     NetlinkMessage::parse(&mut input, Protocol::Netfilter, ByteOrder::Native)?
//! else {
//!     unreachable!();
//! };
//! assert_eq!(msg.timeout_sec, Some(120));
//! # Ok::<(), nlwire::Error>(())
//! ```
//!
//! # Attribute lookup
//!
//! ```
//! use nlwire::netlink::attr::RawAttr;
//! use nlwire::netlink::scan::{AttrTable, find_next_attr_of_type};
//! use nlwire::netlink::ByteOrder;
//!
//! let mut block = Vec::new();
//! for (kind, value) in [(1u16, 10u32), (2, 20), (3, 30)] {
//!     RawAttr::from_u32(kind, value, ByteOrder::Little).pack(&mut block, ByteOrder::Little);
//! }
//!
//! let mut cursor = block.as_slice();
//! let b = find_next_attr_of_type(2, &mut cursor, ByteOrder::Little).unwrap();
//! assert_eq!(b.as_u32(), Some(20));
//! assert_eq!(cursor.len(), 8);
//!
//! let table = AttrTable::parse(&block, ByteOrder::Little);
//! assert_eq!(table.get(3).and_then(|a| a.as_u32()), Some(30));
//! ```

pub mod attr;
mod builder;
pub mod constants;
mod error;
#[cfg(test)]
mod fixtures;
pub mod message;
pub mod messages;
pub mod ndopt;
pub mod parse;
mod protocol;
pub mod scan;
pub mod types;

pub use attr::{NlAttr, RawAttr};
pub use builder::MessageBuilder;
pub use error::{Error, Result};
pub use message::{NLMSG_HDRLEN, NlMsgErr, NlMsgHdr, NlMsgType};
pub use messages::{NetlinkMessage, NetlinkMessages};
pub use parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
pub use protocol::Protocol;
pub use scan::{AttrTable, find_next_attr_of_type};
