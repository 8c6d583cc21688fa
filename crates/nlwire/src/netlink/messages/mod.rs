//! Strongly-typed netlink message structures.
//!
//! Each message kind implements [`FromNetlink`] and [`ToNetlink`]. For a
//! receive buffer of unknown content, [`NetlinkMessage::parse`] reads the outer
//! header and dispatches on `(protocol, nlmsg_type)`, and [`NetlinkMessages`]
//! walks every message in a buffer.
//!
//! # Example
//!
//! ```
//! use nlwire::netlink::messages::{NetlinkMessage, NetlinkMessages};
//! use nlwire::netlink::{ByteOrder, Protocol};
//!
//! // NLMSG_DONE with a zero payload.
//! let mut buf = Vec::new();
//! buf.extend_from_slice(&20u32.to_le_bytes());
//! buf.extend_from_slice(&3u16.to_le_bytes());
//! buf.extend_from_slice(&2u16.to_le_bytes());
//! buf.extend_from_slice(&[0; 12]);
//!
//! let msgs: Vec<_> = NetlinkMessages::new(&buf, Protocol::Route, ByteOrder::Little).collect();
//! assert!(matches!(msgs.as_slice(), [Ok(NetlinkMessage::Done(_))]));
//! ```

mod address;
mod conntrack;
mod error;
mod link;
mod nduseropt;
mod neighbor;
mod route;

pub use address::*;
pub use conntrack::*;
pub use error::*;
pub use link::*;
pub use nduseropt::*;
pub use neighbor::*;
pub use route::*;

use std::fmt;

use tracing::debug;

use super::constants::{
    IPCTNL_MSG_CT_DELETE, IPCTNL_MSG_CT_NEW, aligned_length, ctnetlink_msg_type, msg_type_name,
};
use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
use super::parse::{ByteOrder, FromNetlink, WireStruct};
use super::protocol::Protocol;

/// The attribute block that follows a fixed part of `fixed` bytes.
///
/// Sized from the header's declared length, aligned, and clipped to `input`.
pub(crate) fn attr_block<'a>(header: &NlMsgHdr, fixed: usize, input: &'a [u8]) -> &'a [u8] {
    let declared = header.nlmsg_len as i64 - NLMSG_HDRLEN as i64 - fixed as i64;
    &input[..aligned_length(declared).min(input.len())]
}

/// Like [`attr_block`], but a declared block longer than `input` is an error.
///
/// Only the alignment padding of the final attribute may be missing.
pub(crate) fn strict_attr_block<'a>(
    header: &NlMsgHdr,
    fixed: usize,
    input: &'a [u8],
) -> Result<&'a [u8]> {
    let declared = header.nlmsg_len as i64 - NLMSG_HDRLEN as i64 - fixed as i64;
    let exact = declared.max(0) as usize;
    if exact > input.len() {
        return Err(Error::truncated(exact, input.len()));
    }
    Ok(&input[..aligned_length(declared).min(input.len())])
}

/// Any message that can arrive on a netlink socket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum NetlinkMessage {
    /// End of a multipart dump (NLMSG_DONE).
    Done(NlMsgHdr),
    /// Error or acknowledgment (NLMSG_ERROR).
    Error(ErrorMessage),
    /// Other reserved control type (NLMSG_NOOP, NLMSG_OVERRUN, ...).
    Control(NlMsgHdr),
    Link(LinkMessage),
    Address(AddressMessage),
    Route(RouteMessage),
    Neighbor(NeighborMessage),
    NdUserOpt(NdUserOptMessage),
    Conntrack(ConntrackMessage),
    /// A type this crate does not decode.
    Unknown(NlMsgHdr),
}

impl NetlinkMessage {
    /// Parse one message from the front of `input`.
    ///
    /// If the outer header cannot be read, `input` is left untouched. If the
    /// header declares more payload than `input` holds, all of `input` is
    /// consumed and an error is returned. Otherwise `input` always advances to
    /// the aligned end of the message (clipped to the buffer), even when the
    /// body fails to decode.
    pub fn parse(input: &mut &[u8], protocol: Protocol, order: ByteOrder) -> Result<Self> {
        let header = NlMsgHdr::parse(input, order)?;
        let payload = header.payload_len();
        if payload > input.len() {
            let actual = input.len();
            *input = &input[actual..];
            return Err(Error::truncated(payload, actual));
        }

        let end = aligned_length(payload as i64).min(input.len());
        let mut body = &input[..end];
        *input = &input[end..];

        let result = Self::dispatch(header, &mut body, protocol, order);
        if let Err(err) = &result {
            debug!(
                msg_type = msg_type_name(header.nlmsg_type, protocol),
                seq = header.nlmsg_seq,
                %err,
                "failed to decode message body"
            );
        }
        result
    }

    fn dispatch(
        header: NlMsgHdr,
        body: &mut &[u8],
        protocol: Protocol,
        order: ByteOrder,
    ) -> Result<Self> {
        if header.is_control() {
            return Ok(match header.nlmsg_type {
                NlMsgType::ERROR => Self::Error(ErrorMessage::parse(header, body, order)?),
                NlMsgType::DONE => Self::Done(header),
                _ => Self::Control(header),
            });
        }

        const CT_NEW: u16 = ctnetlink_msg_type(IPCTNL_MSG_CT_NEW);
        const CT_DELETE: u16 = ctnetlink_msg_type(IPCTNL_MSG_CT_DELETE);

        let msg = match (protocol, header.nlmsg_type) {
            (Protocol::Route, NlMsgType::RTM_NEWLINK | NlMsgType::RTM_DELLINK) => {
                Self::Link(LinkMessage::parse(header, body, order)?)
            }
            (Protocol::Route, NlMsgType::RTM_NEWADDR | NlMsgType::RTM_DELADDR) => {
                Self::Address(AddressMessage::parse(header, body, order)?)
            }
            (Protocol::Route, NlMsgType::RTM_NEWROUTE | NlMsgType::RTM_DELROUTE) => {
                Self::Route(RouteMessage::parse(header, body, order)?)
            }
            (
                Protocol::Route,
                NlMsgType::RTM_NEWNEIGH | NlMsgType::RTM_DELNEIGH | NlMsgType::RTM_GETNEIGH,
            ) => Self::Neighbor(NeighborMessage::parse(header, body, order)?),
            (Protocol::Route, NlMsgType::RTM_NEWNDUSEROPT) => {
                Self::NdUserOpt(NdUserOptMessage::parse(header, body, order)?)
            }
            (Protocol::Netfilter, CT_NEW | CT_DELETE) => {
                Self::Conntrack(ConntrackMessage::parse(header, body, order)?)
            }
            _ => {
                debug!(
                    msg_type = header.nlmsg_type,
                    %protocol,
                    "no decoder for message type"
                );
                Self::Unknown(header)
            }
        };
        Ok(msg)
    }

    /// The outer header of any variant.
    pub fn header(&self) -> &NlMsgHdr {
        match self {
            Self::Done(h) | Self::Control(h) | Self::Unknown(h) => h,
            Self::Error(m) => &m.header,
            Self::Link(m) => &m.header,
            Self::Address(m) => &m.header,
            Self::Route(m) => &m.header,
            Self::Neighbor(m) => &m.header,
            Self::NdUserOpt(m) => &m.header,
            Self::Conntrack(m) => &m.header,
        }
    }

    /// Check if this message ends a dump.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl fmt::Display for NetlinkMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(h) => write!(f, "NLMSG_DONE seq={}", h.nlmsg_seq),
            Self::Control(h) | Self::Unknown(h) => write!(f, "{h}"),
            Self::Error(m) => write!(f, "{m}"),
            Self::Link(m) => write!(f, "{m}"),
            Self::Address(m) => write!(f, "{m}"),
            Self::Route(m) => write!(f, "{m}"),
            Self::Neighbor(m) => write!(f, "{m}"),
            Self::NdUserOpt(m) => write!(f, "{m}"),
            Self::Conntrack(m) => write!(f, "{m}"),
        }
    }
}

/// Iterator over the messages in a receive buffer.
///
/// A message whose body fails to decode yields its error and iteration
/// continues with the next message. A framing error (unreadable or truncated
/// outer header) is yielded once and ends the iteration.
#[derive(Debug, Clone)]
pub struct NetlinkMessages<'a> {
    input: &'a [u8],
    protocol: Protocol,
    order: ByteOrder,
    fused: bool,
}

impl<'a> NetlinkMessages<'a> {
    /// Iterate over `buf`.
    pub fn new(buf: &'a [u8], protocol: Protocol, order: ByteOrder) -> Self {
        Self {
            input: buf,
            protocol,
            order,
            fused: false,
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }
}

impl Iterator for NetlinkMessages<'_> {
    type Item = Result<NetlinkMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || self.input.is_empty() {
            return None;
        }
        let before = self.input.len();
        let result = NetlinkMessage::parse(&mut self.input, self.protocol, self.order);
        if result.is_err() && (self.input.is_empty() || self.input.len() == before) {
            self.fused = true;
        }
        Some(result)
    }
}
