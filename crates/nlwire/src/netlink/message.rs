//! Netlink message header and control structs.

use std::fmt;

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::constants::{msg_flags_to_string, msg_type_name};
use super::error::{Error, Result};
use super::parse::{ByteOrder, WireStruct, ensure_len, parse_i32, parse_u16, parse_u32};
use super::protocol::Protocol;

/// Netlink message header alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Create a new message header.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            nlmsg_seq: 0,
            nlmsg_pid: 0,
        }
    }

    /// Set the sequence number.
    pub fn with_seq(mut self, seq: u32) -> Self {
        self.nlmsg_seq = seq;
        self
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nlmsg_len as usize).saturating_sub(NLMSG_HDRLEN)
    }

    /// Length of the whole message rounded up to the next message boundary.
    pub fn aligned_len(&self) -> usize {
        nlmsg_align(self.nlmsg_len as usize)
    }

    /// Check if this is an error message.
    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Check if this is a done message.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Check if this is a reserved control message type.
    pub fn is_control(&self) -> bool {
        self.nlmsg_type <= NlMsgType::MAX_RESERVED
    }

    /// Check if this message has the multi flag.
    pub fn is_multi(&self) -> bool {
        self.nlmsg_flags & NLM_F_MULTI != 0
    }

    /// Human-readable form with the message type resolved for `protocol`.
    pub fn describe(&self, protocol: Protocol) -> String {
        format!(
            "nlmsghdr{{len={}, type={}({}), flags={:#x}({}), seq={}, pid={}}}",
            self.nlmsg_len,
            self.nlmsg_type,
            msg_type_name(self.nlmsg_type, protocol),
            self.nlmsg_flags,
            msg_flags_to_string(self.nlmsg_flags),
            self.nlmsg_seq,
            self.nlmsg_pid,
        )
    }
}

impl WireStruct for NlMsgHdr {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let hdr = Self {
            nlmsg_len: parse_u32(&mut cursor, order)?,
            nlmsg_type: parse_u16(&mut cursor, order)?,
            nlmsg_flags: parse_u16(&mut cursor, order)?,
            nlmsg_seq: parse_u32(&mut cursor, order)?,
            nlmsg_pid: parse_u32(&mut cursor, order)?,
        };
        if (hdr.nlmsg_len as usize) < NLMSG_HDRLEN {
            return Err(Error::InvalidMessage(format!(
                "nlmsg_len {} shorter than header",
                hdr.nlmsg_len
            )));
        }
        *input = cursor;
        Ok(hdr)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_u32(buf, self.nlmsg_len);
        order.put_u16(buf, self.nlmsg_type);
        order.put_u16(buf, self.nlmsg_flags);
        order.put_u32(buf, self.nlmsg_seq);
        order.put_u32(buf, self.nlmsg_pid);
    }
}

impl fmt::Display for NlMsgHdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nlmsghdr{{len={}, type={}, flags={:#x}, seq={}, pid={}}}",
            self.nlmsg_len, self.nlmsg_type, self.nlmsg_flags, self.nlmsg_seq, self.nlmsg_pid
        )
    }
}

/// Error message payload (mirrors struct nlmsgerr).
///
/// `error` is zero for an ACK and a negative errno otherwise. `msg` is the
/// header of the request that triggered it.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NlMsgErr {
    /// Negative errno or 0 for ack.
    pub error: i32,
    /// Original message header.
    pub msg: NlMsgHdr,
}

impl NlMsgErr {
    /// Check if this is an ACK (error == 0).
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }
}

impl WireStruct for NlMsgErr {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let error = parse_i32(&mut cursor, order)?;
        // The echoed header may be from a request we never saw, so its length
        // is not validated.
        let msg = NlMsgHdr {
            nlmsg_len: parse_u32(&mut cursor, order)?,
            nlmsg_type: parse_u16(&mut cursor, order)?,
            nlmsg_flags: parse_u16(&mut cursor, order)?,
            nlmsg_seq: parse_u32(&mut cursor, order)?,
            nlmsg_pid: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(Self { error, msg })
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_i32(buf, self.error);
        self.msg.pack(buf, order);
    }
}

/// Standard netlink message types.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// Error message or ACK.
    pub const ERROR: u16 = 2;
    /// End of multipart message.
    pub const DONE: u16 = 3;
    /// Data lost, request resend.
    pub const OVERRUN: u16 = 4;
    /// Highest type number reserved for control messages.
    pub const MAX_RESERVED: u16 = 15;

    // Link messages
    pub const RTM_NEWLINK: u16 = 16;
    pub const RTM_DELLINK: u16 = 17;
    pub const RTM_GETLINK: u16 = 18;
    pub const RTM_SETLINK: u16 = 19;

    // Address messages
    pub const RTM_NEWADDR: u16 = 20;
    pub const RTM_DELADDR: u16 = 21;
    pub const RTM_GETADDR: u16 = 22;

    // Route messages
    pub const RTM_NEWROUTE: u16 = 24;
    pub const RTM_DELROUTE: u16 = 25;
    pub const RTM_GETROUTE: u16 = 26;

    // Neighbor messages
    pub const RTM_NEWNEIGH: u16 = 28;
    pub const RTM_DELNEIGH: u16 = 29;
    pub const RTM_GETNEIGH: u16 = 30;

    // Rule messages
    pub const RTM_NEWRULE: u16 = 32;
    pub const RTM_DELRULE: u16 = 33;
    pub const RTM_GETRULE: u16 = 34;

    /// Neighbor discovery user option (RA options passed to userspace).
    pub const RTM_NEWNDUSEROPT: u16 = 68;
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_MULTI: u16 = 0x02;
pub const NLM_F_ACK: u16 = 0x04;
pub const NLM_F_ECHO: u16 = 0x08;
pub const NLM_F_DUMP_INTR: u16 = 0x10;
pub const NLM_F_DUMP_FILTERED: u16 = 0x20;

// Modifiers to GET request
pub const NLM_F_ROOT: u16 = 0x100;
pub const NLM_F_MATCH: u16 = 0x200;
pub const NLM_F_ATOMIC: u16 = 0x400;
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

// Modifiers to NEW request
pub const NLM_F_REPLACE: u16 = 0x100;
pub const NLM_F_EXCL: u16 = 0x200;
pub const NLM_F_CREATE: u16 = 0x400;
pub const NLM_F_APPEND: u16 = 0x800;
