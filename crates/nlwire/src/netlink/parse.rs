//! Parser primitives and codec traits for netlink wire format.
//!
//! This module provides:
//! - [`ByteOrder`], the caller-declared order for host-order fields
//! - winnow-based primitive readers used by every fixed-layout struct
//! - [`WireStruct`] for fixed-layout kernel structs
//! - [`FromNetlink`] / [`ToNetlink`] for complete messages
//!
//! Decoding works on a `&mut &[u8]` cursor: a successful read advances the
//! slice, and saving/restoring a position is a plain copy of the slice.
//!
//! # Example
//!
//! ```
//! use nlwire::netlink::message::NlMsgHdr;
//! use nlwire::netlink::parse::{ByteOrder, WireStruct};
//!
//! let hdr = NlMsgHdr::new(16, 0x1);
//! let mut buf = Vec::new();
//! hdr.pack(&mut buf, ByteOrder::Little);
//!
//! let mut input = buf.as_slice();
//! let parsed = NlMsgHdr::parse(&mut input, ByteOrder::Little).unwrap();
//! assert_eq!(parsed.nlmsg_type, 16);
//! assert!(input.is_empty());
//! ```

use bytes::BufMut;
use winnow::binary::Endianness;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use super::attr::RawAttr;
use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Byte order of host-order fields (header fields, native integers).
///
/// Live kernel traffic is always [`ByteOrder::Native`]; the explicit orders
/// exist so captured dumps and tests decode the same on every host. Fields the
/// kernel defines as network order (ports, conntrack counters, `res_id`) are
/// big-endian regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Host byte order.
    #[default]
    Native,
    /// Little-endian.
    Little,
    /// Big-endian.
    Big,
}

impl ByteOrder {
    /// The winnow endianness matching this order.
    pub fn endianness(self) -> Endianness {
        match self {
            Self::Native => Endianness::Native,
            Self::Little => Endianness::Little,
            Self::Big => Endianness::Big,
        }
    }

    /// Decode a u16 from raw bytes.
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::Native => u16::from_ne_bytes(bytes),
            Self::Little => u16::from_le_bytes(bytes),
            Self::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Decode a u32 from raw bytes.
    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Native => u32::from_ne_bytes(bytes),
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Write a u16.
    pub fn put_u16<B: BufMut>(self, buf: &mut B, value: u16) {
        match self {
            Self::Native => buf.put_u16_ne(value),
            Self::Little => buf.put_u16_le(value),
            Self::Big => buf.put_u16(value),
        }
    }

    /// Write a u32.
    pub fn put_u32<B: BufMut>(self, buf: &mut B, value: u32) {
        match self {
            Self::Native => buf.put_u32_ne(value),
            Self::Little => buf.put_u32_le(value),
            Self::Big => buf.put_u32(value),
        }
    }

    /// Write an i32.
    pub fn put_i32<B: BufMut>(self, buf: &mut B, value: i32) {
        match self {
            Self::Native => buf.put_i32_ne(value),
            Self::Little => buf.put_i32_le(value),
            Self::Big => buf.put_i32(value),
        }
    }

    /// Encode a u16 to raw bytes.
    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Self::Native => value.to_ne_bytes(),
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    /// Encode a u32 to raw bytes.
    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::Native => value.to_ne_bytes(),
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A fixed-layout kernel struct (nlmsghdr, ifaddrmsg, rtmsg, ...).
///
/// All of these are naturally 4-byte aligned by field order, so `pack` writes
/// exactly `SIZE` bytes with no extra padding.
pub trait WireStruct: Sized {
    /// Size on the wire in bytes.
    const SIZE: usize;

    /// Parse from the front of `input`, advancing it by `SIZE`.
    ///
    /// Fails with [`Error::Truncated`] (leaving `input` untouched) when fewer
    /// than `SIZE` bytes remain.
    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self>;

    /// Write the fields in declared order.
    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder);
}

/// A complete netlink message kind that can be decoded after its header.
pub trait FromNetlink: Sized {
    /// Decode the message body following an already-parsed `header`.
    ///
    /// On success `input` is advanced past what the message owns; on failure it
    /// is left where it was.
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self>;
}

/// A complete netlink message kind that can be encoded.
///
/// Encoding builds the attribute tree first, sizes the buffer exactly from
/// header + fixed part + aligned attribute lengths (rounded up to the message
/// alignment), and then packs everything in order. `nlmsg_len` is always
/// written as the real total size.
pub trait ToNetlink {
    /// The outer header (its `nlmsg_len` is recomputed on encode).
    fn header(&self) -> NlMsgHdr;

    /// Size in bytes of the fixed part that follows the outer header.
    ///
    /// Need not be aligned: attributes start directly after it.
    fn fixed_len(&self) -> usize;

    /// Write the fixed part (sub-header structs, raw option bytes).
    fn write_fixed(&self, builder: &mut MessageBuilder);

    /// Top-level attributes in the order they are written.
    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>>;

    /// Total encoded size.
    fn netlink_len(&self, order: ByteOrder) -> Result<usize> {
        let attrs = self.attributes(order)?;
        Ok(nlmsg_align(
            NLMSG_HDRLEN + self.fixed_len() + attrs.iter().map(RawAttr::aligned_len).sum::<usize>(),
        ))
    }

    /// Serialize to a new, exactly sized byte vector.
    fn to_bytes(&self, order: ByteOrder) -> Result<Vec<u8>> {
        let attrs = self.attributes(order)?;
        let len = nlmsg_align(
            NLMSG_HDRLEN + self.fixed_len() + attrs.iter().map(RawAttr::aligned_len).sum::<usize>(),
        );
        if len > u32::MAX as usize {
            return Err(Error::InvalidMessage(format!("message too large: {len}")));
        }

        let mut builder = MessageBuilder::with_header(self.header(), order, len);
        self.write_fixed(&mut builder);
        for attr in &attrs {
            builder.append_attr(attr);
        }
        Ok(builder.finish())
    }

    /// Append the encoded message to `buf`.
    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) -> Result<()> {
        buf.put_slice(&self.to_bytes(order)?);
        Ok(())
    }
}

// ============================================================================
// Primitive Parsers
// ============================================================================

/// Fail with [`Error::Truncated`] unless at least `len` bytes remain.
pub fn ensure_len(input: &[u8], len: usize) -> Result<()> {
    if input.len() < len {
        return Err(Error::truncated(len, input.len()));
    }
    Ok(())
}

/// Parse a u8.
pub fn parse_u8(input: &mut &[u8]) -> PResult<u8> {
    winnow::binary::u8.parse_next(input)
}

/// Parse a u16 in the given order.
pub fn parse_u16(input: &mut &[u8], order: ByteOrder) -> PResult<u16> {
    winnow::binary::u16(order.endianness()).parse_next(input)
}

/// Parse a u32 in the given order.
pub fn parse_u32(input: &mut &[u8], order: ByteOrder) -> PResult<u32> {
    winnow::binary::u32(order.endianness()).parse_next(input)
}

/// Parse an i32 in the given order.
pub fn parse_i32(input: &mut &[u8], order: ByteOrder) -> PResult<i32> {
    winnow::binary::i32(order.endianness()).parse_next(input)
}

/// Parse a u16 in network order.
pub fn parse_be16(input: &mut &[u8]) -> PResult<u16> {
    winnow::binary::be_u16.parse_next(input)
}

/// Take `len` raw bytes.
pub fn take_bytes<'a>(input: &mut &'a [u8], len: usize) -> PResult<&'a [u8]> {
    take(len).parse_next(input)
}

/// Skip `len` padding bytes.
pub fn skip(input: &mut &[u8], len: usize) -> PResult<()> {
    take_bytes(input, len).map(|_| ())
}

/// Decode a string from a NUL-terminated (or unterminated) byte buffer.
pub fn parse_string_from_bytes(data: &[u8]) -> Option<String> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    std::str::from_utf8(&data[..end]).ok().map(str::to_string)
}
