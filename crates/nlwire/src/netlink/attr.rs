//! Netlink attribute (rtattr/nlattr) handling.
//!
//! An attribute is a 4-byte header (`nla_len`, `nla_type`) followed by
//! `nla_len - 4` value bytes and zero padding up to the next 4-byte boundary.
//! `nla_len` on the wire is the unaligned length; anything that skips over an
//! attribute must advance by [`RawAttr::aligned_len`].

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::constants::hexify;
use super::error::{Error, Result};
use super::parse::{ByteOrder, WireStruct, ensure_len, parse_u16, take_bytes};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4;

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Largest value that fits in one attribute.
const NLA_MAX_PAYLOAD: usize = u16::MAX as usize - NLA_HDRLEN;

/// Netlink attribute header (mirrors struct nlattr / struct rtattr).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nla_len as usize).saturating_sub(NLA_HDRLEN)
    }

    /// Length rounded up to the attribute alignment.
    pub fn aligned_len(&self) -> usize {
        nla_align(self.nla_len as usize)
    }
}

impl WireStruct for NlAttr {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let attr = Self {
            nla_len: parse_u16(&mut cursor, order)?,
            nla_type: parse_u16(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(attr)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_u16(buf, self.nla_len);
        order.put_u16(buf, self.nla_type);
    }
}

/// An owned netlink attribute: header plus a copy of its value bytes.
///
/// The byte order the attribute was read with (or built for) is kept so that
/// host-order accessors such as [`RawAttr::as_u32`] decode correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    nla_len: u16,
    nla_type: u16,
    value: Vec<u8>,
    order: ByteOrder,
}

impl RawAttr {
    /// Read the header at the front of `input` without consuming anything.
    ///
    /// Returns `None` when fewer than 4 bytes remain or the declared length is
    /// shorter than the header itself.
    pub fn peek(input: &[u8], order: ByteOrder) -> Option<NlAttr> {
        let mut cursor = input;
        let hdr = NlAttr::parse(&mut cursor, order).ok()?;
        if (hdr.nla_len as usize) < NLA_HDRLEN {
            return None;
        }
        Some(hdr)
    }

    /// Parse one attribute, advancing `input` to the next aligned boundary.
    ///
    /// Requires the full aligned length to be present. On failure `input` is
    /// left untouched.
    pub fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let Some(hdr) = Self::peek(input, order) else {
            ensure_len(input, NLA_HDRLEN)?;
            return Err(Error::InvalidAttribute(
                "attribute length shorter than header".into(),
            ));
        };
        ensure_len(input, hdr.aligned_len())?;

        let mut cursor = *input;
        let block = take_bytes(&mut cursor, hdr.aligned_len())?;
        let value = block[NLA_HDRLEN..hdr.nla_len as usize].to_vec();
        *input = cursor;

        Ok(Self {
            nla_len: hdr.nla_len,
            nla_type: hdr.nla_type,
            value,
            order,
        })
    }

    /// Write header, value and zeroed padding.
    pub fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        NlAttr {
            nla_len: self.nla_len,
            nla_type: self.nla_type,
        }
        .pack(buf, order);
        buf.put_slice(&self.value);
        buf.put_bytes(0, self.aligned_len() - self.nla_len as usize);
    }

    /// Serialize to a new byte vector.
    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.aligned_len());
        self.pack(&mut buf, order);
        buf
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build an attribute from raw value bytes.
    pub fn new(attr_type: u16, value: impl Into<Vec<u8>>) -> Result<Self> {
        Self::with_order(attr_type, value.into(), ByteOrder::Native)
    }

    fn with_order(attr_type: u16, value: Vec<u8>, order: ByteOrder) -> Result<Self> {
        if value.len() > NLA_MAX_PAYLOAD {
            return Err(Error::InvalidAttribute(format!(
                "attribute {attr_type} value too large: {} bytes",
                value.len()
            )));
        }
        Ok(Self {
            nla_len: (NLA_HDRLEN + value.len()) as u16,
            nla_type: attr_type,
            value,
            order,
        })
    }

    fn fixed(attr_type: u16, value: &[u8], order: ByteOrder) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + value.len()) as u16,
            nla_type: attr_type,
            value: value.to_vec(),
            order,
        }
    }

    /// A single-byte attribute.
    pub fn from_u8(attr_type: u16, value: u8) -> Self {
        Self::fixed(attr_type, &[value], ByteOrder::Native)
    }

    /// A u16 attribute in the given host order.
    pub fn from_u16(attr_type: u16, value: u16, order: ByteOrder) -> Self {
        Self::fixed(attr_type, &order.u16_bytes(value), order)
    }

    /// A u16 attribute in network order.
    pub fn from_be16(attr_type: u16, value: u16) -> Self {
        Self::fixed(attr_type, &value.to_be_bytes(), ByteOrder::Native)
    }

    /// A u32 attribute in the given host order.
    pub fn from_u32(attr_type: u16, value: u32, order: ByteOrder) -> Self {
        Self::fixed(attr_type, &order.u32_bytes(value), order)
    }

    /// A u32 attribute in network order.
    pub fn from_be32(attr_type: u16, value: u32) -> Self {
        Self::fixed(attr_type, &value.to_be_bytes(), ByteOrder::Native)
    }

    /// A u64 attribute in network order.
    pub fn from_be64(attr_type: u16, value: u64) -> Self {
        Self::fixed(attr_type, &value.to_be_bytes(), ByteOrder::Native)
    }

    /// A NUL-terminated string attribute.
    pub fn from_str(attr_type: u16, value: &str) -> Result<Self> {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        Self::new(attr_type, data)
    }

    /// An IPv4 (4 bytes) or IPv6 (16 bytes) address attribute.
    pub fn from_ip(attr_type: u16, addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::fixed(attr_type, &v4.octets(), ByteOrder::Native),
            IpAddr::V6(v6) => Self::fixed(attr_type, &v6.octets(), ByteOrder::Native),
        }
    }

    /// A 6-byte hardware address attribute.
    pub fn from_mac(attr_type: u16, mac: [u8; 6]) -> Self {
        Self::fixed(attr_type, &mac, ByteOrder::Native)
    }

    /// A fixed-layout struct packed as the value.
    pub fn from_struct<T: WireStruct>(attr_type: u16, value: &T, order: ByteOrder) -> Self {
        let mut data = Vec::with_capacity(T::SIZE);
        value.pack(&mut data, order);
        Self::fixed(attr_type, &data, order)
    }

    /// A nested attribute holding `children` back-to-back.
    ///
    /// Sets [`NLA_F_NESTED`] on the type; the value length is the sum of the
    /// children's aligned lengths.
    pub fn nested(attr_type: u16, children: &[RawAttr], order: ByteOrder) -> Result<Self> {
        let len: usize = children.iter().map(RawAttr::aligned_len).sum();
        let mut value = Vec::with_capacity(len);
        for child in children {
            child.pack(&mut value, order);
        }
        Self::with_order(attr_type | NLA_F_NESTED, value, order)
    }

    // ========================================================================
    // Header access
    // ========================================================================

    /// Declared length including header (unaligned).
    pub fn len(&self) -> usize {
        self.nla_len as usize
    }

    /// True when the attribute carries no value bytes.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Length rounded up to the attribute alignment.
    pub fn aligned_len(&self) -> usize {
        nla_align(self.nla_len as usize)
    }

    /// Full type field including flag bits.
    pub fn attr_type(&self) -> u16 {
        self.nla_type
    }

    /// Type without flag bits.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if the nested flag is set.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Byte order this attribute was read with or built for.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Raw value bytes.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    fn exact<const N: usize>(&self) -> Option<[u8; N]> {
        self.value.as_slice().try_into().ok()
    }

    /// Single byte, or `default` on width mismatch.
    pub fn as_u8_or(&self, default: u8) -> u8 {
        self.exact::<1>().map_or(default, |b| b[0])
    }

    /// Network-order u16, or `default` on width mismatch.
    pub fn as_be16_or(&self, default: u16) -> u16 {
        self.exact().map_or(default, u16::from_be_bytes)
    }

    /// Network-order u32, or `default` on width mismatch.
    pub fn as_be32_or(&self, default: u32) -> u32 {
        self.exact().map_or(default, u32::from_be_bytes)
    }

    /// Network-order u32, or `None` on width mismatch.
    pub fn as_be32(&self) -> Option<u32> {
        self.exact().map(u32::from_be_bytes)
    }

    /// Network-order u64, or `default` on width mismatch.
    pub fn as_be64_or(&self, default: u64) -> u64 {
        self.exact().map_or(default, u64::from_be_bytes)
    }

    /// Decode the value as a fixed-layout struct.
    ///
    /// Extra trailing bytes are ignored; a short value gives `None`.
    pub fn as_struct<T: WireStruct>(&self) -> Option<T> {
        let mut input = self.value.as_slice();
        T::parse(&mut input, self.order).ok()
    }

    /// Host-order u16, or `None` on width mismatch.
    pub fn as_u16(&self) -> Option<u16> {
        self.exact().map(|b| self.order.u16_from(b))
    }

    /// Host-order u32, or `None` on width mismatch.
    pub fn as_u32(&self) -> Option<u32> {
        self.exact().map(|b| self.order.u32_from(b))
    }

    /// Host-order u32, or `default` on width mismatch.
    pub fn as_u32_or(&self, default: u32) -> u32 {
        self.as_u32().unwrap_or(default)
    }

    /// IPv4 or IPv6 address; `None` unless the value is 4 or 16 bytes.
    pub fn as_inet_addr(&self) -> Option<IpAddr> {
        if let Some(b) = self.exact::<4>() {
            return Some(IpAddr::V4(Ipv4Addr::from(b)));
        }
        self.exact::<16>().map(|b| IpAddr::V6(Ipv6Addr::from(b)))
    }

    /// Hardware address; `None` unless the value is exactly 6 bytes.
    pub fn as_mac_addr(&self) -> Option<[u8; 6]> {
        self.exact()
    }

    /// String value with one trailing NUL stripped.
    ///
    /// `None` for an empty value or non-UTF-8 content.
    pub fn as_string(&self) -> Option<String> {
        if self.value.is_empty() {
            return None;
        }
        let bytes = self.value.strip_suffix(&[0]).unwrap_or(&self.value);
        String::from_utf8(bytes.to_vec()).ok()
    }
}

impl fmt::Display for RawAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nlattr{{len={}, type={}", self.nla_len, self.kind())?;
        if self.is_nested() {
            f.write_str(", nested")?;
        }
        write!(f, ", value={}}}", hexify(&self.value))
    }
}
