//! Address message types.

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::Result;
use crate::netlink::parse::{ByteOrder, WireStruct, ensure_len, parse_u8, parse_u32};

/// Interface address message (struct ifaddrmsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IfAddrMsg {
    /// Address family (AF_INET, AF_INET6).
    pub ifa_family: u8,
    /// Prefix length.
    pub ifa_prefixlen: u8,
    /// Address flags (IFA_F_*), low 8 bits only.
    pub ifa_flags: u8,
    /// Address scope.
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

impl IfAddrMsg {
    /// Create a new address message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ifa_family = family;
        self
    }

    /// Set the prefix length.
    pub fn with_prefixlen(mut self, prefixlen: u8) -> Self {
        self.ifa_prefixlen = prefixlen;
        self
    }

    /// Set the low byte of the address flags.
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.ifa_flags = flags;
        self
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: u8) -> Self {
        self.ifa_scope = scope;
        self
    }

    /// Set the interface index.
    pub fn with_index(mut self, index: u32) -> Self {
        self.ifa_index = index;
        self
    }
}

impl WireStruct for IfAddrMsg {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let msg = Self {
            ifa_family: parse_u8(&mut cursor)?,
            ifa_prefixlen: parse_u8(&mut cursor)?,
            ifa_flags: parse_u8(&mut cursor)?,
            ifa_scope: parse_u8(&mut cursor)?,
            ifa_index: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(msg)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        buf.put_u8(self.ifa_family);
        buf.put_u8(self.ifa_prefixlen);
        buf.put_u8(self.ifa_flags);
        buf.put_u8(self.ifa_scope);
        order.put_u32(buf, self.ifa_index);
    }
}

/// Address lifetimes (struct ifa_cacheinfo).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IfaCacheInfo {
    /// Preferred lifetime in seconds.
    pub ifa_prefered: u32,
    /// Valid lifetime in seconds.
    pub ifa_valid: u32,
    /// Created timestamp, hundredths of seconds.
    pub cstamp: u32,
    /// Updated timestamp, hundredths of seconds.
    pub tstamp: u32,
}

impl IfaCacheInfo {
    /// Lifetime value meaning "forever".
    pub const INFINITY_LIFE_TIME: u32 = 0xFFFF_FFFF;

    /// Cache info carrying only lifetimes.
    pub fn with_lifetimes(preferred: u32, valid: u32) -> Self {
        Self {
            ifa_prefered: preferred,
            ifa_valid: valid,
            ..Default::default()
        }
    }
}

impl WireStruct for IfaCacheInfo {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let info = Self {
            ifa_prefered: parse_u32(&mut cursor, order)?,
            ifa_valid: parse_u32(&mut cursor, order)?,
            cstamp: parse_u32(&mut cursor, order)?,
            tstamp: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(info)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_u32(buf, self.ifa_prefered);
        order.put_u32(buf, self.ifa_valid);
        order.put_u32(buf, self.cstamp);
        order.put_u32(buf, self.tstamp);
    }
}

/// Interface address attributes (IFA_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum IfaAttr {
    Unspec = 0,
    Address = 1,
    Local = 2,
    Label = 3,
    Broadcast = 4,
    Anycast = 5,
    Cacheinfo = 6,
    Multicast = 7,
    Flags = 8,
    RtPriority = 9,
    TargetNetnsid = 10,
    Proto = 11,
}

impl From<u16> for IfaAttr {
    fn from(val: u16) -> Self {
        match val {
            1 => Self::Address,
            2 => Self::Local,
            3 => Self::Label,
            4 => Self::Broadcast,
            5 => Self::Anycast,
            6 => Self::Cacheinfo,
            7 => Self::Multicast,
            8 => Self::Flags,
            9 => Self::RtPriority,
            10 => Self::TargetNetnsid,
            11 => Self::Proto,
            _ => Self::Unspec,
        }
    }
}

/// Address flags (IFA_F_*).
pub mod ifa_flags {
    pub const SECONDARY: u32 = 0x01;
    pub const TEMPORARY: u32 = SECONDARY;
    pub const NODAD: u32 = 0x02;
    pub const OPTIMISTIC: u32 = 0x04;
    pub const DADFAILED: u32 = 0x08;
    pub const HOMEADDRESS: u32 = 0x10;
    pub const DEPRECATED: u32 = 0x20;
    pub const TENTATIVE: u32 = 0x40;
    pub const PERMANENT: u32 = 0x80;
    pub const MANAGETEMPADDR: u32 = 0x100;
    pub const NOPREFIXROUTE: u32 = 0x200;
    pub const MCAUTOJOIN: u32 = 0x400;
    pub const STABLE_PRIVACY: u32 = 0x800;
}

/// Route/address scopes (RT_SCOPE_*).
pub mod rt_scope {
    pub const UNIVERSE: u8 = 0;
    pub const SITE: u8 = 200;
    pub const LINK: u8 = 253;
    pub const HOST: u8 = 254;
    pub const NOWHERE: u8 = 255;
}

/// Get the name of a scope value.
pub fn scope_name(scope: u8) -> &'static str {
    match scope {
        rt_scope::UNIVERSE => "global",
        rt_scope::SITE => "site",
        rt_scope::LINK => "link",
        rt_scope::HOST => "host",
        rt_scope::NOWHERE => "nowhere",
        _ => "unknown",
    }
}
