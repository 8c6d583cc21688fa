//! Route message types.

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::Result;
use crate::netlink::parse::{ByteOrder, WireStruct, ensure_len, parse_i32, parse_u8, parse_u32};

/// Route message (struct rtmsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RtMsg {
    /// Address family.
    pub rtm_family: u8,
    /// Destination prefix length.
    pub rtm_dst_len: u8,
    /// Source prefix length.
    pub rtm_src_len: u8,
    /// TOS filter.
    pub rtm_tos: u8,
    /// Routing table id (RT_TABLE_*).
    pub rtm_table: u8,
    /// Routing protocol (RTPROT_*).
    pub rtm_protocol: u8,
    /// Scope (RT_SCOPE_*).
    pub rtm_scope: u8,
    /// Route type (RTN_*).
    pub rtm_type: u8,
    /// Route flags (RTM_F_*).
    pub rtm_flags: u32,
}

impl RtMsg {
    /// Create a new route message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.rtm_family = family;
        self
    }

    /// Set the destination prefix length.
    pub fn with_dst_len(mut self, len: u8) -> Self {
        self.rtm_dst_len = len;
        self
    }

    /// Set the routing table.
    pub fn with_table(mut self, table: u8) -> Self {
        self.rtm_table = table;
        self
    }

    /// Set the routing protocol.
    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.rtm_protocol = protocol;
        self
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: u8) -> Self {
        self.rtm_scope = scope;
        self
    }

    /// Set the route type.
    pub fn with_type(mut self, rtm_type: u8) -> Self {
        self.rtm_type = rtm_type;
        self
    }
}

impl WireStruct for RtMsg {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let msg = Self {
            rtm_family: parse_u8(&mut cursor)?,
            rtm_dst_len: parse_u8(&mut cursor)?,
            rtm_src_len: parse_u8(&mut cursor)?,
            rtm_tos: parse_u8(&mut cursor)?,
            rtm_table: parse_u8(&mut cursor)?,
            rtm_protocol: parse_u8(&mut cursor)?,
            rtm_scope: parse_u8(&mut cursor)?,
            rtm_type: parse_u8(&mut cursor)?,
            rtm_flags: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(msg)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        buf.put_u8(self.rtm_family);
        buf.put_u8(self.rtm_dst_len);
        buf.put_u8(self.rtm_src_len);
        buf.put_u8(self.rtm_tos);
        buf.put_u8(self.rtm_table);
        buf.put_u8(self.rtm_protocol);
        buf.put_u8(self.rtm_scope);
        buf.put_u8(self.rtm_type);
        order.put_u32(buf, self.rtm_flags);
    }
}

/// Route cache info (struct rta_cacheinfo).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RtaCacheInfo {
    pub rta_clntref: u32,
    pub rta_lastuse: u32,
    pub rta_expires: i32,
    pub rta_error: u32,
    pub rta_used: i32,
    pub rta_id: u32,
    pub rta_ts: u32,
    pub rta_tsage: u32,
}

impl WireStruct for RtaCacheInfo {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let info = Self {
            rta_clntref: parse_u32(&mut cursor, order)?,
            rta_lastuse: parse_u32(&mut cursor, order)?,
            rta_expires: parse_i32(&mut cursor, order)?,
            rta_error: parse_u32(&mut cursor, order)?,
            rta_used: parse_i32(&mut cursor, order)?,
            rta_id: parse_u32(&mut cursor, order)?,
            rta_ts: parse_u32(&mut cursor, order)?,
            rta_tsage: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(info)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_u32(buf, self.rta_clntref);
        order.put_u32(buf, self.rta_lastuse);
        order.put_i32(buf, self.rta_expires);
        order.put_u32(buf, self.rta_error);
        order.put_i32(buf, self.rta_used);
        order.put_u32(buf, self.rta_id);
        order.put_u32(buf, self.rta_ts);
        order.put_u32(buf, self.rta_tsage);
    }
}

/// Route attributes (RTA_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum RtaAttr {
    Unspec = 0,
    Dst = 1,
    Src = 2,
    Iif = 3,
    Oif = 4,
    Gateway = 5,
    Priority = 6,
    Prefsrc = 7,
    Metrics = 8,
    Multipath = 9,
    Flow = 11,
    Cacheinfo = 12,
    Table = 15,
    Mark = 16,
    Pref = 20,
}

impl From<u16> for RtaAttr {
    fn from(val: u16) -> Self {
        match val {
            1 => Self::Dst,
            2 => Self::Src,
            3 => Self::Iif,
            4 => Self::Oif,
            5 => Self::Gateway,
            6 => Self::Priority,
            7 => Self::Prefsrc,
            8 => Self::Metrics,
            9 => Self::Multipath,
            11 => Self::Flow,
            12 => Self::Cacheinfo,
            15 => Self::Table,
            16 => Self::Mark,
            20 => Self::Pref,
            _ => Self::Unspec,
        }
    }
}

/// Routing tables (RT_TABLE_*).
pub mod rt_table {
    pub const UNSPEC: u8 = 0;
    pub const DEFAULT: u8 = 253;
    pub const MAIN: u8 = 254;
    pub const LOCAL: u8 = 255;
}

/// Route types (RTN_*).
pub mod rtn {
    pub const UNSPEC: u8 = 0;
    pub const UNICAST: u8 = 1;
    pub const LOCAL: u8 = 2;
    pub const BROADCAST: u8 = 3;
    pub const ANYCAST: u8 = 4;
    pub const MULTICAST: u8 = 5;
    pub const BLACKHOLE: u8 = 6;
    pub const UNREACHABLE: u8 = 7;
    pub const PROHIBIT: u8 = 8;
}

/// Routing protocols (RTPROT_*).
pub mod rtprot {
    pub const UNSPEC: u8 = 0;
    pub const REDIRECT: u8 = 1;
    pub const KERNEL: u8 = 2;
    pub const BOOT: u8 = 3;
    pub const STATIC: u8 = 4;
    pub const RA: u8 = 9;
    pub const DHCP: u8 = 16;
}
