//! Neighbor (ARP/NDP) message types.

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::Result;
use crate::netlink::parse::{
    ByteOrder, WireStruct, ensure_len, parse_i32, parse_u8, parse_u16, parse_u32,
};

/// Neighbor message (struct ndmsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NdMsg {
    /// Address family.
    pub ndm_family: u8,
    /// Padding.
    pub ndm_pad1: u8,
    /// Padding.
    pub ndm_pad2: u16,
    /// Interface index.
    pub ndm_ifindex: i32,
    /// Neighbor state (NUD_*).
    pub ndm_state: u16,
    /// Neighbor flags (NTF_*).
    pub ndm_flags: u8,
    /// Neighbor type.
    pub ndm_type: u8,
}

impl NdMsg {
    /// Create a new neighbor message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ndm_family = family;
        self
    }

    /// Set the interface index.
    pub fn with_ifindex(mut self, ifindex: i32) -> Self {
        self.ndm_ifindex = ifindex;
        self
    }

    /// Set the neighbor state.
    pub fn with_state(mut self, state: u16) -> Self {
        self.ndm_state = state;
        self
    }

    /// Set the neighbor flags.
    pub fn with_flags(mut self, flags: u8) -> Self {
        self.ndm_flags = flags;
        self
    }
}

impl WireStruct for NdMsg {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let msg = Self {
            ndm_family: parse_u8(&mut cursor)?,
            ndm_pad1: parse_u8(&mut cursor)?,
            ndm_pad2: parse_u16(&mut cursor, order)?,
            ndm_ifindex: parse_i32(&mut cursor, order)?,
            ndm_state: parse_u16(&mut cursor, order)?,
            ndm_flags: parse_u8(&mut cursor)?,
            ndm_type: parse_u8(&mut cursor)?,
        };
        *input = cursor;
        Ok(msg)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        buf.put_u8(self.ndm_family);
        buf.put_u8(self.ndm_pad1);
        order.put_u16(buf, self.ndm_pad2);
        order.put_i32(buf, self.ndm_ifindex);
        order.put_u16(buf, self.ndm_state);
        buf.put_u8(self.ndm_flags);
        buf.put_u8(self.ndm_type);
    }
}

/// Neighbor cache info (struct nda_cacheinfo).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NdaCacheInfo {
    pub ndm_confirmed: u32,
    pub ndm_used: u32,
    pub ndm_updated: u32,
    pub ndm_refcnt: u32,
}

impl WireStruct for NdaCacheInfo {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let info = Self {
            ndm_confirmed: parse_u32(&mut cursor, order)?,
            ndm_used: parse_u32(&mut cursor, order)?,
            ndm_updated: parse_u32(&mut cursor, order)?,
            ndm_refcnt: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(info)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        order.put_u32(buf, self.ndm_confirmed);
        order.put_u32(buf, self.ndm_used);
        order.put_u32(buf, self.ndm_updated);
        order.put_u32(buf, self.ndm_refcnt);
    }
}

/// Neighbor attributes (NDA_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NdaAttr {
    Unspec = 0,
    Dst = 1,
    Lladdr = 2,
    Cacheinfo = 3,
    Probes = 4,
    Vlan = 5,
    Port = 6,
    Vni = 7,
    Ifindex = 8,
    Master = 9,
}

impl From<u16> for NdaAttr {
    fn from(val: u16) -> Self {
        match val {
            1 => Self::Dst,
            2 => Self::Lladdr,
            3 => Self::Cacheinfo,
            4 => Self::Probes,
            5 => Self::Vlan,
            6 => Self::Port,
            7 => Self::Vni,
            8 => Self::Ifindex,
            9 => Self::Master,
            _ => Self::Unspec,
        }
    }
}

/// Neighbor state (NUD_*).
pub mod nud {
    pub const INCOMPLETE: u16 = 0x01;
    pub const REACHABLE: u16 = 0x02;
    pub const STALE: u16 = 0x04;
    pub const DELAY: u16 = 0x08;
    pub const PROBE: u16 = 0x10;
    pub const FAILED: u16 = 0x20;
    pub const NOARP: u16 = 0x40;
    pub const PERMANENT: u16 = 0x80;
    pub const NONE: u16 = 0x00;
}

/// Get the name of a neighbor state.
pub fn nud_state_name(state: u16) -> &'static str {
    match state {
        nud::INCOMPLETE => "INCOMPLETE",
        nud::REACHABLE => "REACHABLE",
        nud::STALE => "STALE",
        nud::DELAY => "DELAY",
        nud::PROBE => "PROBE",
        nud::FAILED => "FAILED",
        nud::NOARP => "NOARP",
        nud::PERMANENT => "PERMANENT",
        nud::NONE => "NONE",
        _ => "UNKNOWN",
    }
}

/// Neighbor flags (NTF_*).
pub mod ntf {
    pub const USE: u8 = 0x01;
    pub const SELF: u8 = 0x02;
    pub const MASTER: u8 = 0x04;
    pub const PROXY: u8 = 0x08;
    pub const EXT_LEARNED: u8 = 0x10;
    pub const OFFLOADED: u8 = 0x20;
    pub const STICKY: u8 = 0x40;
    pub const ROUTER: u8 = 0x80;
}
