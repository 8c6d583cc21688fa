//! Link message types.

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::Result;
use crate::netlink::parse::{
    ByteOrder, WireStruct, ensure_len, parse_i32, parse_u8, parse_u16, parse_u32,
};

/// Interface info message (struct ifinfomsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IfInfoMsg {
    /// Address family (usually AF_UNSPEC).
    pub ifi_family: u8,
    /// Padding.
    pub ifi_pad: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Change mask.
    pub ifi_change: u32,
}

impl IfInfoMsg {
    /// Create a new interface info message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ifi_family = family;
        self
    }

    /// Set the interface index.
    pub fn with_index(mut self, index: i32) -> Self {
        self.ifi_index = index;
        self
    }

    /// Set the device type.
    pub fn with_type(mut self, ifi_type: u16) -> Self {
        self.ifi_type = ifi_type;
        self
    }

    /// Set flags and the change mask together.
    pub fn with_flags(mut self, flags: u32, change: u32) -> Self {
        self.ifi_flags = flags;
        self.ifi_change = change;
        self
    }

    /// Check if the interface is administratively up.
    pub fn is_up(&self) -> bool {
        self.ifi_flags & iff::UP != 0
    }
}

impl WireStruct for IfInfoMsg {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn parse(input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let msg = Self {
            ifi_family: parse_u8(&mut cursor)?,
            ifi_pad: parse_u8(&mut cursor)?,
            ifi_type: parse_u16(&mut cursor, order)?,
            ifi_index: parse_i32(&mut cursor, order)?,
            ifi_flags: parse_u32(&mut cursor, order)?,
            ifi_change: parse_u32(&mut cursor, order)?,
        };
        *input = cursor;
        Ok(msg)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, order: ByteOrder) {
        buf.put_u8(self.ifi_family);
        buf.put_u8(self.ifi_pad);
        order.put_u16(buf, self.ifi_type);
        order.put_i32(buf, self.ifi_index);
        order.put_u32(buf, self.ifi_flags);
        order.put_u32(buf, self.ifi_change);
    }
}

/// Interface link attributes (IFLA_*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum IflaAttr {
    Unspec = 0,
    Address = 1,
    Broadcast = 2,
    Ifname = 3,
    Mtu = 4,
    Link = 5,
    Qdisc = 6,
    Stats = 7,
    Master = 10,
    Txqlen = 13,
    Operstate = 16,
    Linkmode = 17,
    Group = 27,
}

impl From<u16> for IflaAttr {
    fn from(val: u16) -> Self {
        match val {
            1 => Self::Address,
            2 => Self::Broadcast,
            3 => Self::Ifname,
            4 => Self::Mtu,
            5 => Self::Link,
            6 => Self::Qdisc,
            7 => Self::Stats,
            10 => Self::Master,
            13 => Self::Txqlen,
            16 => Self::Operstate,
            17 => Self::Linkmode,
            27 => Self::Group,
            _ => Self::Unspec,
        }
    }
}

/// Interface flags (IFF_*).
pub mod iff {
    pub const UP: u32 = 0x1;
    pub const BROADCAST: u32 = 0x2;
    pub const DEBUG: u32 = 0x4;
    pub const LOOPBACK: u32 = 0x8;
    pub const POINTOPOINT: u32 = 0x10;
    pub const NOTRAILERS: u32 = 0x20;
    pub const RUNNING: u32 = 0x40;
    pub const NOARP: u32 = 0x80;
    pub const PROMISC: u32 = 0x100;
    pub const ALLMULTI: u32 = 0x200;
    pub const MASTER: u32 = 0x400;
    pub const SLAVE: u32 = 0x800;
    pub const MULTICAST: u32 = 0x1000;
    pub const LOWER_UP: u32 = 0x10000;
    pub const DORMANT: u32 = 0x20000;
}

/// Format interface flags as `UP,BROADCAST,...`.
pub fn iff_flags_to_string(flags: u32) -> String {
    const NAMES: &[(u32, &str)] = &[
        (iff::UP, "UP"),
        (iff::BROADCAST, "BROADCAST"),
        (iff::DEBUG, "DEBUG"),
        (iff::LOOPBACK, "LOOPBACK"),
        (iff::POINTOPOINT, "POINTOPOINT"),
        (iff::NOTRAILERS, "NOTRAILERS"),
        (iff::RUNNING, "RUNNING"),
        (iff::NOARP, "NOARP"),
        (iff::PROMISC, "PROMISC"),
        (iff::ALLMULTI, "ALLMULTI"),
        (iff::MASTER, "MASTER"),
        (iff::SLAVE, "SLAVE"),
        (iff::MULTICAST, "MULTICAST"),
        (iff::LOWER_UP, "LOWER_UP"),
        (iff::DORMANT, "DORMANT"),
    ];
    NAMES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifinfomsg_size() {
        assert_eq!(IfInfoMsg::SIZE, 16);
    }

    #[test]
    fn test_ifinfomsg_native_layout() {
        let msg = IfInfoMsg::new()
            .with_type(1)
            .with_index(-1)
            .with_flags(iff::UP | iff::LOWER_UP, iff::UP);
        let mut buf = Vec::new();
        msg.pack(&mut buf, ByteOrder::Native);
        assert_eq!(buf.as_slice(), msg.as_bytes());

        let mut input = buf.as_slice();
        let parsed = IfInfoMsg::parse(&mut input, ByteOrder::Native).unwrap();
        assert_eq!(parsed, msg);
        assert!(parsed.is_up());
    }

    #[test]
    fn test_ifinfomsg_big_endian() {
        let msg = IfInfoMsg::new().with_index(7).with_flags(iff::UP, iff::UP);
        let mut buf = Vec::new();
        msg.pack(&mut buf, ByteOrder::Big);
        assert_eq!(&buf[4..8], &[0, 0, 0, 7]);
        assert_eq!(&buf[8..12], &[0, 0, 0, 1]);
    }

    #[test]
    fn test_flags_to_string() {
        assert_eq!(iff_flags_to_string(iff::UP | iff::RUNNING), "UP,RUNNING");
        assert_eq!(iff_flags_to_string(0), "");
    }
}
