//! Netfilter generic message header (struct nfgenmsg).

use std::fmt;

use bytes::BufMut;

use crate::netlink::error::Result;
use crate::netlink::parse::{ByteOrder, WireStruct, ensure_len, parse_be16, parse_u8};

/// Netfilter netlink version.
pub const NFNETLINK_V0: u8 = 0;

/// Header that follows nlmsghdr on every nfnetlink message.
///
/// `res_id` is held in host order here and is always big-endian on the wire,
/// whatever byte order the rest of the message uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NfGenMsg {
    /// Address family (AF_INET, AF_INET6, AF_UNSPEC).
    pub nfgen_family: u8,
    /// Protocol version, always [`NFNETLINK_V0`].
    pub version: u8,
    /// Resource id (subsystem specific).
    pub res_id: u16,
}

impl NfGenMsg {
    /// Create a header for `family` with version 0 and resource id 0.
    pub fn new(family: u8) -> Self {
        Self {
            nfgen_family: family,
            version: NFNETLINK_V0,
            res_id: 0,
        }
    }
}

impl WireStruct for NfGenMsg {
    const SIZE: usize = 4;

    fn parse(input: &mut &[u8], _order: ByteOrder) -> Result<Self> {
        ensure_len(input, Self::SIZE)?;
        let mut cursor = *input;
        let msg = Self {
            nfgen_family: parse_u8(&mut cursor)?,
            version: parse_u8(&mut cursor)?,
            res_id: parse_be16(&mut cursor)?,
        };
        *input = cursor;
        Ok(msg)
    }

    fn pack<B: BufMut>(&self, buf: &mut B, _order: ByteOrder) {
        buf.put_u8(self.nfgen_family);
        buf.put_u8(self.version);
        buf.put_u16(self.res_id);
    }
}

impl fmt::Display for NfGenMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nfgenmsg{{family={}, version={}, res_id={}}}",
            self.nfgen_family, self.version, self.res_id
        )
    }
}
