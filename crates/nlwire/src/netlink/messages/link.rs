//! Strongly-typed link message (RTM_NEWLINK / RTM_DELLINK).

use std::fmt;

use super::attr_block;
use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::{format_mac_addr, msg_type_name};
use crate::netlink::error::Result;
use crate::netlink::message::{NLM_F_ACK, NLM_F_REQUEST, NlMsgHdr, NlMsgType};
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
use crate::netlink::protocol::Protocol;
use crate::netlink::scan::AttrTable;
use crate::netlink::types::link::{IfInfoMsg, IflaAttr, iff, iff_flags_to_string};

/// A network interface. Every attribute is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Fixed-size header.
    pub ifinfo: IfInfoMsg,
    /// MTU (IFLA_MTU).
    pub mtu: Option<u32>,
    /// Hardware address (IFLA_ADDRESS), Ethernet-sized only.
    pub hardware_address: Option<[u8; 6]>,
    /// Interface name (IFLA_IFNAME).
    pub interface_name: Option<String>,
}

impl LinkMessage {
    fn request(seq: u32, ifinfo: IfInfoMsg) -> Self {
        Self {
            header: NlMsgHdr::new(NlMsgType::RTM_NEWLINK, NLM_F_REQUEST | NLM_F_ACK).with_seq(seq),
            ifinfo,
            mtu: None,
            hardware_address: None,
            interface_name: None,
        }
    }

    /// Build a request that brings the interface up or down.
    pub fn set_link_state_request(seq: u32, ifindex: i32, up: bool) -> Self {
        let flags = if up { iff::UP } else { 0 };
        let ifinfo = IfInfoMsg::new()
            .with_family(libc::AF_UNSPEC as u8)
            .with_index(ifindex)
            .with_flags(flags, iff::UP);
        Self::request(seq, ifinfo)
    }

    /// Build a request that changes the interface hardware address.
    pub fn set_link_address_request(seq: u32, ifindex: i32, mac: [u8; 6]) -> Self {
        let ifinfo = IfInfoMsg::new()
            .with_family(libc::AF_UNSPEC as u8)
            .with_index(ifindex);
        let mut msg = Self::request(seq, ifinfo);
        msg.hardware_address = Some(mac);
        msg
    }

    /// Get the interface index.
    pub fn ifindex(&self) -> i32 {
        self.ifinfo.ifi_index
    }

    /// Check if the interface is administratively up.
    pub fn is_up(&self) -> bool {
        self.ifinfo.is_up()
    }
}

impl FromNetlink for LinkMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let ifinfo = IfInfoMsg::parse(&mut cursor, order)?;
        let block = attr_block(&header, IfInfoMsg::SIZE, cursor);
        let attrs = AttrTable::parse(block, order);

        let msg = Self {
            header,
            ifinfo,
            mtu: attrs.get(IflaAttr::Mtu as u16).and_then(RawAttr::as_u32),
            hardware_address: attrs
                .get(IflaAttr::Address as u16)
                .and_then(RawAttr::as_mac_addr),
            interface_name: attrs
                .get(IflaAttr::Ifname as u16)
                .and_then(RawAttr::as_string),
        };

        *input = &cursor[block.len()..];
        Ok(msg)
    }
}

impl ToNetlink for LinkMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        IfInfoMsg::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.ifinfo);
    }

    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>> {
        let mut attrs = Vec::new();
        if let Some(mtu) = self.mtu {
            attrs.push(RawAttr::from_u32(IflaAttr::Mtu as u16, mtu, order));
        }
        if let Some(mac) = self.hardware_address {
            attrs.push(RawAttr::from_mac(IflaAttr::Address as u16, mac));
        }
        if let Some(name) = &self.interface_name {
            attrs.push(RawAttr::from_str(IflaAttr::Ifname as u16, name)?);
        }
        Ok(attrs)
    }
}

impl fmt::Display for LinkMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} <{}>",
            msg_type_name(self.header.nlmsg_type, Protocol::Route),
            self.ifinfo.ifi_index,
            self.interface_name.as_deref().unwrap_or("?"),
            iff_flags_to_string(self.ifinfo.ifi_flags),
        )?;
        if let Some(mtu) = self.mtu {
            write!(f, " mtu {mtu}")?;
        }
        if let Some(mac) = &self.hardware_address {
            write!(f, " link/ether {}", format_mac_addr(mac))?;
        }
        Ok(())
    }
}
