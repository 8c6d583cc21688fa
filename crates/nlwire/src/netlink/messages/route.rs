//! Strongly-typed route message (RTM_NEWROUTE / RTM_DELROUTE).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::attr_block;
use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::{address_family_name, msg_type_name};
use crate::netlink::error::{Error, Result};
use crate::netlink::message::NlMsgHdr;
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
use crate::netlink::protocol::Protocol;
use crate::netlink::scan::AttrTable;
use crate::netlink::types::route::{RtMsg, RtaAttr, RtaCacheInfo};

/// A route.
///
/// Without `RTA_DST` the destination is the unspecified address of the
/// header's family, i.e. a default route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Fixed-size header.
    pub rtmsg: RtMsg,
    /// Destination prefix address (RTA_DST); length is `rtmsg.rtm_dst_len`.
    pub destination: IpAddr,
    /// Next hop (RTA_GATEWAY).
    pub gateway: Option<IpAddr>,
    /// Output interface (RTA_OIF), 0 when absent.
    pub ifindex: u32,
    /// Cache info (RTA_CACHEINFO).
    pub cache_info: Option<RtaCacheInfo>,
}

impl RouteMessage {
    /// Destination prefix length.
    pub fn dst_len(&self) -> u8 {
        self.rtmsg.rtm_dst_len
    }

    /// Check if this is a default route.
    pub fn is_default(&self) -> bool {
        self.rtmsg.rtm_dst_len == 0
    }
}

fn unspecified_for(family: u8) -> Result<IpAddr> {
    match i32::from(family) {
        libc::AF_INET => Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        libc::AF_INET6 => Ok(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
        _ => Err(Error::InvalidMessage(format!(
            "route without RTA_DST has unsupported family {}",
            address_family_name(family)
        ))),
    }
}

fn ip_attr(attr: &RawAttr, name: &str) -> Result<IpAddr> {
    attr.as_inet_addr()
        .ok_or_else(|| Error::InvalidAttribute(format!("{name} is not an IP address")))
}

impl FromNetlink for RouteMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let rtmsg = RtMsg::parse(&mut cursor, order)?;
        let block = attr_block(&header, RtMsg::SIZE, cursor);
        let attrs = AttrTable::parse(block, order);

        let destination = match attrs.get(RtaAttr::Dst as u16) {
            Some(attr) => ip_attr(attr, "RTA_DST")?,
            None => unspecified_for(rtmsg.rtm_family)?,
        };
        let gateway = attrs
            .get(RtaAttr::Gateway as u16)
            .map(|attr| ip_attr(attr, "RTA_GATEWAY"))
            .transpose()?;
        let ifindex = attrs
            .get(RtaAttr::Oif as u16)
            .map_or(0, |attr| attr.as_u32_or(0));
        let cache_info = attrs
            .get(RtaAttr::Cacheinfo as u16)
            .and_then(RawAttr::as_struct::<RtaCacheInfo>);

        *input = &cursor[block.len()..];
        Ok(Self {
            header,
            rtmsg,
            destination,
            gateway,
            ifindex,
            cache_info,
        })
    }
}

impl ToNetlink for RouteMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        RtMsg::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.rtmsg);
    }

    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>> {
        let mut attrs = Vec::new();
        if !self.destination.is_unspecified() || self.rtmsg.rtm_dst_len != 0 {
            attrs.push(RawAttr::from_ip(RtaAttr::Dst as u16, self.destination));
        }
        if let Some(gw) = self.gateway {
            attrs.push(RawAttr::from_ip(RtaAttr::Gateway as u16, gw));
        }
        if self.ifindex != 0 {
            attrs.push(RawAttr::from_u32(RtaAttr::Oif as u16, self.ifindex, order));
        }
        if let Some(info) = &self.cache_info {
            attrs.push(RawAttr::from_struct(RtaAttr::Cacheinfo as u16, info, order));
        }
        Ok(attrs)
    }
}

impl fmt::Display for RouteMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            msg_type_name(self.header.nlmsg_type, Protocol::Route),
            self.destination,
            self.rtmsg.rtm_dst_len
        )?;
        if let Some(gw) = &self.gateway {
            write!(f, " via {gw}")?;
        }
        if self.ifindex != 0 {
            write!(f, " oif {}", self.ifindex)?;
        }
        write!(f, " table {}", self.rtmsg.rtm_table)
    }
}
