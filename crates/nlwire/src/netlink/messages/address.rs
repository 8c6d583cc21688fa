//! Strongly-typed address message (RTM_NEWADDR / RTM_DELADDR).

use std::fmt;
use std::net::IpAddr;

use super::attr_block;
use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::msg_type_name;
use crate::netlink::error::{Error, Result};
use crate::netlink::message::{NLM_F_ACK, NLM_F_REPLACE, NLM_F_REQUEST, NlMsgHdr, NlMsgType};
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
use crate::netlink::protocol::Protocol;
use crate::netlink::scan::AttrTable;
use crate::netlink::types::addr::{IfAddrMsg, IfaAttr, IfaCacheInfo, scope_name};

/// An interface address.
///
/// `IFA_ADDRESS` and `IFA_FLAGS` are required. The 8-bit `ifa_flags` in the
/// fixed header is kept as received, but [`AddressMessage::flags`] always
/// holds the full 32-bit value from `IFA_FLAGS`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AddressMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Fixed-size header.
    pub ifaddr: IfAddrMsg,
    /// Address (IFA_ADDRESS).
    pub address: IpAddr,
    /// Lifetimes (IFA_CACHEINFO).
    pub cache_info: Option<IfaCacheInfo>,
    /// Extended flags (IFA_FLAGS), overriding the header byte.
    pub flags: u32,
}

impl AddressMessage {
    /// Build an RTM_NEWADDR request.
    ///
    /// Fails if `preferred > valid` or `prefixlen` exceeds the address length.
    #[allow(clippy::too_many_arguments)]
    pub fn new_address_request(
        seq: u32,
        ip: IpAddr,
        prefixlen: u8,
        flags: u32,
        scope: u8,
        ifindex: u32,
        preferred: u32,
        valid: u32,
    ) -> Result<Self> {
        let (family, max_prefix) = match ip {
            IpAddr::V4(_) => (libc::AF_INET as u8, 32),
            IpAddr::V6(_) => (libc::AF_INET6 as u8, 128),
        };
        if prefixlen > max_prefix {
            return Err(Error::InvalidMessage(format!(
                "prefix length {prefixlen} too long for {ip}"
            )));
        }
        if preferred > valid {
            return Err(Error::InvalidMessage(format!(
                "preferred lifetime {preferred} exceeds valid lifetime {valid}"
            )));
        }

        Ok(Self {
            header: NlMsgHdr::new(
                NlMsgType::RTM_NEWADDR,
                NLM_F_REQUEST | NLM_F_ACK | NLM_F_REPLACE,
            )
            .with_seq(seq),
            ifaddr: IfAddrMsg::new()
                .with_family(family)
                .with_prefixlen(prefixlen)
                .with_flags(flags as u8)
                .with_scope(scope)
                .with_index(ifindex),
            address: ip,
            cache_info: Some(IfaCacheInfo::with_lifetimes(preferred, valid)),
            flags,
        })
    }

    /// Get the address family.
    pub fn family(&self) -> u8 {
        self.ifaddr.ifa_family
    }

    /// Get the prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.ifaddr.ifa_prefixlen
    }

    /// Get the interface index.
    pub fn ifindex(&self) -> u32 {
        self.ifaddr.ifa_index
    }

    /// Check if this address is permanent.
    pub fn is_permanent(&self) -> bool {
        self.flags & crate::netlink::types::addr::ifa_flags::PERMANENT != 0
    }
}

impl FromNetlink for AddressMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let ifaddr = IfAddrMsg::parse(&mut cursor, order)?;
        let block = attr_block(&header, IfAddrMsg::SIZE, cursor);
        let attrs = AttrTable::parse(block, order);

        let address = attrs
            .get(IfaAttr::Address as u16)
            .ok_or(Error::MissingAttribute("IFA_ADDRESS"))?
            .as_inet_addr()
            .ok_or_else(|| Error::InvalidAttribute("IFA_ADDRESS is not an IP address".into()))?;

        let cache_info = attrs
            .get(IfaAttr::Cacheinfo as u16)
            .and_then(RawAttr::as_struct::<IfaCacheInfo>);

        let flags = attrs
            .get(IfaAttr::Flags as u16)
            .ok_or(Error::MissingAttribute("IFA_FLAGS"))?
            .as_u32()
            .ok_or_else(|| Error::InvalidAttribute("IFA_FLAGS must be 4 bytes".into()))?;

        *input = &cursor[block.len()..];
        Ok(Self {
            header,
            ifaddr,
            address,
            cache_info,
            flags,
        })
    }
}

impl ToNetlink for AddressMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        IfAddrMsg::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.ifaddr);
    }

    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>> {
        let mut attrs = vec![RawAttr::from_ip(IfaAttr::Address as u16, self.address)];
        if let Some(info) = &self.cache_info {
            attrs.push(RawAttr::from_struct(IfaAttr::Cacheinfo as u16, info, order));
        }
        attrs.push(RawAttr::from_u32(IfaAttr::Flags as u16, self.flags, order));
        Ok(attrs)
    }
}

impl fmt::Display for AddressMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} ifindex {} flags {:#x} scope {}",
            msg_type_name(self.header.nlmsg_type, Protocol::Route),
            self.address,
            self.ifaddr.ifa_prefixlen,
            self.ifaddr.ifa_index,
            self.flags,
            scope_name(self.ifaddr.ifa_scope),
        )?;
        if let Some(info) = &self.cache_info {
            write!(f, " preferred {} valid {}", info.ifa_prefered, info.ifa_valid)?;
        }
        Ok(())
    }
}
