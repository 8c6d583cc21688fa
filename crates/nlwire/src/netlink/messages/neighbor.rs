//! Strongly-typed neighbor message (RTM_NEWNEIGH / RTM_DELNEIGH / RTM_GETNEIGH).

use std::fmt;
use std::net::IpAddr;

use super::attr_block;
use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::{hexify, msg_type_name};
use crate::netlink::error::Result;
use crate::netlink::message::{
    NLM_F_ACK, NLM_F_CREATE, NLM_F_DUMP, NLM_F_REPLACE, NLM_F_REQUEST, NlMsgHdr, NlMsgType,
};
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
use crate::netlink::protocol::Protocol;
use crate::netlink::scan::AttrTable;
use crate::netlink::types::neigh::{NdMsg, NdaAttr, NdaCacheInfo, nud_state_name};

/// A neighbor cache entry. Every attribute is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NeighborMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Fixed-size header.
    pub ndmsg: NdMsg,
    /// Protocol address (NDA_DST).
    pub destination: Option<IpAddr>,
    /// Link-layer address (NDA_LLADDR), any length.
    pub link_layer_address: Option<Vec<u8>>,
    /// Number of probes sent (NDA_PROBES), 0 when absent.
    pub num_probes: u32,
    /// Cache info (NDA_CACHEINFO).
    pub cache_info: Option<NdaCacheInfo>,
}

impl NeighborMessage {
    /// Build an RTM_NEWNEIGH request that creates or replaces an entry.
    pub fn new_neighbor_request(
        seq: u32,
        ip: IpAddr,
        nud_state: u16,
        ifindex: i32,
        lladdr: Option<&[u8]>,
    ) -> Self {
        let family = match ip {
            IpAddr::V4(_) => libc::AF_INET as u8,
            IpAddr::V6(_) => libc::AF_INET6 as u8,
        };
        Self {
            header: NlMsgHdr::new(
                NlMsgType::RTM_NEWNEIGH,
                NLM_F_REQUEST | NLM_F_ACK | NLM_F_REPLACE | NLM_F_CREATE,
            )
            .with_seq(seq),
            ndmsg: NdMsg::new()
                .with_family(family)
                .with_ifindex(ifindex)
                .with_state(nud_state),
            destination: Some(ip),
            link_layer_address: lladdr.map(<[u8]>::to_vec),
            num_probes: 0,
            cache_info: None,
        }
    }

    /// Build an RTM_GETNEIGH dump request for every family.
    pub fn get_neighbors_request(seq: u32) -> Self {
        Self {
            header: NlMsgHdr::new(NlMsgType::RTM_GETNEIGH, NLM_F_REQUEST | NLM_F_DUMP)
                .with_seq(seq),
            ndmsg: NdMsg::new(),
            destination: None,
            link_layer_address: None,
            num_probes: 0,
            cache_info: None,
        }
    }

    /// Get the interface index.
    pub fn ifindex(&self) -> i32 {
        self.ndmsg.ndm_ifindex
    }

    /// Get the NUD state.
    pub fn state(&self) -> u16 {
        self.ndmsg.ndm_state
    }
}

impl FromNetlink for NeighborMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let ndmsg = NdMsg::parse(&mut cursor, order)?;
        let block = attr_block(&header, NdMsg::SIZE, cursor);
        let attrs = AttrTable::parse(block, order);

        let msg = Self {
            header,
            ndmsg,
            destination: attrs
                .get(NdaAttr::Dst as u16)
                .and_then(RawAttr::as_inet_addr),
            link_layer_address: attrs
                .get(NdaAttr::Lladdr as u16)
                .map(|attr| attr.value().to_vec()),
            num_probes: attrs
                .get(NdaAttr::Probes as u16)
                .map_or(0, |attr| attr.as_u32_or(0)),
            cache_info: attrs
                .get(NdaAttr::Cacheinfo as u16)
                .and_then(RawAttr::as_struct::<NdaCacheInfo>),
        };

        *input = &cursor[block.len()..];
        Ok(msg)
    }
}

impl ToNetlink for NeighborMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        NdMsg::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.ndmsg);
    }

    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>> {
        let mut attrs = Vec::new();
        if let Some(ip) = self.destination {
            attrs.push(RawAttr::from_ip(NdaAttr::Dst as u16, ip));
        }
        if let Some(lladdr) = &self.link_layer_address {
            attrs.push(RawAttr::new(NdaAttr::Lladdr as u16, lladdr.clone())?);
        }
        if self.num_probes != 0 {
            attrs.push(RawAttr::from_u32(NdaAttr::Probes as u16, self.num_probes, order));
        }
        if let Some(info) = &self.cache_info {
            attrs.push(RawAttr::from_struct(NdaAttr::Cacheinfo as u16, info, order));
        }
        Ok(attrs)
    }
}

impl fmt::Display for NeighborMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(msg_type_name(self.header.nlmsg_type, Protocol::Route))?;
        if let Some(ip) = &self.destination {
            write!(f, " {ip}")?;
        }
        write!(f, " dev {}", self.ndmsg.ndm_ifindex)?;
        if let Some(lladdr) = &self.link_layer_address {
            write!(f, " lladdr {}", hexify(lladdr))?;
        }
        write!(f, " {}", nud_state_name(self.ndmsg.ndm_state))
    }
}
