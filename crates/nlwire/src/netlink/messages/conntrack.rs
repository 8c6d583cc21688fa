//! Connection tracking messages (ctnetlink over NETLINK_NETFILTER).
//!
//! Only IPv4 TCP/UDP tuples are decoded. A tuple either has all five fields
//! or is absent.

use std::fmt;
use std::net::Ipv4Addr;

use super::strict_attr_block;
use crate::netlink::attr::{NLA_F_NESTED, RawAttr};
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::{
    CTA_ID, CTA_IP_V4_DST, CTA_IP_V4_SRC, CTA_MARK, CTA_PROTO_DST_PORT, CTA_PROTO_NUM,
    CTA_PROTO_SRC_PORT, CTA_PROTOINFO, CTA_PROTOINFO_TCP, CTA_PROTOINFO_TCP_STATE, CTA_STATUS,
    CTA_TIMEOUT, CTA_TUPLE_IP, CTA_TUPLE_ORIG, CTA_TUPLE_PROTO, CTA_TUPLE_REPLY,
    IPCTNL_MSG_CT_NEW, conntrack_status_to_string, ctnetlink_msg_type, msg_type_name,
};
use crate::netlink::error::Result;
use crate::netlink::message::{NLM_F_ACK, NLM_F_REPLACE, NLM_F_REQUEST, NlMsgHdr};
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};
use crate::netlink::protocol::Protocol;
use crate::netlink::scan::AttrTable;
use crate::netlink::types::nfgen::NfGenMsg;

/// IP protocol numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IpProtocol {
    /// TCP (6)
    Tcp,
    /// UDP (17)
    Udp,
    /// ICMP (1)
    Icmp,
    /// ICMPv6 (58)
    Icmpv6,
    /// Other protocol
    Other(u8),
}

impl IpProtocol {
    /// Map a protocol number.
    pub fn from_u8(val: u8) -> Self {
        match val {
            1 => Self::Icmp,
            6 => Self::Tcp,
            17 => Self::Udp,
            58 => Self::Icmpv6,
            other => Self::Other(other),
        }
    }

    /// Get the protocol number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Icmp => 1,
            Self::Tcp => 6,
            Self::Udp => 17,
            Self::Icmpv6 => 58,
            Self::Other(n) => *n,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Icmp => "icmp",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmpv6 => "icmpv6",
            Self::Other(_) => "unknown",
        }
    }
}

/// TCP connection tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TcpConntrackState {
    None,
    SynSent,
    SynRecv,
    Established,
    FinWait,
    CloseWait,
    LastAck,
    TimeWait,
    Close,
    Listen,
    SynSent2,
    Max,
    Ignore,
    Retrans,
    Unack,
    Unknown(u8),
}

impl TcpConntrackState {
    /// Map a kernel state number.
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::None,
            1 => Self::SynSent,
            2 => Self::SynRecv,
            3 => Self::Established,
            4 => Self::FinWait,
            5 => Self::CloseWait,
            6 => Self::LastAck,
            7 => Self::TimeWait,
            8 => Self::Close,
            9 => Self::Listen,
            10 => Self::SynSent2,
            11 => Self::Max,
            12 => Self::Ignore,
            13 => Self::Retrans,
            14 => Self::Unack,
            other => Self::Unknown(other),
        }
    }

    /// Get the kernel state number.
    pub fn number(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::SynSent => 1,
            Self::SynRecv => 2,
            Self::Established => 3,
            Self::FinWait => 4,
            Self::CloseWait => 5,
            Self::LastAck => 6,
            Self::TimeWait => 7,
            Self::Close => 8,
            Self::Listen => 9,
            Self::SynSent2 => 10,
            Self::Max => 11,
            Self::Ignore => 12,
            Self::Retrans => 13,
            Self::Unack => 14,
            Self::Unknown(n) => *n,
        }
    }
}

/// One direction of a tracked connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConntrackTuple {
    /// Source IP address.
    pub src_ip: Ipv4Addr,
    /// Destination IP address.
    pub dst_ip: Ipv4Addr,
    /// Source port.
    pub src_port: u16,
    /// Destination port.
    pub dst_port: u16,
    /// Protocol, TCP or UDP.
    pub proto: IpProtocol,
}

impl ConntrackTuple {
    /// Decode a `CTA_TUPLE_*` attribute.
    ///
    /// Returns `None` unless both addresses, a TCP or UDP protocol number and
    /// two nonzero ports are present.
    pub fn from_attr(attr: &RawAttr) -> Option<Self> {
        let tuple = AttrTable::from_nested(attr);

        let ip = AttrTable::from_nested(tuple.get(CTA_TUPLE_IP | NLA_F_NESTED)?);
        let src_ip = ipv4_attr(ip.get(CTA_IP_V4_SRC)?)?;
        let dst_ip = ipv4_attr(ip.get(CTA_IP_V4_DST)?)?;

        let proto = AttrTable::from_nested(tuple.get(CTA_TUPLE_PROTO | NLA_F_NESTED)?);
        let proto_num = proto.get(CTA_PROTO_NUM)?.as_u8_or(0);
        let src_port = proto.get(CTA_PROTO_SRC_PORT)?.as_be16_or(0);
        let dst_port = proto.get(CTA_PROTO_DST_PORT)?.as_be16_or(0);

        let proto = IpProtocol::from_u8(proto_num);
        if !matches!(proto, IpProtocol::Tcp | IpProtocol::Udp) || src_port == 0 || dst_port == 0 {
            return None;
        }

        Some(Self {
            src_ip,
            dst_ip,
            src_port,
            dst_port,
            proto,
        })
    }

    /// Encode as a nested tuple attribute of `attr_type`.
    pub fn to_attr(&self, attr_type: u16, order: ByteOrder) -> Result<RawAttr> {
        let ip = RawAttr::nested(
            CTA_TUPLE_IP,
            &[
                RawAttr::new(CTA_IP_V4_SRC, self.src_ip.octets())?,
                RawAttr::new(CTA_IP_V4_DST, self.dst_ip.octets())?,
            ],
            order,
        )?;
        let proto = RawAttr::nested(
            CTA_TUPLE_PROTO,
            &[
                RawAttr::from_u8(CTA_PROTO_NUM, self.proto.number()),
                RawAttr::from_be16(CTA_PROTO_SRC_PORT, self.src_port),
                RawAttr::from_be16(CTA_PROTO_DST_PORT, self.dst_port),
            ],
            order,
        )?;
        RawAttr::nested(attr_type, &[ip, proto], order)
    }
}

fn ipv4_attr(attr: &RawAttr) -> Option<Ipv4Addr> {
    <[u8; 4]>::try_from(attr.value()).ok().map(Ipv4Addr::from)
}

impl fmt::Display for ConntrackTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} -> {}:{}",
            self.proto.name(),
            self.src_ip,
            self.src_port,
            self.dst_ip,
            self.dst_port
        )
    }
}

/// A conntrack entry update or delete event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConntrackMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Netfilter sub-header.
    pub nfgen: NfGenMsg,
    /// IPS_* status bits (CTA_STATUS). `None` when absent or malformed.
    pub status: Option<u32>,
    /// Remaining lifetime in seconds (CTA_TIMEOUT). `None` when absent or
    /// malformed; `Some(0)` is a real zero timeout and is encoded as such.
    pub timeout_sec: Option<u32>,
    /// Original direction (CTA_TUPLE_ORIG).
    pub tuple_orig: Option<ConntrackTuple>,
    /// Reply direction (CTA_TUPLE_REPLY).
    pub tuple_reply: Option<ConntrackTuple>,
    /// Connection mark (CTA_MARK).
    pub mark: Option<u32>,
    /// Kernel conntrack id (CTA_ID).
    pub id: Option<u32>,
    /// TCP state (CTA_PROTOINFO / CTA_PROTOINFO_TCP / CTA_PROTOINFO_TCP_STATE).
    pub tcp_state: Option<TcpConntrackState>,
}

impl ConntrackMessage {
    /// Sequence number used for timeout update requests.
    pub const UPDATE_SEQ: u32 = 1;

    /// Build the bytes of an `IPCTNL_MSG_CT_NEW` request that replaces the
    /// timeout of an existing IPv4 entry.
    pub fn new_ipv4_timeout_update_request(
        proto: IpProtocol,
        src: Ipv4Addr,
        src_port: u16,
        dst: Ipv4Addr,
        dst_port: u16,
        timeout_sec: u32,
    ) -> Result<Vec<u8>> {
        let header = NlMsgHdr::new(
            ctnetlink_msg_type(IPCTNL_MSG_CT_NEW),
            NLM_F_REQUEST | NLM_F_ACK | NLM_F_REPLACE,
        )
        .with_seq(Self::UPDATE_SEQ);
        let msg = Self {
            header,
            nfgen: NfGenMsg::new(libc::AF_INET as u8),
            status: None,
            timeout_sec: Some(timeout_sec),
            tuple_orig: Some(ConntrackTuple {
                src_ip: src,
                dst_ip: dst,
                src_port,
                dst_port,
                proto,
            }),
            tuple_reply: None,
            mark: None,
            id: None,
            tcp_state: None,
        };
        msg.to_bytes(ByteOrder::Native)
    }

    /// Status bits, 0 when CTA_STATUS was absent.
    pub fn status_bits(&self) -> u32 {
        self.status.unwrap_or(0)
    }

    /// Timeout in seconds, 0 when CTA_TIMEOUT was absent.
    pub fn timeout(&self) -> u32 {
        self.timeout_sec.unwrap_or(0)
    }

    /// Check if an IPS_* bit is set.
    pub fn has_status(&self, bit: u32) -> bool {
        self.status_bits() & bit != 0
    }
}

fn tcp_state(attrs: &AttrTable) -> Option<TcpConntrackState> {
    let info = AttrTable::from_nested(attrs.get(CTA_PROTOINFO | NLA_F_NESTED)?);
    let tcp = AttrTable::from_nested(info.get(CTA_PROTOINFO_TCP | NLA_F_NESTED)?);
    match tcp.get(CTA_PROTOINFO_TCP_STATE)?.value() {
        [state] => Some(TcpConntrackState::from_u8(*state)),
        _ => None,
    }
}

impl FromNetlink for ConntrackMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let nfgen = NfGenMsg::parse(&mut cursor, order)?;
        let block = strict_attr_block(&header, NfGenMsg::SIZE, cursor)?;
        let attrs = AttrTable::parse(block, order);

        let msg = Self {
            header,
            nfgen,
            status: attrs.get(CTA_STATUS).and_then(RawAttr::as_be32),
            timeout_sec: attrs.get(CTA_TIMEOUT).and_then(RawAttr::as_be32),
            tuple_orig: attrs
                .get(CTA_TUPLE_ORIG | NLA_F_NESTED)
                .and_then(ConntrackTuple::from_attr),
            tuple_reply: attrs
                .get(CTA_TUPLE_REPLY | NLA_F_NESTED)
                .and_then(ConntrackTuple::from_attr),
            mark: attrs.get(CTA_MARK).and_then(RawAttr::as_be32),
            id: attrs.get(CTA_ID).and_then(RawAttr::as_be32),
            tcp_state: tcp_state(&attrs),
        };

        *input = &cursor[block.len()..];
        Ok(msg)
    }
}

impl ToNetlink for ConntrackMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        NfGenMsg::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.nfgen);
    }

    fn attributes(&self, order: ByteOrder) -> Result<Vec<RawAttr>> {
        let mut attrs = Vec::new();
        if let Some(tuple) = &self.tuple_orig {
            attrs.push(tuple.to_attr(CTA_TUPLE_ORIG, order)?);
        }
        if let Some(tuple) = &self.tuple_reply {
            attrs.push(tuple.to_attr(CTA_TUPLE_REPLY, order)?);
        }
        if let Some(status) = self.status {
            attrs.push(RawAttr::from_be32(CTA_STATUS, status));
        }
        if let Some(state) = self.tcp_state {
            let tcp = RawAttr::nested(
                CTA_PROTOINFO_TCP,
                &[RawAttr::from_u8(CTA_PROTOINFO_TCP_STATE, state.number())],
                order,
            )?;
            attrs.push(RawAttr::nested(CTA_PROTOINFO, &[tcp], order)?);
        }
        if let Some(timeout) = self.timeout_sec {
            attrs.push(RawAttr::from_be32(CTA_TIMEOUT, timeout));
        }
        if let Some(mark) = self.mark {
            attrs.push(RawAttr::from_be32(CTA_MARK, mark));
        }
        if let Some(id) = self.id {
            attrs.push(RawAttr::from_be32(CTA_ID, id));
        }
        Ok(attrs)
    }
}

impl fmt::Display for ConntrackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(msg_type_name(self.header.nlmsg_type, Protocol::Netfilter))?;
        match &self.tuple_orig {
            Some(tuple) => write!(f, " {tuple}")?,
            None => f.write_str(" <no tuple>")?,
        }
        if let Some(state) = self.tcp_state {
            write!(f, " {state:?}")?;
        }
        write!(f, " timeout {}", self.timeout())?;
        if self.status_bits() != 0 {
            write!(f, " status {}", conntrack_status_to_string(self.status_bits()))?;
        }
        if let Some(mark) = self.mark {
            write!(f, " mark {mark:#x}")?;
        }
        Ok(())
    }
}
