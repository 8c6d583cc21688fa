//! Kernel UAPI constants and formatting helpers shared by the codecs.

use std::fmt::Write as _;

use super::message::{
    NLM_F_ACK, NLM_F_APPEND, NLM_F_ATOMIC, NLM_F_DUMP_FILTERED, NLM_F_DUMP_INTR, NLM_F_ECHO,
    NLM_F_MATCH, NLM_F_MULTI, NLM_F_REQUEST, NLM_F_ROOT, NlMsgType,
};
use super::protocol::Protocol;

// ============================================================================
// nfnetlink / ctnetlink
// ============================================================================

/// Netfilter subsystem ids.
pub const NFNL_SUBSYS_NONE: u8 = 0;
pub const NFNL_SUBSYS_CTNETLINK: u8 = 1;
pub const NFNL_SUBSYS_CTNETLINK_EXP: u8 = 2;

/// Conntrack message types (low byte of nlmsg_type).
pub const IPCTNL_MSG_CT_NEW: u8 = 0;
pub const IPCTNL_MSG_CT_GET: u8 = 1;
pub const IPCTNL_MSG_CT_DELETE: u8 = 2;

/// Conntrack attributes.
pub const CTA_TUPLE_ORIG: u16 = 1;
pub const CTA_TUPLE_REPLY: u16 = 2;
pub const CTA_STATUS: u16 = 3;
pub const CTA_PROTOINFO: u16 = 4;
pub const CTA_TIMEOUT: u16 = 7;
pub const CTA_MARK: u16 = 8;
pub const CTA_ID: u16 = 12;

/// Tuple attributes.
pub const CTA_TUPLE_IP: u16 = 1;
pub const CTA_TUPLE_PROTO: u16 = 2;

/// IP attributes.
pub const CTA_IP_V4_SRC: u16 = 1;
pub const CTA_IP_V4_DST: u16 = 2;

/// Proto attributes.
pub const CTA_PROTO_NUM: u16 = 1;
pub const CTA_PROTO_SRC_PORT: u16 = 2;
pub const CTA_PROTO_DST_PORT: u16 = 3;

/// Protoinfo attributes.
pub const CTA_PROTOINFO_TCP: u16 = 1;
pub const CTA_PROTOINFO_TCP_STATE: u16 = 1;

/// Conntrack status bits (IPS_*).
pub const IPS_EXPECTED: u32 = 0x0001;
pub const IPS_SEEN_REPLY: u32 = 0x0002;
pub const IPS_ASSURED: u32 = 0x0004;
pub const IPS_CONFIRMED: u32 = 0x0008;
pub const IPS_SRC_NAT: u32 = 0x0010;
pub const IPS_DST_NAT: u32 = 0x0020;
pub const IPS_SEQ_ADJUST: u32 = 0x0040;
pub const IPS_SRC_NAT_DONE: u32 = 0x0080;
pub const IPS_DST_NAT_DONE: u32 = 0x0100;
pub const IPS_DYING: u32 = 0x0200;
pub const IPS_FIXED_TIMEOUT: u32 = 0x0400;
pub const IPS_TEMPLATE: u32 = 0x0800;
pub const IPS_UNTRACKED: u32 = 0x1000;
pub const IPS_HELPER: u32 = 0x2000;
pub const IPS_OFFLOAD: u32 = 0x4000;
pub const IPS_HW_OFFLOAD: u32 = 0x8000;

/// Full nlmsg_type for a ctnetlink message.
pub const fn ctnetlink_msg_type(msg: u8) -> u16 {
    ((NFNL_SUBSYS_CTNETLINK as u16) << 8) | msg as u16
}

// ============================================================================
// Neighbor discovery user options
// ============================================================================

/// Source address attribute that follows an nduseroptmsg.
pub const NDUSEROPT_SRCADDR: u16 = 1;

// ============================================================================
// Misc protocol numbers
// ============================================================================

/// sock_diag request/response type.
pub const SOCK_DIAG_BY_FAMILY: u16 = 20;

/// Generic netlink controller family id.
pub const GENL_ID_CTRL: u16 = 0x10;

// ============================================================================
// Alignment
// ============================================================================

/// Round `len` up to the 4-byte netlink alignment; zero or negative gives 0.
pub fn aligned_length(len: i64) -> usize {
    if len <= 0 {
        return 0;
    }
    ((len as u64).div_ceil(4) * 4) as usize
}

// ============================================================================
// Names
// ============================================================================

/// Name of an address family (`AF_INET`, ...).
pub fn address_family_name(family: u8) -> &'static str {
    match i32::from(family) {
        libc::AF_UNSPEC => "AF_UNSPEC",
        libc::AF_UNIX => "AF_UNIX",
        libc::AF_INET => "AF_INET",
        libc::AF_INET6 => "AF_INET6",
        libc::AF_NETLINK => "AF_NETLINK",
        libc::AF_PACKET => "AF_PACKET",
        libc::AF_BRIDGE => "AF_BRIDGE",
        _ => "AF_UNKNOWN",
    }
}

/// Name of an IP protocol number.
pub fn ip_protocol_name(proto: u8) -> &'static str {
    match i32::from(proto) {
        libc::IPPROTO_ICMP => "IPPROTO_ICMP",
        libc::IPPROTO_TCP => "IPPROTO_TCP",
        libc::IPPROTO_UDP => "IPPROTO_UDP",
        libc::IPPROTO_GRE => "IPPROTO_GRE",
        libc::IPPROTO_ESP => "IPPROTO_ESP",
        libc::IPPROTO_ICMPV6 => "IPPROTO_ICMPV6",
        libc::IPPROTO_SCTP => "IPPROTO_SCTP",
        _ => "IPPROTO_UNKNOWN",
    }
}

/// Name of a message type as understood on `protocol`.
pub fn msg_type_name(msg_type: u16, protocol: Protocol) -> &'static str {
    match msg_type {
        NlMsgType::NOOP => return "NLMSG_NOOP",
        NlMsgType::ERROR => return "NLMSG_ERROR",
        NlMsgType::DONE => return "NLMSG_DONE",
        NlMsgType::OVERRUN => return "NLMSG_OVERRUN",
        t if t <= NlMsgType::MAX_RESERVED => return "NLMSG_RESERVED",
        _ => {}
    }

    match protocol {
        Protocol::Route => match msg_type {
            NlMsgType::RTM_NEWLINK => "RTM_NEWLINK",
            NlMsgType::RTM_DELLINK => "RTM_DELLINK",
            NlMsgType::RTM_GETLINK => "RTM_GETLINK",
            NlMsgType::RTM_SETLINK => "RTM_SETLINK",
            NlMsgType::RTM_NEWADDR => "RTM_NEWADDR",
            NlMsgType::RTM_DELADDR => "RTM_DELADDR",
            NlMsgType::RTM_GETADDR => "RTM_GETADDR",
            NlMsgType::RTM_NEWROUTE => "RTM_NEWROUTE",
            NlMsgType::RTM_DELROUTE => "RTM_DELROUTE",
            NlMsgType::RTM_GETROUTE => "RTM_GETROUTE",
            NlMsgType::RTM_NEWNEIGH => "RTM_NEWNEIGH",
            NlMsgType::RTM_DELNEIGH => "RTM_DELNEIGH",
            NlMsgType::RTM_GETNEIGH => "RTM_GETNEIGH",
            NlMsgType::RTM_NEWRULE => "RTM_NEWRULE",
            NlMsgType::RTM_DELRULE => "RTM_DELRULE",
            NlMsgType::RTM_GETRULE => "RTM_GETRULE",
            NlMsgType::RTM_NEWNDUSEROPT => "RTM_NEWNDUSEROPT",
            _ => "RTM_UNKNOWN",
        },
        Protocol::Netfilter => {
            let [subsys, msg] = msg_type.to_be_bytes();
            match (subsys, msg) {
                (NFNL_SUBSYS_CTNETLINK, IPCTNL_MSG_CT_NEW) => "IPCTNL_MSG_CT_NEW",
                (NFNL_SUBSYS_CTNETLINK, IPCTNL_MSG_CT_GET) => "IPCTNL_MSG_CT_GET",
                (NFNL_SUBSYS_CTNETLINK, IPCTNL_MSG_CT_DELETE) => "IPCTNL_MSG_CT_DELETE",
                _ => "NFNL_UNKNOWN",
            }
        }
        Protocol::SockDiag => match msg_type {
            SOCK_DIAG_BY_FAMILY => "SOCK_DIAG_BY_FAMILY",
            _ => "SOCK_DIAG_UNKNOWN",
        },
        Protocol::Generic => match msg_type {
            GENL_ID_CTRL => "GENL_ID_CTRL",
            _ => "GENL_FAMILY",
        },
    }
}

/// Format nlmsg_flags as `NLM_F_REQUEST|NLM_F_ACK`.
///
/// The GET modifier names are used for the 0x100..0x400 bits, which the NEW
/// modifiers (REPLACE, EXCL, CREATE) share. Unnamed bits are appended in hex.
pub fn msg_flags_to_string(flags: u16) -> String {
    const NAMES: &[(u16, &str)] = &[
        (NLM_F_REQUEST, "NLM_F_REQUEST"),
        (NLM_F_MULTI, "NLM_F_MULTI"),
        (NLM_F_ACK, "NLM_F_ACK"),
        (NLM_F_ECHO, "NLM_F_ECHO"),
        (NLM_F_DUMP_INTR, "NLM_F_DUMP_INTR"),
        (NLM_F_DUMP_FILTERED, "NLM_F_DUMP_FILTERED"),
        (NLM_F_ROOT, "NLM_F_ROOT"),
        (NLM_F_MATCH, "NLM_F_MATCH"),
        (NLM_F_ATOMIC, "NLM_F_ATOMIC"),
        (NLM_F_APPEND, "NLM_F_APPEND"),
    ];
    if flags == 0 {
        return "0".to_string();
    }

    let mut parts = Vec::new();
    let mut rest = flags;
    for &(bit, name) in NAMES {
        if flags & bit != 0 {
            parts.push(name.to_string());
            rest &= !bit;
        }
    }
    if rest != 0 {
        parts.push(format!("{rest:#x}"));
    }
    parts.join("|")
}

/// Format conntrack status bits as `IPS_SEEN_REPLY|IPS_ASSURED|...`.
pub fn conntrack_status_to_string(status: u32) -> String {
    const NAMES: &[(u32, &str)] = &[
        (IPS_EXPECTED, "IPS_EXPECTED"),
        (IPS_SEEN_REPLY, "IPS_SEEN_REPLY"),
        (IPS_ASSURED, "IPS_ASSURED"),
        (IPS_CONFIRMED, "IPS_CONFIRMED"),
        (IPS_SRC_NAT, "IPS_SRC_NAT"),
        (IPS_DST_NAT, "IPS_DST_NAT"),
        (IPS_SEQ_ADJUST, "IPS_SEQ_ADJUST"),
        (IPS_SRC_NAT_DONE, "IPS_SRC_NAT_DONE"),
        (IPS_DST_NAT_DONE, "IPS_DST_NAT_DONE"),
        (IPS_DYING, "IPS_DYING"),
        (IPS_FIXED_TIMEOUT, "IPS_FIXED_TIMEOUT"),
        (IPS_TEMPLATE, "IPS_TEMPLATE"),
        (IPS_UNTRACKED, "IPS_UNTRACKED"),
        (IPS_HELPER, "IPS_HELPER"),
        (IPS_OFFLOAD, "IPS_OFFLOAD"),
        (IPS_HW_OFFLOAD, "IPS_HW_OFFLOAD"),
    ];
    NAMES
        .iter()
        .filter(|(bit, _)| status & bit != 0)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join("|")
}

// ============================================================================
// Byte formatting
// ============================================================================

/// Uppercase hex with no separators.
pub fn hexify(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for b in data {
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// Format a hardware address as `aa:bb:cc:dd:ee:ff`.
pub fn format_mac_addr(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}
