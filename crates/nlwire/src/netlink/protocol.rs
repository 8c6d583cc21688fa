//! Netlink protocol families.
//!
//! The same numeric message type means different things on different netlink
//! protocols (type 0 is `IPCTNL_MSG_CT_NEW` on netfilter but nothing on
//! rtnetlink), so decoding is always keyed by the protocol the buffer came from.

use std::fmt;
use std::str::FromStr;

use netlink_sys::protocols;

use super::error::Error;

/// Netlink protocol a buffer was received on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Protocol {
    /// Routing/device hook (links, addresses, routes, neighbors).
    #[default]
    Route,
    /// Socket monitoring.
    SockDiag,
    /// Netfilter (conntrack lives here).
    Netfilter,
    /// Generic netlink.
    Generic,
}

impl Protocol {
    /// The `NETLINK_*` protocol number.
    pub fn as_isize(self) -> isize {
        match self {
            Protocol::Route => protocols::NETLINK_ROUTE,
            Protocol::SockDiag => protocols::NETLINK_SOCK_DIAG,
            Protocol::Netfilter => protocols::NETLINK_NETFILTER,
            Protocol::Generic => protocols::NETLINK_GENERIC,
        }
    }

    /// Look a protocol up by its `NETLINK_*` number.
    pub fn from_isize(value: isize) -> Option<Self> {
        [
            Protocol::Route,
            Protocol::SockDiag,
            Protocol::Netfilter,
            Protocol::Generic,
        ]
        .into_iter()
        .find(|p| p.as_isize() == value)
    }

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Route => "route",
            Protocol::SockDiag => "sock_diag",
            Protocol::Netfilter => "netfilter",
            Protocol::Generic => "generic",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "route" | "rtnetlink" => Ok(Protocol::Route),
            "sock_diag" | "sockdiag" | "inet_diag" => Ok(Protocol::SockDiag),
            "netfilter" | "nfnetlink" | "conntrack" => Ok(Protocol::Netfilter),
            "generic" | "genl" => Ok(Protocol::Generic),
            _ => Err(Error::InvalidMessage(format!("unknown protocol: {s}"))),
        }
    }
}
