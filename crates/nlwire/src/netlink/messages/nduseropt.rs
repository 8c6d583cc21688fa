//! RTM_NEWNDUSEROPT: a neighbor discovery option relayed from the kernel.
//!
//! Layout after the outer header:
//!
//! ```text
//! u8 family | u8 pad | u16 opts_len | i32 ifindex | u8 icmp_type | u8 icmp_code | 6 pad
//! opts_len bytes of ND option
//! NDUSEROPT_SRCADDR attribute
//! ```
//!
//! The attribute starts right after the option bytes, with no padding in
//! between. Kernel options are multiples of 8 bytes, so it is aligned in
//! practice.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use bytes::BufMut;

use super::attr_block;
use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::constants::{NDUSEROPT_SRCADDR, hexify, msg_type_name};
use crate::netlink::error::{Error, Result};
use crate::netlink::message::NlMsgHdr;
use crate::netlink::ndopt::NdOption;
use crate::netlink::parse::{
    ByteOrder, FromNetlink, ToNetlink, ensure_len, parse_i32, parse_u8, parse_u16, skip,
    take_bytes,
};
use crate::netlink::protocol::Protocol;

/// Size of the fixed nduseroptmsg header.
pub const NDUSEROPTMSG_SIZE: usize = 16;

/// A neighbor discovery option with the address of the router that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NdUserOptMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Address family of `src_addr`.
    pub family: u8,
    /// Declared option length in bytes. Must equal `options.len()` to encode.
    pub opts_len: u16,
    /// Interface the option arrived on.
    pub ifindex: i32,
    /// ICMPv6 type of the carrying packet.
    pub icmp_type: u8,
    /// ICMPv6 code of the carrying packet.
    pub icmp_code: u8,
    /// Raw option bytes, exactly `opts_len` long.
    pub options: Vec<u8>,
    /// Decoded option, if the bytes form one.
    pub option: Option<NdOption>,
    /// Source address (NDUSEROPT_SRCADDR).
    pub src_addr: IpAddr,
    /// Scope id for an IPv6 source: the receiving interface.
    pub scope_id: Option<u32>,
}

impl NdUserOptMessage {
    /// Check whether the source is an IPv6 link-local address.
    pub fn is_link_local_source(&self) -> bool {
        match self.src_addr {
            IpAddr::V6(addr) => addr.is_unicast_link_local(),
            IpAddr::V4(_) => false,
        }
    }
}

impl FromNetlink for NdUserOptMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        ensure_len(cursor, NDUSEROPTMSG_SIZE)?;
        let family = parse_u8(&mut cursor)?;
        skip(&mut cursor, 1)?;
        let opts_len = parse_u16(&mut cursor, order)?;
        let ifindex = parse_i32(&mut cursor, order)?;
        let icmp_type = parse_u8(&mut cursor)?;
        let icmp_code = parse_u8(&mut cursor)?;
        skip(&mut cursor, 6)?;

        if opts_len as usize > cursor.len() {
            return Err(Error::truncated(opts_len as usize, cursor.len()));
        }
        let options = take_bytes(&mut cursor, opts_len as usize)?.to_vec();
        let option = NdOption::parse(&options);

        let block = attr_block(&header, NDUSEROPTMSG_SIZE + opts_len as usize, cursor);
        let mut attrs = block;
        let attr = RawAttr::parse(&mut attrs, order)?;
        if attr.attr_type() != NDUSEROPT_SRCADDR || attr.is_empty() {
            return Err(Error::MissingAttribute("NDUSEROPT_SRCADDR"));
        }

        let (src_addr, scope_id) = if i32::from(family) == libc::AF_INET6 {
            let octets: [u8; 16] = attr.value().try_into().map_err(|_| {
                Error::InvalidAttribute(format!(
                    "NDUSEROPT_SRCADDR has {} bytes, want 16",
                    attr.value().len()
                ))
            })?;
            (IpAddr::V6(Ipv6Addr::from(octets)), Some(ifindex as u32))
        } else {
            let addr = attr.as_inet_addr().ok_or_else(|| {
                Error::InvalidAttribute("NDUSEROPT_SRCADDR is not an IP address".into())
            })?;
            (addr, None)
        };

        *input = &cursor[block.len()..];
        Ok(Self {
            header,
            family,
            opts_len,
            ifindex,
            icmp_type,
            icmp_code,
            options,
            option,
            src_addr,
            scope_id,
        })
    }
}

impl ToNetlink for NdUserOptMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        NDUSEROPTMSG_SIZE + self.options.len()
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        let order = builder.order();
        let mut fixed = Vec::with_capacity(NDUSEROPTMSG_SIZE);
        fixed.put_u8(self.family);
        fixed.put_u8(0);
        order.put_u16(&mut fixed, self.opts_len);
        order.put_i32(&mut fixed, self.ifindex);
        fixed.put_u8(self.icmp_type);
        fixed.put_u8(self.icmp_code);
        fixed.put_bytes(0, 6);
        builder.append_bytes(&fixed);
        builder.append_unaligned(&self.options);
    }

    fn attributes(&self, _order: ByteOrder) -> Result<Vec<RawAttr>> {
        if usize::from(self.opts_len) != self.options.len() {
            return Err(Error::InvalidMessage(format!(
                "opts_len {} does not match {} option bytes",
                self.opts_len,
                self.options.len()
            )));
        }
        Ok(vec![RawAttr::from_ip(NDUSEROPT_SRCADDR, self.src_addr)])
    }
}

impl fmt::Display for NdUserOptMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {}",
            msg_type_name(self.header.nlmsg_type, Protocol::Route),
            self.src_addr
        )?;
        if let Some(scope) = self.scope_id {
            write!(f, "%{scope}")?;
        }
        write!(
            f,
            " ifindex {} icmp {}/{}",
            self.ifindex, self.icmp_type, self.icmp_code
        )?;
        match &self.option {
            Some(opt) => write!(f, " {opt}"),
            None => write!(f, " options={}", hexify(&self.options)),
        }
    }
}
