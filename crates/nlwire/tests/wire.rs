//! Wire-format tests against the public API.
//!
//! These run entirely on in-memory buffers and need no privileges.

use std::net::{IpAddr, Ipv4Addr};

use nlwire::netlink::attr::{NLA_F_NESTED, RawAttr, nla_align};
use nlwire::netlink::constants::{
    CTA_IP_V4_DST, CTA_IP_V4_SRC, CTA_PROTO_DST_PORT, CTA_PROTO_NUM, CTA_PROTO_SRC_PORT,
    CTA_TIMEOUT, CTA_TUPLE_IP, CTA_TUPLE_ORIG, CTA_TUPLE_PROTO, aligned_length,
};
use nlwire::netlink::message::{NLM_F_ACK, NLM_F_REPLACE, NLM_F_REQUEST, NlMsgHdr, NlMsgType};
use nlwire::netlink::messages::{
    AddressMessage, ConntrackMessage, ConntrackTuple, IpProtocol, LinkMessage, NeighborMessage,
    NetlinkMessage, NetlinkMessages,
};
use nlwire::netlink::parse::{FromNetlink, ToNetlink, WireStruct};
use nlwire::netlink::scan::{AttrTable, find_next_attr_of_type};
use nlwire::netlink::types::addr::{IfAddrMsg, IfaAttr, ifa_flags};
use nlwire::{ByteOrder, Protocol};

fn patch_len(buf: &mut [u8], order: ByteOrder) {
    let len = buf.len() as u32;
    buf[..4].copy_from_slice(&order.u32_bytes(len));
}

mod conntrack {
    use super::*;

    fn sample() -> Vec<u8> {
        ConntrackMessage::new_ipv4_timeout_update_request(
            IpProtocol::Tcp,
            Ipv4Addr::new(192, 168, 80, 12),
            62449,
            Ipv4Addr::new(140, 112, 8, 116),
            433,
            120,
        )
        .unwrap()
    }

    #[test]
    fn test_timeout_update_end_to_end() {
        let bytes = sample();
        let mut input = bytes.as_slice();
        let header = NlMsgHdr::parse(&mut input, ByteOrder::Native).unwrap();
        let msg = ConntrackMessage::parse(header, &mut input, ByteOrder::Native).unwrap();
        assert!(input.is_empty());

        let orig = msg.tuple_orig.unwrap();
        assert_eq!(orig.src_ip, Ipv4Addr::new(192, 168, 80, 12));
        assert_eq!(orig.dst_ip, Ipv4Addr::new(140, 112, 8, 116));
        assert_eq!(orig.src_port, 62449);
        assert_eq!(orig.dst_port, 433);
        assert_eq!(orig.proto, IpProtocol::Tcp);
        assert_eq!(msg.timeout_sec, Some(120));
    }

    #[test]
    fn test_timeout_update_header() {
        let bytes = sample();
        let mut input = bytes.as_slice();
        let header = NlMsgHdr::parse(&mut input, ByteOrder::Native).unwrap();
        assert_eq!(header.nlmsg_len as usize, bytes.len());
        assert_eq!(header.nlmsg_type, 0x0100);
        assert_eq!(header.nlmsg_flags, NLM_F_REQUEST | NLM_F_ACK | NLM_F_REPLACE);
        assert_eq!(header.nlmsg_seq, 1);
        // nfgenmsg: AF_INET, version 0, res_id 0
        assert_eq!(&bytes[16..20], &[libc::AF_INET as u8, 0, 0, 0]);
    }

    #[test]
    fn test_zero_timeout_request_carries_timeout() {
        let bytes = ConntrackMessage::new_ipv4_timeout_update_request(
            IpProtocol::Tcp,
            Ipv4Addr::new(1, 2, 3, 4),
            1000,
            Ipv4Addr::new(5, 6, 7, 8),
            80,
            0,
        )
        .unwrap();
        let mut attrs = &bytes[20..];
        let timeout =
            find_next_attr_of_type(CTA_TIMEOUT, &mut attrs, ByteOrder::Native).unwrap();
        assert_eq!(timeout.as_be32(), Some(0));

        let mut input = bytes.as_slice();
        let msg = NetlinkMessage::parse(&mut input, Protocol::Netfilter, ByteOrder::Native)
            .unwrap();
        assert!(matches!(msg, NetlinkMessage::Conntrack(m) if m.timeout_sec == Some(0)));
    }

    #[test]
    fn test_dispatch_on_netfilter() {
        let bytes = sample();
        let msgs: Vec<_> = NetlinkMessages::new(&bytes, Protocol::Netfilter, ByteOrder::Native)
            .collect::<nlwire::Result<_>>()
            .unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(&msgs[0], NetlinkMessage::Conntrack(m) if m.timeout_sec == Some(120)));
    }

    fn tuple_attr(src_port: u16, with_dst_ip: bool) -> RawAttr {
        let mut ip_children = vec![RawAttr::new(CTA_IP_V4_SRC, [10, 0, 0, 1]).unwrap()];
        if with_dst_ip {
            ip_children.push(RawAttr::new(CTA_IP_V4_DST, [10, 0, 0, 2]).unwrap());
        }
        let ip = RawAttr::nested(CTA_TUPLE_IP, &ip_children, ByteOrder::Native).unwrap();
        let proto = RawAttr::nested(
            CTA_TUPLE_PROTO,
            &[
                RawAttr::from_u8(CTA_PROTO_NUM, libc::IPPROTO_UDP as u8),
                RawAttr::from_be16(CTA_PROTO_SRC_PORT, src_port),
                RawAttr::from_be16(CTA_PROTO_DST_PORT, 53),
            ],
            ByteOrder::Native,
        )
        .unwrap();
        RawAttr::nested(CTA_TUPLE_ORIG, &[ip, proto], ByteOrder::Native).unwrap()
    }

    #[test]
    fn test_tuple_all_or_nothing() {
        let full = ConntrackTuple::from_attr(&tuple_attr(5353, true)).unwrap();
        assert_eq!(full.proto, IpProtocol::Udp);
        assert_eq!(full.dst_port, 53);

        // IP group valid, proto group present but source port zero.
        assert_eq!(ConntrackTuple::from_attr(&tuple_attr(0, true)), None);
        // Destination address missing.
        assert_eq!(ConntrackTuple::from_attr(&tuple_attr(5353, false)), None);
    }

    #[test]
    fn test_zero_port_tuple_leaves_rest_of_message() {
        let mut bytes = ConntrackMessage::new_ipv4_timeout_update_request(
            IpProtocol::Udp,
            Ipv4Addr::new(10, 0, 0, 1),
            5353,
            Ipv4Addr::new(10, 0, 0, 2),
            53,
            30,
        )
        .unwrap();
        // Replace the attributes with a zero-port tuple and the same timeout.
        bytes.truncate(20);
        tuple_attr(0, true).pack(&mut bytes, ByteOrder::Native);
        RawAttr::from_be32(CTA_TIMEOUT, 30).pack(&mut bytes, ByteOrder::Native);
        patch_len(&mut bytes, ByteOrder::Native);

        let mut input = bytes.as_slice();
        let msg = NetlinkMessage::parse(&mut input, Protocol::Netfilter, ByteOrder::Native)
            .unwrap();
        let NetlinkMessage::Conntrack(msg) = msg else {
            panic!("expected conntrack message");
        };
        assert_eq!(msg.tuple_orig, None);
        assert_eq!(msg.timeout_sec, Some(30));
    }

    #[test]
    fn test_nested_flag_is_set_on_tuples() {
        let attr = tuple_attr(1, true);
        assert_eq!(attr.attr_type(), CTA_TUPLE_ORIG | NLA_F_NESTED);
        assert!(attr.is_nested());
        let children = AttrTable::from_nested(&attr);
        assert!(children.contains(CTA_TUPLE_IP | NLA_F_NESTED));
        assert!(children.contains(CTA_TUPLE_PROTO | NLA_F_NESTED));
    }
}

mod alignment {
    use super::*;

    #[test]
    fn test_aligned_length_property() {
        assert_eq!(aligned_length(0), 0);
        for n in 0..1024i64 {
            let aligned = aligned_length(n);
            if n % 4 == 0 {
                assert_eq!(aligned, n as usize);
            } else {
                let pad = aligned - n as usize;
                assert!((1..=3).contains(&pad), "n={n} aligned={aligned}");
            }
            assert_eq!(aligned % 4, 0);
            assert_eq!(aligned, nla_align(n as usize));
        }
        assert_eq!(aligned_length(-7), 0);
    }

    #[test]
    fn test_attribute_padding_is_zeroed() {
        for len in 0..9 {
            let value = vec![0xffu8; len];
            let attr = RawAttr::new(7, value).unwrap();
            let bytes = attr.to_bytes(ByteOrder::Little);
            assert_eq!(bytes.len(), nla_align(4 + len));
            assert!(bytes[4 + len..].iter().all(|&b| b == 0));
        }
    }
}

mod truncation {
    use super::*;

    #[test]
    fn test_every_prefix_of_a_message_fails_cleanly() {
        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        let msg = AddressMessage::new_address_request(1, ip, 64, 0, 0, 2, 60, 120).unwrap();
        let bytes = msg.to_bytes(ByteOrder::Little).unwrap();

        for cut in 0..bytes.len() {
            let data = &bytes[..cut];
            let mut input = data;
            let result = NetlinkMessage::parse(&mut input, Protocol::Route, ByteOrder::Little);
            assert!(result.is_err(), "prefix of {cut} bytes decoded");
            assert!(input.len() <= cut);
        }

        let mut input = bytes.as_slice();
        assert!(NetlinkMessage::parse(&mut input, Protocol::Route, ByteOrder::Little).is_ok());
        assert!(input.is_empty());
    }

    #[test]
    fn test_truncated_attribute_leaves_cursor() {
        let attr = RawAttr::from_str(3, "enp0s31f6").unwrap();
        let bytes = attr.to_bytes(ByteOrder::Little);
        for cut in 0..bytes.len() {
            let mut input = &bytes[..cut];
            assert!(RawAttr::parse(&mut input, ByteOrder::Little).is_err());
            assert_eq!(input.len(), cut);
        }
    }

    #[test]
    fn test_struct_parse_needs_full_size() {
        let mut bytes = Vec::new();
        IfAddrMsg::new()
            .with_index(9)
            .pack(&mut bytes, ByteOrder::Little);
        for cut in 0..IfAddrMsg::SIZE {
            let mut input = &bytes[..cut];
            let err = IfAddrMsg::parse(&mut input, ByteOrder::Little).unwrap_err();
            assert!(err.is_truncated());
        }
    }
}

mod scanner {
    use super::*;

    fn block() -> Vec<u8> {
        let mut buf = Vec::new();
        RawAttr::from_u32(1, 0xaaaa, ByteOrder::Little).pack(&mut buf, ByteOrder::Little);
        RawAttr::from_str(2, "bb").unwrap().pack(&mut buf, ByteOrder::Little);
        RawAttr::from_u16(3, 0xcc, ByteOrder::Little).pack(&mut buf, ByteOrder::Little);
        buf
    }

    #[test]
    fn test_skip_to_middle_attribute() {
        let data = block();
        let mut input = data.as_slice();
        let b = find_next_attr_of_type(2, &mut input, ByteOrder::Little).unwrap();
        assert_eq!(b.as_string().as_deref(), Some("bb"));
        // Positioned at C's header.
        let c = RawAttr::peek(input, ByteOrder::Little).unwrap();
        assert_eq!(c.nla_type, 3);
        assert_eq!(input.len(), 8);
    }

    #[test]
    fn test_absent_type_consumes_block() {
        let data = block();
        let mut input = data.as_slice();
        assert!(find_next_attr_of_type(4, &mut input, ByteOrder::Little).is_none());
        assert!(input.is_empty());
    }

    #[test]
    fn test_table_agrees_with_scanner() {
        let data = block();
        let table = AttrTable::parse(&data, ByteOrder::Little);
        for kind in 1..=4 {
            let mut input = data.as_slice();
            let scanned = find_next_attr_of_type(kind, &mut input, ByteOrder::Little);
            assert_eq!(table.get(kind), scanned.as_ref());
        }
    }
}

mod address {
    use super::*;

    fn address_with_flags(header_flags: u8, ifa_flags: Option<u32>) -> Vec<u8> {
        let mut buf = Vec::new();
        NlMsgHdr::new(NlMsgType::RTM_NEWADDR, 0).pack(&mut buf, ByteOrder::Little);
        IfAddrMsg::new()
            .with_family(libc::AF_INET as u8)
            .with_prefixlen(24)
            .with_flags(header_flags)
            .with_index(3)
            .pack(&mut buf, ByteOrder::Little);
        RawAttr::from_ip(IfaAttr::Address as u16, "192.0.2.7".parse().unwrap())
            .pack(&mut buf, ByteOrder::Little);
        if let Some(flags) = ifa_flags {
            RawAttr::from_u32(IfaAttr::Flags as u16, flags, ByteOrder::Little)
                .pack(&mut buf, ByteOrder::Little);
        }
        patch_len(&mut buf, ByteOrder::Little);
        buf
    }

    #[test]
    fn test_flags_attribute_wins() {
        let data = address_with_flags(0x01, Some(ifa_flags::MANAGETEMPADDR));
        let mut input = data.as_slice();
        let msg = NetlinkMessage::parse(&mut input, Protocol::Route, ByteOrder::Little).unwrap();
        let NetlinkMessage::Address(addr) = msg else {
            panic!("expected address message");
        };
        assert_eq!(addr.flags, 0x0100);
        assert_eq!(addr.ifaddr.ifa_flags, 0x01);
    }

    #[test]
    fn test_missing_flags_attribute_fails() {
        let data = address_with_flags(0x80, None);
        let mut input = data.as_slice();
        let err = NetlinkMessage::parse(&mut input, Protocol::Route, ByteOrder::Little)
            .unwrap_err();
        assert!(err.is_invalid());
        // The dispatcher still moved past the message.
        assert!(input.is_empty());
    }

    #[test]
    fn test_big_endian_round_trip() {
        let ip: IpAddr = "198.51.100.4".parse().unwrap();
        let msg = AddressMessage::new_address_request(
            77,
            ip,
            30,
            ifa_flags::NODAD,
            0,
            0x0102_0304,
            u32::MAX,
            u32::MAX,
        )
        .unwrap();
        let bytes = msg.to_bytes(ByteOrder::Big).unwrap();
        assert_eq!(&bytes[..4], &(bytes.len() as u32).to_be_bytes());

        let mut input = bytes.as_slice();
        let header = NlMsgHdr::parse(&mut input, ByteOrder::Big).unwrap();
        let parsed = AddressMessage::parse(header, &mut input, ByteOrder::Big).unwrap();

        let mut expected = msg;
        expected.header.nlmsg_len = bytes.len() as u32;
        assert_eq!(parsed, expected);
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn test_mixed_buffer() {
        let mut buf = LinkMessage::set_link_state_request(1, 2, true)
            .to_bytes(ByteOrder::Little)
            .unwrap();
        buf.extend(
            NeighborMessage::get_neighbors_request(2)
                .to_bytes(ByteOrder::Little)
                .unwrap(),
        );
        let mut done = Vec::new();
        NlMsgHdr::new(NlMsgType::DONE, 0).pack(&mut done, ByteOrder::Little);
        buf.extend(done);
        // A trailing partial header ends the walk with one error.
        buf.extend([0u8; 6]);

        let mut iter = NetlinkMessages::new(&buf, Protocol::Route, ByteOrder::Little);
        assert!(matches!(iter.next(), Some(Ok(NetlinkMessage::Link(_)))));
        assert!(matches!(iter.next(), Some(Ok(NetlinkMessage::Neighbor(_)))));
        assert!(matches!(iter.next(), Some(Ok(NetlinkMessage::Done(_)))));
        assert!(matches!(iter.next(), Some(Err(e)) if e.is_truncated()));
        assert!(iter.next().is_none());
        assert_eq!(iter.remaining().len(), 6);
    }

    #[test]
    fn test_display_is_one_line() {
        let buf = LinkMessage::set_link_address_request(5, 4, [2, 0, 0, 0, 0, 1])
            .to_bytes(ByteOrder::Little)
            .unwrap();
        let mut input = buf.as_slice();
        let msg = NetlinkMessage::parse(&mut input, Protocol::Route, ByteOrder::Little).unwrap();
        let text = msg.to_string();
        assert!(text.starts_with("RTM_NEWLINK 4:"));
        assert!(text.contains("link/ether 02:00:00:00:00:01"));
        assert!(!text.contains('\n'));
    }
}
