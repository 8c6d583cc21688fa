//! Netlink message fixtures for testing.
//!
//! Each fixture is a complete message (nlmsghdr included) in little-endian
//! host order, as a kernel on x86_64 or aarch64 would send it.
//!
//! The fixtures are provided as functions that return Vec<u8> so each test
//! gets its own copy to patch.

/// Link message for wlan0, as seen in a link dump.
pub fn newlink_wlan0() -> Vec<u8> {
    vec![
        // nlmsghdr: len=64, type=RTM_NEWLINK, flags=NLM_F_MULTI, seq=1, pid=0
        0x40, 0x00, 0x00, 0x00, // len = 64
        0x10, 0x00, // type = RTM_NEWLINK (16)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // ifinfomsg: family=0, type=1 (ARPHRD_ETHER), index=3, flags=0x1043
        0x00, 0x00, // family, pad
        0x01, 0x00, // type = ARPHRD_ETHER
        0x03, 0x00, 0x00, 0x00, // index = 3
        0x43, 0x10, 0x00, 0x00, // flags = UP|BROADCAST|RUNNING|MULTICAST
        0x00, 0x00, 0x00, 0x00, // change = 0
        // IFLA_IFNAME = "wlan0"
        0x0a, 0x00, // len = 10
        0x03, 0x00, // type = IFLA_IFNAME (3)
        b'w', b'l', b'a', b'n', b'0', 0x00, 0x00, 0x00, // "wlan0\0" + padding
        // IFLA_MTU = 1500
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = IFLA_MTU (4)
        0xdc, 0x05, 0x00, 0x00, // mtu = 1500
        // IFLA_ADDRESS = 02:00:5e:10:20:30
        0x0a, 0x00, // len = 10
        0x01, 0x00, // type = IFLA_ADDRESS (1)
        0x02, 0x00, 0x5e, 0x10, 0x20, 0x30, 0x00, 0x00, // mac + padding
    ]
}

/// Address message for fe80::1/64 on ifindex 2 with infinite lifetimes.
pub fn newaddr_v6_link_local() -> Vec<u8> {
    vec![
        // nlmsghdr: len=72, type=RTM_NEWADDR, flags=NLM_F_MULTI, seq=1, pid=0
        0x48, 0x00, 0x00, 0x00, // len = 72
        0x14, 0x00, // type = RTM_NEWADDR (20)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // ifaddrmsg
        0x0a, // family = AF_INET6
        0x40, // prefixlen = 64
        0x80, // flags = IFA_F_PERMANENT
        0xfd, // scope = RT_SCOPE_LINK (253)
        0x02, 0x00, 0x00, 0x00, // index = 2
        // IFA_ADDRESS = fe80::1
        0x14, 0x00, // len = 20
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // fe80:: (first 8 bytes)
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // ::1 (last 8 bytes)
        // IFA_CACHEINFO
        0x14, 0x00, // len = 20
        0x06, 0x00, // type = IFA_CACHEINFO (6)
        0xff, 0xff, 0xff, 0xff, // ifa_prefered = forever
        0xff, 0xff, 0xff, 0xff, // ifa_valid = forever
        0xf4, 0x01, 0x00, 0x00, // cstamp = 500
        0xf4, 0x01, 0x00, 0x00, // tstamp = 500
        // IFA_FLAGS = IFA_F_PERMANENT
        0x08, 0x00, // len = 8
        0x08, 0x00, // type = IFA_FLAGS (8)
        0x80, 0x00, 0x00, 0x00, // flags = 0x80
    ]
}

/// Address message for 192.168.1.10/24 whose IFA_FLAGS (0x100) disagrees
/// with the header flags byte (0x01).
pub fn newaddr_v4_flags_override() -> Vec<u8> {
    vec![
        // nlmsghdr: len=40, type=RTM_NEWADDR, flags=NLM_F_MULTI, seq=1, pid=0
        0x28, 0x00, 0x00, 0x00, // len = 40
        0x14, 0x00, // type = RTM_NEWADDR (20)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // ifaddrmsg
        0x02, // family = AF_INET
        0x18, // prefixlen = 24
        0x01, // flags = IFA_F_SECONDARY
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x03, 0x00, 0x00, 0x00, // index = 3
        // IFA_ADDRESS = 192.168.1.10
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0xc0, 0xa8, 0x01, 0x0a, // 192.168.1.10
        // IFA_FLAGS = IFA_F_MANAGETEMPADDR
        0x08, 0x00, // len = 8
        0x08, 0x00, // type = IFA_FLAGS (8)
        0x00, 0x01, 0x00, 0x00, // flags = 0x100
    ]
}

/// Address message for 192.168.1.10/24 without IFA_FLAGS.
pub fn newaddr_v4_without_flags() -> Vec<u8> {
    vec![
        // nlmsghdr: len=44, type=RTM_NEWADDR, flags=NLM_F_MULTI, seq=1, pid=0
        0x2c, 0x00, 0x00, 0x00, // len = 44
        0x14, 0x00, // type = RTM_NEWADDR (20)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // ifaddrmsg
        0x02, // family = AF_INET
        0x18, // prefixlen = 24
        0x01, // flags = IFA_F_SECONDARY
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x03, 0x00, 0x00, 0x00, // index = 3
        // IFA_ADDRESS = 192.168.1.10
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = IFA_ADDRESS (1)
        0xc0, 0xa8, 0x01, 0x0a, // 192.168.1.10
        // IFA_LABEL = "eth0"
        0x09, 0x00, // len = 9
        0x03, 0x00, // type = IFA_LABEL (3)
        b'e', b't', b'h', b'0', 0x00, 0x00, 0x00, 0x00, // "eth0\0" + padding
    ]
}

/// Route message for the IPv4 default route via 192.168.1.1 on ifindex 2.
pub fn newroute_default_v4() -> Vec<u8> {
    vec![
        // nlmsghdr: len=52, type=RTM_NEWROUTE, flags=NLM_F_MULTI, seq=1, pid=0
        0x34, 0x00, 0x00, 0x00, // len = 52
        0x18, 0x00, // type = RTM_NEWROUTE (24)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // rtmsg
        0x02, // family = AF_INET
        0x00, // dst_len = 0
        0x00, // src_len = 0
        0x00, // tos = 0
        0xfe, // table = RT_TABLE_MAIN (254)
        0x10, // protocol = RTPROT_DHCP (16)
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x01, // type = RTN_UNICAST
        0x00, 0x00, 0x00, 0x00, // flags = 0
        // RTA_TABLE = 254
        0x08, 0x00, // len = 8
        0x0f, 0x00, // type = RTA_TABLE (15)
        0xfe, 0x00, 0x00, 0x00, // table = 254
        // RTA_GATEWAY = 192.168.1.1
        0x08, 0x00, // len = 8
        0x05, 0x00, // type = RTA_GATEWAY (5)
        0xc0, 0xa8, 0x01, 0x01, // 192.168.1.1
        // RTA_OIF = 2
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = RTA_OIF (4)
        0x02, 0x00, 0x00, 0x00, // oif = 2
    ]
}

/// Neighbor message for a reachable ARP entry.
pub fn newneigh_v4_reachable() -> Vec<u8> {
    vec![
        // nlmsghdr: len=76, type=RTM_NEWNEIGH, flags=NLM_F_MULTI, seq=1, pid=0
        0x4c, 0x00, 0x00, 0x00, // len = 76
        0x1c, 0x00, // type = RTM_NEWNEIGH (28)
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // ndmsg
        0x02, // family = AF_INET
        0x00, // pad1
        0x00, 0x00, // pad2
        0x02, 0x00, 0x00, 0x00, // ifindex = 2
        0x02, 0x00, // state = NUD_REACHABLE
        0x00, // flags = 0
        0x01, // type = RTN_UNICAST
        // NDA_DST = 192.168.1.1
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = NDA_DST (1)
        0xc0, 0xa8, 0x01, 0x01, // 192.168.1.1
        // NDA_LLADDR = 00:1a:11:aa:bb:cc
        0x0a, 0x00, // len = 10
        0x02, 0x00, // type = NDA_LLADDR (2)
        0x00, 0x1a, 0x11, 0xaa, 0xbb, 0xcc, 0x00, 0x00, // mac + padding
        // NDA_CACHEINFO
        0x14, 0x00, // len = 20
        0x03, 0x00, // type = NDA_CACHEINFO (3)
        0x10, 0x27, 0x00, 0x00, // confirmed = 10000
        0x20, 0x4e, 0x00, 0x00, // used = 20000
        0x10, 0x27, 0x00, 0x00, // updated = 10000
        0x01, 0x00, 0x00, 0x00, // refcnt = 1
        // NDA_PROBES = 1
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = NDA_PROBES (4)
        0x01, 0x00, 0x00, 0x00, // probes = 1
    ]
}

/// RTM_NEWNDUSEROPT carrying a PREF64 option from router fe80::1 on ifindex 2.
pub fn nduseropt_pref64() -> Vec<u8> {
    vec![
        // nlmsghdr: len=68, type=RTM_NEWNDUSEROPT, flags=0, seq=0, pid=0
        0x44, 0x00, 0x00, 0x00, // len = 68
        0x44, 0x00, // type = RTM_NEWNDUSEROPT (68)
        0x00, 0x00, // flags = 0
        0x00, 0x00, 0x00, 0x00, // seq = 0
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // nduseroptmsg
        0x0a, // family = AF_INET6
        0x00, // pad1
        0x10, 0x00, // opts_len = 16
        0x02, 0x00, 0x00, 0x00, // ifindex = 2
        0x86, // icmp_type = 134 (router advertisement)
        0x00, // icmp_code = 0
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // pad2, pad3
        // ND option: PREF64, length = 2 (16 bytes)
        0x26, 0x02, // type = 38, length = 2
        0x0e, 0x10, // scaled lifetime = 1800s, PLC = 0 (/96)
        0x00, 0x64, 0xff, 0x9b, 0x00, 0x00, 0x00, 0x00, // 64:ff9b::
        0x00, 0x00, 0x00, 0x00, // rest of the /96 prefix
        // NDUSEROPT_SRCADDR = fe80::1
        0x14, 0x00, // len = 20
        0x01, 0x00, // type = NDUSEROPT_SRCADDR (1)
        0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // fe80:: (first 8 bytes)
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // ::1 (last 8 bytes)
    ]
}

/// ctnetlink IPCTNL_MSG_CT_NEW event for an established TCP connection
/// 10.0.0.5:40000 -> 93.184.216.34:443.
pub fn ctnetlink_new_tcp() -> Vec<u8> {
    vec![
        // nlmsghdr: len=172, type=IPCTNL_MSG_CT_NEW, flags=NLM_F_CREATE|NLM_F_EXCL
        0xac, 0x00, 0x00, 0x00, // len = 172
        0x00, 0x01, // type = (NFNL_SUBSYS_CTNETLINK << 8) | IPCTNL_MSG_CT_NEW
        0x00, 0x06, // flags = NLM_F_CREATE | NLM_F_EXCL
        0x00, 0x00, 0x00, 0x00, // seq = 0
        0x00, 0x00, 0x00, 0x00, // pid = 0
        // nfgenmsg
        0x02, // family = AF_INET
        0x00, // version = NFNETLINK_V0
        0x00, 0x00, // res_id = 0 (big-endian)
        // CTA_TUPLE_ORIG (nested)
        0x34, 0x00, // len = 52
        0x01, 0x80, // type = CTA_TUPLE_ORIG | NLA_F_NESTED
        // CTA_TUPLE_IP (nested)
        0x14, 0x00, // len = 20
        0x01, 0x80, // type = CTA_TUPLE_IP | NLA_F_NESTED
        0x08, 0x00, 0x01, 0x00, // CTA_IP_V4_SRC
        0x0a, 0x00, 0x00, 0x05, // 10.0.0.5
        0x08, 0x00, 0x02, 0x00, // CTA_IP_V4_DST
        0x5d, 0xb8, 0xd8, 0x22, // 93.184.216.34
        // CTA_TUPLE_PROTO (nested)
        0x1c, 0x00, // len = 28
        0x02, 0x80, // type = CTA_TUPLE_PROTO | NLA_F_NESTED
        0x05, 0x00, 0x01, 0x00, // CTA_PROTO_NUM
        0x06, 0x00, 0x00, 0x00, // IPPROTO_TCP + padding
        0x06, 0x00, 0x02, 0x00, // CTA_PROTO_SRC_PORT
        0x9c, 0x40, 0x00, 0x00, // 40000 (big-endian) + padding
        0x06, 0x00, 0x03, 0x00, // CTA_PROTO_DST_PORT
        0x01, 0xbb, 0x00, 0x00, // 443 (big-endian) + padding
        // CTA_TUPLE_REPLY (nested)
        0x34, 0x00, // len = 52
        0x02, 0x80, // type = CTA_TUPLE_REPLY | NLA_F_NESTED
        0x14, 0x00, // len = 20
        0x01, 0x80, // type = CTA_TUPLE_IP | NLA_F_NESTED
        0x08, 0x00, 0x01, 0x00, // CTA_IP_V4_SRC
        0x5d, 0xb8, 0xd8, 0x22, // 93.184.216.34
        0x08, 0x00, 0x02, 0x00, // CTA_IP_V4_DST
        0x0a, 0x00, 0x00, 0x05, // 10.0.0.5
        0x1c, 0x00, // len = 28
        0x02, 0x80, // type = CTA_TUPLE_PROTO | NLA_F_NESTED
        0x05, 0x00, 0x01, 0x00, // CTA_PROTO_NUM
        0x06, 0x00, 0x00, 0x00, // IPPROTO_TCP + padding
        0x06, 0x00, 0x02, 0x00, // CTA_PROTO_SRC_PORT
        0x01, 0xbb, 0x00, 0x00, // 443 + padding
        0x06, 0x00, 0x03, 0x00, // CTA_PROTO_DST_PORT
        0x9c, 0x40, 0x00, 0x00, // 40000 + padding
        // CTA_STATUS = SEEN_REPLY|ASSURED|CONFIRMED
        0x08, 0x00, 0x03, 0x00, // len = 8, type = CTA_STATUS (3)
        0x00, 0x00, 0x00, 0x0e, // 0xe (big-endian)
        // CTA_PROTOINFO (nested)
        0x10, 0x00, // len = 16
        0x04, 0x80, // type = CTA_PROTOINFO | NLA_F_NESTED
        0x0c, 0x00, // len = 12
        0x01, 0x80, // type = CTA_PROTOINFO_TCP | NLA_F_NESTED
        0x05, 0x00, 0x01, 0x00, // CTA_PROTOINFO_TCP_STATE
        0x03, 0x00, 0x00, 0x00, // TCP_CONNTRACK_ESTABLISHED + padding
        // CTA_TIMEOUT = 431999
        0x08, 0x00, 0x07, 0x00, // len = 8, type = CTA_TIMEOUT (7)
        0x00, 0x06, 0x97, 0x7f, // 431999 (big-endian)
        // CTA_MARK = 0
        0x08, 0x00, 0x08, 0x00, // len = 8, type = CTA_MARK (8)
        0x00, 0x00, 0x00, 0x00, // 0
        // CTA_ID
        0x08, 0x00, 0x0c, 0x00, // len = 8, type = CTA_ID (12)
        0x12, 0x34, 0x56, 0x78, // 0x12345678 (big-endian)
    ]
}

/// NLMSG_DONE closing a dump, with the usual zero i32 payload.
pub fn done() -> Vec<u8> {
    vec![
        0x14, 0x00, 0x00, 0x00, // len = 20
        0x03, 0x00, // type = NLMSG_DONE
        0x02, 0x00, // flags = NLM_F_MULTI
        0x01, 0x00, 0x00, 0x00, // seq = 1
        0x00, 0x00, 0x00, 0x00, // pid = 0
        0x00, 0x00, 0x00, 0x00, // payload = 0
    ]
}

/// A receive buffer holding a link, an address, a route and NLMSG_DONE.
pub fn route_dump() -> Vec<u8> {
    [
        newlink_wlan0(),
        newaddr_v4_flags_override(),
        newroute_default_v4(),
        done(),
    ]
    .concat()
}
