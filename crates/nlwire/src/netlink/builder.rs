//! Message builder for constructing netlink messages.

use super::attr::RawAttr;
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};
use super::parse::{ByteOrder, WireStruct};

/// Builder for constructing netlink messages.
///
/// All host-order fields (header, struct fields, attribute headers) are
/// written in the builder's byte order. Padding is always zero.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl MessageBuilder {
    /// Create a new message builder with the given type and flags.
    pub fn new(msg_type: u16, flags: u16, order: ByteOrder) -> Self {
        Self::with_header(NlMsgHdr::new(msg_type, flags), order, NLMSG_HDRLEN)
    }

    /// Create a builder from an existing header, reserving `capacity` bytes.
    pub fn with_header(header: NlMsgHdr, order: ByteOrder, capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(NLMSG_HDRLEN));
        header.pack(&mut buf, order);
        Self { buf, order }
    }

    /// Byte order used for host-order fields.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Get the current message length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the message is empty (header only).
    pub fn is_empty(&self) -> bool {
        self.buf.len() == NLMSG_HDRLEN
    }

    /// Append raw bytes to the message (with alignment padding).
    pub fn append_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        let aligned = nlmsg_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    /// Append raw bytes with no alignment padding.
    ///
    /// The next append starts right after `data`; [`finish`](Self::finish)
    /// still pads the message as a whole.
    pub fn append_unaligned(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Append a fixed-size struct to the message.
    pub fn append_struct<T: WireStruct>(&mut self, value: &T) {
        value.pack(&mut self.buf, self.order);
        let aligned = nlmsg_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    /// Append an attribute (header, value, zero padding).
    pub fn append_attr(&mut self, attr: &RawAttr) {
        attr.pack(&mut self.buf, self.order);
    }

    /// Set the sequence number.
    pub fn set_seq(&mut self, seq: u32) {
        self.buf[8..12].copy_from_slice(&self.order.u32_bytes(seq));
    }

    /// Set the port ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.buf[12..16].copy_from_slice(&self.order.u32_bytes(pid));
    }

    /// Pad to the message alignment and patch `nlmsg_len`.
    pub fn finish(mut self) -> Vec<u8> {
        let aligned = nlmsg_align(self.buf.len());
        self.buf.resize(aligned, 0);
        let len = self.buf.len() as u32;
        self.buf[0..4].copy_from_slice(&self.order.u32_bytes(len));
        self.buf
    }

    /// Get the current buffer for inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::NLA_HDRLEN;
    use crate::netlink::message::{NLM_F_ACK, NLM_F_REQUEST};
    use crate::netlink::types::nfgen::NfGenMsg;

    #[test]
    fn test_simple_message() {
        let msg = MessageBuilder::new(16, NLM_F_REQUEST, ByteOrder::Little).finish();
        assert_eq!(msg.len(), NLMSG_HDRLEN);

        let mut input = msg.as_slice();
        let header = NlMsgHdr::parse(&mut input, ByteOrder::Little).unwrap();
        assert_eq!(header.nlmsg_len as usize, NLMSG_HDRLEN);
        assert_eq!(header.nlmsg_type, 16);
        assert_eq!(header.nlmsg_flags, NLM_F_REQUEST);
    }

    #[test]
    fn test_attribute_length_patched() {
        let mut builder = MessageBuilder::new(16, NLM_F_REQUEST | NLM_F_ACK, ByteOrder::Big);
        builder.append_attr(&RawAttr::from_u8(1, 0x12));
        builder.set_seq(9);
        let msg = builder.finish();

        assert_eq!(msg.len(), NLMSG_HDRLEN + NLA_HDRLEN + 4);
        assert_eq!(&msg[0..4], &[0, 0, 0, 24]);
        assert_eq!(&msg[8..12], &[0, 0, 0, 9]);
        assert_eq!(&msg[16..], &[0, 5, 0, 1, 0x12, 0, 0, 0]);
    }

    #[test]
    fn test_struct_and_bytes() {
        let mut builder = MessageBuilder::new(0x100, NLM_F_REQUEST, ByteOrder::Little);
        builder.append_struct(&NfGenMsg::new(libc::AF_INET as u8));
        builder.append_bytes(&[1, 2, 3]);
        builder.set_pid(42);
        assert!(!builder.is_empty());
        let msg = builder.finish();
        assert_eq!(msg.len(), 16 + 4 + 4);
        assert_eq!(&msg[16..20], &[2, 0, 0, 0]);
        assert_eq!(&msg[20..], &[1, 2, 3, 0]);
        assert_eq!(&msg[12..16], &[42, 0, 0, 0]);
    }

    #[test]
    fn test_unaligned_bytes_padded_at_finish() {
        let mut builder = MessageBuilder::new(68, 0, ByteOrder::Little);
        builder.append_unaligned(&[1, 2, 3, 4, 5, 6]);
        builder.append_attr(&RawAttr::from_u8(1, 9));
        let msg = builder.finish();
        assert_eq!(msg.len(), 16 + 6 + 8 + 2);
        assert_eq!(&msg[0..4], &[32, 0, 0, 0]);
        assert_eq!(&msg[22..26], &[5, 0, 1, 0]);
        assert_eq!(&msg[30..], &[0, 0]);
    }
}
