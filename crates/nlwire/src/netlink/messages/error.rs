//! NLMSG_ERROR messages (errors and ACKs).

use std::fmt;

use crate::netlink::attr::RawAttr;
use crate::netlink::builder::MessageBuilder;
use crate::netlink::error::{Error, Result};
use crate::netlink::message::{NlMsgErr, NlMsgHdr, NlMsgType};
use crate::netlink::parse::{ByteOrder, FromNetlink, ToNetlink, WireStruct};

/// A decoded NLMSG_ERROR message.
///
/// Extended ACK attributes that may follow the echoed header are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorMessage {
    /// Outer header.
    pub header: NlMsgHdr,
    /// Error code and echoed request header.
    pub err: NlMsgErr,
}

impl ErrorMessage {
    /// Build an ACK (or error, for a negative `error`) for `request`.
    pub fn new(request: NlMsgHdr, error: i32) -> Self {
        Self {
            header: NlMsgHdr::new(NlMsgType::ERROR, 0).with_seq(request.nlmsg_seq),
            err: NlMsgErr {
                error,
                msg: request,
            },
        }
    }

    /// Check if this is a plain ACK.
    pub fn is_ack(&self) -> bool {
        self.err.is_ack()
    }

    /// Positive errno, or 0 for an ACK.
    pub fn errno(&self) -> i32 {
        self.err.error.saturating_abs()
    }

    /// `Ok(())` for an ACK, [`Error::Kernel`] otherwise.
    pub fn into_result(self) -> Result<()> {
        if self.err.is_ack() {
            Ok(())
        } else {
            Err(Error::from_errno(self.err.error))
        }
    }
}

impl FromNetlink for ErrorMessage {
    fn parse(header: NlMsgHdr, input: &mut &[u8], order: ByteOrder) -> Result<Self> {
        let mut cursor = *input;
        let err = NlMsgErr::parse(&mut cursor, order)?;
        *input = cursor;
        Ok(Self { header, err })
    }
}

impl ToNetlink for ErrorMessage {
    fn header(&self) -> NlMsgHdr {
        self.header
    }

    fn fixed_len(&self) -> usize {
        NlMsgErr::SIZE
    }

    fn write_fixed(&self, builder: &mut MessageBuilder) {
        builder.append_struct(&self.err);
    }

    fn attributes(&self, _order: ByteOrder) -> Result<Vec<RawAttr>> {
        Ok(Vec::new())
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ack() {
            write!(f, "ACK seq={}", self.err.msg.nlmsg_seq)
        } else {
            write!(
                f,
                "ERROR errno={} ({}) seq={}",
                self.errno(),
                std::io::Error::from_raw_os_error(self.errno()),
                self.err.msg.nlmsg_seq
            )
        }
    }
}
