//! Attribute lookup over a block of consecutive attributes.
//!
//! [`find_next_attr_of_type`] is the single forward scan: it walks from the
//! current position, skipping unrelated attributes, and consumes the first
//! match. [`AttrTable`] decodes a whole block once and answers every lookup
//! the same way the scan would from the start of that block.

use std::collections::HashMap;

use tracing::trace;

use super::attr::RawAttr;
use super::parse::ByteOrder;

/// Scan forward for the first attribute whose full type field equals
/// `attr_type` (flag bits included) and consume it.
///
/// Non-matching attributes are skipped by their aligned length. The scan stops
/// with `None` on a malformed header, or when an attribute's aligned length
/// runs past the end of `input`; in that case `input` is left at the offending
/// header.
pub fn find_next_attr_of_type(
    attr_type: u16,
    input: &mut &[u8],
    order: ByteOrder,
) -> Option<RawAttr> {
    while !input.is_empty() {
        let Some(hdr) = RawAttr::peek(input, order) else {
            trace!(remaining = input.len(), "attribute scan stopped on malformed header");
            return None;
        };
        if hdr.nla_type == attr_type {
            return RawAttr::parse(input, order).ok();
        }
        let skip = hdr.aligned_len();
        if input.len() < skip {
            trace!(
                nla_type = hdr.nla_type,
                nla_len = hdr.nla_len,
                remaining = input.len(),
                "attribute scan stopped on truncated attribute"
            );
            return None;
        }
        *input = &input[skip..];
    }
    None
}

/// A block of attributes decoded once, with first-wins lookup by type.
///
/// Decoding stops at the first attribute the scanner would stop at, so
/// `get(t)` returns exactly what `find_next_attr_of_type(t, ..)` returns when
/// started at the beginning of the same block.
#[derive(Debug, Clone, Default)]
pub struct AttrTable {
    attrs: Vec<RawAttr>,
    index: HashMap<u16, usize>,
}

impl AttrTable {
    /// Decode every well-formed attribute in `block`.
    pub fn parse(block: &[u8], order: ByteOrder) -> Self {
        let mut table = Self::default();
        let mut input = block;
        while !input.is_empty() {
            match RawAttr::parse(&mut input, order) {
                Ok(attr) => table.push(attr),
                Err(err) => {
                    trace!(remaining = input.len(), %err, "attribute table stopped");
                    break;
                }
            }
        }
        table
    }

    /// Decode the children of a nested attribute.
    pub fn from_nested(attr: &RawAttr) -> Self {
        Self::parse(attr.value(), attr.order())
    }

    fn push(&mut self, attr: RawAttr) {
        self.index.entry(attr.attr_type()).or_insert(self.attrs.len());
        self.attrs.push(attr);
    }

    /// First attribute whose full type field equals `attr_type`.
    pub fn get(&self, attr_type: u16) -> Option<&RawAttr> {
        self.index.get(&attr_type).map(|&i| &self.attrs[i])
    }

    /// Check whether an attribute of `attr_type` is present.
    pub fn contains(&self, attr_type: u16) -> bool {
        self.index.contains_key(&attr_type)
    }

    /// All decoded attributes in wire order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &RawAttr> {
        self.attrs.iter()
    }

    /// Number of decoded attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// True when nothing decoded.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
