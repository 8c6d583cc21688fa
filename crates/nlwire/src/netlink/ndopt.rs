//! IPv6 neighbor discovery options carried in RTM_NEWNDUSEROPT.
//!
//! Only the generic type/length/value framing is decoded here. The `length`
//! byte counts 8-octet units and includes the two header bytes.

use std::fmt;

use super::constants::hexify;

/// Source/target link-layer address option types.
pub const ND_OPTION_SOURCE_LL_ADDR: u8 = 1;
pub const ND_OPTION_TARGET_LL_ADDR: u8 = 2;
/// Prefix information.
pub const ND_OPTION_PI: u8 = 3;
/// MTU.
pub const ND_OPTION_MTU: u8 = 5;
/// Recursive DNS servers.
pub const ND_OPTION_RDNSS: u8 = 25;
/// DNS search list.
pub const ND_OPTION_DNSSL: u8 = 31;
/// NAT64 prefix.
pub const ND_OPTION_PREF64: u8 = 38;

/// Size of the option header (type + length).
pub const ND_OPTION_HDRLEN: usize = 2;

/// A single ND option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NdOption {
    /// Option type.
    pub option_type: u8,
    /// Length in 8-octet units, header included.
    pub length: u8,
    /// Option body after the 2-byte header, clipped to the bytes available.
    pub data: Vec<u8>,
}

impl NdOption {
    /// Decode the option at the front of `slice`.
    ///
    /// Returns `None` when fewer than two bytes are present or the length
    /// field is zero. A length running past `slice` is clipped.
    pub fn parse(slice: &[u8]) -> Option<Self> {
        let [option_type, length, ..] = *slice else {
            return None;
        };
        if length == 0 {
            return None;
        }
        let end = (length as usize * 8).min(slice.len());
        Some(Self {
            option_type,
            length,
            data: slice[ND_OPTION_HDRLEN..end].to_vec(),
        })
    }

    /// Declared size in bytes.
    pub fn declared_len(&self) -> usize {
        self.length as usize * 8
    }

    /// Name of the option type.
    pub fn type_name(&self) -> &'static str {
        option_type_name(self.option_type)
    }
}

/// Name of an ND option type.
pub fn option_type_name(option_type: u8) -> &'static str {
    match option_type {
        ND_OPTION_SOURCE_LL_ADDR => "SOURCE_LL_ADDR",
        ND_OPTION_TARGET_LL_ADDR => "TARGET_LL_ADDR",
        ND_OPTION_PI => "PREFIX_INFO",
        ND_OPTION_MTU => "MTU",
        ND_OPTION_RDNSS => "RDNSS",
        ND_OPTION_DNSSL => "DNSSL",
        ND_OPTION_PREF64 => "PREF64",
        _ => "UNKNOWN",
    }
}

impl fmt::Display for NdOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ndopt{{type={}({}), length={}, data={}}}",
            self.option_type,
            self.type_name(),
            self.length,
            hexify(&self.data)
        )
    }
}
