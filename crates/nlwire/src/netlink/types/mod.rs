//! Fixed-layout kernel structs that follow the netlink header.
//!
//! Every struct here implements [`WireStruct`](super::parse::WireStruct) and
//! is laid out so that its fields are naturally 4-byte aligned.

pub mod addr;
pub mod link;
pub mod neigh;
pub mod nfgen;
pub mod route;
