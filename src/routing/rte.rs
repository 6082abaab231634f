//! Route entry (RTE): one advertised prefix on the wire.

use std::fmt;
use std::net::Ipv4Addr;

use bytes::{Buf, BufMut};

use crate::error::CodecError;

/// 4-byte prefix followed by a 2-byte prefix length, both network order.
pub const RTE_WIRE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteEntry {
    prefix: Ipv4Addr,
    prefix_len: u16,
}

impl RouteEntry {
    pub fn new(prefix: Ipv4Addr, prefix_len: u16) -> Self {
        Self { prefix, prefix_len }
    }

    pub fn prefix(&self) -> Ipv4Addr {
        self.prefix
    }

    pub fn prefix_len(&self) -> u16 {
        self.prefix_len
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.prefix.octets());
        dst.put_u16(self.prefix_len);
    }

    pub fn decode(src: &mut impl Buf) -> Result<Self, CodecError> {
        if src.remaining() < RTE_WIRE_SIZE {
            return Err(CodecError::Truncated {
                needed: RTE_WIRE_SIZE,
                got: src.remaining(),
            });
        }
        let prefix = Ipv4Addr::from(src.get_u32());
        let prefix_len = src.get_u16();
        Ok(Self { prefix, prefix_len })
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prefix {}/{}", self.prefix, self.prefix_len)
    }
}
