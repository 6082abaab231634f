//! Advertisement message: version, reserved field, then a run of route entries.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::rte::{RTE_WIRE_SIZE, RouteEntry};
use crate::error::CodecError;

pub const ADVERTISEMENT_VERSION: u8 = 1;
/// version (1) + reserved (2)
pub const HEADER_WIRE_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvertisementMessage {
    entries: Vec<RouteEntry>,
}

impl AdvertisementMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: RouteEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn wire_size(&self) -> usize {
        HEADER_WIRE_SIZE + self.entries.len() * RTE_WIRE_SIZE
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(ADVERTISEMENT_VERSION);
        dst.put_u16(0);
        for entry in &self.entries {
            entry.encode(dst);
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Decode a whole datagram payload. The payload must be exactly `3 + 6 * N` bytes.
    pub fn decode(mut src: &[u8]) -> Result<Self, CodecError> {
        if src.len() < HEADER_WIRE_SIZE {
            return Err(CodecError::Truncated {
                needed: HEADER_WIRE_SIZE,
                got: src.len(),
            });
        }
        let version = src.get_u8();
        if version != ADVERTISEMENT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let reserved = src.get_u16();
        if reserved != 0 {
            return Err(CodecError::NonZeroReserved(reserved));
        }
        let trailing = src.len() % RTE_WIRE_SIZE;
        if trailing != 0 {
            return Err(CodecError::TrailingBytes(trailing));
        }

        let mut entries = Vec::with_capacity(src.len() / RTE_WIRE_SIZE);
        while src.has_remaining() {
            entries.push(RouteEntry::decode(&mut src)?);
        }
        Ok(Self { entries })
    }
}

impl FromIterator<RouteEntry> for AdvertisementMessage {
    fn from_iter<I: IntoIterator<Item = RouteEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for AdvertisementMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, " | {entry}")?;
        }
        Ok(())
    }
}
