//! 数据包类型
//!
//! 每个 packet 带一个简化的 IPv4 头；负载要么是 UDP 控制报文（路由通告），
//! 要么是只记录 flow/大小的数据负载。

use std::net::Ipv4Addr;

use bytes::Bytes;

pub const DEFAULT_TTL: u8 = 64;

/// IPv4 + UDP 头开销（20 + 8 字节），计入控制报文的线上大小。
pub const IPV4_UDP_OVERHEAD: u32 = 28;

/// The subset of the IPv4 header routing decisions look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub ttl: u8,
}

impl Ipv4Header {
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Self {
            source,
            destination,
            ttl: DEFAULT_TTL,
        }
    }
}

/// UDP datagram carried as a control payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub src_port: u16,
    pub dst_port: u16,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Control(Datagram),
    Data { flow_id: u64 },
}

/// 网络数据包
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub header: Ipv4Header,
    pub size_bytes: u32,
    pub payload: Payload,
    pub hops_taken: u32,
}

impl Packet {
    pub fn src(&self) -> Ipv4Addr {
        self.header.source
    }

    pub fn dst(&self) -> Ipv4Addr {
        self.header.destination
    }

    pub fn flow_id(&self) -> Option<u64> {
        match self.payload {
            Payload::Data { flow_id } => Some(flow_id),
            Payload::Control(_) => None,
        }
    }

    /// 经过一跳转发：TTL 减一、跳数加一。TTL 耗尽时返回 `None`。
    pub fn advance(mut self) -> Option<Self> {
        self.header.ttl = self.header.ttl.checked_sub(1).filter(|ttl| *ttl > 0)?;
        self.hops_taken += 1;
        Some(self)
    }
}
