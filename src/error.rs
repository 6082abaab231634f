//! 错误类型

use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

/// Advertisement wire-format violations.
///
/// A peer running this protocol never produces these, so the node treats any of them as a
/// protocol-integrity fault rather than something to recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("message truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },
    #[error("unsupported advertisement version {0}")]
    UnsupportedVersion(u8),
    #[error("reserved field must be zero, got {0:#06x}")]
    NonZeroReserved(u16),
    #[error("{0} trailing bytes do not form a route entry")]
    TrailingBytes(usize),
}

/// Outcomes of the IP-stack contract that the caller is expected to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no route to host {0}")]
    NoRouteToHost(Ipv4Addr),
    #[error("forwarding disabled on interface {0}")]
    ForwardingDisabled(u32),
    #[error("multicast destination {0} is not handled by fat-tree routing")]
    Multicast(Ipv4Addr),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fat-tree k must be even and >= 4, got {0}")]
    InvalidK(usize),
    #[error("fat-tree k={0} does not fit the 10.<pod>.<slot>.<host> addressing plan")]
    AddressSpace(usize),
    #[error("base octet {0} is loopback or multicast and cannot carry routed addresses")]
    InvalidBaseOctet(u8),
    #[error("probe flow #{index} names a host outside the k={k} fat-tree")]
    FlowOutOfRange { index: usize, k: usize },
}
