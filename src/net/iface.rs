//! 接口与接口地址

use std::fmt;
use std::net::Ipv4Addr;

use ipnet::{Ipv4Net, PrefixLenError};

use super::id::IfIndex;

/// Scope of an interface address, in the sense of the IP stack: loopback addresses never
/// leave the node, everything else is reachable on the attached link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    Host,
    Global,
}

/// One IPv4 address configured on an interface, together with its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    net: Ipv4Net,
}

impl InterfaceAddress {
    pub fn new(local: Ipv4Addr, prefix_len: u8) -> Result<Self, PrefixLenError> {
        Ok(Self {
            net: Ipv4Net::new(local, prefix_len)?,
        })
    }

    /// `127.0.0.1/8`
    pub fn loopback() -> Self {
        Self {
            net: Ipv4Net::new(Ipv4Addr::LOCALHOST, 8).expect("8 is a valid prefix length"),
        }
    }

    pub fn local(&self) -> Ipv4Addr {
        self.net.addr()
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.net.netmask()
    }

    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// `local & mask`
    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    pub fn scope(&self) -> AddressScope {
        if self.local().is_loopback() {
            AddressScope::Host
        } else {
            AddressScope::Global
        }
    }

    pub fn is_global(&self) -> bool {
        self.scope() == AddressScope::Global
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

/// 节点上的一个网络接口
#[derive(Debug, Clone)]
pub struct Interface {
    pub index: IfIndex,
    pub addresses: Vec<InterfaceAddress>,
    /// 是否允许转发从该接口进入的 packet
    pub forwarding: bool,
}

impl Interface {
    pub fn new(index: IfIndex, address: InterfaceAddress) -> Self {
        Self {
            index,
            addresses: vec![address],
            forwarding: true,
        }
    }
}
