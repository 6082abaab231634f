mod addressing;
mod route_table;
mod sim_time;

use crate::net::{IfIndex, Interface, InterfaceAddress, NetworkStack};
use bytes::Bytes;
use std::net::Ipv4Addr;

pub(crate) fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("valid IPv4 literal")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentDatagram {
    pub iface: IfIndex,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub port: u16,
    pub data: Bytes,
}

/// 不接网络的 IP 层：接口固定，发出的报文只记录下来。
#[derive(Debug, Default)]
pub(crate) struct StaticStack {
    pub interfaces: Vec<Interface>,
    pub sent: Vec<SentDatagram>,
}

impl StaticStack {
    /// loopback 加上给定的 `(地址, 前缀长度)`，每个一个接口
    pub fn new(addrs: &[(&str, u8)]) -> Self {
        let mut interfaces = vec![Interface::new(0, InterfaceAddress::loopback())];
        for (i, (addr, len)) in addrs.iter().enumerate() {
            let address = InterfaceAddress::new(ip(addr), *len).expect("valid prefix length");
            interfaces.push(Interface::new(i as IfIndex + 1, address));
        }
        Self {
            interfaces,
            sent: Vec::new(),
        }
    }
}

impl NetworkStack for StaticStack {
    fn n_interfaces(&self) -> u32 {
        self.interfaces.len() as u32
    }

    fn addresses(&self, iface: IfIndex) -> &[InterfaceAddress] {
        self.interfaces
            .get(iface as usize)
            .map(|i| i.addresses.as_slice())
            .unwrap_or(&[])
    }

    fn is_forwarding(&self, iface: IfIndex) -> bool {
        self.interfaces
            .get(iface as usize)
            .is_some_and(|i| i.forwarding)
    }

    fn send_datagram(
        &mut self,
        iface: IfIndex,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        port: u16,
        data: Bytes,
    ) {
        self.sent.push(SentDatagram {
            iface,
            src,
            dst,
            port,
            data,
        });
    }
}
