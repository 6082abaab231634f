//! IP 层能力接口
//!
//! 路由协议只通过 [`NetworkStack`] 看到所在节点：枚举接口/地址、查询转发开关、
//! 从某个接口发出 UDP 报文。协议不持有节点，每次调用时由节点借给它。

use std::net::Ipv4Addr;

use bytes::Bytes;

use super::id::{IfIndex, NodeId};
use super::iface::{Interface, InterfaceAddress};
use super::network::Network;
use crate::sim::Simulator;

/// Capabilities the routing protocol needs from the IP layer of its node.
pub trait NetworkStack {
    /// Number of interfaces, loopback included.
    fn n_interfaces(&self) -> u32;

    /// Addresses configured on `iface`; empty for an unknown index.
    fn addresses(&self, iface: IfIndex) -> &[InterfaceAddress];

    fn is_forwarding(&self, iface: IfIndex) -> bool;

    /// Send a UDP datagram out of `iface`.
    fn send_datagram(
        &mut self,
        iface: IfIndex,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        port: u16,
        data: Bytes,
    );
}

/// Every (interface, address) pair of the stack, in interface order.
pub fn local_addresses(stack: &dyn NetworkStack) -> Vec<(IfIndex, InterfaceAddress)> {
    (0..stack.n_interfaces())
        .flat_map(|i| stack.addresses(i).iter().map(move |a| (i, *a)))
        .collect()
}

/// 绑定到某个节点的 IP 层视图：接口来自节点自身，发送经由 `Network` 调度。
pub struct NodeStack<'a> {
    pub(crate) node: NodeId,
    pub(crate) interfaces: &'a [Interface],
    pub(crate) net: &'a mut Network,
    pub(crate) sim: &'a mut Simulator,
}

impl NetworkStack for NodeStack<'_> {
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
        let pkt = self.net.make_control_packet(src, dst, port, data);
        self.net.transmit(self.node, iface, pkt, self.sim);
    }
}
