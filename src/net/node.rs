//! 节点
//!
//! 主机与交换机使用同一种节点：一组编号接口（0 号为 loopback）加一个
//! fat-tree 路由实例。节点类型只用于命名和报告，路由行为完全由地址决定。

use std::net::Ipv4Addr;

use serde::Serialize;
use tracing::{debug, error, trace, warn};

use super::id::{IfIndex, NodeId};
use super::iface::{Interface, InterfaceAddress};
use super::network::Network;
use super::packet::{Ipv4Header, Packet, Payload};
use super::stack::NodeStack;
use crate::error::RoutingError;
use crate::routing::{FAT_ROUTING_PORT, FatTreeRouting, Ipv4Route, RouteInputOutcome};
use crate::sim::Simulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Host,
    Edge,
    Aggregation,
    Core,
}

/// 网络节点
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
    interfaces: Vec<Interface>,
    routing: FatTreeRouting,
}

impl Node {
    /// 创建节点，自带 0 号 loopback 接口
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            interfaces: vec![Interface::new(0, InterfaceAddress::loopback())],
            routing: FatTreeRouting::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// 追加一个接口，返回其下标
    pub fn add_interface(&mut self, address: InterfaceAddress) -> IfIndex {
        let index = self.interfaces.len() as IfIndex;
        self.interfaces.push(Interface::new(index, address));
        self.routing.notify_interface_up(index);
        self.routing.notify_add_address(index, address);
        index
    }

    pub fn set_forwarding(&mut self, iface: IfIndex, enabled: bool) {
        if let Some(i) = self.interfaces.get_mut(iface as usize) {
            i.forwarding = enabled;
        }
    }

    /// 接口上的第一个地址
    pub fn address(&self, iface: IfIndex) -> Option<Ipv4Addr> {
        self.interfaces
            .get(iface as usize)
            .and_then(|i| i.addresses.first())
            .map(|a| a.local())
    }

    /// 是否拥有地址 `addr`
    pub fn owns(&self, addr: Ipv4Addr) -> bool {
        self.interfaces
            .iter()
            .flat_map(|i| i.addresses.iter())
            .any(|a| a.local() == addr)
    }

    pub fn routing(&self) -> &FatTreeRouting {
        &self.routing
    }

    #[tracing::instrument(skip(self, sim, net), fields(node_name = %self.name))]
    pub(crate) fn start_routing(&mut self, sim: &mut Simulator, net: &mut Network) {
        let mut stack = NodeStack {
            node: self.id,
            interfaces: &self.interfaces,
            net,
            sim,
        };
        self.routing.start(&mut stack);
    }

    /// 为本地产生的 packet 查路由
    pub fn route_output(
        &self,
        sim: &mut Simulator,
        net: &mut Network,
        dst: Ipv4Addr,
    ) -> Result<Ipv4Route, RoutingError> {
        let stack = NodeStack {
            node: self.id,
            interfaces: &self.interfaces,
            net,
            sim,
        };
        let header = Ipv4Header::new(Ipv4Addr::UNSPECIFIED, dst);
        self.routing.route_output(&stack, &header, None)
    }

    /// 处理从 `in_iface` 到达的 packet
    #[tracing::instrument(skip(self, pkt, sim, net), fields(node_name = %self.name, pkt_id = pkt.id, dst = %pkt.dst()))]
    pub(crate) fn on_packet(
        &mut self,
        in_iface: IfIndex,
        pkt: Packet,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Node {
            id,
            name,
            interfaces,
            routing,
            ..
        } = self;
        let mut stack = NodeStack {
            node: *id,
            interfaces: interfaces.as_slice(),
            net,
            sim,
        };

        match routing.route_input(&stack, &pkt.header, in_iface) {
            RouteInputOutcome::LocalDeliver { interface } => match &pkt.payload {
                Payload::Control(dg) if dg.dst_port == FAT_ROUTING_PORT => {
                    if let Err(err) = routing.receive(&stack, &dg.data, pkt.src(), interface) {
                        error!(%err, sender = %pkt.src(), "路由通告格式错误");
                        panic!("protocol integrity violation at {name}: {err}");
                    }
                    stack.net.stats.control_pkts += 1;
                }
                Payload::Control(dg) => {
                    debug!(port = dg.dst_port, "端口无监听者，丢弃");
                    stack.net.on_dropped(&pkt);
                }
                Payload::Data { .. } => {
                    let now = stack.sim.now();
                    stack.net.on_delivered(*id, &pkt, now);
                }
            },
            RouteInputOutcome::Forward(route) => {
                trace!(%route, "转发");
                let NodeStack { net, sim, .. } = stack;
                let size_bytes = pkt.size_bytes;
                match pkt.advance() {
                    Some(pkt) => net.transmit(*id, route.out_interface, pkt, sim),
                    None => {
                        debug!("TTL 耗尽，丢弃");
                        net.stats.dropped_pkts += 1;
                        net.stats.dropped_bytes += u64::from(size_bytes);
                    }
                }
            }
            RouteInputOutcome::Error(err) => {
                warn!(%err, "无法转发");
                stack.net.on_dropped(&pkt);
            }
            RouteInputOutcome::Declined => {
                debug!("没有路由，丢弃");
                stack.net.on_dropped(&pkt);
            }
        }
    }
}
