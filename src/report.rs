//! 仿真结束后的快照：全网统计 + 每个节点的角色、协议计数和路由表。

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::{IfIndex, Network, Node, NodeKind, Stats};
use crate::routing::{RouteKind, RoutingStats};
use crate::sim::Simulator;

#[derive(Debug, Clone, Serialize)]
pub struct RoutingReport {
    pub now_us: f64,
    pub events_executed: u64,
    pub stats: Stats,
    pub nodes: Vec<NodeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub name: String,
    pub kind: NodeKind,
    pub addresses: Vec<String>,
    pub switch_identity: Ipv4Addr,
    pub is_core: bool,
    pub default_gw_installed: bool,
    pub routing: RoutingStats,
    pub routes: Vec<RouteReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub kind: RouteKind,
    pub destination: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Option<Ipv4Addr>,
    pub interface: IfIndex,
}

impl RoutingReport {
    pub fn collect(sim: &Simulator, net: &Network) -> Self {
        Self {
            now_us: sim.now().as_micros_f64(),
            events_executed: sim.events_executed(),
            stats: net.stats.clone(),
            nodes: net.nodes().map(NodeReport::from_node).collect(),
        }
    }
}

impl NodeReport {
    pub fn from_node(node: &Node) -> Self {
        let routing = node.routing();
        let role = routing.role();
        Self {
            name: node.name().to_string(),
            kind: node.kind(),
            addresses: node
                .interfaces()
                .iter()
                .flat_map(|i| i.addresses.iter())
                .map(ToString::to_string)
                .collect(),
            switch_identity: role.switch,
            is_core: role.is_core,
            default_gw_installed: role.default_gw_installed,
            routing: *routing.stats(),
            routes: routing
                .table()
                .iter()
                .map(|(kind, r)| RouteReport {
                    kind,
                    destination: r.dest_network,
                    mask: r.dest_mask,
                    gateway: r.gateway,
                    interface: r.interface,
                })
                .collect(),
        }
    }
}
