//! Fat-tree 拓扑构建
//!
//! 按 [`FatTreeAddressing`] 的约定建节点、连线、分配地址；路由协议只看地址，
//! 所以连线顺序决定了各节点的接口编号，但不影响学到的路由。

use tracing::info;

use super::addressing::FatTreeAddressing;
use crate::error::ConfigError;
use crate::net::{NetWorld, NodeId, NodeKind};
use crate::sim::{SimTime, Simulator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatTreeOpts {
    pub k: usize,
    pub link_gbps: u64,
    pub link_latency: SimTime,
    /// 地址第一个字节
    pub base_octet: u8,
}

impl Default for FatTreeOpts {
    fn default() -> Self {
        Self {
            k: 4,
            link_gbps: 100,
            link_latency: SimTime::from_micros(2),
            base_octet: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FatTreeTopology {
    pub k: usize,
    pub addressing: FatTreeAddressing,
    pub hosts: Vec<NodeId>,
    pub edge_switches: Vec<NodeId>,
    pub agg_switches: Vec<NodeId>,
    pub core_switches: Vec<NodeId>,
}

impl FatTreeTopology {
    fn half(&self) -> usize {
        self.k / 2
    }

    pub fn host(&self, pod: usize, edge: usize, host: usize) -> NodeId {
        let half = self.half();
        let idx = (pod * half + edge) * half + host;
        self.hosts[idx]
    }

    pub fn edge(&self, pod: usize, edge: usize) -> NodeId {
        let half = self.half();
        let idx = pod * half + edge;
        self.edge_switches[idx]
    }

    pub fn agg(&self, pod: usize, agg: usize) -> NodeId {
        let half = self.half();
        let idx = pod * half + agg;
        self.agg_switches[idx]
    }

    /// core 交换机 `group * k/2 + index`，连接每个 pod 的第 `group` 个 aggregation 交换机
    pub fn core(&self, group: usize, index: usize) -> NodeId {
        let half = self.half();
        let idx = group * half + index;
        self.core_switches[idx]
    }

    pub fn host_address(&self, pod: usize, edge: usize, host: usize) -> std::net::Ipv4Addr {
        self.addressing.host_address(pod, edge, host)
    }

    pub fn node_count(&self) -> usize {
        self.hosts.len() + self.edge_switches.len() + self.agg_switches.len() + self.core_switches.len()
    }
}

pub fn build_fat_tree(
    world: &mut NetWorld,
    opts: &FatTreeOpts,
) -> Result<FatTreeTopology, ConfigError> {
    let addressing = FatTreeAddressing::new(opts.base_octet, opts.k)?;
    let k = opts.k;
    let half = k / 2;
    let link_bps = opts.link_gbps.saturating_mul(1_000_000_000);
    let latency = opts.link_latency;
    let net = &mut world.net;

    let mut core_switches = Vec::with_capacity(half * half);
    for group in 0..half {
        for index in 0..half {
            let name = format!("c{}_{}", group, index);
            core_switches.push(net.add_node(name, NodeKind::Core));
        }
    }

    let mut hosts = Vec::with_capacity(k * half * half);
    let mut edge_switches = Vec::with_capacity(k * half);
    let mut agg_switches = Vec::with_capacity(k * half);

    for pod in 0..k {
        for edge in 0..half {
            let name = format!("p{}_e{}", pod, edge);
            edge_switches.push(net.add_node(name, NodeKind::Edge));
        }
        for agg in 0..half {
            let name = format!("p{}_a{}", pod, agg);
            agg_switches.push(net.add_node(name, NodeKind::Aggregation));
        }

        for edge in 0..half {
            let edge_id = edge_switches[pod * half + edge];
            for host in 0..half {
                let name = format!("h{}_{}_{}", pod, edge, host);
                let host_id = net.add_node(name, NodeKind::Host);
                let subnet = addressing.host_link(pod, edge, host);
                net.connect_p2p(host_id, edge_id, subnet, latency, link_bps);
                hosts.push(host_id);
            }
        }
    }

    for pod in 0..k {
        for edge in 0..half {
            for agg in 0..half {
                let edge_id = edge_switches[pod * half + edge];
                let agg_id = agg_switches[pod * half + agg];
                let subnet = addressing.edge_agg_link(pod, edge, agg);
                net.connect_p2p(edge_id, agg_id, subnet, latency, link_bps);
            }
        }
    }

    for (core, &core_id) in core_switches.iter().enumerate() {
        let agg = core / half;
        for pod in 0..k {
            let agg_id = agg_switches[pod * half + agg];
            let subnet = addressing.agg_core_link(pod, core);
            net.connect_p2p(agg_id, core_id, subnet, latency, link_bps);
        }
    }

    info!(
        k,
        hosts = hosts.len(),
        switches = edge_switches.len() + agg_switches.len() + core_switches.len(),
        links = net.links().len(),
        "🌲 fat-tree 构建完成"
    );

    Ok(FatTreeTopology {
        k,
        addressing,
        hosts,
        edge_switches,
        agg_switches,
        core_switches,
    })
}

/// 在 `at` 时刻启动所有节点的路由协议
pub fn start_routing(world: &NetWorld, sim: &mut Simulator, at: SimTime) {
    world.net.schedule_routing_start(sim, at);
}
