//! 网络拓扑管理
//!
//! 持有所有节点与单向链路，负责把 packet 放上链路、在到达时交给节点处理，
//! 并维护全网统计。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use bytes::Bytes;
use ipnet::Ipv4Net;
use tracing::{debug, info, trace, warn};

use super::deliver_packet::DeliverPacket;
use super::id::{IfIndex, LinkId, NodeId};
use super::iface::InterfaceAddress;
use super::link::Link;
use super::node::{Node, NodeKind};
use super::packet::{Datagram, IPV4_UDP_OVERHEAD, Ipv4Header, Packet, Payload};
use super::start_routing::StartRouting;
use super::stats::Stats;
use crate::error::RoutingError;
use crate::routing::{FAT_ROUTING_PORT, Ipv4Route};
use crate::sim::{SimTime, Simulator};

/// 网络拓扑
#[derive(Debug, Default)]
pub struct Network {
    nodes: Vec<Option<Node>>,
    links: Vec<Link>,
    egress: HashMap<(NodeId, IfIndex), LinkId>,
    next_pkt_id: u64,
    pub stats: Stats,
}

impl Network {
    /// 添加节点（只带 loopback 接口）
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(id, name, kind)));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// 所有节点，按 id 顺序
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// 拥有地址 `addr` 的节点
    pub fn find_node_by_address(&self, addr: Ipv4Addr) -> Option<NodeId> {
        self.nodes().find(|n| n.owns(addr)).map(Node::id)
    }

    /// 用 `subnet` 连接两个节点：`a` 得到第一个主机地址（.1），`b` 得到第二个（.2）。
    /// 返回两端新建接口的下标。
    pub fn connect_p2p(
        &mut self,
        a: NodeId,
        b: NodeId,
        subnet: Ipv4Net,
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> (IfIndex, IfIndex) {
        let mut hosts = subnet.hosts();
        let (Some(addr_a), Some(addr_b)) = (hosts.next(), hosts.next()) else {
            panic!("subnet {subnet} has fewer than two host addresses");
        };
        let prefix_len = subnet.prefix_len();
        let if_a = self.add_address(a, addr_a, prefix_len);
        let if_b = self.add_address(b, addr_b, prefix_len);

        for (from, to) in [((a, if_a), (b, if_b)), ((b, if_b), (a, if_a))] {
            let id = LinkId(self.links.len());
            self.links.push(Link::new(from, to, latency, bandwidth_bps));
            self.egress.insert(from, id);
        }
        trace!(?a, ?b, %subnet, if_a, if_b, "建立点对点链路");
        (if_a, if_b)
    }

    fn add_address(&mut self, id: NodeId, local: Ipv4Addr, prefix_len: u8) -> IfIndex {
        let address = InterfaceAddress::new(local, prefix_len)
            .expect("prefix length comes from a valid Ipv4Net");
        self.node_mut(id)
            .unwrap_or_else(|| panic!("node {id:?} exists"))
            .add_interface(address)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        id
    }

    /// 创建一个发往路由协议端口的 UDP 控制报文
    pub fn make_control_packet(
        &mut self,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        port: u16,
        data: Bytes,
    ) -> Packet {
        let size_bytes = data.len() as u32 + IPV4_UDP_OVERHEAD;
        Packet {
            id: self.next_id(),
            header: Ipv4Header::new(src, dst),
            size_bytes,
            payload: Payload::Control(Datagram {
                src_port: FAT_ROUTING_PORT,
                dst_port: port,
                data,
            }),
            hops_taken: 0,
        }
    }

    /// 创建数据包
    pub fn make_data_packet(
        &mut self,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        flow_id: u64,
        size_bytes: u32,
    ) -> Packet {
        Packet {
            id: self.next_id(),
            header: Ipv4Header::new(src, dst),
            size_bytes,
            payload: Payload::Data { flow_id },
            hops_taken: 0,
        }
    }

    /// 从 `from` 的 `iface` 发出 packet；接口上没有链路（如 loopback）时丢弃。
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id, dst = %pkt.dst()))]
    pub fn transmit(&mut self, from: NodeId, iface: IfIndex, pkt: Packet, sim: &mut Simulator) {
        let Some(&link_id) = self.egress.get(&(from, iface)) else {
            warn!(?from, iface, "接口上没有链路，丢弃");
            self.on_dropped(&pkt);
            return;
        };
        let link = &mut self.links[link_id.0];
        let now = sim.now();
        let (depart, arrive) = link.occupy(now, pkt.size_bytes);
        let (to, to_iface) = link.to;
        trace!(
            ?link_id,
            %now,
            %depart,
            %arrive,
            ?to,
            to_iface,
            "调度数据包到达事件"
        );
        sim.schedule(
            arrive,
            DeliverPacket {
                to,
                iface: to_iface,
                pkt,
            },
        );
    }

    /// 将数据包交付给节点处理
    pub fn deliver(&mut self, to: NodeId, iface: IfIndex, pkt: Packet, sim: &mut Simulator) {
        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let mut node = self.take_node(to);
        node.on_packet(iface, pkt, sim, self);
        self.nodes[to.0] = Some(node);
    }

    /// 启动节点上的路由协议
    pub fn start_routing(&mut self, id: NodeId, sim: &mut Simulator) {
        let mut node = self.take_node(id);
        node.start_routing(sim, self);
        self.nodes[id.0] = Some(node);
    }

    /// 在 `at` 时刻启动所有节点的路由协议
    pub fn schedule_routing_start(&self, sim: &mut Simulator, at: SimTime) {
        for node in self.nodes() {
            sim.schedule(at, StartRouting { node: node.id() });
        }
        info!(nodes = self.node_count(), %at, "调度路由协议启动");
    }

    /// 从节点 `src` 发出一个发往 `dst` 的数据包
    #[tracing::instrument(skip(self, sim))]
    pub fn send_data(
        &mut self,
        src: NodeId,
        dst: Ipv4Addr,
        flow_id: u64,
        size_bytes: u32,
        sim: &mut Simulator,
    ) -> Result<(), RoutingError> {
        match self.route_from(src, dst, sim) {
            Ok(route) => {
                let pkt = self.make_data_packet(route.source, dst, flow_id, size_bytes);
                trace!(%route, pkt_id = pkt.id, "发出数据包");
                self.transmit(src, route.out_interface, pkt, sim);
                Ok(())
            }
            Err(err) => {
                debug!(%err, "源节点无路由");
                self.stats.no_route_pkts += 1;
                Err(err)
            }
        }
    }

    /// 在节点 `id` 上为发往 `dst` 的本地 packet 查路由
    pub fn route_from(
        &mut self,
        id: NodeId,
        dst: Ipv4Addr,
        sim: &mut Simulator,
    ) -> Result<Ipv4Route, RoutingError> {
        let node = self.take_node(id);
        let routed = node.route_output(sim, self, dst);
        self.nodes[id.0] = Some(node);
        routed
    }

    fn take_node(&mut self, id: NodeId) -> Node {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("node {id:?} exists"))
    }

    /// 数据包送达目的地时的处理
    pub(crate) fn on_delivered(&mut self, at: NodeId, pkt: &Packet, now: SimTime) {
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += u64::from(pkt.size_bytes);
        debug!(
            ?at,
            pkt_id = pkt.id,
            flow_id = ?pkt.flow_id(),
            hops = pkt.hops_taken,
            %now,
            "✅ 数据包送达目的地"
        );
    }

    pub(crate) fn on_dropped(&mut self, pkt: &Packet) {
        self.stats.dropped_pkts += 1;
        self.stats.dropped_bytes += u64::from(pkt.size_bytes);
    }
}
