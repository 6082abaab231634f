//! Fat-tree 路由协议实例
//!
//! 每个节点一个实例：启动时推断角色并从每个接口广播一次通告；
//! 收到邻居通告后按 pod/core 关系把条目分类进路由表；转发时按表查找，
//! 多个候选时取网络地址与目的地址数值最接近的一条。

use std::net::Ipv4Addr;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::message::AdvertisementMessage;
use super::route::Ipv4Route;
use super::rte::RouteEntry;
use super::table::{RoutingTable, RoutingTableEntry, combine_mask, find_close_match, prefix_to_mask};
use super::topology::{AddressTopology, OctetTopology, SwitchRole};
use crate::error::{CodecError, RoutingError};
use crate::net::{IfIndex, InterfaceAddress, Ipv4Header, NetworkStack, local_addresses};

/// UDP port advertisements are sent to and received on.
pub const FAT_ROUTING_PORT: u16 = 3287;

const POD_NETWORK_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 0, 0);
const LINK_MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 252);
const LOOPBACK_NETWORK: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 0);

/// Counters kept by one routing instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoutingStats {
    pub adverts_sent: u64,
    pub adverts_received: u64,
    pub network_routes_learned: u64,
    pub suffix_routes_learned: u64,
    pub duplicate_pod_routes: u64,
    pub entries_ignored: u64,
}

/// Send-only endpoint bound to one global interface address.
#[derive(Debug, Clone, Copy)]
struct SendEndpoint {
    iface: IfIndex,
    local: Ipv4Addr,
    broadcast: Ipv4Addr,
}

/// What the IP layer should do with an incoming packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteInputOutcome {
    /// Destined to this node (unicast or interface broadcast).
    LocalDeliver { interface: IfIndex },
    Forward(Ipv4Route),
    /// Rejected with an error; not handled.
    Error(RoutingError),
    /// Not handled, another protocol may try.
    Declined,
}

impl RouteInputOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, Self::LocalDeliver { .. } | Self::Forward(_))
    }
}

#[derive(Debug)]
pub struct FatTreeRouting<T: AddressTopology = OctetTopology> {
    topo: T,
    role: SwitchRole,
    table: RoutingTable,
    send_endpoints: Vec<SendEndpoint>,
    started: bool,
    stats: RoutingStats,
}

impl Default for FatTreeRouting {
    fn default() -> Self {
        Self::with_topology(OctetTopology)
    }
}

impl FatTreeRouting {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: AddressTopology> FatTreeRouting<T> {
    pub fn with_topology(topo: T) -> Self {
        Self {
            topo,
            role: SwitchRole::default(),
            table: RoutingTable::new(),
            send_endpoints: Vec::new(),
            started: false,
            stats: RoutingStats::default(),
        }
    }

    pub fn role(&self) -> &SwitchRole {
        &self.role
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn stats(&self) -> &RoutingStats {
        &self.stats
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Infer the switch role and send the one and only advertisement round.
    ///
    /// Calling this again is a no-op: the protocol has no periodic or triggered updates.
    #[tracing::instrument(skip_all)]
    pub fn start(&mut self, stack: &mut dyn NetworkStack) {
        if self.started {
            warn!("路由协议已启动，忽略重复的 start");
            return;
        }
        self.started = true;

        let addrs = local_addresses(stack);
        self.role = SwitchRole::infer(
            &self.topo,
            stack.n_interfaces(),
            addrs.iter().map(|(_, a)| a.local()),
        );

        self.send_endpoints = addrs
            .iter()
            .filter(|(_, a)| a.is_global())
            .map(|(iface, a)| SendEndpoint {
                iface: *iface,
                local: a.local(),
                broadcast: a.broadcast(),
            })
            .collect();
        info!(
            switch = %self.role.switch,
            is_core = self.role.is_core,
            endpoints = self.send_endpoints.len(),
            "🛰️  fat-tree 路由启动"
        );

        self.send_update(stack);
    }

    /// One entry per (interface, address) pair: the address's own network and prefix length.
    pub fn build_advertisement(stack: &dyn NetworkStack) -> AdvertisementMessage {
        local_addresses(stack)
            .iter()
            .map(|(_, a)| entry_for(a))
            .collect()
    }

    fn send_update(&mut self, stack: &mut dyn NetworkStack) {
        let msg = Self::build_advertisement(stack);
        let payload = msg.to_bytes();
        debug!(entries = msg.len(), message = %msg, "发送路由通告");
        for ep in &self.send_endpoints {
            trace!(iface = ep.iface, src = %ep.local, dst = %ep.broadcast, "广播通告");
            stack.send_datagram(
                ep.iface,
                ep.local,
                ep.broadcast,
                FAT_ROUTING_PORT,
                payload.clone(),
            );
            self.stats.adverts_sent += 1;
        }
    }

    /// Handle an advertisement datagram that arrived on `in_iface` from `sender`.
    #[tracing::instrument(skip(self, stack, data), fields(len = data.len()))]
    pub fn receive(
        &mut self,
        stack: &dyn NetworkStack,
        data: &[u8],
        sender: Ipv4Addr,
        in_iface: IfIndex,
    ) -> Result<(), CodecError> {
        let msg = AdvertisementMessage::decode(data)?;
        self.stats.adverts_received += 1;
        self.learn(stack.n_interfaces(), &msg, in_iface, sender);
        Ok(())
    }

    /// Classify every entry of `msg` into the routing table.
    pub fn learn(
        &mut self,
        n_interfaces: u32,
        msg: &AdvertisementMessage,
        in_iface: IfIndex,
        sender: Ipv4Addr,
    ) {
        // 叶子节点（loopback + 一个接口）：第一个邻居就是默认网关
        if n_interfaces == 2 {
            if !self.role.default_gw_installed && sender != Ipv4Addr::LOCALHOST {
                self.table.add_network_route(RoutingTableEntry::network_route(
                    Ipv4Addr::UNSPECIFIED,
                    Ipv4Addr::UNSPECIFIED,
                    Some(sender),
                    in_iface,
                ));
                self.role.default_gw_installed = true;
                info!(gateway = %sender, iface = in_iface, "安装默认路由");
            }
            return;
        }

        if sender == Ipv4Addr::LOCALHOST {
            self.stats.entries_ignored += msg.len() as u64;
            return;
        }

        let core_pod = self.topo.core_pod(n_interfaces.saturating_sub(1));
        let sender_net = combine_mask(sender, LINK_MASK);
        for entry in msg.entries() {
            self.learn_entry(entry, core_pod, sender, sender_net, in_iface);
        }
    }

    fn learn_entry(
        &mut self,
        entry: &RouteEntry,
        core_pod: Ipv4Addr,
        sender: Ipv4Addr,
        sender_net: Ipv4Addr,
        in_iface: IfIndex,
    ) {
        let prefix = entry.prefix();
        if prefix == LOOPBACK_NETWORK || entry.prefix_len() > 32 {
            trace!(%entry, "忽略条目");
            self.stats.entries_ignored += 1;
            return;
        }
        let mask = prefix_to_mask(entry.prefix_len());
        let route = RoutingTableEntry::network_route(prefix, mask, Some(sender), in_iface);
        let same_pod_as_core = self.topo.pod_of(prefix) == core_pod;

        match (self.role.is_core, same_pod_as_core) {
            (true, false) => {
                let pod_route = RoutingTableEntry::network_route(
                    prefix,
                    POD_NETWORK_MASK,
                    Some(sender),
                    in_iface,
                );
                if self.table.add_network_route_unique(pod_route) {
                    self.stats.network_routes_learned += 1;
                    debug!(network = %pod_route.dest_network, gateway = %sender, "学到 pod 路由");
                } else {
                    self.stats.duplicate_pod_routes += 1;
                }
            }
            // core 只汇聚跨 pod 的路由
            (true, true) => self.stats.entries_ignored += 1,
            (false, false) if self.topo.switch_index_of(prefix) <= self.role.switch => {
                self.table.add_network_route(route);
                self.stats.network_routes_learned += 1;
                trace!(%entry, gateway = %sender, "学到 network 路由");
            }
            (false, _) if sender_net == prefix => {
                self.table.add_suffix_route(route);
                self.stats.suffix_routes_learned += 1;
                trace!(%entry, gateway = %sender, "学到 suffix 路由");
            }
            (false, _) => self.stats.entries_ignored += 1,
        }
    }

    /// Resolve `dest`, optionally restricted to `oif`.
    pub fn lookup(
        &self,
        stack: &dyn NetworkStack,
        dest: Ipv4Addr,
        oif: Option<IfIndex>,
    ) -> Option<Ipv4Route> {
        let candidates = if self.role.is_core {
            self.table
                .network_candidates_under(dest, POD_NETWORK_MASK, oif)
        } else {
            let exact = self.table.network_candidates(dest, oif);
            if exact.is_empty() {
                trace!(suffix_routes = self.table.suffix_routes().len(), "回退到 suffix 路由");
                self.table.suffix_routes().iter().collect()
            } else {
                exact
            }
        };

        let entry = match candidates.as_slice() {
            [] => return None,
            [only] => *only,
            many => find_close_match(many, dest)?,
        };
        let source = stack
            .addresses(entry.interface)
            .first()
            .map(|a| a.local())
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        let route = Ipv4Route {
            destination: dest,
            source,
            gateway: entry.gateway,
            out_interface: entry.interface,
        };
        trace!(%route, network = %entry.dest_network, "查表命中");
        Some(route)
    }

    /// Route a locally originated packet.
    pub fn route_output(
        &self,
        stack: &dyn NetworkStack,
        header: &Ipv4Header,
        oif: Option<IfIndex>,
    ) -> Result<Ipv4Route, RoutingError> {
        let dest = header.destination;
        if dest.is_multicast() {
            return Err(RoutingError::Multicast(dest));
        }
        self.lookup(stack, dest, oif)
            .ok_or(RoutingError::NoRouteToHost(dest))
    }

    /// Decide what to do with a packet that arrived on `in_iface`.
    pub fn route_input(
        &self,
        stack: &dyn NetworkStack,
        header: &Ipv4Header,
        in_iface: IfIndex,
    ) -> RouteInputOutcome {
        let dest = header.destination;
        if dest.is_multicast() {
            return RouteInputOutcome::Declined;
        }

        // 宽松的本地判定：目的地址匹配任意一个本地接口（或其广播地址）都算本地
        let is_local = local_addresses(stack)
            .iter()
            .any(|(_, a)| a.local() == dest || a.broadcast() == dest);
        if is_local {
            return RouteInputOutcome::LocalDeliver {
                interface: in_iface,
            };
        }

        if !stack.is_forwarding(in_iface) {
            debug!(iface = in_iface, "接口禁止转发");
            return RouteInputOutcome::Error(RoutingError::ForwardingDisabled(in_iface));
        }

        match self.lookup(stack, dest, None) {
            Some(route) => RouteInputOutcome::Forward(route),
            None => RouteInputOutcome::Declined,
        }
    }

    pub fn notify_interface_up(&mut self, iface: IfIndex) {
        debug!(iface, "interface up (静态拓扑，不做处理)");
    }

    pub fn notify_interface_down(&mut self, iface: IfIndex) {
        debug!(iface, "interface down (静态拓扑，不做处理)");
    }

    pub fn notify_add_address(&mut self, iface: IfIndex, address: InterfaceAddress) {
        debug!(iface, %address, "add address (静态拓扑，不做处理)");
    }

    pub fn notify_remove_address(&mut self, iface: IfIndex, address: InterfaceAddress) {
        debug!(iface, %address, "remove address (静态拓扑，不做处理)");
    }
}

fn entry_for(address: &InterfaceAddress) -> RouteEntry {
    RouteEntry::new(address.network(), u16::from(address.prefix_len()))
}
