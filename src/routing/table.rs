//! 路由表
//!
//! 两个只追加的有序集合：精确的 network route，以及只在没有 network route
//! 命中时才使用的 suffix route。表的生命周期与所属的路由实例相同，不删除、不老化。

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::net::IfIndex;

/// Netmask with the top `len` bits set; lengths above 32 saturate to `/32`.
pub fn prefix_to_mask(len: u16) -> Ipv4Addr {
    let len = u32::from(len.min(32));
    let bits = u32::MAX.checked_shl(32 - len).unwrap_or(0);
    Ipv4Addr::from(bits)
}

pub fn mask_to_prefix(mask: Ipv4Addr) -> u8 {
    u32::from(mask).leading_ones() as u8
}

/// `a & mask`
pub fn combine_mask(a: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(a) & u32::from(mask))
}

/// Whether `a` and `b` fall in the same network under `mask`.
pub fn mask_match(mask: Ipv4Addr, a: Ipv4Addr, b: Ipv4Addr) -> bool {
    combine_mask(a, mask) == combine_mask(b, mask)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingTableEntry {
    pub dest_network: Ipv4Addr,
    pub dest_mask: Ipv4Addr,
    /// `None` for a directly connected network.
    pub gateway: Option<Ipv4Addr>,
    pub interface: IfIndex,
}

impl RoutingTableEntry {
    pub fn network_route(
        network: Ipv4Addr,
        mask: Ipv4Addr,
        gateway: Option<Ipv4Addr>,
        interface: IfIndex,
    ) -> Self {
        Self {
            dest_network: combine_mask(network, mask),
            dest_mask: mask,
            gateway,
            interface,
        }
    }

    pub fn is_host(&self) -> bool {
        self.dest_mask == Ipv4Addr::BROADCAST
    }

    pub fn is_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn is_default(&self) -> bool {
        self.dest_mask == Ipv4Addr::UNSPECIFIED
    }

    /// Whether `dest` falls in this entry's network under its own mask.
    pub fn matches(&self, dest: Ipv4Addr) -> bool {
        mask_match(self.dest_mask, dest, self.dest_network)
    }
}

/// Which collection a route lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Network,
    Suffix,
}

#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    network_routes: Vec<RoutingTableEntry>,
    suffix_routes: Vec<RoutingTableEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_network_route(&mut self, entry: RoutingTableEntry) {
        self.network_routes.push(entry);
    }

    pub fn add_suffix_route(&mut self, entry: RoutingTableEntry) {
        self.suffix_routes.push(entry);
    }

    /// Insert unless a network route with the same (network, mask) is already present.
    /// Returns whether the entry was inserted.
    pub fn add_network_route_unique(&mut self, entry: RoutingTableEntry) -> bool {
        let exists = self.network_routes.iter().any(|r| {
            r.dest_network == entry.dest_network && r.dest_mask == entry.dest_mask
        });
        if !exists {
            self.network_routes.push(entry);
        }
        !exists
    }

    pub fn network_routes(&self) -> &[RoutingTableEntry] {
        &self.network_routes
    }

    pub fn suffix_routes(&self) -> &[RoutingTableEntry] {
        &self.suffix_routes
    }

    /// Network routes first, then suffix routes.
    pub fn n_routes(&self) -> usize {
        self.network_routes.len() + self.suffix_routes.len()
    }

    /// The `i`-th route in [`n_routes`](Self::n_routes) order.
    pub fn route(&self, i: usize) -> Option<(RouteKind, &RoutingTableEntry)> {
        match self.network_routes.get(i) {
            Some(r) => Some((RouteKind::Network, r)),
            None => self
                .suffix_routes
                .get(i - self.network_routes.len())
                .map(|r| (RouteKind::Suffix, r)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteKind, &RoutingTableEntry)> {
        self.network_routes
            .iter()
            .map(|r| (RouteKind::Network, r))
            .chain(self.suffix_routes.iter().map(|r| (RouteKind::Suffix, r)))
    }

    /// Network routes whose network equals `dest` under a fixed `mask`, optionally restricted
    /// to `oif`.
    pub fn network_candidates_under(
        &self,
        dest: Ipv4Addr,
        mask: Ipv4Addr,
        oif: Option<IfIndex>,
    ) -> Vec<&RoutingTableEntry> {
        self.network_routes
            .iter()
            .filter(|r| mask_match(mask, dest, r.dest_network))
            .filter(|r| oif.is_none_or(|i| r.interface == i))
            .collect()
    }

    /// Network routes matching `dest` under their own mask, optionally restricted to `oif`.
    pub fn network_candidates(
        &self,
        dest: Ipv4Addr,
        oif: Option<IfIndex>,
    ) -> Vec<&RoutingTableEntry> {
        self.network_routes
            .iter()
            .filter(|r| r.matches(dest))
            .filter(|r| oif.is_none_or(|i| r.interface == i))
            .collect()
    }
}

/// Pick the candidate whose network is numerically nearest `dest`; the first one wins a tie.
pub fn find_close_match<'a>(
    candidates: &[&'a RoutingTableEntry],
    dest: Ipv4Addr,
) -> Option<&'a RoutingTableEntry> {
    let dest = i64::from(u32::from(dest));
    let mut best: Option<(&RoutingTableEntry, i64)> = None;
    for &route in candidates {
        let diff = (dest - i64::from(u32::from(route.dest_network))).abs();
        if best.is_none_or(|(_, d)| diff < d) {
            best = Some((route, diff));
        }
    }
    best.map(|(r, _)| r)
}

// 与 `route -n` 的输出格式一致
impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.n_routes() == 0 {
            return Ok(());
        }
        writeln!(
            f,
            "Destination     Gateway         Genmask         Flags Metric Ref    Use Iface"
        )?;
        for (_, route) in self.iter() {
            let gateway = route.gateway.unwrap_or(Ipv4Addr::UNSPECIFIED);
            let mut flags = String::from("U");
            if route.is_host() {
                flags.push('H');
            } else if route.is_gateway() {
                flags.push('G');
            }
            writeln!(
                f,
                "{:<16}{:<16}{:<16}{:<6}-      -      -   {}",
                route.dest_network.to_string(),
                gateway.to_string(),
                route.dest_mask.to_string(),
                flags,
                route.interface
            )?;
        }
        Ok(())
    }
}
