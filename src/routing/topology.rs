//! 拓扑推断
//!
//! 交换机的角色完全由自己接口上的地址推出来，不依赖任何外部拓扑数据库：
//! 地址第 2 个字节是 pod 号，第 3 个字节是 pod 内的交换机编号；
//! core pod 的编号等于节点非 loopback 接口的个数。

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use tracing::debug;

/// Address arithmetic the protocol's heuristics are built on.
pub trait AddressTopology {
    /// The pod part of `addr`.
    fn pod_of(&self, addr: Ipv4Addr) -> Ipv4Addr;

    /// The switch-index part of `addr`.
    fn switch_index_of(&self, addr: Ipv4Addr) -> Ipv4Addr;

    /// Pod value that identifies the core pod for a node with `n_ifaces` non-loopback
    /// interfaces.
    fn core_pod(&self, n_ifaces: u32) -> Ipv4Addr;
}

/// `unused.pod.switch.host` octet layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctetTopology;

const POD_MASK: u32 = 0x00ff_0000;
const SWITCH_INDEX_MASK: u32 = 0x0000_ff00;

impl AddressTopology for OctetTopology {
    fn pod_of(&self, addr: Ipv4Addr) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(addr) & POD_MASK)
    }

    fn switch_index_of(&self, addr: Ipv4Addr) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(addr) & SWITCH_INDEX_MASK)
    }

    fn core_pod(&self, n_ifaces: u32) -> Ipv4Addr {
        // 0.<n>.0.0 & 0.255.0.0
        Ipv4Addr::from((n_ifaces << 16) & POD_MASK)
    }
}

/// Per-node role derived once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchRole {
    /// Switch-index address that occurs most often among the node's own addresses.
    pub switch: Ipv4Addr,
    pub is_core: bool,
    /// Leaf nodes accept exactly one default gateway.
    pub default_gw_installed: bool,
}

impl Default for SwitchRole {
    fn default() -> Self {
        Self {
            switch: Ipv4Addr::UNSPECIFIED,
            is_core: false,
            default_gw_installed: false,
        }
    }
}

impl SwitchRole {
    /// Infer the role of a node with `n_interfaces` interfaces (loopback included) carrying
    /// `addrs`.
    ///
    /// Nodes with two or fewer non-loopback interfaces are leaves: nothing is counted and the
    /// default role is returned.
    pub fn infer<T, I>(topo: &T, n_interfaces: u32, addrs: I) -> Self
    where
        T: AddressTopology + ?Sized,
        I: IntoIterator<Item = Ipv4Addr>,
    {
        let n_ifaces = n_interfaces.saturating_sub(1);
        let mut role = SwitchRole::default();
        if n_ifaces <= 2 {
            return role;
        }

        let core_pod = topo.core_pod(n_ifaces);
        let mut core_count = 0u32;
        // BTreeMap 按地址升序遍历，票数相同时保留较小的地址
        let mut votes: BTreeMap<Ipv4Addr, u32> = BTreeMap::new();
        for addr in addrs.into_iter().filter(|a| !a.is_loopback()) {
            if topo.pod_of(addr) == core_pod {
                core_count += 1;
            } else {
                *votes.entry(topo.switch_index_of(addr)).or_insert(0) += 1;
            }
        }

        let mut best = 0;
        for (index, count) in votes {
            if count > best {
                best = count;
                role.switch = index;
            }
        }
        role.is_core = core_count > 2 && core_count == n_ifaces;

        debug!(
            switch = %role.switch,
            is_core = role.is_core,
            core_count,
            n_ifaces,
            "推断交换机角色"
        );
        role
    }
}
