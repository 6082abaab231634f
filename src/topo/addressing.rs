//! Fat-tree 编址
//!
//! `base.pod.slot.host`，每条点对点链路占一个 /30：
//! - pod `p < k`：slot `0..k/2` 是 edge 交换机连主机的链路，slot `k/2..k` 是
//!   aggregation 交换机连 edge 的链路；
//! - pod `k`（core pod）：slot `c` 是 core 交换机 `c` 的链路，按 pod 顺序每 pod 一条。
//!
//! 同一 slot 内第 `i` 条链路是 `base.pod.slot.(4*i)/30`，下层一端取 `.1`，上层一端取 `.2`。

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::ConfigError;

const LINK_PREFIX_LEN: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatTreeAddressing {
    base: u8,
    k: usize,
}

impl FatTreeAddressing {
    /// 最大的 k：core 交换机数 (k/2)^2 不能超过一个 octet 能编号的 slot 数。
    pub const MAX_K: usize = 32;

    pub fn new(base: u8, k: usize) -> Result<Self, ConfigError> {
        // loopback 和 multicast 网段上学不到任何路由
        let first = Ipv4Addr::new(base, 0, 0, 1);
        if first.is_loopback() || first.is_multicast() {
            return Err(ConfigError::InvalidBaseOctet(base));
        }
        if k < 4 || k % 2 != 0 {
            return Err(ConfigError::InvalidK(k));
        }
        if k > Self::MAX_K {
            return Err(ConfigError::AddressSpace(k));
        }
        Ok(Self { base, k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn half(&self) -> usize {
        self.k / 2
    }

    /// core pod 的编号，等于 core 交换机的接口数
    pub fn core_pod(&self) -> usize {
        self.k
    }

    /// slot `(pod, slot)` 内的第 `link` 条 /30
    pub fn link_subnet(&self, pod: usize, slot: usize, link: usize) -> Ipv4Net {
        debug_assert!(pod <= self.k && slot < 256 && link < 64);
        let addr = Ipv4Addr::new(self.base, pod as u8, slot as u8, (link * 4) as u8);
        Ipv4Net::new(addr, LINK_PREFIX_LEN).expect("/30 is a valid prefix length")
    }

    /// 主机 `(pod, edge, host)` 与其 edge 交换机之间的链路
    pub fn host_link(&self, pod: usize, edge: usize, host: usize) -> Ipv4Net {
        self.link_subnet(pod, edge, host)
    }

    /// edge `(pod, edge)` 与 aggregation `(pod, agg)` 之间的链路
    pub fn edge_agg_link(&self, pod: usize, edge: usize, agg: usize) -> Ipv4Net {
        self.link_subnet(pod, self.half() + agg, edge)
    }

    /// pod `pod` 的 aggregation 交换机与 core 交换机 `core` 之间的链路
    pub fn agg_core_link(&self, pod: usize, core: usize) -> Ipv4Net {
        self.link_subnet(self.core_pod(), core, pod)
    }

    /// 主机的地址（其链路的 `.1`）
    pub fn host_address(&self, pod: usize, edge: usize, host: usize) -> Ipv4Addr {
        let net = self.host_link(pod, edge, host);
        Ipv4Addr::from(u32::from(net.network()) + 1)
    }
}
