//! 链路类型
//!
//! 点对点链路的一个方向：从 (节点, 接口) 到对端 (节点, 接口)。

use super::id::{IfIndex, NodeId};
use crate::sim::SimTime;

/// 网络链路（单向）
#[derive(Debug)]
pub struct Link {
    pub from: (NodeId, IfIndex),
    pub to: (NodeId, IfIndex),
    pub latency: SimTime,
    pub bandwidth_bps: u64,
    /// 发送端口被占用到的时刻；后发的 packet 在此之后才开始串行化
    pub busy_until: SimTime,
}

impl Link {
    pub fn new(
        from: (NodeId, IfIndex),
        to: (NodeId, IfIndex),
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy_until: SimTime::ZERO,
        }
    }

    /// 计算串行化指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128) + (self.bandwidth_bps as u128 - 1))
            / self.bandwidth_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }

    /// 占用链路发送一个 packet，返回 (离开时刻, 到达对端时刻)。
    pub(crate) fn occupy(&mut self, now: SimTime, bytes: u32) -> (SimTime, SimTime) {
        let start = now.max(self.busy_until);
        let depart = start.after(self.tx_time(bytes));
        self.busy_until = depart;
        (depart, depart.after(self.latency))
    }
}
