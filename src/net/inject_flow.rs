//! 数据流注入事件

use std::net::Ipv4Addr;

use super::id::NodeId;
use super::net_world::NetWorld;
use crate::sim::{Event, SimTime, Simulator, World};

/// 事件：从 `src` 向 `dst` 每隔 `gap` 发一个数据包，共 `remaining` 个。
///
/// 源节点查不到路由时该包计入 `no_route_pkts`，后续的包照常调度。
#[derive(Debug, Clone)]
pub struct InjectFlow {
    pub flow_id: u64,
    pub src: NodeId,
    pub dst: Ipv4Addr,
    pub pkt_bytes: u32,
    pub remaining: u64,
    pub gap: SimTime,
}

impl Event for InjectFlow {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        if me.remaining == 0 {
            return;
        }

        // 失败已计入统计
        let _ = w.net.send_data(me.src, me.dst, me.flow_id, me.pkt_bytes, sim);

        me.remaining -= 1;
        if me.remaining > 0 {
            sim.schedule_in(me.gap, me);
        }
    }
}
