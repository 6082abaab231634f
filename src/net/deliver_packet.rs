//! 数据包交付事件

use super::id::{IfIndex, NodeId};
use super::net_world::NetWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World};
use tracing::trace;

/// 事件：把一个 packet 交给某个节点的某个接口。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: NodeId,
    pub iface: IfIndex,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, iface, pkt } = *self;
        trace!(
            pkt_id = pkt.id,
            size_bytes = pkt.size_bytes,
            src = %pkt.src(),
            dst = %pkt.dst(),
            hops_taken = pkt.hops_taken,
            ?to,
            iface,
            now = %sim.now(),
            "📨 数据包到达节点"
        );

        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.deliver(to, iface, pkt, sim);
    }
}
