//! 路由协议启动事件

use super::id::NodeId;
use super::net_world::NetWorld;
use crate::sim::{Event, Simulator, World};

/// 事件：启动节点上的路由协议（推断角色并发出唯一一轮通告）。
#[derive(Debug)]
pub struct StartRouting {
    pub node: NodeId,
}

impl Event for StartRouting {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        w.net.start_routing(self.node, sim);
    }
}
