//! 世界 trait

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：事件执行时拿到的可变状态，由业务层实现（网络拓扑、统计等）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每执行完一个事件调用一次。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
