//! 事件 trait

use super::simulator::Simulator;
use super::world::World;

/// 可调度的仿真事件。
///
/// `self: Box<Self>` 让事件在执行时拿回自身的所有权（例如把携带的 packet move 给节点）。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
