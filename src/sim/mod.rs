//! 仿真核心模块
//!
//! 单线程、虚拟时间的离散事件仿真：所有节点的协议实例都以事件回调的形式
//! 在同一个事件队列上按 (时间, 序号) 全序执行，没有真实并发，也不需要锁。

mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

pub use event::Event;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;
