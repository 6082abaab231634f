//! 网络世界实现

use super::network::Network;
use crate::sim::World;
use std::any::Any;

/// 持有 Network 的仿真世界；网络事件都从这里拿到拓扑。
#[derive(Debug, Default)]
pub struct NetWorld {
    pub net: Network,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
