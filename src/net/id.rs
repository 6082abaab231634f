//! 标识符类型

/// 节点标识符（`Network` 内节点数组的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// 单向链路标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub usize);

/// 节点上的接口下标；0 号接口固定为 loopback。
pub type IfIndex = u32;
