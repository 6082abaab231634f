//! 网络模拟模块
//!
//! 节点、接口与地址、链路、数据包、网络拓扑，以及驱动它们的仿真事件。

// 子模块声明
mod deliver_packet;
mod id;
mod iface;
mod inject_flow;
mod link;
mod net_world;
mod network;
mod node;
mod packet;
mod stack;
mod start_routing;
mod stats;

// 重新导出公共接口
pub use deliver_packet::DeliverPacket;
pub use id::{IfIndex, LinkId, NodeId};
pub use iface::{AddressScope, Interface, InterfaceAddress};
pub use inject_flow::InjectFlow;
pub use link::Link;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Node, NodeKind};
pub use packet::{DEFAULT_TTL, Datagram, IPV4_UDP_OVERHEAD, Ipv4Header, Packet, Payload};
pub use stack::{NetworkStack, NodeStack, local_addresses};
pub use start_routing::StartRouting;
pub use stats::Stats;
