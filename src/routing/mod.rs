//! Fat-tree 感知的 IPv4 路由协议
//!
//! - [`RouteEntry`] / [`AdvertisementMessage`]：通告报文的线上格式
//! - [`AddressTopology`] / [`SwitchRole`]：仅凭接口地址推断交换机角色
//! - [`RoutingTable`]：network route + suffix route
//! - [`FatTreeRouting`]：通告收发、路由学习、查表与 IP 层契约

mod engine;
mod message;
mod route;
mod rte;
mod table;
mod topology;

pub use engine::{FAT_ROUTING_PORT, FatTreeRouting, RouteInputOutcome, RoutingStats};
pub use message::{ADVERTISEMENT_VERSION, AdvertisementMessage, HEADER_WIRE_SIZE};
pub use route::Ipv4Route;
pub use rte::{RTE_WIRE_SIZE, RouteEntry};
pub use table::{
    RouteKind, RoutingTable, RoutingTableEntry, combine_mask, find_close_match, mask_match,
    mask_to_prefix, prefix_to_mask,
};
pub use topology::{AddressTopology, OctetTopology, SwitchRole};
