//! 统计信息

use serde::Serialize;

/// 网络统计信息
#[derive(Debug, Default, Clone, Serialize)]
pub struct Stats {
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    /// 传输途中被丢弃：TTL 耗尽、无路由、接口禁止转发、无监听端口
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
    /// 源节点查不到路由而没有发出的数据包
    pub no_route_pkts: u64,
    /// 交给路由协议处理的控制报文
    pub control_pkts: u64,
}
