//! 仿真配置
//!
//! JSON 配置文件，所有字段都可省略；省略的字段取默认值，命令行参数再覆盖其上。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::SimTime;
use crate::topo::{FatTreeAddressing, FatTreeOpts};

pub const DEFAULT_UNTIL_MS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub topology: TopologyConfig,
    #[serde(default)]
    pub probes: ProbeConfig,
    /// 仿真时长（毫秒）
    #[serde(default)]
    pub until_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub link_gbps: Option<u64>,
    #[serde(default)]
    pub link_latency_us: Option<u64>,
    /// 地址第一个字节，默认 10
    #[serde(default)]
    pub base_octet: Option<u8>,
}

/// 探测流：路由收敛后在主机之间发的数据流。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 第一个数据包的发送时刻（微秒），需晚于通告交换完成
    #[serde(default)]
    pub start_us: Option<u64>,
    #[serde(default)]
    pub gap_us: Option<u64>,
    #[serde(default)]
    pub pkt_bytes: Option<u32>,
    #[serde(default)]
    pub pkts_per_flow: Option<u64>,
    /// 显式指定的流；为空时每个 pod 的第一台主机发往下一个 pod 的第一台主机
    #[serde(default)]
    pub flows: Vec<FlowConfig>,
}

/// 一条流的两端，主机按 `[pod, edge, host]` 坐标给出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    pub src: [usize; 3],
    pub dst: [usize; 3],
}

impl SimConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 拓扑参数，校验 k 是否能用 fat-tree 编址表示
    pub fn fat_tree_opts(&self) -> Result<FatTreeOpts, ConfigError> {
        let defaults = FatTreeOpts::default();
        let t = &self.topology;
        let opts = FatTreeOpts {
            k: t.k.unwrap_or(defaults.k),
            link_gbps: t.link_gbps.unwrap_or(defaults.link_gbps),
            link_latency: t
                .link_latency_us
                .map(SimTime::from_micros)
                .unwrap_or(defaults.link_latency),
            base_octet: t.base_octet.unwrap_or(defaults.base_octet),
        };
        FatTreeAddressing::new(opts.base_octet, opts.k)?;
        Ok(opts)
    }

    pub fn until(&self) -> SimTime {
        SimTime::from_millis(self.until_ms.unwrap_or(DEFAULT_UNTIL_MS))
    }

    /// 每条流的主机坐标；未显式配置时是 pod 环
    pub fn flows(&self, k: usize) -> Result<Vec<FlowConfig>, ConfigError> {
        if self.probes.flows.is_empty() {
            return Ok((0..k)
                .map(|pod| FlowConfig {
                    src: [pod, 0, 0],
                    dst: [(pod + 1) % k, 0, 0],
                })
                .collect());
        }
        let half = k / 2;
        let in_range = |[pod, edge, host]: [usize; 3]| pod < k && edge < half && host < half;
        for (index, flow) in self.probes.flows.iter().enumerate() {
            if !in_range(flow.src) || !in_range(flow.dst) {
                return Err(ConfigError::FlowOutOfRange { index, k });
            }
        }
        Ok(self.probes.flows.clone())
    }
}

impl ProbeConfig {
    pub fn start(&self) -> SimTime {
        SimTime::from_micros(self.start_us.unwrap_or(1_000))
    }

    pub fn gap(&self) -> SimTime {
        SimTime::from_micros(self.gap_us.unwrap_or(5))
    }

    pub fn pkt_bytes(&self) -> u32 {
        self.pkt_bytes.unwrap_or(1500)
    }

    pub fn pkts_per_flow(&self) -> u64 {
        self.pkts_per_flow.unwrap_or(100)
    }
}
