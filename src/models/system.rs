// CPU, memory and per-tick snapshot models

use serde::{Deserialize, Serialize};

use super::{DiskReport, GpuDeviceStats, Metric, NetworkRates};

/// Per-core CPU usage and frequency plus the cached identity string.
///
/// `model` is resolved once at startup ("<model name> [<n> cores]") and
/// repeated verbatim in every snapshot; it never changes at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub model: String,
    pub physical_cores: u32,
    pub logical_cores: u32,
    /// Usage percentage per logical core, 0-100.
    pub per_core_percent: Vec<f64>,
    /// Current frequency per logical core, MHz.
    pub per_core_frequency_mhz: Vec<u64>,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub usage_percent: f64,
}

/// One sampling pass. Every sub-metric carries its own collection outcome;
/// a failed family never suppresses the others.
///
/// Units: rates in MB/s, GPU memory in GB, percentages 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub cpu: Metric<CpuStats>,
    pub memory: Metric<MemoryStats>,
    pub disk: Metric<DiskReport>,
    pub network: Metric<NetworkRates>,
    pub gpu: Metric<Vec<GpuDeviceStats>>,
}
