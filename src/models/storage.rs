// Disk usage and I/O rate models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub mount: String,
    pub name: String,
    pub fs: String,
    pub total_space: u64,
    pub used_space: u64,
    pub usage_percent: f64,
    pub read_mbps: f64,
    pub write_mbps: f64,
    /// True when the OS exposes no per-device counters for this mount and
    /// the rates are a proportional share of the system-wide rate rather
    /// than a measurement.
    pub is_estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskReport {
    pub disks: Vec<DiskStats>,
    pub total_used: u64,
    pub total_space: u64,
    /// System-wide rates across all devices, MB/s.
    pub read_mbps: f64,
    pub write_mbps: f64,
}
