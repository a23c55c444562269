// GPU device models

use serde::{Deserialize, Serialize};

/// Identity of an enumerated GPU entry.
///
/// A partitioned device (MIG-style) is addressed by its physical parent
/// index plus the partition index; the parent itself is then absent from
/// the device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GpuIdentity {
    Physical { index: u32 },
    Partition { parent: u32, partition: u32 },
}

impl GpuIdentity {
    /// Stable short key for history series and display ("0" or "0:1").
    pub fn key(&self) -> String {
        match self {
            GpuIdentity::Physical { index } => index.to_string(),
            GpuIdentity::Partition { parent, partition } => format!("{parent}:{partition}"),
        }
    }
}

/// Utilization and memory for one device-list entry.
///
/// `-1.0` marks a metric the device cannot report; device absence and
/// metric unavailability are distinct signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuDeviceStats {
    pub identity: GpuIdentity,
    pub name: String,
    pub utilization_pct: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
}

impl GpuDeviceStats {
    pub fn display_name(&self) -> String {
        format!("[{}] {}", self.identity.key(), self.name)
    }
}
