// GPU enumeration: vendor probe seam plus topology merge

mod nvml;

pub use nvml::NvmlProbe;

use crate::models::{GpuDeviceStats, GpuIdentity};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Sentinel a probe reports for a metric the device cannot measure.
/// Metric unavailability is distinct from device absence; a device with no
/// readable utilization is still enumerated.
pub const UNSUPPORTED_METRIC: f64 = -1.0;

/// Whether the vendor interface came up at startup. Resolved once; a
/// failed init is never retried per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuCapability {
    Available,
    Unavailable,
}

/// A physical device as the vendor reports it.
#[derive(Debug, Clone)]
pub struct PhysicalGpu {
    pub index: u32,
    pub name: String,
    pub utilization_pct: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
}

/// A partitioned sub-device (MIG-style), addressed by its physical parent.
#[derive(Debug, Clone)]
pub struct PartitionGpu {
    pub parent: u32,
    pub partition: u32,
    pub name: String,
    pub utilization_pct: f64,
    pub memory_used_gb: f64,
    pub memory_total_gb: f64,
}

/// Vendor query seam. Implementations report unsupported metrics as
/// `UNSUPPORTED_METRIC` and must not panic on driver errors.
pub trait GpuProbe: Send + Sync {
    fn physical_devices(&self) -> Vec<PhysicalGpu>;
    fn partition_devices(&self) -> Vec<PartitionGpu>;
}

pub struct GpuRepo {
    probe: Option<Arc<dyn GpuProbe>>,
}

impl GpuRepo {
    /// Resolve the NVML capability once at process start. On failure the
    /// GPU family degrades to `Unavailable` for the process lifetime.
    pub fn with_nvml() -> Self {
        match NvmlProbe::init() {
            Some(probe) => Self {
                probe: Some(Arc::new(probe)),
            },
            None => {
                tracing::warn!(
                    operation = "nvml_init",
                    "NVML unavailable; GPU metrics disabled for this run"
                );
                Self { probe: None }
            }
        }
    }

    /// Use an explicit probe (tests, alternative vendors).
    pub fn from_probe(probe: Arc<dyn GpuProbe>) -> Self {
        Self { probe: Some(probe) }
    }

    pub fn disabled() -> Self {
        Self { probe: None }
    }

    pub fn capability(&self) -> GpuCapability {
        if self.probe.is_some() {
            GpuCapability::Available
        } else {
            GpuCapability::Unavailable
        }
    }

    /// Enumerate the merged device list for this tick.
    #[instrument(skip(self), fields(repo = "gpu", operation = "get_device_stats"))]
    pub async fn get_device_stats(&self) -> anyhow::Result<Vec<GpuDeviceStats>> {
        let Some(probe) = self.probe.clone() else {
            anyhow::bail!("gpu interface unavailable");
        };
        tokio::task::spawn_blocking(move || {
            Ok(merge_topology(
                probe.physical_devices(),
                probe.partition_devices(),
            ))
        })
        .await
        .map_err(|e| anyhow::anyhow!("gpu task join: {}", e))?
    }
}

/// Merge independently listed physical and partitioned devices into one
/// list: a physical device with partitions is replaced by them, one entry
/// per partition; otherwise it appears itself. Order is deterministic,
/// parent index ascending then partition index ascending. Exposed for
/// unit tests.
pub fn merge_topology(
    physical: Vec<PhysicalGpu>,
    partitions: Vec<PartitionGpu>,
) -> Vec<GpuDeviceStats> {
    let mut by_parent: BTreeMap<u32, Vec<PartitionGpu>> = BTreeMap::new();
    for p in partitions {
        by_parent.entry(p.parent).or_default().push(p);
    }
    for list in by_parent.values_mut() {
        list.sort_by_key(|p| p.partition);
    }

    let mut physical = physical;
    physical.sort_by_key(|d| d.index);

    let mut merged = Vec::new();
    for device in physical {
        match by_parent.remove(&device.index) {
            Some(parts) => {
                for p in parts {
                    merged.push(GpuDeviceStats {
                        identity: GpuIdentity::Partition {
                            parent: p.parent,
                            partition: p.partition,
                        },
                        name: p.name,
                        utilization_pct: p.utilization_pct,
                        memory_used_gb: p.memory_used_gb,
                        memory_total_gb: p.memory_total_gb,
                    });
                }
            }
            None => merged.push(GpuDeviceStats {
                identity: GpuIdentity::Physical {
                    index: device.index,
                },
                name: device.name,
                utilization_pct: device.utilization_pct,
                memory_used_gb: device.memory_used_gb,
                memory_total_gb: device.memory_total_gb,
            }),
        }
    }
    merged
}
