// NVML-backed GPU probe

use super::{GpuProbe, PartitionGpu, PhysicalGpu, UNSUPPORTED_METRIC};
use nvml_wrapper::Nvml;
use nvml_wrapper::bitmasks::InitFlags;

/// GPU memory is reported in decimal gigabytes.
const BYTES_PER_GB: f64 = 1_000_000_000.0;

pub struct NvmlProbe {
    nvml: Nvml,
}

impl NvmlProbe {
    /// Initialize the vendor library once. `None` when the library or
    /// driver is absent; a system with zero NVIDIA GPUs is not a failure.
    pub fn init() -> Option<Self> {
        let nvml = Nvml::init_with_flags(InitFlags::NO_GPUS).ok()?;
        Some(Self { nvml })
    }
}

impl GpuProbe for NvmlProbe {
    fn physical_devices(&self) -> Vec<PhysicalGpu> {
        let Ok(count) = self.nvml.device_count() else {
            return Vec::new();
        };
        let mut devices = Vec::new();
        for i in 0..count {
            let Ok(device) = self.nvml.device_by_index(i) else {
                continue;
            };
            let index = device.index().unwrap_or(i);
            let name = device.name().unwrap_or_else(|_| "GPU".into());
            let utilization_pct = device
                .utilization_rates()
                .map(|u| u.gpu as f64)
                .unwrap_or(UNSUPPORTED_METRIC);
            let (memory_used_gb, memory_total_gb) = device
                .memory_info()
                .map(|m| (m.used as f64 / BYTES_PER_GB, m.total as f64 / BYTES_PER_GB))
                .unwrap_or((UNSUPPORTED_METRIC, UNSUPPORTED_METRIC));
            devices.push(PhysicalGpu {
                index,
                name,
                utilization_pct,
                memory_used_gb,
                memory_total_gb,
            });
        }
        devices
    }

    fn partition_devices(&self) -> Vec<PartitionGpu> {
        // The safe NVML wrapper exposes no MIG sub-device handles.
        // Partitioned topologies reach the merge through other GpuProbe
        // implementations; see DESIGN.md.
        Vec::new()
    }
}
