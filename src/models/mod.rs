// Domain models consumed by the dashboard shell each tick

mod gpu;
mod metric;
mod network;
mod storage;
mod system;

pub use gpu::{GpuDeviceStats, GpuIdentity};
pub use metric::Metric;
pub use network::NetworkRates;
pub use storage::{DiskReport, DiskStats};
pub use system::{CpuStats, MemoryStats, Snapshot};
