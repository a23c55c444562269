// Host counters via sysinfo, derived into display-ready rates

mod counters;
mod disk;
mod linux;
mod rate;

pub use counters::{CounterSnapshot, CounterStore};
pub use disk::{distribute_estimated_rates, is_zero_io_mount};
pub use rate::{BYTES_PER_MB, MIN_ELAPSED_SECS, RateCalculator};

use crate::models::{CpuStats, DiskReport, DiskStats, MemoryStats, NetworkRates};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Disks, Networks, System};
use tracing::instrument;

/// Entity-key prefixes inside the shared CounterStore.
const DISK_ENTITY_PREFIX: &str = "disk:";
const NET_ENTITY: &str = "net:all";
const SYSTEM_DISK_ENTITY: &str = "system:disk";

/// CPU identity resolved once at startup; it never changes, so ticks reuse
/// the cached strings instead of re-querying.
#[derive(Debug, Clone)]
struct CpuIdentity {
    model: String,
    physical_cores: u32,
    logical_cores: u32,
}

pub struct MetricsRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    counters: Arc<std::sync::Mutex<CounterStore>>,
    rates: RateCalculator,
    zero_io_mounts: Arc<Vec<String>>,
    cpu_identity: Arc<CpuIdentity>,
}

impl MetricsRepo {
    pub fn new(noise_floor_mbps: f64, zero_io_mounts: Vec<String>) -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        let logical = sys.cpus().len() as u32;
        let physical = System::physical_core_count().unwrap_or(0) as u32;
        let model = linux::read_cpu_model_linux()
            .or_else(|| {
                sys.cpus()
                    .first()
                    .map(|c| c.brand().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "CPU".into());
        let cpu_identity = CpuIdentity {
            model: format!("{model} [{logical} cores]"),
            physical_cores: physical,
            logical_cores: logical,
        };

        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            counters: Arc::new(std::sync::Mutex::new(CounterStore::new())),
            rates: RateCalculator::new(noise_floor_mbps),
            zero_io_mounts: Arc::new(zero_io_mounts),
            cpu_identity: Arc::new(cpu_identity),
        }
    }

    #[instrument(skip(self), fields(repo = "metrics", operation = "get_cpu_stats"))]
    pub async fn get_cpu_stats(&self) -> anyhow::Result<CpuStats> {
        let sys = self.sys.clone();
        let identity = self.cpu_identity.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_all();

            let per_core_percent: Vec<f64> = sys
                .cpus()
                .iter()
                .map(|c| (c.cpu_usage() as f64).clamp(0.0, 100.0))
                .collect();
            let per_core_frequency_mhz: Vec<u64> =
                sys.cpus().iter().map(|c| c.frequency()).collect();
            let usage = (sys.global_cpu_usage() as f64).clamp(0.0, 100.0);

            Ok(CpuStats {
                model: identity.model.clone(),
                physical_cores: identity.physical_cores,
                logical_cores: identity.logical_cores,
                per_core_percent,
                per_core_frequency_mhz,
                usage_percent: usage,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("metrics task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "metrics", operation = "get_memory_stats"))]
    pub async fn get_memory_stats(&self) -> anyhow::Result<MemoryStats> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let available = sys.available_memory();
            let used = total.saturating_sub(available);
            let usage_percent = if total > 0 {
                (used as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(MemoryStats {
                total,
                used,
                available,
                usage_percent,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("metrics task join: {}", e))?
    }

    /// One disk pass: refresh the mount list (vanished mounts are
    /// decommissioned), derive per-disk rates from native counters where
    /// the OS exposes them, distribute the system-wide rate across the
    /// rest, and force pseudo-partitions to zero.
    #[instrument(skip(self), fields(repo = "metrics", operation = "get_disk_report"))]
    pub async fn get_disk_report(&self) -> anyhow::Result<DiskReport> {
        let disks = self.disks.clone();
        let counters = self.counters.clone();
        let rates = self.rates;
        let zero_io_mounts = self.zero_io_mounts.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            let mut counters = counters
                .lock()
                .map_err(|e| anyhow::anyhow!("counter store lock poisoned: {}", e))?;
            disks_guard.refresh(true);
            let now = Instant::now();

            // Raw per-partition readings first; rate policy decided below.
            struct Observed {
                stat: DiskStats,
                native: Option<(u64, u64)>,
            }
            let mut observed: Vec<Observed> = Vec::new();
            for d in disks_guard.list() {
                let total = d.total_space();
                if total == 0 {
                    // Inaccessible or pseudo filesystem; skip this entity only.
                    continue;
                }
                let available = d.available_space();
                let used = total.saturating_sub(available);
                let usage = d.usage();
                let native = (usage.total_read_bytes > 0 || usage.total_written_bytes > 0)
                    .then_some((usage.total_read_bytes, usage.total_written_bytes));
                observed.push(Observed {
                    stat: DiskStats {
                        mount: d.mount_point().to_string_lossy().into_owned(),
                        name: d.name().to_string_lossy().into_owned(),
                        fs: d.file_system().to_string_lossy().into_owned(),
                        total_space: total,
                        used_space: used,
                        usage_percent: (used as f64 / total as f64) * 100.0,
                        read_mbps: 0.0,
                        write_mbps: 0.0,
                        is_estimated: false,
                    },
                    native,
                });
            }

            // Absence from the new enumeration is decommission.
            let live: HashSet<String> = observed
                .iter()
                .map(|o| format!("{DISK_ENTITY_PREFIX}{}", o.stat.mount))
                .collect();
            counters.retain(|entity| {
                !entity.starts_with(DISK_ENTITY_PREFIX) || live.contains(entity)
            });

            // System-wide rate from /proc/diskstats where available, else
            // from the sum of disks that do report native counters.
            let (sys_read, sys_write) = linux::read_diskstats_totals().unwrap_or_else(|| {
                observed.iter().filter_map(|o| o.native).fold(
                    (0, 0),
                    |(r, w), (nr, nw)| (r + nr, w + nw),
                )
            });
            let (read_mbps, write_mbps) =
                match counters.observe(SYSTEM_DISK_ENTITY, sys_read, sys_write, now) {
                    Some(prev) => {
                        let elapsed = now.duration_since(prev.taken_at).as_secs_f64();
                        (
                            rates.rate_mbps(sys_read, prev.read_bytes, elapsed),
                            rates.rate_mbps(sys_write, prev.write_bytes, elapsed),
                        )
                    }
                    None => (0.0, 0.0),
                };

            let mut stats: Vec<DiskStats> = Vec::with_capacity(observed.len());
            for Observed { mut stat, native } in observed {
                if is_zero_io_mount(&stat.mount, &zero_io_mounts) {
                    // Capacity still reported; I/O is meaningless here.
                } else if let Some((read_bytes, write_bytes)) = native {
                    let entity = format!("{DISK_ENTITY_PREFIX}{}", stat.mount);
                    if let Some(prev) = counters.observe(&entity, read_bytes, write_bytes, now) {
                        let elapsed = now.duration_since(prev.taken_at).as_secs_f64();
                        stat.read_mbps = rates.rate_mbps(read_bytes, prev.read_bytes, elapsed);
                        stat.write_mbps = rates.rate_mbps(write_bytes, prev.write_bytes, elapsed);
                    }
                } else {
                    stat.is_estimated = true;
                }
                stats.push(stat);
            }

            distribute_estimated_rates(&mut stats, read_mbps, write_mbps);
            for stat in stats.iter_mut().filter(|s| s.is_estimated) {
                stat.read_mbps = rates.denoise_mbps(stat.read_mbps);
                stat.write_mbps = rates.denoise_mbps(stat.write_mbps);
            }

            let total_used = stats.iter().map(|s| s.used_space).sum();
            let total_space = stats.iter().map(|s| s.total_space).sum();
            Ok(DiskReport {
                disks: stats,
                total_used,
                total_space,
                read_mbps,
                write_mbps,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("metrics task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "metrics", operation = "get_network_rates"))]
    pub async fn get_network_rates(&self) -> anyhow::Result<NetworkRates> {
        let networks = self.networks.clone();
        let counters = self.counters.clone();
        let rates = self.rates;
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            let mut counters = counters
                .lock()
                .map_err(|e| anyhow::anyhow!("counter store lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let now = Instant::now();

            let (recv, sent) = networks_guard
                .list()
                .values()
                .fold((0u64, 0u64), |(r, s), data| {
                    (r + data.total_received(), s + data.total_transmitted())
                });

            let (download_mbps, upload_mbps) = match counters.observe(NET_ENTITY, recv, sent, now)
            {
                Some(prev) => {
                    let elapsed = now.duration_since(prev.taken_at).as_secs_f64();
                    (
                        rates.rate_mbps(recv, prev.read_bytes, elapsed),
                        rates.rate_mbps(sent, prev.write_bytes, elapsed),
                    )
                }
                None => (0.0, 0.0),
            };

            Ok(NetworkRates {
                download_mbps,
                upload_mbps,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("metrics task join: {}", e))?
    }
}
