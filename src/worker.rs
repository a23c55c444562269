// Sampling worker: one pass per tick runs to completion, appends history,
// broadcasts the snapshot. Rendering happens on the consumer side of the
// channel, synchronously with each received snapshot.

use crate::gpu_repo::{GpuCapability, GpuRepo};
use crate::history::HistoryStore;
use crate::metrics_repo::MetricsRepo;
use crate::models::{Metric, Snapshot};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};

/// Rate limit for the "no receivers" log (avoid a line every tick when no
/// display is attached).
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Vendor driver queries can hang; bound them so one stuck call costs a
/// single sub-metric for the tick, not the whole pass.
const GPU_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Repos, shared history, broadcast and shutdown for the worker.
pub struct WorkerDeps {
    pub metrics_repo: Arc<MetricsRepo>,
    pub gpu_repo: Arc<GpuRepo>,
    pub history: Arc<std::sync::Mutex<HistoryStore>>,
    pub tx: broadcast::Sender<Snapshot>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log worker stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// One sampling pass. Every sub-metric is guarded on its own: a failure is
/// logged once and recorded in the snapshot, never raised, and never
/// blocks the remaining families.
pub async fn collect_snapshot(metrics_repo: &MetricsRepo, gpu_repo: &GpuRepo) -> Snapshot {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        });

    let cpu = metric_from(
        metrics_repo.get_cpu_stats().await,
        "get_cpu_stats",
        "CPU stats failed",
    );
    let memory = metric_from(
        metrics_repo.get_memory_stats().await,
        "get_memory_stats",
        "memory stats failed",
    );
    let disk = metric_from(
        metrics_repo.get_disk_report().await,
        "get_disk_report",
        "disk report failed",
    );
    let network = metric_from(
        metrics_repo.get_network_rates().await,
        "get_network_rates",
        "network rates failed",
    );
    let gpu = match gpu_repo.capability() {
        GpuCapability::Unavailable => Metric::Unavailable,
        GpuCapability::Available => {
            match tokio::time::timeout(GPU_QUERY_TIMEOUT, gpu_repo.get_device_stats()).await {
                Ok(result) => metric_from(result, "get_device_stats", "GPU device stats failed"),
                Err(_) => {
                    tracing::warn!(operation = "get_device_stats", "GPU query timed out");
                    Metric::Failed("gpu query timed out".into())
                }
            }
        }
    };

    Snapshot {
        timestamp,
        cpu,
        memory,
        disk,
        network,
        gpu,
    }
}

fn metric_from<T>(result: anyhow::Result<T>, operation: &'static str, msg: &'static str) -> Metric<T> {
    if let Err(e) = &result {
        tracing::warn!(error = %e, operation, "{}", msg);
    }
    Metric::from_result(result)
}

/// Append the snapshot's display series. Sentinel (-1) GPU metrics are not
/// history; the renderer shows a placeholder for those instead.
pub fn append_history(history: &mut HistoryStore, snapshot: &Snapshot) {
    if let Some(cpu) = snapshot.cpu.ready() {
        history.push("cpu", cpu.usage_percent);
    }
    if let Some(memory) = snapshot.memory.ready() {
        history.push("mem", memory.usage_percent);
    }
    if let Some(disk) = snapshot.disk.ready() {
        history.push("disk.read", disk.read_mbps);
        history.push("disk.write", disk.write_mbps);
    }
    if let Some(network) = snapshot.network.ready() {
        history.push("net.down", network.download_mbps);
        history.push("net.up", network.upload_mbps);
    }
    if let Some(devices) = snapshot.gpu.ready() {
        for device in devices {
            let key = device.identity.key();
            if device.utilization_pct >= 0.0 {
                history.push(&format!("gpu.{key}.util"), device.utilization_pct);
            }
            if device.memory_used_gb >= 0.0 && device.memory_total_gb > 0.0 {
                let percent = device.memory_used_gb / device.memory_total_gb * 100.0;
                history.push(&format!("gpu.{key}.mem"), percent);
            }
        }
    }
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        metrics_repo,
        gpu_repo,
        history,
        tx,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(sample_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut ticks_total: u64 = 0;
        let mut last_no_receivers_warn: Option<Instant> = None;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let snapshot = collect_snapshot(&metrics_repo, &gpu_repo).await;
                    ticks_total += 1;

                    match history.lock() {
                        Ok(mut history) => append_history(&mut history, &snapshot),
                        Err(e) => {
                            tracing::warn!(error = %e, operation = "append_history", "history lock poisoned");
                        }
                    }

                    if tx.send(snapshot).is_err() {
                        let should_warn = last_no_receivers_warn
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                        if should_warn {
                            tracing::debug!(
                                operation = "broadcast_snapshot",
                                "no display attached; broadcast channel has no receivers"
                            );
                            last_no_receivers_warn = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    let series_count = history.lock().map(|h| h.keys().count()).unwrap_or(0);
                    tracing::info!(
                        ticks_total,
                        history_series = series_count,
                        "app stats"
                    );
                }
            }
        }
    })
}
