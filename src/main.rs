use anyhow::Result;
use std::io::Write as _;
use std::sync::Arc;
use sysdash::config::{AppConfig, DisplayConfig};
use sysdash::gpu_repo::GpuRepo;
use sysdash::history::HistoryStore;
use sysdash::metrics_repo::MetricsRepo;
use sysdash::models::{Metric, Snapshot};
use sysdash::render::{self, FillMode, GlyphMode, RenderError};
use sysdash::{version, worker};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = AppConfig::load()?;

    let metrics_repo = Arc::new(MetricsRepo::new(
        app_config.sampling.noise_floor_mbps,
        app_config.sampling.zero_io_mounts.clone(),
    ));
    let gpu_repo = Arc::new(GpuRepo::with_nvml());
    let history = Arc::new(std::sync::Mutex::new(HistoryStore::new(
        app_config.sampling.history_length,
    )));
    let (tx, mut rx) = broadcast::channel(app_config.monitoring.broadcast_capacity);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            metrics_repo,
            gpu_repo,
            history: history.clone(),
            tx,
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    tracing::info!(version = version::VERSION, "sysdash started");

    loop {
        tokio::select! {
            result = rx.recv() => match result {
                Ok(snapshot) => {
                    let frame = {
                        let history = history
                            .lock()
                            .map_err(|e| anyhow::anyhow!("history lock poisoned: {}", e))?;
                        render_dashboard(&snapshot, &history, &app_config.display)?
                    };
                    print!("\x1b[2J\x1b[H{frame}");
                    std::io::stdout().flush()?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "display lagged behind sampler");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                break;
            }
        }
    }
    let _ = worker_handle.await;

    Ok(())
}

const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Compose one text frame from the snapshot and history. All layout is
/// driven by the validated display config; the core never measures the
/// terminal itself.
fn render_dashboard(
    snapshot: &Snapshot,
    history: &HistoryStore,
    display: &DisplayConfig,
) -> Result<String, RenderError> {
    let gw = display.gauge_width;
    let mut out = String::new();
    out.push_str(&format!("{} {}\n\n", version::NAME, version::VERSION));

    match &snapshot.cpu {
        Metric::Ready(cpu) => {
            out.push_str(&format!("CPU  {}\n", cpu.model));
            out.push_str(&format!(
                "  [{}] {:5.1}%\n",
                render::gauge(cpu.usage_percent, gw)?,
                cpu.usage_percent
            ));
            push_graph(&mut out, history, "cpu", display, Some(100.0))?;
        }
        other => push_missing(&mut out, "CPU", other, gw),
    }

    match &snapshot.memory {
        Metric::Ready(memory) => {
            out.push_str(&format!(
                "Memory  {:.1}/{:.1} GB\n  [{}] {:5.1}%\n",
                memory.used as f64 / BYTES_PER_GB,
                memory.total as f64 / BYTES_PER_GB,
                render::gauge(memory.usage_percent, gw)?,
                memory.usage_percent
            ));
            push_graph(&mut out, history, "mem", display, Some(100.0))?;
        }
        other => push_missing(&mut out, "Memory", other, gw),
    }

    match &snapshot.disk {
        Metric::Ready(disk) => {
            out.push_str(&format!(
                "Disk  {:.1}/{:.1} GB  R {:.2} MB/s  W {:.2} MB/s\n",
                disk.total_used as f64 / BYTES_PER_GB,
                disk.total_space as f64 / BYTES_PER_GB,
                disk.read_mbps,
                disk.write_mbps
            ));
            for d in &disk.disks {
                // "~" marks rates that are estimates, not measurements.
                let marker = if d.is_estimated { "~" } else { " " };
                out.push_str(&format!(
                    "  {:<18} [{}] {:5.1}% {}R {:.2} W {:.2} MB/s\n",
                    d.mount,
                    render::gauge(d.usage_percent, gw)?,
                    d.usage_percent,
                    marker,
                    d.read_mbps,
                    d.write_mbps
                ));
            }
            push_graph(&mut out, history, "disk.read", display, None)?;
            push_graph(&mut out, history, "disk.write", display, None)?;
        }
        other => push_missing(&mut out, "Disk", other, gw),
    }

    match &snapshot.network {
        Metric::Ready(network) => {
            out.push_str(&format!(
                "Network  down {:.2} MB/s  up {:.2} MB/s\n",
                network.download_mbps, network.upload_mbps
            ));
            push_graph(&mut out, history, "net.down", display, None)?;
            push_graph(&mut out, history, "net.up", display, None)?;
        }
        other => push_missing(&mut out, "Network", other, gw),
    }

    match &snapshot.gpu {
        Metric::Ready(devices) if devices.is_empty() => {
            out.push_str("GPU  none detected\n");
        }
        Metric::Ready(devices) => {
            for device in devices {
                out.push_str(&format!("GPU  {}\n", device.display_name()));
                if device.utilization_pct >= 0.0 {
                    out.push_str(&format!(
                        "  [{}] {:5.1}%\n",
                        render::gauge(device.utilization_pct, gw)?,
                        device.utilization_pct
                    ));
                } else {
                    out.push_str(&format!("  [{}]\n", render::placeholder(gw)));
                }
                if device.memory_total_gb > 0.0 && device.memory_used_gb >= 0.0 {
                    out.push_str(&format!(
                        "  mem {:.1}/{:.1} GB\n",
                        device.memory_used_gb, device.memory_total_gb
                    ));
                }
                push_graph(
                    &mut out,
                    history,
                    &format!("gpu.{}.util", device.identity.key()),
                    display,
                    Some(100.0),
                )?;
            }
        }
        other => push_missing(&mut out, "GPU", other, gw),
    }

    Ok(out)
}

/// Sparkline for one series: fixed axis when the unit is a percentage,
/// otherwise scaled to the series' own maximum.
fn push_graph(
    out: &mut String,
    history: &HistoryStore,
    key: &str,
    display: &DisplayConfig,
    fixed_max: Option<f64>,
) -> Result<(), RenderError> {
    let Some(series) = history.series(key) else {
        return Ok(());
    };
    let values = series.values();
    let y_max = fixed_max.unwrap_or_else(|| values.iter().copied().fold(0.0, f64::max).max(1.0));
    for line in render::sparkline_labeled(
        &values,
        display.graph_width,
        display.graph_height,
        0.0,
        y_max,
        GlyphMode::Dots,
        FillMode::Filled,
    )? {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    Ok(())
}

fn push_missing<T>(out: &mut String, label: &str, metric: &Metric<T>, width: usize) {
    match metric {
        Metric::Unavailable => {
            out.push_str(&format!("{label}  [{}]\n", render::placeholder(width)));
        }
        Metric::Failed(reason) => {
            out.push_str(&format!(
                "{label}  [{}] ({reason})\n",
                render::placeholder(width)
            ));
        }
        Metric::Ready(_) => {}
    }
}
