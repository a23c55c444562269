// Worker integration: collect a live snapshot, append history, tick and
// shut down. Samples the host it runs on; asserts only what any machine
// can provide.

use std::sync::Arc;
use std::time::Duration;
use sysdash::gpu_repo::GpuRepo;
use sysdash::history::HistoryStore;
use sysdash::metrics_repo::MetricsRepo;
use sysdash::models::Metric;
use sysdash::worker::{self, WorkerConfig, WorkerDeps};
use tokio::sync::broadcast;

fn test_repo() -> Arc<MetricsRepo> {
    Arc::new(MetricsRepo::new(0.01, vec!["/boot".into()]))
}

#[tokio::test]
async fn test_collect_snapshot_populates_independent_families() {
    let metrics_repo = test_repo();
    let gpu_repo = Arc::new(GpuRepo::disabled());

    let snapshot = worker::collect_snapshot(&metrics_repo, &gpu_repo).await;

    assert!(snapshot.timestamp > 0);
    // A disabled GPU family degrades to Unavailable without touching the
    // host-side families.
    assert_eq!(snapshot.gpu, Metric::Unavailable);
    let cpu = snapshot.cpu.ready().expect("cpu stats");
    assert!(cpu.logical_cores > 0);
    assert_eq!(cpu.per_core_percent.len(), cpu.logical_cores as usize);
    assert!(cpu.model.contains("cores]"));
    let memory = snapshot.memory.ready().expect("memory stats");
    assert!(memory.total > 0);
    assert!(memory.usage_percent >= 0.0 && memory.usage_percent <= 100.0);
    assert!(snapshot.network.is_ready());
    assert!(snapshot.disk.is_ready());
}

#[tokio::test]
async fn test_first_tick_rates_are_zero_then_nonnegative() {
    let metrics_repo = test_repo();

    let first = metrics_repo.get_network_rates().await.expect("first pass");
    assert_eq!(first.download_mbps, 0.0);
    assert_eq!(first.upload_mbps, 0.0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = metrics_repo.get_network_rates().await.expect("second pass");
    assert!(second.download_mbps >= 0.0);
    assert!(second.upload_mbps >= 0.0);
}

#[tokio::test]
async fn test_disk_report_aggregates_and_labels_estimates() {
    let metrics_repo = test_repo();
    let report = metrics_repo.get_disk_report().await.expect("disk report");
    let sum_total: u64 = report.disks.iter().map(|d| d.total_space).sum();
    let sum_used: u64 = report.disks.iter().map(|d| d.used_space).sum();
    assert_eq!(report.total_space, sum_total);
    assert_eq!(report.total_used, sum_used);
    for disk in &report.disks {
        assert!(disk.total_space > 0);
        assert!(disk.read_mbps >= 0.0);
        assert!(disk.write_mbps >= 0.0);
    }
}

#[tokio::test]
async fn test_append_history_tracks_ready_families_only() {
    let metrics_repo = test_repo();
    let gpu_repo = Arc::new(GpuRepo::disabled());
    let mut history = HistoryStore::new(16);

    let snapshot = worker::collect_snapshot(&metrics_repo, &gpu_repo).await;
    worker::append_history(&mut history, &snapshot);

    assert!(history.series("cpu").is_some());
    assert!(history.series("mem").is_some());
    assert!(history.series("disk.read").is_some());
    assert!(history.series("net.down").is_some());
    // GPU was unavailable: no phantom series.
    assert!(!history.keys().any(|k| k.starts_with("gpu.")));
}

#[tokio::test]
async fn test_worker_spawn_ticks_and_shutdown() {
    let metrics_repo = test_repo();
    let gpu_repo = Arc::new(GpuRepo::disabled());
    let history = Arc::new(std::sync::Mutex::new(HistoryStore::new(16)));
    let (tx, mut rx) = broadcast::channel(8);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = worker::spawn(
        WorkerDeps {
            metrics_repo,
            gpu_repo,
            history: history.clone(),
            tx,
            shutdown_rx,
        },
        WorkerConfig {
            sample_interval_ms: 10,
            stats_log_interval_secs: 60,
        },
    );

    let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("tick within timeout")
        .expect("broadcast open");
    assert!(snapshot.timestamp > 0);

    shutdown_tx.send(()).expect("worker alive");
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("shutdown within timeout")
        .expect("worker task join");

    let history = history.lock().unwrap();
    assert!(history.series("cpu").is_some());
}
