// GPU topology merge: partitions replace parents, deterministic order

use std::sync::Arc;
use sysdash::gpu_repo::{
    GpuCapability, GpuProbe, GpuRepo, PartitionGpu, PhysicalGpu, UNSUPPORTED_METRIC,
    merge_topology,
};
use sysdash::models::GpuIdentity;

fn physical(index: u32) -> PhysicalGpu {
    PhysicalGpu {
        index,
        name: format!("GPU {index}"),
        utilization_pct: 10.0 * index as f64,
        memory_used_gb: 1.0,
        memory_total_gb: 16.0,
    }
}

fn partition(parent: u32, partition: u32) -> PartitionGpu {
    PartitionGpu {
        parent,
        partition,
        name: format!("GPU {parent} slice {partition}"),
        utilization_pct: 5.0,
        memory_used_gb: 0.5,
        memory_total_gb: 4.0,
    }
}

#[test]
fn test_partitions_replace_their_parent() {
    // Two physical devices, device 0 has 2 partitions, device 1 has none.
    let merged = merge_topology(
        vec![physical(0), physical(1)],
        vec![partition(0, 0), partition(0, 1)],
    );
    let identities: Vec<GpuIdentity> = merged.iter().map(|d| d.identity).collect();
    assert_eq!(
        identities,
        vec![
            GpuIdentity::Partition {
                parent: 0,
                partition: 0
            },
            GpuIdentity::Partition {
                parent: 0,
                partition: 1
            },
            GpuIdentity::Physical { index: 1 },
        ]
    );
}

#[test]
fn test_merged_list_never_mixes_parent_and_own_partitions() {
    let merged = merge_topology(
        vec![physical(0), physical(1), physical(2)],
        vec![partition(1, 0), partition(1, 1), partition(1, 2)],
    );
    for device in &merged {
        if let GpuIdentity::Partition { parent, .. } = device.identity {
            assert!(
                !merged
                    .iter()
                    .any(|d| d.identity == GpuIdentity::Physical { index: parent }),
                "parent {parent} must not appear alongside its partitions"
            );
        }
    }
    // Count: physical-without-partitions + total partitions.
    assert_eq!(merged.len(), 2 + 3);
}

#[test]
fn test_order_is_parent_then_partition_ascending() {
    // Deliberately shuffled probe output.
    let merged = merge_topology(
        vec![physical(2), physical(0), physical(1)],
        vec![partition(2, 1), partition(0, 1), partition(2, 0), partition(0, 0)],
    );
    let keys: Vec<String> = merged.iter().map(|d| d.identity.key()).collect();
    assert_eq!(keys, vec!["0:0", "0:1", "1", "2:0", "2:1"]);
}

#[test]
fn test_unsupported_metrics_keep_sentinels() {
    let mut device = physical(0);
    device.utilization_pct = UNSUPPORTED_METRIC;
    device.memory_used_gb = UNSUPPORTED_METRIC;
    device.memory_total_gb = UNSUPPORTED_METRIC;
    let merged = merge_topology(vec![device], vec![]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].utilization_pct, -1.0);
    assert_eq!(merged[0].memory_total_gb, -1.0);
}

#[test]
fn test_empty_probe_yields_empty_list() {
    assert!(merge_topology(vec![], vec![]).is_empty());
}

struct FakeProbe;

impl GpuProbe for FakeProbe {
    fn physical_devices(&self) -> Vec<PhysicalGpu> {
        vec![physical(0)]
    }

    fn partition_devices(&self) -> Vec<PartitionGpu> {
        vec![partition(0, 0)]
    }
}

#[tokio::test]
async fn test_repo_enumerates_through_probe() {
    let repo = GpuRepo::from_probe(Arc::new(FakeProbe));
    assert_eq!(repo.capability(), GpuCapability::Available);
    let devices = repo.get_device_stats().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(
        devices[0].identity,
        GpuIdentity::Partition {
            parent: 0,
            partition: 0
        }
    );
    assert_eq!(devices[0].display_name(), "[0:0] GPU 0 slice 0");
}

#[tokio::test]
async fn test_disabled_repo_reports_unavailable() {
    let repo = GpuRepo::disabled();
    assert_eq!(repo.capability(), GpuCapability::Unavailable);
    assert!(repo.get_device_stats().await.is_err());
}
