// Per-disk I/O rate policy: forced-zero pseudo-partitions and the
// proportional estimate for disks without native counters.
// Pure over model types; exposed for unit tests.

use crate::models::DiskStats;

/// Mounts that report capacity but whose I/O rates are forced to exactly
/// zero (firmware/boot partitions). I/O on these is not meaningful and the
/// proportional estimate would only inject noise into them.
pub fn is_zero_io_mount(mount: &str, zero_io_mounts: &[String]) -> bool {
    zero_io_mounts.iter().any(|z| {
        let z = z.trim_end_matches('/');
        !z.is_empty() && (mount == z || mount.starts_with(&format!("{z}/")))
    })
}

/// Distribute the system-wide rate across disks flagged `is_estimated`,
/// proportionally to each disk's share of total capacity among the *other*
/// estimated disks.
///
/// This is the original heuristic, preserved as an approximation rather
/// than corrected: with a single estimated disk the denominator is zero
/// and the share stays 0. Callers label the result via `is_estimated` so
/// the shell can render it distinctly.
pub fn distribute_estimated_rates(
    disks: &mut [DiskStats],
    system_read_mbps: f64,
    system_write_mbps: f64,
) {
    let estimated_capacity: u64 = disks
        .iter()
        .filter(|d| d.is_estimated)
        .map(|d| d.total_space)
        .sum();

    for disk in disks.iter_mut().filter(|d| d.is_estimated) {
        let other_capacity = estimated_capacity.saturating_sub(disk.total_space);
        if other_capacity == 0 {
            disk.read_mbps = 0.0;
            disk.write_mbps = 0.0;
            continue;
        }
        let share = disk.total_space as f64 / other_capacity as f64;
        disk.read_mbps = system_read_mbps * share;
        disk.write_mbps = system_write_mbps * share;
    }
}
