// Linux-specific helpers: /proc/cpuinfo, /proc/diskstats.

/// Read first "model name" from /proc/cpuinfo (Linux). Prefer over sysinfo
/// when it returns "cpu0" etc.
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty() && *s != "cpu0")?;
                return Some(name.to_string());
            }
        }
    }
    None
}

/// System-wide disk byte counters from /proc/diskstats (Linux): sums
/// sectors read/written (fields 6 and 10, 512-byte units) across
/// whole-disk devices. Partition rows are excluded via /sys/block so
/// bytes are not double counted.
pub(super) fn read_diskstats_totals() -> Option<(u64, u64)> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/diskstats").ok()?;
        let mut read_bytes: u64 = 0;
        let mut write_bytes: u64 = 0;
        let mut seen_any = false;
        for line in content.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                continue;
            }
            let name = fields[2];
            if name.starts_with("loop") || name.starts_with("ram") {
                continue;
            }
            // Whole disks appear in /sys/block; partitions do not.
            if !std::path::Path::new(&format!("/sys/block/{name}")).exists() {
                continue;
            }
            let (Ok(sectors_read), Ok(sectors_written)) =
                (fields[5].parse::<u64>(), fields[9].parse::<u64>())
            else {
                continue;
            };
            read_bytes += sectors_read * 512;
            write_bytes += sectors_written * 512;
            seen_any = true;
        }
        if seen_any {
            return Some((read_bytes, write_bytes));
        }
    }
    None
}
