//! System statistics collectors for the native sampler.
//!
//! Reads the counters the native sampler turns into per-interval values.
//!
//! # Data Sources
//!
//! - `/proc/stat` - CPU time breakdown
//! - `/proc/diskstats` - Block device I/O statistics
//! - `/proc/meminfo` - Buffer and page cache sizes
//! - `/sys/class/hwmon/*/temp*` - Hardware temperatures
//!
//! Each reader has a `parse_*` counterpart working on the file contents.

/// Size of a sector as reported by `/proc/diskstats`.
const SECTOR_SIZE: u64 = 512;

/// Cumulative CPU time breakdown from `/proc/stat`, in jiffies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

/// Cumulative sector counters summed over whole-disk devices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub sectors_read: u64,
    pub sectors_written: u64,
}

/// Cache sizes from `/proc/meminfo`, in bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub buffers: u64,
    pub cached: u64,
}

/// CPU usage split into the four columns of a capture, in percent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuUsage {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub wait: f64,
}

/// Read CPU times from `/proc/stat`.
pub fn read_cpu_times() -> Option<CpuTimes> {
    parse_cpu_times(&std::fs::read_to_string("/proc/stat").ok()?)
}

/// Parse the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_times(content: &str) -> Option<CpuTimes> {
    let line = content.lines().find(|l| l.starts_with("cpu "))?;
    let parts: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|s| s.parse().unwrap_or(0))
        .collect();
    if parts.len() < 7 {
        return None;
    }

    Some(CpuTimes {
        user: parts[0],
        nice: parts[1],
        system: parts[2],
        idle: parts[3],
        iowait: parts[4],
        irq: parts[5],
        softirq: parts[6],
        steal: parts.get(7).copied().unwrap_or(0),
    })
}

/// Read disk sector counters from `/proc/diskstats`.
pub fn read_disk_stats() -> Option<DiskStats> {
    Some(parse_disk_stats(
        &std::fs::read_to_string("/proc/diskstats").ok()?,
    ))
}

/// Sum sector counters over whole-disk devices (sda, nvme0n1, vda, xvda).
///
/// Partitions are skipped so their I/O is not counted twice.
pub fn parse_disk_stats(content: &str) -> DiskStats {
    let mut stats = DiskStats::default();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            continue;
        }

        let device = parts[2];
        let is_disk = (device.starts_with("sd") && device.len() == 3)
            || (device.starts_with("nvme") && device.contains('n') && !device.contains('p'))
            || (device.starts_with("vd") && device.len() == 3)
            || (device.starts_with("xvd") && device.len() == 4);

        if is_disk {
            stats.sectors_read += parts[5].parse::<u64>().unwrap_or(0);
            stats.sectors_written += parts[9].parse::<u64>().unwrap_or(0);
        }
    }

    stats
}

/// Read buffer and page cache sizes from `/proc/meminfo`.
pub fn read_meminfo() -> MemInfo {
    std::fs::read_to_string("/proc/meminfo")
        .map(|content| parse_meminfo(&content))
        .unwrap_or_default()
}

/// Parse `Buffers` and `Cached` out of `/proc/meminfo`.
pub fn parse_meminfo(content: &str) -> MemInfo {
    let mut info = MemInfo::default();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let bytes = value.parse::<u64>().unwrap_or(0) * 1024;
        match key {
            "Buffers:" => info.buffers = bytes,
            "Cached:" => info.cached = bytes,
            _ => {}
        }
    }

    info
}

/// Read the CPU temperature in Celsius from hwmon.
///
/// Prefers the first CPU package sensor (coretemp, k10temp, zenpower) and
/// falls back to the hottest sensor found.
pub fn read_temperature() -> Option<f64> {
    let mut cpu_temp: Option<f64> = None;
    let mut max_temp: Option<f64> = None;

    let entries = std::fs::read_dir("/sys/class/hwmon").ok()?;
    for entry in entries.flatten() {
        let path = entry.path();

        let name = std::fs::read_to_string(path.join("name")).unwrap_or_default();
        let is_cpu =
            name.contains("coretemp") || name.contains("k10temp") || name.contains("zenpower");

        for i in 1..=20 {
            let temp_path = path.join(format!("temp{}_input", i));
            if let Ok(temp_str) = std::fs::read_to_string(&temp_path) {
                if let Ok(temp_millic) = temp_str.trim().parse::<i64>() {
                    let temp = temp_millic as f64 / 1000.0;

                    if is_cpu && cpu_temp.is_none() {
                        cpu_temp = Some(temp);
                    }

                    max_temp = Some(max_temp.map_or(temp, |m: f64| m.max(temp)));
                }
            }
        }
    }

    cpu_temp.or(max_temp)
}

impl CpuTimes {
    /// Calculate the difference between two CPU time snapshots.
    pub fn delta(&self, other: &Self) -> Self {
        Self {
            user: other.user.saturating_sub(self.user),
            nice: other.nice.saturating_sub(self.nice),
            system: other.system.saturating_sub(self.system),
            idle: other.idle.saturating_sub(self.idle),
            iowait: other.iowait.saturating_sub(self.iowait),
            irq: other.irq.saturating_sub(self.irq),
            softirq: other.softirq.saturating_sub(self.softirq),
            steal: other.steal.saturating_sub(self.steal),
        }
    }

    /// Share of each bucket in this (delta) snapshot.
    ///
    /// Nice time counts as user time, interrupt time as system time.
    pub fn usage(&self) -> CpuUsage {
        let total = self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal;
        if total == 0 {
            return CpuUsage::default();
        }

        let pct = |v: u64| v as f64 * 100.0 / total as f64;
        CpuUsage {
            user: pct(self.user + self.nice),
            system: pct(self.system + self.irq + self.softirq),
            idle: pct(self.idle),
            wait: pct(self.iowait),
        }
    }
}

impl DiskStats {
    /// Calculate the difference between two disk stats snapshots.
    pub fn delta(&self, other: &Self) -> Self {
        Self {
            sectors_read: other.sectors_read.saturating_sub(self.sectors_read),
            sectors_written: other.sectors_written.saturating_sub(self.sectors_written),
        }
    }

    pub fn read_bytes(&self) -> u64 {
        self.sectors_read * SECTOR_SIZE
    }

    pub fn written_bytes(&self) -> u64 {
        self.sectors_written * SECTOR_SIZE
    }
}
