//! Typed model of the daemon's per-container stats response.
//!
//! One [`StatsSnapshot`] is decoded per container per scrape from
//! `GET /containers/{id}/stats?stream=false`. The daemon omits sections it
//! has no data for (for example `networks` for a container on the `none`
//! network), so every field defaults to zero or empty rather than failing
//! the decode.

use std::collections::HashMap;

/// A point-in-time resource usage snapshot for one container.
///
/// Snapshots are fetched fresh on every scrape and never retained.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub cpu_stats: CpuStats,
    #[serde(default)]
    pub memory_stats: MemoryStats,
    /// Per-interface network counters, keyed by interface name.
    #[serde(default)]
    pub networks: HashMap<String, NetworkStats>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub cpu_usage: CpuUsage,
}

/// CPU time consumed since the container started.
///
/// All three counters are cumulative and reset to zero when the container
/// restarts.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CpuUsage {
    /// Kernel plus user mode.
    #[serde(default)]
    pub total_usage: u64,
    #[serde(default)]
    pub usage_in_kernelmode: u64,
    #[serde(default)]
    pub usage_in_usermode: u64,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MemoryStats {
    /// Maximum memory usage ever observed for the container.
    #[serde(default)]
    pub max_usage: u64,
    /// Configured memory limit.
    #[serde(default)]
    pub limit: u64,
    /// Detailed cgroup memory counters keyed by stat name.
    #[serde(default)]
    stats: HashMap<String, u64>,
}

impl MemoryStats {
    /// Looks up a detailed memory counter by its cgroup stat name.
    ///
    /// The set of keys the daemon reports varies with the cgroup version of
    /// the host; an absent key reads as zero.
    pub fn stat(&self, key: &str) -> u64 {
        self.stats.get(key).copied().unwrap_or(0)
    }
}

/// Cumulative network counters for a single interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub rx_packets: u64,
    #[serde(default)]
    pub rx_errors: u64,
    #[serde(default)]
    pub rx_dropped: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default)]
    pub tx_packets: u64,
    #[serde(default)]
    pub tx_errors: u64,
    #[serde(default)]
    pub tx_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_snapshot() {
        let data = r#"{
            "cpu_stats": {
                "cpu_usage": {
                    "total_usage": 200,
                    "usage_in_kernelmode": 50,
                    "usage_in_usermode": 100
                }
            },
            "memory_stats": {
                "max_usage": 4096,
                "limit": 8192,
                "stats": {
                    "active_anon": 1024,
                    "hierarchical_memory_limit": 2048
                }
            },
            "networks": {
                "eth0": {
                    "rx_bytes": 20,
                    "rx_packets": 2,
                    "rx_errors": 0,
                    "rx_dropped": 0,
                    "tx_bytes": 10,
                    "tx_packets": 1,
                    "tx_errors": 0,
                    "tx_dropped": 0
                }
            }
        }"#;
        let snapshot: StatsSnapshot = serde_json::from_str(data).unwrap();
        assert_eq!(snapshot.cpu_stats.cpu_usage.total_usage, 200);
        assert_eq!(snapshot.cpu_stats.cpu_usage.usage_in_kernelmode, 50);
        assert_eq!(snapshot.cpu_stats.cpu_usage.usage_in_usermode, 100);
        assert_eq!(snapshot.memory_stats.max_usage, 4096);
        assert_eq!(snapshot.memory_stats.limit, 8192);
        assert_eq!(snapshot.memory_stats.stat("active_anon"), 1024);
        assert_eq!(snapshot.memory_stats.stat("hierarchical_memory_limit"), 2048);
        let eth0 = &snapshot.networks["eth0"];
        assert_eq!(eth0.tx_bytes, 10);
        assert_eq!(eth0.rx_bytes, 20);
    }

    #[test]
    fn test_missing_sections_decode_to_zero() {
        let snapshot: StatsSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.cpu_stats.cpu_usage.total_usage, 0);
        assert_eq!(snapshot.memory_stats.limit, 0);
        assert!(snapshot.networks.is_empty());
    }

    #[test]
    fn test_absent_memory_stat_key_reads_as_zero() {
        let data = r#"{"memory_stats": {"max_usage": 4096, "stats": {}}}"#;
        let snapshot: StatsSnapshot = serde_json::from_str(data).unwrap();
        assert_eq!(snapshot.memory_stats.stat("active_anon"), 0);
        assert_eq!(snapshot.memory_stats.max_usage, 4096);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let data = r#"{
            "read": "2024-01-01T00:00:00Z",
            "pids_stats": {"current": 3},
            "cpu_stats": {"cpu_usage": {"total_usage": 7}, "system_cpu_usage": 12345}
        }"#;
        let snapshot: StatsSnapshot = serde_json::from_str(data).unwrap();
        assert_eq!(snapshot.cpu_stats.cpu_usage.total_usage, 7);
    }

    #[test]
    fn test_truncated_payload_fails_decode() {
        let result = serde_json::from_str::<StatsSnapshot>(r#"{"cpu_stats": {"#);
        assert!(result.is_err());
    }
}
