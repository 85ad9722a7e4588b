//! Per-scrape metric families and the snapshot-to-sample mapping.
//!
//! A fresh [`ScrapeMetrics`] is created for every scrape pass and dropped
//! with the response, so samples of removed containers never survive a
//! request. Family handles share their underlying storage: a clone handed
//! to each per-container task writes into the same sample set, and
//! [`Family`] synchronizes those writes internally.

use std::time::Duration;

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use crate::container::ContainerID;
use crate::docker::stats::StatsSnapshot;

/// The label pair shared by every metric of one container: the truncated
/// container id and the primary display name.
#[derive(Debug, Clone)]
pub struct ContainerScope {
    id: String,
    name: String,
}

impl ContainerScope {
    pub fn new(id: &ContainerID, name: impl Into<String>) -> Self {
        Self {
            id: id.short().to_owned(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum CpuMode {
    User,
    Kernel,
    Total,
}

impl EncodeLabelValue for CpuMode {
    fn encode(
        &self,
        encoder: &mut prometheus_client::encoding::LabelValueEncoder,
    ) -> Result<(), std::fmt::Error> {
        use std::fmt::Write;
        encoder.write_str(match self {
            CpuMode::User => "user",
            CpuMode::Kernel => "kernel",
            CpuMode::Total => "total",
        })
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct CpuLabels {
    id: String,
    container_name: String,
    mode: CpuMode,
    cpu: String,
}

impl CpuLabels {
    fn new(scope: &ContainerScope, mode: CpuMode) -> Self {
        Self {
            id: scope.id.clone(),
            container_name: scope.name.clone(),
            mode,
            // Per-core breakdown is not collected; every sample covers all cores.
            cpu: "all".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum MemoryType {
    Active,
    Total,
    Max,
    Limit,
}

impl EncodeLabelValue for MemoryType {
    fn encode(
        &self,
        encoder: &mut prometheus_client::encoding::LabelValueEncoder,
    ) -> Result<(), std::fmt::Error> {
        use std::fmt::Write;
        encoder.write_str(match self {
            MemoryType::Active => "active",
            MemoryType::Total => "total",
            MemoryType::Max => "max",
            MemoryType::Limit => "limit",
        })
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MemoryLabels {
    id: String,
    container_name: String,
    r#type: MemoryType,
}

impl MemoryLabels {
    fn new(scope: &ContainerScope, r#type: MemoryType) -> Self {
        Self {
            id: scope.id.clone(),
            container_name: scope.name.clone(),
            r#type,
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct InterfaceLabels {
    id: String,
    container_name: String,
    name: String,
}

impl InterfaceLabels {
    fn new(scope: &ContainerScope, name: &str) -> Self {
        Self {
            id: scope.id.clone(),
            container_name: scope.name.clone(),
            name: name.to_owned(),
        }
    }
}

/// The metric families populated during one scrape pass.
#[derive(Debug, Clone, Default)]
pub struct ScrapeMetrics {
    cpu_usage: Family<CpuLabels, Counter>,
    memory_usage_bytes: Family<MemoryLabels, Gauge>,
    network_transmit_bytes: Family<InterfaceLabels, Gauge>,
    network_transmit_packets: Family<InterfaceLabels, Gauge>,
    network_transmit_dropped_packets: Family<InterfaceLabels, Gauge>,
    network_transmit_errors: Family<InterfaceLabels, Gauge>,
    network_receive_bytes: Family<InterfaceLabels, Gauge>,
    network_receive_packets: Family<InterfaceLabels, Gauge>,
    network_receive_dropped_packets: Family<InterfaceLabels, Gauge>,
    network_receive_errors: Family<InterfaceLabels, Gauge>,
    scrape_duration: Gauge,
}

impl ScrapeMetrics {
    /// Maps one stats snapshot onto the metric families, labeled for
    /// `scope`.
    ///
    /// Cumulative runtime counters are re-seeded from the snapshot as-is;
    /// computing rates across scrapes is the scraping system's job. Memory
    /// stat keys the snapshot lacks read as zero. One TX/RX sample set is
    /// emitted per interface present in the snapshot.
    pub fn record(&self, scope: &ContainerScope, stats: &StatsSnapshot) {
        let cpu = &stats.cpu_stats.cpu_usage;
        self.cpu_usage
            .get_or_create(&CpuLabels::new(scope, CpuMode::User))
            .inc_by(cpu.usage_in_usermode);
        self.cpu_usage
            .get_or_create(&CpuLabels::new(scope, CpuMode::Kernel))
            .inc_by(cpu.usage_in_kernelmode);
        self.cpu_usage
            .get_or_create(&CpuLabels::new(scope, CpuMode::Total))
            .inc_by(cpu.total_usage);

        let memory = &stats.memory_stats;
        self.memory_usage_bytes
            .get_or_create(&MemoryLabels::new(scope, MemoryType::Active))
            .set(memory.stat("active_anon") as i64);
        self.memory_usage_bytes
            .get_or_create(&MemoryLabels::new(scope, MemoryType::Total))
            .set(memory.stat("hierarchical_memory_limit") as i64);
        self.memory_usage_bytes
            .get_or_create(&MemoryLabels::new(scope, MemoryType::Max))
            .set(memory.max_usage as i64);
        self.memory_usage_bytes
            .get_or_create(&MemoryLabels::new(scope, MemoryType::Limit))
            .set(memory.limit as i64);

        for (name, net) in &stats.networks {
            let labels = InterfaceLabels::new(scope, name);
            self.network_transmit_bytes
                .get_or_create(&labels)
                .set(net.tx_bytes as i64);
            self.network_transmit_packets
                .get_or_create(&labels)
                .set(net.tx_packets as i64);
            self.network_transmit_dropped_packets
                .get_or_create(&labels)
                .set(net.tx_dropped as i64);
            self.network_transmit_errors
                .get_or_create(&labels)
                .set(net.tx_errors as i64);
            self.network_receive_bytes
                .get_or_create(&labels)
                .set(net.rx_bytes as i64);
            self.network_receive_packets
                .get_or_create(&labels)
                .set(net.rx_packets as i64);
            self.network_receive_dropped_packets
                .get_or_create(&labels)
                .set(net.rx_dropped as i64);
            self.network_receive_errors
                .get_or_create(&labels)
                .set(net.rx_errors as i64);
        }
    }

    /// Records how long the full collection pass took.
    pub fn set_duration(&self, elapsed: Duration) {
        self.scrape_duration.set(elapsed.as_millis() as i64);
    }

    /// Registers every family into `registry`.
    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "cpu_usage",
            "Total cpu usage in seconds",
            self.cpu_usage.clone(),
        );
        registry.register(
            "memory_usage_bytes",
            "Total memory usage in bytes",
            self.memory_usage_bytes.clone(),
        );
        registry.register(
            "network_transmit_bytes",
            "Total bytes transmitted",
            self.network_transmit_bytes.clone(),
        );
        registry.register(
            "network_transmit_packets",
            "Total packets transmitted",
            self.network_transmit_packets.clone(),
        );
        registry.register(
            "network_transmit_dropped_packets",
            "Total packets dropped on transmit",
            self.network_transmit_dropped_packets.clone(),
        );
        registry.register(
            "network_transmit_errors",
            "Total transmit errors",
            self.network_transmit_errors.clone(),
        );
        registry.register(
            "network_receive_bytes",
            "Total received bytes",
            self.network_receive_bytes.clone(),
        );
        registry.register(
            "network_receive_packets",
            "Total received packets",
            self.network_receive_packets.clone(),
        );
        registry.register(
            "network_receive_dropped_packets",
            "Total dropped packets on receive",
            self.network_receive_dropped_packets.clone(),
        );
        registry.register(
            "network_receive_errors",
            "Total receive errors",
            self.network_receive_errors.clone(),
        );
        registry.register(
            "scrape_duration_milliseconds",
            "Wall-clock time spent collecting container stats",
            self.scrape_duration.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> ContainerScope {
        let id = ContainerID::new("abcdef1234567890").unwrap();
        ContainerScope::new(&id, "/my-app")
    }

    fn snapshot(data: serde_json::Value) -> StatsSnapshot {
        serde_json::from_value(data).unwrap()
    }

    fn render(metrics: &ScrapeMetrics) -> String {
        let mut registry = Registry::default();
        metrics.register(&mut registry);
        let mut out = String::new();
        prometheus_client::encoding::text::encode(&mut out, &registry).unwrap();
        out
    }

    #[test]
    fn test_cpu_modes_map_to_usage_fields() {
        let metrics = ScrapeMetrics::default();
        let scope = scope();
        metrics.record(
            &scope,
            &snapshot(serde_json::json!({
                "cpu_stats": {"cpu_usage": {
                    "usage_in_usermode": 100,
                    "usage_in_kernelmode": 50,
                    "total_usage": 200
                }}
            })),
        );

        let user = metrics
            .cpu_usage
            .get_or_create(&CpuLabels::new(&scope, CpuMode::User))
            .get();
        let kernel = metrics
            .cpu_usage
            .get_or_create(&CpuLabels::new(&scope, CpuMode::Kernel))
            .get();
        let total = metrics
            .cpu_usage
            .get_or_create(&CpuLabels::new(&scope, CpuMode::Total))
            .get();
        assert_eq!((user, kernel, total), (100, 50, 200));
    }

    #[test]
    fn test_memory_types_map_to_stat_sources() {
        let metrics = ScrapeMetrics::default();
        let scope = scope();
        metrics.record(
            &scope,
            &snapshot(serde_json::json!({
                "memory_stats": {
                    "max_usage": 4096,
                    "limit": 8192,
                    "stats": {"active_anon": 1024, "hierarchical_memory_limit": 2048}
                }
            })),
        );

        let value = |t| {
            metrics
                .memory_usage_bytes
                .get_or_create(&MemoryLabels::new(&scope, t))
                .get()
        };
        assert_eq!(value(MemoryType::Active), 1024);
        assert_eq!(value(MemoryType::Total), 2048);
        assert_eq!(value(MemoryType::Max), 4096);
        assert_eq!(value(MemoryType::Limit), 8192);
    }

    #[test]
    fn test_absent_memory_stat_keys_record_zero() {
        let metrics = ScrapeMetrics::default();
        let scope = scope();
        metrics.record(
            &scope,
            &snapshot(serde_json::json!({"memory_stats": {"max_usage": 4096}})),
        );

        let active = metrics
            .memory_usage_bytes
            .get_or_create(&MemoryLabels::new(&scope, MemoryType::Active))
            .get();
        assert_eq!(active, 0);
    }

    #[test]
    fn test_network_samples_per_present_interface() {
        let metrics = ScrapeMetrics::default();
        let scope = scope();
        metrics.record(
            &scope,
            &snapshot(serde_json::json!({
                "networks": {"eth0": {"tx_bytes": 10, "rx_bytes": 20, "rx_dropped": 3}}
            })),
        );

        let labels = InterfaceLabels::new(&scope, "eth0");
        assert_eq!(
            metrics.network_transmit_bytes.get_or_create(&labels).get(),
            10
        );
        assert_eq!(
            metrics.network_receive_bytes.get_or_create(&labels).get(),
            20
        );
        assert_eq!(
            metrics
                .network_receive_dropped_packets
                .get_or_create(&labels)
                .get(),
            3
        );

        let rendered = render(&metrics);
        assert!(rendered.contains("name=\"eth0\""));
        assert!(!rendered.contains("name=\"eth1\""));
    }

    #[test]
    fn test_labels_carry_truncated_id_and_primary_name() {
        let metrics = ScrapeMetrics::default();
        metrics.record(
            &scope(),
            &snapshot(serde_json::json!({
                "cpu_stats": {"cpu_usage": {"total_usage": 1}}
            })),
        );

        let rendered = render(&metrics);
        assert!(rendered.contains("id=\"abcdef123456\""));
        assert!(!rendered.contains("abcdef1234567890"));
        assert!(rendered.contains("container_name=\"/my-app\""));
        assert!(rendered.contains("mode=\"total\""));
        assert!(rendered.contains("cpu=\"all\""));
    }

    #[test]
    fn test_duration_gauge_rendered_once() {
        let metrics = ScrapeMetrics::default();
        metrics.set_duration(Duration::from_millis(42));

        let rendered = render(&metrics);
        let samples: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("scrape_duration_milliseconds"))
            .collect();
        assert_eq!(samples, vec!["scrape_duration_milliseconds 42"]);
    }
}
