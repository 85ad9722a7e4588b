//! The per-scrape collection pipeline.
//!
//! Each scrape lists the running containers, fans out one task per
//! container to fetch and map its stats snapshot, joins them all, and
//! assembles a fresh registry. Failure of one container's branch never
//! aborts or corrupts its siblings; only a failed container listing kills
//! the whole pass.

mod error;

use std::sync::Arc;
use std::time::Instant;

use prometheus_client::registry::Registry;

pub use error::{CollectError, Error};

use crate::container::ContainerID;
use crate::docker::{ContainerRuntime, ContainerSummary};
use crate::metrics::{ContainerScope, ScrapeMetrics};

/// Collects one registry's worth of container metrics per call.
pub struct Scraper<R> {
    runtime: Arc<R>,
}

impl<R> Clone for Scraper<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<R: ContainerRuntime> Scraper<R> {
    pub fn new(runtime: R) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }

    /// Runs one full collection pass and returns the populated registry.
    ///
    /// # Errors
    ///
    /// Fails only when the container listing itself fails. A container
    /// whose stats cannot be fetched or decoded is logged and omitted
    /// while its siblings proceed.
    pub async fn scrape(&self) -> Result<Registry, Error> {
        let start = Instant::now();
        let containers = self
            .runtime
            .list_containers()
            .await
            .map_err(Error::ListContainers)?;
        log::debug!(
            target: "scrape",
            "collecting stats for {} running containers",
            containers.len()
        );

        let metrics = ScrapeMetrics::default();
        let mut tasks = Vec::with_capacity(containers.len());
        for container in containers {
            let runtime = Arc::clone(&self.runtime);
            let metrics = metrics.clone();
            tasks.push(tokio::spawn(async move {
                if let Err(err) =
                    collect_container(runtime.as_ref(), &metrics, &container).await
                {
                    log::error!(
                        target: "scrape",
                        "skipping container: id={}, error={}",
                        container.id(),
                        err
                    );
                }
            }));
        }
        for task in tasks {
            task.await.expect("collection task panicked");
        }

        metrics.set_duration(start.elapsed());
        let mut registry = Registry::default();
        metrics.register(&mut registry);
        Ok(registry)
    }
}

/// Fetches one container's snapshot and records its metrics.
///
/// Nothing is written before the snapshot has been fetched and decoded in
/// full, so a container either contributes its complete sample set or
/// nothing at all.
async fn collect_container<R: ContainerRuntime>(
    runtime: &R,
    metrics: &ScrapeMetrics,
    container: &ContainerSummary,
) -> Result<(), CollectError> {
    let id = ContainerID::new(container.id())?;
    let name = container.primary_name().ok_or(CollectError::MissingName)?;
    log::debug!(target: "scrape", "fetching stats: id={}, name={}", id.short(), name);
    let snapshot = runtime.stats_snapshot(container.id()).await?;
    metrics.record(&ContainerScope::new(&id, name), &snapshot);
    Ok(())
}
