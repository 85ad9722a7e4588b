//! Client for the docker daemon's container API.
//!
//! This module covers the two operations the exporter needs from the
//! runtime: enumerating the running containers and fetching a single,
//! non-streamed stats snapshot for one of them. Both are exposed through
//! the [`ContainerRuntime`] trait so the scrape pipeline can be exercised
//! against a fake runtime in tests; [`DockerClient`] is the production
//! implementation talking HTTP over the daemon's unix socket.

mod error;
pub mod stats;
mod transport;

use std::path::PathBuf;

pub use error::{Error, Result};
pub use stats::StatsSnapshot;

/// Default path of the docker daemon's unix socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// A container runtime that can enumerate running containers and report
/// point-in-time resource usage for each of them.
pub trait ContainerRuntime: Send + Sync + 'static {
    /// Lists the currently running containers.
    fn list_containers(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ContainerSummary>>> + Send;

    /// Fetches a single stats snapshot for the given container.
    ///
    /// A response that cannot be decoded counts as a failed fetch.
    fn stats_snapshot(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<StatsSnapshot>> + Send;
}

/// One entry of the daemon's container listing.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Names", default)]
    names: Vec<String>,
}

impl ContainerSummary {
    pub fn new(id: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            id: id.into(),
            names,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The primary display name, reported by the daemon with a leading `/`
    /// and listed before any aliases.
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

/// Talks to a local docker daemon over its unix socket.
#[derive(Debug, Clone)]
pub struct DockerClient {
    socket: PathBuf,
}

impl DockerClient {
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
        }
    }
}

impl ContainerRuntime for DockerClient {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        transport::get_json(&self.socket, "/containers/json").await
    }

    async fn stats_snapshot(&self, id: &str) -> Result<StatsSnapshot> {
        let uri = format!("/containers/{id}/stats?stream=false");
        transport::get_json(&self.socket, &uri).await
    }
}
