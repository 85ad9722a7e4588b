//! Dockstats: a prometheus exporter for docker container resource usage.
//!
//! On every scrape of `/metrics` the exporter asks the local docker daemon
//! for the running containers, fetches one stats snapshot per container
//! concurrently, and exposes cpu, memory, and network samples labeled by
//! truncated container id and name. Nothing is cached between scrapes;
//! every response reflects exactly one collection pass, so metrics of
//! removed containers disappear with the next request.

pub mod api;
pub mod container;
pub mod docker;
pub mod metrics;
pub mod scrape;

/// Address the scrape endpoint listens on.
const LISTEN_ADDR: &str = "0.0.0.0:9099";

/// Runs the exporter: wires the docker client into the scrape pipeline and
/// serves `/metrics` until the process is stopped.
///
/// The process aborts if the listener cannot bind; a docker daemon that is
/// down merely fails individual scrapes.
pub async fn run() {
    let client = docker::DockerClient::new(docker::DEFAULT_SOCKET_PATH);
    let scraper = scrape::Scraper::new(client);
    log::info!("serving container metrics on {}", LISTEN_ADDR);
    api::APIServer::new(scraper).listen(LISTEN_ADDR).await
}
