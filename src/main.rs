/// Entry point for the dockstats exporter.
///
/// Initializes logging and serves the prometheus scrape endpoint backed by
/// the local docker daemon. Stats are collected on demand, once per scrape.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug cargo run
/// curl localhost:9099/metrics
/// ```
#[tokio::main]
async fn main() {
    env_logger::init();
    dockstats::run().await
}
