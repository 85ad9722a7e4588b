/// Hard failure of a whole scrape pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list running containers: {0}")]
    ListContainers(#[source] crate::docker::Error),
}

/// Failure of a single container's collection branch.
///
/// Never aborts the scrape; the container is logged and omitted.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    InvalidID(#[from] crate::container::Error),
    #[error("container has no display name")]
    MissingName,
    #[error("failed to fetch stats snapshot: {0}")]
    Stats(#[from] crate::docker::Error),
}
