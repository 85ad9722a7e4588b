use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect to docker socket `{path}`: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("http handshake with the docker daemon failed: {0}")]
    Handshake(#[source] hyper::Error),
    #[error("invalid docker api request `{uri}`: {source}")]
    InvalidRequest {
        uri: String,
        #[source]
        source: hyper::http::Error,
    },
    #[error("docker api request failed: {0}")]
    Request(#[source] hyper::Error),
    #[error("docker api returned status {status} for `{uri}`")]
    UnexpectedStatus {
        status: hyper::StatusCode,
        uri: String,
    },
    #[error("failed to read docker api response body: {0}")]
    Body(#[source] hyper::Error),
    #[error("failed to decode docker api response: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
