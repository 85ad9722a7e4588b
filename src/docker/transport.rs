//! Minimal HTTP/1 transport for the docker daemon's unix socket.
//!
//! The daemon speaks plain HTTP over `/var/run/docker.sock`. Every request
//! opens a fresh connection, so no pooled state outlives a single scrape.

use std::path::Path;

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper_util::rt::TokioIo;

use super::error::{Error, Result};

/// Issues `GET {uri}` against the daemon socket and decodes the JSON
/// response body into `T`.
pub(super) async fn get_json<T>(socket: &Path, uri: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let stream = tokio::net::UnixStream::connect(socket)
        .await
        .map_err(|source| Error::Connect {
            path: socket.to_path_buf(),
            source,
        })?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(Error::Handshake)?;
    // The connection task ends once the response body has been read.
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            log::debug!("docker connection terminated: {err}");
        }
    });

    let request = hyper::Request::builder()
        .method("GET")
        .uri(uri)
        .header(hyper::header::HOST, "docker")
        .body(Empty::<Bytes>::new())
        .map_err(|source| Error::InvalidRequest {
            uri: uri.to_owned(),
            source,
        })?;

    let response = sender.send_request(request).await.map_err(Error::Request)?;
    if !response.status().is_success() {
        return Err(Error::UnexpectedStatus {
            status: response.status(),
            uri: uri.to_owned(),
        });
    }

    let body = response
        .into_body()
        .collect()
        .await
        .map_err(Error::Body)?
        .to_bytes();

    serde_json::from_slice(&body).map_err(Error::Decode)
}
