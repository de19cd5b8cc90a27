use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Request, RequestError, RequestSettings, Response};

/// Something that can carry one request to its endpoint and bring the
/// response back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single exchange. A response with any status is a
    /// completed exchange; judging the status is up to the caller.
    async fn exchange(&self, request: Request) -> Result<Response, RequestError>;
}

/// Transport over HTTP.
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &RequestSettings) -> Result<Self, RequestError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout_ms) = settings.http_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        Ok(HttpTransport {
            http_client: builder
                .build()
                .map_err(|e| RequestError::TransportUnavailable(e.to_string()))?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: Request) -> Result<Response, RequestError> {
        // UPDATE is not a standard method, so build it from its name
        let method = reqwest::Method::from_bytes(request.verb.as_str().as_bytes())
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let mut builder = self.http_client.request(method, request.endpoint.as_str());
        if let Some(payload) = request.payload {
            builder = builder.body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect::<HashMap<_, _>>();

        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?
            .to_vec();

        #[cfg(feature = "tracing")]
        tracing::debug!("Received status {status} with {} bytes", body.len());

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
