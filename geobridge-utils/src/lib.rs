#![doc = include_str!("../README.md")]
use std::borrow::Cow;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::oneshot;

pub mod transport;

pub use transport::{HttpTransport, Transport};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:24242";

/// The only status treated as success.
pub const SUCCESS_STATUS: u16 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    /// Every request goes here.
    pub endpoint: String,
    /// No timeout when unset.
    pub http_timeout_ms: Option<u64>,
}

impl Default for RequestSettings {
    fn default() -> Self {
        RequestSettings {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            http_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Update,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Update => "UPDATE",
            Verb::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verb {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "UPDATE" => Ok(Verb::Update),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(RequestError::UnknownVerb(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("{verb} {endpoint} returned status {status}")]
    Status {
        verb: Verb,
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("request ended without reporting a result")]
    Interrupted,
    #[error("unknown verb: {0}")]
    UnknownVerb(String),
    #[error("On decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One request as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub verb: Verb,
    pub payload: Option<String>,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Header names are lower-case.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(AsRef::as_ref)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Resolves once, when the spawned request finishes.
///
/// Dropping it does not stop the request.
#[must_use = "a completion reports the request outcome only when awaited"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, RequestError>>,
}

impl<T> Future for Completion<T> {
    type Output = Result<T, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx
            .poll_unpin(cx)
            .map(|result| result.unwrap_or(Err(RequestError::Interrupted)))
    }
}

/// Issues requests to the endpoint fixed in its settings.
#[derive(Clone)]
pub struct RequestClient {
    settings: RequestSettings,
    transport: Option<Arc<dyn Transport>>,
}

impl RequestClient {
    /// Client over HTTP. When the HTTP transport cannot be built the client
    /// still exists, but every call fails with
    /// [`RequestError::TransportUnavailable`].
    pub fn new(settings: RequestSettings) -> Self {
        let transport = match HttpTransport::new(&settings) {
            Ok(transport) => Some(Arc::new(transport) as Arc<dyn Transport>),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("HTTP transport unavailable: {_e}");
                None
            }
        };
        RequestClient {
            settings,
            transport,
        }
    }

    pub fn with_transport(settings: RequestSettings, transport: Option<Arc<dyn Transport>>) -> Self {
        RequestClient {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    /// Sends and waits for the response. Any status other than 200 is an
    /// error.
    pub async fn send(&self, verb: Verb, payload: Option<String>) -> Result<Response, RequestError> {
        let transport = self.acquire()?;
        exchange(transport, self.request(verb, payload)).await
    }

    /// Starts the request on the current tokio runtime and returns at once.
    pub fn dispatch(
        &self,
        verb: Verb,
        payload: Option<String>,
    ) -> Result<Completion<Response>, RequestError> {
        self.dispatch_map(verb, payload, |response| response)
    }

    /// Starts the request and calls `on_success` exactly once if it ends
    /// with status 200. The callback is never called otherwise; the
    /// failure comes out of the returned completion instead.
    pub fn dispatch_with<F>(
        &self,
        verb: Verb,
        payload: Option<String>,
        on_success: F,
    ) -> Result<Completion<()>, RequestError>
    where
        F: FnOnce(Response) + Send + 'static,
    {
        self.dispatch_map(verb, payload, on_success)
    }

    fn dispatch_map<T, F>(
        &self,
        verb: Verb,
        payload: Option<String>,
        on_success: F,
    ) -> Result<Completion<T>, RequestError>
    where
        T: Send + 'static,
        F: FnOnce(Response) -> T + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RequestError::TransportUnavailable(e.to_string()))?;
        let transport = self.acquire()?;
        let request = self.request(verb, payload);

        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let result = exchange(transport, request).await.map(on_success);
            // nobody is waiting when the completion was dropped
            let _ = tx.send(result);
        });

        Ok(Completion { rx })
    }

    fn acquire(&self) -> Result<Arc<dyn Transport>, RequestError> {
        self.transport
            .clone()
            .ok_or_else(|| RequestError::TransportUnavailable("no transport".to_owned()))
    }

    fn request(&self, verb: Verb, payload: Option<String>) -> Request {
        Request {
            verb,
            payload,
            endpoint: self.settings.endpoint.clone(),
        }
    }
}

async fn exchange(transport: Arc<dyn Transport>, request: Request) -> Result<Response, RequestError> {
    #[cfg(feature = "tracing")]
    tracing::info!("Try {} {}", request.verb, request.endpoint);

    let verb = request.verb;
    let endpoint = request.endpoint.clone();
    let response = transport.exchange(request).await?;

    if response.status != SUCCESS_STATUS {
        #[cfg(feature = "tracing")]
        tracing::warn!("{verb} {endpoint} returned status {}", response.status);
        return Err(RequestError::Status {
            verb,
            endpoint,
            status: response.status,
            body: response.text().into_owned(),
        });
    }

    Ok(response)
}
