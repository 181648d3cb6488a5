//! Dispatch: forwards "fire event" requests to the game server.
//!
//! Handlers only see `Arc<dyn DispatchSink>`; the HTTP implementation is swapped for an
//! in-memory recorder in tests. Fire-and-forget: the game server's reply body is ignored.
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DISPATCH_ACTION: &str = "forceevent";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Game server rejected the event (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Game server unavailable after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// A request to fire one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceEventRequest {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default = "default_announce")]
    pub announce: bool,
}

fn default_announce() -> bool {
    true
}

/// Acknowledgement returned once the game server accepted the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchReceipt {
    pub request_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: String,
    pub announce: bool,
}

#[derive(Debug, Serialize)]
struct DispatchEnvelope<'a> {
    action: &'a str,
    params: &'a ForceEventRequest,
    request_id: Uuid,
    requested_at: DateTime<Utc>,
}

/// Where fire requests go. Carried in `AppState` as `Arc<dyn DispatchSink>`.
#[async_trait]
pub trait DispatchSink: Send + Sync {
    async fn fire(&self, request: &ForceEventRequest) -> Result<DispatchReceipt, DispatchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpDispatchSink
// ────────────────────────────────────────────────────────────────────────────

/// POSTs a JSON envelope to the game server's dispatch endpoint.
/// Retries on 429, 5xx and transport errors with exponential backoff.
#[derive(Clone)]
pub struct HttpDispatchSink {
    client: Client,
    url: String,
    token: Option<String>,
    retry_base: Duration,
}

impl HttpDispatchSink {
    pub fn new(url: String, token: Option<String>) -> Result<Self, DispatchError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            url,
            token,
            retry_base: RETRY_BASE,
        })
    }

    #[cfg(test)]
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DispatchSink for HttpDispatchSink {
    async fn fire(&self, request: &ForceEventRequest) -> Result<DispatchReceipt, DispatchError> {
        let envelope = DispatchEnvelope {
            action: DISPATCH_ACTION,
            params: request,
            request_id: Uuid::new_v4(),
            requested_at: Utc::now(),
        };

        let mut last_error: Option<DispatchError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: base, 2x base
                let delay = self.retry_base * (1 << (attempt - 1));
                warn!(
                    "Dispatch attempt {} for {} failed, retrying after {}ms...",
                    attempt,
                    request.event_type,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut builder = self.client.post(&self.url).json(&envelope);
            if let Some(token) = &self.token {
                builder = builder.bearer_auth(token);
            }

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(DispatchError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Dispatch endpoint returned {}: {}", status, body);
                last_error = Some(DispatchError::Rejected {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(DispatchError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(request_id = %envelope.request_id, "dispatch accepted on attempt {}", attempt + 1);
            info!(
                event_type = %request.event_type,
                announce = request.announce,
                "Event forwarded to game server"
            );

            return Ok(DispatchReceipt {
                request_id: envelope.request_id,
                event_type: request.event_type.clone(),
                announce: request.announce,
            });
        }

        match last_error {
            Some(DispatchError::Rejected { .. }) | None => Err(DispatchError::Exhausted {
                attempts: MAX_RETRIES,
            }),
            Some(err) => Err(err),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test support
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeServer {
        hits: Arc<AtomicU32>,
        fail_first: u32,
        status_when_failing: u16,
        bodies: Arc<Mutex<Vec<Value>>>,
        auth: Arc<Mutex<Option<String>>>,
    }

    async fn fake_dispatch(
        State(server): State<FakeServer>,
        headers: axum::http::HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let hit = server.hits.fetch_add(1, Ordering::SeqCst);
        server.bodies.lock().unwrap().push(body);
        *server.auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if hit < server.fail_first {
            StatusCode::from_u16(server.status_when_failing).unwrap()
        } else {
            StatusCode::OK
        }
    }

    async fn spawn(server: FakeServer) -> String {
        let app = Router::new()
            .route("/dispatch", post(fake_dispatch))
            .with_state(server);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/dispatch")
    }

    fn request() -> ForceEventRequest {
        ForceEventRequest {
            event_type: "/datum/round_event_control/meteor_wave".to_string(),
            announce: false,
        }
    }

    #[tokio::test]
    async fn test_fire_posts_envelope() {
        let server = FakeServer::default();
        let url = spawn(server.clone()).await;
        let sink = HttpDispatchSink::new(url, Some("secret".to_string())).unwrap();

        let receipt = sink.fire(&request()).await.unwrap();
        assert_eq!(receipt.event_type, request().event_type);
        assert!(!receipt.announce);

        let bodies = server.bodies.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["action"], "forceevent");
        assert_eq!(bodies[0]["params"]["type"], request().event_type);
        assert_eq!(bodies[0]["params"]["announce"], false);
        assert_eq!(bodies[0]["request_id"], receipt.request_id.to_string());
        assert_eq!(
            server.auth.lock().unwrap().as_deref(),
            Some("Bearer secret")
        );
    }

    #[tokio::test]
    async fn test_fire_retries_server_errors() {
        let server = FakeServer {
            fail_first: 2,
            status_when_failing: 503,
            ..FakeServer::default()
        };
        let url = spawn(server.clone()).await;
        let sink = HttpDispatchSink::new(url, None)
            .unwrap()
            .with_retry_base(Duration::from_millis(5));

        assert!(sink.fire(&request()).await.is_ok());
        assert_eq!(server.hits.load(Ordering::SeqCst), 3);
        assert_eq!(server.auth.lock().unwrap().as_deref(), None);
    }

    #[tokio::test]
    async fn test_fire_gives_up_after_max_retries() {
        let server = FakeServer {
            fail_first: u32::MAX,
            status_when_failing: 500,
            ..FakeServer::default()
        };
        let url = spawn(server.clone()).await;
        let sink = HttpDispatchSink::new(url, None)
            .unwrap()
            .with_retry_base(Duration::from_millis(5));

        let err = sink.fire(&request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Exhausted { attempts: 3 }));
        assert_eq!(server.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fire_does_not_retry_client_errors() {
        let server = FakeServer {
            fail_first: u32::MAX,
            status_when_failing: 400,
            ..FakeServer::default()
        };
        let url = spawn(server.clone()).await;
        let sink = HttpDispatchSink::new(url, None).unwrap();

        let err = sink.fire(&request()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Rejected { status: 400, .. }));
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_announce_defaults_true() {
        let req: ForceEventRequest = serde_json::from_str(r#"{"type":"ion_storm"}"#).unwrap();
        assert!(req.announce);
    }
}
