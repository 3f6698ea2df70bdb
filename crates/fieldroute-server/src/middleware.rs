use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const API_KEYS_VAR: &str = "FIELDROUTE_API_KEYS";
const ANONYMOUS_CLIENT: &str = "anonymous";

/// Request ID stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Rate-limit key set by [`require_bearer_auth`]: the accepted bearer token,
/// or [`ANONYMOUS_CLIENT`] when auth is disabled.
#[derive(Debug, Clone)]
struct ClientKey(String);

/// Bearer-token auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `FIELDROUTE_API_KEYS`.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    /// Builds auth config from a comma-separated list of bearer tokens.
    ///
    /// An empty list disables auth in development and is an error anywhere
    /// else.
    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let keys: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!("{API_KEYS_VAR} not set; bearer auth disabled in development");
                return Ok(Self {
                    api_keys: Arc::new(HashSet::new()),
                    enabled: false,
                });
            }
            anyhow::bail!("{API_KEYS_VAR} is required outside development");
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    fn allows(&self, token: &str) -> bool {
        self.api_keys.contains(token)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: usize,
}

/// Fixed-window request limiter, counted separately per accepted bearer
/// token.
///
/// Requests without an accepted token share one window. Expired windows are
/// dropped on the next admission.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records one request for `client`; `false` once its window is full.
    async fn admit(&self, client: &str) -> bool {
        let mut clients = self.clients.lock().await;
        let now = Instant::now();
        clients.retain(|_, w| now.duration_since(w.started_at) < self.window);
        let window = clients.entry(client.to_owned()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Uses the incoming `x-request-id` header or generates a `UUIDv4`, stores it
/// as a [`RequestId`] extension, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}

pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        req.extensions_mut()
            .insert(ClientKey(ANONYMOUS_CLIENT.to_owned()));
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => {
            let key = ClientKey(token.to_owned());
            req.extensions_mut().insert(key);
            next.run(req).await
        }
        _ => {
            tracing::debug!(path = %req.uri().path(), "rejected request without valid bearer token");
            ApiError::new(
                request_id_of(&req),
                "unauthorized",
                "missing or invalid bearer token",
            )
            .into_response()
        }
    }
}

/// Runs inside [`require_bearer_auth`]; requests it did not tag count as
/// anonymous.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = req
        .extensions()
        .get::<ClientKey>()
        .map_or_else(|| ANONYMOUS_CLIENT.to_owned(), |key| key.0.clone());

    if rate_limit.admit(&client).await {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "rate limit exceeded");
        ApiError::new(request_id_of(&req), "rate_limited", "rate limit exceeded").into_response()
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
