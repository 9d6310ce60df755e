use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath},
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use tower::{Layer, Service};

use crate::error::AppError;

const WINDOW: Duration = Duration::from_secs(60);
const FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Limited { retry_after: Duration },
}

/// Decides whether a request identified by `key` may proceed. Implementations
/// backed by an external store can be dropped into `AppState::with_admission`.
#[async_trait]
pub trait AdmissionControl: Send + Sync {
    async fn check(&self, key: &str) -> Admission;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// In-process fixed window counter: at most `limit` requests per key in each
/// window.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// `None` when the limit is zero, which disables admission control.
    pub fn per_minute(limit: u32) -> Option<Self> {
        (limit > 0).then(|| Self::new(limit, WINDOW))
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> Admission {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, window| now.saturating_duration_since(window.started_at) < self.window);

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if window.count >= self.limit {
            let elapsed = now.saturating_duration_since(window.started_at);
            return Admission::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }
        window.count += 1;
        Admission::Allowed
    }
}

#[async_trait]
impl AdmissionControl for FixedWindowLimiter {
    async fn check(&self, key: &str) -> Admission {
        self.check_at(key, Instant::now()).await
    }
}

/// Whole seconds a client should wait, never less than one.
pub fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

fn client_address(req: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "anonymous".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Keys requests by the matched route template and the client address, so
/// each route has its own budget per client.
pub fn admission_key(req: &Request<Body>) -> String {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    format!("{route}|{}", client_address(req))
}

#[derive(Clone)]
pub struct AdmissionLayer {
    control: Arc<dyn AdmissionControl>,
}

impl AdmissionLayer {
    pub fn new(control: Arc<dyn AdmissionControl>) -> Self {
        Self { control }
    }
}

#[derive(Clone)]
pub struct AdmissionService<S> {
    inner: S,
    control: Arc<dyn AdmissionControl>,
}

impl<S> Layer<S> for AdmissionLayer {
    type Service = AdmissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdmissionService {
            inner,
            control: Arc::clone(&self.control),
        }
    }
}

impl<S> Service<Request<Body>> for AdmissionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let control = Arc::clone(&self.control);
        let clone = self.inner.clone();
        // The clone may not be ready; keep the one that was polled.
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let key = admission_key(&req);
            match control.check(&key).await {
                Admission::Allowed => inner.call(req).await,
                Admission::Limited { retry_after } => {
                    tracing::warn!(%key, "admission denied");
                    Ok(AppError::too_many_requests(retry_after_secs(retry_after)).into_response())
                }
            }
        })
    }
}
