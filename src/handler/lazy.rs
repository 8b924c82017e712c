use http::Method;
use tokio::sync::OnceCell;
use tracing::error;
use vercel_runtime::Request;

use crate::config::CounterConfig;
use crate::error::Result;
use crate::handler::{CounterResponse, ViewCounterHandler};

/// Process-wide view counter, built on the first invocation that needs it.
///
/// A failed build leaves the slot empty, so the next invocation tries again.
pub struct LazyCounter {
    cell: OnceCell<ViewCounterHandler>,
}

impl LazyCounter {
    pub const fn new() -> Self {
        LazyCounter {
            cell: OnceCell::const_new(),
        }
    }

    /// Returns the counter, building it with `build` if this is the first use.
    pub async fn get_or_build<F>(&self, build: F) -> Result<&ViewCounterHandler>
    where
        F: FnOnce() -> Result<ViewCounterHandler>,
    {
        self.cell.get_or_try_init(move || async move { build() }).await
    }

    /// Answers one request.
    ///
    /// Preflight is answered before anything is built, so CORS keeps working
    /// when the configuration is broken.
    pub async fn respond<F>(&self, req: &Request, build: F) -> CounterResponse
    where
        F: FnOnce() -> Result<ViewCounterHandler>,
    {
        if *req.method() == Method::OPTIONS {
            return CounterResponse::preflight();
        }

        match self.get_or_build(build).await {
            Ok(counter) => counter.handle_request(req).await,
            Err(err) => {
                error!(error = %err, "view counter unavailable");
                CounterResponse::failure(&err)
            }
        }
    }
}

impl Default for LazyCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the counter from the process environment.
pub fn counter_from_env() -> Result<ViewCounterHandler> {
    let config = CounterConfig::from_env()?;
    Ok(ViewCounterHandler::from_config(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_BACKEND, ENV_WRITE_MODE};
    use crate::models::response::{ErrorBody, CORS_HEADERS};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vercel_runtime::{Body, StatusCode};

    fn counter_from(vars: &[(&str, &str)]) -> Result<ViewCounterHandler> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let config = CounterConfig::from_lookup(|name| vars.get(name).cloned())?;
        Ok(ViewCounterHandler::from_config(&config))
    }

    fn request(method: Method) -> Request {
        http::Request::builder()
            .method(method)
            .uri("/api/views")
            .body(Body::Empty)
            .unwrap()
    }

    const MEMORY: &[(&str, &str)] = &[(ENV_BACKEND, "memory")];
    const BAD_WRITE_MODE: &[(&str, &str)] = &[(ENV_BACKEND, "memory"), (ENV_WRITE_MODE, "cas")];

    #[tokio::test]
    async fn test_preflight_answers_even_with_bad_config() {
        let counter = LazyCounter::new();
        let builds = AtomicUsize::new(0);

        let response = counter
            .respond(&request(Method::OPTIONS), || {
                builds.fetch_add(1, Ordering::SeqCst);
                counter_from(BAD_WRITE_MODE)
            })
            .await;

        assert_eq!(response, CounterResponse::preflight());
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        let response = response.into_http().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().len(), CORS_HEADERS.len());
    }

    #[tokio::test]
    async fn test_build_failure_is_500_with_cors_headers() {
        let counter = LazyCounter::new();

        let response = counter
            .respond(&request(Method::GET), || counter_from(BAD_WRITE_MODE))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body.error, "invalid configuration: unknown write mode 'cas'");

        let response = response.into_http().unwrap();
        for (name, value) in CORS_HEADERS {
            assert_eq!(response.headers()[name], value, "{name} missing on init failure");
        }
    }

    #[tokio::test]
    async fn test_retries_build_after_failure() {
        let counter = LazyCounter::new();

        let failed = counter
            .respond(&request(Method::GET), || counter_from(BAD_WRITE_MODE))
            .await;
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);

        let counted = counter
            .respond(&request(Method::GET), || counter_from(MEMORY))
            .await;
        assert_eq!(counted.status, StatusCode::OK);
        assert_eq!(counted.body, r#"{"views":1}"#);
    }

    #[tokio::test]
    async fn test_builds_once_and_reuses_store() {
        let counter = LazyCounter::new();
        let builds = AtomicUsize::new(0);
        let build = || {
            builds.fetch_add(1, Ordering::SeqCst);
            counter_from(MEMORY)
        };

        let first = counter.respond(&request(Method::GET), build).await;
        let second = counter.respond(&request(Method::GET), build).await;

        assert_eq!(first.body, r#"{"views":1}"#);
        assert_eq!(second.body, r#"{"views":2}"#);
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reports_store_backend() {
        let counter = LazyCounter::new();
        let built = counter.get_or_build(|| counter_from(MEMORY)).await.unwrap();
        assert_eq!(built.backend(), "memory");
    }
}
