/// View Counter Handler — one request in, one response out.
///
/// `OPTIONS` is answered as a CORS preflight without touching the store.
/// Every other request counts a view: read the record, add one, write it
/// back, and return the new total. Failures never escape: they are logged
/// and answered with a 500 that still carries the CORS headers.

pub mod lazy;
pub mod response;

use std::sync::Arc;

use http::Method;
use serde_json::Value;
use tracing::{debug, error, info};
use vercel_runtime::Request;

use crate::config::{CounterConfig, MethodPolicy, WriteMode};
use crate::error::{CounterError, Result};
use crate::event::{resolve_method, MethodPath};
use crate::models::counter::{CounterRecord, DEFAULT_COUNTER_KEY};
use crate::models::response::ProxyResponse;
use crate::store::{build_store, CounterStore};

pub use lazy::LazyCounter;
pub use response::CounterResponse;

/// Per-deployment handler behavior.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub counter_key: String,
    pub write_mode: WriteMode,
    pub method_policy: MethodPolicy,
    /// Where to find the method in JSON invocation events.
    pub method_paths: Vec<MethodPath>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        HandlerSettings {
            counter_key: DEFAULT_COUNTER_KEY.to_string(),
            write_mode: WriteMode::default(),
            method_policy: MethodPolicy::default(),
            method_paths: MethodPath::defaults(),
        }
    }
}

impl From<&CounterConfig> for HandlerSettings {
    fn from(config: &CounterConfig) -> Self {
        HandlerSettings {
            counter_key: config.counter_key.clone(),
            write_mode: config.write_mode,
            method_policy: config.method_policy,
            method_paths: config.method_paths.clone(),
        }
    }
}

/// Counts page views against a shared store.
///
/// Holds no per-invocation state; one instance serves every invocation a
/// process receives.
#[derive(Clone)]
pub struct ViewCounterHandler {
    store: Arc<dyn CounterStore>,
    settings: HandlerSettings,
}

impl ViewCounterHandler {
    pub fn new(store: Arc<dyn CounterStore>, settings: HandlerSettings) -> Self {
        ViewCounterHandler { store, settings }
    }

    /// Builds the handler and its store from configuration.
    pub fn from_config(config: &CounterConfig) -> Self {
        info!(
            backend = %config.backend,
            table = %config.table,
            key = %config.counter_key,
            write_mode = ?config.write_mode,
            method_policy = ?config.method_policy,
            "initialized config"
        );

        Self::new(build_store(config), HandlerSettings::from(config))
    }

    /// Name of the store backend, e.g. "dynamodb".
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Handles one invocation given its method, if one could be determined.
    ///
    /// A missing method is treated like GET.
    pub async fn handle(&self, method: Option<&Method>) -> CounterResponse {
        if method == Some(&Method::OPTIONS) {
            return CounterResponse::preflight();
        }

        if self.settings.method_policy == MethodPolicy::Strict && method != Some(&Method::GET) {
            return CounterResponse::method_not_allowed();
        }

        match self.count_view().await.and_then(CounterResponse::views) {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, key = %self.settings.counter_key, "view counter failed");
                CounterResponse::failure(&err)
            }
        }
    }

    /// Handles a request delivered by the Vercel runtime.
    pub async fn handle_request(&self, req: &Request) -> CounterResponse {
        self.handle(Some(req.method())).await
    }

    /// Handles a raw JSON invocation event, resolving the method through the
    /// configured field paths.
    pub async fn handle_event(&self, event: &Value) -> ProxyResponse {
        let method = resolve_method(event, &self.settings.method_paths);
        self.handle(method.as_ref()).await.into_proxy()
    }

    /// Records one view and returns the new total.
    ///
    /// In overwrite mode this is a read followed by an unconditional write;
    /// two concurrent calls can both read `n` and both write `n + 1`.
    pub async fn count_view(&self) -> Result<u64> {
        let key = self.settings.counter_key.as_str();

        let views = match self.settings.write_mode {
            WriteMode::Atomic => self.store.increment(key).await?,
            WriteMode::Overwrite => {
                let current = self.store.get(key).await?.map_or(0, |record| record.views);
                let views = current.checked_add(1).ok_or(CounterError::Overflow)?;
                self.store.put(&CounterRecord::new(key, views)).await?;
                views
            }
        };

        debug!(views, key, "view counted");
        Ok(views)
    }
}
