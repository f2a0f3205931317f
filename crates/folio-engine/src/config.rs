//! Engine configuration and per-call dependencies.

use folio_core::content::AdapterRegistry;
use folio_core::events::{NoopVersionEventSink, VersionEventSink};
use folio_core_types::RequestContext;
use folio_store::db::DEFAULT_BUSY_TIMEOUT_MS;

/// Tunables for write operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Extra attempts after a `ConcurrentModification` failure
    pub max_retries: u32,
    /// Base delay between attempts; attempt `n` waits `n * retry_backoff_ms`
    pub retry_backoff_ms: u64,
    /// How long a connection waits on the SQLite write lock
    pub busy_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 10,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Everything a versioning operation needs besides the connection
pub struct EngineContext<'a> {
    pub adapters: &'a AdapterRegistry,
    pub config: EngineConfig,
    pub events: &'a dyn VersionEventSink,
    pub request: RequestContext,
}

impl<'a> EngineContext<'a> {
    /// Default config, no event listener, fresh request id
    pub fn new(adapters: &'a AdapterRegistry) -> Self {
        Self {
            adapters,
            config: EngineConfig::default(),
            events: &NoopVersionEventSink,
            request: RequestContext::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: &'a dyn VersionEventSink) -> Self {
        self.events = events;
        self
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }
}
