//! Application state wiring the chat service to its backends.
//!
//! `ChatService` is generic over store and worker; AppState pins it to the
//! type-erased wrappers so the backend (Redis or memory) can be chosen from
//! configuration at startup, and tests can inject their own.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use chatgate_core::chat::service::ChatService;
use chatgate_core::history::box_store::BoxHistoryStore;
use chatgate_core::history::memory::InMemoryHistoryStore;
use chatgate_core::worker::box_worker::BoxWorker;
use chatgate_infra::redis::{connect, RedisHistoryStore};
use chatgate_infra::worker::SubprocessWorker;
use chatgate_types::config::{GatewayConfig, StoreBackend};

/// How often the in-memory backend reclaims expired sessions.
const MEMORY_SWEEP_PERIOD: Duration = Duration::from_secs(60);

pub type ConcreteChatService = ChatService<BoxHistoryStore, BoxWorker>;

/// Shared state handed to every request handler and CLI command.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Connect to the configured history backend and build the worker.
    ///
    /// The Redis connection is opened once here and shared by all requests.
    pub async fn init(config: GatewayConfig) -> anyhow::Result<Self> {
        let ttl = Duration::from_secs(config.redis.session_ttl_secs);

        let store = match config.store.backend {
            StoreBackend::Redis => {
                let conn = connect(&config.redis)
                    .await
                    .with_context(|| format!("Failed to connect to {}", config.redis.url()))?;
                BoxHistoryStore::new(RedisHistoryStore::new(conn, ttl))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory history store; sessions are lost on restart");
                let store = InMemoryHistoryStore::new(ttl);
                store.spawn_expiry_sweeper(MEMORY_SWEEP_PERIOD.min(ttl));
                BoxHistoryStore::new(store)
            }
        };

        let worker = BoxWorker::new(SubprocessWorker::from_config(&config.worker));

        Ok(Self::from_parts(store, worker, config))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(store: BoxHistoryStore, worker: BoxWorker, config: GatewayConfig) -> Self {
        let chat_service = ChatService::new(store, worker)
            .with_session_serialization(config.gateway.serialize_sessions);

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_with_memory_backend_needs_no_redis() {
        let mut config = GatewayConfig::default();
        config.store.backend = StoreBackend::Memory;

        let state = AppState::init(config).await.unwrap();
        assert!(state.chat_service.history("s1").await.unwrap().is_empty());
    }
}
