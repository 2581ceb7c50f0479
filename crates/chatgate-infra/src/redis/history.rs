//! Redis implementation of `HistoryStore`.
//!
//! - append: `RPUSH {session} {json}` then `EXPIRE {session} {ttl}`
//! - read:   `LRANGE {session} 0 -1`
//! - delete: `DEL {session}`
//!
//! Append and expire are two sequential commands, not a transaction. If the
//! process dies between them the message is kept with the previous TTL.

use std::time::Duration;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, RedisError};
use tracing::warn;

use chatgate_core::history::store::HistoryStore;
use chatgate_types::error::StoreError;
use chatgate_types::message::Message;

/// Redis-backed [`HistoryStore`].
#[derive(Clone)]
pub struct RedisHistoryStore {
    conn: ConnectionManager,
    ttl_secs: i64,
}

impl RedisHistoryStore {
    pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Remaining TTL of a session key in seconds, `None` if the key is absent.
    #[cfg(test)]
    async fn time_to_live(&self, session_id: &str) -> Result<Option<u64>, StoreError> {
        let mut conn = self.conn.clone();
        let ttl: i64 = conn.ttl(session_id).await.map_err(map_redis_error)?;
        // -2: no such key, -1: key without expiry.
        Ok(u64::try_from(ttl).ok())
    }
}

impl HistoryStore for RedisHistoryStore {
    fn name(&self) -> &str {
        "redis"
    }

    async fn append_message(&self, session_id: &str, message: &Message) -> Result<(), StoreError> {
        let payload = encode_message(message)?;
        let mut conn = self.conn.clone();

        let _: i64 = conn
            .rpush(session_id, payload)
            .await
            .map_err(map_redis_error)?;
        let _: bool = conn
            .expire(session_id, self.ttl_secs)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let mut conn = self.conn.clone();
        let entries: Vec<String> = conn
            .lrange(session_id, 0, -1)
            .await
            .map_err(map_redis_error)?;
        Ok(decode_history(session_id, entries))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(session_id).await.map_err(map_redis_error)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn encode_message(message: &Message) -> Result<String, StoreError> {
    serde_json::to_string(message).map_err(|e| StoreError::Encoding(e.to_string()))
}

/// Decode list entries in order, skipping any that are not a valid message.
fn decode_history(session_id: &str, entries: Vec<String>) -> Vec<Message> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_str::<Message>(&raw) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    index,
                    error = %e,
                    "Skipping malformed history entry"
                );
                None
            }
        })
        .collect()
}

fn map_redis_error(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
    {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Command(e.to_string())
    }
}
