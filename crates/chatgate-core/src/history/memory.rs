//! Process-local history store.
//!
//! Mirrors the Redis backend's list + TTL behavior: appends push to the tail
//! and reset the expiry, reads return the list in order, and an expired
//! session reads as empty. Expiry is evaluated on access, and
//! [`InMemoryHistoryStore::spawn_expiry_sweeper`] reclaims sessions that
//! expire and are never touched again.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use chatgate_types::error::StoreError;
use chatgate_types::message::Message;

use super::store::HistoryStore;

struct SessionEntry {
    messages: Vec<Message>,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory [`HistoryStore`] backed by a concurrent map.
pub struct InMemoryHistoryStore {
    sessions: Arc<DashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl InMemoryHistoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Remaining lifetime of a session, or `None` if it does not exist.
    #[cfg(test)]
    fn time_to_live(&self, session_id: &str) -> Option<Duration> {
        let now = Instant::now();
        self.sessions
            .get(session_id)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Drop every expired session. Returns how many were removed.
    #[cfg(test)]
    fn purge_expired(&self) -> usize {
        purge(&self.sessions)
    }

    /// Purge expired sessions every `period` on a background task.
    ///
    /// The task holds only a weak reference and exits on the first tick after
    /// the store is dropped.
    pub fn spawn_expiry_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let sessions: Weak<DashMap<String, SessionEntry>> = Arc::downgrade(&self.sessions);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(sessions) = sessions.upgrade() else {
                    break;
                };
                let removed = purge(&sessions);
                if removed > 0 {
                    debug!(removed, remaining = sessions.len(), "Purged expired sessions");
                }
            }
        })
    }

    /// Number of live (unexpired) sessions.
    #[cfg(test)]
    fn session_count(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }
}

fn purge(sessions: &DashMap<String, SessionEntry>) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_expired(now));
    before.saturating_sub(sessions.len())
}

impl HistoryStore for InMemoryHistoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn append_message(&self, session_id: &str, message: &Message) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                messages: Vec::new(),
                expires_at: now,
            });

        // An expired key is gone in Redis; appending starts a fresh list.
        if entry.is_expired(now) {
            entry.messages.clear();
        }
        entry.messages.push(message.clone());
        entry.expires_at = now + self.ttl;
        Ok(())
    }

    async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        let now = Instant::now();
        match self.sessions.get(session_id) {
            None => return Ok(Vec::new()),
            Some(entry) if !entry.is_expired(now) => return Ok(entry.messages.clone()),
            Some(_) => {}
        }
        self.sessions
            .remove_if(session_id, |_, entry| entry.is_expired(now));
        Ok(Vec::new())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
        self.sessions.remove(session_id);
        Ok(())
    }
}
