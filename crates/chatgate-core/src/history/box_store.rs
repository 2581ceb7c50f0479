//! BoxHistoryStore -- object-safe dynamic dispatch wrapper for HistoryStore.
//!
//! 1. Define an object-safe `HistoryStoreDyn` trait with boxed futures
//! 2. Blanket-impl `HistoryStoreDyn` for all `T: HistoryStore`
//! 3. `BoxHistoryStore` wraps `Box<dyn HistoryStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatgate_types::error::StoreError;
use chatgate_types::message::Message;

use super::store::HistoryStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`HistoryStore`] with boxed futures.
pub trait HistoryStoreDyn: Send + Sync {
    fn name(&self) -> &str;

    fn append_message_boxed<'a>(
        &'a self,
        session_id: &'a str,
        message: &'a Message,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn get_history_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Message>, StoreError>>;

    fn delete_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>>;
}

impl<T: HistoryStore> HistoryStoreDyn for T {
    fn name(&self) -> &str {
        HistoryStore::name(self)
    }

    fn append_message_boxed<'a>(
        &'a self,
        session_id: &'a str,
        message: &'a Message,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.append_message(session_id, message))
    }

    fn get_history_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Message>, StoreError>> {
        Box::pin(self.get_history(session_id))
    }

    fn delete_session_boxed<'a>(
        &'a self,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.delete_session(session_id))
    }
}

/// Type-erased history store for runtime backend selection (Redis vs memory).
///
/// Implements [`HistoryStore`] itself, so it slots into `ChatService` like
/// any concrete backend.
pub struct BoxHistoryStore {
    inner: Box<dyn HistoryStoreDyn>,
}

impl BoxHistoryStore {
    pub fn new<T: HistoryStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl HistoryStore for BoxHistoryStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn append_message(&self, session_id: &str, message: &Message) -> Result<(), StoreError> {
        self.inner.append_message_boxed(session_id, message).await
    }

    async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        self.inner.get_history_boxed(session_id).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
        self.inner.delete_session_boxed(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::memory::InMemoryHistoryStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_box_store_delegates() {
        let store = BoxHistoryStore::new(InMemoryHistoryStore::new(Duration::from_secs(60)));
        assert_eq!(HistoryStore::name(&store), "memory");

        store.append_message("s1", &Message::user("hi")).await.unwrap();
        assert_eq!(store.get_history("s1").await.unwrap(), vec![Message::user("hi")]);

        store.delete_session("s1").await.unwrap();
        assert!(store.get_history("s1").await.unwrap().is_empty());
    }
}
