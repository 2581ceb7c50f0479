//! BoxWorker -- object-safe dynamic dispatch wrapper for Worker.
//!
//! Same blanket-impl pattern as `BoxHistoryStore`.

use std::future::Future;
use std::pin::Pin;

use chatgate_types::error::WorkerError;

use super::invoker::Worker;

/// Object-safe version of [`Worker`] with a boxed future.
pub trait WorkerDyn: Send + Sync {
    fn name(&self) -> &str;

    fn invoke_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, WorkerError>> + Send + 'a>>;
}

impl<T: Worker> WorkerDyn for T {
    fn name(&self) -> &str {
        Worker::name(self)
    }

    fn invoke_boxed<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, WorkerError>> + Send + 'a>> {
        Box::pin(self.invoke(query))
    }
}

/// Type-erased worker, so the API layer can swap the subprocess worker for
/// a scripted one in tests without changing its state types.
pub struct BoxWorker {
    inner: Box<dyn WorkerDyn>,
}

impl BoxWorker {
    pub fn new<T: Worker + 'static>(worker: T) -> Self {
        Self {
            inner: Box::new(worker),
        }
    }
}

impl Worker for BoxWorker {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(&self, query: &str) -> Result<String, WorkerError> {
        self.inner.invoke_boxed(query).await
    }
}
