//! Redis connection setup.

use ::redis::aio::ConnectionManager;
use tracing::info;

use chatgate_types::config::RedisConfig;
use chatgate_types::error::StoreError;

/// Open the long-lived, shared Redis connection.
///
/// The returned `ConnectionManager` is cheap to clone, safe to use from many
/// tasks at once, and reconnects on its own after the link drops. It is
/// created once at startup and handed to the history store.
pub async fn connect(config: &RedisConfig) -> Result<ConnectionManager, StoreError> {
    let url = config.url();
    let client = ::redis::Client::open(url.as_str())
        .map_err(|e| StoreError::Connection(format!("invalid redis url '{url}': {e}")))?;

    let manager = client
        .get_connection_manager()
        .await
        .map_err(|e| StoreError::Connection(format!("{url}: {e}")))?;

    info!(url = %url, "Connected to Redis");
    Ok(manager)
}
