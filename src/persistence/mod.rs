use crate::models::LedgerSnapshot;
use crate::Result;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::{Arc, Mutex};
use tokio::time::{timeout, Duration};

/// Durable storage for the ledger snapshot
///
/// `save` overwrites the whole snapshot; there is no incremental path.
/// A failed `load` is non-fatal (the engine starts fresh) and a failed
/// `save` leaves in-memory state authoritative.
#[async_trait]
pub trait SnapshotStore: Send {
    async fn load(&mut self) -> Result<Option<LedgerSnapshot>>;
    async fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<()>;
}

/// Redis-backed snapshot store
///
/// One JSON document per instrument under `ledger:{symbol}`.
pub struct RedisStore {
    conn: ConnectionManager,
    key: String,
}

impl RedisStore {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `redis_url` - Redis connection URL (e.g., "redis://127.0.0.1:6379")
    /// * `symbol` - Instrument the ledger belongs to
    pub async fn new(redis_url: &str, symbol: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;

        // Add 5 second timeout to connection attempt
        let conn = timeout(Duration::from_secs(5), ConnectionManager::new(client))
            .await
            .map_err(|_| "Redis connection timeout after 5 seconds")??;

        tracing::info!("Connected to Redis at {}", redis_url);

        Ok(Self {
            conn,
            key: format!("ledger:{}", symbol),
        })
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn load(&mut self) -> Result<Option<LedgerSnapshot>> {
        let raw: Option<String> = self.conn.get(&self.key).await?;

        match raw {
            Some(json) => {
                let snapshot: LedgerSnapshot = serde_json::from_str(&json)?;
                tracing::info!(
                    key = %self.key,
                    trades = snapshot.trades.len(),
                    "Loaded ledger snapshot from Redis"
                );
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.conn.set::<_, _, ()>(&self.key, json).await?;

        tracing::debug!(
            key = %self.key,
            trades = snapshot.trades.len(),
            "Saved ledger snapshot to Redis"
        );

        Ok(())
    }
}

/// In-memory snapshot store for tests and persistence-less runs
///
/// Stores the serialized document so the JSON wire format is exercised.
/// Clones share the same slot, which lets a test keep a handle on the
/// store it handed to the engine.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved snapshot, if any
    pub fn stored(&self) -> Option<LedgerSnapshot> {
        let slot = self.slot.lock().ok()?;
        slot.as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&mut self) -> Result<Option<LedgerSnapshot>> {
        let slot = self.slot.lock().map_err(|e| e.to_string())?;
        match slot.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        let mut slot = self.slot.lock().map_err(|e| e.to_string())?;
        *slot = Some(json);
        Ok(())
    }
}
