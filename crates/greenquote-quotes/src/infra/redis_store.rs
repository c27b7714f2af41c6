//! Redis quote store
//!
//! Layout under a key prefix:
//!
//! ```text
//! {prefix}:quote:{id}        JSON record
//! {prefix}:owner:{owner_id}  sorted set of ids, scored by created_at (ms)
//! {prefix}:quotes            sorted set of every id, scored by created_at (ms)
//! ```
//!
//! Inserts run as one Lua script. Both index entries are written before the
//! record, and a failed index write is undone, so a record is never visible
//! without its index entries.

use std::sync::Arc;

use async_trait::async_trait;
use greenquote_common::{QuoteFilter, QuoteRecord};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Script};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{QuoteStore, StoreError};

/// Default key prefix for quote entries
pub const DEFAULT_KEY_PREFIX: &str = "greenquote";

/// KEYS: record, owner index, global index. ARGV: json, score, member.
/// Returns 1 when stored, 0 when the id already exists.
const INSERT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
local owner = redis.pcall('ZADD', KEYS[2], ARGV[2], ARGV[3])
if type(owner) == 'table' and owner.err then
  return owner
end
local all = redis.pcall('ZADD', KEYS[3], ARGV[2], ARGV[3])
if type(all) == 'table' and all.err then
  redis.call('ZREM', KEYS[2], ARGV[3])
  return all
end
redis.call('SET', KEYS[1], ARGV[1])
return 1
"#;

/// Redis-backed quote store
pub struct RedisQuoteStore {
    /// Redis client
    client: Client,
    /// Shared multiplexed connection, re-established lazily
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    /// Key prefix for all entries
    prefix: String,
    /// Atomic record plus index write
    insert_script: Script,
}

impl RedisQuoteStore {
    /// Connect to Redis
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::StorageError(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::StorageError(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(Some(connection))),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            insert_script: Script::new(INSERT_SCRIPT),
        })
    }

    /// Use a custom key prefix
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    fn quote_key(&self, id: &Uuid) -> String {
        quote_key(&self.prefix, id)
    }

    fn owner_key(&self, owner_id: &str) -> String {
        owner_key(&self.prefix, owner_id)
    }

    fn all_key(&self) -> String {
        all_key(&self.prefix)
    }

    /// Load records for ids listed in a sorted set, newest first
    async fn load_index(&self, index_key: &str) -> Result<Vec<QuoteRecord>, StoreError> {
        let mut conn = self.get_connection().await?;

        let ids: Vec<String> = conn
            .zrevrange(index_key, 0, -1)
            .await
            .map_err(|e| StoreError::StorageError(format!("Redis ZREVRANGE failed: {}", e)))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| format!("{}:quote:{}", self.prefix, id))
            .collect();

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::StorageError(format!("Redis MGET failed: {}", e)))?;

        let mut records = Vec::with_capacity(values.len());
        for (key, value) in keys.iter().zip(values) {
            match value {
                Some(json) => records.push(decode(&json)?),
                None => warn!(key = %key, "Indexed quote missing"),
            }
        }
        Ok(records)
    }

    /// Get a connection, reconnecting if none is held
    async fn get_connection(&self) -> Result<MultiplexedConnection, StoreError> {
        let guard = self.connection.read().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        drop(guard);

        let mut guard = self.connection.write().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::StorageError(format!("Failed to reconnect to Redis: {}", e)))?;

        *guard = Some(connection.clone());
        Ok(connection)
    }
}

fn quote_key(prefix: &str, id: &Uuid) -> String {
    format!("{}:quote:{}", prefix, id)
}

fn owner_key(prefix: &str, owner_id: &str) -> String {
    format!("{}:owner:{}", prefix, owner_id)
}

fn all_key(prefix: &str) -> String {
    format!("{}:quotes", prefix)
}

fn encode(record: &QuoteRecord) -> Result<String, StoreError> {
    serde_json::to_string(record)
        .map_err(|e| StoreError::SerializationError(format!("Failed to serialize quote: {}", e)))
}

fn decode(json: &str) -> Result<QuoteRecord, StoreError> {
    serde_json::from_str(json)
        .map_err(|e| StoreError::SerializationError(format!("Failed to deserialize quote: {}", e)))
}

#[async_trait]
impl QuoteStore for RedisQuoteStore {
    #[instrument(skip(self, record), fields(quote_id = %record.id))]
    async fn insert(&self, record: QuoteRecord) -> Result<Uuid, StoreError> {
        let id = record.id;
        let key = self.quote_key(&id);
        let score = record.created_at.timestamp_millis();
        let json = encode(&record)?;

        let mut conn = self.get_connection().await?;

        let stored: i64 = self
            .insert_script
            .key(&key)
            .key(self.owner_key(&record.owner_id))
            .key(self.all_key())
            .arg(&json)
            .arg(score)
            .arg(id.to_string())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| StoreError::StorageError(format!("Redis insert failed: {}", e)))?;

        if stored == 0 {
            return Err(StoreError::Duplicate(id));
        }

        debug!(key = %key, "Stored quote");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<QuoteRecord>, StoreError> {
        let mut conn = self.get_connection().await?;

        let json: Option<String> = conn
            .get(self.quote_key(id))
            .await
            .map_err(|e| StoreError::StorageError(format!("Redis GET failed: {}", e)))?;

        json.as_deref().map(decode).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<QuoteRecord>, StoreError> {
        self.load_index(&self.owner_key(owner_id)).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self, filter: &QuoteFilter) -> Result<Vec<QuoteRecord>, StoreError> {
        let records = self.load_index(&self.all_key()).await?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }
}
