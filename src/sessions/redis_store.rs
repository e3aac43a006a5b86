use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{SessionStore, SessionToken};
use crate::utils::error::ActionError;

/// Sessions kept in Redis as `session:<token>` keys expiring after the TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    manager: ConnectionManager,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis session store");

        Ok(Self { manager, ttl_secs })
    }

    fn key(token: &SessionToken) -> String {
        format!("session:{}", token.as_str())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: i32) -> Result<SessionToken, ActionError> {
        let token = SessionToken::generate();
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(Self::key(&token), user_id, self.ttl_secs)
            .await
            .map_err(|e| ActionError::session(e.to_string()))?;

        Ok(token)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<i32>, ActionError> {
        let mut conn = self.manager.clone();
        conn.get::<_, Option<i32>>(Self::key(token))
            .await
            .map_err(|e| ActionError::session(e.to_string()))
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), ActionError> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(Self::key(token))
            .await
            .map_err(|e| ActionError::session(e.to_string()))
    }
}
