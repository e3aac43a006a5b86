use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionStore, SessionToken};
use crate::utils::error::ActionError;

pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<SessionToken, (i32, Instant)>>,
}

impl MemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32) -> Result<SessionToken, ActionError> {
        let token = SessionToken::generate();
        let expires_at = Instant::now() + self.ttl;

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, deadline)| *deadline > Instant::now());
        sessions.insert(token.clone(), (user_id, expires_at));

        Ok(token)
    }

    async fn resolve(&self, token: &SessionToken) -> Result<Option<i32>, ActionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(token)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn destroy(&self, token: &SessionToken) -> Result<(), ActionError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_resolve_destroy() {
        let store = MemorySessionStore::new(60);
        let token = store.create(7).await.unwrap();

        assert_eq!(store.resolve(&token).await.unwrap(), Some(7));

        store.destroy(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let store = MemorySessionStore::new(60);
        assert_eq!(store.resolve(&SessionToken::generate()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let store = MemorySessionStore::new(0);
        let token = store.create(1).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
    }
}
