use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::api::config::{ApiConfig, CookieSettings, SessionBackend};
use crate::sessions::memory::MemorySessionStore;
use crate::sessions::redis_store::RedisSessionStore;
use crate::sessions::SessionStore;
use crate::utils::db::{PgRepository, create_pool, ensure_schema, get_conn};
use crate::utils::error::ActionError;
use crate::utils::traits::Repository;

#[derive(Clone)]
pub struct AppConfig {
    pub repository: Arc<dyn Repository>,
    pub sessions: Arc<dyn SessionStore>,
    pub cookie: CookieSettings,
}

impl AppConfig {
    pub fn new(
        repository: Arc<dyn Repository>,
        sessions: Arc<dyn SessionStore>,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            repository,
            sessions,
            cookie,
        }
    }

    /// Runs `op` on the blocking thread pool with a handle to the repository.
    /// Diesel queries and password hashing both block, so request handlers
    /// go through here instead of calling the repository inline.
    pub async fn with_repository<T, F>(&self, op: F) -> Result<T, ActionError>
    where
        F: FnOnce(&dyn Repository) -> Result<T, ActionError> + Send + 'static,
        T: Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|e| ActionError::Internal(format!("blocking task failed: {}", e)))?
    }

    /// Connects to Postgres, creates the schema if needed and opens the
    /// configured session backend.
    pub async fn from_env(api_config: &ApiConfig) -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL must be set in .env file or environment variables"))?;

        let pool = create_pool(&database_url)?;
        {
            let mut conn = get_conn(&pool)?;
            ensure_schema(&mut conn)?;
        }
        tracing::info!("Database schema ready");

        let sessions: Arc<dyn SessionStore> = match api_config.session_backend {
            SessionBackend::Redis => {
                let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| {
                    tracing::warn!("REDIS_URL not set in environment, using default");
                    "redis://127.0.0.1:6379".to_string()
                });
                Arc::new(RedisSessionStore::connect(&redis_url, api_config.session_ttl_secs).await?)
            }
            SessionBackend::Memory => {
                tracing::warn!("Using in-process session store, sessions are lost on restart");
                Arc::new(MemorySessionStore::new(api_config.session_ttl_secs))
            }
        };

        Ok(Self::new(
            Arc::new(PgRepository::new(pool)),
            sessions,
            api_config.cookie.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::accounts::db_types::CreateUser;
    use crate::utils::error::StoreError;
    use crate::utils::memory::MemoryRepository;

    fn app_config() -> AppConfig {
        AppConfig::new(
            Arc::new(MemoryRepository::new()),
            Arc::new(MemorySessionStore::new(60)),
            CookieSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_with_repository_runs_off_the_runtime() {
        let app_config = app_config();
        let user = CreateUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        };

        let created = app_config
            .with_repository(move |repository| Ok(repository.create_user(&user)?))
            .await
            .unwrap();
        assert_eq!(created.username, "alice");

        let found = app_config
            .with_repository(|repository| Ok(repository.find_user_by_username("alice")?))
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_with_repository_surfaces_store_errors() {
        let app_config = app_config();
        let user = CreateUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        };

        let first = user.clone();
        app_config
            .with_repository(move |repository| Ok(repository.create_user(&first)?))
            .await
            .unwrap();

        let err = app_config
            .with_repository(move |repository| Ok(repository.create_user(&user)?))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Store(StoreError::UniqueViolation)));
    }
}
