pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::utils::error::ActionError;

const TOKEN_LEN: usize = 48;

/// Opaque credential carried in the session cookie.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Accepts only values shaped like a token we could have issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() == TOKEN_LEN && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maps session tokens to user ids. A token that does not resolve means the
/// caller is not logged in.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: i32) -> Result<SessionToken, ActionError>;

    async fn resolve(&self, token: &SessionToken) -> Result<Option<i32>, ActionError>;

    async fn destroy(&self, token: &SessionToken) -> Result<(), ActionError>;
}
