use std::env;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

impl FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(SessionBackend::Redis),
            "memory" => Ok(SessionBackend::Memory),
            other => Err(format!("unknown session backend: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_secs: u64,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "expense_session".to_string(),
            max_age_secs: 86_400,
            secure: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub port: u16,
    pub session_backend: SessionBackend,
    pub session_ttl_secs: u64,
    pub cookie: CookieSettings,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{} has an invalid value, using default", key);
            default
        }),
        Err(_) => default,
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = CookieSettings::default();

        let session_backend = env::var("SESSION_BACKEND")
            .ok()
            .and_then(|raw| match raw.parse::<SessionBackend>() {
                Ok(backend) => Some(backend),
                Err(e) => {
                    tracing::warn!("{}, falling back to redis", e);
                    None
                }
            })
            .unwrap_or(SessionBackend::Redis);

        let session_ttl_secs = env_or("SESSION_TTL_SECS", defaults.max_age_secs);

        let cookie_name = env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| {
            tracing::warn!("SESSION_COOKIE_NAME not set in environment, using default");
            defaults.name.clone()
        });

        Self {
            port: env_or("PORT", 8080),
            session_backend,
            session_ttl_secs,
            cookie: CookieSettings {
                name: cookie_name,
                max_age_secs: session_ttl_secs,
                secure: env_or("COOKIE_SECURE", false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_backend_parsing() {
        assert_eq!("redis".parse::<SessionBackend>().unwrap(), SessionBackend::Redis);
        assert_eq!(" Memory ".parse::<SessionBackend>().unwrap(), SessionBackend::Memory);
        assert!("postgres".parse::<SessionBackend>().is_err());
    }
}
