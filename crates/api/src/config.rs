//! Environment-driven API configuration.

use chrono::Duration;

use gatekey_auth::PolicyConfig;
use gatekey_identity::ServiceConfig;

/// Runtime configuration, read from the environment with dev defaults.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub bind_addr: String,
    pub service: ServiceConfig,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let mut service = ServiceConfig::default();
        if let Some(n) = env_parse::<u32>("MAX_FAILED_LOGINS") {
            service.max_failed_logins = n;
        }
        if let Some(minutes) = env_parse::<i64>("ACCESS_TOKEN_TTL_MINUTES") {
            service.access_token_ttl = Duration::minutes(minutes);
        }
        if let Some(owner_crud) = env_parse::<bool>("OWNER_CRUD") {
            service.policy = PolicyConfig { owner_crud };
        }

        Self {
            jwt_secret,
            bind_addr,
            service,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, value = raw, "ignoring unparseable env override");
                None
            }
        },
        Err(_) => None,
    }
}
