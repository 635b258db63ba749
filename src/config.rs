use std::env;

use serde::Deserialize;

const MIN_SESSION_SECRET_LEN: usize = 32;
const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

/// Bootstrap administrator created at startup when no admin with this email exists.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub session_secret: Vec<u8>,
    pub session_ttl_seconds: i64,
    pub server_host: String,
    pub server_port: u16,
    pub external_api_url: Option<String>,
    pub bootstrap_admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        // APP_ENV wins; NODE_ENV is honoured for deployments carried over from older setups
        let environment = match
            env::var("APP_ENV")
                .or_else(|_| env::var("NODE_ENV"))
                .unwrap_or_else(|_| "development".to_string())
                .to_lowercase()
                .as_str()
        {
            "production" | "prod" => Environment::Production,
            "development" | "dev" | "test" => Environment::Development,
            other => {
                return Err(format!("APP_ENV must be 'development' or 'production', got '{}'", other).into());
            }
        };

        let database_url = env::var("DATABASE_URL")?;

        let session_secret = env::var("SESSION_SECRET")?.into_bytes();
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(
                format!("SESSION_SECRET must be at least {} bytes", MIN_SESSION_SECRET_LEN).into()
            );
        }

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECONDS.to_string())
            .parse()?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()?;

        let external_api_url = env::var("EXTERNAL_API_URL").ok().filter(|s| !s.is_empty());

        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() =>
                Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Ok(Config {
            environment,
            database_url,
            session_secret,
            session_ttl_seconds,
            server_host,
            server_port,
            external_api_url,
            bootstrap_admin,
        })
    }

    /// Whether session cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
