use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub node: NodeConfig,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify session tokens (HS256)
    pub jwt_secret: String,
    /// Lifetime of an issued token in seconds
    pub token_ttl_secs: i64,
    pub username: String,
    pub password: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_default();

        let token_ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24 * 60 * 60);

        // Mock credentials, matching the defaults the frontend was built against
        let username = std::env::var("AUTH_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let password = std::env::var("AUTH_PASSWORD").unwrap_or_else(|_| "password".to_string());

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs,
                username,
                password,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "JWT_SECRET cannot be empty".to_string(),
            ));
        }

        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::ValidationError(
                "TOKEN_TTL_SECS must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
