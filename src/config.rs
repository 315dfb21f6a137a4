use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub payments: PaymentsConfig,
    pub generator: GeneratorConfig,
    pub chain: ChainConfig,
    pub trends: TrendsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Shared secret for the IPN callback (HMAC-SHA-512 over the raw body).
    pub ipn_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,
    #[serde(default = "default_confirm_interval_secs")]
    pub confirm_interval_secs: u64,
}

fn default_confirm_attempts() -> u32 {
    10
}

fn default_confirm_interval_secs() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsConfig {
    pub upstream_url: String,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Try the config file first; fall back to environment variables only.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // Without a config file the database URL is mandatory.
                let database_url = get_env("DATABASE_URL")
                    .ok_or("Missing DATABASE_URL environment variable and no config.toml found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    payments: PaymentsConfig {
                        ipn_secret: get_env("PAYMENTS_IPN_SECRET").unwrap_or_default(),
                    },
                    generator: GeneratorConfig {
                        base_url: get_env("GENERATOR_BASE_URL")
                            .unwrap_or_else(|| "https://generate.curiogrid.app".to_string()),
                        api_key: get_env("GENERATOR_API_KEY").unwrap_or_default(),
                    },
                    chain: ChainConfig {
                        rpc_url: get_env("CHAIN_RPC_URL")
                            .unwrap_or_else(|| "https://rpc.curiogrid.app".to_string()),
                        confirm_attempts: get_env_parse("CHAIN_CONFIRM_ATTEMPTS", 10u32),
                        confirm_interval_secs: get_env_parse("CHAIN_CONFIRM_INTERVAL_SECS", 3u64),
                    },
                    trends: TrendsConfig {
                        upstream_url: get_env("TRENDS_UPSTREAM_URL")
                            .unwrap_or_else(|| "https://trends.curiogrid.app".to_string()),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment variables override the file when both are present.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("PAYMENTS_IPN_SECRET") {
            config.payments.ipn_secret = v;
        }
        if let Ok(v) = env::var("GENERATOR_BASE_URL") {
            config.generator.base_url = v;
        }
        if let Ok(v) = env::var("GENERATOR_API_KEY") {
            config.generator.api_key = v;
        }
        if let Ok(v) = env::var("CHAIN_RPC_URL") {
            config.chain.rpc_url = v;
        }
        if let Ok(v) = env::var("CHAIN_CONFIRM_ATTEMPTS")
            && let Ok(n) = v.parse()
        {
            config.chain.confirm_attempts = n;
        }
        if let Ok(v) = env::var("CHAIN_CONFIRM_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.chain.confirm_interval_secs = n;
        }
        if let Ok(v) = env::var("TRENDS_UPSTREAM_URL") {
            config.trends.upstream_url = v;
        }

        Ok(config)
    }
}
