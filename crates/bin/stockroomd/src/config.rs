use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3005";
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
const DEFAULT_DB_NAMESPACE: &str = "stockroom";
const DEFAULT_DB_NAME: &str = "inventory";
const IN_MEMORY_ENDPOINT: &str = "mem://";

#[derive(Parser, Debug)]
#[command(name = "stockroomd", version, about = "Stockroom inventory daemon.")]
struct CliArgs {
    #[arg(long, env = "STOCKROOM_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    http_addr: SocketAddr,

    #[arg(
        long,
        env = "STOCKROOM_MAX_BODY_BYTES",
        default_value_t = DEFAULT_MAX_BODY_BYTES
    )]
    max_body_bytes: usize,

    #[arg(long, env = "STOCKROOM_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "STOCKROOM_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(
        long,
        env = "STOCKROOM_DB_IN_MEMORY",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    db_in_memory: bool,

    #[arg(long, env = "STOCKROOM_DB_URI")]
    db_uri: Option<String>,

    #[arg(long, env = "STOCKROOM_DB_USERNAME")]
    db_username: Option<String>,

    #[arg(long, env = "STOCKROOM_DB_PASSWORD")]
    db_password: Option<String>,

    #[arg(
        long,
        env = "STOCKROOM_SEED",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    seed: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct StockroomConfig {
    pub http_addr: SocketAddr,
    pub max_body_bytes: usize,
    pub db_namespace: String,
    pub db_name: String,
    pub db_in_memory: bool,
    pub db_uri: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub seed: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl StockroomConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Endpoint handed to the `SurrealDB` `any` engine.
    pub fn db_endpoint(&self) -> &str {
        if self.db_in_memory {
            IN_MEMORY_ENDPOINT
        } else {
            self.db_uri.as_deref().unwrap_or(IN_MEMORY_ENDPOINT)
        }
    }
}

impl TryFrom<CliArgs> for StockroomConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let db_uri = args.db_uri.filter(|value| !value.trim().is_empty());
        let db_username = args.db_username.filter(|value| !value.trim().is_empty());
        let db_password = args.db_password.filter(|value| !value.trim().is_empty());

        let db_in_memory = args.db_in_memory || db_uri.is_none();

        if !db_in_memory {
            if db_username.is_none() {
                return Err(ConfigError::MissingSetting("STOCKROOM_DB_USERNAME"));
            }
            if db_password.is_none() {
                return Err(ConfigError::MissingSetting("STOCKROOM_DB_PASSWORD"));
            }
        }

        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "STOCKROOM_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "STOCKROOM_DB_NAME",
                value: args.db_name,
            });
        }
        if args.max_body_bytes == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "STOCKROOM_MAX_BODY_BYTES",
                value: args.max_body_bytes.to_string(),
            });
        }

        Ok(Self {
            http_addr: args.http_addr,
            max_body_bytes: args.max_body_bytes,
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            db_in_memory,
            db_uri,
            db_username,
            db_password,
            seed: args.seed,
        })
    }
}
