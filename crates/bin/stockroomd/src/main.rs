//! Daemon entry point for the stockroom inventory API.
//!
//! Loads configuration from the command line and environment, connects the
//! item store, applies the schema and seed catalog, and serves HTTP.

mod config;

use stockroom_api::{ApiServer, ApiServerConfig};
use stockroom_core::control::InventoryControlPlane;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::StockroomConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();
    let config = StockroomConfig::from_args()?;

    let db = connect(&config).await?;
    let control = InventoryControlPlane::new(db);
    let seeded = control.initialize(config.seed).await?;
    info!(seeded, endpoint = config.db_endpoint(), "item store ready");

    let server_config =
        ApiServerConfig::new(config.http_addr).with_max_body_bytes(config.max_body_bytes);
    ApiServer::new(control, server_config).serve().await
}

async fn connect(config: &StockroomConfig) -> Result<Surreal<Any>, surrealdb::Error> {
    let db = any::connect(config.db_endpoint()).await?;

    if !config.db_in_memory {
        if let (Some(username), Some(password)) =
            (config.db_username.as_ref(), config.db_password.as_ref())
        {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await?;
        }
    }

    db.use_ns(config.db_namespace.as_str())
        .use_db(config.db_name.as_str())
        .await?;
    Ok(db)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
