use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use pairslot_api::config::ApiConfig;
use pairslot_core::{PairSlotService, store::memory::InMemoryStore};
use pairslot_db::{PgStore, create_pool, schema::initialize_database};
use pairslot_notify::{FcmConfig, sender_from_config};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let notifier = sender_from_config(FcmConfig::from_env()).await?;
    let policy = config.approval_policy();

    let service = match &config.database_url {
        Some(database_url) => {
            // Create database connection pool and make sure the schema exists
            let db_pool = create_pool(database_url).await?;
            initialize_database(&db_pool).await?;
            info!("Using PostgreSQL storage");

            PairSlotService::new(Arc::new(PgStore::new(db_pool)), notifier, policy)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage; data is lost on restart");
            PairSlotService::new(Arc::new(InMemoryStore::new()), notifier, policy)
        }
    };

    // Start API server
    pairslot_api::start_server(config, service).await?;

    Ok(())
}
