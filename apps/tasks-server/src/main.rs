//! Tasks Server binary.

use task_store::{DynamoTaskStore, MemoryTaskStore, PostgresTaskStore};
use tasks_server::{
    config::{Config, StorageBackend},
    init_tracing, serve,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        backend = %config.storage_backend,
        auth_enabled = config.auth_enabled(),
        "Starting Tasks Server"
    );

    match config.storage_backend {
        StorageBackend::Memory => serve(config, MemoryTaskStore::new()).await,
        StorageBackend::DynamoDb => {
            let store = DynamoTaskStore::new(&config.dynamodb_table).await;
            tracing::info!(table = %store.table_name(), "Using DynamoDB task store");
            serve(config, store).await
        }
        StorageBackend::Postgres => {
            let postgres = config
                .postgres
                .clone()
                .ok_or_else(|| anyhow::anyhow!("missing postgres configuration"))?;
            let store = PostgresTaskStore::connect(&postgres).await?;
            tracing::info!(host = %postgres.host, database = %postgres.database, "Using PostgreSQL task store");
            serve(config, store).await
        }
    }
}
