use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &pantry::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel,
        bcrypt_cost = cfg.bcrypt_cost
    );

    // Opens the database and creates the schema if needed.
    let handle = pantry::service::spawn(&cfg.database_url).await?;

    let accounts = handle.list_accounts().await?;
    let recipes = handle.list_recipes().await?;
    info!(
        accounts = accounts.len(),
        recipes = recipes.len(),
        "pantry database ready"
    );

    handle.shutdown();
    Ok(())
}
