use anyhow::{Context, Result};
use incognito_config::AppConfig;
use incognito_database::{initialize_database, DatabaseConnection, RoomRepository, UserRepository};
use sqlx::SqlitePool;
use tracing::{error, info};

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Rooms created by `seed_sample_data`, oldest first
pub const SAMPLE_ROOMS: [&str; 3] = ["General", "Random", "Confessions"];
pub const SAMPLE_USERNAME: &str = "ghost";

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
}

impl BackendServices {
    /// Open the store and bring its schema up to date.
    ///
    /// A failing connectivity probe after setup is logged, not returned.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        info!(environment = config.environment.as_str(), "initialising backend services");

        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        match DatabaseConnection::from_pool(db_pool.clone())
            .test_connection()
            .await
        {
            Ok(()) => info!("database connectivity check passed"),
            Err(error) => error!(error = %format!("{error:#}"), "database connectivity check failed"),
        }

        Ok(Self { db_pool })
    }
}

/// Insert the sample rooms and user unless the store already has rooms.
///
/// Returns the number of rooms created.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<usize> {
    let rooms = RoomRepository::new(pool.clone());
    let existing = rooms.count().await.context("failed to count rooms")?;
    if existing > 0 {
        info!(existing, "rooms already present, skipping seed");
        return Ok(0);
    }

    for name in SAMPLE_ROOMS {
        rooms
            .create(name)
            .await
            .with_context(|| format!("failed to create room {name}"))?;
    }

    let users = UserRepository::new(pool.clone());
    if users
        .find_by_username(SAMPLE_USERNAME)
        .await
        .context("failed to look up sample user")?
        .is_none()
    {
        users
            .create(SAMPLE_USERNAME)
            .await
            .context("failed to create sample user")?;
    }

    info!(rooms = SAMPLE_ROOMS.len(), "sample data seeded");
    Ok(SAMPLE_ROOMS.len())
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
