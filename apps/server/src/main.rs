use anyhow::Context;
use clap::{Parser, Subcommand};
use incognito_backend_runtime::{seed_sample_data, telemetry, BackendServices};
use incognito_config::{load as load_config, AppConfig};
use incognito_gateway::{create_router, GatewayState};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "incognito-backend")]
#[command(about = "Incognito chat relay (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP and WebSocket server (default)
    Serve,
    /// Print rooms and messages from the database
    DumpData,
    /// Create sample rooms and a sample user when no rooms exist
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::DumpData => dump_data(config).await,
        Commands::SeedData => seed_data(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!(environment = config.environment.as_str(), "starting Incognito backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.db_pool.clone(), &config);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(incognito_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn dump_data(config: AppConfig) -> anyhow::Result<()> {
    info!("dumping rooms and messages from database");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let rooms = sqlx::query(
        r#"
        SELECT id, name, created_at
        FROM chat_rooms
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch rooms")?;

    println!("=== ROOMS ===");
    if rooms.is_empty() {
        println!("No rooms found in database");
    } else {
        println!("Found {} rooms:", rooms.len());
        println!("{:<5} {:<30} {:<25}", "ID", "Name", "Created At");
        println!("{}", "-".repeat(60));

        for room in rooms {
            let id: i64 = room.get("id");
            let name: String = room.get("name");
            let created_at: String = room.get("created_at");

            println!("{:<5} {:<30} {:<25}", id, name, created_at);
        }
    }

    println!("\n=== MESSAGES ===");
    let messages = sqlx::query(
        r#"
        SELECT m.id, m.room_id, u.username, m.content, m.is_anonymous, m.created_at
        FROM messages m
        LEFT JOIN users u ON m.user_id = u.id
        ORDER BY m.room_id ASC, m.created_at ASC, m.id ASC
        "#,
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch messages")?;

    if messages.is_empty() {
        println!("No messages found in database");
    } else {
        println!("Found {} messages:", messages.len());
        println!(
            "{:<5} {:<8} {:<15} {:<10} {:<25} {:<40}",
            "ID", "Room", "Author", "Anonymous", "Created At", "Content"
        );
        println!("{}", "-".repeat(110));

        for message in messages {
            let id: i64 = message.get("id");
            let room_id: i64 = message.get("room_id");
            let username: Option<String> = message.get("username");
            let content: Option<String> = message.get("content");
            let is_anonymous: bool = message.get("is_anonymous");
            let created_at: String = message.get("created_at");

            println!(
                "{:<5} {:<8} {:<15} {:<10} {:<25} {:<40}",
                id,
                room_id,
                username.as_deref().unwrap_or("-"),
                is_anonymous,
                created_at,
                content.as_deref().unwrap_or("NULL"),
            );
        }
    }

    Ok(())
}

async fn seed_data(config: AppConfig) -> anyhow::Result<()> {
    info!("seeding database with sample data");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let created = seed_sample_data(&services.db_pool)
        .await
        .context("failed to seed sample data")?;

    if created == 0 {
        println!("Rooms already exist, nothing seeded");
    } else {
        println!("Seeded {created} rooms");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["incognito-backend"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn subcommands_use_kebab_case() {
        let cli = Cli::try_parse_from(["incognito-backend", "seed-data"]).unwrap();
        assert_eq!(cli.command, Some(Commands::SeedData));

        let cli = Cli::try_parse_from(["incognito-backend", "dump-data"]).unwrap();
        assert_eq!(cli.command, Some(Commands::DumpData));
    }
}
