/// Podshelf Server - multi-user podcast tracker
use clap::{Parser, Subcommand};
use podshelf_server::{api, config::ServerConfig, state::AppState};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podshelf-server")]
#[command(about = "Podshelf multi-user podcast tracker", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "PODSHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user and print their API key
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "podshelf_server=info,podshelf_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser { email } => {
            add_user(&config, &email).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
    }

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = podshelf_storage::create_pool(&config.storage.database_url).await?;
    podshelf_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Podshelf Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = open_database(&config).await?;
    tracing::info!("Database connected");

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let app_state = AppState::new(pool, Arc::new(config));
    let app = api::router(app_state);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config: &ServerConfig, email: &str) -> anyhow::Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        anyhow::bail!("'{email}' is not an email address");
    }

    let pool = open_database(config).await?;
    let user = podshelf_storage::users::create(&pool, email).await?;

    tracing::info!(user_id = %user.id, "Created user");

    println!("Created user {} ({})", user.email, user.id);
    println!("API key: {}", user.api_key);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = open_database(config).await?;
    let users = podshelf_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {}", user.id, user.email);
    }

    Ok(())
}
