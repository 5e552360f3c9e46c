use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_server::{api, setup_app_state};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API Port
    #[arg(long, default_value = "3000")]
    api_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("info,ticket_server=debug"))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    dotenv::dotenv().ok();
    let config = infrastructure::Config::from_env()?;

    info!("Connecting to database...");
    let pool = sqlx::PgPool::connect(&config.database_url).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let state = setup_app_state(pool, config.jwt_secret);

    let app = api::create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.api_port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
