use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use transit_isochrones::server::{router, AppState, SupportedArea};
use transit_isochrones::{Engine, FeedStore, SearchParams};

#[derive(Parser)]
struct Cli {
    /// Path to the feed store's binary cache (built out-of-band by the
    /// feed loader, which is out of scope for this crate).
    #[arg(long, default_value = "feed.postcard")]
    feed: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single isochrone query and print the result as JSON.
    Query {
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        time: NaiveTime,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 3_600)]
        budget: u32,
        #[arg(long, default_value_t = 60)]
        transfer_penalty: u32,
    },
    /// Serve the isochrone engine over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();

    let now = std::time::Instant::now();
    tracing::info!(path = ?args.feed, "loading feed store");
    let feed = FeedStore::load(&args.feed)?;
    tracing::info!(elapsed = ?now.elapsed(), "feed store loaded");

    let now = std::time::Instant::now();
    let engine = Engine::shared(feed);
    tracing::info!(elapsed = ?now.elapsed(), "engine built (spatial index + transfer table)");

    match args.command {
        Commands::Query {
            lat,
            lon,
            time,
            date,
            budget,
            transfer_penalty,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let t_start = time.num_seconds_from_midnight();

            let mut params = SearchParams::new(lat, lon, date);
            params.t_start = t_start;
            params.budget = budget;
            params.transfer_penalty = transfer_penalty;

            let outcome = engine.query(&params);
            println!("{}", serde_json::to_string_pretty(&outcome.result)?);
            if outcome.truncated {
                eprintln!("warning: frontier cap reached, result is partial");
            }
        }
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(engine, port))?;
        }
    }

    Ok(())
}

async fn serve(engine: std::sync::Arc<Engine>, port: u16) -> anyhow::Result<()> {
    use std::net::SocketAddr;

    let state = AppState::new(engine, None::<SupportedArea>);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
