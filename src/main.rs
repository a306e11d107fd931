use relayflow::config::Config;
use relayflow::display::{render_leaderboard, ChainNames};
use relayflow::gateway::RestBlockFetcher;
use relayflow::pipeline::IngestionLoop;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Write logs to stderr so the leaderboard table on stdout stays clean
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env();

    log::info!("🚀 Starting relayflow...");
    log::info!("📊 Configuration:");
    log::info!("   Gateway: {}", config.gateway_url);
    log::info!("   Chain: {}", config.chain_id);
    log::info!("   Window: {} heights", config.window_size);
    log::info!("   Top-K: {}", config.top_k);
    log::info!("   Tick interval: {}ms", config.tick_interval_ms);

    let fetcher = Arc::new(RestBlockFetcher::new(
        &config.gateway_url,
        config.project_id.as_deref(),
        config.request_timeout(),
    )?);

    let (ingestion, mut rankings_rx) =
        IngestionLoop::new(fetcher, config.window_size, config.top_k);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Known Lava spec ids; anything unmapped renders as its raw id
    let names = ChainNames::from_pairs(&[
        ("ETH1", "Ethereum"),
        ("COS3", "Cosmos Hub"),
        ("COS5", "Osmosis"),
        ("LAV1", "Lava"),
        ("NEAR", "Near"),
        ("POLYGON1", "Polygon"),
        ("AXELAR", "Axelar"),
    ]);

    // Printer task: re-render the leaderboard whenever the pipeline publishes
    let printer = tokio::spawn(async move {
        while rankings_rx.changed().await.is_ok() {
            let rows = rankings_rx.borrow_and_update().clone();
            println!("{}", render_leaderboard(&rows, &names));
        }
    });

    let tick_interval = config.tick_interval();
    let ingestion_handle = tokio::spawn(async move {
        ingestion.run(tick_interval, shutdown_rx).await;
    });

    tokio::signal::ctrl_c().await?;
    log::info!("🛑 Ctrl-C received, shutting down...");
    let _ = shutdown_tx.send(true);

    ingestion_handle.await?;
    printer.abort();

    Ok(())
}
