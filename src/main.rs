use clap::Parser;
use tickbot::api::BinanceClient;
use tickbot::engine::{Engine, EngineConfig, EngineEvent};
use tickbot::indicators::compute_snapshot;
use tickbot::persistence::{MemoryStore, RedisStore, SnapshotStore};
use tickbot::Result;
use tokio::time::{interval, Duration};

#[derive(Parser, Debug)]
#[command(name = "tickbot", about = "Single-instrument tick-driven decision engine")]
struct Args {
    /// Instrument symbol to trade
    #[arg(long, default_value = "BTCUSDT")]
    symbol: String,

    /// Seconds between tick polls
    #[arg(long, default_value_t = 5)]
    poll_secs: u64,

    /// Starting account balance in quote currency
    #[arg(long, default_value_t = 10000.0)]
    balance: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();

    tracing::info!("🚀 tickbot starting");
    tracing::info!("  Symbol: {}", args.symbol);
    tracing::info!("  Poll interval: {}s", args.poll_secs);
    tracing::info!("  Starting balance: ${:.2}", args.balance);

    let store = connect_store(&args.symbol).await;
    let mut engine = Engine::bootstrap(
        EngineConfig::new(args.symbol.clone(), args.balance),
        store,
        compute_snapshot,
    )
    .await;

    let feed = BinanceClient::new();
    let mut ticker = interval(Duration::from_secs(args.poll_secs));

    tracing::info!("Press Ctrl+C to stop...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("⚠️  Received Ctrl+C, shutting down...");
                break;
            }
            _ = ticker.tick() => {
                let tick = match feed.latest_tick(&args.symbol).await {
                    Ok(tick) => tick,
                    Err(e) => {
                        tracing::warn!(error = %e, "Tick fetch failed, skipping cycle");
                        continue;
                    }
                };

                match engine.handle_tick(&tick).await {
                    Ok(events) => dispatch(&events),
                    Err(e) => tracing::error!(error = %e, "Tick processing failed"),
                }
            }
        }
    }

    let stats = engine.ledger().daily_stats();
    tracing::info!(
        "👋 tickbot stopped - {} trades, {}W/{}L, pnl ${:.2}, balance ${:.2}",
        stats.trade_count,
        stats.wins,
        stats.losses,
        stats.cumulative_pnl,
        engine.ledger().balance()
    );

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt().with_env_filter("tickbot=info").init();
}

/// Connect the durable store, falling back to in-memory when Redis is
/// unreachable (the engine then runs without restart persistence)
async fn connect_store(symbol: &str) -> Box<dyn SnapshotStore> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    match RedisStore::new(&redis_url, symbol).await {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis ({}), continuing without durable persistence",
                e
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// Forward engine effects to the outside world
///
/// Order commands would be handed to the execution transport here; this
/// build logs them.
fn dispatch(events: &[EngineEvent]) {
    for event in events {
        match event {
            EngineEvent::OrderIssued(order) => {
                tracing::info!(
                    direction = ?order.direction,
                    symbol = %order.symbol,
                    price = order.price,
                    stop_loss = order.stop_loss,
                    take_profit = order.take_profit,
                    volume = order.volume,
                    "Dispatching bracket order"
                );
            }
            EngineEvent::TradeClosed(trade) => {
                tracing::info!(
                    direction = ?trade.direction,
                    entry = trade.entry_price,
                    exit = trade.exit_price,
                    pnl = trade.pnl,
                    "Trade closed"
                );
            }
        }
    }
}
