use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use md_app::catalog;
use md_app::cli::Cli;
use md_app::cli::Command;
use md_app::config_loader;
use md_app::shutdown_handler;
use md_app::tracing_setup;
use md_http::CoinGeckoClient;
use md_http::JsonCache;
use md_hub::HubMessage;
use md_hub::MarketHub;
use md_types::PollParams;
use serde::Serialize;
use tracing::error;
use tracing::info;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config_loader::load_feed_config_or_default(&cli.config);

    let _guard = tracing_setup::init("md_feed", &config.log_dir, config.level(), !cli.quiet);
    info!(base_url = %config.base_url, max_requests = config.max_requests, window_ms = config.window_ms, "starting md_feed");

    let client = config.client()?;
    let cache = JsonCache::new(&config.cache_dir);

    match cli.command {
        Command::Watch { coins, vs, interval_ms, channel } => {
            let vs = vs.unwrap_or_else(|| config.vs_currency.clone());
            let interval = interval_ms.map(Duration::from_millis).unwrap_or_else(|| config.polling_interval());
            watch(client, PollParams::new(coins, &vs, interval), channel).await?;
        }
        Command::Trending => print_json(&client.trending().await?)?,
        Command::Markets { vs, per_page, page } => {
            let vs = vs.unwrap_or_else(|| config.vs_currency.clone());
            print_json(&client.top_markets(&vs, per_page, page).await?)?;
        }
        Command::Coin { id } => print_json(&client.coin(&id).await?)?,
        Command::Recent { limit, refresh } => print_json(&catalog::recently_added(&client, &cache, limit, refresh).await?)?,
        Command::Nfts { per_page, refresh } => print_json(&catalog::nft_collections(&client, &cache, per_page, refresh).await?)?,
        Command::Nft { id } => print_json(&client.nft(&id).await?)?,
    }

    Ok(())
}

/// Subscribe one channel and stream its messages as JSON lines until Ctrl+C
async fn watch(client: CoinGeckoClient, params: PollParams, channel: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let running = shutdown_handler::install()?;

    let key = channel.unwrap_or_else(|| params.channel_key());
    info!(%key, ids = %params.ids_param(), vs = %params.vs_currency, interval_ms = params.polling_interval.as_millis() as u64, "watching");

    let hub = MarketHub::new(Arc::new(client));
    hub.subscribe(key.as_str(), on_message, params);

    shutdown_handler::wait(&running).await;

    hub.disconnect();
    info!(%key, "watch stopped");
    Ok(())
}

fn on_message(message: &HubMessage) {
    match message {
        HubMessage::MarketUpdate(rows) => {
            for row in rows {
                info!(
                    id = %row.id,
                    price = ?row.current_price,
                    change_24h_pct = ?row.price_change_percentage_24h,
                    range_24h_pct = ?row.range_24h_pct(),
                    "market update"
                );
            }
        }
        HubMessage::Error(err) => error!(kind = ?err.kind, status = ?err.status, "{}", err.message),
        HubMessage::ConnectionStatus(connected) => info!(connected, "connection status"),
    }

    match serde_json::to_string(message) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!(%err, "failed to encode hub message"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
