//! Optional live push channel: the Binance trade stream for one symbol,
//! emitting the same Tick shape as the synthetic generator.
//!
//! The chart is correct without this layer; the generator stays
//! authoritative as fallback. Reconnects with capped exponential backoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Runtime;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::{DF, FEED};
use crate::models::Tick;

fn build_stream_url(symbol: &str) -> String {
    format!(
        "{}{}@trade",
        FEED.ws.combined_base_url,
        symbol.to_lowercase()
    )
}

/// Spawn the stream on its own runtime thread. The thread exits when the
/// shutdown flag is raised or the receiving side of `tx` is dropped.
pub fn spawn_live_stream(symbol: String, tx: Sender<Tick>, shutdown: Arc<AtomicBool>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("live stream runtime init failed: {e}");
                return;
            }
        };
        rt.block_on(run_stream_with_reconnect(&symbol, tx, shutdown));
    });
}

async fn run_stream_with_reconnect(symbol: &str, tx: Sender<Tick>, shutdown: Arc<AtomicBool>) {
    let url = build_stream_url(symbol);
    let mut reconnect_delay = FEED.ws.initial_reconnect_delay_sec;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }

        if DF.log_feed_events {
            log::info!("Attempting connection to {url}");
        }

        match run_stream(&url, &tx, &shutdown).await {
            Ok(StreamEnd::Shutdown) => return,
            Ok(StreamEnd::Closed) => {
                log::warn!("Live stream closed. Reconnecting...");
                reconnect_delay = FEED.ws.initial_reconnect_delay_sec;
            }
            Err(e) => {
                log::error!(
                    "Live stream failed: {}. Retrying in {}s...",
                    e,
                    reconnect_delay
                );
            }
        }

        sleep(Duration::from_secs(reconnect_delay)).await;
        reconnect_delay = (reconnect_delay * 2).min(FEED.ws.max_reconnect_delay_sec);
    }
}

enum StreamEnd {
    /// Teardown requested or the session dropped its receiver.
    Shutdown,
    /// Server closed the socket; worth reconnecting.
    Closed,
}

async fn run_stream(
    url: &str,
    tx: &Sender<Tick>,
    shutdown: &Arc<AtomicBool>,
) -> Result<StreamEnd, Box<dyn std::error::Error + Send + Sync>> {
    let (ws_stream, _) = connect_async(url).await?;
    let (_write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(StreamEnd::Shutdown);
        }

        match msg {
            Ok(Message::Text(text)) => {
                if let Ok(v) = serde_json::from_str::<serde_json::Value>(&text) {
                    if let Some(tick) = parse_trade_event(&v) {
                        if DF.log_feed_events {
                            log::info!("[live-tick] {} -> {:.6}", tick.time, tick.price);
                        }
                        if tx.send(tick).is_err() {
                            return Ok(StreamEnd::Shutdown);
                        }
                    }
                } else {
                    log::warn!("Failed to parse live stream JSON message");
                }
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(StreamEnd::Closed)
}

/// Combined-stream payloads wrap the event: `{"stream": ..., "data": {...}}`.
/// A trade event carries the fill price as string `p` and the trade time as
/// ms epoch `T`.
fn parse_trade_event(v: &serde_json::Value) -> Option<Tick> {
    let data = &v["data"];
    if data["e"].as_str()? != "trade" {
        return None;
    }

    let price: f64 = data["p"].as_str()?.parse().ok()?;
    let time = data["T"].as_i64()?;
    if price <= 0.0 {
        return None;
    }
    Some(Tick::new(time, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trade_event_parses_to_a_tick() {
        let v = json!({
            "stream": "btcusdt@trade",
            "data": {
                "e": "trade",
                "s": "BTCUSDT",
                "p": "50123.45",
                "q": "0.012",
                "T": 1_700_000_000_123_i64
            }
        });

        let tick = parse_trade_event(&v).expect("valid trade event");
        assert_eq!(tick.time, 1_700_000_000_123);
        assert!((tick.price - 50_123.45).abs() < 1e-9);
    }

    #[test]
    fn non_trade_and_malformed_events_are_ignored() {
        let other = json!({"data": {"e": "kline", "p": "1.0", "T": 1}});
        assert!(parse_trade_event(&other).is_none());

        let bad_price = json!({"data": {"e": "trade", "p": "not-a-number", "T": 1}});
        assert!(parse_trade_event(&bad_price).is_none());

        let missing_time = json!({"data": {"e": "trade", "p": "1.0"}});
        assert!(parse_trade_event(&missing_time).is_none());
    }

    #[test]
    fn stream_url_targets_the_lowercased_trade_topic() {
        assert_eq!(
            build_stream_url("BTCUSDT"),
            format!("{}btcusdt@trade", FEED.ws.combined_base_url)
        );
    }
}
