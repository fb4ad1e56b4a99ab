//! One-shot quote seed: a single REST read of the current price for a
//! symbol, bounded by the configured timeout and retry count.

use std::sync::mpsc::{channel, Receiver};
use std::thread;

use anyhow::{anyhow, Context as _};
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::rest_api::{TickerPriceParams, TickerPriceResponse};
use binance_sdk::spot::SpotRestApi;
use tokio::runtime::Runtime;

use crate::config::{DF, FEED};

/// Kick off the seed fetch on a dedicated runtime thread. The caller polls
/// the returned channel; a dropped/failed thread reads as a seed failure and
/// the feed falls back, so nothing here can wedge the UI.
pub fn spawn_seed_fetch(symbol: String) -> Receiver<Result<f64, String>> {
    let (tx, rx) = channel();

    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                let _ = tx.send(Err(format!("runtime init failed: {e}")));
                return;
            }
        };

        let outcome = rt.block_on(fetch_quote(&symbol));

        if DF.log_seed_outcome {
            match &outcome {
                Ok(price) => log::info!("SEED: {} quoted at {:.2}", symbol, price),
                Err(e) => log::warn!("SEED: {} quote failed: {}", symbol, e),
            }
        }

        let _ = tx.send(outcome.map_err(|e| format!("{e:#}")));
    });

    rx
}

async fn fetch_quote(symbol: &str) -> anyhow::Result<f64> {
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(FEED.client.timeout_ms)
        .retries(FEED.client.retries)
        .backoff(FEED.client.backoff_ms)
        .build()
        .map_err(|e| anyhow!("REST config: {e:?}"))?;

    let client = SpotRestApi::production(rest_conf);

    let params = TickerPriceParams {
        symbol: Some(symbol.to_uppercase()),
        symbols: None,
        symbol_status: None,
    };

    let response = client
        .ticker_price(params)
        .await
        .map_err(|e| anyhow!("quote request: {e:?}"))?;

    let data = response
        .data()
        .await
        .map_err(|e| anyhow!("quote response: {e:?}"))?;

    // Either response shape carries the price as a string; a missing or
    // unparsable field is the "malformed quote" failure class and degrades
    // exactly like an unreachable endpoint.
    let price_str = match data {
        TickerPriceResponse::TickerPriceResponse1(single) => single.price,
        TickerPriceResponse::TickerPriceResponse2(all) => {
            let wanted = symbol.to_lowercase();
            all.into_iter()
                .find(|t| {
                    t.symbol
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase() == wanted)
                })
                .and_then(|t| t.price)
        }
        _ => None,
    };

    let price_str = price_str.ok_or_else(|| anyhow!("quote response missing price field"))?;
    let price: f64 = price_str
        .parse()
        .with_context(|| format!("malformed quote price {price_str:?}"))?;

    if price <= 0.0 {
        return Err(anyhow!("non-positive quote price {price}"));
    }
    Ok(price)
}
