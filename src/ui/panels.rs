//! Header, stats grid, trade tape and status strip.

use eframe::egui::{Color32, Grid, RichText, ScrollArea, Ui};

use crate::chart::ChartSession;
use crate::config::plot::PLOT_CONFIG;
use crate::models::TradeSide;
use crate::ui::utils::{format_compact, format_pct, format_price};

fn pct_color(pct: f64) -> Color32 {
    if pct > 0.0 {
        PLOT_CONFIG.color_up
    } else if pct < 0.0 {
        PLOT_CONFIG.color_down
    } else {
        PLOT_CONFIG.color_neutral
    }
}

/// Symbol, latest price and session change, across the top.
pub fn render_header(ui: &mut Ui, session: &ChartSession) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(session.symbol().to_uppercase())
                .size(20.0)
                .strong()
                .color(PLOT_CONFIG.color_text_primary),
        );

        match session.latest_price() {
            Some(price) => {
                ui.label(
                    RichText::new(format!("${}", format_price(price)))
                        .size(20.0)
                        .monospace()
                        .color(PLOT_CONFIG.color_text_primary),
                );
                let pct = session.percent_change();
                ui.label(
                    RichText::new(format_pct(pct))
                        .size(14.0)
                        .color(pct_color(pct)),
                );
            }
            None => {
                ui.label(
                    RichText::new("--")
                        .size(20.0)
                        .color(PLOT_CONFIG.color_text_subdued),
                );
            }
        }
    });
}

/// 24h statistics grid driven by the hysteresis-gated snapshot.
pub fn render_stats(ui: &mut Ui, session: &ChartSession) {
    let market = session.market();

    ui.label(RichText::new("Market Stats").strong());
    ui.add_space(4.0);

    Grid::new("market_stats_grid")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            let rows = [
                ("24h Volume", format!("${}", format_compact(market.volume_24h))),
                ("Market Cap", format!("${}", format_compact(market.market_cap))),
                ("24h High", format!("${}", format_price(market.high_24h))),
                ("24h Low", format!("${}", format_price(market.low_24h))),
            ];
            for (label, value) in rows {
                ui.label(RichText::new(label).color(PLOT_CONFIG.color_text_subdued));
                ui.label(RichText::new(value).monospace());
                ui.end_row();
            }
        });
}

/// Most recent trades, newest first.
pub fn render_trade_tape(ui: &mut Ui, session: &ChartSession) {
    ui.label(RichText::new("Recent Trades").strong());
    ui.add_space(4.0);

    if session.trades().is_empty() {
        ui.label(RichText::new("No trades yet").color(PLOT_CONFIG.color_text_subdued));
        return;
    }

    ScrollArea::vertical()
        .id_salt("trade_tape")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            Grid::new("trade_tape_grid")
                .num_columns(4)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    for trade in session.trades().iter() {
                        let (side_text, side_color) = match trade.side {
                            TradeSide::Buy => ("BUY", PLOT_CONFIG.color_up),
                            TradeSide::Sell => ("SELL", PLOT_CONFIG.color_down),
                        };
                        ui.label(
                            RichText::new(&trade.time)
                                .monospace()
                                .color(PLOT_CONFIG.color_text_subdued),
                        );
                        ui.label(RichText::new(side_text).strong().color(side_color));
                        ui.label(RichText::new(format_price(trade.price)).monospace());
                        ui.label(RichText::new(format!("{:.4}", trade.amount)).monospace());
                        ui.end_row();
                    }
                });
        });
}

/// Connection dot, error advisory, feed source label and animation backlog.
pub fn render_status_strip(ui: &mut Ui, session: &ChartSession) {
    let status = session.feed_status();

    ui.horizontal(|ui| {
        let (dot_color, label) = if status.connected {
            (PLOT_CONFIG.status_dot_live, "Connected")
        } else {
            (PLOT_CONFIG.status_dot_seeding, "Connecting...")
        };
        ui.label(RichText::new("●").color(dot_color));
        ui.label(RichText::new(label).color(PLOT_CONFIG.color_text_subdued));

        ui.separator();

        let source = if status.streaming {
            "live stream"
        } else if status.live_seeded {
            "quote + synthetic"
        } else {
            "synthetic"
        };
        ui.label(RichText::new(source).color(PLOT_CONFIG.color_text_subdued));

        if let Some(err) = &status.error {
            ui.separator();
            ui.label(
                RichText::new(format!("feed degraded: {err}"))
                    .color(PLOT_CONFIG.color_warning),
            );
        }

        let backlog = session.scheduler().queue_len();
        if backlog > 0 {
            ui.separator();
            ui.label(
                RichText::new(format!("backlog {backlog}"))
                    .color(PLOT_CONFIG.color_text_subdued),
            );
        }
    });
}
