//! The eframe application: owns the chart session, drains the feed once per
//! frame, and lays the panels out around the chart surface.

use std::time::Duration;

use eframe::egui::{CentralPanel, Context, Key, SidePanel, TopBottomPanel};
use eframe::{Frame, Storage};
use serde::{Deserialize, Serialize};

use crate::chart::ChartSession;
use crate::config::plot::PLOT_CONFIG;
use crate::config::DF;
use crate::data::FeedOptions;
use crate::ui::chart_view::ChartSurface;
use crate::ui::panels;
use crate::utils::now_timestamp_ms;
use crate::Cli;

// Field-level defaults (matching `Default for PricePulseApp`) instead of a
// container-level `#[serde(default)]`: the latter moves fields out of a
// default instance, which is forbidden on a type implementing `Drop`.
fn default_panel_visible() -> bool {
    true
}

#[derive(Deserialize, Serialize)]
pub struct PricePulseApp {
    // Panel visibility persists across sessions; everything else is live
    // feed state and rebuilds on startup.
    #[serde(default = "default_panel_visible")]
    show_stats: bool,
    #[serde(default = "default_panel_visible")]
    show_trades: bool,
    #[serde(skip)]
    session: Option<ChartSession>,
    #[serde(skip)]
    surface: ChartSurface,
}

impl Default for PricePulseApp {
    fn default() -> Self {
        Self {
            show_stats: true,
            show_trades: true,
            session: None,
            surface: ChartSurface::default(),
        }
    }
}

impl PricePulseApp {
    pub fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: PricePulseApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        cc.egui_ctx.set_visuals(eframe::egui::Visuals::dark());

        let mut session = ChartSession::new(args.symbol.clone());
        session.activate(
            now_timestamp_ms(),
            FeedOptions {
                live: args.live,
                offline: args.offline,
            },
        );
        app.session = Some(session);
        app
    }

    fn handle_keys(&mut self, ctx: &Context) {
        ctx.input(|i| {
            if i.key_pressed(Key::S) {
                self.show_stats = !self.show_stats;
            }
            if i.key_pressed(Key::T) {
                self.show_trades = !self.show_trades;
            }
        });
    }
}

impl eframe::App for PricePulseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let frame_start = std::time::Instant::now();

        self.handle_keys(ctx);

        let Some(session) = &mut self.session else {
            return;
        };

        let now_ms = now_timestamp_ms();
        session.poll(now_ms);
        let progress = session.advance_animation(now_ms);

        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            panels::render_header(ui, session);
            ui.add_space(4.0);
        });

        TopBottomPanel::bottom("status_strip").show(ctx, |ui| {
            panels::render_status_strip(ui, session);
        });

        if self.show_stats || self.show_trades {
            SidePanel::right("side_panel")
                .default_width(230.0)
                .show(ctx, |ui| {
                    if self.show_stats {
                        panels::render_stats(ui, session);
                        ui.add_space(12.0);
                    }
                    if self.show_trades {
                        panels::render_trade_tape(ui, session);
                    }
                });
        }

        CentralPanel::default()
            .frame(
                eframe::egui::Frame::new().fill(PLOT_CONFIG.chart_background),
            )
            .show(ctx, |ui| {
                self.surface.render(ui, session, progress);
            });

        // The feed ticks once a second but the scroll runs every frame.
        ctx.request_repaint_after(Duration::from_millis(33));

        if DF.log_performance {
            let elapsed = frame_start.elapsed();
            if elapsed.as_millis() > 16 {
                log::warn!("Slow frame: {}ms", elapsed.as_millis());
            }
        }
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}

impl Drop for PricePulseApp {
    fn drop(&mut self) {
        if let Some(session) = &mut self.session {
            session.teardown();
        }
    }
}
