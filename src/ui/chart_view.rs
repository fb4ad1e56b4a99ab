//! Raw-painter chart surface: grid, area fill, price line, head marker and
//! hover tooltip.
//!
//! Geometry (projected points, area quads, scales) is cached and rebuilt
//! only when the hash of (series, viewport) changes; the scroll offset is a
//! pure translate applied at paint time. While a scroll cycle is in flight
//! the scales stay anchored on the pre-append window and the content layer
//! slides left by `progress * slot_width`, so the new sample enters from
//! past the right edge instead of the chart rescaling mid-animation.

use std::hash::{Hash, Hasher};

use eframe::egui::{
    pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, Vec2,
};

use crate::chart::{build_scales, x_axis_ticks, y_axis_ticks, ChartSession, ScalePair};
use crate::config::plot::PLOT_CONFIG;
use crate::config::CHART;
use crate::models::Tick;
use crate::ui::utils::format_price;
use crate::utils::epoch_ms_to_clock_string;

struct SurfaceCache {
    data_hash: u64,
    scales: ScalePair,
    plot_rect: Rect,
    slot_width: f32,
    series: Vec<Tick>,
    /// Projected line points, absolute coords, no scroll offset.
    points: Vec<Pos2>,
}

#[derive(Default)]
pub struct ChartSurface {
    cache: Option<SurfaceCache>,
}

impl ChartSurface {
    pub fn render(&mut self, ui: &mut Ui, session: &ChartSession, progress: f32) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::hover());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, PLOT_CONFIG.chart_background);

        let Some(x_domain) = session.scheduler().x_domain() else {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Waiting for feed...",
                FontId::proportional(14.0),
                PLOT_CONFIG.color_text_subdued,
            );
            return;
        };
        if session.scheduler().series().len() < 2 || x_domain.0 >= x_domain.1 {
            return;
        }

        self.refresh_cache(session, x_domain, rect);
        let Some(cache) = &self.cache else { return };

        let offset = vec2(-progress * cache.slot_width, 0.0);

        draw_grid(&painter, rect, cache, offset.x);

        // Content clips to the plot area so the evicting sample slides out
        // under the left margin rather than over the labels.
        let content = painter.with_clip_rect(cache.plot_rect.expand2(vec2(0.0, 2.0)));

        let baseline = cache.plot_rect.max.y;
        for pair in cache.points.windows(2) {
            let (a, b) = (pair[0] + offset, pair[1] + offset);
            content.add(Shape::convex_polygon(
                vec![a, b, pos2(b.x, baseline), pos2(a.x, baseline)],
                PLOT_CONFIG.area_fill_color,
                Stroke::NONE,
            ));
        }

        content.add(Shape::line(
            cache.points.iter().map(|p| *p + offset).collect(),
            Stroke::new(PLOT_CONFIG.line_width, PLOT_CONFIG.line_color),
        ));

        if let Some(head) = cache.points.last() {
            content.circle_filled(
                *head + offset,
                PLOT_CONFIG.head_dot_radius,
                PLOT_CONFIG.head_dot_color,
            );
        }

        if let Some(pointer) = response.hover_pos() {
            if cache.plot_rect.contains(pointer) {
                draw_tooltip(&painter, rect, cache, offset.x, pointer);
            }
        }
    }

    /// Rebuild projections only when the series or viewport actually
    /// changed; every steady-state frame between feed ticks is a cache hit.
    fn refresh_cache(&mut self, session: &ChartSession, x_domain: (i64, i64), rect: Rect) {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for t in session.scheduler().series() {
            t.time.hash(&mut hasher);
            t.price.to_bits().hash(&mut hasher);
        }
        x_domain.hash(&mut hasher);
        session.percent_change().to_bits().hash(&mut hasher);
        rect.min.x.to_bits().hash(&mut hasher);
        rect.min.y.to_bits().hash(&mut hasher);
        rect.max.x.to_bits().hash(&mut hasher);
        rect.max.y.to_bits().hash(&mut hasher);
        let current_hash = hasher.finish();

        if let Some(cache) = &self.cache {
            if cache.data_hash == current_hash {
                return;
            }
        }

        let series: Vec<Tick> = session.scheduler().series().iter().copied().collect();
        let scales = build_scales(
            &series,
            x_domain,
            session.percent_change(),
            rect.width(),
            rect.height(),
        );

        let m = &CHART.margins;
        let plot_rect = Rect::from_min_max(
            pos2(rect.min.x + m.left, rect.min.y + m.top),
            pos2(rect.max.x - m.right, rect.max.y - m.bottom),
        );

        // One slot = the horizontal distance between adjacent samples.
        let slot_width = plot_rect.width() / (session.scheduler().visible_count() - 1).max(1) as f32;

        let points: Vec<Pos2> = series
            .iter()
            .map(|t| {
                pos2(
                    rect.min.x + scales.x.map(t.time as f64),
                    rect.min.y + scales.y.map(t.price),
                )
            })
            .collect();

        self.cache = Some(SurfaceCache {
            data_hash: current_hash,
            scales,
            plot_rect,
            slot_width,
            series,
            points,
        });
    }
}

fn draw_grid(painter: &eframe::egui::Painter, rect: Rect, cache: &SurfaceCache, offset_x: f32) {
    let grid_stroke = Stroke::new(PLOT_CONFIG.grid_line_width, PLOT_CONFIG.grid_color);
    let font = FontId::monospace(PLOT_CONFIG.axis_text_size);
    let plot_rect = cache.plot_rect;

    for price in y_axis_ticks(&cache.scales.y, rect.height()) {
        let y = rect.min.y + cache.scales.y.map(price);
        if y < plot_rect.min.y || y > plot_rect.max.y {
            continue;
        }
        painter.line_segment(
            [pos2(plot_rect.min.x, y), pos2(plot_rect.max.x, y)],
            grid_stroke,
        );
        painter.text(
            pos2(plot_rect.max.x + 6.0, y),
            Align2::LEFT_CENTER,
            format_price(price),
            font.clone(),
            PLOT_CONFIG.axis_label_color,
        );
    }

    // Time gridlines scroll with the content.
    for time in x_axis_ticks(&cache.scales.x, rect.width()) {
        let x = rect.min.x + cache.scales.x.map(time as f64) + offset_x;
        if x < plot_rect.min.x || x > plot_rect.max.x {
            continue;
        }
        painter.line_segment(
            [pos2(x, plot_rect.min.y), pos2(x, plot_rect.max.y)],
            grid_stroke,
        );
        painter.text(
            pos2(x, plot_rect.max.y + 6.0),
            Align2::CENTER_TOP,
            epoch_ms_to_clock_string(time),
            font.clone(),
            PLOT_CONFIG.axis_label_color,
        );
    }
}

/// Crosshair + label for the sample nearest the pointer. The pointer is
/// unprojected through the scroll offset so the hit tracks what is on
/// screen, not the un-scrolled coordinates.
fn draw_tooltip(
    painter: &eframe::egui::Painter,
    rect: Rect,
    cache: &SurfaceCache,
    offset_x: f32,
    pointer: Pos2,
) {
    let data_time = cache.scales.x.invert(pointer.x - rect.min.x - offset_x);
    let plot_rect = cache.plot_rect;

    let idx = match cache
        .series
        .binary_search_by(|t| (t.time as f64).total_cmp(&data_time))
    {
        Ok(i) => i,
        Err(i) => {
            // Between two samples: take the nearer one.
            if i == 0 {
                0
            } else if i >= cache.series.len() {
                cache.series.len() - 1
            } else {
                let before = cache.series[i - 1].time as f64;
                let after = cache.series[i].time as f64;
                if data_time - before <= after - data_time {
                    i - 1
                } else {
                    i
                }
            }
        }
    };
    let tick = cache.series[idx];
    let anchor = cache.points[idx] + Vec2::new(offset_x, 0.0);
    if anchor.x < plot_rect.min.x || anchor.x > plot_rect.max.x {
        return;
    }

    let crosshair = Stroke::new(1.0, PLOT_CONFIG.crosshair_color);
    painter.line_segment(
        [
            pos2(anchor.x, plot_rect.min.y),
            pos2(anchor.x, plot_rect.max.y),
        ],
        crosshair,
    );
    painter.line_segment(
        [
            pos2(plot_rect.min.x, anchor.y),
            pos2(plot_rect.max.x, anchor.y),
        ],
        crosshair,
    );
    painter.circle_filled(anchor, 3.0, PLOT_CONFIG.line_color);

    let label = format!(
        "{}  {}",
        epoch_ms_to_clock_string(tick.time),
        format_price(tick.price)
    );
    let font = FontId::monospace(PLOT_CONFIG.tooltip_text_size);
    let galley = painter.layout_no_wrap(label, font, PLOT_CONFIG.tooltip_text_color);

    let pad = 6.0;
    let size = galley.size() + vec2(pad * 2.0, pad * 2.0);
    // Prefer above-right of the marker; clamp inside the plot area.
    let mut pos = pos2(anchor.x + 10.0, anchor.y - size.y - 10.0);
    pos.x = pos.x.clamp(plot_rect.min.x, plot_rect.max.x - size.x);
    pos.y = pos.y.clamp(plot_rect.min.y, plot_rect.max.y - size.y);
    let box_rect = Rect::from_min_size(pos, size);

    painter.rect_filled(box_rect, 3.0, PLOT_CONFIG.tooltip_bg);
    painter.rect_stroke(
        box_rect,
        3.0,
        Stroke::new(1.0, PLOT_CONFIG.tooltip_border),
        StrokeKind::Inside,
    );
    painter.galley(box_rect.min + vec2(pad, pad), galley, Color32::WHITE);
}
