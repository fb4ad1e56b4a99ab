//! Coordinate mappings for the chart: time -> pixel-x and price -> pixel-y.
//!
//! Scales are rebuilt whole whenever the buffer extent or the viewport
//! changes; nothing is patched incrementally. Building is pure, so identical
//! inputs always produce identical mappings.

use crate::config::{plot::PLOT_CONFIG, CHART};
use crate::models::Tick;

/// An affine domain -> range mapping with a guarded zero-span domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f32,
    r1: f32,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    fn span(&self) -> f64 {
        let span = self.d1 - self.d0;
        // A single-sample domain still has to map somewhere finite.
        if span.abs() < f64::EPSILON {
            1.0
        } else {
            span
        }
    }

    pub fn map(&self, v: f64) -> f32 {
        let t = (v - self.d0) / self.span();
        self.r0 + (t as f32) * (self.r1 - self.r0)
    }

    pub fn invert(&self, px: f32) -> f64 {
        let r_span = self.r1 - self.r0;
        let t = if r_span.abs() < f32::EPSILON {
            0.0
        } else {
            (px - self.r0) / r_span
        };
        self.d0 + t as f64 * self.span()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }
}

/// The pair of mappings one repaint works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePair {
    pub x: LinearScale,
    pub y: LinearScale,
}

/// Build both scales from the series the scheduler is currently showing.
///
/// `x_domain` is the time extent to anchor the x-axis on (the scheduler pins
/// it to the pre-append window while a scroll is playing). The y-domain is
/// centered on the latest price with asymmetric safety padding, then unioned
/// with the raw price extent so the path never clips:
/// `pad = price * max(min_pad_fraction, |pct_change| / 100 * 0.01)`.
pub fn build_scales(
    series: &[Tick],
    x_domain: (i64, i64),
    pct_change: f64,
    width: f32,
    height: f32,
) -> ScalePair {
    let m = &CHART.margins;

    let x = LinearScale::new(
        (x_domain.0 as f64, x_domain.1 as f64),
        (m.left, width - m.right),
    );

    let current_price = series.last().map(|t| t.price).unwrap_or(0.0);
    let (min_price, max_price) = price_extent(series).unwrap_or((current_price, current_price));

    let pad_fraction = CHART.min_pad_fraction.max(pct_change.abs() / 100.0 * 0.01);
    let pad = current_price * pad_fraction;

    let y_min = (current_price - pad).min(min_price);
    let y_max = (current_price + pad).max(max_price);

    // Pixel-y grows downward, so the range is inverted.
    let y = LinearScale::new((y_min, y_max), (height - m.bottom, m.top));

    ScalePair { x, y }
}

fn price_extent(series: &[Tick]) -> Option<(f64, f64)> {
    let mut it = series.iter();
    let first = it.next()?.price;
    let (mut lo, mut hi) = (first, first);
    for t in it {
        lo = lo.min(t.price);
        hi = hi.max(t.price);
    }
    Some((lo, hi))
}

// Helper: snap a raw step to a human-friendly one (1, 2, 5, 10, 20, 50...)
fn calculate_adaptive_step(range: f64, target_count: f64) -> f64 {
    let raw_step = range / target_count.max(1.0);
    if raw_step <= 0.0 || !raw_step.is_finite() {
        return 1.0;
    }
    let mag = 10.0_f64.powi(raw_step.log10().floor() as i32);
    let normalized = raw_step / mag; // Scale to 1.0 .. 10.0

    let nice_step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };

    nice_step * mag
}

/// Gridline values for the y-axis. The count adapts to the viewport height
/// (fewer labels on small viewports); values land on nice round steps.
pub fn y_axis_ticks(y: &LinearScale, height: f32) -> Vec<f64> {
    let (lo, hi) = y.domain();
    if !(hi - lo).is_finite() || hi <= lo {
        return Vec::new();
    }

    let labels_can_fit = (height / PLOT_CONFIG.y_tick_spacing_px).floor().max(2.0);
    let step = calculate_adaptive_step(hi - lo, f64::from(labels_can_fit));

    let mut ticks = Vec::new();
    let mut v = (lo / step).ceil() * step;
    while v <= hi + step * 1e-6 {
        ticks.push(v);
        v += step;
    }
    ticks
}

/// Label timestamps for the x-axis, snapped to whole-second steps.
pub fn x_axis_ticks(x: &LinearScale, width: f32) -> Vec<i64> {
    let (lo, hi) = x.domain();
    if hi <= lo {
        return Vec::new();
    }

    let labels_can_fit = (width / PLOT_CONFIG.x_tick_spacing_px).floor().max(2.0);
    let step_s = calculate_adaptive_step((hi - lo) / 1000.0, f64::from(labels_can_fit)).max(1.0);
    let step_ms = (step_s * 1000.0) as i64;

    let mut ticks = Vec::new();
    let mut t = (lo as i64 / step_ms + 1) * step_ms;
    while (t as f64) <= hi {
        ticks.push(t);
        t += step_ms;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> Vec<Tick> {
        points.iter().map(|&(t, p)| Tick::new(t, p)).collect()
    }

    #[test]
    fn rebuild_is_deterministic_for_identical_inputs() {
        let s = series(&[(0, 50_000.0), (1000, 50_100.0), (2000, 49_950.0)]);
        let a = build_scales(&s, (0, 2000), 0.2, 800.0, 400.0);
        let b = build_scales(&s, (0, 2000), 0.2, 800.0, 400.0);

        assert_eq!(a, b);
        for v in [0.0, 500.0, 1999.0] {
            assert_eq!(a.x.map(v), b.x.map(v));
        }
        for p in [49_950.0, 50_000.0, 50_100.0] {
            assert_eq!(a.y.map(p), b.y.map(p));
        }
    }

    #[test]
    fn y_domain_unions_padding_with_raw_extent() {
        let s = series(&[(0, 49_000.0), (1000, 52_000.0), (2000, 50_000.0)]);
        let scales = build_scales(&s, (0, 2000), 0.1, 800.0, 400.0);
        let (y_min, y_max) = scales.y.domain();

        // The raw extent always fits, so the path never clips.
        assert!(y_min <= 49_000.0);
        assert!(y_max >= 52_000.0);
    }

    #[test]
    fn y_padding_floor_applies_when_percent_change_is_tiny() {
        let s = series(&[(0, 50_000.0), (1000, 50_000.0)]);
        let scales = build_scales(&s, (0, 1000), 0.0, 800.0, 400.0);
        let (y_min, y_max) = scales.y.domain();

        let expected_pad = 50_000.0 * CHART.min_pad_fraction;
        assert!((y_min - (50_000.0 - expected_pad)).abs() < 1e-6);
        assert!((y_max - (50_000.0 + expected_pad)).abs() < 1e-6);
    }

    #[test]
    fn y_range_is_inverted() {
        let s = series(&[(0, 100.0), (1000, 200.0)]);
        let scales = build_scales(&s, (0, 1000), 0.0, 800.0, 400.0);

        // Higher price maps to a smaller pixel-y.
        assert!(scales.y.map(200.0) < scales.y.map(100.0));
    }

    #[test]
    fn map_and_invert_round_trip() {
        let scale = LinearScale::new((0.0, 120_000.0), (12.0, 736.0));
        for v in [0.0, 1_000.0, 60_000.0, 120_000.0] {
            let back = scale.invert(scale.map(v));
            assert!((back - v).abs() < 1.0, "{} -> {}", v, back);
        }
    }

    #[test]
    fn single_point_domain_does_not_produce_nan() {
        let s = series(&[(1000, 50_000.0)]);
        let scales = build_scales(&s, (1000, 1000), 0.0, 800.0, 400.0);

        assert!(scales.x.map(1000.0).is_finite());
        assert!(scales.y.map(50_000.0).is_finite());
    }

    #[test]
    fn tick_counts_shrink_with_the_viewport() {
        let scale = LinearScale::new((0.0, 1_000.0), (0.0, 1.0));
        let tall = y_axis_ticks(&scale, 800.0);
        let short = y_axis_ticks(&scale, 150.0);

        assert!(tall.len() > short.len());
        assert!(!short.is_empty());
    }

    #[test]
    fn x_ticks_land_on_whole_steps_inside_the_domain() {
        let scale = LinearScale::new((1_000.0, 121_000.0), (0.0, 800.0));
        let ticks = x_axis_ticks(&scale, 800.0);

        assert!(!ticks.is_empty());
        for pair in ticks.windows(2) {
            assert_eq!(pair[1] - pair[0], ticks[1] - ticks[0]);
        }
        for t in &ticks {
            assert!(*t >= 1_000 && *t <= 121_000);
        }
    }
}
