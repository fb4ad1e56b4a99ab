//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // PRICE LINE + AREA
    pub line_color: Color32,
    pub line_width: f32,
    pub area_fill_color: Color32,
    /// Marker on the most recent sample
    pub head_dot_color: Color32,
    pub head_dot_radius: f32,

    // AXES / GRID
    pub grid_color: Color32,
    pub grid_line_width: f32,
    pub axis_label_color: Color32,
    pub axis_text_size: f32,
    /// Target pixel spacing between y-axis gridlines (fewer on small viewports)
    pub y_tick_spacing_px: f32,
    /// Target pixel spacing between x-axis time labels
    pub x_tick_spacing_px: f32,

    // TOOLTIP
    pub tooltip_bg: Color32,
    pub tooltip_border: Color32,
    pub tooltip_text_color: Color32,
    pub tooltip_text_size: f32,
    pub crosshair_color: Color32,

    // SEMANTIC COLORS
    pub color_up: Color32,
    pub color_down: Color32,
    pub color_neutral: Color32,
    pub color_warning: Color32,
    pub color_text_primary: Color32,
    pub color_text_subdued: Color32,

    // STATUS STRIP
    pub status_dot_live: Color32,
    pub status_dot_seeding: Color32,

    pub chart_background: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    line_color: Color32::from_rgb(0, 191, 255), // Deep Sky Blue
    line_width: 2.0,
    area_fill_color: Color32::from_rgba_premultiplied(0, 48, 64, 96),
    head_dot_color: Color32::from_rgb(255, 215, 0), // Gold
    head_dot_radius: 3.5,

    grid_color: Color32::from_gray(45),
    grid_line_width: 1.0,
    axis_label_color: Color32::from_gray(140),
    axis_text_size: 11.0,
    y_tick_spacing_px: 56.0,
    x_tick_spacing_px: 110.0,

    tooltip_bg: Color32::from_rgba_premultiplied(20, 24, 28, 230),
    tooltip_border: Color32::from_gray(90),
    tooltip_text_color: Color32::WHITE,
    tooltip_text_size: 12.0,
    crosshair_color: Color32::from_gray(110),

    color_up: Color32::from_rgb(38, 166, 154),  // TradingView Green
    color_down: Color32::from_rgb(239, 83, 80), // TradingView Red
    color_neutral: Color32::LIGHT_GRAY,
    color_warning: Color32::from_rgb(255, 215, 0),
    color_text_primary: Color32::WHITE,
    color_text_subdued: Color32::GRAY,

    status_dot_live: Color32::from_rgb(100, 255, 100),
    status_dot_seeding: Color32::from_rgb(255, 165, 0),

    chart_background: Color32::from_rgb(14, 17, 20),
};
