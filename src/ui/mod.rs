mod app;
mod chart_view;
mod panels;
mod utils;

pub use app::PricePulseApp;
