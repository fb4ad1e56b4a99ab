mod animation;
mod scale;
mod session;

pub use {animation::AnimationScheduler, session::ChartSession};

pub(crate) use scale::{build_scales, x_axis_ticks, y_axis_ticks, ScalePair};
