mod time_utils;

pub use time_utils::{epoch_ms_to_clock_string, now_timestamp_ms};
