mod history;
mod market;
mod tick;
mod trades;

pub use tick::Tick;

pub use {
    history::HistoryBuffer,
    market::MarketSnapshot,
    trades::{TradeRecord, TradeSide, TradeTape},
};
