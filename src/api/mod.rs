// Tick feed clients
pub mod binance;

pub use binance::BinanceClient;
