use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One streamed price update for the traded instrument
///
/// `bid` and `timestamp` are optional on the wire; the engine must not
/// depend on either being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub ask: f64,
    pub high: f64,
    pub low: f64,
    pub bid: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// A trade that is still running
///
/// Exit fields do not exist until the trade is closed; closing is a pure
/// transition into [`ClosedTrade`] via [`OpenTrade::close`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    pub id: Uuid,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub entry_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub id: Uuid,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub pnl: f64,
}

impl OpenTrade {
    pub fn new(
        direction: TradeDirection,
        entry_price: f64,
        size: f64,
        stop_loss: f64,
        take_profit: f64,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction,
            entry_price,
            size,
            stop_loss,
            take_profit,
            entry_time,
        }
    }

    /// Bracket exit condition at the current price, boundary inclusive
    pub fn should_exit(&self, price: f64) -> bool {
        match self.direction {
            TradeDirection::Buy => price >= self.take_profit || price <= self.stop_loss,
            TradeDirection::Sell => price <= self.take_profit || price >= self.stop_loss,
        }
    }

    /// Close the trade, consuming the open record
    pub fn close(self, exit_price: f64, exit_time: DateTime<Utc>) -> ClosedTrade {
        let pnl = match self.direction {
            TradeDirection::Buy => (exit_price - self.entry_price) * self.size,
            TradeDirection::Sell => (self.entry_price - exit_price) * self.size,
        };

        ClosedTrade {
            id: self.id,
            direction: self.direction,
            entry_price: self.entry_price,
            size: self.size,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            entry_time: self.entry_time,
            exit_time,
            exit_price,
            pnl,
        }
    }
}

/// A trade record owned by the ledger
///
/// Realized pnl exists exactly when the trade is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Trade {
    Open(OpenTrade),
    Closed(ClosedTrade),
}

impl Trade {
    pub fn is_open(&self) -> bool {
        matches!(self, Trade::Open(_))
    }
}

/// Per-day aggregate statistics
///
/// `date` is recorded when the stats are created and is carried through
/// persistence; it is not compared against the current date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub trade_count: u32,
    pub wins: u32,
    pub losses: u32,
    pub cumulative_pnl: f64,
}

impl DailyStats {
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            trade_count: 0,
            wins: 0,
            losses: 0,
            cumulative_pnl: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub balance: f64,
}

/// Outbound bracket order handed to the execution transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCommand {
    pub direction: TradeDirection,
    pub symbol: String,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub volume: f64,
}

/// The durable ledger snapshot, fully replaced on every save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub trades: Vec<Trade>,
    pub daily_stats: DailyStats,
}
