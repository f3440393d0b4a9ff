// Position sizing and the daily-loss breaker
use crate::models::TradeDirection;
use thiserror::Error;

/// Risk parameters, percentages expressed in whole units (2.0 == 2%)
#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub account_risk_pct: f64,
    pub stop_loss_pct: f64,
    pub take_profit_ratio: f64,
    pub min_position_size: f64,
    pub max_position_size: f64,
    pub max_daily_loss_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            account_risk_pct: 2.0,
            stop_loss_pct: 1.5,
            take_profit_ratio: 2.0,
            min_position_size: 0.001,
            max_position_size: 1.0,
            max_daily_loss_pct: 5.0,
        }
    }
}

/// Why an entry was refused; a policy suppression, not a failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskRefusal {
    #[error("daily loss {cumulative_pnl:.2} past limit -{limit:.2}, new entries suppressed")]
    DailyLoss { cumulative_pnl: f64, limit: f64 },
}

/// A fully specified entry: direction, price, bracket and size
#[derive(Debug, Clone, PartialEq)]
pub struct BracketOrder {
    pub direction: TradeDirection,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub size: f64,
}

pub struct RiskManager {
    config: RiskConfig,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Daily-loss breaker; checked before any sizing arithmetic
    pub fn check_daily_loss(&self, balance: f64, cumulative_pnl: f64) -> Result<(), RiskRefusal> {
        let limit = balance * self.config.max_daily_loss_pct / 100.0;
        if cumulative_pnl < -limit {
            return Err(RiskRefusal::DailyLoss {
                cumulative_pnl,
                limit,
            });
        }
        Ok(())
    }

    /// Build the bracket for an entry at the current price
    pub fn build_bracket(
        &self,
        direction: TradeDirection,
        price: f64,
        balance: f64,
    ) -> BracketOrder {
        let stop_frac = self.config.stop_loss_pct / 100.0;
        let profit_frac = self.config.take_profit_ratio * stop_frac;

        let (stop_loss, take_profit) = match direction {
            TradeDirection::Buy => (price * (1.0 - stop_frac), price * (1.0 + profit_frac)),
            TradeDirection::Sell => (price * (1.0 + stop_frac), price * (1.0 - profit_frac)),
        };

        let risk_amount = balance * self.config.account_risk_pct / 100.0;
        let raw_size = risk_amount / (price - stop_loss).abs();
        let size = raw_size.clamp(self.config.min_position_size, self.config.max_position_size);

        BracketOrder {
            direction,
            price,
            stop_loss,
            take_profit,
            size,
        }
    }

    /// Gate and size an entry in one step
    pub fn size_entry(
        &self,
        direction: TradeDirection,
        price: f64,
        balance: f64,
        cumulative_pnl: f64,
    ) -> Result<BracketOrder, RiskRefusal> {
        self.check_daily_loss(balance, cumulative_pnl)?;
        Ok(self.build_bracket(direction, price, balance))
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
