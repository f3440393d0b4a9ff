// Entry signal evaluation
use crate::indicators::IndicatorSnapshot;
use crate::models::TradeDirection;

/// Last-signaled direction, latched across ticks to suppress repeated
/// identical signals while the same conditions persist
///
/// The latch is not reset when a trade closes; only the opposite
/// condition firing moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    None,
    Buy,
    Sell,
}

/// Thresholds for entry conditions
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stoch_oversold: f64,
    pub stoch_overbought: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub direction: TradeDirection,
    pub reason: String,
}

/// Evaluate entry conditions for one indicator snapshot
///
/// Pure function of its inputs; returns the optional signal and the bias
/// to carry into the next tick. Rules, in order: an open trade gates all
/// new signals; oversold RSI with stochastic confirmation buys unless
/// already buy-biased; overbought sells unless already sell-biased.
pub fn evaluate_entry(
    snapshot: &IndicatorSnapshot,
    has_open_trade: bool,
    bias: Bias,
    thresholds: &Thresholds,
) -> (Option<EntrySignal>, Bias) {
    if has_open_trade {
        return (None, bias);
    }

    let stoch = &snapshot.stochastic;

    if snapshot.rsi < thresholds.rsi_oversold
        && stoch.k < thresholds.stoch_oversold
        && stoch.d < thresholds.stoch_oversold
        && bias != Bias::Buy
    {
        let signal = EntrySignal {
            direction: TradeDirection::Buy,
            reason: format!(
                "RSI {:.1} oversold, stochastic {:.1}/{:.1} confirming",
                snapshot.rsi, stoch.k, stoch.d
            ),
        };
        return (Some(signal), Bias::Buy);
    }

    if snapshot.rsi > thresholds.rsi_overbought
        && stoch.k > thresholds.stoch_overbought
        && stoch.d > thresholds.stoch_overbought
        && bias != Bias::Sell
    {
        let signal = EntrySignal {
            direction: TradeDirection::Sell,
            reason: format!(
                "RSI {:.1} overbought, stochastic {:.1}/{:.1} confirming",
                snapshot.rsi, stoch.k, stoch.d
            ),
        };
        return (Some(signal), Bias::Sell);
    }

    (None, bias)
}
