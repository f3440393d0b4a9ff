// Technical indicators module
// Pure functions over fixed-length price windows

pub mod moving_average;
pub mod rsi;
pub mod stochastic;

pub use moving_average::calculate_sma;
pub use rsi::calculate_rsi;
pub use stochastic::{calculate_stochastic, Stochastic};

/// Lookback period shared by SMA, RSI and the stochastic oscillator
pub const INDICATOR_PERIOD: usize = 14;
/// Smoothing length of the stochastic %D signal line
pub const STOCH_SIGNAL_PERIOD: usize = 3;

/// Latest indicator values over one window slice
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub sma: f64,
    pub rsi: f64,
    pub stochastic: Stochastic,
}

/// The indicator collaborator injected into the engine
///
/// Takes equal-length close/high/low slices, oldest first, and returns
/// the latest snapshot or `None` when any component cannot be computed.
pub type IndicatorFn = fn(&[f64], &[f64], &[f64]) -> Option<IndicatorSnapshot>;

/// Default [`IndicatorFn`] wired by the binary
pub fn compute_snapshot(closes: &[f64], highs: &[f64], lows: &[f64]) -> Option<IndicatorSnapshot> {
    let sma = calculate_sma(closes, INDICATOR_PERIOD)?;
    let rsi = calculate_rsi(closes, INDICATOR_PERIOD)?;
    let stochastic =
        calculate_stochastic(closes, highs, lows, INDICATOR_PERIOD, STOCH_SIGNAL_PERIOD)?;

    Some(IndicatorSnapshot {
        sma,
        rsi,
        stochastic,
    })
}
