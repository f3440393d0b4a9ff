use serde::{Deserialize, Serialize};

/// Latest stochastic oscillator values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stochastic {
    /// Fast line: position of the close inside the period's high/low range
    pub k: f64,
    /// Signal line: mean of the most recent %K values
    pub d: f64,
}

/// Calculate the stochastic oscillator (%K with a %D signal line)
///
/// %K is computed for every index with a full `period` lookback; %D
/// averages the last `signal_period` %K values, or as many as exist.
pub fn calculate_stochastic(
    closes: &[f64],
    highs: &[f64],
    lows: &[f64],
    period: usize,
    signal_period: usize,
) -> Option<Stochastic> {
    if period == 0 || signal_period == 0 {
        return None;
    }
    if closes.len() < period || highs.len() != closes.len() || lows.len() != closes.len() {
        return None;
    }

    let mut k_series = Vec::with_capacity(closes.len() - period + 1);
    for i in (period - 1)..closes.len() {
        let start = i + 1 - period;
        let low = lows[start..=i].iter().fold(f64::MAX, |acc, v| acc.min(*v));
        let high = highs[start..=i].iter().fold(f64::MIN, |acc, v| acc.max(*v));
        let range = (high - low).max(f64::EPSILON);
        k_series.push(((closes[i] - low) / range) * 100.0);
    }

    let take = signal_period.min(k_series.len());
    let d = k_series.iter().rev().take(take).sum::<f64>() / take as f64;
    let k = *k_series.last()?;

    Some(Stochastic { k, d })
}
