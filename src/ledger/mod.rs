// Trade ownership, exit reconciliation and day statistics
use chrono::{DateTime, Utc};

use crate::models::{AccountState, ClosedTrade, DailyStats, LedgerSnapshot, OpenTrade, Trade};

/// Owns every trade record plus the account and day aggregates
///
/// All trade mutation flows through here: `open` appends, `reconcile`
/// performs the open -> closed transition. Statistics accumulate until a
/// fresh ledger is constructed; the recorded date is carried along but
/// not used to roll the day over.
pub struct TradeLedger {
    trades: Vec<Trade>,
    daily: DailyStats,
    account: AccountState,
}

impl TradeLedger {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            trades: Vec::new(),
            daily: DailyStats::fresh(Utc::now().date_naive()),
            account: AccountState {
                balance: starting_balance,
            },
        }
    }

    /// Rebuild a ledger from a persisted snapshot
    ///
    /// The snapshot carries trades and day statistics only; the balance is
    /// recomputed as the starting balance plus realized pnl of every
    /// closed trade.
    pub fn restore(snapshot: LedgerSnapshot, starting_balance: f64) -> Self {
        let realized: f64 = snapshot
            .trades
            .iter()
            .filter_map(|t| match t {
                Trade::Closed(c) => Some(c.pnl),
                Trade::Open(_) => None,
            })
            .sum();

        tracing::info!(
            trades = snapshot.trades.len(),
            realized_pnl = realized,
            "Restored ledger from persistence"
        );

        Self {
            trades: snapshot.trades,
            daily: snapshot.daily_stats,
            account: AccountState {
                balance: starting_balance + realized,
            },
        }
    }

    /// Record a new open trade
    pub fn open(&mut self, trade: OpenTrade) -> anyhow::Result<()> {
        if self.has_open_trade() {
            anyhow::bail!("already have an open trade");
        }

        self.daily.trade_count += 1;
        self.trades.push(Trade::Open(trade));
        Ok(())
    }

    /// Close every open trade whose exit condition holds at `price`
    ///
    /// Updates cumulative pnl, win/loss counters (a flat close counts as
    /// neither) and the account balance. Returns the trades closed on
    /// this pass.
    pub fn reconcile(&mut self, price: f64, now: DateTime<Utc>) -> Vec<ClosedTrade> {
        let mut closed = Vec::new();

        for slot in self.trades.iter_mut() {
            let Trade::Open(open) = slot else { continue };
            if !open.should_exit(price) {
                continue;
            }

            let done = open.clone().close(price, now);

            self.daily.cumulative_pnl += done.pnl;
            if done.pnl > 0.0 {
                self.daily.wins += 1;
            } else if done.pnl < 0.0 {
                self.daily.losses += 1;
            }
            self.account.balance += done.pnl;

            tracing::info!(
                direction = ?done.direction,
                entry = done.entry_price,
                exit = done.exit_price,
                pnl = done.pnl,
                "Closed trade"
            );

            closed.push(done.clone());
            *slot = Trade::Closed(done);
        }

        closed
    }

    pub fn has_open_trade(&self) -> bool {
        self.trades.iter().any(|t| t.is_open())
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn daily_stats(&self) -> &DailyStats {
        &self.daily
    }

    pub fn balance(&self) -> f64 {
        self.account.balance
    }

    /// Full snapshot for persistence, replaced wholesale on every save
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            trades: self.trades.clone(),
            daily_stats: self.daily.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeDirection;

    fn buy(entry: f64, size: f64, stop: f64, tp: f64) -> OpenTrade {
        OpenTrade::new(TradeDirection::Buy, entry, size, stop, tp, Utc::now())
    }

    fn sell(entry: f64, size: f64, stop: f64, tp: f64) -> OpenTrade {
        OpenTrade::new(TradeDirection::Sell, entry, size, stop, tp, Utc::now())
    }

    #[test]
    fn test_open_increments_trade_count() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();

        assert!(ledger.has_open_trade());
        assert_eq!(ledger.daily_stats().trade_count, 1);
        assert_eq!(ledger.trades().len(), 1);
    }

    #[test]
    fn test_second_open_is_rejected() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();

        let result = ledger.open(buy(30100.0, 0.5, 29648.5, 31003.0));
        assert!(result.is_err());
        assert_eq!(ledger.trades().len(), 1);
    }

    #[test]
    fn test_reconcile_no_exit_keeps_trade_open() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();

        let closed = ledger.reconcile(30100.0, Utc::now());
        assert!(closed.is_empty());
        assert!(ledger.has_open_trade());
        assert_eq!(ledger.balance(), 10000.0);
    }

    #[test]
    fn test_reconcile_closes_winning_buy() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();

        let closed = ledger.reconcile(30900.0, Utc::now());
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, 450.0);

        assert!(!ledger.has_open_trade());
        assert_eq!(ledger.daily_stats().wins, 1);
        assert_eq!(ledger.daily_stats().losses, 0);
        assert_eq!(ledger.daily_stats().cumulative_pnl, 450.0);
        assert_eq!(ledger.balance(), 10450.0);
    }

    #[test]
    fn test_reconcile_closes_losing_buy_at_stop() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();

        let closed = ledger.reconcile(29550.0, Utc::now());
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, -225.0);

        assert_eq!(ledger.daily_stats().losses, 1);
        assert_eq!(ledger.daily_stats().wins, 0);
        assert_eq!(ledger.balance(), 9775.0);
    }

    #[test]
    fn test_reconcile_closes_winning_sell() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(sell(30000.0, 0.5, 30450.0, 29100.0)).unwrap();

        let closed = ledger.reconcile(29100.0, Utc::now());
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, 450.0);
        assert_eq!(ledger.daily_stats().wins, 1);
    }

    #[test]
    fn test_flat_close_counts_neither_win_nor_loss() {
        let mut ledger = TradeLedger::new(10000.0);
        // Stop loss placed exactly at entry forces a zero-pnl close
        ledger.open(buy(30000.0, 0.5, 30000.0, 30900.0)).unwrap();

        let closed = ledger.reconcile(30000.0, Utc::now());
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, 0.0);

        assert_eq!(ledger.daily_stats().wins, 0);
        assert_eq!(ledger.daily_stats().losses, 0);
        assert_eq!(ledger.daily_stats().cumulative_pnl, 0.0);
        assert_eq!(ledger.balance(), 10000.0);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut ledger = TradeLedger::new(10000.0);
        ledger.open(buy(30000.0, 0.5, 29550.0, 30900.0)).unwrap();
        ledger.reconcile(30900.0, Utc::now());
        ledger.open(sell(31000.0, 0.2, 31465.0, 30070.0)).unwrap();

        let snapshot = ledger.snapshot();
        let restored = TradeLedger::restore(snapshot.clone(), 10000.0);

        assert_eq!(restored.trades(), ledger.trades());
        assert_eq!(restored.daily_stats(), ledger.daily_stats());
        assert_eq!(restored.balance(), 10450.0); // starting + realized
        assert!(restored.has_open_trade());
    }

    #[test]
    fn test_restore_empty_snapshot() {
        let snapshot = LedgerSnapshot {
            trades: Vec::new(),
            daily_stats: DailyStats::fresh(Utc::now().date_naive()),
        };

        let ledger = TradeLedger::restore(snapshot, 5000.0);
        assert_eq!(ledger.balance(), 5000.0);
        assert!(!ledger.has_open_trade());
    }
}
