// Per-tick orchestration: window -> reconcile -> evaluate -> size -> persist
use chrono::Utc;

use crate::indicators::{IndicatorFn, INDICATOR_PERIOD};
use crate::ledger::TradeLedger;
use crate::market::PriceWindow;
use crate::models::{ClosedTrade, OpenTrade, OrderCommand, Tick};
use crate::persistence::SnapshotStore;
use crate::risk::{RiskConfig, RiskManager};
use crate::strategy::{evaluate_entry, Bias, Thresholds};
use crate::Result;

/// Observable effect of one tick, for the orchestration layer to act on
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A bracket order to forward to the execution transport
    OrderIssued(OrderCommand),
    /// An open trade hit its stop or take-profit and was closed
    TradeClosed(ClosedTrade),
}

/// Engine construction parameters
pub struct EngineConfig {
    pub symbol: String,
    pub starting_balance: f64,
    pub thresholds: Thresholds,
    pub risk: RiskConfig,
}

impl EngineConfig {
    pub fn new(symbol: impl Into<String>, starting_balance: f64) -> Self {
        Self {
            symbol: symbol.into(),
            starting_balance,
            thresholds: Thresholds::default(),
            risk: RiskConfig::default(),
        }
    }
}

/// The decision engine for one instrument
///
/// Constructed with injected collaborators (snapshot store, indicator
/// function) so a test can drive it with a literal tick sequence.
/// Strictly event-driven: one call to [`Engine::handle_tick`] fully
/// processes one tick, persistence awaited inside the critical path.
pub struct Engine {
    symbol: String,
    window: PriceWindow,
    bias: Bias,
    ledger: TradeLedger,
    risk: RiskManager,
    thresholds: Thresholds,
    indicators: IndicatorFn,
    store: Box<dyn SnapshotStore>,
}

impl Engine {
    /// Build the engine, restoring the ledger from the store
    ///
    /// A load failure is non-fatal: the engine logs it and starts with a
    /// fresh ledger.
    pub async fn bootstrap(
        config: EngineConfig,
        mut store: Box<dyn SnapshotStore>,
        indicators: IndicatorFn,
    ) -> Self {
        let ledger = match store.load().await {
            Ok(Some(snapshot)) => TradeLedger::restore(snapshot, config.starting_balance),
            Ok(None) => TradeLedger::new(config.starting_balance),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load ledger snapshot, starting fresh");
                TradeLedger::new(config.starting_balance)
            }
        };

        Self {
            symbol: config.symbol,
            window: PriceWindow::default(),
            bias: Bias::None,
            ledger,
            risk: RiskManager::new(config.risk),
            thresholds: config.thresholds,
            indicators,
            store,
        }
    }

    /// Process one inbound tick to completion
    ///
    /// Order within the tick: window update, exit reconciliation (a close
    /// frees the single-position slot for this same tick's evaluation),
    /// indicator snapshot, entry evaluation, risk gating and sizing,
    /// ledger append. The snapshot is persisted after every ledger
    /// mutation, before the corresponding event is emitted.
    pub async fn handle_tick(&mut self, tick: &Tick) -> Result<Vec<EngineEvent>> {
        self.window.push(tick);
        let now = tick.timestamp.unwrap_or_else(Utc::now);
        let mut events = Vec::new();

        let closed = self.ledger.reconcile(tick.ask, now);
        if !closed.is_empty() {
            self.persist().await;
            events.extend(closed.into_iter().map(EngineEvent::TradeClosed));
        }

        if self.window.len() < INDICATOR_PERIOD {
            return Ok(events);
        }

        // RSI needs one extra sample for its first delta; request it once available
        let samples = (INDICATOR_PERIOD + 1).min(self.window.len());
        let Some((closes, highs, lows)) = self.window.last_n(samples) else {
            return Ok(events);
        };
        let Some(snapshot) = (self.indicators)(&closes, &highs, &lows) else {
            tracing::debug!("Indicator snapshot unavailable, no decision this tick");
            return Ok(events);
        };

        let (signal, bias) = evaluate_entry(
            &snapshot,
            self.ledger.has_open_trade(),
            self.bias,
            &self.thresholds,
        );
        self.bias = bias;

        let Some(signal) = signal else {
            return Ok(events);
        };

        tracing::info!(reason = %signal.reason, "Entry signal");

        match self.risk.size_entry(
            signal.direction,
            tick.ask,
            self.ledger.balance(),
            self.ledger.daily_stats().cumulative_pnl,
        ) {
            Ok(order) => {
                let trade = OpenTrade::new(
                    order.direction,
                    order.price,
                    order.size,
                    order.stop_loss,
                    order.take_profit,
                    now,
                );
                self.ledger.open(trade)?;
                self.persist().await;

                events.push(EngineEvent::OrderIssued(OrderCommand {
                    direction: order.direction,
                    symbol: self.symbol.clone(),
                    price: order.price,
                    stop_loss: order.stop_loss,
                    take_profit: order.take_profit,
                    volume: order.size,
                }));
            }
            Err(refusal) => {
                tracing::warn!(%refusal, "Entry suppressed by risk policy");
            }
        }

        Ok(events)
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn bias(&self) -> Bias {
        self.bias
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn persist(&mut self) {
        // A failed save is a warning; in-memory state stays authoritative
        // and the next mutation retries independently.
        if let Err(e) = self.store.save(&self.ledger.snapshot()).await {
            tracing::warn!(error = %e, "Failed to persist ledger snapshot");
        }
    }
}
