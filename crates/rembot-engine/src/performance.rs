//! Win/loss accounting for closed positions.

use rembot_config::BotSettings;
use rembot_core::types::TradeOutcome;
use rembot_data::{ClosedTrade, LedgerError, ResultsLedger};
use serde::Serialize;
use tracing::debug;

/// Counts wins and losses and appends each closed position to the results ledger.
#[derive(Debug)]
pub struct PerformanceTracker {
    symbol: String,
    wins: usize,
    losses: usize,
    ledger: Option<ResultsLedger>,
}

impl PerformanceTracker {
    /// Tracker without a ledger; closes are only counted.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            wins: 0,
            losses: 0,
            ledger: None,
        }
    }

    /// Tracker writing to the configured CSV ledger.
    pub fn from_settings(settings: &BotSettings) -> Self {
        Self::new(settings.position.symbol.clone())
            .with_ledger(ResultsLedger::new(&settings.output.csv_path))
    }

    pub fn with_ledger(mut self, ledger: ResultsLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Record a closed position. Counters only move once the ledger row is written.
    pub fn record(&mut self, trade: &ClosedTrade) -> Result<(), LedgerError> {
        if let Some(ledger) = &self.ledger {
            ledger.append(trade)?;
        }

        match trade.outcome {
            TradeOutcome::Win => self.wins += 1,
            TradeOutcome::Loss => self.losses += 1,
        }
        debug!(wins = self.wins, losses = self.losses, "Performance updated");
        Ok(())
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn losses(&self) -> usize {
        self.losses
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses
    }

    /// Share of closed positions that hit take-profit, in percent.
    pub fn win_rate_pct(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.wins as f64 * 100.0 / self.total() as f64
        }
    }

    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary {
            symbol: self.symbol.clone(),
            total_trades: self.total(),
            wins: self.wins,
            losses: self.losses,
            win_rate_pct: self.win_rate_pct(),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub symbol: String,
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate_pct: f64,
}

impl PerformanceSummary {
    /// Generate a text report.
    pub fn report(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     REMBOT RESULTS                         \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!("  Closed Positions:    {}\n", self.total_trades));
        s.push_str(&format!("  Wins:                {}\n", self.wins));
        s.push_str(&format!("  Losses:              {}\n", self.losses));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", self.win_rate_pct));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
