//! Position types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a futures position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }

    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "LONG"),
            PositionSide::Short => write!(f, "SHORT"),
        }
    }
}

/// Take-profit and stop-loss prices fixed at entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPrices {
    pub take_profit: f64,
    pub stop_loss: f64,
}

impl TargetPrices {
    pub fn new(take_profit: f64, stop_loss: f64) -> Self {
        Self {
            take_profit,
            stop_loss,
        }
    }
}

/// Result of a closed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeOutcome {
    /// Take-profit reached
    Win,
    /// Stop-loss reached
    Loss,
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOutcome::Win => write!(f, "WIN"),
            TradeOutcome::Loss => write!(f, "LOSS"),
        }
    }
}

/// Whether an open position is still live on the exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionStatus {
    Open,
    Closed {
        exit_price: f64,
        outcome: TradeOutcome,
    },
}

/// An open position. Targets are fixed when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Long or short
    pub side: PositionSide,
    /// Price at entry
    pub entry_price: f64,
    /// Date label of the snapshot that triggered the entry
    pub entry_date: String,
    targets: TargetPrices,
}

impl Position {
    /// Create a new position.
    pub fn new(
        side: PositionSide,
        entry_price: f64,
        entry_date: impl Into<String>,
        targets: TargetPrices,
    ) -> Self {
        Self {
            side,
            entry_price,
            entry_date: entry_date.into(),
            targets,
        }
    }

    /// Take-profit and stop-loss prices.
    pub fn targets(&self) -> TargetPrices {
        self.targets
    }

    /// Compare a market price against the targets.
    ///
    /// A long closes with a win once price reaches the take-profit from below
    /// and with a loss once it falls to the stop-loss; a short mirrors that.
    pub fn check_exit(&self, price: f64) -> PositionStatus {
        let TargetPrices {
            take_profit,
            stop_loss,
        } = self.targets;

        let (tp_hit, sl_hit) = match self.side {
            PositionSide::Long => (price >= take_profit, price <= stop_loss),
            PositionSide::Short => (price <= take_profit, price >= stop_loss),
        };

        if tp_hit {
            PositionStatus::Closed {
                exit_price: take_profit,
                outcome: TradeOutcome::Win,
            }
        } else if sl_hit {
            PositionStatus::Closed {
                exit_price: stop_loss,
                outcome: TradeOutcome::Loss,
            }
        } else {
            PositionStatus::Open
        }
    }

    /// Signed return in percent for a given exit price, before leverage.
    pub fn return_pct(&self, exit_price: f64) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        self.side.sign() * (exit_price - self.entry_price) / self.entry_price * 100.0
    }
}
