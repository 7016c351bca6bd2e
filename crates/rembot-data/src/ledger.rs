//! Append-only CSV ledger of closed positions.

use chrono::{DateTime, SecondsFormat, Utc};
use rembot_core::types::{Position, PositionSide, TradeOutcome};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Ledger write failures.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the results ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedTrade {
    pub closed_at: String,
    pub symbol: String,
    pub side: PositionSide,
    pub entry_date: String,
    pub entry_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub exit_price: f64,
    pub outcome: TradeOutcome,
    pub pnl_pct: f64,
}

impl ClosedTrade {
    /// Describe `position` closing at `exit_price` with `outcome`.
    pub fn from_position(
        symbol: &str,
        position: &Position,
        exit_price: f64,
        outcome: TradeOutcome,
        closed_at: DateTime<Utc>,
    ) -> Self {
        let targets = position.targets();
        Self {
            closed_at: closed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            symbol: symbol.to_string(),
            side: position.side,
            entry_date: position.entry_date.clone(),
            entry_price: position.entry_price,
            take_profit: targets.take_profit,
            stop_loss: targets.stop_loss,
            exit_price,
            outcome,
            pnl_pct: position.return_pct(exit_price),
        }
    }
}

/// CSV file that only ever grows by one row per closed position.
#[derive(Debug, Clone)]
pub struct ResultsLedger {
    path: PathBuf,
}

impl ResultsLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty.
    pub fn append(&self, trade: &ClosedTrade) -> Result<(), LedgerError> {
        let io_err = |source| LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let is_empty = file.metadata().map_err(io_err)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(trade)?;
        writer.flush().map_err(io_err)?;

        debug!(path = %self.path.display(), "Ledger row appended");
        Ok(())
    }
}
