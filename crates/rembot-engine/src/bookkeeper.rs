//! Indicator and position snapshots plus the entry-blocking flags.

use rembot_core::error::BotError;
use rembot_core::types::MarketSnapshot;

/// Mutable per-bot bookkeeping, owned by the orchestrator and borrowed per tick.
#[derive(Debug, Default)]
pub struct PositionBookkeeper {
    indicator_snapshot: Option<MarketSnapshot>,
    position_snapshot: Option<MarketSnapshot>,
    long_blocked: bool,
    short_blocked: bool,
}

impl PositionBookkeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_long(&mut self) {
        self.long_blocked = true;
    }

    pub fn block_short(&mut self) {
        self.short_blocked = true;
    }

    pub fn unblock_long(&mut self) {
        self.long_blocked = false;
    }

    pub fn unblock_short(&mut self) {
        self.short_blocked = false;
    }

    pub fn is_long_blocked(&self) -> bool {
        self.long_blocked
    }

    pub fn is_short_blocked(&self) -> bool {
        self.short_blocked
    }

    /// Replace the latest indicator snapshot.
    pub fn refresh(&mut self, snapshot: MarketSnapshot) {
        self.indicator_snapshot = Some(snapshot);
    }

    /// The most recent indicator snapshot.
    pub fn indicator_snapshot(&self) -> Result<&MarketSnapshot, BotError> {
        self.indicator_snapshot.as_ref().ok_or(BotError::MissingSnapshot)
    }

    /// Snapshot taken when the current or last position was opened.
    pub fn position_snapshot(&self) -> Option<&MarketSnapshot> {
        self.position_snapshot.as_ref()
    }

    /// Freeze a copy of the current indicator snapshot as the position snapshot.
    pub fn capture_position_snapshot(&mut self) -> Result<&MarketSnapshot, BotError> {
        let snapshot = self.indicator_snapshot()?.clone();
        Ok(&*self.position_snapshot.insert(snapshot))
    }
}
