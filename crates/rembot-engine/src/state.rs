//! Position state machine.
//!
//! Every tick runs the same protocol regardless of state: fetch a snapshot,
//! store it, then evaluate the current variant. Errors anywhere in the tick
//! are logged and the state is left as it was.

use chrono::Utc;
use rembot_core::error::{BotError, BotResult};
use rembot_core::traits::ExchangeAdapter;
use rembot_core::types::{MarketSnapshot, Position, PositionSide, PositionStatus};
use rembot_data::ClosedTrade;
use std::fmt;
use tracing::{debug, error, info};

use crate::bookkeeper::PositionBookkeeper;
use crate::performance::PerformanceTracker;

/// Where the bot stands with respect to the market.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    LongActive(Position),
    ShortActive(Position),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    /// The open position, if any.
    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Flat => None,
            PositionState::LongActive(p) | PositionState::ShortActive(p) => Some(p),
        }
    }

    fn active(position: Position) -> Self {
        match position.side {
            PositionSide::Long => PositionState::LongActive(position),
            PositionSide::Short => PositionState::ShortActive(position),
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Flat => write!(f, "FLAT"),
            PositionState::LongActive(_) => write!(f, "LONG"),
            PositionState::ShortActive(_) => write!(f, "SHORT"),
        }
    }
}

/// Everything one tick may touch.
pub struct TickContext<'a> {
    pub book: &'a mut PositionBookkeeper,
    pub exchange: &'a dyn ExchangeAdapter,
    pub tracker: &'a mut PerformanceTracker,
}

/// Long entry: MACD crossed up below zero with strong RSI, price under the EMA.
pub fn long_entry_signal(snapshot: &MarketSnapshot, blocked: bool) -> bool {
    !blocked
        && snapshot.macd_fast > snapshot.macd_signal
        && snapshot.macd_fast < 0.0
        && snapshot.rsi_6 > 50.0
        && snapshot.price < snapshot.ema_100
}

/// Short entry: mirror image of [`long_entry_signal`].
pub fn short_entry_signal(snapshot: &MarketSnapshot, blocked: bool) -> bool {
    !blocked
        && snapshot.macd_fast < snapshot.macd_signal
        && snapshot.macd_fast > 0.0
        && snapshot.rsi_6 < 50.0
        && snapshot.price > snapshot.ema_100
}

/// Run one tick from `state` and return the state to continue with.
pub async fn step(state: PositionState, ctx: &mut TickContext<'_>) -> PositionState {
    match advance(&state, ctx).await {
        Ok(Some(next)) => next,
        Ok(None) => state,
        Err(e) => {
            error!("{}", e);
            state
        }
    }
}

async fn advance(
    state: &PositionState,
    ctx: &mut TickContext<'_>,
) -> BotResult<Option<PositionState>> {
    let snapshot = ctx.exchange.fetch_indicators().await?;
    ctx.book.refresh(snapshot);

    match state {
        PositionState::Flat => apply_flat(ctx).await,
        PositionState::LongActive(position) | PositionState::ShortActive(position) => {
            apply_active(position, ctx).await
        }
    }
}

async fn apply_flat(ctx: &mut TickContext<'_>) -> BotResult<Option<PositionState>> {
    let snapshot = ctx.book.indicator_snapshot()?;
    let side = if long_entry_signal(snapshot, ctx.book.is_long_blocked()) {
        PositionSide::Long
    } else if short_entry_signal(snapshot, ctx.book.is_short_blocked()) {
        PositionSide::Short
    } else {
        return Ok(None);
    };

    let price = snapshot.price;
    let targets = match side {
        PositionSide::Long => ctx.exchange.enter_long(price).await?,
        PositionSide::Short => ctx.exchange.enter_short(price).await?,
    };
    let trigger = ctx.book.capture_position_snapshot()?.clone();

    info!(
        "Entered {} Current: {:.2} TP_PRICE: {:.2} SL_PRICE: {:.2}",
        side, trigger.price, targets.take_profit, targets.stop_loss
    );
    info!("{}", trigger);

    match side {
        PositionSide::Long => ctx.book.block_long(),
        PositionSide::Short => ctx.book.block_short(),
    }

    let position = Position::new(side, trigger.price, trigger.date, targets);
    Ok(Some(PositionState::active(position)))
}

async fn apply_active(
    position: &Position,
    ctx: &mut TickContext<'_>,
) -> BotResult<Option<PositionState>> {
    let snapshot = ctx.book.indicator_snapshot()?;
    let (exit_price, outcome) = match ctx.exchange.position_status(position, snapshot).await? {
        PositionStatus::Open => {
            debug!("{} position open at {:.2}", position.side, snapshot.price);
            return Ok(None);
        }
        PositionStatus::Closed {
            exit_price,
            outcome,
        } => (exit_price, outcome),
    };

    let trade = ClosedTrade::from_position(
        ctx.tracker.symbol(),
        position,
        exit_price,
        outcome,
        Utc::now(),
    );
    ctx.tracker
        .record(&trade)
        .map_err(|e| BotError::Ledger(e.to_string()))?;

    info!(
        "Closed {} {} Exit: {:.2} Entry: {:.2}",
        position.side, outcome, exit_price, position.entry_price
    );

    match position.side {
        PositionSide::Long => ctx.book.unblock_long(),
        PositionSide::Short => ctx.book.unblock_short(),
    }
    Ok(Some(PositionState::Flat))
}
