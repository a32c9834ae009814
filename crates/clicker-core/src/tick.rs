//! One passive-accrual step.
//!
//! The session loop calls [`run_tick`] once per time unit. Each tick
//! advances the playtime counter and, when the per-interval yield is
//! positive, credits that yield to both `balance` and `lifetime_earned`.

use clicker_economy::accrual;
use tracing::trace;

use crate::game::Game;

/// Summary of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Playtime after this tick.
    pub playtime_seconds: u64,
    /// Cubes credited by this tick (0 when nothing generates).
    pub credited: u64,
    /// Balance after this tick.
    pub balance: u64,
}

/// Execute one tick against `game`.
pub fn run_tick(game: &mut Game) -> TickSummary {
    game.playtime_seconds = game.playtime_seconds.saturating_add(1);

    let credited = game.rates.per_interval_yield;
    if credited > 0 {
        game.state = accrual::apply_tick(std::mem::take(&mut game.state), credited);
    }

    trace!(
        playtime_seconds = game.playtime_seconds,
        credited,
        balance = game.state.balance,
        "Tick"
    );

    TickSummary {
        playtime_seconds: game.playtime_seconds,
        credited,
        balance: game.state.balance,
    }
}
