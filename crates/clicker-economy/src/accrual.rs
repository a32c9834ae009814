//! Resource gains: manual actions and passive ticks.
//!
//! Both credit `balance` and `lifetime_earned` by the same amount. Sums
//! saturate at `u64::MAX` so a maxed-out save stays pinned instead of
//! wrapping to zero.

use clicker_types::EconomyState;

/// Apply one manual action worth `per_action_yield` cubes.
///
/// Always succeeds. `per_action_yield` is at least 1 when it comes from
/// [`compute_rates`](crate::rates::compute_rates).
pub fn apply_action(state: EconomyState, per_action_yield: u64) -> EconomyState {
    credit(state, per_action_yield)
}

/// Apply one tick worth `per_interval_yield` cubes.
///
/// A zero yield returns the state unchanged.
pub fn apply_tick(state: EconomyState, per_interval_yield: u64) -> EconomyState {
    if per_interval_yield == 0 {
        return state;
    }
    credit(state, per_interval_yield)
}

fn credit(mut state: EconomyState, amount: u64) -> EconomyState {
    state.balance = state.balance.saturating_add(amount);
    state.lifetime_earned = state.lifetime_earned.saturating_add(amount);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_action_on_fresh_state() {
        let state = apply_action(EconomyState::default(), 1);
        assert_eq!(state.balance, 1);
        assert_eq!(state.lifetime_earned, 1);
    }

    #[test]
    fn ticks_accumulate() {
        let mut state = EconomyState::default();
        for _ in 0..3 {
            state = apply_tick(state, 10);
        }
        assert_eq!(state.balance, 30);
        assert_eq!(state.lifetime_earned, 30);
    }

    #[test]
    fn zero_yield_tick_is_noop() {
        let before = EconomyState {
            balance: 4,
            lifetime_earned: 9,
            ..EconomyState::default()
        };
        let after = apply_tick(before.clone(), 0);
        assert_eq!(after, before);
    }

    #[test]
    fn gains_never_decrease_and_saturate() {
        let state = EconomyState {
            balance: u64::MAX,
            lifetime_earned: u64::MAX,
            ..EconomyState::default()
        };
        let state = apply_action(state, 5);
        assert_eq!(state.balance, u64::MAX);
        assert_eq!(state.lifetime_earned, u64::MAX);
    }
}
