//! Lazy conversion of elapsed time into scrap.
//!
//! The cursor only ever moves by whole seconds, so any sub-second remainder
//! stays in the gap between the cursor and `now` and is picked up by a later
//! settlement. The total minted over a span therefore does not depend on how
//! often settlement runs.

use chrono::{DateTime, Duration, Utc};

use super::state::State;
use crate::Scrap;

/// Result of a settlement that moved the cursor. `minted` is the actual
/// balance change, which is zero for a zero rate or a capped balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settlement {
    pub minted: Scrap,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Mint `accrual_rate` scrap per whole second elapsed since the cursor.
/// Returns `None` and leaves the state untouched when less than a second has
/// passed or the clock moved backwards. The cursor still advances when
/// nothing is minted.
pub(crate) fn settle(
    state: &mut State,
    now: DateTime<Utc>,
    accrual_rate: Scrap,
) -> Option<Settlement> {
    let elapsed = (now - state.settled_at).num_seconds();
    if elapsed <= 0 {
        return None;
    }

    let from = state.settled_at;
    // `to <= now`, so this never fails in practice
    let to = from.checked_add_signed(Duration::seconds(elapsed))?;
    let before = state.balance;
    let after = before + accrual_rate.saturating_mul(elapsed.unsigned_abs());
    let minted = after.checked_sub(before).unwrap_or(Scrap::ZERO);

    state.balance = after;
    state.settled_at = to;

    Some(Settlement { minted, from, to })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: Scrap = Scrap::new(1);

    fn start() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[test]
    fn under_one_second_mints_nothing() {
        let mut state = State::new(start());
        let result = settle(&mut state, start() + Duration::milliseconds(500), RATE);

        assert!(result.is_none());
        assert_eq!(state.balance, Scrap::ZERO);
        assert_eq!(state.settled_at, start());
    }

    #[test]
    fn ten_seconds_mints_ten() {
        let mut state = State::new(start());
        let result = settle(&mut state, start() + Duration::seconds(10), RATE);

        assert_eq!(
            result,
            Some(Settlement {
                minted: Scrap::new(10),
                from: start(),
                to: start() + Duration::seconds(10),
            })
        );
        assert_eq!(state.balance, Scrap::new(10));
    }

    #[test]
    fn second_settle_without_advance_mints_nothing() {
        let mut state = State::new(start());
        let now = start() + Duration::seconds(1);
        assert!(settle(&mut state, now, RATE).is_some());
        assert!(settle(&mut state, now, RATE).is_none());
        assert_eq!(state.balance, Scrap::new(1));
    }

    #[test]
    fn partial_seconds_carry_over() {
        let mut state = State::new(start());

        let first = settle(&mut state, start() + Duration::milliseconds(1900), RATE);
        assert_eq!(first.map(|s| s.minted), Some(Scrap::new(1)));
        assert_eq!(state.settled_at, start() + Duration::seconds(1));

        let second = settle(&mut state, start() + Duration::milliseconds(2100), RATE);
        assert_eq!(second.map(|s| s.minted), Some(Scrap::new(1)));
        assert_eq!(state.balance, Scrap::new(2));
    }

    #[test]
    fn split_polling_matches_single_settle() {
        let mut polled = State::new(start());
        let mut total = Scrap::ZERO;
        for ms in [500, 1100] {
            if let Some(s) = settle(&mut polled, start() + Duration::milliseconds(ms), RATE) {
                total += s.minted;
            }
        }

        let mut once = State::new(start());
        settle(&mut once, start() + Duration::milliseconds(1100), RATE);

        assert_eq!(total, Scrap::new(1));
        assert_eq!(polled.balance, once.balance);
        assert_eq!(polled.settled_at, once.settled_at);
    }

    #[test]
    fn polling_every_millisecond_matches_floor_of_total() {
        let mut state = State::new(start());
        for ms in 1..=5_250 {
            settle(&mut state, start() + Duration::milliseconds(ms), RATE);
        }
        assert_eq!(state.balance, Scrap::new(5));
        assert_eq!(state.settled_at, start() + Duration::seconds(5));
    }

    #[test]
    fn clock_moving_backwards_mints_nothing() {
        let mut state = State::new(start() + Duration::seconds(5));
        assert!(settle(&mut state, start(), RATE).is_none());
        assert_eq!(state.settled_at, start() + Duration::seconds(5));
    }

    #[test]
    fn rate_scales_minted_amount() {
        let mut state = State::new(start());
        let result = settle(&mut state, start() + Duration::seconds(4), Scrap::new(3));
        assert_eq!(result.map(|s| s.minted), Some(Scrap::new(12)));
    }

    #[test]
    fn balance_saturates_instead_of_wrapping() {
        let mut state = State::new(start());
        state.balance = Scrap::new(u64::MAX - 1);
        settle(&mut state, start() + Duration::seconds(10), RATE);
        assert_eq!(state.balance, Scrap::new(u64::MAX));
    }

    #[test]
    fn minted_reports_actual_balance_change_at_cap() {
        let mut state = State::new(start());
        state.balance = Scrap::new(1 << 63);

        let result = settle(
            &mut state,
            start() + Duration::seconds(2),
            Scrap::new(1 << 62),
        );
        assert_eq!(result.map(|s| s.minted), Some(Scrap::new((1 << 63) - 1)));
        assert_eq!(state.balance, Scrap::new(u64::MAX));
    }

    #[test]
    fn zero_rate_advances_cursor_without_minting() {
        let mut state = State::new(start());
        let result = settle(&mut state, start() + Duration::seconds(5), Scrap::ZERO);

        assert_eq!(result.map(|s| s.minted), Some(Scrap::ZERO));
        assert_eq!(state.balance, Scrap::ZERO);
        assert_eq!(state.settled_at, start() + Duration::seconds(5));
    }
}
