//! Background session re-validation for the browser.
//!
//! A `gloo-timers` interval re-arms itself every tick until the page is torn
//! down. Each tick re-validates non-public pages and surfaces the expiry
//! warning when the session is close to running out.

use chrono::TimeDelta;

use crate::GuardHandle;

/// Interval length in `setInterval` milliseconds, at least one.
#[must_use]
pub fn interval_millis(interval: TimeDelta) -> u32 {
    u32::try_from(interval.num_milliseconds().max(1)).unwrap_or(u32::MAX)
}

/// One timer tick: re-validate, then warn if expiry is near.
pub fn tick(guard: GuardHandle) {
    guard.with_value(|g| {
        if let Some(state) = g.periodic_check() {
            leptos::logging::log!("periodic session check: {state:?}");
        }
        g.show_session_warning();
    });
}

/// Start the self-rescheduling validation timer.
pub fn start(guard: GuardHandle, interval: TimeDelta) {
    #[cfg(feature = "hydrate")]
    {
        gloo_timers::callback::Interval::new(interval_millis(interval), move || tick(guard)).forget();
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (guard, interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_millis_defaults_to_five_minutes() {
        assert_eq!(interval_millis(TimeDelta::minutes(5)), 300_000);
    }

    #[test]
    fn interval_millis_never_zero() {
        assert_eq!(interval_millis(TimeDelta::zero()), 1);
        assert_eq!(interval_millis(TimeDelta::milliseconds(-5)), 1);
    }

    #[test]
    fn interval_millis_clamps_large_values() {
        assert_eq!(interval_millis(TimeDelta::days(365)), u32::MAX);
    }
}
