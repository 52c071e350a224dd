//! Wall clock and date labels
//!
//! The simulation counts frames; the only wall-clock reader is the combo
//! window, which gets `now_ms` from a `Clock` each tick.

use std::cell::Cell;

/// Millisecond wall clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time: `Date.now()` in the browser, the system clock natively
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Hand-driven clock for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Today's date for a ranking entry, e.g. `2026/10/18`
#[cfg(target_arch = "wasm32")]
pub fn today_label() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{}/{}/{}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date()
    )
}

/// Today's date for a ranking entry, e.g. `2026/10/18`
#[cfg(not(target_arch = "wasm32"))]
pub fn today_label() -> String {
    use time::OffsetDateTime;
    use time::macros::format_description;

    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description!("[year]/[month padding:none]/[day padding:none]");
    now.format(format).unwrap_or_else(|e| {
        log::warn!("Date formatting failed: {e}");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(16.5);
        assert_eq!(clock.now_ms(), 116.5);
        clock.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a > 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_today_label_shape() {
        let label = today_label();
        let parts: Vec<&str> = label.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }
}
