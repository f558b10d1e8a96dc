//! Clock implementations

use crate::core::traits::Clock;
use chrono::{DateTime, Days, NaiveDate, Utc};
use parking_lot::Mutex;

/// Wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock
///
/// Time only moves when told to, which makes midnight-boundary behaviour
/// reproducible.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock set to midnight UTC of `date`
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Move forward by whole days
    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock();
        if let Some(next) = now.checked_add_days(Days::new(days)) {
            *now = next;
        }
    }

    /// Move forward by a duration
    pub fn advance(&self, by: chrono::TimeDelta) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_manual_clock_advances_days() {
        let clock = ManualClock::at_date(date(2024, 2, 28));
        assert_eq!(clock.today(), date(2024, 2, 28));

        clock.advance_days(1);
        assert_eq!(clock.today(), date(2024, 2, 29));

        clock.advance_days(1);
        assert_eq!(clock.today(), date(2024, 3, 1));
    }

    #[test]
    fn test_manual_clock_crosses_midnight() {
        let clock = ManualClock::new(
            date(2024, 5, 1)
                .and_hms_opt(23, 59, 59)
                .unwrap()
                .and_utc(),
        );
        assert_eq!(clock.today(), date(2024, 5, 1));

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(clock.today(), date(2024, 5, 2));
    }
}
