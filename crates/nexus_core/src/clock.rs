//! Wall-clock abstraction.
//!
//! Timestamps and "today" defaults flow through `Clock` so tests can pin time.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC date as `YYYY-MM-DD`.
    fn today(&self) -> String {
        self.now().format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn today_formats_iso_date() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), "2024-03-09");
    }
}
