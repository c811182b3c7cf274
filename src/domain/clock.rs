use time::{Date, OffsetDateTime};

/// Source of "today" for date-relative decisions.
pub trait Clock {
    fn today(&self) -> Date;
}

/// Wall clock, UTC calendar day.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Clock pinned to a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
