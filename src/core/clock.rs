use std::fmt::{Display, Formatter};

use chrono::{NaiveDateTime, NaiveTime};
use serde_with::SerializeDisplay;

/// Wall-clock time of an hourly step, reported as `HH:MM`.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd, SerializeDisplay, derive_more::From)]
pub struct ClockTime(pub NaiveTime);

impl From<NaiveDateTime> for ClockTime {
    fn from(timestamp: NaiveDateTime) -> Self {
        Self(timestamp.time())
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
