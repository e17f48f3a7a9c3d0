use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{core::clock::ClockTime, quantity::energy::KilowattHours};

/// Maximal contiguous run of hours where an activity exceeds the threshold.
///
/// Serialized as `["HH:MM", "HH:MM", kWh]`.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityWindow(
    /// First active hour.
    pub ClockTime,
    /// Last active hour.
    pub ClockTime,
    /// Energy summed over the active hours.
    pub KilowattHours,
);

impl ActivityWindow {
    pub const fn start(&self) -> ClockTime {
        self.0
    }

    pub const fn end(&self) -> ClockTime {
        self.1
    }

    pub const fn energy(&self) -> KilowattHours {
        self.2
    }
}

/// Detect the activity windows in a single left-to-right scan.
///
/// An hour is active when its value strictly exceeds the threshold.
/// A run that is still active at the final hour is closed at that hour.
pub fn detect<I>(series: I, threshold: KilowattHours) -> Vec<ActivityWindow>
where
    I: IntoIterator<Item = (NaiveDateTime, KilowattHours)>,
{
    let mut windows = Vec::new();
    let mut current: Option<ActivityWindow> = None;

    for (timestamp, value) in series {
        if value > threshold {
            match &mut current {
                Some(window) => {
                    window.1 = ClockTime::from(timestamp);
                    window.2 += value;
                }
                None => {
                    let clock_time = ClockTime::from(timestamp);
                    current = Some(ActivityWindow(clock_time, clock_time, value));
                }
            }
        } else if let Some(window) = current.take() {
            windows.push(window);
        }
    }

    windows.extend(current);
    windows
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(values: &[f64]) -> Vec<(NaiveDateTime, KilowattHours)> {
        let midnight = NaiveDate::from_ymd_opt(2025, 9, 27).unwrap().and_hms_opt(0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(hour, value)| {
                (midnight + chrono::TimeDelta::hours(hour as i64), KilowattHours(*value))
            })
            .collect()
    }

    #[test]
    fn test_detect_separate_runs() {
        let windows = detect(series(&[0.0, 6.0, 7.0, 0.0, 8.0, 0.0]), KilowattHours(5.0));
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start().to_string(), "01:00");
        assert_eq!(windows[0].end().to_string(), "02:00");
        assert_eq!(windows[0].energy(), KilowattHours(13.0));
        assert_eq!(windows[1].start().to_string(), "04:00");
        assert_eq!(windows[1].end().to_string(), "04:00");
        assert_eq!(windows[1].energy(), KilowattHours(8.0));
    }

    #[test]
    fn test_detect_closes_run_at_final_hour() {
        let windows = detect(series(&[0.0, 6.0, 6.0]), KilowattHours(5.0));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end().to_string(), "02:00");
        assert_eq!(windows[0].energy(), KilowattHours(12.0));
    }

    #[test]
    fn test_detect_threshold_is_exclusive() {
        assert!(detect(series(&[5.0, 5.0]), KilowattHours(5.0)).is_empty());
    }

    #[test]
    fn test_detect_empty() {
        assert!(detect(series(&[]), KilowattHours(5.0)).is_empty());
    }

    #[test]
    fn test_serialize_as_triple() -> serde_json::Result<()> {
        let windows = detect(series(&[0.0, 2.5]), KilowattHours::ZERO);
        assert_eq!(serde_json::to_string(&windows)?, r#"[["01:00","01:00",2.5]]"#);
        Ok(())
    }
}
