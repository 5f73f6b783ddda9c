use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};

use crate::error::{ClockError, Result};

/// Wall-clock time for one city, derived from a single UTC instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTime {
    pub hour: u32,
    pub minute: u32,
    /// Seconds including the sub-second fraction, in `0.0..60.0`.
    pub second_fractional: f64,
    pub day_of_month: u32,
    pub date: NaiveDate,
    /// Zero-padded `HH:MM:SS`.
    pub display: String,
}

/// Shifts `now` by a whole number of hours and breaks it into clock fields.
///
/// The shift is purely additive: no DST, no minute-level offsets. Fails only
/// when the shifted instant leaves chrono's representable range.
pub fn resolve(now: DateTime<Utc>, utc_offset_hours: i32) -> Result<ResolvedTime> {
    let local = now
        .naive_utc()
        .checked_add_signed(TimeDelta::hours(i64::from(utc_offset_hours)))
        .ok_or_else(|| {
            ClockError::ClockSource(format!("{now} shifted by {utc_offset_hours}h is out of range"))
        })?;

    // chrono reports a leap second as second 59 with nanos >= 1e9
    let subsec = f64::from(local.nanosecond().min(999_999_999)) / 1e9;
    let (hour, minute, second) = (local.hour(), local.minute(), local.second());

    Ok(ResolvedTime {
        hour,
        minute,
        second_fractional: f64::from(second) + subsec,
        day_of_month: local.day(),
        date: local.date(),
        display: format!("{hour:02}:{minute:02}:{second:02}"),
    })
}

/// Source of the current UTC instant.
pub trait TimeSource {
    fn now(&self) -> Result<DateTime<Utc>>;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Result<DateTime<Utc>> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::ClockSource(e.to_string()))?;
        let secs = i64::try_from(since_epoch.as_secs())
            .map_err(|e| ClockError::ClockSource(e.to_string()))?;
        DateTime::<Utc>::from_timestamp(secs, since_epoch.subsec_nanos())
            .ok_or_else(|| ClockError::ClockSource(format!("{secs}s is out of range")))
    }
}

/// A settable clock for driving the controller deterministically.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    instant: Cell<DateTime<Utc>>,
}

impl FixedTimeSource {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Cell::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.instant.set(instant);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.instant.set(self.instant.get() + delta);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(self.instant.get())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Result<DateTime<Utc>> {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::rc::Rc<T> {
    fn now(&self) -> Result<DateTime<Utc>> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn negative_offset_rolls_back_a_day() {
        let t = resolve(utc(2024, 1, 1, 2, 0, 0), -5).unwrap();
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(t.day_of_month, 31);
        assert_eq!((t.hour, t.minute), (21, 0));
        assert_eq!(t.display, "21:00:00");
    }

    #[test]
    fn positive_offset_rolls_forward_a_day() {
        let t = resolve(utc(2024, 1, 1, 20, 0, 0), 9).unwrap();
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(t.day_of_month, 2);
        assert_eq!(t.display, "05:00:00");
    }

    #[test]
    fn zero_offset_is_identity() {
        let t = resolve(utc(2024, 2, 29, 13, 7, 5), 0).unwrap();
        assert_eq!((t.hour, t.minute), (13, 7));
        assert_eq!(t.second_fractional, 5.0);
        assert_eq!(t.day_of_month, 29);
        assert_eq!(t.display, "13:07:05");
    }

    #[test]
    fn keeps_sub_second_fraction() {
        let now = utc(2024, 6, 1, 10, 15, 42) + TimeDelta::milliseconds(250);
        let t = resolve(now, 0).unwrap();
        assert!((t.second_fractional - 42.25).abs() < 1e-9);
        assert_eq!(t.display, "10:15:42");
    }

    #[test]
    fn fixed_source_advances() {
        let source = FixedTimeSource::new(utc(2024, 1, 1, 0, 0, 0));
        source.advance(TimeDelta::milliseconds(100));
        let now = source.now().unwrap();
        assert_eq!(now, utc(2024, 1, 1, 0, 0, 0) + TimeDelta::milliseconds(100));
    }

    #[test]
    fn leap_second_stays_on_second_fifty_nine() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 1_500)
            .unwrap()
            .and_utc();
        let t = resolve(leap, 0).unwrap();
        assert_eq!(t.display, "23:59:59");
        assert!(t.second_fractional >= 59.0 && t.second_fractional < 60.0);
    }

    #[test]
    fn shift_past_the_calendar_limit_is_an_error() {
        let err = resolve(DateTime::<Utc>::MAX_UTC, 14).unwrap_err();
        assert!(matches!(err, ClockError::ClockSource(_)));
        assert!(resolve(DateTime::<Utc>::MIN_UTC, -12).is_err());
        assert!(resolve(DateTime::<Utc>::MAX_UTC, 0).is_ok());
    }

    #[test]
    fn fixed_source_can_jump() {
        let source = FixedTimeSource::new(utc(2024, 1, 1, 0, 0, 0));
        source.set(utc(2030, 6, 15, 12, 0, 0));
        source.advance(TimeDelta::seconds(1));
        assert_eq!(source.now().unwrap(), utc(2030, 6, 15, 12, 0, 1));
    }

    #[test]
    fn system_source_is_after_epoch() {
        let now = SystemTimeSource.now().unwrap();
        assert!(now.timestamp() > 0);
    }
}
