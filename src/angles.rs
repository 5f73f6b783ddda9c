use crate::time::ResolvedTime;

/// Hand angles in degrees, each in `[0, 360)`, 0 = twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSet {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
    /// 24-hour hand: one revolution per day.
    pub aux: f64,
}

impl AngleSet {
    pub fn from_time(time: &ResolvedTime) -> Self {
        Self::from_parts(time.hour, time.minute, time.second_fractional)
    }

    /// Always computed from absolute time, never incrementally, so repeated
    /// ticks cannot accumulate drift.
    pub fn from_parts(hour: u32, minute: u32, second_fractional: f64) -> Self {
        let h = f64::from(hour);
        let m = f64::from(minute);
        let s = second_fractional;

        Self {
            hour: normalize(((h % 12.0) + m / 60.0 + s / 3600.0) * 30.0),
            minute: normalize((m + s / 60.0) * 6.0),
            second: normalize(s * 6.0),
            aux: normalize((h + m / 60.0) / 24.0 * 360.0),
        }
    }
}

fn normalize(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}
