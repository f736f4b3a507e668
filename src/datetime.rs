//! Civil date-time values used at the engine's interface.
//!
//! The resolver speaks proleptic Gregorian wall-clock values with seconds
//! precision. Internally every computation happens on epoch seconds; the
//! types here exist to convert between the two without pulling a calendar
//! library into a crate that only needs day arithmetic.

use crate::error::{ZoneinfoError, ZoneinfoResult};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// A proleptic Gregorian calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// A wall-clock time of day with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// A civil date-time with no attached UTC offset.
///
/// A `Datetime` is "naive": near a daylight-saving transition the same
/// wall-clock value may describe zero or two UTC instants. Resolution of
/// that ambiguity is the job of
/// [`TimeZoneResolver`](crate::TimeZoneResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Datetime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl Datetime {
    /// Create a validated civil date-time.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> ZoneinfoResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ZoneinfoError::InvalidDatetime);
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(ZoneinfoError::InvalidDatetime);
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ZoneinfoError::InvalidDatetime);
        }
        Ok(Self {
            date: IsoDate { year, month, day },
            time: IsoTime {
                hour,
                minute,
                second,
            },
        })
    }

    /// Convert an epoch-seconds instant into its UTC civil value.
    ///
    /// Total over all of `i64`; instants whose civil year does not fit
    /// an `i32` saturate the year to its bounds.
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        let days = seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = date_from_epoch_days(days);
        Self {
            date: IsoDate { year, month, day },
            time: IsoTime {
                hour: (second_of_day / SECONDS_PER_HOUR) as u8,
                minute: (second_of_day % SECONDS_PER_HOUR / 60) as u8,
                second: (second_of_day % 60) as u8,
            },
        }
    }

    /// The seconds elapsed since 1970-01-01T00:00:00 at this wall-clock
    /// value, as if it were UTC.
    pub fn as_epoch_seconds(&self) -> i64 {
        let days = epoch_days_from_date(self.date.year, self.date.month, self.date.day);
        days * SECONDS_PER_DAY
            + i64::from(self.time.hour) * SECONDS_PER_HOUR
            + i64::from(self.time.minute) * 60
            + i64::from(self.time.second)
    }
}

/// A civil date-time paired with the UTC offset that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetDatetime {
    datetime: Datetime,
    offset_seconds: i32,
}

impl OffsetDatetime {
    pub(crate) fn new(datetime: Datetime, offset_seconds: i32) -> Self {
        Self {
            datetime,
            offset_seconds,
        }
    }

    pub fn datetime(&self) -> Datetime {
        self.datetime
    }

    pub fn offset_seconds(&self) -> i32 {
        self.offset_seconds
    }

    /// The offset truncated to whole minutes.
    pub fn offset_minutes(&self) -> i32 {
        self.offset_seconds / 60
    }

    /// The UTC instant this local value describes.
    pub fn as_utc_seconds(&self) -> i64 {
        self.datetime
            .as_epoch_seconds()
            .saturating_sub(i64::from(self.offset_seconds))
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

// The two conversions below are the standard Euclidean day-count
// equations over 400-year eras (146097 days per era, with day 719468
// being 1970-01-01 relative to 0000-03-01).
fn epoch_days_from_date(year: i32, month: u8, day: u8) -> i64 {
    let year = i64::from(year) - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month = i64::from(month);
    let day_of_year = (153 * (month + if month > 2 { -3 } else { 9 }) + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn date_from_epoch_days(days: i64) -> (i32, u8, u8) {
    let shifted = days + 719_468;
    let era = shifted.div_euclid(146_097);
    let day_of_era = shifted - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * month_index + 2) / 5 + 1) as u8;
    let month = if month_index < 10 {
        month_index + 3
    } else {
        month_index - 9
    };
    let month = month as u8;
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    // Instants near the i64 extremes fall billions of years outside the
    // i32 year range; saturate rather than truncate.
    let year = year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Datetime {
        Datetime::new(year, month, day, hour, minute, second).unwrap()
    }

    #[test]
    fn epoch_origin() {
        let origin = datetime(1970, 1, 1, 0, 0, 0);
        assert_eq!(origin.as_epoch_seconds(), 0);
        assert_eq!(Datetime::from_epoch_seconds(0), origin);
    }

    #[test]
    fn known_instants() {
        // 2017-03-12T07:00:00Z, the 2017 US spring-forward instant.
        let spring = datetime(2017, 3, 12, 7, 0, 0);
        assert_eq!(spring.as_epoch_seconds(), 1_489_302_000);
        assert_eq!(Datetime::from_epoch_seconds(1_489_302_000), spring);

        // Pre-epoch value with a leap year in between.
        let pre_epoch = datetime(1968, 2, 29, 23, 59, 59);
        assert_eq!(pre_epoch.as_epoch_seconds(), -57_974_401);
        assert_eq!(Datetime::from_epoch_seconds(-57_974_401), pre_epoch);
    }

    #[test]
    fn round_trip_across_leap_boundaries() {
        let samples = [
            datetime(1600, 2, 29, 12, 0, 0),
            datetime(1899, 12, 31, 23, 59, 59),
            datetime(2000, 2, 29, 0, 0, 0),
            datetime(2100, 3, 1, 1, 2, 3),
            datetime(9999, 12, 31, 23, 59, 59),
            datetime(1, 1, 1, 0, 0, 0),
        ];
        for sample in samples {
            assert_eq!(
                Datetime::from_epoch_seconds(sample.as_epoch_seconds()),
                sample,
                "{sample:?}"
            );
        }
    }

    #[test]
    fn extreme_epoch_seconds_saturate_the_year() {
        let latest = Datetime::from_epoch_seconds(i64::MAX);
        assert_eq!(latest.date.year, i32::MAX);

        let earliest = Datetime::from_epoch_seconds(i64::MIN);
        assert_eq!(earliest.date.year, i32::MIN);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(Datetime::new(2024, 0, 1, 0, 0, 0).is_err());
        assert!(Datetime::new(2024, 13, 1, 0, 0, 0).is_err());
        assert!(Datetime::new(2023, 2, 29, 0, 0, 0).is_err());
        assert!(Datetime::new(2024, 2, 29, 0, 0, 0).is_ok());
        assert!(Datetime::new(2024, 4, 31, 0, 0, 0).is_err());
        assert!(Datetime::new(2024, 1, 1, 24, 0, 0).is_err());
        assert!(Datetime::new(2024, 1, 1, 0, 60, 0).is_err());
        assert!(Datetime::new(2024, 1, 1, 0, 0, 60).is_err());
    }

    #[test]
    fn offset_datetime_accessors() {
        let local = datetime(2017, 11, 5, 1, 30, 0);
        let with_offset = OffsetDatetime::new(local, -18_000);
        assert_eq!(with_offset.offset_seconds(), -18_000);
        assert_eq!(with_offset.offset_minutes(), -300);
        assert_eq!(
            with_offset.as_utc_seconds(),
            local.as_epoch_seconds() + 18_000
        );
    }
}
