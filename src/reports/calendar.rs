use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use core::str::FromStr;
use ohno::{AppError, app_err};
use serde::Deserialize;

/// Time zone that report timestamps and calendar columns are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum ReportZone {
    /// The zone of the machine running the tool.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl FromStr for ReportZone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }

        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Self::Utc);
        }

        s.parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| app_err!("invalid time zone '{s}': expected 'local', 'utc' or an offset such as '+02:00'"))
    }
}

impl TryFrom<String> for ReportZone {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How the first week of a year is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WeekRule {
    /// Week 1 starts on January 1st and ends before the first `first_day_of_week`.
    #[default]
    FirstDay,

    /// Week 1 is the first week that lies entirely within the year.
    FirstFullWeek,

    /// Week 1 is the first week with at least four days in the year.
    FirstFourDayWeek,

    /// ISO 8601 numbering; `first_day_of_week` is ignored.
    Iso,
}

/// Pinned time zone and week numbering, so the same input always yields the same report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSettings {
    pub zone: ReportZone,
    pub week_rule: WeekRule,
    pub first_day_of_week: Weekday,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            zone: ReportZone::Local,
            week_rule: WeekRule::FirstDay,
            first_day_of_week: Weekday::Sun,
        }
    }
}

/// Calendar columns derived from one timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFields {
    pub timestamp: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_week: String,
    pub week_of_year: u32,
    pub hour: u32,
}

impl CalendarSettings {
    fn to_report_zone(&self, time: DateTime<Utc>) -> NaiveDateTime {
        match self.zone {
            ReportZone::Local => time.with_timezone(&Local).naive_local(),
            ReportZone::Utc => time.naive_utc(),
            ReportZone::Fixed(offset) => time.with_timezone(&offset).naive_local(),
        }
    }

    /// Render a timestamp as `YYYY-MM-DD HH:MM:SS` in the report zone.
    #[must_use]
    pub fn format_timestamp(&self, time: DateTime<Utc>) -> String {
        self.to_report_zone(time).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Like [`Self::format_timestamp`], rendering a missing timestamp as an empty string.
    #[must_use]
    pub fn format_optional(&self, time: Option<DateTime<Utc>>) -> String {
        time.map(|t| self.format_timestamp(t)).unwrap_or_default()
    }

    #[must_use]
    pub fn fields(&self, time: DateTime<Utc>) -> CalendarFields {
        let local = self.to_report_zone(time);
        CalendarFields {
            timestamp: local.format("%Y-%m-%d %H:%M:%S").to_string(),
            year: local.year(),
            month: local.month(),
            day: local.day(),
            day_of_week: local.format("%A").to_string(),
            week_of_year: self.week_of_year(local.date()),
            hour: local.hour(),
        }
    }

    #[must_use]
    pub fn week_of_year(&self, date: NaiveDate) -> u32 {
        match self.week_rule {
            WeekRule::FirstDay => first_day_week(date, self.first_day_of_week),
            WeekRule::FirstFullWeek => full_days_week(date, self.first_day_of_week, 7),
            WeekRule::FirstFourDayWeek => full_days_week(date, self.first_day_of_week, 4),
            WeekRule::Iso => date.iso_week().week(),
        }
    }
}

/// Weekday of January 1st of `date`'s year, counted from Sunday.
fn jan1_weekday(date: NaiveDate) -> i64 {
    let day_of_year = i64::from(date.ordinal0());
    (i64::from(date.weekday().num_days_from_sunday()) - day_of_year % 7).rem_euclid(7)
}

fn first_day_week(date: NaiveDate, first_day: Weekday) -> u32 {
    let day_of_year = i64::from(date.ordinal0());
    let offset = (jan1_weekday(date) - i64::from(first_day.num_days_from_sunday())).rem_euclid(7);
    week_number((day_of_year + offset) / 7 + 1)
}

fn full_days_week(date: NaiveDate, first_day: Weekday, full_days: i64) -> u32 {
    let day_of_year = i64::from(date.ordinal0());
    let mut offset = (i64::from(first_day.num_days_from_sunday()) - jan1_weekday(date)).rem_euclid(7);
    if offset != 0 && offset >= full_days {
        offset -= 7;
    }

    let day = day_of_year - offset;
    if day >= 0 {
        return week_number(day / 7 + 1);
    }

    // the date belongs to the last week of the previous year
    NaiveDate::from_ymd_opt(date.year() - 1, 12, 31).map_or(1, |dec31| full_days_week(dec31, first_day, full_days))
}

fn week_number(week: i64) -> u32 {
    u32::try_from(week).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn settings(week_rule: WeekRule, first_day_of_week: Weekday) -> CalendarSettings {
        CalendarSettings {
            zone: ReportZone::Utc,
            week_rule,
            first_day_of_week,
        }
    }

    #[test]
    fn test_first_day_rule() {
        let s = settings(WeekRule::FirstDay, Weekday::Sun);

        // 2024-01-01 is a Monday
        assert_eq!(s.week_of_year(date(2024, 1, 1)), 1);
        assert_eq!(s.week_of_year(date(2024, 1, 6)), 1);
        assert_eq!(s.week_of_year(date(2024, 1, 7)), 2);
        assert_eq!(s.week_of_year(date(2024, 12, 31)), 53);
    }

    #[test]
    fn test_first_full_week_rule() {
        let s = settings(WeekRule::FirstFullWeek, Weekday::Sun);

        // the first full Sunday-based week of 2024 starts on January 7th
        assert_eq!(s.week_of_year(date(2024, 1, 1)), 53);
        assert_eq!(s.week_of_year(date(2024, 1, 7)), 1);
    }

    #[test]
    fn test_first_four_day_week_matches_iso_with_monday() {
        let four = settings(WeekRule::FirstFourDayWeek, Weekday::Mon);
        let iso = settings(WeekRule::Iso, Weekday::Sun);

        for d in [date(2020, 12, 31), date(2021, 1, 1), date(2021, 1, 4), date(2024, 6, 15)] {
            assert_eq!(four.week_of_year(d), iso.week_of_year(d), "{d}");
        }
        assert_eq!(iso.week_of_year(date(2021, 1, 1)), 53);
    }

    #[test]
    fn test_fields_in_utc() {
        let s = settings(WeekRule::FirstDay, Weekday::Sun);
        let t = "2024-03-01T10:05:09Z".parse::<DateTime<Utc>>().unwrap();

        let f = s.fields(t);
        assert_eq!(f.timestamp, "2024-03-01 10:05:09");
        assert_eq!((f.year, f.month, f.day, f.hour), (2024, 3, 1, 10));
        assert_eq!(f.day_of_week, "Friday");
        assert_eq!(f.week_of_year, 9);
    }

    #[test]
    fn test_fixed_offset_shifts_the_day() {
        let s = CalendarSettings {
            zone: "+02:00".parse().unwrap(),
            ..settings(WeekRule::Iso, Weekday::Mon)
        };
        let t = "2024-03-01T23:30:00Z".parse::<DateTime<Utc>>().unwrap();

        let f = s.fields(t);
        assert_eq!(f.timestamp, "2024-03-02 01:30:00");
        assert_eq!(f.day_of_week, "Saturday");
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("local".parse::<ReportZone>().unwrap(), ReportZone::Local);
        assert_eq!("UTC".parse::<ReportZone>().unwrap(), ReportZone::Utc);
        assert!(matches!("-05:00".parse::<ReportZone>().unwrap(), ReportZone::Fixed(_)));
        let _ = "Mars/Olympus".parse::<ReportZone>().unwrap_err();
    }

    #[test]
    fn test_missing_timestamp_is_empty() {
        assert_eq!(CalendarSettings::default().format_optional(None), "");
    }
}
