//! Date-range presets and their resolution into concrete time windows.
//!
//! Presets are resolved against a reference instant in the viewer's time
//! zone. Weeks start on Sunday.
//!
//! | Preset | Window |
//! |--------|--------|
//! | `today` | midnight today, up to midnight tomorrow |
//! | `yesterday` | `[midnight yesterday, midnight today)` |
//! | `this-week` | Sunday midnight, up to the next Sunday |
//! | `this-month` | first of the month, up to the first of next month |
//! | `last-month` | `[first of last month, last day of last month 23:59:59.999]` |
//! | `custom` | `[start 00:00, end 23:59:59.999]` |
//!
//! With [`Boundary::OpenEnded`] the `today`, `this-week` and `this-month`
//! windows have no upper bound, so later (future-dated) records pass as well.
//!
//! Date-only values (`NaiveDate` fields, `"2024-03-05"` strings in JSON rows)
//! carry no zone and are read as midnight UTC. West of UTC that instant falls
//! on the previous local day. Records whose dates belong to the viewer's
//! calendar should convert with [`Timestamp::start_of_day`] instead.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::value::Timestamp;

/// Upper-bound treatment for the `today`, `this-week` and `this-month` presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    /// The window ends where the calendar period ends.
    #[default]
    Calendar,
    /// The window has no upper bound.
    OpenEnded,
}

/// A named date-range preset, or an explicit day range.
///
/// Deserializing goes through [`DateRange::custom`], so a saved inverted
/// range is rejected rather than restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "preset", try_from = "SavedDateRange")]
pub enum DateRange {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    LastMonth,
    /// Whole days from `start` through `end`, both inclusive.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    /// Creates a custom range, rejecting one that ends before it starts.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(QueryError::InvertedDateRange { start, end });
        }
        Ok(DateRange::Custom { start, end })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Yesterday => "yesterday",
            DateRange::ThisWeek => "this-week",
            DateRange::ThisMonth => "this-month",
            DateRange::LastMonth => "last-month",
            DateRange::Custom { .. } => "custom",
        }
    }

    /// Resolves the preset against `now`, in `now`'s time zone.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>, boundary: Boundary) -> TimeWindow {
        let tz = now.timezone();
        let today = now.date_naive();
        let midnight = |date: NaiveDate| local_midnight(&tz, date);
        let open_or = |end: NaiveDate| match boundary {
            Boundary::Calendar => WindowEnd::Exclusive(midnight(end)),
            Boundary::OpenEnded => WindowEnd::Unbounded,
        };

        let window = match *self {
            DateRange::Today => TimeWindow {
                start: midnight(today),
                end: open_or(next_day(today)),
            },
            DateRange::Yesterday => TimeWindow {
                start: midnight(today.pred_opt().unwrap_or(today)),
                end: WindowEnd::Exclusive(midnight(today)),
            },
            DateRange::ThisWeek => {
                let offset = i64::from(today.weekday().num_days_from_sunday());
                let sunday = today
                    .checked_sub_signed(Duration::days(offset))
                    .unwrap_or(today);
                let next_sunday = sunday
                    .checked_add_signed(Duration::days(7))
                    .unwrap_or(sunday);
                TimeWindow {
                    start: midnight(sunday),
                    end: open_or(next_sunday),
                }
            }
            DateRange::ThisMonth => {
                let first = first_of_month(today);
                TimeWindow {
                    start: midnight(first),
                    end: open_or(first_of_next_month(first)),
                }
            }
            DateRange::LastMonth => {
                let first_this = first_of_month(today);
                let last_day = first_this.pred_opt().unwrap_or(first_this);
                TimeWindow {
                    start: midnight(first_of_month(last_day)),
                    end: WindowEnd::Inclusive(local_end_of_day(&tz, last_day)),
                }
            }
            DateRange::Custom { start, end } => TimeWindow {
                start: midnight(start),
                end: WindowEnd::Inclusive(local_end_of_day(&tz, end)),
            },
        };

        tracing::trace!(range = self.name(), ?boundary, ?window, "resolved date range");
        window
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", tag = "preset")]
enum SavedDateRange {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    LastMonth,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl TryFrom<SavedDateRange> for DateRange {
    type Error = QueryError;

    fn try_from(saved: SavedDateRange) -> Result<Self> {
        Ok(match saved {
            SavedDateRange::Today => DateRange::Today,
            SavedDateRange::Yesterday => DateRange::Yesterday,
            SavedDateRange::ThisWeek => DateRange::ThisWeek,
            SavedDateRange::ThisMonth => DateRange::ThisMonth,
            SavedDateRange::LastMonth => DateRange::LastMonth,
            SavedDateRange::Custom { start, end } => DateRange::custom(start, end)?,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::Custom { start, end } => write!(f, "{start}..{end}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses a preset name, or `YYYY-MM-DD..YYYY-MM-DD` for a custom range.
impl FromStr for DateRange {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "today" => return Ok(DateRange::Today),
            "yesterday" => return Ok(DateRange::Yesterday),
            "this-week" => return Ok(DateRange::ThisWeek),
            "this-month" => return Ok(DateRange::ThisMonth),
            "last-month" => return Ok(DateRange::LastMonth),
            _ => {}
        }

        let (start, end) = trimmed
            .split_once("..")
            .ok_or_else(|| QueryError::UnknownDateRange(s.to_string()))?;
        let parse = |d: &str| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|_| QueryError::UnknownDateRange(s.to_string()))
        };
        DateRange::custom(parse(start)?, parse(end)?)
    }
}

/// Upper end of a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    Unbounded,
    Exclusive(Timestamp),
    Inclusive(Timestamp),
}

/// A concrete interval of instants. The start is always inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: WindowEnd,
}

impl TimeWindow {
    pub fn contains(&self, ts: Timestamp) -> bool {
        if ts < self.start {
            return false;
        }
        match self.end {
            WindowEnd::Unbounded => true,
            WindowEnd::Exclusive(end) => ts < end,
            WindowEnd::Inclusive(end) => ts <= end,
        }
    }
}

impl Timestamp {
    /// First instant of `date` in `tz`, for date-only fields that should
    /// land on the viewer's own calendar day.
    pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        local_midnight(tz, date)
    }
}

/// First instant of `date` in `tz`.
///
/// A midnight skipped by a DST transition resolves to the first valid local
/// time after it.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Timestamp {
    first_valid_local(tz, date.and_time(NaiveTime::MIN))
}

/// `23:59:59.999` local time on `date`.
fn local_end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Timestamp {
    let naive = date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1);
    match tz.from_local_datetime(&naive).latest() {
        Some(dt) => Timestamp::from_datetime(&dt),
        None => Timestamp(local_midnight(tz, next_day(date)).0 - 1),
    }
}

fn first_valid_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Timestamp {
    for minutes in (0..=180).step_by(30) {
        let candidate = naive + Duration::minutes(minutes);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return Timestamp::from_datetime(&dt);
        }
    }
    Timestamp(naive.and_utc().timestamp_millis())
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}
