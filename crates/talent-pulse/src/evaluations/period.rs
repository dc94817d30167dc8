//! Calendar windows used to filter and bucket evaluation records.
//!
//! Every "relative to now" computation takes `today` explicitly so callers
//! decide the reference date once per render.

use super::domain::EvaluationRecord;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// 1-indexed calendar quarter (Q1 = Jan–Mar).
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_day(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn last_day(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        first_day(year + 1, 1)?
    } else {
        first_day(year, month + 1)?
    };
    next.pred_opt()
}

fn month_span(year: i32, first_month: u32, last_month: u32) -> Option<DateRange> {
    Some(DateRange {
        start: first_day(year, first_month)?,
        end: last_day(year, last_month)?,
    })
}

/// Full range of quarter `quarter` (1–4) of `year`.
pub fn quarter_range(year: i32, quarter: u32) -> Option<DateRange> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let first_month = (quarter - 1) * 3 + 1;
    month_span(year, first_month, first_month + 2)
}

/// Steps `back` quarters before `(year, quarter)`, wrapping across years.
fn quarters_before(year: i32, quarter: u32, back: u32) -> (i32, u32) {
    let index = i64::from(year) * 4 + i64::from(quarter) - 1 - i64::from(back);
    (index.div_euclid(4) as i32, index.rem_euclid(4) as u32 + 1)
}

/// The previous calendar quarter of `today`, as `(year, quarter)`.
pub fn previous_quarter(today: NaiveDate) -> (i32, u32) {
    quarters_before(today.year(), quarter_of(today), 1)
}

/// Named period tokens shared with the filter UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodToken {
    AllTime,
    CurrentYear,
    CurrentQuarter,
    PreviousQuarter,
    LastNQuarters(u32),
    FirstHalf,
    SecondHalf,
    LastNMonths(u32),
}

impl PeriodToken {
    /// Concrete range for the token, or `None` when the token does not filter.
    pub fn resolve(self, today: NaiveDate) -> Option<DateRange> {
        let year = today.year();
        match self {
            Self::AllTime => None,
            Self::CurrentYear => month_span(year, 1, 12),
            Self::CurrentQuarter => quarter_range(year, quarter_of(today)),
            Self::PreviousQuarter => {
                let (year, quarter) = previous_quarter(today);
                quarter_range(year, quarter)
            }
            Self::LastNQuarters(count) => {
                let current = quarter_of(today);
                let (start_year, start_quarter) =
                    quarters_before(year, current, count.max(1) - 1);
                Some(DateRange {
                    start: quarter_range(start_year, start_quarter)?.start,
                    end: quarter_range(year, current)?.end,
                })
            }
            Self::FirstHalf => month_span(year, 1, 6),
            Self::SecondHalf => month_span(year, 7, 12),
            Self::LastNMonths(count) => Some(DateRange {
                start: today.checked_sub_months(Months::new(count))?,
                end: today,
            }),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::AllTime => "All time".to_string(),
            Self::CurrentYear => "Current year".to_string(),
            Self::CurrentQuarter => "Current quarter".to_string(),
            Self::PreviousQuarter => "Previous quarter".to_string(),
            Self::LastNQuarters(count) => format!("Last {count} quarters"),
            Self::FirstHalf => "First half".to_string(),
            Self::SecondHalf => "Second half".to_string(),
            Self::LastNMonths(count) => format!("Last {count} months"),
        }
    }
}

impl Default for PeriodToken {
    fn default() -> Self {
        Self::AllTime
    }
}

impl fmt::Display for PeriodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllTime => f.write_str("all"),
            Self::CurrentYear => f.write_str("current_year"),
            Self::CurrentQuarter => f.write_str("current_quarter"),
            Self::PreviousQuarter => f.write_str("previous_quarter"),
            Self::LastNQuarters(count) => write!(f, "last_{count}_quarters"),
            Self::FirstHalf => f.write_str("first_half"),
            Self::SecondHalf => f.write_str("second_half"),
            Self::LastNMonths(count) => write!(f, "last_{count}_months"),
        }
    }
}

impl FromStr for PeriodToken {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = value.trim().to_ascii_lowercase();
        match token.as_str() {
            "all" => return Ok(Self::AllTime),
            "current_year" => return Ok(Self::CurrentYear),
            "current_quarter" => return Ok(Self::CurrentQuarter),
            "previous_quarter" => return Ok(Self::PreviousQuarter),
            "first_half" => return Ok(Self::FirstHalf),
            "second_half" => return Ok(Self::SecondHalf),
            _ => {}
        }

        let counted = token.strip_prefix("last_").and_then(|rest| {
            rest.strip_suffix("_quarters")
                .map(|count| (count, Self::LastNQuarters as fn(u32) -> Self))
                .or_else(|| {
                    rest.strip_suffix("_months")
                        .map(|count| (count, Self::LastNMonths as fn(u32) -> Self))
                })
        });

        match counted {
            Some((count, build)) => match count.parse::<u32>() {
                Ok(0) => Err(PeriodError::ZeroLength(value.to_string())),
                Ok(count) => Ok(build(count)),
                Err(_) => Err(PeriodError::UnknownToken(value.to_string())),
            },
            None => Err(PeriodError::UnknownToken(value.to_string())),
        }
    }
}

impl TryFrom<String> for PeriodToken {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodToken> for String {
    fn from(token: PeriodToken) -> Self {
        token.to_string()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("unknown period token '{0}'")]
    UnknownToken(String),
    #[error("period token '{0}' must cover at least one unit")]
    ZeroLength(String),
}

/// Records whose date falls inside the period, inclusive on both ends.
/// `AllTime` hands the input back untouched.
pub fn filter_by_period(
    records: &[EvaluationRecord],
    period: PeriodToken,
    today: NaiveDate,
) -> Cow<'_, [EvaluationRecord]> {
    match period.resolve(today) {
        None => Cow::Borrowed(records),
        Some(range) => Cow::Owned(
            records
                .iter()
                .filter(|record| range.contains(record.date))
                .cloned()
                .collect(),
        ),
    }
}

/// The two period-comparison schemes. They report different numbers for the
/// same data and each chart is bound to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonScheme {
    /// Previous calendar quarter against the full current calendar quarter.
    CalendarQuarter,
    /// Months -6..-3 against the last three months, counted from today.
    RollingThreeMonths,
}

impl ComparisonScheme {
    pub fn windows(self, today: NaiveDate) -> Option<ComparisonWindows> {
        match self {
            Self::CalendarQuarter => ComparisonWindows::calendar_quarters(today),
            Self::RollingThreeMonths => ComparisonWindows::rolling_three_months(today),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CalendarQuarter => "Previous vs current quarter",
            Self::RollingThreeMonths => "Previous vs last 3 months",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSide {
    Previous,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonWindows {
    pub previous: DateRange,
    pub current: DateRange,
}

impl ComparisonWindows {
    pub fn calendar_quarters(today: NaiveDate) -> Option<Self> {
        Some(Self {
            previous: PeriodToken::PreviousQuarter.resolve(today)?,
            current: PeriodToken::CurrentQuarter.resolve(today)?,
        })
    }

    pub fn rolling_three_months(today: NaiveDate) -> Option<Self> {
        let three_months_ago = today.checked_sub_months(Months::new(3))?;
        let six_months_ago = today.checked_sub_months(Months::new(6))?;
        Some(Self {
            previous: DateRange {
                start: six_months_ago,
                end: three_months_ago.pred_opt()?,
            },
            current: DateRange {
                start: three_months_ago,
                end: today,
            },
        })
    }

    pub fn classify(&self, date: NaiveDate) -> Option<WindowSide> {
        if self.current.contains(date) {
            Some(WindowSide::Current)
        } else if self.previous.contains(date) {
            Some(WindowSide::Previous)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    Quarter,
    Semester,
    Year,
}

/// A calendar bucket used on trend axes. Ordering is chronological within a
/// single granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PeriodBucket {
    pub year: i32,
    pub index: u32,
    pub granularity: TrendGranularity,
}

impl PeriodBucket {
    pub fn of(date: NaiveDate, granularity: TrendGranularity) -> Self {
        let index = match granularity {
            TrendGranularity::Quarter => quarter_of(date),
            TrendGranularity::Semester => date.month0() / 6 + 1,
            TrendGranularity::Year => 1,
        };
        Self {
            year: date.year(),
            index,
            granularity,
        }
    }

    pub fn range(&self) -> Option<DateRange> {
        match self.granularity {
            TrendGranularity::Quarter => quarter_range(self.year, self.index),
            TrendGranularity::Semester => {
                let first_month = (self.index - 1) * 6 + 1;
                month_span(self.year, first_month, first_month + 5)
            }
            TrendGranularity::Year => month_span(self.year, 1, 12),
        }
    }

    pub fn label(&self) -> String {
        match self.granularity {
            TrendGranularity::Quarter => format!("Q{} {}", self.index, self.year),
            TrendGranularity::Semester => format!("S{} {}", self.index, self.year),
            TrendGranularity::Year => self.year.to_string(),
        }
    }
}
