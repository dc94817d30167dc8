//! Period-over-period comparison of skill composites.
//!
//! Two window schemes exist side by side (see [`ComparisonScheme`]): calendar
//! quarters for the per-person trend views and rolling three-month windows for
//! the organization trajectory charts. Callers pick one explicitly.

use super::aggregate::{tally_by_skill, ScoreTally};
use super::domain::{EvaluationRecord, PersonId, SeniorityBand, SkillCategory};
use super::period::{
    ComparisonScheme, ComparisonWindows, PeriodBucket, TrendGranularity, WindowSide,
};
use super::seniority::classify;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Delta beyond which a skill counts as improved (or, negated, declined).
pub const TREND_DELTA_THRESHOLD: f64 = 0.2;

/// Delta above which the per-skill breakdown calls out a notable improvement.
pub const NOTABLE_IMPROVEMENT_THRESHOLD: f64 = 0.3;

/// Delta below which the per-skill breakdown flags a skill for attention.
pub const NEEDS_ATTENTION_THRESHOLD: f64 = -0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillPeriodPoint {
    pub skill_name: String,
    pub category: SkillCategory,
    pub self_avg: f64,
    pub manager_avg: f64,
    pub composite: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub previous: Vec<SkillPeriodPoint>,
    pub current: Vec<SkillPeriodPoint>,
}

impl PeriodComparison {
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty() && self.current.is_empty()
    }
}

fn period_points<'a, I>(records: I) -> Vec<SkillPeriodPoint>
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    tally_by_skill(records)
        .into_iter()
        .map(|(skill_name, tally)| SkillPeriodPoint {
            skill_name,
            category: tally.category,
            self_avg: tally.scores.self_avg(),
            manager_avg: tally.scores.manager_avg(),
            composite: tally.scores.composite(),
        })
        .collect()
}

/// Splits `records` into the two windows and builds per-skill points for
/// each. Records outside both windows are ignored.
pub fn compare_within(
    records: &[EvaluationRecord],
    windows: &ComparisonWindows,
) -> PeriodComparison {
    let mut previous = Vec::new();
    let mut current = Vec::new();
    for record in records {
        match windows.classify(record.date) {
            Some(WindowSide::Previous) => previous.push(record),
            Some(WindowSide::Current) => current.push(record),
            None => {}
        }
    }

    PeriodComparison {
        previous: period_points(previous),
        current: period_points(current),
    }
}

/// Previous calendar quarter against the current calendar quarter.
pub fn compare_between_periods(records: &[EvaluationRecord], today: NaiveDate) -> PeriodComparison {
    compare_with_scheme(records, ComparisonScheme::CalendarQuarter, today)
}

/// Months -6..-3 against the last three months.
pub fn compare_rolling(records: &[EvaluationRecord], today: NaiveDate) -> PeriodComparison {
    compare_with_scheme(records, ComparisonScheme::RollingThreeMonths, today)
}

pub fn compare_with_scheme(
    records: &[EvaluationRecord],
    scheme: ComparisonScheme,
    today: NaiveDate,
) -> PeriodComparison {
    scheme
        .windows(today)
        .map(|windows| compare_within(records, &windows))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTrend {
    Improved,
    Stable,
    Declined,
    New,
}

impl DeltaTrend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improved => "Improved",
            Self::Stable => "Stable",
            Self::Declined => "Declined",
            Self::New => "New",
        }
    }
}

/// Strict comparison: a delta of exactly 0.2 is still stable.
pub fn classify_delta(delta: f64) -> DeltaTrend {
    if delta > TREND_DELTA_THRESHOLD {
        DeltaTrend::Improved
    } else if delta < -TREND_DELTA_THRESHOLD {
        DeltaTrend::Declined
    } else {
        DeltaTrend::Stable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDelta {
    pub skill_name: String,
    pub category: SkillCategory,
    pub previous: Option<f64>,
    pub current: f64,
    pub delta: Option<f64>,
    pub trend: DeltaTrend,
}

/// One entry per skill in the current window. Skills that only appear in
/// the previous window are not reported.
pub fn skill_deltas(comparison: &PeriodComparison) -> Vec<SkillDelta> {
    let previous: HashMap<&str, f64> = comparison
        .previous
        .iter()
        .map(|point| (point.skill_name.as_str(), point.composite))
        .collect();

    comparison
        .current
        .iter()
        .map(|point| match previous.get(point.skill_name.as_str()) {
            Some(&before) => {
                let delta = point.composite - before;
                SkillDelta {
                    skill_name: point.skill_name.clone(),
                    category: point.category,
                    previous: Some(before),
                    current: point.composite,
                    delta: Some(delta),
                    trend: classify_delta(delta),
                }
            }
            None => SkillDelta {
                skill_name: point.skill_name.clone(),
                category: point.category,
                previous: None,
                current: point.composite,
                delta: None,
                trend: DeltaTrend::New,
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillHighlight {
    NotableImprovement,
    NeedsAttention,
}

pub fn highlight(delta: f64) -> Option<SkillHighlight> {
    if delta > NOTABLE_IMPROVEMENT_THRESHOLD {
        Some(SkillHighlight::NotableImprovement)
    } else if delta < NEEDS_ATTENTION_THRESHOLD {
        Some(SkillHighlight::NeedsAttention)
    } else {
        None
    }
}

/// Highlight boxes of the per-skill breakdown view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillBreakdown {
    pub notable_improvements: Vec<SkillDelta>,
    pub needs_attention: Vec<SkillDelta>,
}

pub fn skill_breakdown(deltas: &[SkillDelta]) -> SkillBreakdown {
    let mut breakdown = SkillBreakdown::default();

    for entry in deltas {
        let Some(delta) = entry.delta else {
            continue;
        };
        match highlight(delta) {
            Some(SkillHighlight::NotableImprovement) => {
                breakdown.notable_improvements.push(entry.clone())
            }
            Some(SkillHighlight::NeedsAttention) => breakdown.needs_attention.push(entry.clone()),
            None => {}
        }
    }

    let by_delta = |entry: &SkillDelta| entry.delta.unwrap_or(0.0);
    breakdown
        .notable_improvements
        .sort_by(|a, b| by_delta(b).total_cmp(&by_delta(a)));
    breakdown
        .needs_attention
        .sort_by(|a, b| by_delta(a).total_cmp(&by_delta(b)));
    breakdown
}

/// One person's movement between the two windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTrajectory {
    pub subject_id: PersonId,
    pub subject_name: String,
    pub area: String,
    pub previous: Option<f64>,
    pub current: Option<f64>,
    pub delta: Option<f64>,
    pub previous_band: Option<SeniorityBand>,
    pub current_band: Option<SeniorityBand>,
    #[serde(rename = "salto_nivel")]
    pub level_jump: bool,
}

#[derive(Default)]
struct PersonWindows<'a> {
    subject_name: &'a str,
    area: &'a str,
    previous: ScoreTally,
    current: ScoreTally,
}

fn window_composite(tally: &ScoreTally) -> Option<f64> {
    if tally.record_count() == 0 {
        None
    } else {
        Some(tally.composite())
    }
}

/// Per-person composites in each window, in order of first appearance.
/// People with no record in either window are omitted.
pub fn person_trajectories_within(
    records: &[EvaluationRecord],
    windows: &ComparisonWindows,
) -> Vec<PersonTrajectory> {
    let mut order: Vec<&PersonId> = Vec::new();
    let mut people: HashMap<&PersonId, PersonWindows<'_>> = HashMap::new();

    for record in records {
        let Some(side) = windows.classify(record.date) else {
            continue;
        };
        let person = people.entry(&record.subject_id).or_insert_with(|| {
            order.push(&record.subject_id);
            PersonWindows {
                subject_name: &record.subject_name,
                area: &record.area,
                ..PersonWindows::default()
            }
        });
        match side {
            WindowSide::Previous => person.previous.add(record),
            WindowSide::Current => person.current.add(record),
        }
    }

    order
        .into_iter()
        .filter_map(|id| people.get(id).map(|person| (id, person)))
        .map(|(id, person)| {
            let previous = window_composite(&person.previous);
            let current = window_composite(&person.current);
            let previous_band = previous.map(classify);
            let current_band = current.map(classify);
            let level_jump = matches!(
                (previous_band, current_band),
                (Some(before), Some(after)) if before != after
            );

            PersonTrajectory {
                subject_id: id.clone(),
                subject_name: person.subject_name.to_string(),
                area: person.area.to_string(),
                previous,
                current,
                delta: previous.zip(current).map(|(before, after)| after - before),
                previous_band,
                current_band,
                level_jump,
            }
        })
        .collect()
}

/// Organization trajectory chart data, bucketed with the rolling windows.
pub fn person_trajectories(records: &[EvaluationRecord], today: NaiveDate) -> Vec<PersonTrajectory> {
    ComparisonWindows::rolling_three_months(today)
        .map(|windows| person_trajectories_within(records, &windows))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPoint {
    pub bucket: PeriodBucket,
    pub label: String,
    pub self_avg: f64,
    pub manager_avg: f64,
    pub composite: f64,
    pub record_count: usize,
}

/// Self, manager and composite means per calendar bucket, oldest first.
pub fn trend_by_bucket(
    records: &[EvaluationRecord],
    granularity: TrendGranularity,
) -> Vec<BucketPoint> {
    let mut buckets: BTreeMap<PeriodBucket, ScoreTally> = BTreeMap::new();
    for record in records {
        buckets
            .entry(PeriodBucket::of(record.date, granularity))
            .or_default()
            .add(record);
    }

    buckets
        .into_iter()
        .map(|(bucket, tally)| BucketPoint {
            label: bucket.label(),
            bucket,
            self_avg: tally.self_avg(),
            manager_avg: tally.manager_avg(),
            composite: tally.composite(),
            record_count: tally.record_count(),
        })
        .collect()
}
