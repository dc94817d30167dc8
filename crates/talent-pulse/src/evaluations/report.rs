//! Assembled dashboard payloads. Each report is a fixed composition of the
//! aggregation, comparison and projection functions for one view.

use super::aggregate::{
    category_averages, expected_average, gap_analysis, transform_to_skill_points,
    CategoryAverages,
};
use super::compare::{
    compare_within, person_trajectories_within, skill_breakdown, skill_deltas, trend_by_bucket,
    SkillBreakdown,
};
use super::domain::{EvaluationRecord, ExpectedSkillTable, PersonId, SeniorityBand};
use super::period::{
    filter_by_period, ComparisonScheme, ComparisonWindows, PeriodToken, TrendGranularity,
};
use super::projection::{
    comet_rows, comparison_bars, gap_bars, radar_rows, trend_rows, CometRow, ComparisonBar,
    GapBar, RadarRow, TrendRow,
};
use super::scope::{select, Scope};
use super::seniority::SeniorityAssessment;
use chrono::NaiveDate;
use serde::Serialize;

/// The expectation row a person is measured against.
#[derive(Debug, Clone, Copy)]
pub struct ExpectationProfile<'a> {
    pub table: &'a ExpectedSkillTable,
    pub band: SeniorityBand,
    pub role: &'a str,
    pub area: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndividualReport {
    pub subject_id: PersonId,
    pub subject_name: Option<String>,
    pub today: NaiveDate,
    pub period: String,
    pub record_count: usize,
    pub assessment: SeniorityAssessment,
    pub categories: CategoryAverages,
    pub radar: Vec<RadarRow>,
    pub trend: Vec<TrendRow>,
    pub comparison_label: &'static str,
    pub comparison: Vec<ComparisonBar>,
    pub breakdown: SkillBreakdown,
    pub gaps: Vec<GapBar>,
}

/// Builds the individual dashboard for `subject`.
///
/// Radar, gaps, header figures and the trend use the records inside
/// `period`; the quarter comparison always looks at the subject's full
/// history since its windows are anchored on `today`.
pub fn individual_report(
    records: &[EvaluationRecord],
    subject: &PersonId,
    profile: &ExpectationProfile<'_>,
    period: PeriodToken,
    today: NaiveDate,
    label_width: usize,
) -> IndividualReport {
    let history = select(
        records,
        &Scope::Individual {
            subject_id: subject.clone(),
        },
    );
    let windowed = filter_by_period(&history, period, today);

    let points = transform_to_skill_points(
        &windowed,
        profile.table,
        profile.band,
        profile.role,
        profile.area,
    );
    let buckets = trend_by_bucket(&windowed, TrendGranularity::Quarter);

    let scheme = ComparisonScheme::CalendarQuarter;
    let deltas = scheme
        .windows(today)
        .map(|windows| skill_deltas(&compare_within(&history, &windows)))
        .unwrap_or_default();

    IndividualReport {
        subject_id: subject.clone(),
        subject_name: history.first().map(|record| record.subject_name.clone()),
        today,
        period: period.label(),
        record_count: windowed.len(),
        assessment: SeniorityAssessment::assess(&points, profile.band),
        categories: category_averages(&points),
        radar: radar_rows(&points, label_width),
        trend: trend_rows(&buckets, expected_average(&points)),
        comparison_label: scheme.label(),
        comparison: comparison_bars(&deltas, label_width),
        breakdown: skill_breakdown(&deltas),
        gaps: gap_bars(&gap_analysis(&windowed), label_width),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationReport {
    pub today: NaiveDate,
    pub scheme_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<ComparisonWindows>,
    pub people: usize,
    pub level_jumps: usize,
    pub comets: Vec<CometRow>,
}

/// Trajectory chart for everyone in `scope`, on the rolling windows.
pub fn organization_report(
    records: &[EvaluationRecord],
    scope: &Scope,
    today: NaiveDate,
    label_width: usize,
) -> OrganizationReport {
    let scheme = ComparisonScheme::RollingThreeMonths;
    let windows = scheme.windows(today);
    let scoped = select(records, scope);
    let trajectories = windows
        .map(|windows| person_trajectories_within(&scoped, &windows))
        .unwrap_or_default();

    OrganizationReport {
        today,
        scheme_label: scheme.label(),
        windows,
        people: trajectories.len(),
        level_jumps: trajectories
            .iter()
            .filter(|trajectory| trajectory.level_jump)
            .count(),
        comets: comet_rows(&trajectories, label_width),
    }
}
