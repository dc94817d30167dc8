use super::common::*;
use chrono::NaiveDate;
use crate::evaluations::compare::{
    classify_delta, compare_between_periods, compare_rolling, highlight,
    person_trajectories, person_trajectories_within, skill_breakdown, skill_deltas,
    trend_by_bucket, DeltaTrend, PeriodComparison, SkillHighlight,
};
use crate::evaluations::domain::{EvaluationRecord, SeniorityBand, SkillCategory};
use crate::evaluations::period::{ComparisonWindows, TrendGranularity};

fn quarter_dataset() -> Vec<EvaluationRecord> {
    vec![
        manager_rating("ana", "SQL", 2, date(2023, 12, 20)),
        self_rating("ana", "SQL", 4, date(2024, 2, 10)),
        manager_rating("ana", "SQL", 2, date(2024, 2, 10)),
        self_rating("ana", "SQL", 3, date(2024, 5, 2)),
        manager_rating("ana", "SQL", 4, date(2024, 5, 2)),
        manager_rating("ana", "Python", 3, date(2024, 4, 20)),
        manager_rating("ana", "Python", 1, date(2024, 7, 1)),
    ]
}

#[test]
fn empty_input_produces_empty_comparison() {
    let today = date(2024, 4, 15);
    assert_eq!(compare_between_periods(&[], today), PeriodComparison::default());
    assert!(compare_rolling(&[], today).is_empty());
    assert!(skill_deltas(&PeriodComparison::default()).is_empty());
    assert!(person_trajectories(&[], today).is_empty());
}

#[test]
fn calendar_comparison_buckets_by_whole_quarters() {
    let comparison = compare_between_periods(&quarter_dataset(), date(2024, 4, 15));

    assert_eq!(comparison.previous.len(), 1);
    let previous_sql = &comparison.previous[0];
    assert_eq!(previous_sql.skill_name, "SQL");
    assert_eq!(previous_sql.self_avg, 4.0);
    assert_eq!(previous_sql.manager_avg, 2.0);
    assert_eq!(previous_sql.composite, 2.0);

    let current: Vec<(&str, f64)> = comparison
        .current
        .iter()
        .map(|point| (point.skill_name.as_str(), point.composite))
        .collect();
    assert_eq!(current, vec![("SQL", 3.5), ("Python", 3.0)]);
}

#[test]
fn rolling_and_calendar_schemes_report_different_windows() {
    let records = quarter_dataset();
    let today = date(2024, 4, 15);

    let calendar = compare_between_periods(&records, today);
    let rolling = compare_rolling(&records, today);

    // 2023-12-20 is outside the calendar windows but inside the rolling previous one.
    assert_eq!(rolling.previous.len(), 1);
    assert_eq!(rolling.previous[0].manager_avg, 2.0);
    assert_eq!(rolling.previous[0].self_avg, 0.0);
    // 2024-02-10 is previous quarter on the calendar but current when rolling.
    let rolling_sql = rolling
        .current
        .iter()
        .find(|point| point.skill_name == "SQL")
        .expect("sql in rolling current");
    assert_eq!(rolling_sql.self_avg, 4.0);
    assert_ne!(calendar, rolling);
}

#[test]
fn deltas_classify_trend_and_new_skills() {
    let comparison = compare_between_periods(&quarter_dataset(), date(2024, 4, 15));
    let deltas = skill_deltas(&comparison);

    assert_eq!(deltas.len(), 2);
    assert_eq!(deltas[0].skill_name, "SQL");
    assert_eq!(deltas[0].previous, Some(2.0));
    assert_eq!(deltas[0].delta, Some(1.5));
    assert_eq!(deltas[0].trend, DeltaTrend::Improved);
    assert_eq!(deltas[1].skill_name, "Python");
    assert_eq!(deltas[1].trend, DeltaTrend::New);
    assert!(deltas[1].delta.is_none());
}

#[test]
fn skills_only_in_previous_window_are_not_reported() {
    let records = vec![manager_rating("ana", "Teamwork", 3, date(2024, 2, 1))];
    let comparison = compare_between_periods(&records, date(2024, 4, 15));
    assert_eq!(comparison.previous.len(), 1);
    assert_eq!(comparison.previous[0].category, SkillCategory::Behavioral);
    assert!(skill_deltas(&comparison).is_empty());
}

#[test]
fn delta_threshold_is_strict() {
    assert_eq!(classify_delta(0.2), DeltaTrend::Stable);
    assert_eq!(classify_delta(0.2001), DeltaTrend::Improved);
    assert_eq!(classify_delta(-0.2), DeltaTrend::Stable);
    assert_eq!(classify_delta(-0.2001), DeltaTrend::Declined);
    assert_eq!(classify_delta(0.0), DeltaTrend::Stable);
}

#[test]
fn highlight_thresholds_are_independent_of_trend_threshold() {
    assert_eq!(classify_delta(0.25), DeltaTrend::Improved);
    assert_eq!(highlight(0.25), None);
    assert_eq!(highlight(0.3), None);
    assert_eq!(highlight(0.31), Some(SkillHighlight::NotableImprovement));

    assert_eq!(classify_delta(-0.15), DeltaTrend::Stable);
    assert_eq!(highlight(-0.1), None);
    assert_eq!(highlight(-0.15), Some(SkillHighlight::NeedsAttention));
}

#[test]
fn breakdown_sorts_highlight_boxes() {
    let today = date(2024, 4, 15);
    let records = vec![
        manager_rating("ana", "SQL", 2, date(2024, 1, 10)),
        manager_rating("ana", "SQL", 4, date(2024, 4, 10)),
        manager_rating("ana", "Python", 2, date(2024, 1, 10)),
        manager_rating("ana", "Python", 3, date(2024, 4, 10)),
        manager_rating("ana", "Teamwork", 3, date(2024, 1, 10)),
        manager_rating("ana", "Teamwork", 1, date(2024, 4, 10)),
        manager_rating("ana", "Communication", 4, date(2024, 1, 10)),
        manager_rating("ana", "Communication", 3, date(2024, 4, 10)),
        manager_rating("ana", "Ownership", 3, date(2024, 4, 10)),
    ];

    let breakdown = skill_breakdown(&skill_deltas(&compare_between_periods(&records, today)));

    let improved: Vec<&str> = breakdown
        .notable_improvements
        .iter()
        .map(|entry| entry.skill_name.as_str())
        .collect();
    let attention: Vec<&str> = breakdown
        .needs_attention
        .iter()
        .map(|entry| entry.skill_name.as_str())
        .collect();
    assert_eq!(improved, vec!["SQL", "Python"]);
    assert_eq!(attention, vec!["Teamwork", "Communication"]);
}

fn trajectory_dataset(previous_on: NaiveDate, current_on: NaiveDate) -> Vec<EvaluationRecord> {
    let mut records = Vec::new();
    // 21 / 10 = 2.1
    for score in [2, 2, 2, 2, 2, 2, 2, 2, 2, 3] {
        records.push(manager_rating("ana", "SQL", score, previous_on));
    }
    // 17 / 5 = 3.4
    for score in [3, 3, 3, 4, 4] {
        records.push(manager_rating("ana", "SQL", score, current_on));
    }
    records.push(manager_rating("leo", "SQL", 3, previous_on));
    records.push(manager_rating("leo", "SQL", 3, current_on));
    records.push(self_rating("mia", "SQL", 2, current_on));
    records
}

#[test]
fn rolling_trajectories_flag_level_jumps() {
    let today = date(2024, 8, 15);
    let records = trajectory_dataset(date(2024, 3, 10), date(2024, 7, 1));

    let trajectories = person_trajectories(&records, today);

    assert_eq!(trajectories.len(), 3);
    let ana = &trajectories[0];
    assert_eq!(ana.subject_id, person("ana"));
    assert!((ana.previous.expect("previous") - 2.1).abs() < 1e-9);
    assert!((ana.current.expect("current") - 3.4).abs() < 1e-9);
    assert_eq!(ana.previous_band, Some(SeniorityBand::SemiSenior));
    assert_eq!(ana.current_band, Some(SeniorityBand::Senior));
    assert!(ana.level_jump);

    let leo = &trajectories[1];
    assert!(!leo.level_jump);
    assert_eq!(leo.delta, Some(0.0));

    let mia = &trajectories[2];
    assert_eq!(mia.previous, None);
    assert_eq!(mia.current, Some(2.0));
    assert!(!mia.level_jump);
}

#[test]
fn calendar_trajectories_flag_level_jumps_between_quarters() {
    let today = date(2024, 5, 20);
    let windows = ComparisonWindows::calendar_quarters(today).expect("windows");
    let records = trajectory_dataset(date(2024, 2, 14), date(2024, 4, 3));

    let trajectories = person_trajectories_within(&records, &windows);

    assert!(trajectories[0].level_jump);
    assert_eq!(trajectories[0].current_band, Some(SeniorityBand::Senior));
}

#[test]
fn trend_buckets_are_chronological() {
    let records = vec![
        self_rating("ana", "SQL", 4, date(2024, 2, 1)),
        manager_rating("ana", "SQL", 2, date(2024, 2, 1)),
        manager_rating("ana", "SQL", 3, date(2023, 11, 5)),
        self_rating("ana", "SQL", 2, date(2024, 8, 5)),
    ];

    let buckets = trend_by_bucket(&records, TrendGranularity::Quarter);

    let labels: Vec<&str> = buckets.iter().map(|bucket| bucket.label.as_str()).collect();
    assert_eq!(labels, vec!["Q4 2023", "Q1 2024", "Q3 2024"]);
    assert_eq!(buckets[0].composite, 3.0);
    assert_eq!(buckets[1].composite, 2.0);
    assert_eq!(buckets[1].record_count, 2);
    assert_eq!(buckets[2].manager_avg, 0.0);
    assert_eq!(buckets[2].composite, 2.0);

    let semesters = trend_by_bucket(&records, TrendGranularity::Semester);
    assert_eq!(semesters.len(), 3);
    assert_eq!(semesters[1].label, "S1 2024");
}
