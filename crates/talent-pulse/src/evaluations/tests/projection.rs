use super::common::*;
use crate::evaluations::aggregate::{expected_average, gap_analysis, transform_to_skill_points};
use crate::evaluations::compare::{
    compare_between_periods, person_trajectories, skill_deltas, trend_by_bucket, DeltaTrend,
    SkillHighlight,
};
use crate::evaluations::domain::{ExpectedSkillEntry, ExpectedSkillTable, SeniorityBand};
use crate::evaluations::period::TrendGranularity;
use crate::evaluations::projection::{
    comet_rows, comparison_bars, gap_bars, radar_rows, trend_rows, truncate_label,
    DEFAULT_LABEL_WIDTH,
};

fn expectations() -> ExpectedSkillTable {
    ExpectedSkillTable::from_entries(vec![ExpectedSkillEntry {
        seniority: SeniorityBand::SemiSenior,
        role: "Analyst".to_string(),
        area: "Data".to_string(),
        skill_name: "SQL".to_string(),
        expected_value: 3.0,
    }])
}

#[test]
fn truncate_label_counts_characters_not_bytes() {
    assert_eq!(truncate_label("SQL", 20), "SQL");
    assert_eq!(truncate_label("Comunicación efectiva", 11), "Comunicació...");
    assert_eq!(
        truncate_label("Stakeholder management", DEFAULT_LABEL_WIDTH),
        "Stakeholder manageme..."
    );
}

#[test]
fn radar_rows_hide_no_data_sentinels() {
    let records = vec![
        manager_rating("ana", "SQL", 3, date(2024, 2, 1)),
        self_rating("ana", "SQL", 4, date(2024, 2, 1)),
        self_rating("ana", "Teamwork", 2, date(2024, 2, 1)),
    ];
    let points = transform_to_skill_points(
        &records,
        &expectations(),
        SeniorityBand::SemiSenior,
        "Analyst",
        "Data",
    );

    let rows = radar_rows(&points, DEFAULT_LABEL_WIDTH);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].expected, Some(3.0));
    assert_eq!(rows[0].composite, Some(3.0));
    assert_eq!(rows[1].expected, None);
    assert_eq!(rows[1].manager_score, None);
    assert_eq!(rows[1].self_score, Some(2.0));

    let json = serde_json::to_value(&rows[1]).expect("serializes");
    assert_eq!(json["auto"], 2.0);
    assert!(json["jefe"].is_null());
    assert_eq!(json["promedio"], 2.0);
}

#[test]
fn trend_rows_carry_expected_reference() {
    let records = vec![
        manager_rating("ana", "SQL", 3, date(2023, 11, 1)),
        manager_rating("ana", "SQL", 4, date(2024, 2, 1)),
    ];
    let points = transform_to_skill_points(
        &records,
        &expectations(),
        SeniorityBand::SemiSenior,
        "Analyst",
        "Data",
    );
    let buckets = trend_by_bucket(&records, TrendGranularity::Quarter);

    let rows = trend_rows(&buckets, expected_average(&points));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].bucket_label, "Q4 2023");
    assert_eq!(rows[0].self_score, None);
    assert_eq!(rows[1].composite, Some(4.0));
    assert!(rows.iter().all(|row| row.expected == Some(3.0)));

    let without_expectation = trend_rows(&buckets, 0.0);
    assert!(without_expectation.iter().all(|row| row.expected.is_none()));
}

#[test]
fn comparison_bars_sort_by_magnitude_with_new_skills_last() {
    let records = vec![
        manager_rating("ana", "Ownership", 3, date(2024, 4, 10)),
        manager_rating("ana", "SQL", 3, date(2024, 1, 10)),
        manager_rating("ana", "SQL", 3, date(2024, 4, 10)),
        manager_rating("ana", "Teamwork", 4, date(2024, 1, 10)),
        manager_rating("ana", "Teamwork", 1, date(2024, 4, 10)),
        manager_rating("ana", "Python", 2, date(2024, 1, 10)),
        manager_rating("ana", "Python", 3, date(2024, 4, 10)),
    ];
    let deltas = skill_deltas(&compare_between_periods(&records, date(2024, 4, 15)));

    let bars = comparison_bars(&deltas, DEFAULT_LABEL_WIDTH);

    let order: Vec<&str> = bars.iter().map(|bar| bar.skill.as_str()).collect();
    assert_eq!(order, vec!["Teamwork", "Python", "SQL", "Ownership"]);
    assert_eq!(bars[0].trend, DeltaTrend::Declined);
    assert_eq!(bars[0].highlight, Some(SkillHighlight::NeedsAttention));
    assert_eq!(bars[1].highlight, Some(SkillHighlight::NotableImprovement));
    assert_eq!(bars[2].highlight, None);
    assert_eq!(bars[3].before, None);
    assert_eq!(bars[3].trend_label, "New");
}

#[test]
fn comet_rows_put_biggest_improvers_first() {
    let today = date(2024, 8, 15);
    let records = vec![
        manager_rating("ana", "SQL", 2, date(2024, 3, 10)),
        manager_rating("ana", "SQL", 4, date(2024, 7, 1)),
        manager_rating("leo", "SQL", 3, date(2024, 3, 10)),
        manager_rating("leo", "SQL", 2, date(2024, 7, 1)),
        manager_rating("mia", "SQL", 3, date(2024, 7, 1)),
        manager_rating("bo", "SQL", 2, date(2024, 3, 10)),
        manager_rating("bo", "SQL", 3, date(2024, 7, 1)),
    ];

    let rows = comet_rows(&person_trajectories(&records, today), DEFAULT_LABEL_WIDTH);

    let order: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
    assert_eq!(order, vec!["ana", "bo", "leo", "mia"]);
    assert!(rows[0].salto_nivel);
    assert!(rows[1].salto_nivel);
    assert!(rows[2].salto_nivel);
    assert!(!rows[3].salto_nivel);
}

#[test]
fn gap_bars_keep_analysis_order() {
    let records = vec![
        self_rating("ana", "SQL", 4, date(2024, 2, 1)),
        manager_rating("ana", "SQL", 1, date(2024, 2, 1)),
        self_rating("ana", "Teamwork", 3, date(2024, 2, 1)),
        manager_rating("ana", "Teamwork", 3, date(2024, 2, 1)),
    ];

    let bars = gap_bars(&gap_analysis(&records), DEFAULT_LABEL_WIDTH);

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].skill, "SQL");
    assert_eq!(bars[0].gap, 3.0);
    assert_eq!(bars[1].perception_label, "Aligned");
}
