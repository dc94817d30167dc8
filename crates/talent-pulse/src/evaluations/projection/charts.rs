use super::super::aggregate::SkillGap;
use super::super::compare::{highlight, BucketPoint, PersonTrajectory, SkillDelta};
use super::super::domain::CompositeSkillPoint;
use super::views::{CometRow, ComparisonBar, GapBar, RadarRow, TrendRow};
use std::cmp::Ordering;

/// Default width for axis labels.
pub const DEFAULT_LABEL_WIDTH: usize = 20;

/// Shortens `text` to `max_chars` characters, marking the cut with "...".
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut label: String = text.chars().take(max_chars).collect();
    label.push_str("...");
    label
}

fn present(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

/// Descending order with `None` last; equal keys keep their input order.
fn descending_with_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn radar_rows(points: &[CompositeSkillPoint], label_width: usize) -> Vec<RadarRow> {
    points
        .iter()
        .map(|point| RadarRow {
            skill: point.skill_name.clone(),
            label: truncate_label(&point.skill_name, label_width),
            category: point.category,
            expected: present(point.expected),
            self_score: present(point.self_score),
            manager_score: present(point.manager_score),
            composite: present(point.composite),
        })
        .collect()
}

/// Trend lines; `expected` is drawn as a flat reference on every bucket.
pub fn trend_rows(buckets: &[BucketPoint], expected: f64) -> Vec<TrendRow> {
    buckets
        .iter()
        .map(|bucket| TrendRow {
            bucket_label: bucket.label.clone(),
            self_score: present(bucket.self_avg),
            manager_score: present(bucket.manager_avg),
            composite: present(bucket.composite),
            expected: present(expected),
        })
        .collect()
}

/// Before/after bars, largest absolute change first; new skills last.
pub fn comparison_bars(deltas: &[SkillDelta], label_width: usize) -> Vec<ComparisonBar> {
    let mut bars: Vec<ComparisonBar> = deltas
        .iter()
        .map(|entry| ComparisonBar {
            skill: entry.skill_name.clone(),
            label: truncate_label(&entry.skill_name, label_width),
            category: entry.category,
            before: entry.previous.and_then(present),
            after: present(entry.current),
            delta: entry.delta,
            trend: entry.trend,
            trend_label: entry.trend.label(),
            highlight: entry.delta.and_then(highlight),
        })
        .collect();

    bars.sort_by(|a, b| {
        descending_with_missing_last(a.delta.map(f64::abs), b.delta.map(f64::abs))
    });
    bars
}

/// Comets ordered by improvement, largest first; people missing a window last.
pub fn comet_rows(trajectories: &[PersonTrajectory], label_width: usize) -> Vec<CometRow> {
    let mut rows: Vec<CometRow> = trajectories
        .iter()
        .map(|trajectory| CometRow {
            subject_id: trajectory.subject_id.clone(),
            label: truncate_label(&trajectory.subject_name, label_width),
            area: trajectory.area.clone(),
            before: trajectory.previous.and_then(present),
            after: trajectory.current.and_then(present),
            delta: trajectory.delta,
            previous_band: trajectory.previous_band,
            current_band: trajectory.current_band,
            salto_nivel: trajectory.level_jump,
        })
        .collect();

    rows.sort_by(|a, b| descending_with_missing_last(a.delta, b.delta));
    rows
}

pub fn gap_bars(gaps: &[SkillGap], label_width: usize) -> Vec<GapBar> {
    gaps.iter()
        .map(|gap| GapBar {
            skill: gap.skill_name.clone(),
            label: truncate_label(&gap.skill_name, label_width),
            self_score: gap.self_avg,
            manager_score: gap.manager_avg,
            gap: gap.gap,
            perception: gap.perception,
            perception_label: gap.perception.label(),
        })
        .collect()
}
