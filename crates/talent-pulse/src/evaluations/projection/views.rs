use super::super::aggregate::Perception;
use super::super::compare::{DeltaTrend, SkillHighlight};
use super::super::domain::{PersonId, SeniorityBand, SkillCategory};
use serde::Serialize;

/// Radar chart row. `None` values are "no data" and must not be plotted as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarRow {
    pub skill: String,
    pub label: String,
    pub category: SkillCategory,
    pub expected: Option<f64>,
    #[serde(rename = "auto")]
    pub self_score: Option<f64>,
    #[serde(rename = "jefe")]
    pub manager_score: Option<f64>,
    #[serde(rename = "promedio")]
    pub composite: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub bucket_label: String,
    #[serde(rename = "auto")]
    pub self_score: Option<f64>,
    #[serde(rename = "jefe")]
    pub manager_score: Option<f64>,
    #[serde(rename = "promedio")]
    pub composite: Option<f64>,
    #[serde(rename = "esperado")]
    pub expected: Option<f64>,
}

/// Before/after bar for one skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
    pub skill: String,
    pub label: String,
    pub category: SkillCategory,
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub delta: Option<f64>,
    pub trend: DeltaTrend,
    pub trend_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<SkillHighlight>,
}

/// One comet on the organization trajectory chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CometRow {
    pub subject_id: PersonId,
    pub label: String,
    pub area: String,
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_band: Option<SeniorityBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_band: Option<SeniorityBand>,
    pub salto_nivel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapBar {
    pub skill: String,
    pub label: String,
    #[serde(rename = "auto")]
    pub self_score: f64,
    #[serde(rename = "jefe")]
    pub manager_score: f64,
    pub gap: f64,
    pub perception: Perception,
    pub perception_label: &'static str,
}
