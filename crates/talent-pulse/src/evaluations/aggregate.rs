use super::domain::{
    CompositeSkillPoint, EvaluationRecord, EvaluatorKind, ExpectedSkillTable, SeniorityBand,
    SkillCategory,
};
use serde::Serialize;
use std::collections::HashMap;

/// Arithmetic mean, or `0.0` ("no data") for an empty sequence.
pub(crate) fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean score for one evaluator kind on one skill; `0.0` when nothing matches.
pub fn average_score(records: &[EvaluationRecord], kind: EvaluatorKind, skill_name: &str) -> f64 {
    mean(
        records
            .iter()
            .filter(|record| record.evaluator_kind == kind && record.skill_name == skill_name)
            .map(|record| record.score.as_f64()),
    )
}

/// Combines self and manager averages. The plain average is capped at the
/// manager's number, so self-assessment can only pull the composite down.
/// When one side is missing (`0.0`) the other side is used as-is.
pub fn composite_score(self_avg: f64, manager_avg: f64) -> f64 {
    if self_avg > 0.0 && manager_avg > 0.0 {
        ((self_avg + manager_avg) / 2.0).min(manager_avg)
    } else if self_avg > 0.0 {
        self_avg
    } else {
        manager_avg
    }
}

/// Running self/manager sums for one group of records.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScoreTally {
    self_sum: f64,
    self_count: usize,
    manager_sum: f64,
    manager_count: usize,
}

impl ScoreTally {
    pub(crate) fn add(&mut self, record: &EvaluationRecord) {
        match record.evaluator_kind {
            EvaluatorKind::SelfAssessment => {
                self.self_sum += record.score.as_f64();
                self.self_count += 1;
            }
            EvaluatorKind::Manager => {
                self.manager_sum += record.score.as_f64();
                self.manager_count += 1;
            }
        }
    }

    pub(crate) fn record_count(&self) -> usize {
        self.self_count + self.manager_count
    }

    pub(crate) fn self_avg(&self) -> f64 {
        if self.self_count == 0 {
            0.0
        } else {
            self.self_sum / self.self_count as f64
        }
    }

    pub(crate) fn manager_avg(&self) -> f64 {
        if self.manager_count == 0 {
            0.0
        } else {
            self.manager_sum / self.manager_count as f64
        }
    }

    pub(crate) fn composite(&self) -> f64 {
        composite_score(self.self_avg(), self.manager_avg())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SkillTally {
    pub(crate) category: SkillCategory,
    pub(crate) scores: ScoreTally,
}

/// Groups records by skill name in order of first appearance. The category
/// is taken from the first record seen for each skill.
pub(crate) fn tally_by_skill<'a, I>(records: I) -> Vec<(String, SkillTally)>
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    let mut order: Vec<(String, SkillTally)> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let position = *positions
            .entry(record.skill_name.as_str())
            .or_insert_with(|| {
                order.push((
                    record.skill_name.clone(),
                    SkillTally {
                        category: record.skill_category,
                        scores: ScoreTally::default(),
                    },
                ));
                order.len() - 1
            });
        order[position].1.scores.add(record);
    }

    order
}

/// One composite point per distinct skill in `records`, with the expected
/// value looked up for the person's expected band, role and area.
pub fn transform_to_skill_points(
    records: &[EvaluationRecord],
    expected: &ExpectedSkillTable,
    expected_band: SeniorityBand,
    role: &str,
    area: &str,
) -> Vec<CompositeSkillPoint> {
    tally_by_skill(records)
        .into_iter()
        .map(|(skill_name, tally)| CompositeSkillPoint {
            expected: expected.expected_or_zero(&skill_name, expected_band, role, area),
            category: tally.category,
            self_score: tally.scores.self_avg(),
            manager_score: tally.scores.manager_avg(),
            composite: tally.scores.composite(),
            skill_name,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Perception {
    Overestimates,
    Underestimates,
    Aligned,
}

impl Perception {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overestimates => "Self rating above manager",
            Self::Underestimates => "Self rating below manager",
            Self::Aligned => "Aligned",
        }
    }
}

/// Distance between self and manager perception for one skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill_name: String,
    pub category: SkillCategory,
    pub self_avg: f64,
    pub manager_avg: f64,
    pub gap: f64,
    pub perception: Perception,
}

/// Gaps for skills rated by both sides, widest first.
pub fn gap_analysis(records: &[EvaluationRecord]) -> Vec<SkillGap> {
    let mut gaps: Vec<SkillGap> = tally_by_skill(records)
        .into_iter()
        .filter_map(|(skill_name, tally)| {
            let self_avg = tally.scores.self_avg();
            let manager_avg = tally.scores.manager_avg();
            if self_avg <= 0.0 || manager_avg <= 0.0 {
                return None;
            }

            let perception = if self_avg > manager_avg {
                Perception::Overestimates
            } else if self_avg < manager_avg {
                Perception::Underestimates
            } else {
                Perception::Aligned
            };

            Some(SkillGap {
                skill_name,
                category: tally.category,
                self_avg,
                manager_avg,
                gap: (self_avg - manager_avg).abs(),
                perception,
            })
        })
        .collect();

    gaps.sort_by(|a, b| {
        b.gap
            .total_cmp(&a.gap)
            .then_with(|| a.skill_name.cmp(&b.skill_name))
    });
    gaps
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryAverages {
    pub technical: f64,
    pub behavioral: f64,
}

/// Mean composite per skill category, skipping points without data.
pub fn category_averages(points: &[CompositeSkillPoint]) -> CategoryAverages {
    let for_category = |category: SkillCategory| {
        mean(
            points
                .iter()
                .filter(|point| point.category == category && point.has_data())
                .map(|point| point.composite),
        )
    };

    CategoryAverages {
        technical: for_category(SkillCategory::Technical),
        behavioral: for_category(SkillCategory::Behavioral),
    }
}

/// Mean expected value over points that have an expectation defined;
/// `0.0` when none do.
pub fn expected_average(points: &[CompositeSkillPoint]) -> f64 {
    mean(
        points
            .iter()
            .filter(|point| point.has_expectation())
            .map(|point| point.expected),
    )
}
