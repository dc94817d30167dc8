use super::aggregate::mean;
use super::domain::{CompositeSkillPoint, SeniorityBand};
use serde::Serialize;

/// Lower bounds (inclusive) of each band above Trainee.
const SENIOR_FLOOR: f64 = 3.0;
const SEMI_SENIOR_FLOOR: f64 = 2.0;
const JUNIOR_FLOOR: f64 = 1.0;

pub fn classify(score: f64) -> SeniorityBand {
    if score >= SENIOR_FLOOR {
        SeniorityBand::Senior
    } else if score >= SEMI_SENIOR_FLOOR {
        SeniorityBand::SemiSenior
    } else if score >= JUNIOR_FLOOR {
        SeniorityBand::Junior
    } else {
        SeniorityBand::Trainee
    }
}

/// Mean composite across every point; `0.0` for an empty slice.
pub fn general_average(points: &[CompositeSkillPoint]) -> f64 {
    mean(points.iter().map(|point| point.composite))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationStatus {
    Exceeded,
    Met,
    NotMet,
}

impl ExpectationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exceeded => "Exceeded expectations",
            Self::Met => "Met expectations",
            Self::NotMet => "Did not meet expectations",
        }
    }
}

pub fn status(achieved: SeniorityBand, expected: SeniorityBand) -> ExpectationStatus {
    use std::cmp::Ordering;

    match achieved.cmp(&expected) {
        Ordering::Greater => ExpectationStatus::Exceeded,
        Ordering::Equal => ExpectationStatus::Met,
        Ordering::Less => ExpectationStatus::NotMet,
    }
}

/// Header figures for an individual dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeniorityAssessment {
    pub general_average: f64,
    pub achieved: SeniorityBand,
    pub achieved_label: &'static str,
    pub expected: SeniorityBand,
    pub expected_label: &'static str,
    pub status: ExpectationStatus,
    pub status_label: &'static str,
}

impl SeniorityAssessment {
    pub fn assess(points: &[CompositeSkillPoint], expected: SeniorityBand) -> Self {
        let general_average = general_average(points);
        let achieved = classify(general_average);
        let status = status(achieved, expected);

        Self {
            general_average,
            achieved,
            achieved_label: achieved.label(),
            expected,
            expected_label: expected.label(),
            status,
            status_label: status.label(),
        }
    }
}
