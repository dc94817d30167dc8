pub mod aggregate;
pub mod compare;
pub mod domain;
pub mod period;
pub mod projection;
pub mod report;
pub mod scope;
pub mod seniority;

#[cfg(test)]
mod tests;

pub use aggregate::{
    average_score, category_averages, composite_score, expected_average, gap_analysis,
    transform_to_skill_points, CategoryAverages, Perception, SkillGap,
};
pub use compare::{
    classify_delta, compare_between_periods, compare_rolling, compare_with_scheme,
    compare_within, highlight, person_trajectories, person_trajectories_within,
    skill_breakdown, skill_deltas, trend_by_bucket, BucketPoint, DeltaTrend, PeriodComparison,
    PersonTrajectory, SkillBreakdown, SkillDelta, SkillHighlight, SkillPeriodPoint,
    NEEDS_ATTENTION_THRESHOLD, NOTABLE_IMPROVEMENT_THRESHOLD, TREND_DELTA_THRESHOLD,
};
pub use domain::{
    CompositeSkillPoint, EvaluationRecord, EvaluatorKind, ExpectedSkillEntry, ExpectedSkillTable,
    FormOrigin, PersonId, RecordError, RecordId, Score, SeniorityBand, SkillCategory,
};
pub use period::{
    filter_by_period, quarter_of, ComparisonScheme, ComparisonWindows, DateRange, PeriodBucket,
    PeriodError, PeriodToken, TrendGranularity,
};
pub use report::{
    individual_report, organization_report, ExpectationProfile, IndividualReport,
    OrganizationReport,
};
pub use scope::{select, team_members, Scope};
pub use seniority::{classify, general_average, status, ExpectationStatus, SeniorityAssessment};
