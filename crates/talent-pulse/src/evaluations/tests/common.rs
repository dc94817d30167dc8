use chrono::NaiveDate;

use crate::evaluations::domain::{
    EvaluationRecord, EvaluatorKind, FormOrigin, PersonId, RecordId, Score, SkillCategory,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn person(id: &str) -> PersonId {
    PersonId(id.to_string())
}

pub(super) fn category_for(skill: &str) -> SkillCategory {
    match skill {
        "Communication" | "Teamwork" | "Ownership" => SkillCategory::Behavioral,
        _ => SkillCategory::Technical,
    }
}

pub(super) fn rating(
    subject: &str,
    kind: EvaluatorKind,
    skill: &str,
    score: u8,
    on: NaiveDate,
) -> EvaluationRecord {
    EvaluationRecord {
        id: RecordId(format!("{subject}-{skill}-{kind:?}-{on}-{score}")),
        date: on,
        subject_id: person(subject),
        subject_name: subject.to_string(),
        evaluator_id: None,
        evaluator_kind: kind,
        skill_category: category_for(skill),
        skill_name: skill.to_string(),
        score: Score::try_from(score).expect("valid score"),
        area: "Data".to_string(),
        form_origin: FormOrigin::AnalystForm,
        comment: None,
    }
}

pub(super) fn self_rating(subject: &str, skill: &str, score: u8, on: NaiveDate) -> EvaluationRecord {
    rating(subject, EvaluatorKind::SelfAssessment, skill, score, on)
}

pub(super) fn manager_rating(
    subject: &str,
    skill: &str,
    score: u8,
    on: NaiveDate,
) -> EvaluationRecord {
    rating(subject, EvaluatorKind::Manager, skill, score, on)
}

pub(super) fn rated_by(mut record: EvaluationRecord, leader: &str) -> EvaluationRecord {
    record.evaluator_id = Some(person(leader));
    record
}

pub(super) fn in_area(mut record: EvaluationRecord, area: &str, origin: FormOrigin) -> EvaluationRecord {
    record.area = area.to_string();
    record.form_origin = origin;
    record
}
