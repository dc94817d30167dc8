use chrono::{Local, Months, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_pulse::evaluations::{
    EvaluationRecord, EvaluatorKind, ExpectedSkillEntry, FormOrigin, PersonId, RecordId, Score,
    SeniorityBand, SkillCategory,
};
use talent_pulse::snapshot::EvaluationSnapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// The single place the service reads the wall clock.
pub(crate) fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

struct DemoPerson {
    id: &'static str,
    name: &'static str,
    area: &'static str,
    leader: &'static str,
    /// Manager scores per skill, oldest window first.
    manager: [[u8; 4]; 3],
    /// Self scores per skill, oldest window first.
    selfs: [[u8; 4]; 3],
}

const DEMO_SKILLS: [(&str, SkillCategory); 4] = [
    ("SQL", SkillCategory::Technical),
    ("Data modeling", SkillCategory::Technical),
    ("Stakeholder communication", SkillCategory::Behavioral),
    ("Ownership", SkillCategory::Behavioral),
];

const DEMO_PEOPLE: [DemoPerson; 4] = [
    DemoPerson {
        id: "p-ana",
        name: "Ana Ruiz",
        area: "Data",
        leader: "p-lead-data",
        manager: [[2, 2, 2, 3], [2, 3, 2, 3], [3, 4, 3, 3]],
        selfs: [[3, 3, 3, 3], [3, 3, 3, 4], [4, 4, 3, 4]],
    },
    DemoPerson {
        id: "p-leo",
        name: "Leo Martins",
        area: "Data",
        leader: "p-lead-data",
        manager: [[3, 3, 3, 3], [3, 3, 3, 2], [3, 2, 2, 2]],
        selfs: [[3, 3, 4, 3], [3, 3, 3, 3], [3, 3, 3, 3]],
    },
    DemoPerson {
        id: "p-mia",
        name: "Mia Kowalski",
        area: "Product",
        leader: "p-lead-product",
        manager: [[1, 2, 2, 2], [2, 2, 2, 2], [2, 2, 3, 3]],
        selfs: [[2, 2, 2, 2], [2, 2, 2, 3], [2, 3, 3, 3]],
    },
    DemoPerson {
        id: "p-bo",
        name: "Bo Lindqvist",
        area: "Product",
        leader: "p-lead-product",
        manager: [[4, 3, 4, 4], [4, 4, 4, 4], [4, 4, 4, 3]],
        selfs: [[3, 3, 3, 3], [3, 3, 4, 3], [4, 3, 4, 3]],
    },
];

/// Synthetic evaluations spread over three windows ending at `today`
/// (roughly seven, four and one month back).
pub(crate) fn demo_snapshot(today: NaiveDate) -> EvaluationSnapshot {
    let offsets = [7, 4, 1];
    let mut records = Vec::new();

    for person in &DEMO_PEOPLE {
        for (window, months_back) in offsets.iter().enumerate() {
            let Some(on) = today.checked_sub_months(Months::new(*months_back)) else {
                continue;
            };
            for (skill_index, (skill, category)) in DEMO_SKILLS.iter().enumerate() {
                let sides = [
                    (EvaluatorKind::Manager, person.manager[window][skill_index]),
                    (EvaluatorKind::SelfAssessment, person.selfs[window][skill_index]),
                ];
                for (kind, raw) in sides {
                    let Ok(score) = Score::try_from(raw) else {
                        continue;
                    };
                    let evaluator_id = match kind {
                        EvaluatorKind::Manager => person.leader,
                        EvaluatorKind::SelfAssessment => person.id,
                    };
                    records.push(EvaluationRecord {
                        id: RecordId(format!(
                            "{}-{}-{}-{}",
                            person.id,
                            window,
                            skill_index,
                            kind.label()
                        )),
                        date: on,
                        subject_id: PersonId(person.id.to_string()),
                        subject_name: person.name.to_string(),
                        evaluator_id: Some(PersonId(evaluator_id.to_string())),
                        evaluator_kind: kind,
                        skill_category: *category,
                        skill_name: skill.to_string(),
                        score,
                        area: person.area.to_string(),
                        form_origin: FormOrigin::AnalystForm,
                        comment: None,
                    });
                }
            }
        }
    }

    let expected_skills = ["Data", "Product"]
        .into_iter()
        .flat_map(|area| {
            DEMO_SKILLS.iter().map(move |(skill, _)| ExpectedSkillEntry {
                seniority: SeniorityBand::SemiSenior,
                role: "Analyst".to_string(),
                area: area.to_string(),
                skill_name: skill.to_string(),
                expected_value: 2.5,
            })
        })
        .collect();

    EvaluationSnapshot {
        records,
        expected_skills,
    }
}
