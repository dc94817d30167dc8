use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who filled in the questionnaire row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluatorKind {
    #[serde(rename = "AUTO")]
    SelfAssessment,
    #[serde(rename = "JEFE")]
    Manager,
}

impl EvaluatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfAssessment => "Self assessment",
            Self::Manager => "Manager assessment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "HARD")]
    Technical,
    #[serde(rename = "SOFT")]
    Behavioral,
}

impl SkillCategory {
    pub const fn ordered() -> [Self; 2] {
        [Self::Technical, Self::Behavioral]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Behavioral => "Behavioral",
        }
    }
}

/// Questionnaire instance that produced a record, independent of the evaluator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormOrigin {
    #[serde(rename = "ANALYST")]
    AnalystForm,
    #[serde(rename = "LEADER")]
    LeaderForm,
}

/// A single evaluation answer. Only 1 through 4 are valid; zero is reserved as
/// the aggregators' "no data" sentinel and can never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl TryFrom<u8> for Score {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RecordError::ScoreOutOfRange(value))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Immutable evaluation row: one per evaluator, skill, person and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: RecordId,
    pub date: NaiveDate,
    pub subject_id: PersonId,
    pub subject_name: String,
    #[serde(default, deserialize_with = "blank_person_as_none")]
    pub evaluator_id: Option<PersonId>,
    pub evaluator_kind: EvaluatorKind,
    pub skill_category: SkillCategory,
    pub skill_name: String,
    pub score: Score,
    pub area: String,
    pub form_origin: FormOrigin,
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub comment: Option<String>,
}

impl EvaluationRecord {
    /// Applies the field cleanup the data-fetch layer guarantees before
    /// records reach the aggregation functions.
    pub fn trimmed(mut self) -> Self {
        self.subject_name = self.subject_name.trim().to_string();
        self.skill_name = self.skill_name.trim().to_string();
        self.area = self.area.trim().to_string();
        self.subject_id = PersonId(self.subject_id.0.trim().to_string());
        self.evaluator_id = self
            .evaluator_id
            .map(|id| id.0.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(PersonId);
        self.comment = self
            .comment
            .map(|comment| comment.trim().to_string())
            .filter(|comment| !comment.is_empty());
        self
    }
}

fn blank_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn blank_person_as_none<'de, D>(deserializer: D) -> Result<Option<PersonId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_string_as_none(deserializer)?.map(PersonId))
}

/// Ordinal seniority classification, ordered from least to most senior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityBand {
    Trainee,
    Junior,
    SemiSenior,
    Senior,
}

impl SeniorityBand {
    pub const fn ordered() -> [Self; 4] {
        [Self::Trainee, Self::Junior, Self::SemiSenior, Self::Senior]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trainee => "Trainee",
            Self::Junior => "Junior",
            Self::SemiSenior => "Semi Senior",
            Self::Senior => "Senior",
        }
    }
}

impl fmt::Display for SeniorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeniorityBand {
    type Err = RecordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();

        match normalized.as_str() {
            "trainee" | "tr" => Ok(Self::Trainee),
            "junior" | "jr" => Ok(Self::Junior),
            "semisenior" | "ssr" | "semisr" => Ok(Self::SemiSenior),
            "senior" | "sr" => Ok(Self::Senior),
            _ => Err(RecordError::UnknownSeniority(value.to_string())),
        }
    }
}

/// One row of the skill matrix: what a role in an area is expected to score
/// on a skill at a given seniority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSkillEntry {
    pub seniority: SeniorityBand,
    pub role: String,
    pub area: String,
    pub skill_name: String,
    pub expected_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpectedSkillKey {
    pub skill_name: String,
    pub band: SeniorityBand,
    pub role: String,
    pub area: String,
}

/// Sparse expectation lookup. A missing key means "no expectation defined",
/// which is not the same thing as an expectation of zero.
#[derive(Debug, Clone, Default)]
pub struct ExpectedSkillTable {
    entries: HashMap<ExpectedSkillKey, f64>,
}

impl ExpectedSkillTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ExpectedSkillEntry>,
    {
        let mut table = Self::default();
        for entry in entries {
            let key = ExpectedSkillKey {
                skill_name: entry.skill_name.trim().to_string(),
                band: entry.seniority,
                role: entry.role.trim().to_string(),
                area: entry.area.trim().to_string(),
            };
            // first entry for a key wins
            table.entries.entry(key).or_insert(entry.expected_value);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(
        &self,
        skill_name: &str,
        band: SeniorityBand,
        role: &str,
        area: &str,
    ) -> Option<f64> {
        let key = ExpectedSkillKey {
            skill_name: skill_name.to_string(),
            band,
            role: role.to_string(),
            area: area.to_string(),
        };
        self.entries.get(&key).copied()
    }

    /// Chart-facing variant of [`lookup`](Self::lookup): `0.0` stands for "no expectation".
    pub fn expected_or_zero(
        &self,
        skill_name: &str,
        band: SeniorityBand,
        role: &str,
        area: &str,
    ) -> f64 {
        self.lookup(skill_name, band, role, area).unwrap_or(0.0)
    }
}

/// Per-skill composite for one person (or slice) in one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSkillPoint {
    pub skill_name: String,
    pub category: SkillCategory,
    pub expected: f64,
    pub self_score: f64,
    pub manager_score: f64,
    pub composite: f64,
}

impl CompositeSkillPoint {
    pub fn has_expectation(&self) -> bool {
        self.expected > 0.0
    }

    pub fn has_data(&self) -> bool {
        self.composite > 0.0
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("score {0} is outside the 1-4 evaluation scale")]
    ScoreOutOfRange(u8),
    #[error("unknown seniority band '{0}'")]
    UnknownSeniority(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rejects_zero_and_values_above_four() {
        assert_eq!(Score::try_from(0), Err(RecordError::ScoreOutOfRange(0)));
        assert_eq!(Score::try_from(5), Err(RecordError::ScoreOutOfRange(5)));
        assert_eq!(Score::try_from(4).map(Score::value), Ok(4));
    }

    #[test]
    fn record_deserializes_domain_wire_values() {
        let json = r#"{
            "id": "r-1",
            "date": "2024-02-10",
            "subject_id": " ana ",
            "subject_name": "Ana Ruiz ",
            "evaluator_id": "  ",
            "evaluator_kind": "JEFE",
            "skill_category": "SOFT",
            "skill_name": " Communication",
            "score": 3,
            "area": "Data",
            "form_origin": "ANALYST",
            "comment": ""
        }"#;

        let record: EvaluationRecord = serde_json::from_str(json).expect("record parses");
        let record = record.trimmed();

        assert_eq!(record.evaluator_kind, EvaluatorKind::Manager);
        assert_eq!(record.skill_category, SkillCategory::Behavioral);
        assert_eq!(record.skill_name, "Communication");
        assert_eq!(record.subject_id, PersonId("ana".to_string()));
        assert!(record.evaluator_id.is_none());
        assert!(record.comment.is_none());
        assert_eq!(record.score.value(), 3);
    }

    #[test]
    fn record_with_zero_score_fails_to_deserialize() {
        let json = r#"{
            "id": "r-2", "date": "2024-02-10", "subject_id": "ana",
            "subject_name": "Ana", "evaluator_kind": "AUTO",
            "skill_category": "HARD", "skill_name": "SQL", "score": 0,
            "area": "Data", "form_origin": "LEADER"
        }"#;

        let error = serde_json::from_str::<EvaluationRecord>(json).expect_err("zero rejected");
        assert!(error.to_string().contains("outside the 1-4"));
    }

    #[test]
    fn seniority_parses_labels_and_aliases() {
        assert_eq!("Semi Senior".parse(), Ok(SeniorityBand::SemiSenior));
        assert_eq!("semi-senior".parse(), Ok(SeniorityBand::SemiSenior));
        assert_eq!("SSR".parse(), Ok(SeniorityBand::SemiSenior));
        assert_eq!(" jr ".parse(), Ok(SeniorityBand::Junior));
        assert_eq!("Senior".parse(), Ok(SeniorityBand::Senior));
        assert!("staff".parse::<SeniorityBand>().is_err());
        assert!(SeniorityBand::Trainee < SeniorityBand::Junior);
        assert!(SeniorityBand::SemiSenior < SeniorityBand::Senior);
    }

    #[test]
    fn expected_table_treats_missing_keys_as_no_expectation() {
        let table = ExpectedSkillTable::from_entries(vec![
            ExpectedSkillEntry {
                seniority: SeniorityBand::Junior,
                role: "Analyst".to_string(),
                area: "Data".to_string(),
                skill_name: "SQL".to_string(),
                expected_value: 2.0,
            },
            ExpectedSkillEntry {
                seniority: SeniorityBand::Junior,
                role: "Analyst".to_string(),
                area: "Data".to_string(),
                skill_name: "SQL".to_string(),
                expected_value: 3.5,
            },
        ]);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup("SQL", SeniorityBand::Junior, "Analyst", "Data"),
            Some(2.0)
        );
        assert_eq!(
            table.lookup("SQL", SeniorityBand::Senior, "Analyst", "Data"),
            None
        );
        assert_eq!(
            table.expected_or_zero("Python", SeniorityBand::Junior, "Analyst", "Data"),
            0.0
        );
    }
}
