//! Record selection for the individual, team, area and organization views.
//!
//! Team membership is resolved here, outside the aggregation functions, so
//! the evaluator-id fallback never leaks into score math.

use super::domain::{EvaluationRecord, EvaluatorKind, FormOrigin, PersonId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    Individual { subject_id: PersonId },
    Team { leader: PersonId, area: String },
    Area { area: String },
    Organization,
}

impl Default for Scope {
    fn default() -> Self {
        Self::Organization
    }
}

/// People evaluated by `leader`.
///
/// Upstream manager rows sometimes arrive without an evaluator id. When no
/// record in the whole dataset carries one, membership falls back to people
/// in `area` whose rows came from the analyst questionnaire.
pub fn team_members(records: &[EvaluationRecord], leader: &PersonId, area: &str) -> Vec<PersonId> {
    let has_evaluator_ids = records.iter().any(|record| record.evaluator_id.is_some());

    let members: BTreeSet<&PersonId> = if has_evaluator_ids {
        records
            .iter()
            .filter(|record| {
                record.evaluator_kind == EvaluatorKind::Manager
                    && record.evaluator_id.as_ref() == Some(leader)
            })
            .map(|record| &record.subject_id)
            .collect()
    } else {
        debug!(%leader, area, "no evaluator ids in dataset, resolving team by area and form");
        records
            .iter()
            .filter(|record| {
                record.area == area
                    && record.form_origin == FormOrigin::AnalystForm
                    && &record.subject_id != leader
            })
            .map(|record| &record.subject_id)
            .collect()
    };

    members.into_iter().cloned().collect()
}

/// Records visible in `scope`. The organization scope borrows the input.
pub fn select<'a>(records: &'a [EvaluationRecord], scope: &Scope) -> Cow<'a, [EvaluationRecord]> {
    match scope {
        Scope::Organization => Cow::Borrowed(records),
        Scope::Individual { subject_id } => Cow::Owned(
            records
                .iter()
                .filter(|record| &record.subject_id == subject_id)
                .cloned()
                .collect(),
        ),
        Scope::Area { area } => Cow::Owned(
            records
                .iter()
                .filter(|record| &record.area == area)
                .cloned()
                .collect(),
        ),
        Scope::Team { leader, area } => {
            let members: BTreeSet<PersonId> =
                team_members(records, leader, area).into_iter().collect();
            Cow::Owned(
                records
                    .iter()
                    .filter(|record| members.contains(&record.subject_id))
                    .cloned()
                    .collect(),
            )
        }
    }
}
