use super::common::*;
use crate::evaluations::domain::FormOrigin;
use crate::evaluations::scope::{select, team_members, Scope};
use std::borrow::Cow;

#[test]
fn team_members_follow_evaluator_ids_when_present() {
    let on = date(2024, 2, 1);
    let records = vec![
        rated_by(manager_rating("ana", "SQL", 3, on), "lead-1"),
        rated_by(manager_rating("leo", "SQL", 3, on), "lead-2"),
        self_rating("mia", "SQL", 3, on),
        rated_by(manager_rating("bo", "SQL", 2, on), "lead-1"),
    ];

    let members = team_members(&records, &person("lead-1"), "Data");

    assert_eq!(members, vec![person("ana"), person("bo")]);
}

#[test]
fn team_members_fall_back_to_area_and_form_without_ids() {
    let on = date(2024, 2, 1);
    let records = vec![
        in_area(manager_rating("ana", "SQL", 3, on), "Data", FormOrigin::AnalystForm),
        in_area(manager_rating("leo", "SQL", 3, on), "Sales", FormOrigin::AnalystForm),
        in_area(self_rating("lead-1", "SQL", 3, on), "Data", FormOrigin::AnalystForm),
        in_area(manager_rating("zoe", "SQL", 3, on), "Data", FormOrigin::LeaderForm),
    ];

    let members = team_members(&records, &person("lead-1"), "Data");

    assert_eq!(members, vec![person("ana")]);
}

#[test]
fn select_scopes_records() {
    let on = date(2024, 2, 1);
    let records = vec![
        rated_by(manager_rating("ana", "SQL", 3, on), "lead-1"),
        in_area(manager_rating("leo", "SQL", 3, on), "Sales", FormOrigin::AnalystForm),
        self_rating("ana", "Teamwork", 2, on),
    ];

    let organization = select(&records, &Scope::Organization);
    assert!(matches!(organization, Cow::Borrowed(_)));
    assert_eq!(organization.len(), 3);

    let individual = select(
        &records,
        &Scope::Individual {
            subject_id: person("ana"),
        },
    );
    assert_eq!(individual.len(), 2);

    let area = select(
        &records,
        &Scope::Area {
            area: "Sales".to_string(),
        },
    );
    assert_eq!(area.len(), 1);

    let team = select(
        &records,
        &Scope::Team {
            leader: person("lead-1"),
            area: "Data".to_string(),
        },
    );
    assert_eq!(team.len(), 2);
    assert!(team.iter().all(|record| record.subject_id == person("ana")));
}
