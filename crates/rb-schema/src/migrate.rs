//! Dataset migration framework.

use std::collections::HashMap;

use rb_core::{RecordId, SubItemId};

use crate::SchemaError;
use crate::schema::{Dataset, SubItemRef};

/// Version 2 references sub-items (contacts, supervisors) by stable id
/// instead of by position.
pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut dataset: Dataset) -> Result<Dataset, SchemaError> {
    while dataset.version < LATEST_VERSION {
        dataset = migrate_one_version(dataset)?;
    }
    Ok(dataset)
}

fn migrate_one_version(dataset: Dataset) -> Result<Dataset, SchemaError> {
    match dataset.version {
        1 => migrate_v1_to_v2(dataset),
        v => Err(SchemaError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v1_to_v2(mut dataset: Dataset) -> Result<Dataset, SchemaError> {
    // Version 1 sub-items may carry no id at all.
    dataset.assign_sub_item_ids();

    let contact_ids: HashMap<RecordId, Vec<SubItemId>> = dataset
        .institutions
        .iter()
        .map(|i| (i.id.clone(), i.contacts.iter().map(|c| c.id.clone()).collect()))
        .collect();
    let supervisor_ids: HashMap<RecordId, Vec<SubItemId>> = dataset
        .authorities
        .iter()
        .map(|a| {
            (
                a.id.clone(),
                a.supervisors.iter().map(|s| s.id.clone()).collect(),
            )
        })
        .collect();

    for child in &mut dataset.children {
        for assignment in &mut child.assigned_institutions {
            let ids = contact_ids.get(&assignment.institution_id);
            assignment.contact = rewrite_index(assignment.contact.take(), ids);
        }
        for assignment in &mut child.assigned_authorities {
            let ids = supervisor_ids.get(&assignment.authority_id);
            assignment.supervisor = rewrite_index(assignment.supervisor.take(), ids);
        }
    }

    dataset.version = 2;
    Ok(dataset)
}

/// Positional references become id references. `-1`, out-of-range positions
/// and positions into a record that no longer exists become `None`.
fn rewrite_index(
    reference: Option<SubItemRef>,
    ids: Option<&Vec<SubItemId>>,
) -> Option<SubItemRef> {
    match reference {
        Some(SubItemRef::Index(index)) => {
            let ids = ids?;
            usize::try_from(index)
                .ok()
                .and_then(|i| ids.get(i))
                .cloned()
                .map(SubItemRef::Id)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn institution() -> Institution {
        Institution {
            id: RecordId::new("i1"),
            created_at: String::new(),
            name: "Oranim".to_string(),
            kind: InstitutionType::School,
            type_other: None,
            letter_code: None,
            address: "School St 5".to_string(),
            city: Some("Tel Aviv".to_string()),
            subtype: InstitutionSubtype::Autism,
            subtype_other: None,
            map_link: None,
            image_ref: None,
            contacts: vec![
                Contact {
                    id: SubItemId::new("k0"),
                    first_name: "Dana".to_string(),
                    last_name: String::new(),
                    phone: "0501112222".to_string(),
                    role: ContactRole::Teacher,
                    role_other: None,
                },
                Contact {
                    id: SubItemId::new("k1"),
                    first_name: "Yael".to_string(),
                    last_name: String::new(),
                    phone: "0503334444".to_string(),
                    role: ContactRole::KindergartenTeacher,
                    role_other: None,
                },
            ],
        }
    }

    fn child_with(assignments: Vec<InstitutionAssignment>) -> Child {
        Child {
            id: RecordId::new("c1"),
            created_at: String::new(),
            first_name: "Noa".to_string(),
            last_name: "Cohen".to_string(),
            gender: Gender::Female,
            age: 6,
            phone: None,
            home_address: "Herzl 1".to_string(),
            city: None,
            disability: None,
            notes: None,
            parents: vec![],
            assigned_institutions: assignments,
            assigned_authorities: vec![],
            escort_id: None,
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let dataset = Dataset {
            version: LATEST_VERSION,
            institutions: vec![institution()],
            ..Dataset::default()
        };
        let migrated = migrate_to_latest(dataset.clone()).unwrap();
        assert_eq!(migrated, dataset);
    }

    #[test]
    fn migrate_positional_contacts_to_ids() {
        let assignments = vec![
            InstitutionAssignment {
                institution_id: RecordId::new("i1"),
                contact: Some(SubItemRef::Index(1)),
            },
            InstitutionAssignment {
                institution_id: RecordId::new("i1"),
                contact: Some(SubItemRef::Index(-1)),
            },
        ];
        let dataset = Dataset {
            version: 1,
            children: vec![child_with(assignments)],
            institutions: vec![institution()],
            ..Dataset::default()
        };

        let migrated = migrate_to_latest(dataset).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);

        let assigned = &migrated.children[0].assigned_institutions;
        assert_eq!(assigned[0].contact, Some(SubItemRef::Id(SubItemId::new("k1"))));
        assert_eq!(assigned[1].contact, None);
    }

    #[test]
    fn migrate_drops_out_of_range_and_dangling_indices() {
        let assignments = vec![
            InstitutionAssignment {
                institution_id: RecordId::new("i1"),
                contact: Some(SubItemRef::Index(7)),
            },
            InstitutionAssignment {
                institution_id: RecordId::new("gone"),
                contact: Some(SubItemRef::Index(0)),
            },
        ];
        let dataset = Dataset {
            version: 1,
            children: vec![child_with(assignments)],
            institutions: vec![institution()],
            ..Dataset::default()
        };

        let migrated = migrate_to_latest(dataset).unwrap();
        let assigned = &migrated.children[0].assigned_institutions;
        assert_eq!(assigned[0].contact, None);
        assert_eq!(assigned[1].contact, None);
        // The dangling institution reference itself is kept.
        assert_eq!(assigned[1].institution_id.as_str(), "gone");
    }

    #[test]
    fn migrate_assigns_ids_before_rewriting_positions() {
        let mut inst = institution();
        inst.contacts[1].id = SubItemId::default();
        let dataset = Dataset {
            version: 1,
            children: vec![child_with(vec![InstitutionAssignment {
                institution_id: RecordId::new("i1"),
                contact: Some(SubItemRef::Index(1)),
            }])],
            institutions: vec![inst],
            ..Dataset::default()
        };

        let migrated = migrate_to_latest(dataset).unwrap();
        let assigned_id = migrated.institutions[0].contacts[1].id.clone();
        assert!(!assigned_id.is_blank());
        assert_eq!(
            migrated.children[0].assigned_institutions[0].contact,
            Some(SubItemRef::Id(assigned_id))
        );
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let dataset = Dataset {
            version: 0,
            ..Dataset::default()
        };
        assert!(matches!(
            migrate_to_latest(dataset),
            Err(SchemaError::Migration { .. })
        ));
    }
}
