//! Pickup and dropoff address derivation.
//!
//! Only the first assigned institution takes part. Anything that does not
//! resolve derives to the empty string.

use rb_schema::{Child, Institution, RouteType};

/// `address` followed by `", city"` when a city is present.
pub fn format_address(address: &str, city: Option<&str>) -> String {
    match city {
        Some(city) if !city.is_empty() => format!("{}, {}", address, city),
        _ => address.to_string(),
    }
}

/// The child's first assigned institution, if it still exists.
pub fn first_institution<'a>(
    child: &Child,
    institutions: &'a [Institution],
) -> Option<&'a Institution> {
    let first = child.assigned_institutions.first()?;
    institutions.iter().find(|i| i.id == first.institution_id)
}

fn institution_address(child: &Child, institutions: &[Institution]) -> String {
    first_institution(child, institutions)
        .map(|inst| format_address(&inst.address, inst.city.as_deref()))
        .unwrap_or_default()
}

/// Home in the morning, the first institution in the afternoon.
pub fn derive_pickup_address(
    child: &Child,
    route_type: RouteType,
    institutions: &[Institution],
) -> String {
    match route_type {
        RouteType::Morning => format_address(&child.home_address, child.city.as_deref()),
        RouteType::Afternoon => institution_address(child, institutions),
    }
}

pub fn derive_dropoff_address(child: &Child, institutions: &[Institution]) -> String {
    institution_address(child, institutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::RecordId;
    use rb_schema::{Gender, InstitutionAssignment, InstitutionSubtype, InstitutionType};

    fn child(city: Option<&str>, institution_id: Option<&str>) -> Child {
        Child {
            id: RecordId::new("c1"),
            created_at: String::new(),
            first_name: "Noa".to_string(),
            last_name: "Cohen".to_string(),
            gender: Gender::Female,
            age: 6,
            phone: None,
            home_address: "Herzl 1".to_string(),
            city: city.map(str::to_string),
            disability: None,
            notes: None,
            parents: vec![],
            assigned_institutions: institution_id
                .map(|id| InstitutionAssignment {
                    institution_id: RecordId::new(id),
                    contact: None,
                })
                .into_iter()
                .collect(),
            assigned_authorities: vec![],
            escort_id: None,
        }
    }

    fn institution(city: Option<&str>) -> Institution {
        Institution {
            id: RecordId::new("i1"),
            created_at: String::new(),
            name: "Oranim".to_string(),
            kind: InstitutionType::School,
            type_other: None,
            letter_code: None,
            address: "School St 5".to_string(),
            city: city.map(str::to_string),
            subtype: InstitutionSubtype::Autism,
            subtype_other: None,
            map_link: None,
            image_ref: None,
            contacts: vec![],
        }
    }

    #[test]
    fn city_is_appended_when_present() {
        assert_eq!(format_address("Herzl 1", Some("Haifa")), "Herzl 1, Haifa");
        assert_eq!(format_address("Herzl 1", Some("")), "Herzl 1");
        assert_eq!(format_address("Herzl 1", None), "Herzl 1");
    }

    #[test]
    fn morning_picks_up_at_home() {
        let institutions = vec![institution(Some("Haifa"))];
        let c = child(Some("Tel Aviv"), Some("i1"));
        assert_eq!(
            derive_pickup_address(&c, RouteType::Morning, &institutions),
            "Herzl 1, Tel Aviv"
        );
        assert_eq!(derive_dropoff_address(&c, &institutions), "School St 5, Haifa");
    }

    #[test]
    fn afternoon_picks_up_at_institution() {
        let institutions = vec![institution(None)];
        let c = child(None, Some("i1"));
        assert_eq!(
            derive_pickup_address(&c, RouteType::Afternoon, &institutions),
            "School St 5"
        );
    }

    #[test]
    fn unresolvable_institution_is_empty() {
        let institutions = vec![institution(None)];
        let unassigned = child(None, None);
        assert_eq!(
            derive_pickup_address(&unassigned, RouteType::Afternoon, &institutions),
            ""
        );
        let dangling = child(None, Some("i9"));
        assert_eq!(derive_dropoff_address(&dangling, &institutions), "");
    }
}
