//! Route validation, ordering and assembly from a submitted form.

use std::cmp::Ordering;

use rb_core::{PickupTime, RecordId, is_valid_pickup_time};
use rb_schema::{ChildInRoute, Child, Institution, RouteDraft, RouteType};
use rb_store::compute_snapshot_digest;

use crate::address::{derive_dropoff_address, derive_pickup_address, first_institution};
use crate::route_form::{ChildSlot, RouteForm};

/// Reasons a route form is rejected before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Route name is required")]
    MissingRouteName,

    #[error("At least one child must be selected")]
    NoChildrenSelected,

    #[error("Every selected child needs a pickup time in HH:MM format")]
    InvalidPickupTime,
}

/// Drop unselected slots and check the pickup time of every remaining one.
pub fn validate_route_children(slots: &[ChildSlot]) -> Result<Vec<ChildSlot>, RouteError> {
    let selected: Vec<ChildSlot> = slots.iter().filter(|s| s.is_selected()).cloned().collect();

    if selected.is_empty() {
        return Err(RouteError::NoChildrenSelected);
    }
    if selected.iter().any(|s| !is_valid_pickup_time(&s.pickup_time)) {
        return Err(RouteError::InvalidPickupTime);
    }
    Ok(selected)
}

fn compare_pickup_times(a: &str, b: &str) -> Ordering {
    match (PickupTime::parse(a), PickupTime::parse(b)) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Stable chronological order. Unparsable times go last.
pub fn sort_by_pickup_time(entries: &[ChildInRoute]) -> Vec<ChildInRoute> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| compare_pickup_times(&a.pickup_time, &b.pickup_time));
    sorted
}

/// Name and child checks, in the order the form reports them.
pub fn check_route_form(form: &RouteForm) -> Result<Vec<ChildSlot>, RouteError> {
    if form.name.trim().is_empty() {
        return Err(RouteError::MissingRouteName);
    }
    validate_route_children(&form.children)
}

/// Snapshot of one child's stop with freshly derived addresses.
///
/// A child id that no longer resolves keeps its slot with empty addresses.
pub fn build_entry(
    child_id: &RecordId,
    pickup_time: &str,
    route_type: RouteType,
    children: &[Child],
    institutions: &[Institution],
) -> ChildInRoute {
    let child = children.iter().find(|c| &c.id == child_id);

    let pickup_address = child
        .map(|c| derive_pickup_address(c, route_type, institutions))
        .unwrap_or_default();
    let dropoff_address = (route_type == RouteType::Morning).then(|| {
        child
            .map(|c| derive_dropoff_address(c, institutions))
            .unwrap_or_default()
    });
    let source_digest = child.map(|c| {
        compute_snapshot_digest(route_type, c, first_institution(c, institutions))
    });

    ChildInRoute {
        child_id: child_id.clone(),
        pickup_time: pickup_time.to_string(),
        pickup_address,
        dropoff_address,
        source_digest,
    }
}

/// Turn a submitted form into the record fields to persist.
pub fn assemble_route(
    form: &RouteForm,
    children: &[Child],
    institutions: &[Institution],
) -> Result<RouteDraft, RouteError> {
    let slots = check_route_form(form)?;

    let entries = slots
        .iter()
        .map(|slot| {
            build_entry(
                &slot.child_id,
                &slot.pickup_time,
                form.route_type,
                children,
                institutions,
            )
        })
        .collect();

    let notes = form.notes.trim();
    Ok(RouteDraft {
        name: form.name.clone(),
        route_type: form.route_type,
        is_permanent: form.is_permanent,
        active_days: form.active_days.clone(),
        children: entries,
        notes: (!notes.is_empty()).then(|| form.notes.clone()),
    })
}

/// Children whose derived pickup (or, in the morning, dropoff) came out empty.
pub fn missing_addresses(route_type: RouteType, entries: &[ChildInRoute]) -> Vec<RecordId> {
    entries
        .iter()
        .filter(|e| {
            let dropoff_missing = route_type == RouteType::Morning
                && e.dropoff_address.as_deref().unwrap_or("").is_empty();
            e.pickup_address.is_empty() || dropoff_missing
        })
        .map(|e| e.child_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(child_id: &str, time: &str) -> ChildInRoute {
        ChildInRoute {
            child_id: RecordId::new(child_id),
            pickup_time: time.to_string(),
            pickup_address: String::new(),
            dropoff_address: None,
            source_digest: None,
        }
    }

    #[test]
    fn empty_slots_are_dropped() {
        let slots = vec![
            ChildSlot::new("c1", "07:30"),
            ChildSlot::default(),
            ChildSlot::new("  ", "garbage"),
        ];
        assert_eq!(
            validate_route_children(&slots).unwrap(),
            vec![ChildSlot::new("c1", "07:30")]
        );
    }

    #[test]
    fn nothing_selected() {
        let slots = vec![ChildSlot::default()];
        assert_eq!(
            validate_route_children(&slots),
            Err(RouteError::NoChildrenSelected)
        );
        assert_eq!(validate_route_children(&[]), Err(RouteError::NoChildrenSelected));
    }

    #[test]
    fn one_bad_time_fails_the_batch() {
        let slots = vec![ChildSlot::new("c1", "07:30"), ChildSlot::new("c2", "25:00")];
        assert_eq!(
            validate_route_children(&slots),
            Err(RouteError::InvalidPickupTime)
        );
    }

    #[test]
    fn name_is_checked_first() {
        let form = RouteForm {
            name: "   ".to_string(),
            ..RouteForm::default()
        };
        assert_eq!(
            assemble_route(&form, &[], &[]),
            Err(RouteError::MissingRouteName)
        );
    }

    #[test]
    fn sorts_chronologically() {
        let sorted = sort_by_pickup_time(&[
            entry("a", "09:00"),
            entry("b", "07:30"),
            entry("c", "8:15"),
            entry("d", "oops"),
            entry("e", "07:30"),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|e| e.child_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "e", "c", "a", "d"]);
    }

    #[test]
    fn unknown_child_keeps_slot_without_addresses() {
        let form = RouteForm {
            name: "Line 2".to_string(),
            children: vec![ChildSlot::new("ghost", "08:00")],
            notes: "  ".to_string(),
            ..RouteForm::default()
        };
        let draft = assemble_route(&form, &[], &[]).unwrap();
        assert_eq!(draft.children.len(), 1);
        assert_eq!(draft.children[0].pickup_address, "");
        assert_eq!(draft.children[0].dropoff_address.as_deref(), Some(""));
        assert!(draft.children[0].source_digest.is_none());
        assert!(draft.notes.is_none());
        assert_eq!(
            missing_addresses(draft.route_type, &draft.children),
            vec![RecordId::new("ghost")]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn time_string() -> impl Strategy<Value = String> {
            prop_oneof![
                (0u8..24, 0u8..60).prop_map(|(h, m)| format!("{:02}:{:02}", h, m)),
                (0u8..10, 0u8..60).prop_map(|(h, m)| format!("{}:{:02}", h, m)),
                "[a-z:0-9]{0,5}",
            ]
        }

        proptest! {
            #[test]
            fn sorted_output_is_ordered_permutation(
                times in prop::collection::vec(time_string(), 0..8)
            ) {
                let entries: Vec<ChildInRoute> = times
                    .iter()
                    .enumerate()
                    .map(|(i, t)| entry(&i.to_string(), t))
                    .collect();
                let sorted = sort_by_pickup_time(&entries);

                prop_assert_eq!(sorted.len(), entries.len());
                for pair in sorted.windows(2) {
                    prop_assert_ne!(
                        compare_pickup_times(&pair[0].pickup_time, &pair[1].pickup_time),
                        Ordering::Greater
                    );
                }
            }

            #[test]
            fn padded_times_sort_lexicographically(
                times in prop::collection::vec((0u8..24, 0u8..60), 0..8)
            ) {
                let entries: Vec<ChildInRoute> = times
                    .iter()
                    .enumerate()
                    .map(|(i, (h, m))| entry(&i.to_string(), &format!("{:02}:{:02}", h, m)))
                    .collect();
                let mut expected: Vec<String> =
                    entries.iter().map(|e| e.pickup_time.clone()).collect();
                expected.sort();

                let actual: Vec<String> = sort_by_pickup_time(&entries)
                    .into_iter()
                    .map(|e| e.pickup_time)
                    .collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
