//! Route persistence, listing and route sheets.

use std::collections::BTreeSet;

use rb_core::{RecordId, format_phone};
use rb_schema::{ActiveDay, Child, Entity, Institution, Route, RouteType};
use rb_store::{OrderBy, RecordStore, TypedStore, compute_snapshot_digest};
use tracing::{debug, info, warn};

use crate::address::first_institution;
use crate::directory::{Directory, list_entities};
use crate::error::AppResult;
use crate::resolve::resolve_escort;
use crate::route_build::{
    assemble_route, build_entry, check_route_form, missing_addresses, sort_by_pickup_time,
};
use crate::route_form::RouteForm;

/// What a successful save wrote.
#[derive(Debug, Clone)]
pub struct RouteSaveOutcome {
    pub route: Route,
    /// Children saved with an empty derived address.
    pub incomplete: Vec<RecordId>,
}

/// Create a route, or overwrite `editing` with the form's content.
pub fn save_route<S: RecordStore + ?Sized>(
    store: &S,
    form: &RouteForm,
    editing: Option<&RecordId>,
) -> AppResult<RouteSaveOutcome> {
    check_route_form(form)?;

    let children: Vec<Child> = store.list_all(OrderBy::Unordered)?;
    let institutions: Vec<Institution> = store.list_all(OrderBy::Unordered)?;
    let draft = assemble_route(form, &children, &institutions)?;

    let incomplete = missing_addresses(draft.route_type, &draft.children);
    for child_id in &incomplete {
        warn!(route = %draft.name, child = %child_id, "derived address is empty");
    }

    let route = match editing {
        Some(id) => {
            let existing: Route = store.fetch(id)?;
            let route = Route::from_draft(id.clone(), existing.created_at, draft);
            route.validate()?;
            let stored = store.update_entity(&route)?;
            info!(id = %stored.id, name = %stored.name, "updated route");
            stored
        }
        None => {
            let route = Route::from_draft(RecordId::generate(), String::new(), draft);
            route.validate()?;
            let stored = store.insert_entity(&route)?;
            info!(id = %stored.id, name = %stored.name, "created route");
            stored
        }
    };

    Ok(RouteSaveOutcome { route, incomplete })
}

pub fn delete_route<S: RecordStore + ?Sized>(store: &S, id: &RecordId) -> AppResult<()> {
    store.delete_entity::<Route>(id)?;
    info!(id = %id, "deleted route");
    Ok(())
}

/// Every route, newest first.
pub fn list_routes<S: RecordStore + ?Sized>(store: &S) -> AppResult<Vec<Route>> {
    list_entities(store)
}

/// Route list filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    /// Case-insensitive substring of the route name.
    pub search: String,
    pub permanent: Option<bool>,
    pub route_type: Option<RouteType>,
    pub day: Option<ActiveDay>,
}

impl RouteFilter {
    pub fn matches(&self, route: &Route) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || route.name.to_lowercase().contains(&needle))
            && self.permanent.is_none_or(|p| route.is_permanent == p)
            && self.route_type.is_none_or(|t| route.route_type == t)
            && self.day.is_none_or(|d| route.active_days.contains(&d))
    }
}

pub fn filter_routes<'a>(routes: &'a [Route], filter: &RouteFilter) -> Vec<&'a Route> {
    routes.iter().filter(|r| filter.matches(r)).collect()
}

/// Routes split by permanence and time of day, each keeping input order.
#[derive(Debug, Default)]
pub struct RouteGroups<'a> {
    pub permanent_morning: Vec<&'a Route>,
    pub permanent_afternoon: Vec<&'a Route>,
    pub temporary_morning: Vec<&'a Route>,
    pub temporary_afternoon: Vec<&'a Route>,
}

impl<'a> RouteGroups<'a> {
    /// Non-empty groups with their headings, in display order.
    pub fn sections(&self) -> Vec<(&'static str, &[&'a Route])> {
        [
            ("Permanent - morning", self.permanent_morning.as_slice()),
            ("Permanent - afternoon", self.permanent_afternoon.as_slice()),
            ("Temporary - morning", self.temporary_morning.as_slice()),
            ("Temporary - afternoon", self.temporary_afternoon.as_slice()),
        ]
        .into_iter()
        .filter(|(_, routes)| !routes.is_empty())
        .collect()
    }
}

pub fn group_routes<'a, I>(routes: I) -> RouteGroups<'a>
where
    I: IntoIterator<Item = &'a Route>,
{
    let mut groups = RouteGroups::default();
    for route in routes {
        let bucket = match (route.is_permanent, route.route_type) {
            (true, RouteType::Morning) => &mut groups.permanent_morning,
            (true, RouteType::Afternoon) => &mut groups.permanent_afternoon,
            (false, RouteType::Morning) => &mut groups.temporary_morning,
            (false, RouteType::Afternoon) => &mut groups.temporary_afternoon,
        };
        bucket.push(route);
    }
    groups
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheetRow {
    pub position: usize,
    pub pickup_time: String,
    pub child_id: RecordId,
    /// `None` when the child record is gone.
    pub child_name: Option<String>,
    pub child_phone: Option<String>,
    pub pickup_address: String,
    pub dropoff_address: Option<String>,
    pub escort: Option<String>,
}

/// A route laid out for the driver: stops in pickup order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSheet {
    pub name: String,
    pub route_type: RouteType,
    pub is_permanent: bool,
    pub active_days: BTreeSet<ActiveDay>,
    pub rows: Vec<RouteSheetRow>,
    pub notes: Option<String>,
}

pub fn route_sheet(route: &Route, directory: &Directory) -> RouteSheet {
    let rows = sort_by_pickup_time(&route.children)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let child = directory.child(&entry.child_id);
            let escort = child
                .and_then(|c| c.escort_id.as_ref())
                .and_then(|id| resolve_escort(id, &directory.escorts))
                .map(|e| format!("{} {}", e.full_name(), format_phone(&e.phone)));

            RouteSheetRow {
                position: i + 1,
                pickup_time: entry.pickup_time,
                child_id: entry.child_id,
                child_name: child.map(Child::full_name),
                child_phone: child.and_then(|c| c.phone.as_deref()).map(format_phone),
                pickup_address: entry.pickup_address,
                dropoff_address: match route.route_type {
                    RouteType::Morning => entry.dropoff_address.filter(|a| !a.is_empty()),
                    RouteType::Afternoon => None,
                },
                escort,
            }
        })
        .collect();

    RouteSheet {
        name: route.name.clone(),
        route_type: route.route_type,
        is_permanent: route.is_permanent,
        active_days: route.active_days.clone(),
        rows,
        notes: route.notes.clone(),
    }
}

/// Entries whose address sources changed since the route was saved.
///
/// Entries without a digest (legacy data, or a child that was already
/// missing) are stale once their child resolves again. Entries whose child
/// no longer resolves are reported too.
pub fn stale_entries(
    route: &Route,
    children: &[Child],
    institutions: &[Institution],
) -> Vec<RecordId> {
    route
        .children
        .iter()
        .filter(|entry| {
            let current = children.iter().find(|c| c.id == entry.child_id).map(|c| {
                compute_snapshot_digest(route.route_type, c, first_institution(c, institutions))
            });
            current != entry.source_digest
        })
        .map(|entry| entry.child_id.clone())
        .collect()
}

/// What a snapshot refresh changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshOutcome {
    /// Entries re-derived from the current records.
    pub refreshed: Vec<RecordId>,
    /// Stale entries left as saved because their child no longer resolves.
    pub kept: Vec<RecordId>,
    /// Refreshed entries whose derived address came out empty.
    pub incomplete: Vec<RecordId>,
}

/// Re-derive the addresses of every stale entry whose child still exists
/// and write the route back. Entries of deleted children keep their saved
/// snapshot.
pub fn refresh_route_snapshots<S: RecordStore + ?Sized>(
    store: &S,
    id: &RecordId,
) -> AppResult<RefreshOutcome> {
    let mut route: Route = store.fetch(id)?;
    let children: Vec<Child> = store.list_all(OrderBy::Unordered)?;
    let institutions: Vec<Institution> = store.list_all(OrderBy::Unordered)?;

    let stale = stale_entries(&route, &children, &institutions);
    let (refreshed, kept): (Vec<RecordId>, Vec<RecordId>) = stale
        .into_iter()
        .partition(|child_id| children.iter().any(|c| &c.id == child_id));
    for child_id in &kept {
        warn!(route = %route.name, child = %child_id, "child not found, keeping saved addresses");
    }
    if refreshed.is_empty() {
        debug!(id = %id, "no route snapshots to refresh");
        return Ok(RefreshOutcome {
            kept,
            ..RefreshOutcome::default()
        });
    }

    let mut rebuilt = Vec::with_capacity(refreshed.len());
    for entry in route.children.iter_mut() {
        if refreshed.contains(&entry.child_id) {
            *entry = build_entry(
                &entry.child_id,
                &entry.pickup_time,
                route.route_type,
                &children,
                &institutions,
            );
            rebuilt.push(entry.clone());
        }
    }

    let incomplete = missing_addresses(route.route_type, &rebuilt);
    for child_id in &incomplete {
        warn!(route = %route.name, child = %child_id, "derived address is empty");
    }

    store.update_entity(&route)?;
    info!(id = %id, refreshed = refreshed.len(), "refreshed route snapshots");
    Ok(RefreshOutcome {
        refreshed,
        kept,
        incomplete,
    })
}
