//! Editable route form state.

use std::collections::BTreeSet;

use rb_core::{RecordId, normalize_time_input};
use rb_schema::{ActiveDay, MAX_ROUTE_CHILDREN, Route, RouteType};
use serde::{Deserialize, Serialize};

/// One editable child row. An empty `child_id` means nothing chosen yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSlot {
    #[serde(default)]
    pub child_id: RecordId,
    #[serde(default)]
    pub pickup_time: String,
}

impl ChildSlot {
    pub fn new(child_id: impl Into<RecordId>, pickup_time: impl Into<String>) -> Self {
        Self {
            child_id: child_id.into(),
            pickup_time: pickup_time.into(),
        }
    }

    pub fn is_selected(&self) -> bool {
        !self.child_id.is_blank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteForm {
    pub name: String,
    pub route_type: RouteType,
    pub is_permanent: bool,
    pub active_days: BTreeSet<ActiveDay>,
    pub children: Vec<ChildSlot>,
    pub notes: String,
}

impl Default for RouteForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            route_type: RouteType::Morning,
            is_permanent: true,
            active_days: [ActiveDay::Weekdays].into_iter().collect(),
            children: vec![ChildSlot::default()],
            notes: String::new(),
        }
    }
}

impl RouteForm {
    /// Form prefilled from a stored route.
    pub fn from_route(route: &Route) -> Self {
        let mut children: Vec<ChildSlot> = route
            .children
            .iter()
            .map(|entry| ChildSlot::new(entry.child_id.clone(), entry.pickup_time.clone()))
            .collect();
        if children.is_empty() {
            children.push(ChildSlot::default());
        }

        Self {
            name: route.name.clone(),
            route_type: route.route_type,
            is_permanent: route.is_permanent,
            active_days: route.active_days.clone(),
            children,
            notes: route.notes.clone().unwrap_or_default(),
        }
    }

    /// Append an empty slot. Returns false once the route is full.
    pub fn add_slot(&mut self) -> bool {
        if self.children.len() >= MAX_ROUTE_CHILDREN {
            return false;
        }
        self.children.push(ChildSlot::default());
        true
    }

    pub fn remove_slot(&mut self, index: usize) -> Option<ChildSlot> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn set_slot_child(&mut self, index: usize, child_id: RecordId) -> bool {
        match self.children.get_mut(index) {
            Some(slot) => {
                slot.child_id = child_id;
                true
            }
            None => false,
        }
    }

    /// Store raw keyboard input as a masked `HH:MM` time.
    pub fn set_slot_time(&mut self, index: usize, raw: &str) -> bool {
        match self.children.get_mut(index) {
            Some(slot) => {
                slot.pickup_time = normalize_time_input(raw);
                true
            }
            None => false,
        }
    }

    pub fn toggle_day(&mut self, day: ActiveDay) {
        if !self.active_days.remove(&day) {
            self.active_days.insert(day);
        }
    }
}
