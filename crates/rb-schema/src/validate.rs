//! Record validation.
//!
//! The record store enforces none of these rules, so every write goes
//! through them first.

use std::collections::HashSet;

use crate::schema::{
    Authority, Child, Dataset, Driver, Entity, Escort, Institution, Parent, Route,
};

pub const MAX_PARENTS: usize = 2;
pub const MAX_ASSIGNED_INSTITUTIONS: usize = 2;
pub const MAX_ROUTE_CHILDREN: usize = 4;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Too many {what}: {count} (max {max})")]
    TooMany {
        what: String,
        count: usize,
        max: usize,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_dataset(dataset: &Dataset) -> Result<(), ValidationError> {
    if dataset.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: dataset.version,
        });
    }

    validate_all(&dataset.children)?;
    validate_all(&dataset.institutions)?;
    validate_all(&dataset.authorities)?;
    validate_all(&dataset.drivers)?;
    validate_all(&dataset.escorts)?;
    validate_all(&dataset.routes)?;
    Ok(())
}

fn validate_all<T: Entity>(records: &[T]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for record in records {
        if !ids.insert(record.id()) {
            return Err(ValidationError::DuplicateId {
                id: record.id().to_string(),
                context: T::COLLECTION.name().to_string(),
            });
        }
        record.validate()?;
    }
    Ok(())
}

pub fn validate_child(child: &Child) -> Result<(), ValidationError> {
    let context = format!("child '{}'", child.id);
    require("first_name", &child.first_name, &context)?;
    require("last_name", &child.last_name, &context)?;
    require("home_address", &child.home_address, &context)?;
    if let Some(phone) = &child.phone {
        digits_only("phone", phone, &context)?;
    }

    check_cap("parents", child.parents.len(), MAX_PARENTS)?;
    check_cap(
        "assigned institutions",
        child.assigned_institutions.len(),
        MAX_ASSIGNED_INSTITUTIONS,
    )?;

    let mut parent_ids = HashSet::new();
    for parent in &child.parents {
        if !parent.id.is_blank() && !parent_ids.insert(&parent.id) {
            return Err(ValidationError::DuplicateId {
                id: parent.id.to_string(),
                context: format!("{} parents", context),
            });
        }
        validate_parent(parent, &context)?;
    }

    for assignment in &child.assigned_institutions {
        if assignment.institution_id.is_blank() {
            return Err(ValidationError::MissingField {
                field: "institution_id".to_string(),
                context: format!("{} assigned institutions", context),
            });
        }
    }
    for assignment in &child.assigned_authorities {
        if assignment.authority_id.is_blank() {
            return Err(ValidationError::MissingField {
                field: "authority_id".to_string(),
                context: format!("{} assigned authorities", context),
            });
        }
    }

    Ok(())
}

fn validate_parent(parent: &Parent, child_context: &str) -> Result<(), ValidationError> {
    let context = format!("{} parent '{}'", child_context, parent.id);
    require("first_name", &parent.first_name, &context)?;
    require("phone", &parent.phone, &context)?;
    digits_only("phone", &parent.phone, &context)
}

pub fn validate_institution(institution: &Institution) -> Result<(), ValidationError> {
    let context = format!("institution '{}'", institution.id);
    require("name", &institution.name, &context)?;
    require("address", &institution.address, &context)?;

    let mut contact_ids = HashSet::new();
    for contact in &institution.contacts {
        if !contact.id.is_blank() && !contact_ids.insert(&contact.id) {
            return Err(ValidationError::DuplicateId {
                id: contact.id.to_string(),
                context: format!("{} contacts", context),
            });
        }
        if !contact.phone.is_empty() {
            digits_only("contact phone", &contact.phone, &context)?;
        }
    }
    Ok(())
}

pub fn validate_authority(authority: &Authority) -> Result<(), ValidationError> {
    let context = format!("authority '{}'", authority.id);
    require("name", &authority.name, &context)?;
    if !authority.main_phone.is_empty() {
        digits_only("main_phone", &authority.main_phone, &context)?;
    }

    let mut supervisor_ids = HashSet::new();
    for supervisor in &authority.supervisors {
        if !supervisor.id.is_blank() && !supervisor_ids.insert(&supervisor.id) {
            return Err(ValidationError::DuplicateId {
                id: supervisor.id.to_string(),
                context: format!("{} supervisors", context),
            });
        }
        if let Some(phone) = &supervisor.phone {
            digits_only("supervisor phone", phone, &context)?;
        }
    }
    Ok(())
}

pub fn validate_driver(driver: &Driver) -> Result<(), ValidationError> {
    let context = format!("driver '{}'", driver.id);
    require("first_name", &driver.first_name, &context)?;
    require("phone", &driver.phone, &context)?;
    digits_only("phone", &driver.phone, &context)
}

pub fn validate_escort(escort: &Escort) -> Result<(), ValidationError> {
    let context = format!("escort '{}'", escort.id);
    require("first_name", &escort.first_name, &context)?;
    require("phone", &escort.phone, &context)?;
    digits_only("phone", &escort.phone, &context)
}

pub fn validate_route(route: &Route) -> Result<(), ValidationError> {
    let context = format!("route '{}'", route.id);
    require("name", &route.name, &context)?;
    check_cap("route children", route.children.len(), MAX_ROUTE_CHILDREN)?;

    for entry in &route.children {
        if entry.child_id.is_blank() {
            return Err(ValidationError::MissingField {
                field: "child_id".to_string(),
                context: format!("{} children", context),
            });
        }
        if !rb_core::is_valid_pickup_time(&entry.pickup_time) {
            return Err(ValidationError::InvalidValue {
                field: format!("{} child '{}' pickup_time", context, entry.child_id),
                value: entry.pickup_time.clone(),
                reason: "must be HH:MM".to_string(),
            });
        }
    }
    Ok(())
}

fn require(field: &str, value: &str, context: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn digits_only(field: &str, value: &str, context: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidValue {
            field: format!("{} {}", context, field),
            value: value.to_string(),
            reason: "must contain digits only".to_string(),
        });
    }
    Ok(())
}

fn check_cap(what: &str, count: usize, max: usize) -> Result<(), ValidationError> {
    if count > max {
        return Err(ValidationError::TooMany {
            what: what.to_string(),
            count,
            max,
        });
    }
    Ok(())
}
