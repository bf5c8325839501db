use core::fmt;

use uuid::Uuid;

/// Identifier of a top-level record in a store collection.
///
/// The record store owns the id space, so ids are opaque strings. Locally
/// created records get a random UUID.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh random id for a record about to be inserted.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unused form slots carry an empty (or whitespace) id.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable identifier of an item embedded in a record's sub-list
/// (a parent of a child, a contact of an institution, a supervisor of an
/// authority). Assigned once when the owning record is written and never
/// reused, so references survive inserts and deletes elsewhere in the list.
///
/// The default is blank: an item read from storage without an id stays
/// blank until a write path fills it in.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SubItemId(String);

impl SubItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SubItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubItemId({})", self.0)
    }
}

impl fmt::Display for SubItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type ChildId = RecordId;
pub type InstitutionId = RecordId;
pub type AuthorityId = RecordId;
pub type DriverId = RecordId;
pub type EscortId = RecordId;
pub type RouteId = RecordId;
