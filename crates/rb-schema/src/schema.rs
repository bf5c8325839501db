//! Record shapes shared with the record store.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use rb_core::{RecordId, SubItemId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Named collections of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Children,
    Institutions,
    Authorities,
    Drivers,
    Escorts,
    Routes,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Children,
        Collection::Institutions,
        Collection::Authorities,
        Collection::Drivers,
        Collection::Escorts,
        Collection::Routes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Children => "children",
            Collection::Institutions => "institutions",
            Collection::Authorities => "authorities",
            Collection::Drivers => "drivers",
            Collection::Escorts => "escorts",
            Collection::Routes => "routes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown collection '{}'", s))
    }
}

/// A top-level record living in one store collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug {
    const COLLECTION: Collection;

    fn id(&self) -> &RecordId;
    fn set_id(&mut self, id: RecordId);
    fn created_at(&self) -> &str;
    fn set_created_at(&mut self, created_at: String);

    /// Human-readable label for listings.
    fn display_name(&self) -> String;

    /// Reduce every stored phone field to bare digits.
    fn normalize_phones(&mut self) {}

    /// Give every embedded sub-item without an id a fresh one. Called on
    /// write paths only; reads never invent ids.
    fn assign_sub_item_ids(&mut self) {}

    fn validate(&self) -> Result<(), ValidationError>;
}

macro_rules! record_meta {
    () => {
        fn id(&self) -> &RecordId {
            &self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }

        fn created_at(&self) -> &str {
            &self.created_at
        }

        fn set_created_at(&mut self, created_at: String) {
            self.created_at = created_at;
        }
    };
}

fn strip_opt(phone: &mut Option<String>) {
    if let Some(p) = phone.as_mut() {
        *p = rb_core::strip_phone(p);
    }
    if phone.as_deref() == Some("") {
        *phone = None;
    }
}

fn fill_blank_ids<'a>(ids: impl IntoIterator<Item = &'a mut SubItemId>) {
    for id in ids {
        if id.is_blank() {
            *id = SubItemId::generate();
        }
    }
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

// ---------------------------------------------------------------------------
// Children and parents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[serde(alias = "זכר")]
    Male,
    #[serde(alias = "נקבה")]
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Child {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub home_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub parents: Vec<Parent>,
    #[serde(default)]
    pub assigned_institutions: Vec<InstitutionAssignment>,
    #[serde(default)]
    pub assigned_authorities: Vec<AuthorityAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escort_id: Option<RecordId>,
}

impl Child {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl Entity for Child {
    const COLLECTION: Collection = Collection::Children;

    record_meta!();

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn normalize_phones(&mut self) {
        strip_opt(&mut self.phone);
        for parent in &mut self.parents {
            parent.phone = rb_core::strip_phone(&parent.phone);
        }
    }

    fn assign_sub_item_ids(&mut self) {
        fill_blank_ids(self.parents.iter_mut().map(|p| &mut p.id));
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_child(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[serde(alias = "אמא")]
    Mother,
    #[serde(alias = "אבא")]
    Father,
    #[serde(alias = "אחר")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parent {
    #[serde(default)]
    pub id: SubItemId,
    pub first_name: String,
    pub last_name: String,
    pub relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_other: Option<String>,
    pub phone: String,
}

impl Parent {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn relation_label(&self) -> &str {
        match (self.relation, self.relation_other.as_deref()) {
            (Relation::Mother, _) => "mother",
            (Relation::Father, _) => "father",
            (Relation::Other, Some(other)) if !other.trim().is_empty() => other,
            (Relation::Other, _) => "other",
        }
    }
}

/// Reference to an item of another record's embedded list.
///
/// Current data references sub-items by their stable id. Older data used
/// the item's position, with `-1` meaning "nothing chosen yet"; those
/// positions still resolve but are rewritten to ids by migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubItemRef {
    Id(SubItemId),
    Index(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstitutionAssignment {
    pub institution_id: RecordId,
    #[serde(default, alias = "contact_index", skip_serializing_if = "Option::is_none")]
    pub contact: Option<SubItemRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorityAssignment {
    pub authority_id: RecordId,
    #[serde(
        default,
        alias = "supervisor_index",
        skip_serializing_if = "Option::is_none"
    )]
    pub supervisor: Option<SubItemRef>,
}

// ---------------------------------------------------------------------------
// Institutions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    #[serde(alias = "בית ספר")]
    School,
    #[serde(alias = "גן")]
    Kindergarten,
    #[serde(alias = "אחר")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionSubtype {
    #[serde(alias = "עיכוב שפתי")]
    LanguageDelay,
    #[serde(alias = "עיכוב התפתחותי")]
    DevelopmentalDelay,
    #[serde(alias = "אוטיזם")]
    Autism,
    #[serde(alias = "אחר")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Institution {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InstitutionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_code: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(alias = "institution_subtype")]
    pub subtype: InstitutionSubtype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_other: Option<String>,
    #[serde(default, alias = "waze_link", skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(
        default,
        alias = "pickup_image_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Institution {
    pub fn type_label(&self) -> &str {
        match (self.kind, self.type_other.as_deref()) {
            (InstitutionType::School, _) => "school",
            (InstitutionType::Kindergarten, _) => "kindergarten",
            (InstitutionType::Other, Some(other)) if !other.trim().is_empty() => other,
            (InstitutionType::Other, _) => "other",
        }
    }

    pub fn subtype_label(&self) -> &str {
        match (self.subtype, self.subtype_other.as_deref()) {
            (InstitutionSubtype::LanguageDelay, _) => "language delay",
            (InstitutionSubtype::DevelopmentalDelay, _) => "developmental delay",
            (InstitutionSubtype::Autism, _) => "autism",
            (InstitutionSubtype::Other, Some(other)) if !other.trim().is_empty() => other,
            (InstitutionSubtype::Other, _) => "other",
        }
    }
}

impl Entity for Institution {
    const COLLECTION: Collection = Collection::Institutions;

    record_meta!();

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn normalize_phones(&mut self) {
        for contact in &mut self.contacts {
            contact.phone = rb_core::strip_phone(&contact.phone);
        }
    }

    fn assign_sub_item_ids(&mut self) {
        fill_blank_ids(self.contacts.iter_mut().map(|c| &mut c.id));
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_institution(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactRole {
    #[serde(alias = "מורה")]
    Teacher,
    #[serde(alias = "גננת")]
    KindergartenTeacher,
    #[serde(alias = "אחר")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    #[serde(default)]
    pub id: SubItemId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: ContactRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_other: Option<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn role_label(&self) -> &str {
        match (self.role, self.role_other.as_deref()) {
            (ContactRole::Teacher, _) => "teacher",
            (ContactRole::KindergartenTeacher, _) => "kindergarten teacher",
            (ContactRole::Other, Some(other)) if !other.trim().is_empty() => other,
            (ContactRole::Other, _) => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Authorities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Authority {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub name: String,
    #[serde(default)]
    pub main_phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub supervisors: Vec<Supervisor>,
}

impl Entity for Authority {
    const COLLECTION: Collection = Collection::Authorities;

    record_meta!();

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn normalize_phones(&mut self) {
        self.main_phone = rb_core::strip_phone(&self.main_phone);
        for supervisor in &mut self.supervisors {
            strip_opt(&mut supervisor.phone);
        }
    }

    fn assign_sub_item_ids(&mut self) {
        fill_blank_ids(self.supervisors.iter_mut().map(|s| &mut s.id));
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_authority(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supervisor {
    #[serde(default)]
    pub id: SubItemId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Supervisor {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

// ---------------------------------------------------------------------------
// Drivers and escorts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub car_number: String,
    #[serde(default)]
    pub car_type: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Driver {
    const COLLECTION: Collection = Collection::Drivers;

    record_meta!();

    fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    fn normalize_phones(&mut self) {
        self.phone = rb_core::strip_phone(&self.phone);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_driver(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Escort {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Escort {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl Entity for Escort {
    const COLLECTION: Collection = Collection::Escorts;

    record_meta!();

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn normalize_phones(&mut self) {
        self.phone = rb_core::strip_phone(&self.phone);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_escort(self)
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Morning,
    Afternoon,
}

impl RouteType {
    pub fn name(self) -> &'static str {
        match self {
            RouteType::Morning => "morning",
            RouteType::Afternoon => "afternoon",
        }
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(RouteType::Morning),
            "afternoon" => Ok(RouteType::Afternoon),
            other => Err(format!("unknown route type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveDay {
    /// Sunday through Thursday.
    Weekdays,
    Friday,
}

impl FromStr for ActiveDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekdays" => Ok(ActiveDay::Weekdays),
            "friday" => Ok(ActiveDay::Friday),
            other => Err(format!("unknown active day '{}'", other)),
        }
    }
}

/// One child's stop on a route. Addresses are snapshots taken when the
/// route was saved; `source_digest` fingerprints what they were derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildInRoute {
    pub child_id: RecordId,
    pub pickup_time: String,
    #[serde(default)]
    pub pickup_address: String,
    /// Morning routes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_digest: Option<String>,
}

/// Route fields that are written on both insert and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteDraft {
    pub name: String,
    pub route_type: RouteType,
    pub is_permanent: bool,
    #[serde(default)]
    pub active_days: BTreeSet<ActiveDay>,
    #[serde(default)]
    pub children: Vec<ChildInRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: String,
    pub name: String,
    pub route_type: RouteType,
    pub is_permanent: bool,
    #[serde(default)]
    pub active_days: BTreeSet<ActiveDay>,
    #[serde(default)]
    pub children: Vec<ChildInRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Route {
    pub fn from_draft(id: RecordId, created_at: String, draft: RouteDraft) -> Self {
        Self {
            id,
            created_at,
            name: draft.name,
            route_type: draft.route_type,
            is_permanent: draft.is_permanent,
            active_days: draft.active_days,
            children: draft.children,
            notes: draft.notes,
        }
    }
}

impl Entity for Route {
    const COLLECTION: Collection = Collection::Routes;

    record_meta!();

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate_route(self)
    }
}

// ---------------------------------------------------------------------------
// Dataset snapshot
// ---------------------------------------------------------------------------

/// Export/import document holding every collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Dataset {
    pub version: u32,
    #[serde(default)]
    pub children: Vec<Child>,
    #[serde(default)]
    pub institutions: Vec<Institution>,
    #[serde(default)]
    pub authorities: Vec<Authority>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub escorts: Vec<Escort>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Dataset {
    pub fn assign_sub_item_ids(&mut self) {
        self.children.iter_mut().for_each(Entity::assign_sub_item_ids);
        self.institutions.iter_mut().for_each(Entity::assign_sub_item_ids);
        self.authorities.iter_mut().for_each(Entity::assign_sub_item_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for c in Collection::ALL {
            assert_eq!(c.name().parse::<Collection>().unwrap(), c);
        }
        assert!("buses".parse::<Collection>().is_err());
    }

    #[test]
    fn legacy_index_fields_are_accepted() {
        let json = r#"{"institution_id": "i1", "contact_index": -1}"#;
        let a: InstitutionAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.contact, Some(SubItemRef::Index(-1)));

        let json = r#"{"authority_id": "a1", "supervisor_index": 2}"#;
        let a: AuthorityAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.supervisor, Some(SubItemRef::Index(2)));
    }

    #[test]
    fn sub_item_ids_deserialize_as_ids() {
        let json = r#"{"institution_id": "i1", "contact": "c-42"}"#;
        let a: InstitutionAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.contact, Some(SubItemRef::Id(SubItemId::new("c-42"))));
    }

    #[test]
    fn institution_uses_legacy_aliases() {
        let json = r#"{
            "id": "i1",
            "name": "Oranim",
            "type": "school",
            "address": "School St 5",
            "institution_subtype": "autism",
            "waze_link": "https://waze.example/x",
            "contacts": []
        }"#;
        let inst: Institution = serde_json::from_str(json).unwrap();
        assert_eq!(inst.kind, InstitutionType::School);
        assert_eq!(inst.subtype, InstitutionSubtype::Autism);
        assert_eq!(inst.map_link.as_deref(), Some("https://waze.example/x"));
    }

    #[test]
    fn other_labels_prefer_free_text() {
        let contact = Contact {
            id: SubItemId::new("c1"),
            first_name: "Dana".to_string(),
            last_name: "Levi".to_string(),
            phone: "0501112222".to_string(),
            role: ContactRole::Other,
            role_other: Some("speech therapist".to_string()),
        };
        assert_eq!(contact.role_label(), "speech therapist");

        let parent = Parent {
            id: SubItemId::new("p1"),
            first_name: "Ruth".to_string(),
            last_name: "Cohen".to_string(),
            relation: Relation::Other,
            relation_other: None,
            phone: "0501234567".to_string(),
        };
        assert_eq!(parent.relation_label(), "other");
    }

    #[test]
    fn from_draft_keeps_identity_and_fields() {
        let draft = RouteDraft {
            name: "Line 1".to_string(),
            route_type: RouteType::Morning,
            is_permanent: true,
            active_days: [ActiveDay::Weekdays].into_iter().collect(),
            children: vec![],
            notes: None,
        };
        let route = Route::from_draft(RecordId::new("r1"), "t".to_string(), draft);
        assert_eq!(route.id, RecordId::new("r1"));
        assert_eq!(route.created_at, "t");
        assert_eq!(route.name, "Line 1");
        assert!(route.is_permanent);
    }

    #[test]
    fn hebrew_enum_values_are_accepted() {
        let json = r#"{
            "id": "c1",
            "first_name": "Noa",
            "last_name": "Cohen",
            "gender": "נקבה",
            "age": 6,
            "home_address": "Herzl 1",
            "parents": [{
                "id": "p1",
                "first_name": "Ruth",
                "last_name": "Cohen",
                "relation": "אמא",
                "phone": "0501234567"
            }]
        }"#;
        let child: Child = serde_json::from_str(json).unwrap();
        assert_eq!(child.gender, Gender::Female);
        assert_eq!(child.parents[0].relation, Relation::Mother);

        let json = r#"{
            "id": "i1",
            "name": "Oranim",
            "type": "גן",
            "address": "School St 5",
            "subtype": "עיכוב שפתי",
            "contacts": [{
                "id": "k1",
                "first_name": "Dana",
                "last_name": "Levi",
                "phone": "0501112222",
                "role": "גננת"
            }]
        }"#;
        let inst: Institution = serde_json::from_str(json).unwrap();
        assert_eq!(inst.kind, InstitutionType::Kindergarten);
        assert_eq!(inst.subtype, InstitutionSubtype::LanguageDelay);
        assert_eq!(inst.contacts[0].role, ContactRole::KindergartenTeacher);

        // Written back in canonical form.
        let out = serde_json::to_value(&inst).unwrap();
        assert_eq!(out["type"], "kindergarten");
        assert_eq!(out["contacts"][0]["role"], "kindergarten_teacher");
    }

    #[test]
    fn missing_sub_item_ids_stay_blank_until_assigned() {
        let json = r#"{
            "id": "i1",
            "name": "Oranim",
            "type": "school",
            "address": "School St 5",
            "subtype": "autism",
            "contacts": [
                {"first_name": "Dana", "last_name": "Levi", "phone": "1", "role": "teacher"},
                {"id": "k2", "first_name": "Avi", "last_name": "Bar", "phone": "2", "role": "other"}
            ]
        }"#;
        let mut inst: Institution = serde_json::from_str(json).unwrap();
        assert!(inst.contacts[0].id.is_blank());

        let reread: Institution = serde_json::from_str(json).unwrap();
        assert_eq!(inst, reread);

        inst.assign_sub_item_ids();
        assert!(!inst.contacts[0].id.is_blank());
        assert_eq!(inst.contacts[1].id, SubItemId::new("k2"));

        let assigned = inst.contacts[0].id.clone();
        inst.assign_sub_item_ids();
        assert_eq!(inst.contacts[0].id, assigned);
    }
}
