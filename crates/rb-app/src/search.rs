//! Name search across every collection and the people embedded in records.

use core::fmt;
use core::str::FromStr;

use rb_core::{RecordId, SubItemId, format_phone};
use rb_store::RecordStore;
use serde::Serialize;
use tracing::debug;

use crate::directory::Directory;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    Children,
    Parents,
    Escorts,
    Drivers,
    Supervisors,
    /// Institution contacts.
    Teachers,
    Institutions,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 7] = [
        SearchCategory::Children,
        SearchCategory::Parents,
        SearchCategory::Escorts,
        SearchCategory::Drivers,
        SearchCategory::Supervisors,
        SearchCategory::Teachers,
        SearchCategory::Institutions,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchCategory::Children => "children",
            SearchCategory::Parents => "parents",
            SearchCategory::Escorts => "escorts",
            SearchCategory::Drivers => "drivers",
            SearchCategory::Supervisors => "supervisors",
            SearchCategory::Teachers => "teachers",
            SearchCategory::Institutions => "institutions",
        }
    }

    /// Singular label shown next to each hit.
    pub fn kind(self) -> &'static str {
        match self {
            SearchCategory::Children => "child",
            SearchCategory::Parents => "parent",
            SearchCategory::Escorts => "escort",
            SearchCategory::Drivers => "driver",
            SearchCategory::Supervisors => "supervisor",
            SearchCategory::Teachers => "teacher",
            SearchCategory::Institutions => "institution",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchCategory::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown search category '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Record id, or `"{record_id}-{sub_item_id}"` for embedded people.
    pub id: String,
    pub kind: SearchCategory,
    pub name: String,
    pub details: String,
    pub additional_info: Option<String>,
}

struct Matcher {
    needle: String,
}

impl Matcher {
    fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    /// Case-insensitive prefix match on any of the fields.
    fn any<F: AsRef<str>>(&self, fields: &[F]) -> bool {
        self.needle.is_empty()
            || fields
                .iter()
                .any(|f| f.as_ref().to_lowercase().starts_with(&self.needle))
    }
}

/// `<record>-<sub-item>`. Sub-items stored without an id fall back to
/// their position so the result stays the same across searches.
fn nested_id(parent: &RecordId, item: &SubItemId, position: usize) -> String {
    if item.is_blank() {
        format!("{}-{}", parent, position)
    } else {
        format!("{}-{}", parent, item)
    }
}

/// Search the store.
///
/// With a category, an empty term lists the whole category. Without one,
/// every category is searched and an empty term returns nothing.
pub fn search<S: RecordStore + ?Sized>(
    store: &S,
    term: &str,
    category: Option<SearchCategory>,
) -> AppResult<Vec<SearchResult>> {
    if term.trim().is_empty() && category.is_none() {
        return Ok(Vec::new());
    }
    let directory = Directory::load(store)?;
    let results = search_directory(&directory, term, category);
    debug!(term, count = results.len(), "search finished");
    Ok(results)
}

pub fn search_directory(
    directory: &Directory,
    term: &str,
    category: Option<SearchCategory>,
) -> Vec<SearchResult> {
    if term.trim().is_empty() && category.is_none() {
        return Vec::new();
    }

    let matcher = Matcher::new(term);
    let wanted = |c: SearchCategory| category.is_none_or(|only| only == c);
    let mut results = Vec::new();

    if wanted(SearchCategory::Children) {
        for child in &directory.children {
            if matcher.any(&[&child.first_name, &child.last_name]) {
                let gender = match child.gender {
                    rb_schema::Gender::Male => "male",
                    rb_schema::Gender::Female => "female",
                };
                results.push(SearchResult {
                    id: child.id.to_string(),
                    kind: SearchCategory::Children,
                    name: child.full_name(),
                    details: format!("age {}, {}", child.age, gender),
                    additional_info: Some(child.home_address.clone()),
                });
            }
        }
    }

    if wanted(SearchCategory::Parents) {
        for child in &directory.children {
            for (position, parent) in child.parents.iter().enumerate() {
                if matcher.any(&[&parent.first_name, &parent.last_name]) {
                    results.push(SearchResult {
                        id: nested_id(&child.id, &parent.id, position),
                        kind: SearchCategory::Parents,
                        name: parent.full_name(),
                        details: format!("relation: {}", parent.relation_label()),
                        additional_info: Some(format!("parent of {}", child.full_name())),
                    });
                }
            }
        }
    }

    if wanted(SearchCategory::Escorts) {
        for escort in &directory.escorts {
            if matcher.any(&[&escort.first_name, &escort.last_name]) {
                let details = if escort.phone.is_empty() {
                    "no phone".to_string()
                } else {
                    format_phone(&escort.phone)
                };
                results.push(SearchResult {
                    id: escort.id.to_string(),
                    kind: SearchCategory::Escorts,
                    name: escort.full_name(),
                    details,
                    additional_info: escort.notes.clone(),
                });
            }
        }
    }

    if wanted(SearchCategory::Drivers) {
        for driver in &directory.drivers {
            if matcher.any(&[&driver.first_name, &driver.last_name]) {
                let car_number = if driver.car_number.is_empty() {
                    "no number"
                } else {
                    driver.car_number.as_str()
                };
                results.push(SearchResult {
                    id: driver.id.to_string(),
                    kind: SearchCategory::Drivers,
                    name: format!("{} {}", driver.first_name, driver.last_name),
                    details: format!("car: {} - {}", car_number, driver.car_type),
                    additional_info: Some(format_phone(&driver.phone)),
                });
            }
        }
    }

    if wanted(SearchCategory::Supervisors) {
        for authority in &directory.authorities {
            for (position, supervisor) in authority.supervisors.iter().enumerate() {
                if matcher.any(&[&supervisor.first_name, &supervisor.last_name]) {
                    let role = if supervisor.role.trim().is_empty() {
                        "not specified"
                    } else {
                        supervisor.role.as_str()
                    };
                    results.push(SearchResult {
                        id: nested_id(&authority.id, &supervisor.id, position),
                        kind: SearchCategory::Supervisors,
                        name: supervisor.full_name(),
                        details: format!("role: {}", role),
                        additional_info: Some(format!("authority: {}", authority.name)),
                    });
                }
            }
        }
    }

    if wanted(SearchCategory::Teachers) {
        for institution in &directory.institutions {
            for (position, contact) in institution.contacts.iter().enumerate() {
                if matcher.any(&[&contact.first_name, &contact.last_name]) {
                    results.push(SearchResult {
                        id: nested_id(&institution.id, &contact.id, position),
                        kind: SearchCategory::Teachers,
                        name: contact.full_name(),
                        details: format!("role: {}", contact.role_label()),
                        additional_info: Some(format!("institution: {}", institution.name)),
                    });
                }
            }
        }
    }

    if wanted(SearchCategory::Institutions) {
        for institution in &directory.institutions {
            if matcher.any(&[&institution.name, &institution.address]) {
                results.push(SearchResult {
                    id: institution.id.to_string(),
                    kind: SearchCategory::Institutions,
                    name: institution.name.clone(),
                    details: format!(
                        "type: {}, {}",
                        institution.type_label(),
                        institution.subtype_label()
                    ),
                    additional_info: Some(institution.address.clone()),
                });
            }
        }
    }

    results
}
