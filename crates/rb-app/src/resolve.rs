//! Cross-reference resolution between records.
//!
//! Resolution is total: a dangling record id yields `None`, and a sub-item
//! reference that is absent, negative, out of range or unknown yields the
//! parent record with no sub-item.

use std::fmt;

use rb_core::{RecordId, SubItemId, format_phone};
use rb_schema::{
    Authority, AuthorityAssignment, Child, Contact, Escort, Institution, InstitutionAssignment,
    Parent, SubItemRef, Supervisor,
};

use crate::address::format_address;
use crate::directory::Directory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInstitution<'a> {
    pub institution: &'a Institution,
    pub contact: Option<&'a Contact>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAuthority<'a> {
    pub authority: &'a Authority,
    pub supervisor: Option<&'a Supervisor>,
}

fn pick_sub_item<'a, T>(
    items: &'a [T],
    reference: Option<&SubItemRef>,
    id_of: impl Fn(&T) -> &SubItemId,
) -> Option<&'a T> {
    match reference? {
        SubItemRef::Id(id) if id.is_blank() => None,
        SubItemRef::Id(id) => items.iter().find(|item| id_of(item) == id),
        SubItemRef::Index(index) => usize::try_from(*index).ok().and_then(|i| items.get(i)),
    }
}

pub fn resolve_institution_assignment<'a>(
    assignment: &InstitutionAssignment,
    institutions: &'a [Institution],
) -> Option<ResolvedInstitution<'a>> {
    let institution = institutions
        .iter()
        .find(|i| i.id == assignment.institution_id)?;
    let contact = pick_sub_item(&institution.contacts, assignment.contact.as_ref(), |c| &c.id);
    Some(ResolvedInstitution {
        institution,
        contact,
    })
}

pub fn resolve_authority_assignment<'a>(
    assignment: &AuthorityAssignment,
    authorities: &'a [Authority],
) -> Option<ResolvedAuthority<'a>> {
    let authority = authorities
        .iter()
        .find(|a| a.id == assignment.authority_id)?;
    let supervisor = pick_sub_item(
        &authority.supervisors,
        assignment.supervisor.as_ref(),
        |s| &s.id,
    );
    Some(ResolvedAuthority {
        authority,
        supervisor,
    })
}

pub fn resolve_escort<'a>(escort_id: &RecordId, escorts: &'a [Escort]) -> Option<&'a Escort> {
    escorts.iter().find(|e| &e.id == escort_id)
}

/// A child with every reference expanded, for display.
#[derive(Debug, Clone)]
pub struct ChildDetails<'a> {
    pub child: &'a Child,
    pub parents: &'a [Parent],
    /// Dangling assignments are left out.
    pub institutions: Vec<ResolvedInstitution<'a>>,
    pub authorities: Vec<ResolvedAuthority<'a>>,
    pub escort: Option<&'a Escort>,
}

pub fn resolve_child_details<'a>(child: &'a Child, directory: &'a Directory) -> ChildDetails<'a> {
    ChildDetails {
        child,
        parents: &child.parents,
        institutions: child
            .assigned_institutions
            .iter()
            .filter_map(|a| resolve_institution_assignment(a, &directory.institutions))
            .collect(),
        authorities: child
            .assigned_authorities
            .iter()
            .filter_map(|a| resolve_authority_assignment(a, &directory.authorities))
            .collect(),
        escort: child
            .escort_id
            .as_ref()
            .and_then(|id| resolve_escort(id, &directory.escorts)),
    }
}

impl fmt::Display for ChildDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let child = self.child;
        writeln!(f, "{} (age {})", child.full_name(), child.age)?;
        writeln!(
            f,
            "  address: {}",
            format_address(&child.home_address, child.city.as_deref())
        )?;
        if let Some(phone) = child.phone.as_deref() {
            writeln!(f, "  phone: {}", format_phone(phone))?;
        }
        if let Some(disability) = child.disability.as_deref() {
            writeln!(f, "  disability: {}", disability)?;
        }

        for parent in self.parents {
            writeln!(
                f,
                "  parent: {} ({}) {}",
                parent.full_name(),
                parent.relation_label(),
                format_phone(&parent.phone)
            )?;
        }

        for resolved in &self.institutions {
            let inst = resolved.institution;
            writeln!(
                f,
                "  institution: {} [{}, {}] {}",
                inst.name,
                inst.type_label(),
                inst.subtype_label(),
                format_address(&inst.address, inst.city.as_deref())
            )?;
            if let Some(contact) = resolved.contact {
                writeln!(
                    f,
                    "    contact: {} ({}) {}",
                    contact.full_name(),
                    contact.role_label(),
                    format_phone(&contact.phone)
                )?;
            }
        }

        for resolved in &self.authorities {
            writeln!(f, "  authority: {}", resolved.authority.name)?;
            if let Some(supervisor) = resolved.supervisor {
                let phone = supervisor.phone.as_deref().map(format_phone).unwrap_or_default();
                writeln!(f, "    supervisor: {} {}", supervisor.full_name(), phone)?;
            }
        }

        if let Some(escort) = self.escort {
            writeln!(
                f,
                "  escort: {} {}",
                escort.full_name(),
                format_phone(&escort.phone)
            )?;
        }
        if let Some(notes) = child.notes.as_deref() {
            writeln!(f, "  notes: {}", notes)?;
        }
        Ok(())
    }
}
