//! Candidate database selection.

use crate::heuristic::IdentityFields;
use fibery_core::{Database, Schema};

/// Which identity criteria a lookup uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupKind {
    /// Lookup matches on email
    pub email: bool,
    /// Lookup matches on name
    pub name: bool,
}

impl LookupKind {
    /// Whether detected fields can serve this lookup
    #[must_use]
    pub fn satisfied_by(&self, fields: &IdentityFields<'_>) -> bool {
        if self.email && fields.email.is_none() {
            return false;
        }
        if self.name && fields.name.is_none() {
            return false;
        }
        self.email || self.name || fields.any()
    }
}

/// Database eligible for identity resolution, with its detected fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Candidate database
    pub database: &'a Database,
    /// Fields detected by the heuristic
    pub fields: IdentityFields<'a>,
}

/// Rank databases that can answer a lookup
///
/// Databases whose name contains `user` (any case) come first, then every
/// other qualifying database; both groups keep catalogue order.
#[must_use]
pub fn candidate_databases(schema: &Schema, kind: LookupKind) -> Vec<Candidate<'_>> {
    let (users, fallback): (Vec<_>, Vec<_>) = schema
        .databases()
        .iter()
        .filter(|database| database.has_id_field())
        .map(|database| Candidate {
            database,
            fields: IdentityFields::of(database),
        })
        .filter(|candidate| kind.satisfied_by(&candidate.fields))
        .partition(|candidate| candidate.database.name.to_lowercase().contains("user"));

    users.into_iter().chain(fallback).collect()
}
