//! Canonical counterparty identity.
//!
//! Customers and suppliers may or may not carry a master-data id; older
//! records identify them by display name only. Every component that groups
//! or filters by counterparty goes through the one resolver here, so the
//! id-or-name fallback is never reimplemented per call site.
//!
//! The policy: an id wins whenever both sides carry one; entities lacking an
//! id match by exact name equality. Inconsistent data (same name under two
//! ids, or the reverse) can split or merge a history; that is a documented
//! limitation of the inputs, not something this module papers over.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical grouping key for a counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartyKey {
    /// Keyed by master-data id.
    Id(String),
    /// Keyed by exact display name (no id assigned).
    Name(String),
}

impl PartyKey {
    /// Resolve the canonical key for a record's id/name pair.
    ///
    /// Empty ids are treated as absent.
    #[must_use]
    pub fn resolve(id: Option<&str>, name: &str) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self::Id(id.to_string()),
            _ => Self::Name(name.to_string()),
        }
    }
}

impl fmt::Display for PartyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Caller-supplied selection of one counterparty.
///
/// Matching mirrors [`PartyKey::resolve`]: when both the selector and the
/// record carry an id, the ids decide; otherwise exact name equality does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySelector {
    /// Master-data id, if the caller knows one.
    pub id: Option<String>,
    /// Display name fallback.
    pub name: String,
}

impl PartySelector {
    /// Select by id, with a name fallback for id-less records.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// Select by exact display name only.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Does the given record id/name pair belong to the selected party?
    #[must_use]
    pub fn matches(&self, id: Option<&str>, name: &str) -> bool {
        match (self.id.as_deref(), id) {
            (Some(sel), Some(rec)) if !sel.is_empty() && !rec.is_empty() => sel == rec,
            _ => self.name == name,
        }
    }
}
