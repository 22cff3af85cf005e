use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use dtrack_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{TeamId, Username};

/// Permission names the server ships with.
pub const WELL_KNOWN_PERMISSIONS: &[&str] = &[
    "ACCESS_MANAGEMENT",
    "BOM_UPLOAD",
    "POLICY_MANAGEMENT",
    "POLICY_VIOLATION_ANALYSIS",
    "PORTFOLIO_MANAGEMENT",
    "PROJECT_CREATION_UPLOAD",
    "SYSTEM_CONFIGURATION",
    "TAG_MANAGEMENT",
    "VIEW_BADGES",
    "VIEW_POLICY_VIOLATION",
    "VIEW_PORTFOLIO",
    "VIEW_VULNERABILITY",
    "VULNERABILITY_ANALYSIS",
    "VULNERABILITY_MANAGEMENT",
];

/// Opaque capability grant name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(String);

impl PermissionName {
    /// Creates a permission name. Only emptiness is rejected.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "permission name must not be empty".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the permission name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the server ships this permission by default.
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        WELL_KNOWN_PERMISSIONS.contains(&self.0.as_str())
    }
}

impl TryFrom<String> for PermissionName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0
    }
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Set of permission names, unique by value.
///
/// Backed by an ordered set so persisted state is deterministic; callers must
/// not rely on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionName>);

impl PermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses raw names, collapsing duplicates.
    pub fn parse<I, S>(names: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(PermissionName::new)
            .collect::<AppResult<BTreeSet<_>>>()
            .map(Self)
    }

    /// Adds a name, returning whether it was new.
    pub fn insert(&mut self, name: PermissionName) -> bool {
        self.0.insert(name)
    }

    /// Returns whether the set contains the name.
    #[must_use]
    pub fn contains(&self, name: &PermissionName) -> bool {
        self.0.contains(name)
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the names.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionName> {
        self.0.iter()
    }

    /// Computes the add/remove plan that turns `self` into `desired`.
    #[must_use]
    pub fn diff(&self, desired: &PermissionSet) -> PermissionDiff {
        PermissionDiff {
            to_add: desired.0.difference(&self.0).cloned().collect(),
            to_remove: self.0.difference(&desired.0).cloned().collect(),
        }
    }
}

impl FromIterator<PermissionName> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionName>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a PermissionName;
    type IntoIter = std::collections::btree_set::Iter<'a, PermissionName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Grant/revoke plan between a recorded and a desired permission set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionDiff {
    /// Names present in the desired set only.
    pub to_add: Vec<PermissionName>,
    /// Names present in the recorded set only.
    pub to_remove: Vec<PermissionName>,
}

impl PermissionDiff {
    /// Returns whether no call is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Entity that owns exactly one permission set on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PermissionHolder {
    /// Team addressed by UUID.
    Team(TeamId),
    /// Managed user addressed by username.
    ManagedUser(Username),
}

impl Display for PermissionHolder {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Team(team_id) => write!(formatter, "team '{team_id}'"),
            Self::ManagedUser(username) => write!(formatter, "managed user '{username}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::btree_set;
    use proptest::prelude::*;

    use super::{PermissionHolder, PermissionName, PermissionSet};
    use crate::Username;

    fn set(names: &[&str]) -> PermissionSet {
        PermissionSet::parse(names.iter().copied()).unwrap_or_default()
    }

    fn names(values: &[PermissionName]) -> Vec<&str> {
        values.iter().map(PermissionName::as_str).collect()
    }

    #[test]
    fn duplicates_collapse() {
        let parsed = set(&["BOM_UPLOAD", "BOM_UPLOAD", "VIEW_PORTFOLIO"]);
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(PermissionSet::parse(["BOM_UPLOAD", " "]).is_err());
    }

    #[test]
    fn diff_from_empty_is_pure_add() {
        let diff = PermissionSet::new().diff(&set(&["A", "B"]));
        assert_eq!(names(&diff.to_add), vec!["A", "B"]);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn diff_to_empty_is_pure_remove() {
        let diff = set(&["A", "B"]).diff(&PermissionSet::new());
        assert!(diff.to_add.is_empty());
        assert_eq!(names(&diff.to_remove), vec!["A", "B"]);
    }

    #[test]
    fn mixed_diff_leaves_shared_names_untouched() {
        let diff = set(&["A", "B"]).diff(&set(&["B", "C"]));
        assert_eq!(names(&diff.to_add), vec!["C"]);
        assert_eq!(names(&diff.to_remove), vec!["A"]);
    }

    #[test]
    fn well_known_names_are_recognised() {
        assert!(PermissionName::new("BOM_UPLOAD").is_ok_and(|name| name.is_well_known()));
        assert!(PermissionName::new("CUSTOM").is_ok_and(|name| !name.is_well_known()));
    }

    #[test]
    fn holder_serializes_with_kind_tag() {
        let holder = Username::new("jdoe").map(PermissionHolder::ManagedUser);
        let json = holder
            .ok()
            .and_then(|holder| serde_json::to_value(holder).ok());
        assert_eq!(
            json,
            Some(serde_json::json!({"kind": "managed_user", "id": "jdoe"}))
        );
    }

    fn permission_set() -> impl Strategy<Value = PermissionSet> {
        btree_set("[A-Z_]{1,12}", 0..8).prop_map(|raw| set_from_strings(&raw))
    }

    fn set_from_strings(raw: &std::collections::BTreeSet<String>) -> PermissionSet {
        PermissionSet::parse(raw.iter().cloned()).unwrap_or_default()
    }

    proptest! {
        #[test]
        fn applying_diff_reaches_desired(current in permission_set(), desired in permission_set()) {
            let diff = current.diff(&desired);
            let mut applied: PermissionSet = current
                .iter()
                .filter(|name| !diff.to_remove.contains(name))
                .cloned()
                .collect();
            for name in &diff.to_add {
                applied.insert(name.clone());
            }
            prop_assert_eq!(applied, desired);
        }

        #[test]
        fn diff_against_self_is_empty(current in permission_set()) {
            prop_assert!(current.diff(&current).is_empty());
        }

        #[test]
        fn add_and_remove_are_disjoint(current in permission_set(), desired in permission_set()) {
            let diff = current.diff(&desired);
            for name in &diff.to_add {
                prop_assert!(!diff.to_remove.contains(name));
                prop_assert!(!current.contains(name));
            }
        }
    }
}
