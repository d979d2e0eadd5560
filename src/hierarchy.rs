//! Role Hierarchy Table
//! Mission: Single source of truth for the ten-tier role ordering

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role identifier, e.g. "role10". Opaque to the core; only the
/// hierarchy table assigns it a rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: "role10" becomes "Role 10". Identifiers
    /// outside the roleN convention are shown as-is.
    pub fn display_name(&self) -> String {
        match self.0.strip_prefix("role") {
            Some(n) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => {
                format!("Role {}", n)
            }
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Ordered role table, highest authority first. Built once at startup
/// and never mutated.
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    roles: Vec<Role>,
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self {
            roles: (1..=10).rev().map(|n| Role::new(format!("role{}", n))).collect(),
        }
    }
}

impl RoleHierarchy {
    /// Build a hierarchy from an ordered role list (highest first).
    /// Rejects empty lists and duplicate entries.
    pub fn new(roles: Vec<Role>) -> anyhow::Result<Self> {
        if roles.is_empty() {
            anyhow::bail!("Role hierarchy must not be empty");
        }
        for (i, role) in roles.iter().enumerate() {
            if roles[..i].contains(role) {
                anyhow::bail!("Duplicate role in hierarchy: {}", role);
            }
        }
        Ok(Self { roles })
    }

    /// Rank of a role: 0 is the most superior. None for unknown roles.
    pub fn rank_of(&self, role: &Role) -> Option<usize> {
        self.roles.iter().position(|r| r == role)
    }

    /// All roles strictly above `role`, highest-to-lowest. Empty for the
    /// topmost role and for unknown roles, so callers can treat both as
    /// "no superiors".
    pub fn superiors_of(&self, role: &Role) -> &[Role] {
        match self.rank_of(role) {
            Some(rank) => &self.roles[..rank],
            None => &[],
        }
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.rank_of(role).is_some()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hierarchy_ordering() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.len(), 10);
        assert_eq!(hierarchy.roles()[0].as_str(), "role10");
        assert_eq!(hierarchy.roles()[9].as_str(), "role1");
    }

    #[test]
    fn test_rank_is_stable_and_unique() {
        let hierarchy = RoleHierarchy::default();

        assert_eq!(hierarchy.rank_of(&Role::from("role10")), Some(0));
        assert_eq!(hierarchy.rank_of(&Role::from("role6")), Some(4));
        assert_eq!(hierarchy.rank_of(&Role::from("role5")), Some(5));
        assert_eq!(hierarchy.rank_of(&Role::from("role1")), Some(9));

        // Every role maps to a distinct rank
        let mut ranks: Vec<usize> = hierarchy
            .roles()
            .iter()
            .map(|r| hierarchy.rank_of(r).unwrap())
            .collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), 10);
    }

    #[test]
    fn test_unknown_role_has_no_rank() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.rank_of(&Role::from("role42")), None);
        assert!(!hierarchy.contains(&Role::from("ceo")));
    }

    #[test]
    fn test_superiors_of_topmost_is_empty() {
        let hierarchy = RoleHierarchy::default();
        assert!(hierarchy.superiors_of(&Role::from("role10")).is_empty());
    }

    #[test]
    fn test_superiors_of_unknown_is_empty() {
        let hierarchy = RoleHierarchy::default();
        assert!(hierarchy.superiors_of(&Role::from("intern")).is_empty());
    }

    #[test]
    fn test_superiors_ordering() {
        let hierarchy = RoleHierarchy::default();
        let superiors = hierarchy.superiors_of(&Role::from("role7"));
        let ids: Vec<&str> = superiors.iter().map(|r| r.as_str()).collect();
        assert_eq!(ids, vec!["role10", "role9", "role8"]);
    }

    #[test]
    fn test_bottom_role_has_all_others_as_superiors() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.superiors_of(&Role::from("role1")).len(), 9);
    }

    #[test]
    fn test_duplicate_roles_rejected() {
        let roles = vec![Role::from("role2"), Role::from("role1"), Role::from("role2")];
        assert!(RoleHierarchy::new(roles).is_err());
    }

    #[test]
    fn test_empty_hierarchy_rejected() {
        assert!(RoleHierarchy::new(vec![]).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Role::from("role10").display_name(), "Role 10");
        assert_eq!(Role::from("role1").display_name(), "Role 1");
        assert_eq!(Role::from("manager").display_name(), "manager");
    }

    #[test]
    fn test_role_serde_transparent() {
        let role = Role::from("role3");
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, r#""role3""#);

        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, role);
    }
}
