//! Role and permission domain models for back-office access control.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles a profile can hold. A single account at a time holds SuperAdmin,
/// tracked by the Super Admin registry rather than the profile field alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The one account with ultimate authority over the club site.
    SuperAdmin,
    /// Back-office operator: manages content, cannot manage admins.
    Admin,
    /// Regular signed-up supporter account.
    User,
}

/// Permissions gating back-office operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create/update/delete content rows (players, fixtures, products, ...).
    ManageContent,
    /// Edit layouts, themes and events.
    ManageLayouts,
    /// Block/unblock regular users.
    ManageUsers,
    /// Grant and revoke the admin role, run the transfer handshake.
    ManageRoles,
    /// Read the audit log.
    ViewAuditLogs,
    /// Read back-office listings and dashboards.
    ViewAdminArea,
}

impl Role {
    /// Permission table per role. SuperAdmin strictly supersets Admin,
    /// which strictly supersets User.
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::SuperAdmin => &[
                Permission::ManageContent,
                Permission::ManageLayouts,
                Permission::ManageUsers,
                Permission::ManageRoles,
                Permission::ViewAuditLogs,
                Permission::ViewAdminArea,
            ],
            Role::Admin => &[
                Permission::ManageContent,
                Permission::ManageLayouts,
                Permission::ManageUsers,
                Permission::ViewAdminArea,
            ],
            Role::User => &[],
        }
    }

    /// Check whether this role carries the given permission.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Check whether this role carries every permission in the list.
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(*p))
    }

    /// Check whether this role carries at least one permission in the list.
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// Strict ordering check: SuperAdmin > Admin > User.
    pub fn is_higher_role(&self, other: Role) -> bool {
        self.priority() > other.priority()
    }

    /// Check if this role has at least the specified role level.
    pub fn has_at_least(&self, required: Role) -> bool {
        self.priority() >= required.priority()
    }

    /// Policy helper: may an actor with this role modify a target with the
    /// given role? SuperAdmin acts on anyone, Admin only on plain Users,
    /// Users on no one. Admin actions additionally re-verify the actor
    /// against the Super Admin registry; this table alone is never the
    /// authority for registry-sensitive operations.
    pub fn can_modify_role(&self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Admin => target == Role::User,
            Role::User => false,
        }
    }

    /// Numeric rank used for ordering comparisons.
    pub fn priority(&self) -> u8 {
        match self {
            Role::SuperAdmin => 3,
            Role::Admin => 2,
            Role::User => 1,
        }
    }

    /// All roles, highest first.
    pub fn all() -> &'static [Role] {
        &[Role::SuperAdmin, Role::Admin, Role::User]
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "super_admin"),
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("SUPER_ADMIN").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("superadmin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert!(Role::from_str("moderator").is_err());
    }

    #[test]
    fn test_has_permission_matches_table() {
        // Exhaustive: has_permission(r, p) iff p is in r's table
        let all_permissions = [
            Permission::ManageContent,
            Permission::ManageLayouts,
            Permission::ManageUsers,
            Permission::ManageRoles,
            Permission::ViewAuditLogs,
            Permission::ViewAdminArea,
        ];
        for role in Role::all() {
            for p in all_permissions {
                assert_eq!(
                    role.has_permission(p),
                    role.permissions().contains(&p),
                    "{} / {:?}",
                    role,
                    p
                );
            }
        }
    }

    #[test]
    fn test_super_admin_has_everything_admin_has() {
        for p in Role::Admin.permissions() {
            assert!(Role::SuperAdmin.has_permission(*p));
        }
    }

    #[test]
    fn test_user_has_no_permissions() {
        assert!(Role::User.permissions().is_empty());
        assert!(!Role::User.has_permission(Permission::ViewAdminArea));
    }

    #[test]
    fn test_has_all_and_any_permissions() {
        let set = [Permission::ManageContent, Permission::ManageRoles];
        assert!(Role::SuperAdmin.has_all_permissions(&set));
        assert!(!Role::Admin.has_all_permissions(&set));
        assert!(Role::Admin.has_any_permission(&set));
        assert!(!Role::User.has_any_permission(&set));
    }

    #[test]
    fn test_is_higher_role_strict_total_order() {
        assert!(Role::SuperAdmin.is_higher_role(Role::Admin));
        assert!(Role::SuperAdmin.is_higher_role(Role::User));
        assert!(Role::Admin.is_higher_role(Role::User));

        assert!(!Role::Admin.is_higher_role(Role::SuperAdmin));
        assert!(!Role::User.is_higher_role(Role::Admin));

        // Strict: no role is higher than itself
        for role in Role::all() {
            assert!(!role.is_higher_role(*role));
        }
    }

    #[test]
    fn test_has_at_least() {
        assert!(Role::SuperAdmin.has_at_least(Role::Admin));
        assert!(Role::Admin.has_at_least(Role::Admin));
        assert!(!Role::User.has_at_least(Role::Admin));
    }

    #[test]
    fn test_can_modify_role_policy() {
        assert!(Role::SuperAdmin.can_modify_role(Role::SuperAdmin));
        assert!(Role::SuperAdmin.can_modify_role(Role::Admin));
        assert!(Role::SuperAdmin.can_modify_role(Role::User));

        assert!(!Role::Admin.can_modify_role(Role::SuperAdmin));
        assert!(!Role::Admin.can_modify_role(Role::Admin));
        assert!(Role::Admin.can_modify_role(Role::User));

        for target in Role::all() {
            assert!(!Role::User.can_modify_role(*target));
        }
    }

    #[test]
    fn test_role_display() {
        assert_eq!(format!("{}", Role::SuperAdmin), "super_admin");
        assert_eq!(format!("{}", Role::User), "user");
    }
}
