//! Role capability table
//!
//! The whole authorization policy lives in `ROLE_PERMISSIONS`; handlers ask
//! `Role::allows` and never branch on roles themselves.

use serde::Serialize;

use crate::domain::entities::Role;

/// An operation class gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Dashboards, lists and the activity feed
    ViewData,
    GenerateReports,
    /// Create and renew customers
    ManageCustomers,
    /// Record income and expenses
    ManageLedger,
    /// Create and deactivate employees
    ManageEmployees,
    /// List and create user accounts
    ManageUsers,
}

const VIEWER: &[Permission] = &[Permission::ViewData, Permission::GenerateReports];

const EDITOR: &[Permission] = &[
    Permission::ViewData,
    Permission::GenerateReports,
    Permission::ManageCustomers,
    Permission::ManageLedger,
    Permission::ManageEmployees,
];

const ADMIN: &[Permission] = &[
    Permission::ViewData,
    Permission::GenerateReports,
    Permission::ManageCustomers,
    Permission::ManageLedger,
    Permission::ManageEmployees,
    Permission::ManageUsers,
];

/// Role → permitted operations
pub const ROLE_PERMISSIONS: &[(Role, &[Permission])] = &[
    (Role::Viewer, VIEWER),
    (Role::Editor, EDITOR),
    (Role::Admin, ADMIN),
];

impl Role {
    /// Permissions granted to this role
    pub fn permissions(&self) -> &'static [Permission] {
        ROLE_PERMISSIONS
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, permissions)| *permissions)
            .unwrap_or(&[])
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Permission; 6] = [
        Permission::ViewData,
        Permission::GenerateReports,
        Permission::ManageCustomers,
        Permission::ManageLedger,
        Permission::ManageEmployees,
        Permission::ManageUsers,
    ];

    #[test]
    fn every_role_has_an_entry() {
        for role in [Role::Viewer, Role::Editor, Role::Admin] {
            assert!(!role.permissions().is_empty(), "{role} has no permissions");
        }
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(Role::Viewer.allows(Permission::ViewData));
        assert!(Role::Viewer.allows(Permission::GenerateReports));
        assert!(!Role::Viewer.allows(Permission::ManageCustomers));
        assert!(!Role::Viewer.allows(Permission::ManageLedger));
        assert!(!Role::Viewer.allows(Permission::ManageEmployees));
        assert!(!Role::Viewer.allows(Permission::ManageUsers));
    }

    #[test]
    fn editor_cannot_manage_users() {
        assert!(Role::Editor.allows(Permission::ManageCustomers));
        assert!(Role::Editor.allows(Permission::ManageLedger));
        assert!(Role::Editor.allows(Permission::ManageEmployees));
        assert!(!Role::Editor.allows(Permission::ManageUsers));
    }

    #[test]
    fn admin_has_everything() {
        for permission in ALL {
            assert!(Role::Admin.allows(permission), "admin lacks {permission:?}");
        }
    }

    #[test]
    fn roles_are_strictly_nested() {
        for permission in Role::Viewer.permissions() {
            assert!(Role::Editor.allows(*permission));
        }
        for permission in Role::Editor.permissions() {
            assert!(Role::Admin.allows(*permission));
        }
    }
}
