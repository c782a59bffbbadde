//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};

use worklane_entity::membership::WorkspaceRole;
use worklane_entity::permission::Permission;

/// Defines the mapping from each workspace role to its default
/// permission set.
///
/// The sets are strictly nested: everything a guest can do, a member can
/// do; everything a member can do, an admin can do.
#[derive(Debug, Clone)]
pub struct RolePolicies {
    /// Role → set of permissions.
    policies: HashMap<WorkspaceRole, HashSet<Permission>>,
}

impl RolePolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // Guest: read-mostly access plus commenting
        let mut guest = HashSet::new();
        guest.insert(Permission::ViewWorkspace);
        guest.insert(Permission::ViewMembers);
        guest.insert(Permission::ViewProjects);
        guest.insert(Permission::ViewIssues);
        guest.insert(Permission::CreateComment);
        policies.insert(WorkspaceRole::Guest, guest);

        // Member: guest + content creation and management
        let mut member = HashSet::new();
        member.insert(Permission::ViewWorkspace);
        member.insert(Permission::ViewMembers);
        member.insert(Permission::ViewProjects);
        member.insert(Permission::ViewIssues);
        member.insert(Permission::CreateComment);
        member.insert(Permission::CreateProject);
        member.insert(Permission::UpdateProject);
        member.insert(Permission::CreateIssue);
        member.insert(Permission::UpdateIssue);
        member.insert(Permission::DeleteIssue);
        member.insert(Permission::AssignIssue);
        member.insert(Permission::UpdateComment);
        member.insert(Permission::DeleteComment);
        member.insert(Permission::ViewAnalytics);
        policies.insert(WorkspaceRole::Member, member);

        // Admin: everything
        let admin: HashSet<Permission> = vec![
            Permission::ViewWorkspace,
            Permission::UpdateWorkspace,
            Permission::DeleteWorkspace,
            Permission::ViewMembers,
            Permission::InviteMembers,
            Permission::UpdateMembers,
            Permission::RemoveMembers,
            Permission::ViewProjects,
            Permission::CreateProject,
            Permission::UpdateProject,
            Permission::DeleteProject,
            Permission::ViewIssues,
            Permission::CreateIssue,
            Permission::UpdateIssue,
            Permission::DeleteIssue,
            Permission::AssignIssue,
            Permission::CreateComment,
            Permission::UpdateComment,
            Permission::DeleteComment,
            Permission::ViewAnalytics,
        ]
        .into_iter()
        .collect();
        policies.insert(WorkspaceRole::Admin, admin);

        Self { policies }
    }

    /// Returns the default permission set for the given role.
    pub fn permissions_for_role(&self, role: WorkspaceRole) -> HashSet<Permission> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }

    /// Checks whether the given role has the specified permission by
    /// default.
    pub fn has_permission(&self, role: WorkspaceRole, permission: Permission) -> bool {
        self.policies
            .get(&role)
            .map(|perms| perms.contains(&permission))
            .unwrap_or(false)
    }
}

impl Default for RolePolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_sets_are_nested() {
        let policies = RolePolicies::new();
        let guest = policies.permissions_for_role(WorkspaceRole::Guest);
        let member = policies.permissions_for_role(WorkspaceRole::Member);
        let admin = policies.permissions_for_role(WorkspaceRole::Admin);

        assert!(guest.is_subset(&member));
        assert!(member.is_subset(&admin));
        assert!(member.len() > guest.len());
        assert!(admin.len() > member.len());
    }

    #[test]
    fn test_destructive_operations_are_admin_only() {
        let policies = RolePolicies::new();

        for perm in [
            Permission::DeleteWorkspace,
            Permission::UpdateWorkspace,
            Permission::InviteMembers,
            Permission::UpdateMembers,
            Permission::RemoveMembers,
            Permission::DeleteProject,
        ] {
            assert!(policies.has_permission(WorkspaceRole::Admin, perm));
            assert!(!policies.has_permission(WorkspaceRole::Member, perm));
            assert!(!policies.has_permission(WorkspaceRole::Guest, perm));
        }
    }

    #[test]
    fn test_guests_can_comment_but_not_edit() {
        let policies = RolePolicies::new();

        assert!(policies.has_permission(WorkspaceRole::Guest, Permission::CreateComment));
        assert!(!policies.has_permission(WorkspaceRole::Guest, Permission::UpdateComment));
        assert!(!policies.has_permission(WorkspaceRole::Guest, Permission::CreateIssue));
    }
}
