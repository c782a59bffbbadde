//! Workspace permission enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A workspace-scoped permission.
///
/// The wire form is `<domain>:<action>`, e.g. `workspace:delete_workspace`.
/// The set is closed: role defaults and per-member overrides can only
/// reference permissions listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // Workspace
    /// View workspace details.
    #[serde(rename = "workspace:view_workspace")]
    ViewWorkspace,
    /// Update workspace settings.
    #[serde(rename = "workspace:update_workspace")]
    UpdateWorkspace,
    /// Delete the workspace.
    #[serde(rename = "workspace:delete_workspace")]
    DeleteWorkspace,

    // Members
    /// View the member list.
    #[serde(rename = "member:view_members")]
    ViewMembers,
    /// Invite new members.
    #[serde(rename = "member:invite_members")]
    InviteMembers,
    /// Change member roles and permission overrides.
    #[serde(rename = "member:update_members")]
    UpdateMembers,
    /// Remove members.
    #[serde(rename = "member:remove_members")]
    RemoveMembers,

    // Projects
    /// View projects.
    #[serde(rename = "project:view_projects")]
    ViewProjects,
    /// Create projects.
    #[serde(rename = "project:create_project")]
    CreateProject,
    /// Update projects.
    #[serde(rename = "project:update_project")]
    UpdateProject,
    /// Delete projects.
    #[serde(rename = "project:delete_project")]
    DeleteProject,

    // Issues
    /// View issues.
    #[serde(rename = "issue:view_issues")]
    ViewIssues,
    /// Create issues.
    #[serde(rename = "issue:create_issue")]
    CreateIssue,
    /// Update issues.
    #[serde(rename = "issue:update_issue")]
    UpdateIssue,
    /// Delete issues.
    #[serde(rename = "issue:delete_issue")]
    DeleteIssue,
    /// Assign issues to members.
    #[serde(rename = "issue:assign_issue")]
    AssignIssue,

    // Comments
    /// Create comments.
    #[serde(rename = "comment:create_comment")]
    CreateComment,
    /// Edit comments.
    #[serde(rename = "comment:update_comment")]
    UpdateComment,
    /// Delete comments.
    #[serde(rename = "comment:delete_comment")]
    DeleteComment,

    // Analytics
    /// View workspace analytics.
    #[serde(rename = "analytics:view_analytics")]
    ViewAnalytics,
}

impl Permission {
    /// Return the permission in its `<domain>:<action>` wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewWorkspace => "workspace:view_workspace",
            Self::UpdateWorkspace => "workspace:update_workspace",
            Self::DeleteWorkspace => "workspace:delete_workspace",
            Self::ViewMembers => "member:view_members",
            Self::InviteMembers => "member:invite_members",
            Self::UpdateMembers => "member:update_members",
            Self::RemoveMembers => "member:remove_members",
            Self::ViewProjects => "project:view_projects",
            Self::CreateProject => "project:create_project",
            Self::UpdateProject => "project:update_project",
            Self::DeleteProject => "project:delete_project",
            Self::ViewIssues => "issue:view_issues",
            Self::CreateIssue => "issue:create_issue",
            Self::UpdateIssue => "issue:update_issue",
            Self::DeleteIssue => "issue:delete_issue",
            Self::AssignIssue => "issue:assign_issue",
            Self::CreateComment => "comment:create_comment",
            Self::UpdateComment => "comment:update_comment",
            Self::DeleteComment => "comment:delete_comment",
            Self::ViewAnalytics => "analytics:view_analytics",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = worklane_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workspace:view_workspace" => Ok(Self::ViewWorkspace),
            "workspace:update_workspace" => Ok(Self::UpdateWorkspace),
            "workspace:delete_workspace" => Ok(Self::DeleteWorkspace),
            "member:view_members" => Ok(Self::ViewMembers),
            "member:invite_members" => Ok(Self::InviteMembers),
            "member:update_members" => Ok(Self::UpdateMembers),
            "member:remove_members" => Ok(Self::RemoveMembers),
            "project:view_projects" => Ok(Self::ViewProjects),
            "project:create_project" => Ok(Self::CreateProject),
            "project:update_project" => Ok(Self::UpdateProject),
            "project:delete_project" => Ok(Self::DeleteProject),
            "issue:view_issues" => Ok(Self::ViewIssues),
            "issue:create_issue" => Ok(Self::CreateIssue),
            "issue:update_issue" => Ok(Self::UpdateIssue),
            "issue:delete_issue" => Ok(Self::DeleteIssue),
            "issue:assign_issue" => Ok(Self::AssignIssue),
            "comment:create_comment" => Ok(Self::CreateComment),
            "comment:update_comment" => Ok(Self::UpdateComment),
            "comment:delete_comment" => Ok(Self::DeleteComment),
            "analytics:view_analytics" => Ok(Self::ViewAnalytics),
            _ => Err(worklane_core::AppError::validation(format!(
                "Invalid permission: '{s}'"
            ))),
        }
    }
}
