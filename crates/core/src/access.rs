//! Capability checks for chore operations.
//!
//! Every use case asks [`can`] (or [`authorize`]) once, at entry, before it
//! reads or writes anything else. Two rules exist: admin-only, and
//! admin-or-assignee. A field edit that touches `assignedTo` asks again
//! with [`ChoreAction::Reassign`].

use crate::chore::Chore;
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The resolved caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Assignee filter for list and dashboard queries: `None` means every
    /// chore (admins), `Some(id)` means chores assigned to the caller.
    pub fn chore_scope(&self) -> Option<DbId> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoreAction {
    Create,
    View,
    EditFields,
    /// Changing `assignedTo`, part of a field edit but admin only.
    Reassign,
    UpdateStatus,
    UpdateChecklist,
    Delete,
    ViewGlobalDashboard,
    ExportReports,
    ListMembers,
}

impl ChoreAction {
    fn admin_only(self) -> bool {
        matches!(
            self,
            ChoreAction::Create
                | ChoreAction::Reassign
                | ChoreAction::Delete
                | ChoreAction::ViewGlobalDashboard
                | ChoreAction::ExportReports
                | ChoreAction::ListMembers
        )
    }

    fn denial(self) -> &'static str {
        match self {
            ChoreAction::Create => "Only admins can create chores",
            ChoreAction::Reassign => "Only admins can reassign chores",
            ChoreAction::Delete => "Only admins can delete chores",
            ChoreAction::ViewGlobalDashboard => "Admin role required",
            ChoreAction::ExportReports => "Admin role required",
            ChoreAction::ListMembers => "Admin role required",
            ChoreAction::View => "Not authorized to view this chore",
            ChoreAction::EditFields => "Not authorized to edit this chore",
            ChoreAction::UpdateStatus => "Not authorized to update this chore's status",
            ChoreAction::UpdateChecklist => "Not authorized to update checklist",
        }
    }
}

/// Whether `actor` may perform `action` on `chore`.
///
/// Admin-only actions ignore `chore`. Assignee actions need it; without a
/// chore only admins pass.
pub fn can(actor: &Actor, action: ChoreAction, chore: Option<&Chore>) -> bool {
    if actor.is_admin() {
        return true;
    }
    if action.admin_only() {
        return false;
    }
    chore.is_some_and(|c| c.is_assigned_to(actor.user_id))
}

/// [`can`], as a `Forbidden` error.
pub fn authorize(actor: &Actor, action: ChoreAction, chore: Option<&Chore>) -> Result<(), CoreError> {
    if can(actor, action, chore) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(action.denial().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::chore::{ChorePriority, ChoreStatus};

    const ASSIGNEE: DbId = 10;
    const OUTSIDER: DbId = 11;

    fn chore() -> Chore {
        let now = Utc::now();
        Chore {
            id: 1,
            title: "Take out trash".to_string(),
            description: "Bins go out Tuesday".to_string(),
            priority: ChorePriority::Low,
            status: ChoreStatus::Pending,
            progress: 0,
            due_date: None,
            assigned_to: vec![ASSIGNEE],
            todo_checklist: Vec::new(),
            attachments: Vec::new(),
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    const ASSIGNEE_ACTIONS: [ChoreAction; 4] = [
        ChoreAction::View,
        ChoreAction::EditFields,
        ChoreAction::UpdateStatus,
        ChoreAction::UpdateChecklist,
    ];

    const ADMIN_ACTIONS: [ChoreAction; 6] = [
        ChoreAction::Create,
        ChoreAction::Reassign,
        ChoreAction::Delete,
        ChoreAction::ViewGlobalDashboard,
        ChoreAction::ExportReports,
        ChoreAction::ListMembers,
    ];

    #[test]
    fn admin_can_do_everything() {
        let admin = Actor::new(1, Role::Admin);
        let chore = chore();
        for action in ASSIGNEE_ACTIONS.into_iter().chain(ADMIN_ACTIONS) {
            assert!(can(&admin, action, Some(&chore)), "{action:?}");
        }
        assert!(can(&admin, ChoreAction::Create, None));
    }

    #[test]
    fn assignee_can_progress_the_chore() {
        let member = Actor::new(ASSIGNEE, Role::Member);
        let chore = chore();
        for action in ASSIGNEE_ACTIONS {
            assert!(can(&member, action, Some(&chore)), "{action:?}");
        }
    }

    #[test]
    fn outsider_is_forbidden() {
        let member = Actor::new(OUTSIDER, Role::Member);
        let chore = chore();
        for action in ASSIGNEE_ACTIONS {
            assert_matches!(
                authorize(&member, action, Some(&chore)),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn assignee_cannot_create_or_delete() {
        let member = Actor::new(ASSIGNEE, Role::Member);
        let chore = chore();
        for action in ADMIN_ACTIONS {
            assert!(!can(&member, action, Some(&chore)), "{action:?}");
        }
    }

    #[test]
    fn scope_is_global_for_admins_only() {
        assert_eq!(Actor::new(1, Role::Admin).chore_scope(), None);
        assert_eq!(Actor::new(5, Role::Member).chore_scope(), Some(5));
    }
}
