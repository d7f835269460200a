//! Workspace roles and permissions.
//!
//! Every workspace member holds exactly one role. Budget actions are checked
//! against the role before any request is sent.

use std::str::FromStr;

use dompet_shared::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roles within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access, owns the workspace.
    Owner,
    /// Full access, manages members.
    Admin,
    /// Can record transactions and plan budgets.
    Member,
    /// Read-only access.
    Viewer,
}

/// Workspace-level permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// See the dashboard.
    ViewDashboard,
    /// List transactions.
    ViewTransactions,
    /// Record a transaction.
    CreateTransaction,
    /// Edit a transaction.
    EditTransaction,
    /// Delete a transaction.
    DeleteTransaction,
    /// List accounts.
    ViewAccounts,
    /// Open an account.
    CreateAccount,
    /// Edit an account.
    EditAccount,
    /// Close an account.
    DeleteAccount,
    /// List categories.
    ViewCategories,
    /// Create a category.
    CreateCategory,
    /// Rename or move a category.
    EditCategory,
    /// Delete a category.
    DeleteCategory,
    /// List members.
    ViewMembers,
    /// Invite a member.
    AddMember,
    /// Change a member's role.
    EditMember,
    /// Remove a member.
    RemoveMember,
}

impl Permission {
    /// Every permission, in display order.
    pub const ALL: [Self; 17] = [
        Self::ViewDashboard,
        Self::ViewTransactions,
        Self::CreateTransaction,
        Self::EditTransaction,
        Self::DeleteTransaction,
        Self::ViewAccounts,
        Self::CreateAccount,
        Self::EditAccount,
        Self::DeleteAccount,
        Self::ViewCategories,
        Self::CreateCategory,
        Self::EditCategory,
        Self::DeleteCategory,
        Self::ViewMembers,
        Self::AddMember,
        Self::EditMember,
        Self::RemoveMember,
    ];

    /// Wire name of the permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ViewTransactions => "view_transactions",
            Self::CreateTransaction => "create_transaction",
            Self::EditTransaction => "edit_transaction",
            Self::DeleteTransaction => "delete_transaction",
            Self::ViewAccounts => "view_accounts",
            Self::CreateAccount => "create_account",
            Self::EditAccount => "edit_account",
            Self::DeleteAccount => "delete_account",
            Self::ViewCategories => "view_categories",
            Self::CreateCategory => "create_category",
            Self::EditCategory => "edit_category",
            Self::DeleteCategory => "delete_category",
            Self::ViewMembers => "view_members",
            Self::AddMember => "add_member",
            Self::EditMember => "edit_member",
            Self::RemoveMember => "remove_member",
        }
    }
}

/// Actions on budget plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetAction {
    /// List plans and realizations.
    View,
    /// Create a plan.
    Create,
    /// Edit a plan's allocations.
    Update,
    /// Delete a plan.
    Delete,
    /// Activate a draft plan.
    Activate,
    /// Request recommendations.
    Recommend,
}

impl BudgetAction {
    /// Every budget action, in display order.
    pub const ALL: [Self; 6] = [
        Self::View,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Activate,
        Self::Recommend,
    ];
}

impl std::fmt::Display for BudgetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => write!(f, "view budgets"),
            Self::Create => write!(f, "create budgets"),
            Self::Update => write!(f, "update budgets"),
            Self::Delete => write!(f, "delete budgets"),
            Self::Activate => write!(f, "activate budgets"),
            Self::Recommend => write!(f, "request recommendations"),
        }
    }
}

impl Role {
    /// Returns true if this role holds `permission`.
    #[must_use]
    pub const fn can(&self, permission: Permission) -> bool {
        match self {
            Self::Owner | Self::Admin => true,
            Self::Member => matches!(
                permission,
                Permission::ViewDashboard
                    | Permission::ViewTransactions
                    | Permission::CreateTransaction
                    | Permission::EditTransaction
                    | Permission::DeleteTransaction
                    | Permission::ViewAccounts
                    | Permission::ViewCategories
            ),
            Self::Viewer => matches!(
                permission,
                Permission::ViewDashboard
                    | Permission::ViewTransactions
                    | Permission::ViewAccounts
                    | Permission::ViewCategories
            ),
        }
    }

    /// Returns true if this role may perform a budget action.
    #[must_use]
    pub const fn can_budget(&self, action: BudgetAction) -> bool {
        match action {
            BudgetAction::View => true,
            BudgetAction::Create
            | BudgetAction::Update
            | BudgetAction::Activate
            | BudgetAction::Recommend => {
                matches!(self, Self::Owner | Self::Admin | Self::Member)
            }
            BudgetAction::Delete => matches!(self, Self::Owner | Self::Admin),
        }
    }

    /// Returns true if this role can manage members.
    #[must_use]
    pub const fn can_manage_members(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// The permission map reported for this role.
    #[must_use]
    pub fn permissions(&self) -> Vec<(Permission, bool)> {
        Permission::ALL
            .iter()
            .map(|permission| (*permission, self.can(*permission)))
            .collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "Owner"),
            Self::Admin => write!(f, "Admin"),
            Self::Member => write!(f, "Member"),
            Self::Viewer => write!(f, "Viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AccessError::UnknownRole(s.to_string())),
        }
    }
}

/// Access errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The role does not allow the action.
    #[error("Role {role} cannot {action}")]
    Forbidden {
        /// Role of the caller.
        role: Role,
        /// Attempted action.
        action: BudgetAction,
    },

    /// Role name not recognized.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Forbidden { .. } => Self::Forbidden(err.to_string()),
            AccessError::UnknownRole(_) => Self::Validation(err.to_string()),
        }
    }
}

/// Checks a budget action against a role.
///
/// # Errors
///
/// Returns `AccessError::Forbidden` if the role does not allow the action.
pub fn ensure_budget_action(role: Role, action: BudgetAction) -> Result<(), AccessError> {
    if role.can_budget(action) {
        Ok(())
    } else {
        Err(AccessError::Forbidden { role, action })
    }
}
