//! Per-request session context.

use dompet_core::access::{BudgetAction, Role, ensure_budget_action};
use dompet_shared::config::SessionConfig;
use dompet_shared::types::WorkspaceId;

use crate::error::{ClientError, ClientResult};

/// Workspace, credentials and role passed explicitly to every call.
#[derive(Clone)]
pub struct RequestContext {
    workspace_id: WorkspaceId,
    token: Option<String>,
    role: Option<Role>,
}

impl RequestContext {
    /// Context for a workspace, without credentials.
    #[must_use]
    pub const fn new(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            token: None,
            role: None,
        }
    }

    /// Builds a context from the session configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if no workspace is configured and
    /// `ClientError::Access` for an unknown role name.
    pub fn from_config(session: &SessionConfig) -> ClientResult<Self> {
        let workspace_id = session
            .workspace_id
            .ok_or_else(|| ClientError::Config("session.workspace_id is not set".into()))?;
        let role = session
            .role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(str::parse::<Role>)
            .transpose()?;
        Ok(Self {
            workspace_id: WorkspaceId::new(workspace_id),
            token: session.token.clone().filter(|t| !t.is_empty()),
            role,
        })
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attaches the caller's role in the workspace.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Workspace of this session.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Caller's role, if known.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Checks a budget action against the known role.
    ///
    /// Without a role the backend remains the only gate.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Access` if the role forbids the action.
    pub fn ensure(&self, action: BudgetAction) -> ClientResult<()> {
        match self.role {
            Some(role) => Ok(ensure_budget_action(role, action)?),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("workspace_id", &self.workspace_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}
