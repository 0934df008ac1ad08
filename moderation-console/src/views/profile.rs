use super::{Notification, GENERIC_ERROR};
use crate::models::{User, UserRole};
use crate::services::AdminApi;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ROLE_ADDED: &str = "Role added.";
pub const ROLE_REMOVED: &str = "Role removed.";
pub const ADMIN_PROTECTED: &str = "This user is an administrator. Action not allowed.";

/// A backend-confirmed change to the displayed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTransition {
    Granted(UserRole),
    Revoked(UserRole),
}

/// Revocation refused before reaching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("roles of a user holding {privileged} cannot be revoked")]
pub struct RevokeRefused {
    pub privileged: UserRole,
}

/// State of the admin user profile view.
///
/// The role list starts as the fetched user's roles and only changes through
/// [`ProfileState::apply`] once the backend has confirmed a grant or revoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileState {
    tag: String,
    created_at: DateTime<Utc>,
    roles: Vec<UserRole>,
    add_open: bool,
}

impl ProfileState {
    pub fn from_user(user: &User) -> Self {
        Self {
            tag: user.tag.clone(),
            created_at: user.created_at,
            roles: user.roles.clone(),
            add_open: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn formatted_created_at(&self) -> String {
        self.created_at.format("%d/%m/%Y").to_string()
    }

    pub fn roles(&self) -> &[UserRole] {
        &self.roles
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Roles that can still be granted, in [`UserRole::ALL`] order.
    pub fn missing_roles(&self) -> Vec<UserRole> {
        UserRole::ALL
            .into_iter()
            .filter(|role| !self.roles.contains(role))
            .collect()
    }

    pub fn is_add_open(&self) -> bool {
        self.add_open
    }

    pub fn open_add_role(&mut self) {
        self.add_open = true;
    }

    pub fn close_add_role(&mut self) {
        self.add_open = false;
    }

    /// Any privileged role on display blocks every revocation.
    pub fn check_revoke(&self) -> Result<(), RevokeRefused> {
        match self.roles.iter().copied().find(UserRole::is_privileged) {
            Some(privileged) => Err(RevokeRefused { privileged }),
            None => Ok(()),
        }
    }

    pub fn apply(&mut self, transition: RoleTransition) {
        match transition {
            RoleTransition::Granted(role) => {
                if !self.roles.contains(&role) {
                    self.roles.push(role);
                }
            }
            RoleTransition::Revoked(role) => self.roles.retain(|r| *r != role),
        }
    }
}

/// Revoke `role`, updating `state` only once the backend confirms.
pub async fn revoke_role(
    state: &mut ProfileState,
    api: &dyn AdminApi,
    role: UserRole,
) -> Notification {
    if let Err(refused) = state.check_revoke() {
        tracing::warn!(user_tag = %state.tag, role = %role, reason = %refused, "Revocation refused");
        return Notification::error(ADMIN_PROTECTED);
    }

    match api.revoke_user_role(&state.tag, role).await {
        Ok(()) => {
            state.apply(RoleTransition::Revoked(role));
            Notification::success(ROLE_REMOVED)
        }
        Err(e) => {
            tracing::error!(user_tag = %state.tag, role = %role, error = %e, "Failed to revoke role");
            Notification::error(GENERIC_ERROR)
        }
    }
}

/// Grant `role` and close the add-role popover once the backend confirms.
pub async fn grant_role(
    state: &mut ProfileState,
    api: &dyn AdminApi,
    role: UserRole,
) -> Notification {
    match api.grant_user_role(&state.tag, role).await {
        Ok(()) => {
            state.apply(RoleTransition::Granted(role));
            state.close_add_role();
            Notification::success(ROLE_ADDED)
        }
        Err(e) => {
            tracing::error!(user_tag = %state.tag, role = %role, error = %e, "Failed to grant role");
            Notification::error(GENERIC_ERROR)
        }
    }
}
