//! Signed-in user context
//!
//! Passed explicitly to whatever needs it; there is no global session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Researcher,
    Organization,
}

impl Role {
    /// Landing route after sign-in
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Researcher => "/researcher/dashboard",
            Role::Organization => "/organization/dashboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            logged_in_at: Utc::now(),
        }
    }
}

/// Shared handle to the current session. Starts signed out.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    user: Arc<RwLock<Option<User>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, user: User) {
        tracing::info!(user = %user.id, role = ?user.role, "signed in");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Sign out, returning the user that was signed in
    pub fn logout(&self) -> Option<User> {
        let previous = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(user) = &previous {
            tracing::info!(user = %user.id, "signed out");
        }
        previous
    }

    pub fn current(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.current().map(|u| u.role)
    }
}
