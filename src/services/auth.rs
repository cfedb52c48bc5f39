use std::sync::Arc;

use tracing::info;

use crate::{
    models::{Role, User},
    storage::{keys, Storage},
};

/// Auth session holder. The role is persisted as a raw string under `role`
/// (the one non-JSON key) and the user record as JSON under `user`. This is
/// a route-guard flag, not a security boundary.
#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Current role; missing or unrecognized values read as guest.
    pub fn role(&self) -> Role {
        self.storage
            .get(keys::ROLE)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn user(&self) -> Option<User> {
        self.storage
            .get(keys::USER)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn sign_in(&self, role: Role, user: User) {
        self.storage.set(keys::ROLE, &role.to_string());
        if let Ok(raw) = serde_json::to_string(&user) {
            self.storage.set(keys::USER, &raw);
        }
        info!(%role, "signed in");
    }

    pub fn sign_out(&self) {
        self.storage.set(keys::ROLE, &Role::Guest.to_string());
        self.storage.set(keys::USER, "null");
        info!("signed out");
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}
