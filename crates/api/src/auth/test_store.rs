//! Counting [`AccessStore`] double for resolver and checker unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use careerdesk_core::types::DbId;
use careerdesk_db::models::user::Identity;
use careerdesk_db::stores::AccessStore;

use crate::auth::jwt::JwtConfig;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret-that-is-long-enough".to_string(),
        access_token_expiry_mins: 15,
        session_expiry_days: 7,
    }
}

pub struct CountingStore {
    roles: Vec<String>,
    grants: HashSet<(String, String)>,
    fail: bool,
    role_lookups: AtomicUsize,
    grant_lookups: AtomicUsize,
}

impl CountingStore {
    pub fn with_roles(roles: &[&str]) -> Self {
        Self {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            grants: HashSet::new(),
            fail: false,
            role_lookups: AtomicUsize::new(0),
            grant_lookups: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_roles(&[])
        }
    }

    pub fn granting(mut self, role: &str, permission_id: &str) -> Self {
        self.grants
            .insert((role.to_string(), permission_id.to_string()));
        self
    }

    pub fn role_lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }

    pub fn grant_lookups(&self) -> usize {
        self.grant_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessStore for CountingStore {
    async fn find_identity(&self, _user_id: DbId) -> Result<Option<Identity>, sqlx::Error> {
        Ok(None)
    }

    async fn active_role_names(&self, _user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.roles.clone())
    }

    async fn any_role_grants(
        &self,
        role_names: &[String],
        permission_id: &str,
    ) -> Result<bool, sqlx::Error> {
        self.grant_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(role_names
            .iter()
            .any(|r| self.grants.contains(&(r.clone(), permission_id.to_string()))))
    }
}
