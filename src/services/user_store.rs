//! User account store implementation

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::traits::UserStore;
use crate::types::{User, UserProfile};

/// Account plus its profile, created together at registration.
#[derive(Clone)]
struct Account {
    user: User,
    profile: UserProfile,
}

/// In-memory user store keyed by username.
#[derive(Clone, Default)]
pub struct RealUserStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl RealUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait::async_trait]
impl UserStore for RealUserStore {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> AppResult<User> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(AppError::DuplicateUser {
                username: username.to_string(),
            });
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: digest_password(password),
        };

        info!(username, "user registered");
        accounts.insert(
            username.to_string(),
            Account {
                user: user.clone(),
                profile,
            },
        );
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let accounts = self.accounts.read().await;
        let matched = accounts
            .get(username)
            .filter(|account| account.user.password_hash == digest_password(password))
            .map(|account| account.user.clone());
        Ok(matched)
    }

    async fn profile_for(&self, username: &str) -> AppResult<Option<UserProfile>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).map(|account| account.profile.clone()))
    }
}
