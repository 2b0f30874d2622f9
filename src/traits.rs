//! Store trait definitions for dependency injection
//!
//! The record stores and the session store are abstracted behind these
//! traits so handlers can be exercised without real storage.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::types::{Category, Page, SessionData, SessionId, User, UserProfile};

/// Category record store
#[mockall::automock]
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Add a new category. Fails if a category with the same slug exists.
    async fn add(&self, category: Category) -> AppResult<Category>;

    /// Look up a category by its slug.
    async fn by_slug(&self, slug: &str) -> AppResult<Option<Category>>;

    /// Count a visit to the category's page, returning the updated record.
    async fn record_view(&self, slug: &str) -> AppResult<Option<Category>>;

    /// The most-liked categories, best first.
    async fn top_by_likes(&self, limit: usize) -> AppResult<Vec<Category>>;
}

/// Page record store
#[mockall::automock]
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Add a page to a category; the store assigns the id.
    async fn add(&self, category_slug: &str, title: &str, url: &str) -> AppResult<Page>;

    /// Pages belonging to a category, most viewed first.
    async fn for_category(&self, category_slug: &str) -> AppResult<Vec<Page>>;

    /// The most-viewed pages across all categories, best first.
    async fn top_by_views(&self, limit: usize) -> AppResult<Vec<Page>>;

    /// Count a click-through and return the target URL, if the page exists.
    async fn record_click(&self, id: u64) -> AppResult<Option<String>>;
}

/// User account store
#[mockall::automock]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account and its profile together.
    /// Fails if the username is already taken.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        profile: UserProfile,
    ) -> AppResult<User>;

    /// Check credentials, returning the account on a match.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>>;

    /// Profile fields for a registered username.
    async fn profile_for(&self, username: &str) -> AppResult<Option<UserProfile>>;
}

/// Per-visitor session store
#[mockall::automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a fresh, empty session.
    async fn create(&self) -> AppResult<(SessionId, SessionData)>;

    /// Load a session. Returns `None` for unknown or expired ids.
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>>;

    /// Persist a session, refreshing its expiry.
    async fn save(&self, id: &SessionId, data: SessionData) -> AppResult<()>;

    /// Drop a session.
    async fn delete(&self, id: &SessionId) -> AppResult<()>;

    /// Remove expired sessions, returning how many were dropped.
    async fn cleanup_expired(&self) -> AppResult<usize>;

    /// Number of live sessions.
    async fn active_sessions(&self) -> usize;
}
