//! Data types for the link directory
//!
//! Record types held by the stores, plus the session primitives shared
//! between the web layer and the visit tracker.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::slug::slugify;

/// A named grouping of link pages, addressed by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub views: u32,
    pub likes: u32,
}

impl Category {
    /// Create a fresh category with a slug derived from its name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            views: 0,
            likes: 0,
        }
    }
}

/// A contributed link inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub category_slug: String,
    pub title: String,
    pub url: String,
    pub views: u32,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Additional per-user fields, created alongside the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub website: Option<String>,
    pub picture: Option<String>,
}

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-visitor key/value state with an expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    data: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            data: HashMap::new(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.data.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    /// Push the expiry forward, keeping an active visitor's session alive.
    pub fn extend(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }
}
