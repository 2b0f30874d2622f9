//! Linkboard: a categorized link directory web application
//!
//! Visitors browse categories of contributed link pages; registered users
//! add their own. A session cookie backs a day-granularity visit counter
//! on the landing and about pages.

pub mod app;
pub mod core;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use app::App;
pub use error::{AppError, AppResult};
pub use state::AppState;
pub use types::{Category, Page, SessionData, SessionId, User, UserProfile};

// Re-export trait definitions
pub use traits::{CategoryStore, PageStore, SessionStore, UserStore};

// Re-export store implementations
pub use services::{RealCategoryStore, RealPageStore, RealSessionStore, RealUserStore};
