//! Request handlers

pub mod auth;
pub mod pages;

use tera::Context;

use crate::types::SessionData;

/// Session key holding the logged-in username. Written only by the auth
/// handlers; everything else just reads it.
pub const USER_KEY: &str = "user";

/// Username bound to the session by a successful login.
pub(crate) fn logged_in_user(data: &SessionData) -> Option<String> {
    data.get(USER_KEY).map(str::to_owned)
}

/// Context pre-loaded with the fields the base template expects.
pub(crate) fn base_context(data: &SessionData) -> Context {
    let mut context = Context::new();
    context.insert("user", &logged_in_user(data));
    context
}
