//! Cookie plumbing between requests and the session store
//!
//! Handlers resolve a session up front, mutate it, save it back, and
//! attach the cookie to the response when the id was freshly issued.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;

use crate::error::AppResult;
use crate::traits::SessionStore;
use crate::types::{SessionData, SessionId};

pub const SESSION_COOKIE: &str = "sessionid";

/// A session resolved for the current request.
#[derive(Debug)]
pub struct RequestSession {
    pub id: SessionId,
    pub data: SessionData,
    /// Whether the id is new and the cookie still has to reach the browser.
    pub issued: bool,
}

/// Pull the session id out of the request's Cookie header(s).
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| SessionId(value.trim().to_string()))
        })
}

/// Resolve the request's session, creating a fresh one when the cookie is
/// absent, unknown, or expired.
pub async fn open_session<S>(store: &S, headers: &HeaderMap) -> AppResult<RequestSession>
where
    S: SessionStore,
{
    if let Some(id) = session_id_from_headers(headers) {
        if let Some(data) = store.load(&id).await? {
            return Ok(RequestSession {
                id,
                data,
                issued: false,
            });
        }
    }

    let (id, data) = store.create().await?;
    Ok(RequestSession {
        id,
        data,
        issued: true,
    })
}

/// Attach the Set-Cookie header when the session was freshly issued.
pub fn attach_cookie(mut response: Response, session: &RequestSession) -> Response {
    if session.issued {
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly", session.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
