//! Test helper utilities for router-level integration tests

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{Request, Response, header};

use linkboard::{
    App, AppState, RealCategoryStore, RealPageStore, RealSessionStore, RealUserStore,
};

pub type TestApp = App<RealCategoryStore, RealPageStore, RealUserStore, RealSessionStore>;

/// Application state pointing at the real template and static directories.
pub fn test_state() -> AppState {
    let bind_address: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let templates_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
    AppState::new(bind_address, templates_dir, static_dir).expect("templates should compile")
}

/// An app over fresh, empty stores.
pub fn test_app() -> TestApp {
    test_app_with_stores(
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        RealSessionStore::new(chrono::Duration::hours(1)),
    )
}

/// An app over caller-provided stores, letting tests keep handles for
/// seeding and inspection.
pub fn test_app_with_stores(
    category_store: RealCategoryStore,
    page_store: RealPageStore,
    user_store: RealUserStore,
    session_store: RealSessionStore,
) -> TestApp {
    App::new(
        test_state(),
        category_store,
        page_store,
        user_store,
        session_store,
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form_with_cookie(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `sessionid=...` pair from a Set-Cookie header, ready to send back.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let pair = set_cookie.to_str().ok()?.split(';').next()?;
    Some(pair.trim().to_string())
}

/// The Location header of a redirect response.
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
