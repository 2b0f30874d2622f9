//! HTTP-level tests for the session-backed visit counter

mod common;

use axum::http::{StatusCode, header};
use chrono::{Duration, Local};
use tower::ServiceExt;

use common::helpers::{
    body_string, get, get_with_cookie, session_cookie, test_app, test_app_with_stores,
};
use linkboard::core::visits::{LAST_VISIT_KEY, VISITS_KEY, format_timestamp};
use linkboard::{
    RealCategoryStore, RealPageStore, RealSessionStore, RealUserStore, SessionStore,
};

#[tokio::test]
async fn test_landing_page_issues_cookie_and_counts_first_visit() {
    let router = test_app().build_router();

    let response = router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response).expect("first visit should set the session cookie");
    assert!(cookie.starts_with("sessionid="));

    let body = body_string(response).await;
    assert!(body.contains("Visits: 1"));
}

#[tokio::test]
async fn test_revisit_same_day_does_not_increment() {
    let router = test_app().build_router();

    let first = router.clone().oneshot(get("/")).await.unwrap();
    let cookie = session_cookie(&first).unwrap();

    let second = router
        .clone()
        .oneshot(get_with_cookie("/", &cookie))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert!(
        second.headers().get(header::SET_COOKIE).is_none(),
        "an existing session should not be re-issued"
    );
    assert!(body_string(second).await.contains("Visits: 1"));
}

#[tokio::test]
async fn test_about_page_shares_the_counter() {
    let router = test_app().build_router();

    let first = router.clone().oneshot(get("/")).await.unwrap();
    let cookie = session_cookie(&first).unwrap();

    let about = router
        .clone()
        .oneshot(get_with_cookie("/about", &cookie))
        .await
        .unwrap();
    assert_eq!(about.status(), StatusCode::OK);
    assert!(body_string(about).await.contains("on 1 separate day"));
}

#[tokio::test]
async fn test_visit_two_days_later_increments() {
    let sessions = RealSessionStore::new(Duration::hours(1));
    let router = test_app_with_stores(
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        sessions.clone(),
    )
    .build_router();

    let (id, mut data) = sessions.create().await.unwrap();
    data.set(VISITS_KEY, "3".to_string());
    data.set(
        LAST_VISIT_KEY,
        format_timestamp(Local::now().naive_local() - Duration::days(2)),
    );
    sessions.save(&id, data).await.unwrap();

    let response = router
        .oneshot(get_with_cookie("/", &format!("sessionid={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Visits: 4"));
}

#[tokio::test]
async fn test_visit_one_hour_later_keeps_count_and_timestamp() {
    let sessions = RealSessionStore::new(Duration::hours(2));
    let router = test_app_with_stores(
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        sessions.clone(),
    )
    .build_router();

    let an_hour_ago = format_timestamp(Local::now().naive_local() - Duration::hours(1));
    let (id, mut data) = sessions.create().await.unwrap();
    data.set(VISITS_KEY, "3".to_string());
    data.set(LAST_VISIT_KEY, an_hour_ago.clone());
    sessions.save(&id, data).await.unwrap();

    let response = router
        .oneshot(get_with_cookie("/", &format!("sessionid={id}")))
        .await
        .unwrap();
    assert!(body_string(response).await.contains("Visits: 3"));

    let stored = sessions.load(&id).await.unwrap().unwrap();
    assert_eq!(stored.get(LAST_VISIT_KEY), Some(an_hour_ago.as_str()));
}

#[tokio::test]
async fn test_malformed_stored_timestamp_is_a_server_error() {
    let sessions = RealSessionStore::new(Duration::hours(1));
    let router = test_app_with_stores(
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        sessions.clone(),
    )
    .build_router();

    let (id, mut data) = sessions.create().await.unwrap();
    data.set(LAST_VISIT_KEY, "not a timestamp".to_string());
    sessions.save(&id, data).await.unwrap();

    let response = router
        .oneshot(get_with_cookie("/", &format!("sessionid={id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_expired_session_restarts_the_counter() {
    let sessions = RealSessionStore::new(Duration::seconds(-1));
    let router = test_app_with_stores(
        RealCategoryStore::new(),
        RealPageStore::new(),
        RealUserStore::new(),
        sessions.clone(),
    )
    .build_router();

    let (id, mut data) = sessions.create().await.unwrap();
    data.set(VISITS_KEY, "7".to_string());
    data.set(
        LAST_VISIT_KEY,
        format_timestamp(Local::now().naive_local()),
    );
    sessions.save(&id, data).await.unwrap();

    let response = router
        .oneshot(get_with_cookie("/", &format!("sessionid={id}")))
        .await
        .unwrap();

    // the stale cookie is replaced and the count starts over
    assert!(session_cookie(&response).is_some());
    assert!(body_string(response).await.contains("Visits: 1"));
}
