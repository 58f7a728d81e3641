use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use shared_types::RateRule;

use crate::common::{self, get, post_json, TestApp};

fn limited_logins(max: u32) -> TestApp {
    let mut config = common::test_config();
    config.rate_limits.login = RateRule::new(max, 60);
    common::test_app_with(config)
}

fn bad_login() -> serde_json::Value {
    json!({ "email": "nobody@example.com", "password": "wrong" })
}

#[tokio::test]
async fn login_attempts_are_capped() {
    let app = limited_logins(2);

    for _ in 0..2 {
        let (status, _) = post_json(&app, "/api/auth/login", None, bad_login()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = post_json(&app, "/api/auth/login", None, bad_login()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["kind"], "RateLimited");
}

#[tokio::test]
async fn rejection_carries_retry_after() {
    let app = limited_logins(1);
    post_json(&app, "/api/auth/login", None, bad_login()).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(bad_login().to_string()))
        .unwrap();
    let (status, headers, _) = common::send_raw(&app, req).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let retry: u64 = headers["retry-after"].to_str().unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry));
}

#[tokio::test]
async fn clients_are_counted_separately() {
    let app = limited_logins(1);

    let login_from = |ip: &'static str| {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(bad_login().to_string()))
            .unwrap()
    };

    let (status, _, _) = common::send_raw(&app, login_from("203.0.113.1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = common::send_raw(&app, login_from("203.0.113.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _, _) = common::send_raw(&app, login_from("203.0.113.2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_route_groups_keep_their_budget() {
    let app = limited_logins(1);
    post_json(&app, "/api/auth/login", None, bad_login()).await;
    let (status, _) = post_json(&app, "/api/auth/login", None, bad_login()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = get(&app, "/api/courts", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, admin) = app.admin().await;
    let (status, _) = get(&app, "/api/admin/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}
