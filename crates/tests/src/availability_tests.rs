use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use crate::common::{self, get, TestApp, EVENING_SLOT};

fn starts(body: &Value) -> Vec<String> {
    body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start_time"].as_str().unwrap().to_string())
        .collect()
}

async fn availability(app: &TestApp, court_id: Uuid, date: chrono::NaiveDate) -> (StatusCode, Value) {
    get(
        app,
        &format!("/api/bookings/availability?court_id={court_id}&date={date}"),
        None,
    )
    .await
}

#[tokio::test]
async fn open_day_lists_every_configured_slot() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;

    let (status, body) = availability(&app, court, app.booking_day()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        starts(&body),
        vec!["09:00", "10:30", "12:00", "13:30", "15:00", "16:30", "18:00", "19:30", "21:00"]
    );
    assert_eq!(body["slots"][0]["end_time"], "10:30");
}

#[tokio::test]
async fn booked_slot_disappears() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, token) = app.customer("p@example.com").await;
    app.fund(player.id, 2_000).await;

    let (status, _) = app.book(&token, court, EVENING_SLOT).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = availability(&app, court, app.booking_day()).await;
    let free = starts(&body);
    assert_eq!(free.len(), 8);
    assert!(!free.contains(&EVENING_SLOT.to_string()));
}

#[tokio::test]
async fn past_dates_have_no_slots() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;

    let (status, body) = availability(&app, court, app.today() - Duration::days(1)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(starts(&body).is_empty());
}

#[tokio::test]
async fn unknown_court_is_not_found() {
    let app = common::test_app();
    let (status, body) = availability(&app, Uuid::new_v4(), app.booking_day()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Court not found");
}
