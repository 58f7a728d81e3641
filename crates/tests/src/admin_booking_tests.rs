use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::{self, get, id_of, post_json, EVENING_SLOT};

#[tokio::test]
async fn admin_can_book_without_a_deposit() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, _) = app.customer("walkin@example.com").await;

    let (status, body) = post_json(
        &app,
        "/api/admin/bookings/create",
        Some(&admin),
        json!({
            "user_id": player.id,
            "court_id": court,
            "date": app.booking_day(),
            "start_time": EVENING_SLOT,
            "charge_deposit": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["deposit_cents"], 0);
    assert!(app.store.transaction_kinds(player.id).is_empty());
}

#[tokio::test]
async fn admin_booking_charges_by_default() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, _) = app.customer("p@example.com").await;

    let body = json!({
        "user_id": player.id,
        "court_id": court,
        "date": app.booking_day(),
        "start_time": EVENING_SLOT
    });
    let (status, res) = post_json(&app, "/api/admin/bookings/create", Some(&admin), body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["message"], "Insufficient balance");

    app.fund(player.id, 500).await;
    let (status, res) = post_json(&app, "/api/admin/bookings/create", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["deposit_cents"], 500);

    let (status, res) = post_json(
        &app,
        "/api/admin/bookings/create",
        Some(&admin),
        json!({
            "user_id": Uuid::new_v4(),
            "court_id": court,
            "date": app.booking_day(),
            "start_time": "09:00"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res["message"], "User not found");
}

#[tokio::test]
async fn listing_filters_by_range_and_status() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, token) = app.customer("p@example.com").await;
    app.fund(player.id, 5_000).await;
    app.book(&token, court, "09:00").await;
    let (_, cancelled) = app.book(&token, court, EVENING_SLOT).await;
    post_json(
        &app,
        "/api/bookings/cancel",
        Some(&token),
        json!({ "booking_id": id_of(&cancelled) }),
    )
    .await;

    let day = app.booking_day();
    let (status, body) = get(&app, &format!("/api/admin/bookings?from={day}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["start_time"], "09:00");

    let (_, body) = get(
        &app,
        &format!("/api/admin/bookings?from={day}&to={day}&status=cancelled"),
        Some(&admin),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Default range is today only.
    let (_, body) = get(&app, "/api/admin/bookings", Some(&admin)).await;
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/api/admin/bookings?status=gone", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid status 'gone'. Valid values: confirmed, cancelled, completed, no_show"
    );
}

#[tokio::test]
async fn club_cancellation_refunds_unless_told_not_to() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, token) = app.customer("p@example.com").await;
    app.fund(player.id, 1_000).await;
    let (_, first) = app.book(&token, court, "09:00").await;
    let (_, second) = app.book(&token, court, EVENING_SLOT).await;

    let (status, body) = post_json(
        &app,
        "/api/admin/bookings/cancel",
        Some(&admin),
        json!({ "booking_id": id_of(&first) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refunded_cents"], 500);

    let (_, body) = post_json(
        &app,
        "/api/admin/bookings/cancel",
        Some(&admin),
        json!({ "booking_id": id_of(&second), "refund_deposit": false }),
    )
    .await;
    assert_eq!(body["refunded_cents"], 0);

    let (_, wallet) = get(&app, "/api/wallet", Some(&token)).await;
    assert_eq!(wallet["balance_cents"], 500);
    assert_eq!(wallet["transactions"][0]["kind"], "refund");
    assert_eq!(wallet["transactions"][0]["description"], "Deposit refund (club cancellation)");
}

#[tokio::test]
async fn noshow_charges_the_configured_penalty() {
    let mut config = common::test_config();
    config.booking.noshow_penalty_cents = 300;
    let app = common::test_app_with(config);
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, token) = app.customer("p@example.com").await;
    app.fund(player.id, 500).await;
    let (_, booking) = app.book(&token, court, EVENING_SLOT).await;

    let (status, body) = post_json(
        &app,
        "/api/admin/bookings/noshow",
        Some(&admin),
        json!({ "booking_id": id_of(&booking) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "no_show");

    // The penalty may push the wallet below zero.
    let (_, wallet) = get(&app, "/api/wallet", Some(&token)).await;
    assert_eq!(wallet["balance_cents"], -300);
    assert_eq!(wallet["transactions"][0]["kind"], "penalty");
}

#[tokio::test]
async fn only_confirmed_bookings_can_be_completed() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let court = app.court(&admin, "Pista 1").await;
    let (player, token) = app.customer("p@example.com").await;
    app.fund(player.id, 500).await;
    let (_, booking) = app.book(&token, court, EVENING_SLOT).await;
    let body = json!({ "booking_id": id_of(&booking) });

    let (status, res) = post_json(&app, "/api/admin/bookings/complete", Some(&admin), body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["status"], "completed");

    let (status, res) = post_json(&app, "/api/admin/bookings/complete", Some(&admin), body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["message"], "Only confirmed bookings can be completed");

    let (status, res) = post_json(&app, "/api/admin/bookings/noshow", Some(&admin), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["message"], "Only confirmed bookings can be marked as no-show");

    let (status, _) = post_json(
        &app,
        "/api/admin/bookings/complete",
        Some(&admin),
        json!({ "booking_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
