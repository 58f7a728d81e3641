use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::common::{self, delete, get, id_of, post_json, put_json};

#[tokio::test]
async fn members_can_be_created_and_searched() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;

    let (status, body) = post_json(
        &app,
        "/api/admin/members",
        Some(&admin),
        json!({
            "full_name": "  Lucia Fernandez ",
            "email": "Lucia@Example.com",
            "member_number": "M-001",
            "notes": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["full_name"], "Lucia Fernandez");
    assert_eq!(body["email"], "lucia@example.com");
    assert_eq!(body["notes"], serde_json::Value::Null);
    assert_eq!(body["is_active"], true);
    assert_eq!(body["joined_on"], app.today().to_string());

    post_json(
        &app,
        "/api/admin/members",
        Some(&admin),
        json!({ "full_name": "Bruno Diaz", "member_number": "M-002" }),
    )
    .await;

    let (_, all) = get(&app, "/api/admin/members", Some(&admin)).await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bruno Diaz", "Lucia Fernandez"]);

    let (_, found) = get(&app, "/api/admin/members?search=m-002", Some(&admin)).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["full_name"], "Bruno Diaz");
}

#[tokio::test]
async fn member_numbers_are_unique() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let member = json!({ "full_name": "Ana", "member_number": "M-100" });

    let (status, _) = post_json(&app, "/api/admin/members", Some(&admin), member.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&app, "/api/admin/members", Some(&admin), member).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This member number is already in use");
}

#[tokio::test]
async fn member_input_is_validated() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;

    let (status, body) = post_json(
        &app,
        "/api/admin/members",
        Some(&admin),
        json!({ "full_name": "Ana", "member_number": "M-1", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationError");

    let (status, _) = post_json(
        &app,
        "/api/admin/members",
        Some(&admin),
        json!({ "full_name": "   ", "member_number": "M-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn members_can_be_updated_and_deleted() {
    let app = common::test_app();
    let (_, admin) = app.admin().await;
    let (_, created) = post_json(
        &app,
        "/api/admin/members",
        Some(&admin),
        json!({ "full_name": "Ana", "member_number": "M-1" }),
    )
    .await;
    let uri = format!("/api/admin/members/{}", id_of(&created));

    let (status, body) = put_json(
        &app,
        &uri,
        Some(&admin),
        json!({ "full_name": "Ana Ruiz", "member_number": "M-1", "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Ana Ruiz");
    assert_eq!(body["is_active"], false);

    let (status, body) = delete(&app, &uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Member deleted");

    let (status, _) = delete(&app, &uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = put_json(
        &app,
        &format!("/api/admin/members/{}", Uuid::new_v4()),
        Some(&admin),
        json!({ "full_name": "Ghost", "member_number": "M-9" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member not found");
}

#[tokio::test]
async fn members_are_admin_only() {
    let app = common::test_app();
    let (_, customer) = app.customer("p@example.com").await;
    let (status, _) = get(&app, "/api/admin/members", Some(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
