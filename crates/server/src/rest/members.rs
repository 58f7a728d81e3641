use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{AppError, Member, MemberRequest, MemberSearchParams, MessageResponse};
use uuid::Uuid;

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;
use crate::error_convert::ValidateRequest;

fn checked_member(body: MemberRequest) -> Result<MemberRequest, AppError> {
    let member = body.normalized();
    member.validate_request()?;
    Ok(member)
}

// ---------------------------------------------------------------------------
// GET /api/admin/members
// ---------------------------------------------------------------------------

/// Club members, optionally filtered by name, email or member number.
#[utoipa::path(
    get,
    path = "/api/admin/members",
    params(MemberSearchParams),
    responses(
        (status = 200, description = "Members", body = Vec<Member>),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "members"
)]
pub async fn list_members(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<Vec<Member>>, AppError> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    Ok(Json(state.store.list_members(search).await?))
}

// ---------------------------------------------------------------------------
// POST /api/admin/members
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/members",
    request_body = MemberRequest,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Validation failed", body = AppError),
        (status = 409, description = "Member number already in use", body = AppError)
    ),
    tag = "members"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create_member(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<MemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let member = checked_member(body)?;
    let created = state
        .store
        .create_member(&member, state.settings.local_today())
        .await?;
    tracing::info!(member_id = %created.id, number = %created.member_number, "Member created");
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// PUT /api/admin/members/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    put,
    path = "/api/admin/members/{id}",
    params(("id" = Uuid, Path, description = "Member UUID")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member updated", body = Member),
        (status = 400, description = "Validation failed", body = AppError),
        (status = 404, description = "Member not found", body = AppError),
        (status = 409, description = "Member number already in use", body = AppError)
    ),
    tag = "members"
)]
pub async fn update_member(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<MemberRequest>,
) -> Result<Json<Member>, AppError> {
    let member = checked_member(body)?;
    state
        .store
        .update_member(id, &member)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Member not found"))
}

// ---------------------------------------------------------------------------
// DELETE /api/admin/members/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/admin/members/{id}",
    params(("id" = Uuid, Path, description = "Member UUID")),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 404, description = "Member not found", body = AppError)
    ),
    tag = "members"
)]
pub async fn delete_member(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_member(id).await? {
        return Err(AppError::not_found("Member not found"));
    }
    Ok(Json(MessageResponse::new("Member deleted")))
}
