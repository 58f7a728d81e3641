use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use shared_types::{
    // Auth & profile types
    AppError, AppErrorKind, AuthResponse, LoginRequest, MeResponse, MessageResponse,
    PaginationMeta, ProfileResponse, RegisterRequest, UpdateRoleRequest, UserRole, UserSummary,
    // Booking types
    AdminCancelBookingRequest, AdminCreateBookingRequest, AvailabilityResponse, Booking,
    BookingActionRequest, BookingStatus, BookingView, CancelBookingRequest, CancelBookingResponse,
    CreateBookingRequest, TimeRange,
    // Wallet types
    AdminRechargeRequest, AdminRechargeResponse, CheckoutRequest, CheckoutResponse, Transaction,
    TransactionKind, WalletResponse,
    // Court & schedule types
    ClubDay, ClubScheduleResponse, Court, CourtBlock, CourtRequest, CreateBlockRequest,
    CreateExceptionRequest, ScheduleException,
    // Member types
    Member, MemberRequest,
    // Stats types
    BookingStats, CourtOccupancy, DailyStats,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::middleware::auth_middleware;
use crate::db::AppState;
use crate::headers::security_headers;
use crate::health::{self, HealthResponse};
use crate::rest;
use crate::stripe::webhooks;
use crate::telemetry::OtelTraceLayer;

/// Default request body cap; JSON bodies here are small.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Padel Club API",
        description = "Court bookings, prepaid wallet and back-office for a padel club"
    ),
    paths(
        health::health_check,
        // Auth
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::me,
        // Courts & schedule (public)
        rest::courts::list_courts,
        rest::schedule::get_schedule,
        // Bookings
        rest::bookings::availability,
        rest::bookings::create_booking,
        rest::bookings::cancel_booking,
        rest::bookings::my_bookings,
        // Wallet
        rest::wallet::get_wallet,
        rest::wallet::create_checkout,
        webhooks::handle_stripe_webhook,
        // Admin: users & wallet
        rest::admin_users::list_users,
        rest::admin_users::update_role,
        rest::admin_users::admin_recharge,
        // Admin: bookings
        rest::admin_bookings::list_bookings,
        rest::admin_bookings::create_booking,
        rest::admin_bookings::cancel_booking,
        rest::admin_bookings::mark_noshow,
        rest::admin_bookings::complete_booking,
        // Admin: courts & blocks
        rest::courts::admin_list_courts,
        rest::courts::create_court,
        rest::courts::update_court,
        rest::courts::list_blocks,
        rest::courts::create_block,
        rest::courts::delete_block,
        // Admin: schedule
        rest::schedule::update_weekday,
        rest::schedule::create_exception,
        rest::schedule::delete_exception,
        // Admin: members
        rest::members::list_members,
        rest::members::create_member,
        rest::members::update_member,
        rest::members::delete_member,
        // Admin: reporting
        rest::stats::booking_stats,
        rest::stats::daily_stats,
        rest::stats::court_occupancy,
        rest::export::export_bookings,
        rest::export::export_transactions,
        rest::export::export_users,
    ),
    components(schemas(
        HealthResponse, AppError, AppErrorKind, MessageResponse, PaginationMeta,
        // Auth & profile schemas
        RegisterRequest, LoginRequest, AuthResponse, MeResponse, ProfileResponse, UserRole,
        UserSummary, UpdateRoleRequest,
        // Booking schemas
        TimeRange, AvailabilityResponse, Booking, BookingView, BookingStatus,
        CreateBookingRequest, CancelBookingRequest, CancelBookingResponse,
        AdminCreateBookingRequest, AdminCancelBookingRequest, BookingActionRequest,
        // Wallet schemas
        Transaction, TransactionKind, WalletResponse, CheckoutRequest, CheckoutResponse,
        AdminRechargeRequest, AdminRechargeResponse,
        // Court & schedule schemas
        Court, CourtRequest, CourtBlock, CreateBlockRequest, ClubDay, ScheduleException,
        CreateExceptionRequest, ClubScheduleResponse,
        // Member schemas
        Member, MemberRequest,
        // Stats schemas
        BookingStats, DailyStats, CourtOccupancy,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and sessions"),
        (name = "courts", description = "Courts and admin blocks"),
        (name = "schedule", description = "Club opening hours"),
        (name = "bookings", description = "Customer bookings"),
        (name = "wallet", description = "Prepaid wallet and Stripe top-ups"),
        (name = "admin", description = "Back-office users and bookings"),
        (name = "members", description = "Club membership register"),
        (name = "stats", description = "Reporting"),
        (name = "export", description = "CSV exports")
    )
)]
pub struct ApiDoc;

/// Build the full application: API routes, `/health`, `/docs` and the
/// cross-cutting layers.
///
/// Layer order, innermost first: OTel span (when enabled), session
/// middleware, body limit, security headers, request id.
pub fn app_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(rest::api_router(&state))
        .route("/health", get(health::health_check));

    if state.settings.app.features.telemetry {
        router = router.layer(OtelTraceLayer);
    }

    let max_body: usize = std::env::var("MAX_BODY_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    router
        .layer(middleware::from_fn_with_state(
            state.settings.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(middleware::from_fn(security_headers))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
        .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
            tower_http::request_id::MakeRequestUuid,
        ))
}
