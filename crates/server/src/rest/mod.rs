pub mod admin_bookings;
pub mod admin_users;
pub mod auth;
pub mod bookings;
pub mod courts;
pub mod export;
pub mod members;
pub mod schedule;
pub mod stats;
pub mod wallet;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::db::AppState;
use crate::rate_limit::{limit_admin, limit_booking, limit_checkout, limit_login, limit_webhook};
use crate::stripe::webhooks;

/// Build the combined REST API router. Each group carries its own rate limit.
pub fn api_router(state: &AppState) -> Router<AppState> {
    let limits = state.rate_limits.clone();

    let public = Router::new()
        .route("/api/courts", get(courts::list_courts))
        .route("/api/club/schedule", get(schedule::get_schedule))
        .route("/api/bookings/availability", get(bookings::availability))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/bookings/mine", get(bookings::my_bookings))
        .route("/api/wallet", get(wallet::get_wallet));

    let login = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(limits.clone(), limit_login));

    let booking = Router::new()
        .route("/api/bookings/create", post(bookings::create_booking))
        .route("/api/bookings/cancel", post(bookings::cancel_booking))
        .route_layer(middleware::from_fn_with_state(limits.clone(), limit_booking));

    let checkout = Router::new()
        .route("/api/stripe/checkout", post(wallet::create_checkout))
        .route_layer(middleware::from_fn_with_state(limits.clone(), limit_checkout));

    let webhook = Router::new()
        .route("/api/stripe/webhook", post(webhooks::handle_stripe_webhook))
        .route_layer(middleware::from_fn_with_state(limits.clone(), limit_webhook));

    let admin = Router::new()
        // Users & wallet
        .route("/api/admin/users", get(admin_users::list_users))
        .route("/api/admin/users/{id}/role", patch(admin_users::update_role))
        .route("/api/admin/wallet/recharge", post(admin_users::admin_recharge))
        // Bookings
        .route("/api/admin/bookings", get(admin_bookings::list_bookings))
        .route("/api/admin/bookings/create", post(admin_bookings::create_booking))
        .route("/api/admin/bookings/cancel", post(admin_bookings::cancel_booking))
        .route("/api/admin/bookings/noshow", post(admin_bookings::mark_noshow))
        .route("/api/admin/bookings/complete", post(admin_bookings::complete_booking))
        // Courts & blocks
        .route("/api/admin/courts", get(courts::admin_list_courts).post(courts::create_court))
        .route("/api/admin/courts/{id}", put(courts::update_court))
        .route("/api/admin/courts/{id}/blocks", get(courts::list_blocks).post(courts::create_block))
        .route("/api/admin/blocks/{id}", delete(courts::delete_block))
        // Schedule
        .route("/api/admin/schedule", put(schedule::update_weekday))
        .route("/api/admin/schedule/exceptions", post(schedule::create_exception))
        .route("/api/admin/schedule/exceptions/{id}", delete(schedule::delete_exception))
        // Members
        .route("/api/admin/members", get(members::list_members).post(members::create_member))
        .route("/api/admin/members/{id}", put(members::update_member).delete(members::delete_member))
        // Reporting
        .route("/api/admin/stats", get(stats::booking_stats))
        .route("/api/admin/stats/daily", get(stats::daily_stats))
        .route("/api/admin/stats/courts", get(stats::court_occupancy))
        .route("/api/admin/export/bookings", get(export::export_bookings))
        .route("/api/admin/export/transactions", get(export::export_transactions))
        .route("/api/admin/export/users", get(export::export_users))
        .route_layer(middleware::from_fn_with_state(limits, limit_admin));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(booking)
        .merge(checkout)
        .merge(webhook)
        .merge(admin)
}
