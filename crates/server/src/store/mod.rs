//! Data access for the club.
//!
//! Handlers only ever talk to [`ClubStore`]. Every business rule that
//! touches money or slot conflicts lives in a database procedure; the store
//! just calls it by name and hands back the row it returns.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use shared_types::{
    AppError, Booking, BookingFilter, BookingStats, BookingView, CancelBookingResponse, ClubDay,
    Court, CourtBlock, CourtOccupancy, CourtRequest, CreateBlockRequest, CreateExceptionRequest,
    DailyStats, DateRange, Member, MemberRequest, NewBooking, Profile, RechargeOutcome,
    ScheduleException, TimeRange, Transaction, TransactionExportRow, UserRole, UserSummary,
    WalletRecharge,
};
use uuid::Uuid;

pub mod postgres;

pub use postgres::PgStore;

/// Fields needed to create a profile. `email` is already normalized.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

#[async_trait]
pub trait ClubStore: Send + Sync {
    // Health
    async fn ping(&self) -> Result<(), AppError>;

    // Profiles
    async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, AppError>;
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError>;
    /// One page of users with balances, plus the total match count.
    async fn list_users(
        &self,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<UserSummary>, i64), AppError>;
    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<Option<Profile>, AppError>;

    // Wallet
    async fn balance(&self, user_id: Uuid) -> Result<i64, AppError>;
    async fn transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>, AppError>;
    /// `wallet_recharge`. Idempotent per Stripe session id.
    async fn wallet_recharge(&self, recharge: &WalletRecharge) -> Result<RechargeOutcome, AppError>;
    async fn transactions_between(
        &self,
        range: DateRange,
    ) -> Result<Vec<TransactionExportRow>, AppError>;

    // Courts
    async fn list_courts(&self, include_inactive: bool) -> Result<Vec<Court>, AppError>;
    async fn find_court(&self, id: Uuid) -> Result<Option<Court>, AppError>;
    async fn create_court(&self, court: &CourtRequest) -> Result<Court, AppError>;
    async fn update_court(&self, id: Uuid, court: &CourtRequest) -> Result<Option<Court>, AppError>;

    // Court blocks
    async fn list_blocks(
        &self,
        court_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<CourtBlock>, AppError>;
    async fn create_block(
        &self,
        court_id: Uuid,
        block: &CreateBlockRequest,
    ) -> Result<CourtBlock, AppError>;
    async fn delete_block(&self, id: Uuid) -> Result<bool, AppError>;

    // Club schedule
    async fn club_schedule(&self) -> Result<Vec<ClubDay>, AppError>;
    async fn upsert_club_day(&self, day: &ClubDay) -> Result<ClubDay, AppError>;
    async fn exception_for(&self, date: NaiveDate) -> Result<Option<ScheduleException>, AppError>;
    /// Exceptions dated `from` or later, soonest first.
    async fn list_exceptions(&self, from: NaiveDate) -> Result<Vec<ScheduleException>, AppError>;
    async fn create_exception(
        &self,
        exception: &CreateExceptionRequest,
    ) -> Result<ScheduleException, AppError>;
    async fn delete_exception(&self, id: Uuid) -> Result<bool, AppError>;

    // Bookings
    /// Confirmed and completed bookings plus admin blocks on one court and date.
    async fn occupied_ranges(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeRange>, AppError>;
    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, AppError>;
    /// Confirmed bookings of `user_id` that start after `now` (club time).
    async fn count_active_bookings(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<i64, AppError>;
    async fn user_bookings(&self, user_id: Uuid) -> Result<Vec<BookingView>, AppError>;
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<BookingView>, AppError>;
    /// `booking_pay_deposit`.
    async fn booking_pay_deposit(&self, booking: &NewBooking) -> Result<Booking, AppError>;
    /// `booking_cancel`. `timezone` is the club's IANA zone.
    async fn booking_cancel(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        notice_hours: i32,
        timezone: &str,
    ) -> Result<CancelBookingResponse, AppError>;
    async fn admin_cancel_booking(
        &self,
        booking_id: Uuid,
        refund: bool,
        admin_id: Uuid,
    ) -> Result<CancelBookingResponse, AppError>;
    async fn admin_mark_noshow(
        &self,
        booking_id: Uuid,
        penalty_cents: i64,
        admin_id: Uuid,
    ) -> Result<Booking, AppError>;
    async fn admin_complete_booking(
        &self,
        booking_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Booking, AppError>;

    // Members
    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, AppError>;
    async fn create_member(
        &self,
        member: &MemberRequest,
        joined_on: NaiveDate,
    ) -> Result<Member, AppError>;
    async fn update_member(
        &self,
        id: Uuid,
        member: &MemberRequest,
    ) -> Result<Option<Member>, AppError>;
    async fn delete_member(&self, id: Uuid) -> Result<bool, AppError>;

    // Reporting
    async fn booking_stats(&self, range: DateRange) -> Result<BookingStats, AppError>;
    async fn daily_stats(&self, range: DateRange) -> Result<Vec<DailyStats>, AppError>;
    async fn court_occupancy(
        &self,
        range: DateRange,
        slots_per_day: i32,
    ) -> Result<Vec<CourtOccupancy>, AppError>;
}
