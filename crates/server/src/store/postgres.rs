use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use shared_types::{
    AppError, Booking, BookingFilter, BookingStats, BookingView, CancelBookingResponse, ClubDay,
    Court, CourtBlock, CourtOccupancy, CourtRequest, CreateBlockRequest, CreateExceptionRequest,
    DailyStats, DateRange, Member, MemberRequest, NewBooking, Profile, RechargeOutcome,
    ScheduleException, TimeRange, Transaction, TransactionExportRow, UserRole, UserSummary,
    WalletRecharge,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{ClubStore, NewProfile};
use crate::error_convert::SqlxErrorExt;

const PROFILE_COLUMNS: &str = "id, email, full_name, phone, role, password_hash, created_at";

const USER_SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.email, p.full_name, p.phone, p.role,
           COALESCE((SELECT SUM(t.amount_cents) FROM transactions t WHERE t.user_id = p.id), 0)::BIGINT
               AS balance_cents,
           p.created_at
    FROM profiles p
"#;

const BOOKING_VIEW_SELECT: &str = r#"
    SELECT b.id, b.user_id, p.email AS user_email, p.full_name AS user_full_name,
           b.court_id, c.name AS court_name, b.booking_date, b.start_time, b.end_time,
           b.status, b.deposit_cents, b.created_at, b.cancelled_at
    FROM bookings b
    JOIN profiles p ON p.id = b.user_id
    JOIN courts c ON c.id = b.court_id
"#;

const MEMBER_COLUMNS: &str =
    "id, full_name, email, phone, member_number, is_active, joined_on, notes, created_at";

/// [`ClubStore`] backed by PostgreSQL and the procedures in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// `%term%` for ILIKE, or `None` for an empty search.
fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")))
}

#[async_trait]
impl ClubStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------

    async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, AppError> {
        let sql = format!(
            "INSERT INTO profiles (email, full_name, phone, role, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(&profile.email)
            .bind(&profile.full_name)
            .bind(&profile.phone)
            .bind(profile.role.as_str())
            .bind(&profile.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = $1");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn list_users(
        &self,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<UserSummary>, i64), AppError> {
        let pattern = like_pattern(search);
        let offset = (page - 1) * limit;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM profiles p \
             WHERE $1::TEXT IS NULL OR p.email ILIKE $1 OR p.full_name ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.pool);

        let sql = format!(
            "{USER_SUMMARY_SELECT} \
             WHERE $1::TEXT IS NULL OR p.email ILIKE $1 OR p.full_name ILIKE $1 \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, UserSummary>(&sql)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool);

        let (total, rows) =
            tokio::try_join!(total, rows).map_err(SqlxErrorExt::into_app_error)?;
        Ok((rows, total))
    }

    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let sql = format!("{USER_SUMMARY_SELECT} ORDER BY p.created_at");
        sqlx::query_as::<_, UserSummary>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<Option<Profile>, AppError> {
        let sql = format!("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {PROFILE_COLUMNS}");
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    // -----------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------

    async fn balance(&self, user_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT wallet_balance($1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount_cents, kind, description, booking_id,
                   stripe_session_id, created_by, created_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn wallet_recharge(&self, recharge: &WalletRecharge) -> Result<RechargeOutcome, AppError> {
        let (applied, balance_cents) = sqlx::query_as::<_, (bool, i64)>(
            "SELECT applied, balance_cents FROM wallet_recharge($1, $2, $3, $4, $5, $6)",
        )
        .bind(recharge.user_id)
        .bind(recharge.amount_cents)
        .bind(&recharge.source)
        .bind(&recharge.stripe_session_id)
        .bind(recharge.created_by)
        .bind(&recharge.description)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

        Ok(if applied {
            RechargeOutcome::Applied { balance_cents }
        } else {
            RechargeOutcome::Duplicate
        })
    }

    async fn transactions_between(
        &self,
        range: DateRange,
    ) -> Result<Vec<TransactionExportRow>, AppError> {
        sqlx::query_as::<_, TransactionExportRow>(
            r#"
            SELECT t.id, p.email AS user_email, t.amount_cents, t.kind, t.description,
                   t.booking_id, t.stripe_session_id, t.created_at
            FROM transactions t
            JOIN profiles p ON p.id = t.user_id
            WHERE t.created_at::date BETWEEN $1 AND $2
            ORDER BY t.created_at
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    // -----------------------------------------------------------------
    // Courts
    // -----------------------------------------------------------------

    async fn list_courts(&self, include_inactive: bool) -> Result<Vec<Court>, AppError> {
        sqlx::query_as::<_, Court>(
            r#"
            SELECT id, name, surface, is_active, sort_order, created_at
            FROM courts
            WHERE $1 OR is_active
            ORDER BY sort_order, name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn find_court(&self, id: Uuid) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>(
            "SELECT id, name, surface, is_active, sort_order, created_at FROM courts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn create_court(&self, court: &CourtRequest) -> Result<Court, AppError> {
        sqlx::query_as::<_, Court>(
            r#"
            INSERT INTO courts (name, surface, is_active, sort_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, surface, is_active, sort_order, created_at
            "#,
        )
        .bind(&court.name)
        .bind(&court.surface)
        .bind(court.is_active)
        .bind(court.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn update_court(&self, id: Uuid, court: &CourtRequest) -> Result<Option<Court>, AppError> {
        sqlx::query_as::<_, Court>(
            r#"
            UPDATE courts
            SET name = $2, surface = $3, is_active = $4, sort_order = $5
            WHERE id = $1
            RETURNING id, name, surface, is_active, sort_order, created_at
            "#,
        )
        .bind(id)
        .bind(&court.name)
        .bind(&court.surface)
        .bind(court.is_active)
        .bind(court.sort_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    // -----------------------------------------------------------------
    // Court blocks
    // -----------------------------------------------------------------

    async fn list_blocks(
        &self,
        court_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<CourtBlock>, AppError> {
        sqlx::query_as::<_, CourtBlock>(
            r#"
            SELECT id, court_id, block_date, start_time, end_time, reason
            FROM court_schedules
            WHERE court_id = $1 AND ($2::DATE IS NULL OR block_date = $2)
            ORDER BY block_date, start_time
            "#,
        )
        .bind(court_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn create_block(
        &self,
        court_id: Uuid,
        block: &CreateBlockRequest,
    ) -> Result<CourtBlock, AppError> {
        sqlx::query_as::<_, CourtBlock>(
            r#"
            INSERT INTO court_schedules (court_id, block_date, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, court_id, block_date, start_time, end_time, reason
            "#,
        )
        .bind(court_id)
        .bind(block.date)
        .bind(block.start_time)
        .bind(block.end_time)
        .bind(&block.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn delete_block(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM court_schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------
    // Club schedule
    // -----------------------------------------------------------------

    async fn club_schedule(&self) -> Result<Vec<ClubDay>, AppError> {
        sqlx::query_as::<_, ClubDay>(
            "SELECT weekday, is_open, opens_at, closes_at FROM club_schedule ORDER BY weekday",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn upsert_club_day(&self, day: &ClubDay) -> Result<ClubDay, AppError> {
        sqlx::query_as::<_, ClubDay>(
            r#"
            INSERT INTO club_schedule (weekday, is_open, opens_at, closes_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (weekday) DO UPDATE
               SET is_open = EXCLUDED.is_open,
                   opens_at = EXCLUDED.opens_at,
                   closes_at = EXCLUDED.closes_at
            RETURNING weekday, is_open, opens_at, closes_at
            "#,
        )
        .bind(day.weekday)
        .bind(day.is_open)
        .bind(day.opens_at)
        .bind(day.closes_at)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn exception_for(&self, date: NaiveDate) -> Result<Option<ScheduleException>, AppError> {
        sqlx::query_as::<_, ScheduleException>(
            r#"
            SELECT id, exception_date, is_closed, opens_at, closes_at, reason
            FROM schedule_exceptions
            WHERE exception_date = $1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn list_exceptions(&self, from: NaiveDate) -> Result<Vec<ScheduleException>, AppError> {
        sqlx::query_as::<_, ScheduleException>(
            r#"
            SELECT id, exception_date, is_closed, opens_at, closes_at, reason
            FROM schedule_exceptions
            WHERE exception_date >= $1
            ORDER BY exception_date
            "#,
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn create_exception(
        &self,
        exception: &CreateExceptionRequest,
    ) -> Result<ScheduleException, AppError> {
        sqlx::query_as::<_, ScheduleException>(
            r#"
            INSERT INTO schedule_exceptions (exception_date, is_closed, opens_at, closes_at, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, exception_date, is_closed, opens_at, closes_at, reason
            "#,
        )
        .bind(exception.date)
        .bind(exception.is_closed)
        .bind(exception.opens_at)
        .bind(exception.closes_at)
        .bind(&exception.reason)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn delete_exception(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM schedule_exceptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------
    // Bookings
    // -----------------------------------------------------------------

    async fn occupied_ranges(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeRange>, AppError> {
        sqlx::query_as::<_, TimeRange>(
            r#"
            SELECT start_time, end_time FROM bookings
            WHERE court_id = $1 AND booking_date = $2 AND status IN ('confirmed', 'completed')
            UNION ALL
            SELECT start_time, end_time FROM court_schedules
            WHERE court_id = $1 AND block_date = $2
            ORDER BY 1
            "#,
        )
        .bind(court_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, court_id, booking_date, start_time, end_time, status,
                   deposit_cents, created_at, cancelled_at
            FROM bookings WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn count_active_bookings(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND status = 'confirmed'
              AND (booking_date + start_time) > $2
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn user_bookings(&self, user_id: Uuid) -> Result<Vec<BookingView>, AppError> {
        let sql = format!(
            "{BOOKING_VIEW_SELECT} WHERE b.user_id = $1 \
             ORDER BY b.booking_date DESC, b.start_time DESC"
        );
        sqlx::query_as::<_, BookingView>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<BookingView>, AppError> {
        let sql = format!(
            "{BOOKING_VIEW_SELECT} \
             WHERE b.booking_date BETWEEN $1 AND $2 \
               AND ($3::UUID IS NULL OR b.court_id = $3) \
               AND ($4::TEXT IS NULL OR b.status = $4) \
             ORDER BY b.booking_date, b.start_time, c.sort_order"
        );
        sqlx::query_as::<_, BookingView>(&sql)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.court_id)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn booking_pay_deposit(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM booking_pay_deposit($1, $2, $3, $4, $5, $6)")
            .bind(booking.user_id)
            .bind(booking.court_id)
            .bind(booking.booking_date)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.deposit_cents)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn booking_cancel(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        notice_hours: i32,
        timezone: &str,
    ) -> Result<CancelBookingResponse, AppError> {
        sqlx::query_as::<_, CancelBookingResponse>(
            "SELECT booking_id, refunded_cents FROM booking_cancel($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(booking_id)
        .bind(notice_hours)
        .bind(timezone)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn admin_cancel_booking(
        &self,
        booking_id: Uuid,
        refund: bool,
        admin_id: Uuid,
    ) -> Result<CancelBookingResponse, AppError> {
        sqlx::query_as::<_, CancelBookingResponse>(
            "SELECT booking_id, refunded_cents FROM admin_cancel_booking($1, $2, $3)",
        )
        .bind(booking_id)
        .bind(refund)
        .bind(admin_id)
        .fetch_one(&self.pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
    }

    async fn admin_mark_noshow(
        &self,
        booking_id: Uuid,
        penalty_cents: i64,
        admin_id: Uuid,
    ) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM admin_mark_noshow($1, $2, $3)")
            .bind(booking_id)
            .bind(penalty_cents)
            .bind(admin_id)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn admin_complete_booking(
        &self,
        booking_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM admin_complete_booking($1, $2)")
            .bind(booking_id)
            .bind(admin_id)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    // -----------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------

    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, AppError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members \
             WHERE $1::TEXT IS NULL OR full_name ILIKE $1 OR email ILIKE $1 OR member_number ILIKE $1 \
             ORDER BY full_name"
        );
        sqlx::query_as::<_, Member>(&sql)
            .bind(like_pattern(search))
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn create_member(
        &self,
        member: &MemberRequest,
        joined_on: NaiveDate,
    ) -> Result<Member, AppError> {
        let sql = format!(
            "INSERT INTO members (full_name, email, phone, member_number, is_active, joined_on, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&sql)
            .bind(&member.full_name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.member_number)
            .bind(member.is_active)
            .bind(member.joined_on.unwrap_or(joined_on))
            .bind(&member.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn update_member(
        &self,
        id: Uuid,
        member: &MemberRequest,
    ) -> Result<Option<Member>, AppError> {
        let sql = format!(
            "UPDATE members \
             SET full_name = $2, email = $3, phone = $4, member_number = $5, is_active = $6, \
                 joined_on = COALESCE($7, joined_on), notes = $8 \
             WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&sql)
            .bind(id)
            .bind(&member.full_name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.member_number)
            .bind(member.is_active)
            .bind(member.joined_on)
            .bind(&member.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------

    async fn booking_stats(&self, range: DateRange) -> Result<BookingStats, AppError> {
        sqlx::query_as::<_, BookingStats>("SELECT * FROM get_booking_stats($1, $2)")
            .bind(range.from)
            .bind(range.to)
            .fetch_one(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn daily_stats(&self, range: DateRange) -> Result<Vec<DailyStats>, AppError> {
        sqlx::query_as::<_, DailyStats>("SELECT * FROM get_daily_stats($1, $2)")
            .bind(range.from)
            .bind(range.to)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }

    async fn court_occupancy(
        &self,
        range: DateRange,
        slots_per_day: i32,
    ) -> Result<Vec<CourtOccupancy>, AppError> {
        sqlx::query_as::<_, CourtOccupancy>("SELECT * FROM get_court_occupancy($1, $2, $3)")
            .bind(range.from)
            .bind(range.to)
            .bind(slots_per_day)
            .fetch_all(&self.pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)
    }
}
