//! In-memory `ClubStore` for route tests. Mirrors the rules enforced by the
//! SQL procedures in `migrations/` closely enough to exercise every handler
//! without a database.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use server::store::{ClubStore, NewProfile};
use shared_types::{
    AppError, Booking, BookingFilter, BookingStats, BookingStatus, BookingView,
    CancelBookingResponse, ClubDay, Court, CourtBlock, CourtOccupancy, CourtRequest,
    CreateBlockRequest, CreateExceptionRequest, DailyStats, DateRange, Member, MemberRequest,
    NewBooking, Profile, RechargeOutcome, ScheduleException, TimeRange, Transaction,
    TransactionExportRow, UserRole, UserSummary, WalletRecharge,
};
use uuid::Uuid;

#[derive(Default)]
struct Data {
    profiles: Vec<Profile>,
    courts: Vec<Court>,
    bookings: Vec<Booking>,
    transactions: Vec<Transaction>,
    blocks: Vec<CourtBlock>,
    weekly: Vec<ClubDay>,
    exceptions: Vec<ScheduleException>,
    members: Vec<Member>,
}

impl Data {
    fn balance(&self, user_id: Uuid) -> i64 {
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| t.amount_cents)
            .sum()
    }

    fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    fn summary(&self, p: &Profile) -> UserSummary {
        UserSummary {
            id: p.id,
            email: p.email.clone(),
            full_name: p.full_name.clone(),
            phone: p.phone.clone(),
            role: p.role.clone(),
            balance_cents: self.balance(p.id),
            created_at: p.created_at,
        }
    }

    fn view(&self, b: &Booking) -> BookingView {
        let profile = self.profile(b.user_id);
        let court = self.courts.iter().find(|c| c.id == b.court_id);
        BookingView {
            id: b.id,
            user_id: b.user_id,
            user_email: profile.map(|p| p.email.clone()).unwrap_or_default(),
            user_full_name: profile.map(|p| p.full_name.clone()).unwrap_or_default(),
            court_id: b.court_id,
            court_name: court.map(|c| c.name.clone()).unwrap_or_default(),
            booking_date: b.booking_date,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status.clone(),
            deposit_cents: b.deposit_cents,
            created_at: b.created_at,
            cancelled_at: b.cancelled_at,
        }
    }

    fn push_transaction(
        &mut self,
        user_id: Uuid,
        amount_cents: i64,
        kind: &str,
        description: &str,
        booking_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) {
        self.transactions.push(Transaction {
            id: Uuid::new_v4(),
            user_id,
            amount_cents,
            kind: kind.to_string(),
            description: description.to_string(),
            booking_id,
            stripe_session_id: None,
            created_by,
            created_at: Utc::now(),
        });
    }

    fn confirmed_booking(&mut self, id: Uuid, action: &str) -> Result<&mut Booking, AppError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| raise("Booking not found"))?;
        if booking.status != BookingStatus::Confirmed.as_str() {
            return Err(raise(&format!("Only confirmed bookings can be {action}")));
        }
        Ok(booking)
    }
}

/// Procedure failures surface as 400 with the message verbatim.
fn raise(message: &str) -> AppError {
    AppError::bad_request(message)
}

fn matches_search(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .flatten()
        .any(|h| h.to_lowercase().contains(&needle))
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub struct MemoryStore {
    data: Mutex<Data>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with every weekday open 08:00-23:00.
    pub fn new() -> Self {
        let weekly = (0..7)
            .map(|weekday| ClubDay {
                weekday,
                is_open: true,
                opens_at: t(8, 0),
                closes_at: t(23, 0),
            })
            .collect();
        Self {
            data: Mutex::new(Data {
                weekly,
                ..Data::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    pub fn booking_status(&self, id: Uuid) -> Option<String> {
        self.lock()
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.status.clone())
    }

    pub fn transaction_kinds(&self, user_id: Uuid) -> Vec<(String, i64)> {
        self.lock()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| (t.kind.clone(), t.amount_cents))
            .collect()
    }
}

#[async_trait]
impl ClubStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, AppError> {
        let mut data = self.lock();
        if data.profiles.iter().any(|p| p.email == profile.email) {
            return Err(AppError::conflict("An account with this email already exists"));
        }
        let created = Profile {
            id: Uuid::new_v4(),
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
            phone: profile.phone.clone(),
            role: profile.role.as_str().to_string(),
            password_hash: profile.password_hash.clone(),
            created_at: Utc::now(),
        };
        data.profiles.push(created.clone());
        Ok(created)
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.lock().profile(id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.lock().profiles.iter().find(|p| p.email == email).cloned())
    }

    async fn list_users(
        &self,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<UserSummary>, i64), AppError> {
        let data = self.lock();
        let mut matching: Vec<&Profile> = data
            .profiles
            .iter()
            .filter(|p| {
                search.map_or(true, |s| {
                    matches_search(s, &[Some(p.email.as_str()), Some(p.full_name.as_str())])
                })
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let users = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .map(|p| data.summary(p))
            .collect();
        Ok((users, total))
    }

    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let data = self.lock();
        Ok(data.profiles.iter().map(|p| data.summary(p)).collect())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<Option<Profile>, AppError> {
        let mut data = self.lock();
        Ok(data.profiles.iter_mut().find(|p| p.id == id).map(|p| {
            p.role = role.as_str().to_string();
            p.clone()
        }))
    }

    async fn balance(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(self.lock().balance(user_id))
    }

    async fn transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>, AppError> {
        let data = self.lock();
        Ok(data
            .transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn wallet_recharge(&self, recharge: &WalletRecharge) -> Result<RechargeOutcome, AppError> {
        let mut data = self.lock();
        if data.profile(recharge.user_id).is_none() {
            return Err(raise("User not found"));
        }
        if recharge.amount_cents == 0 {
            return Err(raise("Amount must not be zero"));
        }
        if let Some(session) = &recharge.stripe_session_id {
            if data
                .transactions
                .iter()
                .any(|t| t.stripe_session_id.as_deref() == Some(session))
            {
                return Ok(RechargeOutcome::Duplicate);
            }
        }
        if recharge.amount_cents < 0 && data.balance(recharge.user_id) + recharge.amount_cents < 0 {
            return Err(raise("Insufficient balance"));
        }

        let kind = if recharge.source == "stripe" {
            "recharge"
        } else {
            "adjustment"
        };
        let description = recharge.description.clone().unwrap_or_else(|| {
            if kind == "recharge" {
                "Wallet recharge".to_string()
            } else {
                "Manual adjustment".to_string()
            }
        });
        data.transactions.push(Transaction {
            id: Uuid::new_v4(),
            user_id: recharge.user_id,
            amount_cents: recharge.amount_cents,
            kind: kind.to_string(),
            description,
            booking_id: None,
            stripe_session_id: recharge.stripe_session_id.clone(),
            created_by: recharge.created_by,
            created_at: Utc::now(),
        });
        Ok(RechargeOutcome::Applied {
            balance_cents: data.balance(recharge.user_id),
        })
    }

    async fn transactions_between(
        &self,
        range: DateRange,
    ) -> Result<Vec<TransactionExportRow>, AppError> {
        let data = self.lock();
        Ok(data
            .transactions
            .iter()
            .filter(|t| {
                let day = t.created_at.date_naive();
                day >= range.from && day <= range.to
            })
            .map(|t| TransactionExportRow {
                id: t.id,
                user_email: data
                    .profile(t.user_id)
                    .map(|p| p.email.clone())
                    .unwrap_or_default(),
                amount_cents: t.amount_cents,
                kind: t.kind.clone(),
                description: t.description.clone(),
                booking_id: t.booking_id,
                stripe_session_id: t.stripe_session_id.clone(),
                created_at: t.created_at,
            })
            .collect())
    }

    async fn list_courts(&self, include_inactive: bool) -> Result<Vec<Court>, AppError> {
        let mut courts: Vec<Court> = self
            .lock()
            .courts
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        courts.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(courts)
    }

    async fn find_court(&self, id: Uuid) -> Result<Option<Court>, AppError> {
        Ok(self.lock().courts.iter().find(|c| c.id == id).cloned())
    }

    async fn create_court(&self, court: &CourtRequest) -> Result<Court, AppError> {
        let created = Court {
            id: Uuid::new_v4(),
            name: court.name.clone(),
            surface: court.surface.clone(),
            is_active: court.is_active,
            sort_order: court.sort_order,
            created_at: Utc::now(),
        };
        self.lock().courts.push(created.clone());
        Ok(created)
    }

    async fn update_court(&self, id: Uuid, court: &CourtRequest) -> Result<Option<Court>, AppError> {
        let mut data = self.lock();
        Ok(data.courts.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = court.name.clone();
            c.surface = court.surface.clone();
            c.is_active = court.is_active;
            c.sort_order = court.sort_order;
            c.clone()
        }))
    }

    async fn list_blocks(
        &self,
        court_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<CourtBlock>, AppError> {
        let mut blocks: Vec<CourtBlock> = self
            .lock()
            .blocks
            .iter()
            .filter(|b| b.court_id == court_id && date.map_or(true, |d| b.block_date == d))
            .cloned()
            .collect();
        blocks.sort_by_key(|b| (b.block_date, b.start_time));
        Ok(blocks)
    }

    async fn create_block(
        &self,
        court_id: Uuid,
        block: &CreateBlockRequest,
    ) -> Result<CourtBlock, AppError> {
        let created = CourtBlock {
            id: Uuid::new_v4(),
            court_id,
            block_date: block.date,
            start_time: block.start_time,
            end_time: block.end_time,
            reason: block.reason.clone(),
        };
        self.lock().blocks.push(created.clone());
        Ok(created)
    }

    async fn delete_block(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.lock();
        let before = data.blocks.len();
        data.blocks.retain(|b| b.id != id);
        Ok(data.blocks.len() != before)
    }

    async fn club_schedule(&self) -> Result<Vec<ClubDay>, AppError> {
        let mut weekly = self.lock().weekly.clone();
        weekly.sort_by_key(|d| d.weekday);
        Ok(weekly)
    }

    async fn upsert_club_day(&self, day: &ClubDay) -> Result<ClubDay, AppError> {
        let mut data = self.lock();
        data.weekly.retain(|d| d.weekday != day.weekday);
        data.weekly.push(day.clone());
        Ok(day.clone())
    }

    async fn exception_for(&self, date: NaiveDate) -> Result<Option<ScheduleException>, AppError> {
        Ok(self
            .lock()
            .exceptions
            .iter()
            .find(|e| e.exception_date == date)
            .cloned())
    }

    async fn list_exceptions(&self, from: NaiveDate) -> Result<Vec<ScheduleException>, AppError> {
        let mut list: Vec<ScheduleException> = self
            .lock()
            .exceptions
            .iter()
            .filter(|e| e.exception_date >= from)
            .cloned()
            .collect();
        list.sort_by_key(|e| e.exception_date);
        Ok(list)
    }

    async fn create_exception(
        &self,
        exception: &CreateExceptionRequest,
    ) -> Result<ScheduleException, AppError> {
        let mut data = self.lock();
        if data
            .exceptions
            .iter()
            .any(|e| e.exception_date == exception.date)
        {
            return Err(AppError::conflict("An exception already exists for this date"));
        }
        let (opens_at, closes_at) = if exception.is_closed {
            (None, None)
        } else {
            (exception.opens_at, exception.closes_at)
        };
        let created = ScheduleException {
            id: Uuid::new_v4(),
            exception_date: exception.date,
            is_closed: exception.is_closed,
            opens_at,
            closes_at,
            reason: exception.reason.clone(),
        };
        data.exceptions.push(created.clone());
        Ok(created)
    }

    async fn delete_exception(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.lock();
        let before = data.exceptions.len();
        data.exceptions.retain(|e| e.id != id);
        Ok(data.exceptions.len() != before)
    }

    async fn occupied_ranges(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeRange>, AppError> {
        let data = self.lock();
        let booked = data.bookings.iter().filter(|b| {
            b.court_id == court_id
                && b.booking_date == date
                && b.status().is_some_and(|s| s.occupies_court())
        });
        let blocked = data
            .blocks
            .iter()
            .filter(|b| b.court_id == court_id && b.block_date == date);
        let mut ranges: Vec<TimeRange> = booked
            .map(Booking::range)
            .chain(blocked.map(CourtBlock::range))
            .collect();
        ranges.sort_by_key(|r| r.start_time);
        Ok(ranges)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.lock().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn count_active_bookings(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<i64, AppError> {
        Ok(self
            .lock()
            .bookings
            .iter()
            .filter(|b| {
                b.user_id == user_id
                    && b.status() == Some(BookingStatus::Confirmed)
                    && b.booking_date.and_time(b.start_time) > now
            })
            .count() as i64)
    }

    async fn user_bookings(&self, user_id: Uuid) -> Result<Vec<BookingView>, AppError> {
        let data = self.lock();
        let mut mine: Vec<&Booking> = data.bookings.iter().filter(|b| b.user_id == user_id).collect();
        mine.sort_by(|a, b| (b.booking_date, b.start_time).cmp(&(a.booking_date, a.start_time)));
        Ok(mine.into_iter().map(|b| data.view(b)).collect())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<BookingView>, AppError> {
        let data = self.lock();
        let mut rows: Vec<&Booking> = data.bookings.iter().filter(|b| filter.matches(b)).collect();
        rows.sort_by_key(|b| (b.booking_date, b.start_time));
        Ok(rows.into_iter().map(|b| data.view(b)).collect())
    }

    async fn booking_pay_deposit(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        let mut data = self.lock();
        if !data
            .courts
            .iter()
            .any(|c| c.id == booking.court_id && c.is_active)
        {
            return Err(raise("Court not found"));
        }
        if data.profile(booking.user_id).is_none() {
            return Err(raise("User not found"));
        }

        let wanted = TimeRange::new(booking.start_time, booking.end_time);
        let taken = data.bookings.iter().any(|b| {
            b.court_id == booking.court_id
                && b.booking_date == booking.booking_date
                && b.status().is_some_and(|s| s.occupies_court())
                && b.range().overlaps(&wanted)
        }) || data.blocks.iter().any(|b| {
            b.court_id == booking.court_id
                && b.block_date == booking.booking_date
                && b.range().overlaps(&wanted)
        });
        if taken {
            return Err(raise("Slot is no longer available"));
        }

        if booking.deposit_cents > 0 && data.balance(booking.user_id) < booking.deposit_cents {
            return Err(raise("Insufficient balance"));
        }

        let created = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            court_id: booking.court_id,
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: BookingStatus::Confirmed.as_str().to_string(),
            deposit_cents: booking.deposit_cents.max(0),
            created_at: Utc::now(),
            cancelled_at: None,
        };
        data.bookings.push(created.clone());

        if booking.deposit_cents > 0 {
            let description = format!(
                "Deposit {} {}",
                booking.booking_date,
                booking.start_time.format("%H:%M")
            );
            data.push_transaction(
                booking.user_id,
                -booking.deposit_cents,
                "deposit",
                &description,
                Some(created.id),
                None,
            );
        }
        Ok(created)
    }

    async fn booking_cancel(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        notice_hours: i32,
        timezone: &str,
    ) -> Result<CancelBookingResponse, AppError> {
        let tz: chrono_tz::Tz = timezone.parse().map_err(|_| raise("Unknown timezone"))?;
        let mut data = self.lock();

        let owned = data
            .bookings
            .iter()
            .any(|b| b.id == booking_id && b.user_id == user_id);
        if !owned {
            return Err(raise("Booking not found"));
        }
        let booking = data.confirmed_booking(booking_id, "cancelled")?;

        let starts_at = tz
            .from_local_datetime(&booking.booking_date.and_time(booking.start_time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| raise("Invalid booking time"))?;
        let now = Utc::now();
        if starts_at <= now {
            return Err(raise("Bookings that have already started cannot be cancelled"));
        }

        let refund = if starts_at - now >= Duration::hours(notice_hours as i64) {
            booking.deposit_cents
        } else {
            0
        };
        booking.status = BookingStatus::Cancelled.as_str().to_string();
        booking.cancelled_at = Some(now);
        let owner = booking.user_id;

        if refund > 0 {
            data.push_transaction(owner, refund, "refund", "Deposit refund", Some(booking_id), None);
        }
        Ok(CancelBookingResponse {
            booking_id,
            refunded_cents: refund,
        })
    }

    async fn admin_cancel_booking(
        &self,
        booking_id: Uuid,
        refund: bool,
        admin_id: Uuid,
    ) -> Result<CancelBookingResponse, AppError> {
        let mut data = self.lock();
        let booking = data.confirmed_booking(booking_id, "cancelled")?;
        let amount = if refund { booking.deposit_cents } else { 0 };
        booking.status = BookingStatus::Cancelled.as_str().to_string();
        booking.cancelled_at = Some(Utc::now());
        let owner = booking.user_id;

        if amount > 0 {
            data.push_transaction(
                owner,
                amount,
                "refund",
                "Deposit refund (club cancellation)",
                Some(booking_id),
                Some(admin_id),
            );
        }
        Ok(CancelBookingResponse {
            booking_id,
            refunded_cents: amount,
        })
    }

    async fn admin_mark_noshow(
        &self,
        booking_id: Uuid,
        penalty_cents: i64,
        admin_id: Uuid,
    ) -> Result<Booking, AppError> {
        let mut data = self.lock();
        let booking = data.confirmed_booking(booking_id, "marked as no-show")?;
        booking.status = BookingStatus::NoShow.as_str().to_string();
        let updated = booking.clone();

        if penalty_cents > 0 {
            data.push_transaction(
                updated.user_id,
                -penalty_cents,
                "penalty",
                "No-show penalty",
                Some(booking_id),
                Some(admin_id),
            );
        }
        Ok(updated)
    }

    async fn admin_complete_booking(
        &self,
        booking_id: Uuid,
        _admin_id: Uuid,
    ) -> Result<Booking, AppError> {
        let mut data = self.lock();
        let booking = data.confirmed_booking(booking_id, "completed")?;
        booking.status = BookingStatus::Completed.as_str().to_string();
        Ok(booking.clone())
    }

    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, AppError> {
        let mut members: Vec<Member> = self
            .lock()
            .members
            .iter()
            .filter(|m| {
                search.map_or(true, |s| {
                    matches_search(
                        s,
                        &[
                            Some(m.full_name.as_str()),
                            m.email.as_deref(),
                            Some(m.member_number.as_str()),
                        ],
                    )
                })
            })
            .cloned()
            .collect();
        members.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(members)
    }

    async fn create_member(
        &self,
        member: &MemberRequest,
        joined_on: NaiveDate,
    ) -> Result<Member, AppError> {
        let mut data = self.lock();
        if data
            .members
            .iter()
            .any(|m| m.member_number == member.member_number)
        {
            return Err(AppError::conflict("This member number is already in use"));
        }
        let created = Member {
            id: Uuid::new_v4(),
            full_name: member.full_name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            member_number: member.member_number.clone(),
            is_active: member.is_active,
            joined_on: member.joined_on.unwrap_or(joined_on),
            notes: member.notes.clone(),
            created_at: Utc::now(),
        };
        data.members.push(created.clone());
        Ok(created)
    }

    async fn update_member(
        &self,
        id: Uuid,
        member: &MemberRequest,
    ) -> Result<Option<Member>, AppError> {
        let mut data = self.lock();
        if data
            .members
            .iter()
            .any(|m| m.id != id && m.member_number == member.member_number)
        {
            return Err(AppError::conflict("This member number is already in use"));
        }
        Ok(data.members.iter_mut().find(|m| m.id == id).map(|m| {
            m.full_name = member.full_name.clone();
            m.email = member.email.clone();
            m.phone = member.phone.clone();
            m.member_number = member.member_number.clone();
            m.is_active = member.is_active;
            if let Some(joined) = member.joined_on {
                m.joined_on = joined;
            }
            m.notes = member.notes.clone();
            m.clone()
        }))
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, AppError> {
        let mut data = self.lock();
        let before = data.members.len();
        data.members.retain(|m| m.id != id);
        Ok(data.members.len() != before)
    }

    async fn booking_stats(&self, range: DateRange) -> Result<BookingStats, AppError> {
        let data = self.lock();
        let in_range: Vec<&Booking> = data
            .bookings
            .iter()
            .filter(|b| b.booking_date >= range.from && b.booking_date <= range.to)
            .collect();
        let count = |status: BookingStatus| {
            in_range
                .iter()
                .filter(|b| b.status() == Some(status))
                .count() as i64
        };
        let sum = |kind: &str| -> i64 {
            data.transactions
                .iter()
                .filter(|t| {
                    let day = t.created_at.date_naive();
                    t.kind == kind && day >= range.from && day <= range.to
                })
                .map(|t| t.amount_cents)
                .sum()
        };

        Ok(BookingStats {
            total_bookings: in_range.len() as i64,
            confirmed: count(BookingStatus::Confirmed),
            completed: count(BookingStatus::Completed),
            cancelled: count(BookingStatus::Cancelled),
            no_show: count(BookingStatus::NoShow),
            deposits_cents: -sum("deposit"),
            refunds_cents: sum("refund"),
            penalties_cents: -sum("penalty"),
            recharges_cents: sum("recharge"),
        })
    }

    async fn daily_stats(&self, range: DateRange) -> Result<Vec<DailyStats>, AppError> {
        let data = self.lock();
        let mut days = Vec::new();
        let mut day = range.from;
        while day <= range.to {
            let on_day = data.bookings.iter().filter(|b| b.booking_date == day);
            let cancelled = |b: &&Booking| b.status() == Some(BookingStatus::Cancelled);
            let money = |kinds: &[&str]| -> i64 {
                data.transactions
                    .iter()
                    .filter(|t| t.created_at.date_naive() == day && kinds.contains(&t.kind.as_str()))
                    .map(|t| t.amount_cents)
                    .sum()
            };
            days.push(DailyStats {
                day,
                bookings: on_day.clone().filter(|b| !cancelled(b)).count() as i64,
                cancellations: on_day.filter(cancelled).count() as i64,
                revenue_cents: -money(&["deposit", "refund", "penalty"]),
                recharges_cents: money(&["recharge"]),
            });
            day += Duration::days(1);
        }
        Ok(days)
    }

    async fn court_occupancy(
        &self,
        range: DateRange,
        slots_per_day: i32,
    ) -> Result<Vec<CourtOccupancy>, AppError> {
        let data = self.lock();
        let total_slots = ((range.to - range.from).num_days() + 1) * slots_per_day as i64;
        let mut courts: Vec<&Court> = data.courts.iter().filter(|c| c.is_active).collect();
        courts.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));

        Ok(courts
            .into_iter()
            .map(|c| {
                let booked_slots = data
                    .bookings
                    .iter()
                    .filter(|b| {
                        b.court_id == c.id
                            && b.booking_date >= range.from
                            && b.booking_date <= range.to
                            && b.status().is_some_and(|s| s.occupies_court())
                    })
                    .count() as i64;
                CourtOccupancy {
                    court_id: c.id,
                    court_name: c.name.clone(),
                    booked_slots,
                    total_slots,
                    occupancy: if total_slots > 0 {
                        booked_slots as f64 / total_slots as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect())
    }
}
