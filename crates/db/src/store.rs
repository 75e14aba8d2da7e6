//! PostgreSQL implementation of the core storage ports.
//!
//! Multi-step operations run inside one transaction: replacing a day, the claim check
//! before inserting a booking (serialized per window with an advisory lock), and
//! approval (booking row locked `FOR UPDATE`, slot update guarded by generation).

use async_trait::async_trait;
use chrono::NaiveDate;
use pairslot_core::errors::{BookingError, BookingResult};
use pairslot_core::models::{DaySlotSet, PairBooking, UserProfile};
use pairslot_core::store::{BookingRepository, SlotRepository, UserDirectory};
use tracing::debug;
use uuid::Uuid;

use crate::models::{DbPairBooking, DbTimeSlot, DbUser};
use crate::repositories::{day_slots, pair_booking, user};
use crate::DbPool;

fn db_error(err: sqlx::Error) -> BookingError {
    BookingError::Database(eyre::Report::new(err))
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_bookings(rows: Vec<DbPairBooking>) -> BookingResult<Vec<PairBooking>> {
    rows.into_iter()
        .map(|row| row.into_booking().map_err(BookingError::Database))
        .collect()
}

#[async_trait]
impl SlotRepository for PgStore {
    async fn replace_day(&self, day: DaySlotSet) -> BookingResult<DaySlotSet> {
        let rows = day
            .slots
            .iter()
            .map(|slot| DbTimeSlot::from_slot(day.date, slot))
            .collect::<eyre::Result<Vec<_>>>()?;

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        day_slots::delete_day(&mut *tx, day.date).await?;
        day_slots::insert_day(&mut *tx, day.date, day.generation, day.created_at).await?;
        for row in &rows {
            day_slots::insert_time_slot(&mut *tx, row).await?;
        }
        tx.commit().await.map_err(db_error)?;

        debug!("Stored {} slots for {}", rows.len(), day.date);
        Ok(day)
    }

    async fn get_day(&self, date: NaiveDate) -> BookingResult<Option<DaySlotSet>> {
        // Header and slots must come from the same snapshot, or a concurrent
        // replace_day could pair the old generation with the new slots.
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        day_slots::repeatable_read(&mut *tx).await?;

        let Some(set) = day_slots::get_day(&mut *tx, date).await? else {
            return Ok(None);
        };
        let slots = day_slots::get_time_slots(&mut *tx, date).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(Some(set.into_day(slots)?))
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn insert_unclaimed(&self, booking: PairBooking) -> BookingResult<PairBooking> {
        let row = DbPairBooking::from_booking(&booking)?;

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        pair_booking::lock_window(&mut *tx, row.date, row.start_minute, row.end_minute).await?;

        let existing = pair_booking::find_claim(
            &mut *tx,
            row.date,
            row.start_minute,
            row.end_minute,
            row.user_a,
            row.user_b,
        )
        .await?;
        if let Some(existing) = existing {
            return Err(BookingError::Conflict(format!(
                "Slot {}-{} on {} is already claimed by one of the participants (booking {})",
                booking.start_time, booking.end_time, booking.date, existing
            )));
        }

        let inserted = pair_booking::insert_booking(&mut *tx, &row).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(inserted.into_booking()?)
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<PairBooking>> {
        pair_booking::get_booking(&self.pool, id)
            .await?
            .map(|row| row.into_booking().map_err(BookingError::Database))
            .transpose()
    }

    async fn bookings_on_date_involving(
        &self,
        date: NaiveDate,
        a: Uuid,
        b: Uuid,
    ) -> BookingResult<Vec<PairBooking>> {
        into_bookings(pair_booking::bookings_on_date_involving(&self.pool, date, a, b).await?)
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> BookingResult<Vec<PairBooking>> {
        into_bookings(pair_booking::bookings_for_user(&self.pool, user_id).await?)
    }

    async fn commit_approval(&self, id: Uuid, approver: Uuid) -> BookingResult<PairBooking> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let booking = pair_booking::get_booking_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Pair booking {} not found", id)))?;
        if booking.is_approved {
            return Err(BookingError::Conflict(format!(
                "Pair booking {} is already approved",
                id
            )));
        }

        let marked = day_slots::mark_slot_approved(
            &mut *tx,
            booking.date,
            booking.slot_index,
            booking.generation,
            approver,
        )
        .await?;
        if !marked {
            return Err(BookingError::NotFound(format!(
                "Slot {} on {} no longer exists",
                booking.slot_index, booking.date
            )));
        }

        let approved = pair_booking::approve_if_pending(&mut *tx, id)
            .await?
            .ok_or_else(|| BookingError::Conflict(format!("Pair booking {} is already approved", id)))?;
        tx.commit().await.map_err(db_error)?;

        Ok(approved.into_booking()?)
    }

    async fn delete_booking(&self, id: Uuid) -> BookingResult<bool> {
        Ok(pair_booking::delete_booking(&self.pool, id).await?)
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn upsert_user(&self, profile: UserProfile) -> BookingResult<UserProfile> {
        let row = DbUser {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            company: profile.company,
            phone: profile.phone,
            device_token: profile.device_token,
            created_at: profile.created_at,
        };

        Ok(user::upsert_user(&self.pool, &row).await?.into())
    }

    async fn get_user(&self, id: Uuid) -> BookingResult<Option<UserProfile>> {
        Ok(user::get_user_by_id(&self.pool, id).await?.map(UserProfile::from))
    }

    async fn set_device_token(
        &self,
        id: Uuid,
        device_token: Option<String>,
    ) -> BookingResult<Option<UserProfile>> {
        Ok(user::update_device_token(&self.pool, id, device_token.as_deref())
            .await?
            .map(UserProfile::from))
    }
}
