//! # Storage Ports
//!
//! Traits the booking engine uses to reach persisted state. The PostgreSQL
//! implementation lives in `pairslot-db`; [`memory::InMemoryStore`] backs tests and
//! database-less runs.
//!
//! Two operations must be atomic in every implementation:
//!
//! - [`BookingRepository::insert_unclaimed`] checks for a competing claim and inserts
//!   in one step, so two simultaneous requests for the same window cannot both pass.
//! - [`BookingRepository::commit_approval`] marks the slot and the booking together and
//!   only succeeds while the booking is still pending.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{DaySlotSet, PairBooking, UserProfile};

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Stores `day` as the only slot set of its date, dropping any previous one.
    async fn replace_day(&self, day: DaySlotSet) -> BookingResult<DaySlotSet>;

    async fn get_day(&self, date: NaiveDate) -> BookingResult<Option<DaySlotSet>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `booking` unless another booking on the same date and window involves
    /// either of its participants.
    ///
    /// # Errors
    ///
    /// * `BookingError::Conflict` - a competing claim exists
    async fn insert_unclaimed(&self, booking: PairBooking) -> BookingResult<PairBooking>;

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<PairBooking>>;

    /// Bookings in any state on `date` where `a` or `b` is a participant.
    async fn bookings_on_date_involving(
        &self,
        date: NaiveDate,
        a: Uuid,
        b: Uuid,
    ) -> BookingResult<Vec<PairBooking>>;

    /// Bookings in any state where `user_id` is a participant.
    async fn bookings_for_user(&self, user_id: Uuid) -> BookingResult<Vec<PairBooking>>;

    /// Approves a pending booking and marks its slot as booked by `approver`.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - the booking, its day or its slot no longer exists
    /// * `BookingError::Conflict` - the booking is already approved
    async fn commit_approval(&self, id: Uuid, approver: Uuid) -> BookingResult<PairBooking>;

    /// Deletes a booking; returns whether a record was removed.
    async fn delete_booking(&self, id: Uuid) -> BookingResult<bool>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn upsert_user(&self, profile: UserProfile) -> BookingResult<UserProfile>;

    async fn get_user(&self, id: Uuid) -> BookingResult<Option<UserProfile>>;

    /// Replaces the push token of a user; `None` if the user does not exist.
    async fn set_device_token(
        &self,
        id: Uuid,
        device_token: Option<String>,
    ) -> BookingResult<Option<UserProfile>>;
}
