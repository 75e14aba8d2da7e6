use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingRepository, SlotRepository, UserDirectory};
use crate::errors::{BookingError, BookingResult};
use crate::models::{DaySlotSet, PairBooking, UserProfile};

#[derive(Debug, Default)]
struct MemoryState {
    days: HashMap<NaiveDate, DaySlotSet>,
    bookings: HashMap<Uuid, PairBooking>,
    users: HashMap<Uuid, UserProfile>,
}

/// Process-local store. Every operation takes the single lock, which makes the
/// check-and-write operations atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn replace_day(&self, day: DaySlotSet) -> BookingResult<DaySlotSet> {
        let mut state = self.state.write().await;
        state.days.insert(day.date, day.clone());
        Ok(day)
    }

    async fn get_day(&self, date: NaiveDate) -> BookingResult<Option<DaySlotSet>> {
        Ok(self.state.read().await.days.get(&date).cloned())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_unclaimed(&self, booking: PairBooking) -> BookingResult<PairBooking> {
        let mut state = self.state.write().await;
        let [a, b] = booking.users.members();

        let claimed = state.bookings.values().any(|existing| {
            existing.claims(booking.date, booking.start_time, booking.end_time)
                && existing.users.involves_any(a, b)
        });
        if claimed {
            return Err(BookingError::Conflict(format!(
                "Slot {}-{} on {} is already claimed by one of the participants",
                booking.start_time, booking.end_time, booking.date
            )));
        }

        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<PairBooking>> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn bookings_on_date_involving(
        &self,
        date: NaiveDate,
        a: Uuid,
        b: Uuid,
    ) -> BookingResult<Vec<PairBooking>> {
        let state = self.state.read().await;
        Ok(state
            .bookings
            .values()
            .filter(|booking| booking.date == date && booking.users.involves_any(a, b))
            .cloned()
            .collect())
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> BookingResult<Vec<PairBooking>> {
        let state = self.state.read().await;
        Ok(state
            .bookings
            .values()
            .filter(|booking| booking.is_participant(user_id))
            .cloned()
            .collect())
    }

    async fn commit_approval(&self, id: Uuid, approver: Uuid) -> BookingResult<PairBooking> {
        let mut state = self.state.write().await;
        let MemoryState { days, bookings, .. } = &mut *state;

        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("Pair booking {} not found", id)))?;
        if booking.is_approved {
            return Err(BookingError::Conflict(format!(
                "Pair booking {} is already approved",
                id
            )));
        }

        let slot = days
            .get_mut(&booking.date)
            .and_then(|day| day.resolve_mut(&booking.slot))
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Slot {}-{} on {} no longer exists",
                    booking.start_time, booking.end_time, booking.date
                ))
            })?;

        slot.mark_approved(approver);
        booking.is_approved = true;
        Ok(booking.clone())
    }

    async fn delete_booking(&self, id: Uuid) -> BookingResult<bool> {
        Ok(self.state.write().await.bookings.remove(&id).is_some())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn upsert_user(&self, profile: UserProfile) -> BookingResult<UserProfile> {
        let mut state = self.state.write().await;
        state.users.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_user(&self, id: Uuid) -> BookingResult<Option<UserProfile>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn set_device_token(
        &self,
        id: Uuid,
        device_token: Option<String>,
    ) -> BookingResult<Option<UserProfile>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.device_token = device_token;
            user.clone()
        }))
    }
}
