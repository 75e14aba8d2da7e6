use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot_time::SlotTime;
use super::time_slot::{SlotRef, TimeSlot};
use super::user::UserSummary;
use crate::errors::{BookingError, BookingResult};

/// Two distinct participants, stored in ascending order so the pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Uuid; 2]", into = "[Uuid; 2]")]
pub struct UserPair([Uuid; 2]);

impl UserPair {
    pub fn new(a: Uuid, b: Uuid) -> BookingResult<Self> {
        if a == b {
            return Err(BookingError::Conflict(
                "Cannot book a pair slot with yourself".to_string(),
            ));
        }
        Ok(if a < b { Self([a, b]) } else { Self([b, a]) })
    }

    pub fn members(&self) -> [Uuid; 2] {
        self.0
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    /// True when either user takes part in this pair.
    pub fn involves_any(&self, a: Uuid, b: Uuid) -> bool {
        self.contains(a) || self.contains(b)
    }

    /// The other participant, or `None` if `user_id` is not in the pair.
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        match self.0 {
            [first, second] if first == user_id => Some(second),
            [first, second] if second == user_id => Some(first),
            _ => None,
        }
    }
}

impl TryFrom<[Uuid; 2]> for UserPair {
    type Error = BookingError;

    fn try_from(value: [Uuid; 2]) -> Result<Self, Self::Error> {
        Self::new(value[0], value[1])
    }
}

impl From<UserPair> for [Uuid; 2] {
    fn from(value: UserPair) -> Self {
        value.0
    }
}

/// A two-party claim on one slot. Pending until the counterparty approves it;
/// cancellation deletes the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairBooking {
    pub id: Uuid,
    pub date: NaiveDate,
    pub slot: SlotRef,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub users: UserPair,
    pub requested_by: Uuid,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl PairBooking {
    pub fn pending(
        date: NaiveDate,
        slot_ref: SlotRef,
        slot: &TimeSlot,
        requester: Uuid,
        counterparty: Uuid,
    ) -> BookingResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            date,
            slot: slot_ref,
            start_time: slot.start_time,
            end_time: slot.end_time,
            users: UserPair::new(requester, counterparty)?,
            requested_by: requester,
            is_approved: false,
            created_at: Utc::now(),
        })
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.users.contains(user_id)
    }

    /// Whether this booking claims the same date and wall-clock window.
    pub fn claims(&self, date: NaiveDate, start_time: SlotTime, end_time: SlotTime) -> bool {
        self.date == date && self.start_time == start_time && self.end_time == end_time
    }
}

/// Ordering shared by every booking listing: newest date first, then earliest start.
pub fn listing_order(a: &PairBooking, b: &PairBooking) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.start_time.cmp(&b.start_time))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestPairSlotRequest {
    pub date: NaiveDate,
    pub slot_id: u32,
    pub counterparty_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
    pub counterparty_id: Uuid,
}

/// A booking as seen by one participant, carrying the other participant's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub is_approved: bool,
    pub counterparty: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelPairSlotResponse {
    pub id: Uuid,
    pub cancelled: bool,
}
