use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot_time::SlotTime;

/// One bookable interval inside a [`DaySlotSet`].
///
/// `index` is the slot's position in its day and doubles as its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub index: u32,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub is_booked: bool,
    pub is_approved: bool,
    pub booked_by: Option<Uuid>,
}

impl TimeSlot {
    /// A fresh slot with no booking state.
    pub fn open(index: u32, start_time: SlotTime, end_time: SlotTime) -> Self {
        Self {
            index,
            start_time,
            end_time,
            is_booked: false,
            is_approved: false,
            booked_by: None,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes() - self.start_time.minutes()
    }

    pub(crate) fn mark_approved(&mut self, approver: Uuid) {
        self.is_booked = true;
        self.is_approved = true;
        self.booked_by = Some(approver);
    }
}

/// Stable reference to a slot: the generation of the day it belongs to plus its index.
///
/// Regenerating a day produces a new generation, so references taken from the old
/// set no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub generation: Uuid,
    pub index: u32,
}

/// All slots published for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlotSet {
    pub date: NaiveDate,
    pub generation: Uuid,
    pub slots: Vec<TimeSlot>,
    pub created_at: DateTime<Utc>,
}

impl DaySlotSet {
    pub fn new(date: NaiveDate, slots: Vec<TimeSlot>) -> Self {
        Self {
            date,
            generation: Uuid::new_v4(),
            slots,
            created_at: Utc::now(),
        }
    }

    pub fn slot(&self, index: u32) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.index == index)
    }

    pub fn slot_ref(&self, index: u32) -> SlotRef {
        SlotRef {
            generation: self.generation,
            index,
        }
    }

    /// Resolves a reference taken earlier; `None` once the day has been regenerated.
    pub fn resolve(&self, slot_ref: &SlotRef) -> Option<&TimeSlot> {
        if slot_ref.generation != self.generation {
            return None;
        }
        self.slot(slot_ref.index)
    }

    pub(crate) fn resolve_mut(&mut self, slot_ref: &SlotRef) -> Option<&mut TimeSlot> {
        if slot_ref.generation != self.generation {
            return None;
        }
        self.slots.iter_mut().find(|slot| slot.index == slot_ref.index)
    }
}

/// Admin payload for publishing a day. Times are validated by the slot generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSlotsRequest {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSlotsResponse {
    pub slots: Vec<TimeSlot>,
}
