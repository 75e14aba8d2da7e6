use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, eyre};
use pairslot_core::models::{
    DaySlotSet, PairBooking, SlotRef, SlotTime, TimeSlot, UserPair, UserProfile,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDaySlotSet {
    pub date: NaiveDate,
    pub generation: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub date: NaiveDate,
    pub slot_index: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub is_booked: bool,
    pub is_approved: bool,
    pub booked_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPairBooking {
    pub id: Uuid,
    pub date: NaiveDate,
    pub generation: Uuid,
    pub slot_index: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub requested_by: Uuid,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub device_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn to_u32(value: i32, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| eyre!("Negative value {} in column {}", value, column))
}

fn to_i32(value: u32, column: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| eyre!("Value {} out of range for column {}", value, column))
}

impl DbTimeSlot {
    pub fn from_slot(date: NaiveDate, slot: &TimeSlot) -> Result<Self> {
        Ok(Self {
            date,
            slot_index: to_i32(slot.index, "slot_index")?,
            start_minute: to_i32(slot.start_time.minutes(), "start_minute")?,
            end_minute: to_i32(slot.end_time.minutes(), "end_minute")?,
            is_booked: slot.is_booked,
            is_approved: slot.is_approved,
            booked_by: slot.booked_by,
        })
    }

    pub fn into_slot(self) -> Result<TimeSlot> {
        Ok(TimeSlot {
            index: to_u32(self.slot_index, "slot_index")?,
            start_time: SlotTime::from_minutes(to_u32(self.start_minute, "start_minute")?),
            end_time: SlotTime::from_minutes(to_u32(self.end_minute, "end_minute")?),
            is_booked: self.is_booked,
            is_approved: self.is_approved,
            booked_by: self.booked_by,
        })
    }
}

impl DbDaySlotSet {
    pub fn into_day(self, slots: Vec<DbTimeSlot>) -> Result<DaySlotSet> {
        Ok(DaySlotSet {
            date: self.date,
            generation: self.generation,
            slots: slots
                .into_iter()
                .map(DbTimeSlot::into_slot)
                .collect::<Result<Vec<_>>>()?,
            created_at: self.created_at,
        })
    }
}

impl DbPairBooking {
    pub fn from_booking(booking: &PairBooking) -> Result<Self> {
        let [user_a, user_b] = booking.users.members();
        Ok(Self {
            id: booking.id,
            date: booking.date,
            generation: booking.slot.generation,
            slot_index: to_i32(booking.slot.index, "slot_index")?,
            start_minute: to_i32(booking.start_time.minutes(), "start_minute")?,
            end_minute: to_i32(booking.end_time.minutes(), "end_minute")?,
            user_a,
            user_b,
            requested_by: booking.requested_by,
            is_approved: booking.is_approved,
            created_at: booking.created_at,
        })
    }

    pub fn into_booking(self) -> Result<PairBooking> {
        let users = UserPair::new(self.user_a, self.user_b)
            .map_err(|_| eyre!("Pair booking {} has identical participants", self.id))?;
        Ok(PairBooking {
            id: self.id,
            date: self.date,
            slot: SlotRef {
                generation: self.generation,
                index: to_u32(self.slot_index, "slot_index")?,
            },
            start_time: SlotTime::from_minutes(to_u32(self.start_minute, "start_minute")?),
            end_time: SlotTime::from_minutes(to_u32(self.end_minute, "end_minute")?),
            users,
            requested_by: self.requested_by,
            is_approved: self.is_approved,
            created_at: self.created_at,
        })
    }
}

impl From<DbUser> for UserProfile {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            company: user.company,
            phone: user.phone,
            device_token: user.device_token,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn test_booking_row_keeps_ordered_participants() {
        let day = DaySlotSet::new(
            date(),
            vec![TimeSlot::open(4, SlotTime::from_minutes(720), SlotTime::from_minutes(750))],
        );
        let requester = Uuid::new_v4();
        let counterparty = Uuid::new_v4();
        let booking =
            PairBooking::pending(day.date, day.slot_ref(4), day.slot(4).unwrap(), requester, counterparty)
                .unwrap();

        let row = DbPairBooking::from_booking(&booking).unwrap();
        assert!(row.user_a < row.user_b);
        assert_eq!(row.slot_index, 4);
        assert_eq!(row.start_minute, 720);
        assert_eq!(row.generation, day.generation);

        assert_eq!(row.into_booking().unwrap(), booking);
    }

    #[test]
    fn test_corrupt_rows_are_rejected() {
        let id = Uuid::new_v4();
        let user = Uuid::new_v4();
        let row = DbPairBooking {
            id,
            date: date(),
            generation: Uuid::new_v4(),
            slot_index: 0,
            start_minute: 540,
            end_minute: 570,
            user_a: user,
            user_b: user,
            requested_by: user,
            is_approved: false,
            created_at: Utc::now(),
        };
        assert!(row.clone().into_booking().is_err());

        let slot = DbTimeSlot {
            date: date(),
            slot_index: -1,
            start_minute: 540,
            end_minute: 570,
            is_booked: false,
            is_approved: false,
            booked_by: None,
        };
        assert!(slot.into_slot().is_err());
    }

    #[test]
    fn test_day_rows_assemble_in_given_order() {
        let generation = Uuid::new_v4();
        let set = DbDaySlotSet {
            date: date(),
            generation,
            created_at: Utc::now(),
        };
        let slots = (0..3)
            .map(|i| DbTimeSlot {
                date: date(),
                slot_index: i,
                start_minute: 600 + i * 20,
                end_minute: 620 + i * 20,
                is_booked: i == 1,
                is_approved: i == 1,
                booked_by: None,
            })
            .collect();

        let day = set.into_day(slots).unwrap();
        assert_eq!(day.generation, generation);
        assert_eq!(day.slots.len(), 3);
        assert_eq!(day.slots[2].start_time.to_string(), "10:40");
        assert!(day.slots[1].is_booked);
    }
}
