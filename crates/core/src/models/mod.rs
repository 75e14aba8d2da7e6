pub mod pair_booking;
pub mod slot_time;
pub mod time_slot;
pub mod user;

pub use pair_booking::{
    AvailableSlotsQuery, BookingEntry, CancelPairSlotResponse, PairBooking, RequestPairSlotRequest,
    UserPair,
};
pub use slot_time::{SlotDuration, SlotTime};
pub use time_slot::{DaySlotSet, PreviewSlotsResponse, PublishSlotsRequest, SlotRef, TimeSlot};
pub use user::{DeviceTokenRequest, RegisterUserRequest, UserProfile, UserSummary};
