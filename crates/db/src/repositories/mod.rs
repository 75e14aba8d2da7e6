pub mod day_slots;
pub mod pair_booking;
pub mod user;
