//! # PairSlot Core
//!
//! Domain types and rules for pair slot booking: the slot generator, the booking
//! engine, the storage ports it runs against and the push notification contract.

pub mod booking;
pub mod errors;
pub mod models;
pub mod notify;
pub mod slots;
pub mod store;

pub use booking::{ApprovalPolicy, BookingFilter, PairSlotService};
pub use errors::{BookingError, BookingResult};
