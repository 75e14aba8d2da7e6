//! # Slot Generator
//!
//! Splits a day's opening window into consecutive slots of a fixed length.
//!
//! Generation steps from the start time in `duration` increments for as long as the
//! step begins before the end time. The window does not have to be an exact multiple
//! of the duration: the last slot is emitted at full length even when it runs past
//! the closing time, so `09:00-09:50` at 30 minutes yields `09:00-09:30` and
//! `09:30-10:00`.

use crate::errors::{BookingError, BookingResult};
use crate::models::{SlotDuration, SlotTime, TimeSlot};

/// Generates the ordered slots covering `[start, end)`.
///
/// # Errors
///
/// * `BookingError::Validation` - `start` is not strictly earlier than `end`
pub fn generate(
    start: SlotTime,
    end: SlotTime,
    duration: SlotDuration,
) -> BookingResult<Vec<TimeSlot>> {
    if start >= end {
        return Err(BookingError::Validation(format!(
            "Start time {} must be earlier than end time {}",
            start, end
        )));
    }

    let step = duration.minutes();
    let mut slots = Vec::new();
    let mut cursor = start;
    let mut index = 0;

    while cursor < end {
        let slot_end = cursor.plus_minutes(step);
        slots.push(TimeSlot::open(index, cursor, slot_end));
        cursor = slot_end;
        index += 1;
    }

    Ok(slots)
}

/// Validates raw admin input and generates the slots for it.
pub fn generate_from_input(
    start_time: &str,
    end_time: &str,
    duration_minutes: u32,
) -> BookingResult<Vec<TimeSlot>> {
    let start = SlotTime::parse(start_time)?;
    let end = SlotTime::parse(end_time)?;
    let duration = SlotDuration::try_from(duration_minutes)?;

    generate(start, end, duration)
}
