use chrono::NaiveDate;
use pairslot_core::errors::BookingError;
use pairslot_core::models::pair_booking::{PairBooking, UserPair, listing_order};
use pairslot_core::models::{DaySlotSet, SlotDuration, SlotTime, TimeSlot};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use serde_test::{Token, assert_de_tokens_error, assert_tokens};
use uuid::Uuid;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

#[rstest]
#[case("00:00", 0)]
#[case("09:30", 570)]
#[case("23:59", 1439)]
fn test_slot_time_parses_minutes(#[case] value: &str, #[case] minutes: u32) {
    let time = SlotTime::parse(value).unwrap();
    assert_eq!(time.minutes(), minutes);
    assert_eq!(time.to_string(), value);
}

#[test]
fn test_slot_time_serializes_as_string() {
    assert_tokens(&SlotTime::from_minutes(570), &[Token::Str("09:30")]);
    assert_tokens(&SlotTime::from_minutes(1470), &[Token::Str("24:30")]);
}

#[test]
fn test_slot_time_rejects_garbage_on_deserialize() {
    assert_de_tokens_error::<SlotTime>(
        &[Token::Str("half past nine")],
        "Validation error: Invalid time 'half past nine'",
    );
}

#[rstest]
#[case("9:30")]
#[case("+9:30")]
#[case("09:3a")]
#[case("24:00")]
#[case("09:60")]
#[case("09.30")]
fn test_slot_time_parse_rejects(#[case] value: &str) {
    assert!(matches!(
        SlotTime::parse(value),
        Err(BookingError::Validation(_))
    ));
}

#[rstest]
#[case("\"+9:00\"")]
#[case("\"-1:00\"")]
#[case("\"99999999:00\"")]
#[case("\"4294967295:00\"")]
#[case("\"24:60\"")]
#[case("\"24:5\"")]
fn test_slot_time_deserialize_rejects_without_panicking(#[case] json: &str) {
    assert!(from_str::<SlotTime>(json).is_err());
}

#[rstest]
#[case("\"09:30\"", 570)]
#[case("\"24:30\"", 1470)]
#[case("\"100:00\"", 6000)]
fn test_slot_time_deserializes_past_midnight(#[case] json: &str, #[case] minutes: u32) {
    assert_eq!(from_str::<SlotTime>(json).unwrap().minutes(), minutes);
}

#[test]
fn test_slot_duration_only_accepts_allowed_values() {
    for minutes in SlotDuration::ALLOWED {
        assert_eq!(SlotDuration::try_from(minutes).unwrap().minutes(), minutes);
    }
    assert!(from_str::<SlotDuration>("25").is_err());
    assert_eq!(from_str::<SlotDuration>("40").unwrap().minutes(), 40);
}

#[test]
fn test_user_pair_is_unordered() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert_eq!(UserPair::new(a, b).unwrap(), UserPair::new(b, a).unwrap());

    let pair = UserPair::new(a, b).unwrap();
    assert_eq!(pair.other(a), Some(b));
    assert_eq!(pair.other(b), Some(a));
    assert_eq!(pair.other(Uuid::new_v4()), None);
    assert!(pair.involves_any(Uuid::new_v4(), b));
    assert!(!pair.involves_any(Uuid::new_v4(), Uuid::new_v4()));
}

#[test]
fn test_user_pair_rejects_same_user() {
    let a = Uuid::new_v4();
    assert!(matches!(UserPair::new(a, a), Err(BookingError::Conflict(_))));

    let duplicated = json!([a, a]);
    assert!(serde_json::from_value::<UserPair>(duplicated).is_err());
}

#[test]
fn test_slot_ref_stops_resolving_after_regeneration() {
    let slots = vec![
        TimeSlot::open(0, SlotTime::from_minutes(540), SlotTime::from_minutes(570)),
        TimeSlot::open(1, SlotTime::from_minutes(570), SlotTime::from_minutes(600)),
    ];
    let first = DaySlotSet::new(date(1), slots.clone());
    let slot_ref = first.slot_ref(1);

    assert_eq!(first.resolve(&slot_ref), first.slot(1));

    let regenerated = DaySlotSet::new(date(1), slots);
    assert_ne!(first.generation, regenerated.generation);
    assert_eq!(regenerated.resolve(&slot_ref), None);
    assert!(regenerated.slot(1).is_some());
}

#[test]
fn test_pending_booking_copies_slot_window() {
    let requester = Uuid::new_v4();
    let counterparty = Uuid::new_v4();
    let day = DaySlotSet::new(
        date(2),
        vec![TimeSlot::open(0, SlotTime::from_minutes(600), SlotTime::from_minutes(630))],
    );
    let slot = day.slot(0).unwrap();

    let booking = PairBooking::pending(day.date, day.slot_ref(0), slot, requester, counterparty).unwrap();

    assert_eq!(booking.start_time.to_string(), "10:00");
    assert_eq!(booking.end_time.to_string(), "10:30");
    assert_eq!(booking.requested_by, requester);
    assert!(!booking.is_approved);
    assert!(booking.is_participant(counterparty));
    assert!(booking.claims(date(2), slot.start_time, slot.end_time));
    assert!(!booking.claims(date(3), slot.start_time, slot.end_time));

    let value = to_value(&booking).unwrap();
    assert_eq!(value["start_time"], "10:00");
    assert_eq!(value["date"], "2024-05-02");
}

#[test]
fn test_listing_order_is_date_desc_then_start_asc() {
    let requester = Uuid::new_v4();
    let counterparty = Uuid::new_v4();
    let make = |day: u32, start: u32| {
        let slot = TimeSlot::open(0, SlotTime::from_minutes(start), SlotTime::from_minutes(start + 30));
        let set = DaySlotSet::new(date(day), vec![slot.clone()]);
        PairBooking::pending(set.date, set.slot_ref(0), &slot, requester, counterparty).unwrap()
    };

    let mut bookings = vec![make(1, 600), make(3, 660), make(3, 540), make(2, 600)];
    bookings.sort_by(listing_order);

    let order: Vec<(u32, u32)> = bookings
        .iter()
        .map(|b| (chrono::Datelike::day(&b.date), b.start_time.minutes()))
        .collect();
    assert_eq!(order, vec![(3, 540), (3, 660), (2, 600), (1, 600)]);
}
