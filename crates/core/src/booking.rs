//! # Pair Booking Engine
//!
//! [`PairSlotService`] owns the booking rules: publishing a day's slots, requesting,
//! approving and cancelling two-party bookings, and the per-pair availability and
//! listing queries.
//!
//! A booking starts pending. The participant who did not request it approves it,
//! which is terminal; either participant can cancel at any time, which deletes the
//! record. Cancelling an approved booking leaves the slot's booked flags in place.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::pair_booking::listing_order;
use crate::models::{BookingEntry, DaySlotSet, PairBooking, SlotTime, TimeSlot, UserSummary};
use crate::notify::{NotificationSender, PushMessage, SendOutcome};
use crate::slots;
use crate::store::{BookingRepository, SlotRepository, UserDirectory};

/// Whether the participant who requested a booking may also approve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalPolicy {
    pub allow_requester_approval: bool,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            allow_requester_approval: true,
        }
    }
}

/// Which of a viewer's bookings a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    Approved,
    PendingSent,
    PendingReceived,
}

impl BookingFilter {
    fn matches(self, booking: &PairBooking, viewer: Uuid) -> bool {
        match self {
            BookingFilter::Approved => booking.is_approved,
            BookingFilter::PendingSent => !booking.is_approved && booking.requested_by == viewer,
            BookingFilter::PendingReceived => {
                !booking.is_approved && booking.requested_by != viewer
            }
        }
    }
}

pub struct PairSlotService {
    slots: Arc<dyn SlotRepository>,
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn NotificationSender>,
    policy: ApprovalPolicy,
}

impl PairSlotService {
    /// Builds the service over a single store implementing every repository trait.
    pub fn new<S>(store: Arc<S>, notifier: Arc<dyn NotificationSender>, policy: ApprovalPolicy) -> Self
    where
        S: SlotRepository + BookingRepository + UserDirectory + 'static,
    {
        Self {
            slots: store.clone(),
            bookings: store.clone(),
            users: store,
            notifier,
            policy,
        }
    }

    pub fn from_parts(
        slots: Arc<dyn SlotRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationSender>,
        policy: ApprovalPolicy,
    ) -> Self {
        Self {
            slots,
            bookings,
            users,
            notifier,
            policy,
        }
    }

    pub fn users(&self) -> &Arc<dyn UserDirectory> {
        &self.users
    }

    /// Generates the slots for `date` and stores them, replacing any existing set.
    pub async fn publish_day(
        &self,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        duration_minutes: u32,
    ) -> BookingResult<DaySlotSet> {
        let slots = slots::generate_from_input(start_time, end_time, duration_minutes)?;
        let day = self.slots.replace_day(DaySlotSet::new(date, slots)).await?;

        info!(
            "Published {} slots for {} (generation {})",
            day.slots.len(),
            day.date,
            day.generation
        );
        Ok(day)
    }

    pub async fn day_slots(&self, date: NaiveDate) -> BookingResult<DaySlotSet> {
        self.slots
            .get_day(date)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("No slots published for {}", date)))
    }

    /// Records a pending booking of slot `slot_index` on `date` for the two users.
    ///
    /// # Errors
    ///
    /// * `BookingError::Conflict` - requester and counterparty are the same user, or
    ///   either already has a booking for the same window on that date
    /// * `BookingError::NotFound` - no slots for `date`, or no slot with that index
    pub async fn request_booking(
        &self,
        date: NaiveDate,
        slot_index: u32,
        requester: Uuid,
        counterparty: Uuid,
    ) -> BookingResult<PairBooking> {
        if requester == counterparty {
            return Err(BookingError::Conflict(
                "Cannot book a pair slot with yourself".to_string(),
            ));
        }

        let day = self.day_slots(date).await?;
        let slot = day.slot(slot_index).ok_or_else(|| {
            BookingError::NotFound(format!("Slot {} not found on {}", slot_index, date))
        })?;

        let booking = PairBooking::pending(date, day.slot_ref(slot_index), slot, requester, counterparty)?;
        let booking = self.bookings.insert_unclaimed(booking).await?;

        info!(
            "User {} requested slot {}-{} on {} with {} (booking {})",
            requester, booking.start_time, booking.end_time, date, counterparty, booking.id
        );

        self.notify(
            counterparty,
            PushMessage::new(
                "New pair slot request",
                format!(
                    "You have been invited to {} {}-{}",
                    booking.date, booking.start_time, booking.end_time
                ),
            ),
        );

        Ok(booking)
    }

    /// Approves a pending booking and marks its slot as booked by `approver`.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - no such booking, or its slot was regenerated away
    /// * `BookingError::Conflict` - the booking is already approved
    /// * `BookingError::Forbidden` - `approver` is not a participant, or is the
    ///   requester while the policy forbids self-approval
    pub async fn approve_booking(&self, booking_id: Uuid, approver: Uuid) -> BookingResult<PairBooking> {
        let booking = self.load_booking(booking_id).await?;

        if booking.is_approved {
            return Err(BookingError::Conflict(format!(
                "Pair booking {} is already approved",
                booking_id
            )));
        }
        if !booking.is_participant(approver) {
            return Err(BookingError::Forbidden(
                "Only a participant can approve this booking".to_string(),
            ));
        }
        if booking.requested_by == approver && !self.policy.allow_requester_approval {
            return Err(BookingError::Forbidden(
                "The requester cannot approve their own booking".to_string(),
            ));
        }

        let approved = self.bookings.commit_approval(booking_id, approver).await?;
        info!("User {} approved booking {}", approver, booking_id);

        if let Some(other) = approved.users.other(approver) {
            self.notify(
                other,
                PushMessage::new(
                    "Pair slot approved",
                    format!(
                        "Your booking for {} {}-{} was approved",
                        approved.date, approved.start_time, approved.end_time
                    ),
                ),
            );
        }

        Ok(approved)
    }

    /// Deletes a booking, pending or approved. The slot's booked flags are not reset.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - no such booking
    /// * `BookingError::Forbidden` - `caller` is not a participant
    pub async fn cancel_booking(&self, booking_id: Uuid, caller: Uuid) -> BookingResult<PairBooking> {
        let booking = self.load_booking(booking_id).await?;

        if !booking.is_participant(caller) {
            return Err(BookingError::Forbidden(
                "Only a participant can cancel this booking".to_string(),
            ));
        }

        if !self.bookings.delete_booking(booking_id).await? {
            return Err(BookingError::NotFound(format!(
                "Pair booking {} not found",
                booking_id
            )));
        }
        info!(
            "User {} cancelled booking {} (approved: {})",
            caller, booking_id, booking.is_approved
        );

        if let Some(other) = booking.users.other(caller) {
            self.notify(
                other,
                PushMessage::new(
                    "Pair slot cancelled",
                    format!(
                        "Your booking for {} {}-{} was cancelled",
                        booking.date, booking.start_time, booking.end_time
                    ),
                ),
            );
        }

        Ok(booking)
    }

    /// Slots on `date` that neither user has claimed in any booking.
    ///
    /// Availability is scoped to the pair: a slot booked by two other users is still
    /// offered.
    pub async fn available_slots(
        &self,
        date: NaiveDate,
        viewer: Uuid,
        counterparty: Uuid,
    ) -> BookingResult<Vec<TimeSlot>> {
        if viewer == counterparty {
            return Err(BookingError::Conflict(
                "Cannot look up pair slots with yourself".to_string(),
            ));
        }

        let Some(day) = self.slots.get_day(date).await? else {
            debug!("No slots published for {}", date);
            return Ok(Vec::new());
        };

        let claimed: HashSet<(SlotTime, SlotTime)> = self
            .bookings
            .bookings_on_date_involving(date, viewer, counterparty)
            .await?
            .iter()
            .map(|booking| (booking.start_time, booking.end_time))
            .collect();

        Ok(day
            .slots
            .into_iter()
            .filter(|slot| !claimed.contains(&(slot.start_time, slot.end_time)))
            .collect())
    }

    pub async fn approved_bookings(&self, viewer: Uuid) -> BookingResult<Vec<BookingEntry>> {
        self.list_bookings(viewer, BookingFilter::Approved).await
    }

    pub async fn pending_sent(&self, viewer: Uuid) -> BookingResult<Vec<BookingEntry>> {
        self.list_bookings(viewer, BookingFilter::PendingSent).await
    }

    pub async fn pending_received(&self, viewer: Uuid) -> BookingResult<Vec<BookingEntry>> {
        self.list_bookings(viewer, BookingFilter::PendingReceived).await
    }

    /// The viewer's bookings matching `filter`, newest date first and earliest start
    /// first within a date, each with the other participant's summary.
    pub async fn list_bookings(
        &self,
        viewer: Uuid,
        filter: BookingFilter,
    ) -> BookingResult<Vec<BookingEntry>> {
        let mut bookings: Vec<PairBooking> = self
            .bookings
            .bookings_for_user(viewer)
            .await?
            .into_iter()
            .filter(|booking| filter.matches(booking, viewer))
            .collect();
        bookings.sort_by(listing_order);

        let mut summaries: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
        let mut entries = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let counterparty = match booking.users.other(viewer) {
                Some(other) => {
                    if !summaries.contains_key(&other) {
                        let summary = self.users.get_user(other).await?.as_ref().map(UserSummary::from);
                        summaries.insert(other, summary);
                    }
                    summaries.get(&other).cloned().flatten()
                }
                None => None,
            };

            entries.push(BookingEntry {
                id: booking.id,
                date: booking.date,
                start_time: booking.start_time,
                end_time: booking.end_time,
                is_approved: booking.is_approved,
                counterparty,
            });
        }

        Ok(entries)
    }

    async fn load_booking(&self, booking_id: Uuid) -> BookingResult<PairBooking> {
        self.bookings
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Pair booking {} not found", booking_id)))
    }

    /// Delivers `message` to `recipient` on a background task. Never fails the caller.
    fn notify(&self, recipient: Uuid, message: PushMessage) {
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            let device_token = match users.get_user(recipient).await {
                Ok(user) => user.and_then(|user| user.device_token),
                Err(e) => {
                    warn!("Could not load push token for user {}: {}", recipient, e);
                    return;
                }
            };

            let Some(device_token) = device_token else {
                debug!("User {} has no device token, skipping '{}'", recipient, message.title);
                return;
            };

            match notifier.send(&device_token, &message).await {
                SendOutcome::Delivered(id) => debug!("Notified user {} ({})", recipient, id),
                SendOutcome::Skipped => {}
                SendOutcome::Failed(e) => {
                    warn!("Push notification to user {} failed: {}", recipient, e)
                }
            }
        });
    }
}
