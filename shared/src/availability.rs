//! Derived room availability.
//!
//! A room is unavailable while at least one active reservation (pending,
//! confirmed or checked in) lists it. Historical reservations still count
//! towards the per-room reservation badge.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Reservation, RoomId};

/// Availability summary for a single room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAvailability {
    pub room_id: RoomId,
    pub available: bool,
    pub days_remaining: Option<i64>,
    pub reservations_count: usize,
}

impl RoomAvailability {
    pub fn compute(room_id: RoomId, reservations: &[Reservation], today: NaiveDate) -> Self {
        Self {
            room_id,
            available: !has_active_reservations(room_id, reservations),
            days_remaining: days_remaining_on(room_id, reservations, today),
            reservations_count: reservations_count(room_id, reservations),
        }
    }
}

pub fn has_active_reservations(room_id: RoomId, reservations: &[Reservation]) -> bool {
    reservations
        .iter()
        .any(|reservation| reservation.is_active() && reservation.references(room_id))
}

/// Whole days until the room frees up, evaluated against the local date.
pub fn days_remaining(room_id: RoomId, reservations: &[Reservation]) -> Option<i64> {
    days_remaining_on(room_id, reservations, Local::now().date_naive())
}

/// Whole days between `today` and the latest active check-out for the room.
///
/// Returns `None` when no active reservation references the room. Check-outs
/// already in the past report `Some(0)`, as do active reservations that carry
/// no usable check-out date.
pub fn days_remaining_on(
    room_id: RoomId,
    reservations: &[Reservation],
    today: NaiveDate,
) -> Option<i64> {
    let active = reservations
        .iter()
        .filter(|reservation| reservation.is_active() && reservation.references(room_id));
    days_until_latest_check_out(active, today)
}

pub fn reservations_count(room_id: RoomId, reservations: &[Reservation]) -> usize {
    reservations
        .iter()
        .filter(|reservation| reservation.references(room_id))
        .count()
}

/// `None` for an empty iterator; undated reservations are skipped when
/// picking the latest check-out.
fn days_until_latest_check_out<'a>(
    mut active: impl Iterator<Item = &'a Reservation>,
    today: NaiveDate,
) -> Option<i64> {
    let first = active.next()?;
    let latest = std::iter::once(first)
        .chain(active)
        .filter_map(|reservation| reservation.check_out_date)
        .fold(None::<NaiveDate>, |latest, check_out| match latest {
            Some(current) if check_out <= current => Some(current),
            _ => Some(check_out),
        });

    Some(match latest {
        Some(check_out) => (check_out - today).num_days().max(0),
        None => 0,
    })
}

/// Room -> reservations lookup built once per snapshot.
///
/// Answers the same queries as the free functions above without rescanning
/// the whole reservation list for every room.
#[derive(Debug, Default)]
pub struct ReservationIndex<'a> {
    by_room: HashMap<RoomId, Vec<&'a Reservation>>,
}

impl<'a> ReservationIndex<'a> {
    pub fn build(reservations: &'a [Reservation]) -> Self {
        let mut by_room: HashMap<RoomId, Vec<&'a Reservation>> = HashMap::new();

        for reservation in reservations {
            for room in &reservation.rooms {
                let entries = by_room.entry(room.id).or_default();
                let already_indexed = entries
                    .last()
                    .is_some_and(|last| std::ptr::eq(*last, reservation));
                if !already_indexed {
                    entries.push(reservation);
                }
            }
        }

        Self { by_room }
    }

    fn for_room(&self, room_id: RoomId) -> &[&'a Reservation] {
        self.by_room
            .get(&room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_active_reservations(&self, room_id: RoomId) -> bool {
        self.for_room(room_id)
            .iter()
            .any(|reservation| reservation.is_active())
    }

    pub fn days_remaining_on(&self, room_id: RoomId, today: NaiveDate) -> Option<i64> {
        let active = self
            .for_room(room_id)
            .iter()
            .copied()
            .filter(|reservation| reservation.is_active());
        days_until_latest_check_out(active, today)
    }

    pub fn reservations_count(&self, room_id: RoomId) -> usize {
        self.for_room(room_id).len()
    }

    pub fn availability(&self, room_id: RoomId, today: NaiveDate) -> RoomAvailability {
        RoomAvailability {
            room_id,
            available: !self.has_active_reservations(room_id),
            days_remaining: self.days_remaining_on(room_id, today),
            reservations_count: self.reservations_count(room_id),
        }
    }
}
