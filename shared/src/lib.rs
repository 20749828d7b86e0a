use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod availability;
pub mod filter;
pub mod pagination;

mod lenient;

pub use availability::*;
pub use filter::*;
pub use pagination::*;

pub type RoomId = i64;
pub type ReservationId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStatus {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub number: String,
    #[serde(default)]
    pub floor_id: Option<i64>,
    #[serde(default)]
    pub room_type_id: Option<i64>,
    #[serde(default)]
    pub room_status_id: Option<i64>,
    #[serde(default)]
    pub beds: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub floor: Option<Floor>,
    #[serde(default)]
    pub room_type: Option<RoomType>,
    #[serde(default)]
    pub room_status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRoom {
    pub id: RoomId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::calendar_date")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::calendar_date")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(
        default,
        alias = "number_of_guests",
        alias = "guest_count",
        deserialize_with = "lenient::null_as_default"
    )]
    pub guests: i32,
    pub status: ReservationStatus,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub rooms: Vec<ReservationRoom>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReservationStatus {
    /// Pending, confirmed and checked-in reservations hold their rooms.
    pub fn is_active(&self) -> bool {
        match self {
            ReservationStatus::Pending
            | ReservationStatus::Confirmed
            | ReservationStatus::CheckedIn => true,
            ReservationStatus::CheckedOut | ReservationStatus::Cancelled => false,
        }
    }
}

impl Room {
    pub fn room_type_name(&self) -> &str {
        self.room_type
            .as_ref()
            .map(|room_type| room_type.name.as_str())
            .unwrap_or("")
    }
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn references(&self, room_id: RoomId) -> bool {
        self.rooms.iter().any(|room| room.id == room_id)
    }
}
