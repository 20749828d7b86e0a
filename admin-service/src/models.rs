use serde::{Deserialize, Serialize};
use shared::{Room, RoomAvailability, RoomFilter};

/// List endpoints answer either with a bare array or a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomQuery {
    pub search: String,
    pub floor: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: String,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl RoomQuery {
    pub fn filter(&self) -> RoomFilter {
        RoomFilter::new(
            self.search.as_str(),
            self.floor.as_str(),
            self.room_type.as_str(),
            self.status.as_str(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct RoomView {
    #[serde(flatten)]
    pub room: Room,
    pub available: bool,
    pub days_remaining: Option<i64>,
    pub reservations_count: usize,
}

impl RoomView {
    pub fn new(room: Room, availability: RoomAvailability) -> Self {
        Self {
            room,
            available: availability.available,
            days_remaining: availability.days_remaining,
            reservations_count: availability.reservations_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
