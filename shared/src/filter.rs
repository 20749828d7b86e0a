use serde::{Deserialize, Serialize};

use crate::Room;

/// Search and filter criteria for the room tables.
///
/// Identifier criteria are kept as strings so that an empty value means
/// "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomFilter {
    pub search: String,
    pub floor: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: String,
}

impl RoomFilter {
    pub fn new(
        search: impl Into<String>,
        floor: impl Into<String>,
        room_type: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            floor: floor.into(),
            room_type: room_type.into(),
            status: status.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.floor.is_empty()
            && self.room_type.is_empty()
            && self.status.is_empty()
    }

    pub fn matches(&self, room: &Room) -> bool {
        self.matches_text(room)
            && id_matches(&self.floor, room.floor_id)
            && id_matches(&self.room_type, room.room_type_id)
            && id_matches(&self.status, room.room_status_id)
    }

    /// Rooms satisfying every criterion, in their original order.
    pub fn apply<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        rooms.iter().filter(|room| self.matches(room)).collect()
    }

    fn matches_text(&self, room: &Room) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        [
            room.number.as_str(),
            room.room_type_name(),
            room.notes.as_deref().unwrap_or(""),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

fn id_matches(filter: &str, id: Option<i64>) -> bool {
    filter.is_empty() || id.is_some_and(|id| id.to_string() == filter)
}

pub fn filter_rooms(
    rooms: &[Room],
    search_term: &str,
    filter_floor: &str,
    filter_type: &str,
    filter_status: &str,
) -> Vec<Room> {
    RoomFilter::new(search_term, filter_floor, filter_type, filter_status)
        .apply(rooms)
        .into_iter()
        .cloned()
        .collect()
}
