use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::{BookingInfo, RoomInfo};

use super::availability::available_on;
use super::{Engine, SharedRoomState};

impl Engine {
    /// Every room with no booking covering `today`. Room-table iteration
    /// order; order is not part of the contract. `today` is an explicit
    /// parameter so the query is testable without touching the clock.
    pub async fn list_available_rooms(&self, today: NaiveDate) -> Vec<RoomInfo> {
        // Clone the Arcs out first: room locks must not be awaited while a
        // DashMap shard reference is held.
        let rooms: Vec<SharedRoomState> =
            self.rooms.iter().map(|e| e.value().clone()).collect();

        let mut out = Vec::with_capacity(rooms.len());
        for rs in rooms {
            let guard = rs.read().await;
            if available_on(&guard, today) {
                out.push(RoomInfo {
                    id: guard.id,
                    room_number: guard.room_number.clone(),
                    room_type: guard.room_type.clone(),
                    price_per_night: guard.price_per_night,
                });
            }
        }
        out
    }

    /// All bookings on one room, in span-start order. Empty if the room id
    /// does not resolve.
    pub async fn bookings_for_room(&self, room_id: Ulid) -> Vec<BookingInfo> {
        let rs = match self.get_room(&room_id) {
            Some(rs) => rs,
            None => return Vec::new(),
        };
        let guard = rs.read().await;
        guard
            .bookings
            .iter()
            .map(|b| BookingInfo {
                id: b.id,
                room_id,
                start: b.span.start,
                end: b.span.end,
            })
            .collect()
    }
}
