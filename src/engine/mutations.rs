use std::sync::Arc;

use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::*;

use super::conflict::{find_conflict, validate_request};
use super::{Engine, EngineError};

impl Engine {
    /// Register a room. Seed/admin path, not reachable from the HTTP
    /// surface; rooms are immutable once created.
    pub async fn create_room(
        &self,
        id: Ulid,
        room_number: impl Into<String>,
        room_type: impl Into<String>,
        price_per_night: f64,
        bedrooms_count: u32,
    ) -> Result<(), EngineError> {
        let room_number = room_number.into();
        let room_type = room_type.into();
        if !price_per_night.is_finite() || price_per_night < 0.0 {
            return Err(EngineError::InvalidRoom("price_per_night must be non-negative"));
        }
        if self.rooms.contains_key(&id) {
            return Err(EngineError::AlreadyExists(id));
        }
        if self.room_numbers.contains_key(&room_number) {
            return Err(EngineError::DuplicateRoomNumber(room_number));
        }

        let event = Event::RoomCreated {
            id,
            room_number: room_number.clone(),
            room_type: room_type.clone(),
            price_per_night,
            bedrooms_count,
        };
        self.wal_append(&event).await?;
        let rs = RoomState::new(id, room_number.clone(), room_type, price_per_night, bedrooms_count);
        self.rooms.insert(id, Arc::new(RwLock::new(rs)));
        self.room_numbers.insert(room_number, id);
        Ok(())
    }

    /// Create a booking. Validation is fail-fast in fixed order: field
    /// presence, date range, room resolution, overlap.
    ///
    /// The overlap check, the WAL append, and the in-memory insert all run
    /// under the room's write lock — two concurrent attempts on the same
    /// room serialize, and the loser sees the winner's booking. A WAL
    /// failure aborts before the insert, leaving no partial booking.
    pub async fn book(&self, req: &BookingRequest) -> Result<Ulid, EngineError> {
        let valid = validate_request(req)?;
        let room_id = Ulid::from_string(&valid.room_id)
            .map_err(|_| EngineError::RoomNotFound(valid.room_id.clone()))?;
        let rs = self
            .get_room(&room_id)
            .ok_or_else(|| EngineError::RoomNotFound(valid.room_id.clone()))?;

        let mut guard = rs.write().await;
        if let Some(existing) = find_conflict(&guard, &valid.span) {
            return Err(EngineError::DoubleBooked {
                conflicting: existing,
            });
        }

        let id = Ulid::new();
        let event = Event::BookingCreated {
            id,
            room_id,
            guest: valid.guest,
            span: valid.span,
        };
        self.persist_and_apply(&mut guard, &event).await?;
        Ok(id)
    }
}
