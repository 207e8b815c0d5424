use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open calendar-date interval `[start, end)`.
///
/// `end` is the checkout day: a stay ending on day D leaves the room free on
/// D, and does not collide with a stay starting on D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start < end, "DateSpan start must be before end");
        Self { start, end }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `day` falls inside the stay. The checkout day does not.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }
}

/// Contact details captured with a booking. Opaque strings, stored verbatim;
/// the engine never validates their format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub user_name: String,
    pub user_email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub guest: Guest,
    pub span: DateSpan,
}

#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: Ulid,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub bedrooms_count: u32,
    /// All bookings on this room, sorted by `span.start`.
    pub bookings: Vec<Booking>,
}

impl RoomState {
    pub fn new(
        id: Ulid,
        room_number: String,
        room_type: String,
        price_per_night: f64,
        bedrooms_count: u32,
    ) -> Self {
        Self {
            id,
            room_number,
            room_type,
            price_per_night,
            bedrooms_count,
            bookings: Vec::new(),
        }
    }

    /// Insert a booking maintaining sort order by span.start.
    pub fn insert_booking(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.span.start, |b| b.span.start)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    /// Return only bookings whose span overlaps the query window.
    /// Uses binary search to skip bookings starting at or after `query.end`.
    pub fn overlapping(&self, query: &DateSpan) -> impl Iterator<Item = &Booking> {
        // Everything at index >= right_bound starts at or after query.end → can't overlap.
        let right_bound = self.bookings.partition_point(|b| b.span.start < query.end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.span.end > query.start)
    }
}

/// The event types — flat, no nesting. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    RoomCreated {
        id: Ulid,
        room_number: String,
        room_type: String,
        price_per_night: f64,
        bedrooms_count: u32,
    },
    BookingCreated {
        id: Ulid,
        room_id: Ulid,
        guest: Guest,
        span: DateSpan,
    },
}

// ── Query result types ───────────────────────────────────────────

/// Room summary as exposed by the availability query. `bedrooms_count` stays
/// internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomInfo {
    pub id: Ulid,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingInfo {
    pub id: Ulid,
    pub room_id: Ulid,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Raw booking request as received from the outside. Everything is optional
/// here so that field presence is checked by the engine, in validation order,
/// rather than by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub phone_number: Option<String>,
    pub room_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
