use chrono::NaiveDate;

use crate::model::RoomState;

// ── Availability ─────────────────────────────────────────────────

/// A room is available on `day` if no booking's span covers it. Spans are
/// half-open, so a room whose guest checks out on `day` is available.
///
/// Bookings are sorted by start date; anything starting after `day` cannot
/// cover it, and the first covering booking short-circuits the scan.
pub fn available_on(room: &RoomState, day: NaiveDate) -> bool {
    !room
        .bookings
        .iter()
        .take_while(|b| b.span.start <= day)
        .any(|b| b.span.contains_day(day))
}
