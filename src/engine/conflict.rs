use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::{BookingRequest, DateSpan, Guest, RoomState};

use super::EngineError;

/// A booking request that passed the stateless checks: all six fields
/// present and non-empty, dates parsed, range direction correct. Room
/// resolution and the overlap check need engine state and happen later.
pub(crate) struct ValidatedBooking {
    pub guest: Guest,
    pub room_id: String,
    pub span: DateSpan,
}

/// Fail-fast validation, in order: field presence, date syntax, range
/// direction. Returns on the first failure.
pub(crate) fn validate_request(req: &BookingRequest) -> Result<ValidatedBooking, EngineError> {
    let (
        Some(user_name),
        Some(user_email),
        Some(phone_number),
        Some(room_id),
        Some(start_date),
        Some(end_date),
    ) = (
        required(&req.user_name),
        required(&req.user_email),
        required(&req.phone_number),
        required(&req.room_id),
        required(&req.start_date),
        required(&req.end_date),
    )
    else {
        return Err(EngineError::MissingFields);
    };

    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    if start >= end {
        return Err(EngineError::InvalidDateRange);
    }

    Ok(ValidatedBooking {
        guest: Guest {
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            phone_number: phone_number.to_string(),
        },
        room_id: room_id.to_string(),
        span: DateSpan::new(start, end),
    })
}

fn required(field: &Option<String>) -> Option<&str> {
    match field {
        Some(s) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Unparsable dates surface as the date-range error; the public surface has
/// no separate malformed-input response.
fn parse_date(s: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| EngineError::InvalidDateRange)
}

/// Scan a room's bookings for one overlapping `span` under the half-open
/// rule. Caller holds the room lock; first hit wins.
pub(crate) fn find_conflict(rs: &RoomState, span: &DateSpan) -> Option<Ulid> {
    rs.overlapping(span).next().map(|b| b.id)
}
