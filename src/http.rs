use std::sync::Arc;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::{Engine, EngineError};
use crate::model::{BookingRequest, RoomInfo};
use crate::observability;

#[derive(Serialize)]
struct RoomsResponse {
    rooms: Vec<RoomInfo>,
}

/// Build the application router: the two public endpoints, CORS locked to a
/// single origin, request logging.
pub fn router(engine: Arc<Engine>, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/book-room", post(book_room))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// `GET /rooms` — rooms with no booking covering today. The clock is read
/// here, at the edge; the engine only ever sees an explicit date.
async fn list_rooms(State(engine): State<Arc<Engine>>) -> Json<RoomsResponse> {
    metrics::counter!(observability::AVAILABILITY_QUERIES_TOTAL).increment(1);
    let today = Local::now().date_naive();
    let rooms = engine.list_available_rooms(today).await;
    Json(RoomsResponse { rooms })
}

/// `POST /book-room` — create a booking unless validation or the overlap
/// check says otherwise.
async fn book_room(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<BookingRequest>,
) -> Response {
    match engine.book(&req).await {
        Ok(id) => {
            metrics::counter!(observability::BOOKINGS_TOTAL).increment(1);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Room booked successfully",
                    "booking_id": id.to_string(),
                })),
            )
                .into_response()
        }
        Err(err) => {
            metrics::counter!(observability::BOOKINGS_REJECTED_TOTAL, "reason" => err.label())
                .increment(1);
            reject(err)
        }
    }
}

/// Map engine failures onto the public error surface. Anything outside the
/// four client-facing kinds is a server-side failure and stays opaque.
fn reject(err: EngineError) -> Response {
    let (status, message) = match &err {
        EngineError::MissingFields => (StatusCode::BAD_REQUEST, "Missing required fields"),
        EngineError::InvalidDateRange => (StatusCode::BAD_REQUEST, "Invalid date range"),
        EngineError::RoomNotFound(_) => (StatusCode::NOT_FOUND, "Room not found"),
        EngineError::DoubleBooked { .. } => (
            StatusCode::BAD_REQUEST,
            "Room is already booked for the selected dates",
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("booking failed: {err}");
    } else {
        tracing::debug!("booking rejected: {err}");
    }

    (status, Json(json!({ "error": message }))).into_response()
}
