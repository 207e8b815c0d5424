use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    /// One or more of the six required booking fields is absent or empty.
    MissingFields,
    /// start_date is not strictly before end_date, or a date failed to parse.
    InvalidDateRange,
    /// The requested room id does not resolve. Carries the id verbatim.
    RoomNotFound(String),
    /// The requested span overlaps an existing booking on the same room.
    DoubleBooked { conflicting: Ulid },
    AlreadyExists(Ulid),
    DuplicateRoomNumber(String),
    InvalidRoom(&'static str),
    WalError(String),
}

impl EngineError {
    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EngineError::MissingFields => "missing_fields",
            EngineError::InvalidDateRange => "invalid_date_range",
            EngineError::RoomNotFound(_) => "room_not_found",
            EngineError::DoubleBooked { .. } => "double_booked",
            EngineError::AlreadyExists(_) => "already_exists",
            EngineError::DuplicateRoomNumber(_) => "duplicate_room_number",
            EngineError::InvalidRoom(_) => "invalid_room",
            EngineError::WalError(_) => "wal_error",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MissingFields => write!(f, "missing required fields"),
            EngineError::InvalidDateRange => write!(f, "invalid date range"),
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::DoubleBooked { conflicting } => {
                write!(f, "dates conflict with booking: {conflicting}")
            }
            EngineError::AlreadyExists(id) => write!(f, "room already exists: {id}"),
            EngineError::DuplicateRoomNumber(n) => {
                write!(f, "room number already taken: {n}")
            }
            EngineError::InvalidRoom(msg) => write!(f, "invalid room: {msg}"),
            EngineError::WalError(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
