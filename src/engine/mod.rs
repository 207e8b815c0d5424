mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;

pub use availability::available_on;
pub use error::EngineError;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, mpsc, oneshot};
use ulid::Ulid;

use crate::model::*;
use crate::wal::Wal;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

// ── Group-commit WAL channel ─────────────────────────────

pub(super) enum WalCommand {
    Append {
        event: Event,
        response: oneshot::Sender<io::Result<()>>,
    },
}

/// Background task that owns the WAL and batches appends for group commit.
/// 1. Block until the first Append arrives.
/// 2. Buffer it (no fsync).
/// 3. Drain all immediately available Appends (the batch window).
/// 4. Single flush_sync for the whole batch.
/// 5. Respond to all senders.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(WalCommand::Append { event, response }) = rx.recv().await {
        let mut batch = vec![(event, response)];

        // Drain all immediately available appends
        while let Ok(WalCommand::Append { event, response }) = rx.try_recv() {
            batch.push((event, response));
        }

        metrics::histogram!(crate::observability::WAL_FLUSH_BATCH_SIZE)
            .record(batch.len() as f64);
        let flush_start = std::time::Instant::now();
        let result = flush_batch(&mut wal, &batch);
        metrics::histogram!(crate::observability::WAL_FLUSH_DURATION_SECONDS)
            .record(flush_start.elapsed().as_secs_f64());
        respond_batch(batch, &result);
    }
}

fn flush_batch(wal: &mut Wal, batch: &[(Event, oneshot::Sender<io::Result<()>>)]) -> io::Result<()> {
    let mut append_err: Option<io::Error> = None;
    for (event, _) in batch {
        if let Err(e) = wal.append_buffered(event) {
            append_err = Some(e);
            break;
        }
    }
    // Always flush — even on append error — so partially buffered bytes
    // don't leak into the next batch (callers were told this batch failed).
    let flush_err = wal.flush_sync().err();
    if let Some(e) = append_err {
        return Err(e);
    }
    if let Some(e) = flush_err {
        return Err(e);
    }
    Ok(())
}

fn respond_batch(batch: Vec<(Event, oneshot::Sender<io::Result<()>>)>, result: &io::Result<()>) {
    for (_, tx) in batch {
        let r = match result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(r);
    }
}

/// Apply an event directly to a RoomState (no locking — caller holds the lock).
fn apply_to_room(rs: &mut RoomState, event: &Event) {
    match event {
        Event::BookingCreated {
            id, guest, span, ..
        } => {
            rs.insert_booking(Booking {
                id: *id,
                guest: guest.clone(),
                span: *span,
            });
        }
        // RoomCreated is handled at the room-table level, not here
        Event::RoomCreated { .. } => {}
    }
}

/// The booking engine: the room table plus the durable log behind it.
///
/// Rooms live in a DashMap of per-room `RwLock`s. All writes to one room go
/// through its write lock, which is what serializes the overlap check against
/// the insert (see `mutations::book`). Requests for different rooms never
/// contend.
pub struct Engine {
    rooms: DashMap<Ulid, SharedRoomState>,
    /// room_number → room id. Guards the uniqueness invariant.
    room_numbers: DashMap<String, Ulid>,
    wal_tx: mpsc::Sender<WalCommand>,
}

impl Engine {
    /// Open the WAL at `wal_path`, replay it into memory, and start the
    /// group-commit writer task. Must run inside a tokio runtime.
    pub fn open(wal_path: PathBuf) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let engine = Self {
            rooms: DashMap::new(),
            room_numbers: DashMap::new(),
            wal_tx,
        };

        // Replay events — we're the sole owner of these Arcs, so try_write
        // always succeeds instantly (no contention). Never use blocking_write
        // here because this runs inside an async context.
        for event in &events {
            match event {
                Event::RoomCreated {
                    id,
                    room_number,
                    room_type,
                    price_per_night,
                    bedrooms_count,
                } => {
                    let rs = RoomState::new(
                        *id,
                        room_number.clone(),
                        room_type.clone(),
                        *price_per_night,
                        *bedrooms_count,
                    );
                    engine.rooms.insert(*id, Arc::new(RwLock::new(rs)));
                    engine.room_numbers.insert(room_number.clone(), *id);
                }
                Event::BookingCreated { room_id, .. } => {
                    if let Some(entry) = engine.rooms.get(room_id) {
                        let rs_arc = entry.value().clone();
                        let mut guard = rs_arc.try_write().expect("replay: uncontended write");
                        apply_to_room(&mut guard, event);
                    }
                }
            }
        }

        Ok(engine)
    }

    /// Write event to WAL via the background group-commit writer.
    async fn wal_append(&self, event: &Event) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                event: event.clone(),
                response: tx,
            })
            .await
            .map_err(|_| EngineError::WalError("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::WalError("WAL writer dropped response".into()))?
            .map_err(|e| EngineError::WalError(e.to_string()))
    }

    pub fn get_room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_id_by_number(&self, room_number: &str) -> Option<Ulid> {
        self.room_numbers.get(room_number).map(|e| *e.value())
    }

    /// WAL-append + apply in one call. The caller holds the room's write
    /// lock, so a WAL failure leaves no in-memory change behind.
    pub(super) async fn persist_and_apply(
        &self,
        rs: &mut RoomState,
        event: &Event,
    ) -> Result<(), EngineError> {
        self.wal_append(event).await?;
        apply_to_room(rs, event);
        Ok(())
    }
}
