//! Stall and queue rows. Provisioned externally; read-only here.

use careerfair_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `stalls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stall {
    pub id: DbId,
    pub room_id: DbId,
    pub company_id: DbId,
    pub stall_number: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stall joined with its (optional) queue.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct StallQueue {
    pub stall_id: DbId,
    pub room_id: DbId,
    pub company_id: DbId,
    pub queue_id: Option<DbId>,
}

/// A stall whose queue is known to exist.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolvedQueue {
    pub stall_id: DbId,
    pub company_id: DbId,
    pub queue_id: DbId,
}
