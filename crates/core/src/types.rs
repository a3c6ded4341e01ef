/// Stall, queue, request, student and company identifiers (`BIGSERIAL` / `BIGINT`).
pub type DbId = i64;

/// Scheduled, actual and audit times, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
