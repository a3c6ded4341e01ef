//! Response envelope types for API handlers.
//!
//! Every success payload is wrapped as `{ "data": ... }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload for count endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
