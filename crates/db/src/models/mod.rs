//! Row models and input DTOs.

pub mod interview_request;
pub mod stall;
