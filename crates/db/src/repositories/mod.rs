//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an executor, for helpers shared with transactions)
//! as the first argument.

pub mod interview_request_repo;
pub mod roster_repo;
pub mod stall_repo;

pub use interview_request_repo::InterviewRequestRepo;
pub use roster_repo::{RosterFilter, RosterRepo, RosterScope};
pub use stall_repo::StallRepo;
