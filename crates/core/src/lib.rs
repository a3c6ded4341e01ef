//! Domain logic for the career-fair interview queue.
//!
//! Zero internal dependencies: everything here is pure and shared by the
//! repository layer and the HTTP service.

pub mod error;
pub mod lifecycle;
pub mod priority;
pub mod queue_order;
pub mod queue_view;
pub mod types;
