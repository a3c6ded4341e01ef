pub mod interviews;
pub mod queue;
pub mod roster;
