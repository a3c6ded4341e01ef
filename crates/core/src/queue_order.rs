//! Admission planning for a stall's live queue.
//!
//! The repository layer loads the active entries of a queue (ordered by
//! position) under a per-queue lock, asks this module where a new request
//! goes, and writes back the resulting positions in the same transaction.
//!
//! Positions are dense: the active entries of a queue always hold exactly
//! `1..=N`. A new entry joins at the end of its own tier's run, so arrival
//! order is preserved inside a tier and walk-ins always land last.

use crate::error::CoreError;
use crate::priority::Tier;
use crate::types::DbId;

/// An active queue entry as seen by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEntry {
    pub id: DbId,
    pub tier: Tier,
    pub position: i32,
}

/// A position to write back for an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionAssignment {
    pub id: DbId,
    pub position: i32,
}

/// Result of planning an admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
    /// Zero-based index of the new entry in the resulting order.
    pub index: usize,
    /// Position assigned to the new entry.
    pub position: i32,
    /// Existing entries whose stored position changes.
    pub shifted: Vec<PositionAssignment>,
}

/// Index of the first entry whose tier sorts strictly after `new_tier`.
///
/// Returns the queue length when no such entry exists.
pub fn insertion_index(entries: &[ActiveEntry], new_tier: Tier) -> usize {
    entries
        .iter()
        .position(|e| e.tier > new_tier)
        .unwrap_or(entries.len())
}

/// Plan the admission of a new entry of `new_tier`.
///
/// `entries` must be the queue's active entries ordered by position.
/// Every entry is renumbered into `1..=N+1`; only entries whose position
/// actually changes are reported in [`InsertionPlan::shifted`].
pub fn plan_insertion(entries: &[ActiveEntry], new_tier: Tier) -> Result<InsertionPlan, CoreError> {
    if new_tier == Tier::Buffer {
        return Err(CoreError::Validation(
            "Buffer is a display-only tier and cannot be enqueued".to_string(),
        ));
    }

    let index = insertion_index(entries, new_tier);

    let shifted = entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let slot = if i < index { i } else { i + 1 };
            let position = slot_to_position(slot);
            (e.position != position).then_some(PositionAssignment { id: e.id, position })
        })
        .collect();

    Ok(InsertionPlan {
        index,
        position: slot_to_position(index),
        shifted,
    })
}

/// Renumber `entries` (in their given order) to `1..=N`.
///
/// Used after an entry leaves the active set. Returns only the entries
/// whose position changes.
pub fn renumber(entries: &[ActiveEntry]) -> Vec<PositionAssignment> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let position = slot_to_position(i);
            (e.position != position).then_some(PositionAssignment { id: e.id, position })
        })
        .collect()
}

/// Enforce round gating for a new request.
///
/// `prior_round_completed` says whether the student has a completed request
/// at the tier immediately preceding `tier` at the same stall. Tiers without
/// a predecessor (round 1, walk-in) always pass.
pub fn check_round_gate(tier: Tier, prior_round_completed: bool) -> Result<(), CoreError> {
    match tier.preceding() {
        Some(prior) if !prior_round_completed => Err(CoreError::RoundGateViolation {
            required_round: prior.round().unwrap_or(1),
        }),
        _ => Ok(()),
    }
}

/// Check the queue invariants over active entries ordered by position:
/// positions are exactly `1..=N` and tiers never decrease.
pub fn verify_invariants(entries: &[ActiveEntry]) -> Result<(), CoreError> {
    for (i, e) in entries.iter().enumerate() {
        let expected = slot_to_position(i);
        if e.position != expected {
            return Err(CoreError::Internal(format!(
                "Queue positions are not dense: entry {} holds {} where {expected} was expected",
                e.id, e.position
            )));
        }
    }
    if let Some(pair) = entries.windows(2).find(|w| w[0].tier > w[1].tier) {
        return Err(CoreError::Internal(format!(
            "Queue tiers out of order: entry {} ({}) precedes entry {} ({})",
            pair[0].id,
            pair[0].tier.as_str(),
            pair[1].id,
            pair[1].tier.as_str()
        )));
    }
    Ok(())
}

fn slot_to_position(slot: usize) -> i32 {
    i32::try_from(slot + 1).unwrap_or(i32::MAX)
}
