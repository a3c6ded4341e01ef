//! Interview status state machine.
//!
//! ```text
//! Scheduled --start--> InProgress --finish--> Completed
//!     |                    |
//!     +------cancel--------+------cancel----> Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Leaving the active set
//! (`Scheduled`, `InProgress`) releases the entry's queue position, so the
//! caller must renumber the queue when [`Transition::releases_position`] holds.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid interview status '{s}'. \
                 Must be one of: scheduled, in_progress, completed, cancelled"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the entry still occupies a queue position.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl TryFrom<String> for InterviewStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A lifecycle action requested by a stall operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Start,
    Finish,
    Cancel,
}

impl LifecycleAction {
    /// The status this action moves an interview into.
    pub fn target(self) -> InterviewStatus {
        match self {
            Self::Start => InterviewStatus::InProgress,
            Self::Finish => InterviewStatus::Completed,
            Self::Cancel => InterviewStatus::Cancelled,
        }
    }
}

/// An accepted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: InterviewStatus,
    pub to: InterviewStatus,
}

impl Transition {
    /// Whether the entry drops out of position accounting.
    pub fn releases_position(&self) -> bool {
        self.from.is_active() && !self.to.is_active()
    }
}

/// Check `action` against the state machine.
///
/// Fails with [`CoreError::InvalidTransition`] for any action from a terminal
/// state and for `finish` on an interview that has not started.
pub fn apply(from: InterviewStatus, action: LifecycleAction) -> Result<Transition, CoreError> {
    use self::InterviewStatus::*;

    let to = action.target();
    let allowed = matches!(
        (from, action),
        (Scheduled, LifecycleAction::Start)
            | (InProgress, LifecycleAction::Finish)
            | (Scheduled | InProgress, LifecycleAction::Cancel)
    );

    if allowed {
        Ok(Transition { from, to })
    } else {
        Err(CoreError::InvalidTransition {
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}
