//! Error types for the battle engine.

use std::error::Error;
use std::fmt;

use tandem_core::{BattlerId, PartyIndex};

/// Errors returned by [`Battle::issue`](crate::Battle::issue).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueError {
    /// The battler id is outside the battle.
    UnknownBattler {
        /// The rejected id.
        battler: BattlerId,
    },
    /// No partner controller is assigned to the battler.
    NoController {
        /// The battler.
        battler: BattlerId,
    },
    /// The previous command has not signalled completion.
    Busy {
        /// The battler.
        battler: BattlerId,
    },
    /// The command has no opcode byte.
    Empty,
    /// The command does not fit the channel.
    TooLong {
        /// Command length.
        len: usize,
        /// Channel capacity.
        capacity: usize,
    },
}

impl fmt::Display for IssueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBattler { battler } => write!(f, "battler {battler} is out of range"),
            Self::NoController { battler } => {
                write!(f, "battler {battler} has no partner controller")
            }
            Self::Busy { battler } => {
                write!(f, "battler {battler} has not completed its last command")
            }
            Self::Empty => write!(f, "command has no opcode"),
            Self::TooLong { len, capacity } => {
                write!(f, "command of {len} bytes exceeds channel capacity {capacity}")
            }
        }
    }
}

impl Error for IssueError {}

/// Errors returned by [`Battle::assign_partner`](crate::Battle::assign_partner).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The battler id is outside the battle.
    UnknownBattler {
        /// The rejected id.
        battler: BattlerId,
    },
    /// The party index does not address a slot.
    InvalidPartyIndex {
        /// The rejected index.
        index: PartyIndex,
    },
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBattler { battler } => write!(f, "battler {battler} is out of range"),
            Self::InvalidPartyIndex { index } => write!(f, "party index {index} is out of range"),
        }
    }
}

impl Error for AssignError {}

/// Errors from the [`TaskScheduler`](crate::scheduler::TaskScheduler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerError {
    /// Every task slot is live.
    Full {
        /// Slot count.
        capacity: usize,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { capacity } => write!(f, "all {capacity} task slots are in use"),
        }
    }
}

impl Error for SchedulerError {}
