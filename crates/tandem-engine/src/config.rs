//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the constructor input for a [`Battle`](crate::Battle).
//! [`validate()`](EngineConfig::validate) checks structural invariants
//! before any participant is created.

use std::error::Error;
use std::fmt;

use tandem_core::{TrainerPic, MAX_LEVEL};

/// Back pic used for the Steven partner profile.
pub const STEVEN_BACK_PIC: u16 = 5;

/// Highest task capacity a [`TaskId`](tandem_core::TaskId) can address.
pub const MAX_TASK_CAPACITY: usize = u8::MAX as usize + 1;

// ── BattleFlags ────────────────────────────────────────────────────

/// Battle type bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BattleFlags(pub u16);

impl BattleFlags {
    /// Two battlers per side.
    pub const DOUBLE: Self = Self(1 << 0);
    /// Two trainers per side, each owning one battler.
    pub const MULTI: Self = Self(1 << 1);

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for BattleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ── PartnerProfile ─────────────────────────────────────────────────

/// Which trainer graphic the partner uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartnerProfile {
    /// The scripted Steven partner. Back pic.
    Steven,
    /// A custom partner with its own back pic.
    Custom {
        /// Back pic id.
        sprite_id: u16,
    },
    /// A frontier tag partner. Front pic, flipped.
    Frontier {
        /// Frontier trainer id.
        trainer_id: u16,
        /// Front pic id for that trainer.
        front_pic: u16,
    },
}

impl PartnerProfile {
    /// The graphic to draw.
    pub fn trainer_pic(self) -> TrainerPic {
        match self {
            Self::Steven => TrainerPic::Back(STEVEN_BACK_PIC),
            Self::Custom { sprite_id } => TrainerPic::Back(sprite_id),
            Self::Frontier { front_pic, .. } => TrainerPic::Front(front_pic),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A multi battle must also be a double battle.
    MultiWithoutDouble,
    /// Task capacity is zero or larger than a task id can address.
    InvalidTaskCapacity {
        /// The configured capacity.
        configured: usize,
    },
    /// Max level is zero or above the level cap.
    InvalidMaxLevel {
        /// The configured level.
        configured: u8,
    },
    /// The party status summary would never time out.
    InvalidSummaryTicks {
        /// The configured minimum.
        configured: u16,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiWithoutDouble => write!(f, "multi battle flag requires the double flag"),
            Self::InvalidTaskCapacity { configured } => write!(
                f,
                "max_tasks must be in 1..={MAX_TASK_CAPACITY}, got {configured}"
            ),
            Self::InvalidMaxLevel { configured } => {
                write!(f, "max_level must be in 1..={MAX_LEVEL}, got {configured}")
            }
            Self::InvalidSummaryTicks { configured } => write!(
                f,
                "status_summary_min_ticks {configured} leaves no room for the elapsed counter"
            ),
        }
    }
}

impl Error for ConfigError {}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Battle type bits. Default: empty (single battle).
    pub flags: BattleFlags,
    /// Partner trainer graphic. Default: [`PartnerProfile::Steven`].
    pub partner: PartnerProfile,
    /// Minimum ticks the party status summary stays up. Default: 93.
    pub status_summary_min_ticks: u16,
    /// Ticks before the experience bar starts moving. Default: 13.
    pub exp_bar_delay: i16,
    /// Ticks the intro waits before sending out. Default: 24.
    pub intro_ball_delay: i16,
    /// Ticks of hit blinking. Default: 32.
    pub hit_blink_frames: u8,
    /// Highest level a member can reach. Default: 100.
    pub max_level: u8,
    /// Task slots. Default: 16.
    pub max_tasks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flags: BattleFlags::default(),
            partner: PartnerProfile::Steven,
            status_summary_min_ticks: 93,
            exp_bar_delay: 13,
            intro_ball_delay: 24,
            hit_blink_frames: 32,
            max_level: MAX_LEVEL,
            max_tasks: 16,
        }
    }
}

impl EngineConfig {
    /// Whether two battlers fight per side.
    pub fn is_double(&self) -> bool {
        self.flags.contains(BattleFlags::DOUBLE)
    }

    /// Whether each battler on a side belongs to a different trainer.
    pub fn is_multi(&self) -> bool {
        self.flags.contains(BattleFlags::MULTI)
    }

    /// Whether a send-out also brings out the flank battler.
    pub fn sends_out_flank(&self) -> bool {
        self.is_double() && !self.is_multi()
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Multi implies double.
        if self.is_multi() && !self.is_double() {
            return Err(ConfigError::MultiWithoutDouble);
        }
        // 2. Task slots addressable by a u8 id.
        if self.max_tasks == 0 || self.max_tasks > MAX_TASK_CAPACITY {
            return Err(ConfigError::InvalidTaskCapacity {
                configured: self.max_tasks,
            });
        }
        // 3. Level cap.
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(ConfigError::InvalidMaxLevel {
                configured: self.max_level,
            });
        }
        // 4. The summary counter must be able to pass the minimum.
        if self.status_summary_min_ticks == u16::MAX {
            return Err(ConfigError::InvalidSummaryTicks {
                configured: self.status_summary_min_ticks,
            });
        }
        Ok(())
    }
}
