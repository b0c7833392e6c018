//! Strongly-typed identifiers for battlers, party slots, tasks and ticks.

use std::fmt;

/// Maximum number of battlers on the field.
pub const MAX_BATTLERS: usize = 4;

/// Number of members in a party.
pub const PARTY_SIZE: usize = 6;

/// Identifies one battler slot on the field.
///
/// Positions are fixed: 0 player-left, 1 opponent-left, 2 player-right,
/// 3 opponent-right. The low bit selects the side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BattlerId(pub u8);

impl BattlerId {
    /// Player-side left slot.
    pub const PLAYER_LEFT: Self = Self(0);
    /// Opponent-side left slot.
    pub const OPPONENT_LEFT: Self = Self(1);
    /// Player-side right slot.
    pub const PLAYER_RIGHT: Self = Self(2);
    /// Opponent-side right slot.
    pub const OPPONENT_RIGHT: Self = Self(3);

    /// All battler slots in dispatch order.
    pub const ALL: [Self; MAX_BATTLERS] = [Self(0), Self(1), Self(2), Self(3)];

    /// The battler sharing this battler's side in a double battle.
    pub fn flank(self) -> Self {
        Self(self.0 ^ 2)
    }

    /// Which side of the field this battler stands on.
    pub fn side(self) -> Side {
        if self.0 & 1 == 0 {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// Single-bit mask for this battler, used by completion signals and
    /// absent-battler flags.
    pub fn bit(self) -> u8 {
        1 << self.0
    }

    /// Slot index into per-battler arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BattlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for BattlerId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Side of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The side the partner fights on.
    Player,
    /// The opposing side.
    Opponent,
}

/// Index of a member within a [`Party`](crate::mon::Party).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyIndex(pub u8);

impl PartyIndex {
    /// Slot index into the party array.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this index addresses a real party slot.
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < PARTY_SIZE
    }
}

impl fmt::Display for PartyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for PartyIndex {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Identifies a live task slot in the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u8);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for TaskId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Monotonically increasing frame counter.
///
/// Incremented once per [`Battle::tick`](../tandem_engine/struct.Battle.html).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Save arena generation.
///
/// Bumped on every relocation. Handles minted under an older generation
/// no longer resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u32);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Generation {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flank_pairs_same_side() {
        assert_eq!(BattlerId::PLAYER_LEFT.flank(), BattlerId::PLAYER_RIGHT);
        assert_eq!(BattlerId::OPPONENT_RIGHT.flank(), BattlerId::OPPONENT_LEFT);
        for b in BattlerId::ALL {
            assert_eq!(b.flank().side(), b.side());
            assert_eq!(b.flank().flank(), b);
        }
    }

    #[test]
    fn bits_are_distinct() {
        let mask = BattlerId::ALL.iter().fold(0u8, |acc, b| acc | b.bit());
        assert_eq!(mask, 0b1111);
    }

    #[test]
    fn party_index_validity() {
        assert!(PartyIndex(5).is_valid());
        assert!(!PartyIndex(6).is_valid());
    }
}
