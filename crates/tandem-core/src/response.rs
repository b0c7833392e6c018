//! Responses the partner controller sends back to the controlling side.

use smallvec::SmallVec;

use crate::error::CapacityExceeded;
use crate::id::{BattlerId, PartyIndex};
use crate::opcode::Opcode;

/// Capacity of a get-data response buffer in bytes.
pub const MON_DATA_CAPACITY: usize = 256;

/// Meaning of a two-value return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReturnKind {
    /// Value is `slot | target << 8`.
    ChosenMove = 10,
    /// Value is the experience left over after reaching the next level.
    LeveledUp = 11,
}

/// A response emitted by a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Packed member data. `overflow` is set when members were left out.
    MonData {
        /// Packed bytes, at most [`MON_DATA_CAPACITY`].
        data: Vec<u8>,
        /// Set when the request did not fit.
        overflow: Option<CapacityExceeded>,
    },
    /// A tagged value.
    TwoReturnValues {
        /// What the value means.
        kind: ReturnKind,
        /// The value.
        value: u32,
    },
    /// The member picked to switch in. Index 6 means none was available.
    ChosenMon {
        /// Chosen party slot.
        party_index: PartyIndex,
    },
}

impl Response {
    /// Encode to the wire form read by the controlling side.
    ///
    /// - `MonData`: `[opcode, 0, len lo, len hi, data..]`
    /// - `TwoReturnValues`: `[opcode, kind, value u32 LE]`
    /// - `ChosenMon`: `[opcode, index, 0, 0, 0]`
    pub fn encode(&self) -> SmallVec<[u8; 8]> {
        let mut out = SmallVec::new();
        match self {
            Self::MonData { data, .. } => {
                out.push(Opcode::DataTransfer.as_byte());
                out.push(0);
                out.extend_from_slice(&(data.len() as u16).to_le_bytes());
                out.extend_from_slice(data);
            }
            Self::TwoReturnValues { kind, value } => {
                out.push(Opcode::TwoReturnValues.as_byte());
                out.push(*kind as u8);
                out.extend_from_slice(&value.to_le_bytes());
            }
            Self::ChosenMon { party_index } => {
                out.push(Opcode::ChosenMonReturnValue.as_byte());
                out.push(party_index.0);
                out.extend_from_slice(&[0, 0, 0]);
            }
        }
        out
    }
}

/// A response tagged with the participant that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emitted {
    /// Producing participant.
    pub battler: BattlerId,
    /// The response.
    pub response: Response,
}
