//! Error types shared across the Tandem workspace.
//!
//! Command decoding and response packing report here; the engine and
//! save crates define their own subsystem errors on top.

use std::error::Error;
use std::fmt;

use crate::opcode::Opcode;

/// A command payload could not be decoded from its channel bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// The channel holds fewer bytes than the opcode's payload layout needs.
    Truncated {
        /// Opcode being decoded.
        opcode: Opcode,
        /// Bytes required by the layout.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// A request byte does not name a known data request.
    UnknownRequest {
        /// The offending request byte.
        request: u8,
    },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                opcode,
                needed,
                available,
            } => write!(
                f,
                "{opcode:?} payload needs {needed} bytes, channel holds {available}"
            ),
            Self::UnknownRequest { request } => write!(f, "unknown data request {request}"),
        }
    }
}

impl Error for PayloadError {}

/// A multi-member data response did not fit its fixed buffer.
///
/// Members are packed whole; the first member that would overrun the
/// buffer and every member after it are left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityExceeded {
    /// Size of the response buffer in bytes.
    pub capacity: usize,
    /// Bytes the full request would have needed.
    pub required: usize,
    /// Members actually packed.
    pub packed: u8,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "response needs {} bytes but buffer holds {} ({} members packed)",
            self.required, self.capacity, self.packed
        )
    }
}

impl Error for CapacityExceeded {}
