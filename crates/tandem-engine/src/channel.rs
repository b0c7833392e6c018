//! Per-battler command channels and the completion bitmask.
//!
//! The controlling side writes a command into a battler's channel and
//! clears that battler's completion bit. The controller reads the
//! channel while the bit is clear and sets it again when the command has
//! fully finished. A channel is never overwritten while its bit is
//! clear: [`CompletionSignals::accept`] refuses a busy battler.

use tandem_core::{BattlerId, MAX_BATTLERS};

use crate::error::IssueError;

/// Bytes per command channel.
pub const CHANNEL_CAPACITY: usize = 256;

// ── CommandChannel ─────────────────────────────────────────────────

/// One battler's command buffer.
#[derive(Clone, Debug)]
pub struct CommandChannel {
    buf: [u8; CHANNEL_CAPACITY],
    warned: bool,
}

impl Default for CommandChannel {
    fn default() -> Self {
        Self {
            buf: [0; CHANNEL_CAPACITY],
            warned: false,
        }
    }
}

impl CommandChannel {
    /// Copy `command` in and zero the tail.
    pub(crate) fn load(&mut self, command: &[u8]) -> Result<(), IssueError> {
        if command.is_empty() {
            return Err(IssueError::Empty);
        }
        if command.len() > CHANNEL_CAPACITY {
            return Err(IssueError::TooLong {
                len: command.len(),
                capacity: CHANNEL_CAPACITY,
            });
        }
        self.buf[..command.len()].copy_from_slice(command);
        self.buf[command.len()..].fill(0);
        self.warned = false;
        Ok(())
    }

    /// The full buffer, opcode at index 0.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Byte 0.
    pub fn opcode_byte(&self) -> u8 {
        self.buf[0]
    }

    /// Returns `true` the first time it is called for the loaded command.
    pub(crate) fn first_warning(&mut self) -> bool {
        !std::mem::replace(&mut self.warned, true)
    }
}

// ── CompletionSignals ──────────────────────────────────────────────

/// Bitmask of battlers whose last command has completed.
///
/// A set bit means idle. Every battler starts idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionSignals(u8);

impl Default for CompletionSignals {
    fn default() -> Self {
        Self((1u8 << MAX_BATTLERS) - 1)
    }
}

impl CompletionSignals {
    /// Whether `battler` has no command in flight.
    pub fn is_complete(self, battler: BattlerId) -> bool {
        self.0 & battler.bit() != 0
    }

    /// Whether `battler` has a command waiting or running.
    pub fn is_pending(self, battler: BattlerId) -> bool {
        !self.is_complete(battler)
    }

    /// Claim `battler` for a new command. Fails if it is still busy.
    pub(crate) fn accept(&mut self, battler: BattlerId) -> Result<(), IssueError> {
        if self.is_pending(battler) {
            return Err(IssueError::Busy { battler });
        }
        self.0 &= !battler.bit();
        Ok(())
    }

    /// Mark `battler` idle.
    pub(crate) fn complete(&mut self, battler: BattlerId) {
        self.0 |= battler.bit();
    }

    /// Raw mask.
    pub fn bits(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_zero_fills_tail() {
        let mut ch = CommandChannel::default();
        ch.load(&[7; 40]).unwrap();
        ch.load(&[3, 1]).unwrap();
        assert_eq!(&ch.bytes()[..2], &[3, 1]);
        assert!(ch.bytes()[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn load_rejects_empty_and_oversized() {
        let mut ch = CommandChannel::default();
        assert_eq!(ch.load(&[]), Err(IssueError::Empty));
        assert_eq!(
            ch.load(&[0; CHANNEL_CAPACITY + 1]),
            Err(IssueError::TooLong {
                len: CHANNEL_CAPACITY + 1,
                capacity: CHANNEL_CAPACITY
            })
        );
    }

    #[test]
    fn warning_resets_per_command() {
        let mut ch = CommandChannel::default();
        ch.load(&[200]).unwrap();
        assert!(ch.first_warning());
        assert!(!ch.first_warning());
        ch.load(&[201]).unwrap();
        assert!(ch.first_warning());
    }

    #[test]
    fn busy_battler_is_refused() {
        let mut s = CompletionSignals::default();
        let b = BattlerId::PLAYER_RIGHT;
        assert!(s.is_complete(b));
        s.accept(b).unwrap();
        assert_eq!(s.accept(b), Err(IssueError::Busy { battler: b }));
        assert!(s.is_complete(BattlerId::PLAYER_LEFT));
        s.complete(b);
        assert_eq!(s.bits(), 0b1111);
    }
}
