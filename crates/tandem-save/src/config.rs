//! Save manager configuration.

use crate::error::SaveConfigError;
use crate::layout::total_block_bytes;

/// Default relocation window in bytes.
pub const DEFAULT_MOVE_RANGE: usize = 128;

/// Configuration for a [`SaveManager`](crate::SaveManager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveConfig {
    /// Bytes of slack around each block; base offsets are chosen inside
    /// it on 4-byte boundaries. Must be a power of two, at least 8.
    /// Default: 128.
    pub move_range: usize,
    /// Scratch heap capacity. Must hold every block at once.
    /// Default: the sum of all block sizes.
    pub heap_size: usize,
    /// Seed for the relocation and key RNG. Default: 0.
    pub seed: u64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            move_range: DEFAULT_MOVE_RANGE,
            heap_size: total_block_bytes(),
            seed: 0,
        }
    }
}

impl SaveConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), SaveConfigError> {
        // 1. Window must be a power of two so `& (range - 4)` stays inside it.
        if !self.move_range.is_power_of_two() || self.move_range < 8 {
            return Err(SaveConfigError::InvalidMoveRange {
                configured: self.move_range,
            });
        }
        // 2. Heap must hold a full capture set.
        let required = total_block_bytes();
        if self.heap_size < required {
            return Err(SaveConfigError::HeapTooSmall {
                configured: self.heap_size,
                required,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SaveConfig::default().validate().is_ok());
    }

    #[test]
    fn move_range_must_be_power_of_two() {
        let cfg = SaveConfig {
            move_range: 96,
            ..SaveConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SaveConfigError::InvalidMoveRange { configured: 96 })
        );
        let cfg = SaveConfig {
            move_range: 4,
            ..SaveConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn heap_must_hold_all_blocks() {
        let cfg = SaveConfig {
            heap_size: 100,
            ..SaveConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SaveConfigError::HeapTooSmall { configured: 100, .. })
        ));
    }
}
