//! Per-opcode command payloads decoded from channel bytes.
//!
//! Byte 0 of a command is the opcode; everything after it is laid out
//! per opcode at fixed offsets. [`CommandPayload::decode`] turns the raw
//! channel into a typed payload so handlers never index the buffer.

use crate::codec::{get_i16, get_u16, get_u32};
use crate::error::PayloadError;
use crate::id::{PartyIndex, PARTY_SIZE};
use crate::opcode::Opcode;
use crate::request::MonDataRequest;

/// Health-bar delta meaning "drop straight to zero".
pub const INSTANT_HP_BAR_DROP: i16 = 32767;

// ── Payload structs ────────────────────────────────────────────

/// Which party members a get/set data command addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartySelector {
    /// The battler's own active member.
    Active,
    /// Every member whose bit is set.
    Mask(u8),
}

impl PartySelector {
    fn from_byte(b: u8) -> Self {
        if b == 0 {
            Self::Active
        } else {
            Self::Mask(b)
        }
    }

    /// Resolve to party indexes in ascending order.
    pub fn indexes(self, active: PartyIndex) -> impl Iterator<Item = PartyIndex> {
        let mask = match self {
            Self::Active => 1u8.checked_shl(active.0 as u32).unwrap_or(0),
            Self::Mask(m) => m,
        };
        (0..PARTY_SIZE as u8)
            .filter(move |i| mask & (1 << i) != 0)
            .map(PartyIndex)
    }
}

/// Arguments for [`Opcode::MoveAnimation`].
///
/// Layout: `[1..3]` move, `[3]` turn, `[4..6]` power, `[6..10]` damage,
/// `[10]` friendship, `[11]` multi-hit counter, `[12..14]` weather,
/// `[16..20]` transformed personality from the disable record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveAnimationArgs {
    /// Move id.
    pub move_id: u16,
    /// Turn counter for multi-turn moves.
    pub turn: u8,
    /// Move power.
    pub power: u16,
    /// Damage dealt.
    pub damage: u32,
    /// Attacker friendship.
    pub friendship: u8,
    /// Remaining hits of a multi-hit move.
    pub multihit: u8,
    /// Active weather bits.
    pub weather: u16,
    /// Personality of the transform target, if any.
    pub transformed_personality: u32,
}

/// One member's entry in the party status summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartySummaryEntry {
    /// Current HP, or `0xFFFF` for an empty slot.
    pub hp: u16,
    /// Primary status.
    pub status: u32,
}

/// Stride of one [`PartySummaryEntry`] on the wire: u16 hp, 2 pad, u32 status.
pub const PARTY_SUMMARY_ENTRY_LEN: usize = 8;

/// A decoded command payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandPayload {
    /// `[1]` request, `[2]` party selector.
    GetMonData {
        /// What to read.
        request: MonDataRequest,
        /// Whom to read.
        selector: PartySelector,
    },
    /// `[1]` request, `[2]` party selector, `[3..]` value bytes.
    SetMonData {
        /// What to write.
        request: MonDataRequest,
        /// Whom to write.
        selector: PartySelector,
        /// Value bytes starting at offset 3.
        data: Vec<u8>,
    },
    /// `[1]` byte offset, `[2]` length, `[3..]` bytes.
    SetRawMonData {
        /// Offset into the party image.
        offset: u8,
        /// Bytes to write.
        data: Vec<u8>,
    },
    /// `[1]` party index, `[2]` keep-substitute flag.
    SwitchInAnim {
        /// Member to send out.
        party_index: PartyIndex,
        /// Keep the substitute doll across the switch.
        keep_substitute: bool,
    },
    /// `[1]` zero animates the recall.
    ReturnMonToBall {
        /// Skip the animation.
        instant: bool,
    },
    /// See [`MoveAnimationArgs`].
    MoveAnimation(MoveAnimationArgs),
    /// `[2..4]` string id.
    PrintString {
        /// Battle string id.
        string_id: u16,
    },
    /// `[2..4]` signed HP delta.
    HealthBarUpdate {
        /// HP delta or [`INSTANT_HP_BAR_DROP`].
        delta: i16,
    },
    /// `[1]` party index, `[2..6]` experience.
    ExpUpdate {
        /// Recipient.
        party_index: PartyIndex,
        /// Amount gained.
        amount: u32,
    },
    /// `[1]` status2 flag, `[2..6]` status bits.
    StatusAnimation {
        /// Animate a volatile status rather than the primary one.
        status2: bool,
        /// Status bits.
        status: u32,
    },
    /// `[1..3]` sound id.
    PlaySe {
        /// Sound effect id.
        sound: u16,
    },
    /// `[1..3]` song, `[3]` is-bgm flag.
    PlayFanfareOrBgm {
        /// Song id.
        song: u16,
        /// Play as background music instead of a fanfare.
        as_bgm: bool,
    },
    /// `[1]` battle environment.
    IntroSlide {
        /// Environment id.
        environment: u8,
    },
    /// `[1]` battle-start flag, `[2]` skip-delay flag, `[4..52]` entries.
    DrawPartyStatusSummary {
        /// Drawn at battle start.
        battle_start: bool,
        /// Start the display counter past its minimum.
        skip_delay: bool,
        /// Six entries.
        entries: [PartySummaryEntry; PARTY_SIZE],
    },
    /// `[1]` invisible flag.
    SpriteInvisibility {
        /// Hide the sprite.
        invisible: bool,
    },
    /// `[1]` animation id, `[2..4]` argument.
    BattleAnimation {
        /// Table animation id.
        anim_id: u8,
        /// Animation argument.
        argument: u16,
    },
    /// `[1]` value.
    SetSharedVar {
        /// New value.
        value: u8,
    },
    /// `[1]` outcome.
    EndLinkBattle {
        /// Battle outcome code.
        outcome: u8,
    },
    /// Opcode carries no payload the partner reads.
    Empty,
}

fn need(opcode: Opcode, buf: &[u8], needed: usize) -> Result<(), PayloadError> {
    if buf.len() < needed {
        return Err(PayloadError::Truncated {
            opcode,
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

fn request_at(buf: &[u8]) -> Result<MonDataRequest, PayloadError> {
    MonDataRequest::from_byte(buf[1]).ok_or(PayloadError::UnknownRequest { request: buf[1] })
}

impl CommandPayload {
    /// Decode the payload for `opcode` from the full channel bytes
    /// (byte 0 included).
    pub fn decode(opcode: Opcode, buf: &[u8]) -> Result<Self, PayloadError> {
        Ok(match opcode {
            Opcode::GetMonData => {
                need(opcode, buf, 3)?;
                Self::GetMonData {
                    request: request_at(buf)?,
                    selector: PartySelector::from_byte(buf[2]),
                }
            }
            Opcode::SetMonData => {
                need(opcode, buf, 3)?;
                let request = request_at(buf)?;
                need(opcode, buf, 3 + request.set_width())?;
                Self::SetMonData {
                    request,
                    selector: PartySelector::from_byte(buf[2]),
                    data: buf[3..3 + request.set_width()].to_vec(),
                }
            }
            Opcode::SetRawMonData => {
                need(opcode, buf, 3)?;
                let len = buf[2] as usize;
                need(opcode, buf, 3 + len)?;
                Self::SetRawMonData {
                    offset: buf[1],
                    data: buf[3..3 + len].to_vec(),
                }
            }
            Opcode::SwitchInAnim => {
                need(opcode, buf, 3)?;
                Self::SwitchInAnim {
                    party_index: PartyIndex(buf[1]),
                    keep_substitute: buf[2] != 0,
                }
            }
            Opcode::ReturnMonToBall => {
                need(opcode, buf, 2)?;
                Self::ReturnMonToBall {
                    instant: buf[1] != 0,
                }
            }
            Opcode::MoveAnimation => {
                need(opcode, buf, 20)?;
                Self::MoveAnimation(MoveAnimationArgs {
                    move_id: get_u16(buf, 1),
                    turn: buf[3],
                    power: get_u16(buf, 4),
                    damage: get_u32(buf, 6),
                    friendship: buf[10],
                    multihit: buf[11],
                    weather: get_u16(buf, 12),
                    transformed_personality: get_u32(buf, 16),
                })
            }
            Opcode::PrintString | Opcode::PrintSelectionString => {
                need(opcode, buf, 4)?;
                Self::PrintString {
                    string_id: get_u16(buf, 2),
                }
            }
            Opcode::HealthBarUpdate => {
                need(opcode, buf, 4)?;
                Self::HealthBarUpdate {
                    delta: get_i16(buf, 2),
                }
            }
            Opcode::ExpUpdate => {
                need(opcode, buf, 6)?;
                Self::ExpUpdate {
                    party_index: PartyIndex(buf[1]),
                    amount: get_u32(buf, 2),
                }
            }
            Opcode::StatusAnimation => {
                need(opcode, buf, 6)?;
                Self::StatusAnimation {
                    status2: buf[1] != 0,
                    status: get_u32(buf, 2),
                }
            }
            Opcode::PlaySe => {
                need(opcode, buf, 3)?;
                Self::PlaySe {
                    sound: get_u16(buf, 1),
                }
            }
            Opcode::PlayFanfareOrBgm => {
                need(opcode, buf, 4)?;
                Self::PlayFanfareOrBgm {
                    song: get_u16(buf, 1),
                    as_bgm: buf[3] != 0,
                }
            }
            Opcode::IntroSlide => {
                need(opcode, buf, 2)?;
                Self::IntroSlide {
                    environment: buf[1],
                }
            }
            Opcode::DrawPartyStatusSummary => {
                need(opcode, buf, 4 + PARTY_SIZE * PARTY_SUMMARY_ENTRY_LEN)?;
                let mut entries = [PartySummaryEntry::default(); PARTY_SIZE];
                for (i, e) in entries.iter_mut().enumerate() {
                    let at = 4 + i * PARTY_SUMMARY_ENTRY_LEN;
                    e.hp = get_u16(buf, at);
                    e.status = get_u32(buf, at + 4);
                }
                Self::DrawPartyStatusSummary {
                    battle_start: buf[1] != 0,
                    skip_delay: buf[2] != 0,
                    entries,
                }
            }
            Opcode::SpriteInvisibility => {
                need(opcode, buf, 2)?;
                Self::SpriteInvisibility {
                    invisible: buf[1] != 0,
                }
            }
            Opcode::BattleAnimation => {
                need(opcode, buf, 4)?;
                Self::BattleAnimation {
                    anim_id: buf[1],
                    argument: get_u16(buf, 2),
                }
            }
            Opcode::SetSharedVar => {
                need(opcode, buf, 2)?;
                Self::SetSharedVar { value: buf[1] }
            }
            Opcode::EndLinkBattle => {
                need(opcode, buf, 2)?;
                Self::EndLinkBattle { outcome: buf[1] }
            }
            _ => Self::Empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(bytes: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; 256];
        buf[..bytes.len()].copy_from_slice(bytes);
        buf
    }

    #[test]
    fn move_animation_offsets() {
        let mut raw = channel(&[Opcode::MoveAnimation.as_byte()]);
        raw[1..3].copy_from_slice(&0x0155u16.to_le_bytes());
        raw[3] = 2;
        raw[4..6].copy_from_slice(&90u16.to_le_bytes());
        raw[6..10].copy_from_slice(&1234u32.to_le_bytes());
        raw[10] = 70;
        raw[11] = 3;
        raw[12..14].copy_from_slice(&0x0020u16.to_le_bytes());
        raw[16..20].copy_from_slice(&0xCAFE_F00Du32.to_le_bytes());
        let decoded = CommandPayload::decode(Opcode::MoveAnimation, &raw).unwrap();
        assert_eq!(
            decoded,
            CommandPayload::MoveAnimation(MoveAnimationArgs {
                move_id: 0x0155,
                turn: 2,
                power: 90,
                damage: 1234,
                friendship: 70,
                multihit: 3,
                weather: 0x0020,
                transformed_personality: 0xCAFE_F00D,
            })
        );
    }

    #[test]
    fn truncated_payload_is_reported() {
        let err = CommandPayload::decode(Opcode::ExpUpdate, &[25, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::Truncated {
                opcode: Opcode::ExpUpdate,
                needed: 6,
                available: 3
            }
        );
    }

    #[test]
    fn unknown_request_is_rejected() {
        let err = CommandPayload::decode(Opcode::GetMonData, &channel(&[0, 200, 0])).unwrap_err();
        assert_eq!(err, PayloadError::UnknownRequest { request: 200 });
    }

    #[test]
    fn summary_entries_use_eight_byte_stride() {
        let mut raw = channel(&[Opcode::DrawPartyStatusSummary.as_byte(), 1, 0]);
        raw[4 + 8..4 + 10].copy_from_slice(&33u16.to_le_bytes());
        raw[4 + 12..4 + 16].copy_from_slice(&0x40u32.to_le_bytes());
        match CommandPayload::decode(Opcode::DrawPartyStatusSummary, &raw).unwrap() {
            CommandPayload::DrawPartyStatusSummary {
                battle_start,
                skip_delay,
                entries,
            } => {
                assert!(battle_start);
                assert!(!skip_delay);
                assert_eq!(entries[1], PartySummaryEntry { hp: 33, status: 0x40 });
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn selector_zero_means_active() {
        let picked: Vec<_> = PartySelector::Active.indexes(PartyIndex(3)).collect();
        assert_eq!(picked, vec![PartyIndex(3)]);
        let picked: Vec<_> = PartySelector::Mask(0b10_0101).indexes(PartyIndex(0)).collect();
        assert_eq!(picked, vec![PartyIndex(0), PartyIndex(2), PartyIndex(5)]);
    }

    #[test]
    fn opcodes_without_payload_decode_empty() {
        let raw = channel(&[Opcode::Pause.as_byte()]);
        assert_eq!(
            CommandPayload::decode(Opcode::Pause, &raw).unwrap(),
            CommandPayload::Empty
        );
    }
}
