//! Data requests carried by the get/set member data commands.
//!
//! Each request names either a whole record or a single field with a
//! fixed wire width. Reads and writes are not always symmetric: OT id and
//! experience are answered in three bytes but written from four.

use crate::codec::{get_u16, get_u32, push_u16, push_u24, push_u32};
use crate::mon::{MonField, Pokemon};
use crate::record::{
    apply_battle_record, apply_move_pp, encode_battle_record, encode_move_pp, BATTLE_RECORD_LEN,
    MOVE_PP_LEN,
};
use crate::traits::SpeciesInfo;

/// Request byte of a get/set data command.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MonDataRequest {
    AllBattle = 0,
    Species = 1,
    HeldItem = 2,
    MovesPp = 3,
    Move1 = 4,
    Move2 = 5,
    Move3 = 6,
    Move4 = 7,
    PpData = 8,
    PpMove1 = 9,
    PpMove2 = 10,
    PpMove3 = 11,
    PpMove4 = 12,
    Unused13 = 13,
    Unused14 = 14,
    Unused15 = 15,
    Unused16 = 16,
    OtId = 17,
    Exp = 18,
    HpEv = 19,
    AtkEv = 20,
    DefEv = 21,
    SpeedEv = 22,
    SpAtkEv = 23,
    SpDefEv = 24,
    Friendship = 25,
    Pokerus = 26,
    MetLocation = 27,
    MetLevel = 28,
    MetGame = 29,
    Pokeball = 30,
    AllIvs = 31,
    HpIv = 32,
    AtkIv = 33,
    DefIv = 34,
    SpeedIv = 35,
    SpAtkIv = 36,
    SpDefIv = 37,
    Personality = 38,
    Checksum = 39,
    Status = 40,
    Level = 41,
    Hp = 42,
    MaxHp = 43,
    Atk = 44,
    Def = 45,
    Speed = 46,
    SpAtk = 47,
    SpDef = 48,
    Cool = 49,
    Beauty = 50,
    Cute = 51,
    Smart = 52,
    Tough = 53,
    Sheen = 54,
    CoolRibbon = 55,
    BeautyRibbon = 56,
    CuteRibbon = 57,
    SmartRibbon = 58,
    ToughRibbon = 59,
}

/// How one request maps onto a member.
enum Shape {
    Record,
    MovesPp,
    PpData,
    AllIvs,
    Unused,
    /// Single field: field, bytes when read, bytes when written.
    Field(MonField, usize, usize),
}

const IV_FIELDS: [MonField; 6] = [
    MonField::HpIv,
    MonField::AttackIv,
    MonField::DefenseIv,
    MonField::SpeedIv,
    MonField::SpAttackIv,
    MonField::SpDefenseIv,
];

impl MonDataRequest {
    /// Highest request byte.
    pub const LAST: u8 = 59;

    /// Decode a request byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        use MonDataRequest::*;
        const ALL: [MonDataRequest; 60] = [
            AllBattle, Species, HeldItem, MovesPp, Move1, Move2, Move3, Move4, PpData, PpMove1,
            PpMove2, PpMove3, PpMove4, Unused13, Unused14, Unused15, Unused16, OtId, Exp, HpEv,
            AtkEv, DefEv, SpeedEv, SpAtkEv, SpDefEv, Friendship, Pokerus, MetLocation, MetLevel,
            MetGame, Pokeball, AllIvs, HpIv, AtkIv, DefIv, SpeedIv, SpAtkIv, SpDefIv, Personality,
            Checksum, Status, Level, Hp, MaxHp, Atk, Def, Speed, SpAtk, SpDef, Cool, Beauty, Cute,
            Smart, Tough, Sheen, CoolRibbon, BeautyRibbon, CuteRibbon, SmartRibbon, ToughRibbon,
        ];
        ALL.get(b as usize).copied()
    }

    fn shape(self) -> Shape {
        use MonDataRequest as R;
        use MonField as F;
        match self {
            R::AllBattle => Shape::Record,
            R::MovesPp => Shape::MovesPp,
            R::PpData => Shape::PpData,
            R::AllIvs => Shape::AllIvs,
            R::Unused13 | R::Unused14 | R::Unused15 | R::Unused16 => Shape::Unused,
            R::Species => Shape::Field(F::Species, 2, 2),
            R::HeldItem => Shape::Field(F::HeldItem, 2, 2),
            R::Move1 => Shape::Field(F::Move1, 2, 2),
            R::Move2 => Shape::Field(F::Move2, 2, 2),
            R::Move3 => Shape::Field(F::Move3, 2, 2),
            R::Move4 => Shape::Field(F::Move4, 2, 2),
            R::PpMove1 => Shape::Field(F::Pp1, 1, 1),
            R::PpMove2 => Shape::Field(F::Pp2, 1, 1),
            R::PpMove3 => Shape::Field(F::Pp3, 1, 1),
            R::PpMove4 => Shape::Field(F::Pp4, 1, 1),
            R::OtId => Shape::Field(F::OtId, 3, 4),
            R::Exp => Shape::Field(F::Experience, 3, 4),
            R::HpEv => Shape::Field(F::HpEv, 1, 1),
            R::AtkEv => Shape::Field(F::AttackEv, 1, 1),
            R::DefEv => Shape::Field(F::DefenseEv, 1, 1),
            R::SpeedEv => Shape::Field(F::SpeedEv, 1, 1),
            R::SpAtkEv => Shape::Field(F::SpAttackEv, 1, 1),
            R::SpDefEv => Shape::Field(F::SpDefenseEv, 1, 1),
            R::Friendship => Shape::Field(F::Friendship, 1, 1),
            R::Pokerus => Shape::Field(F::Pokerus, 1, 1),
            R::MetLocation => Shape::Field(F::MetLocation, 1, 1),
            R::MetLevel => Shape::Field(F::MetLevel, 1, 1),
            R::MetGame => Shape::Field(F::MetGame, 1, 1),
            R::Pokeball => Shape::Field(F::Pokeball, 1, 1),
            R::HpIv => Shape::Field(F::HpIv, 1, 1),
            R::AtkIv => Shape::Field(F::AttackIv, 1, 1),
            R::DefIv => Shape::Field(F::DefenseIv, 1, 1),
            R::SpeedIv => Shape::Field(F::SpeedIv, 1, 1),
            R::SpAtkIv => Shape::Field(F::SpAttackIv, 1, 1),
            R::SpDefIv => Shape::Field(F::SpDefenseIv, 1, 1),
            R::Personality => Shape::Field(F::Personality, 4, 4),
            R::Checksum => Shape::Field(F::Checksum, 2, 2),
            R::Status => Shape::Field(F::Status, 4, 4),
            R::Level => Shape::Field(F::Level, 1, 1),
            R::Hp => Shape::Field(F::Hp, 2, 2),
            R::MaxHp => Shape::Field(F::MaxHp, 2, 2),
            R::Atk => Shape::Field(F::Attack, 2, 2),
            R::Def => Shape::Field(F::Defense, 2, 2),
            R::Speed => Shape::Field(F::Speed, 2, 2),
            R::SpAtk => Shape::Field(F::SpAttack, 2, 2),
            R::SpDef => Shape::Field(F::SpDefense, 2, 2),
            R::Cool => Shape::Field(F::Cool, 1, 1),
            R::Beauty => Shape::Field(F::Beauty, 1, 1),
            R::Cute => Shape::Field(F::Cute, 1, 1),
            R::Smart => Shape::Field(F::Smart, 1, 1),
            R::Tough => Shape::Field(F::Tough, 1, 1),
            R::Sheen => Shape::Field(F::Sheen, 1, 1),
            R::CoolRibbon => Shape::Field(F::CoolRibbon, 1, 1),
            R::BeautyRibbon => Shape::Field(F::BeautyRibbon, 1, 1),
            R::CuteRibbon => Shape::Field(F::CuteRibbon, 1, 1),
            R::SmartRibbon => Shape::Field(F::SmartRibbon, 1, 1),
            R::ToughRibbon => Shape::Field(F::ToughRibbon, 1, 1),
        }
    }

    /// The single field this request addresses, if it addresses one.
    pub fn field(self) -> Option<MonField> {
        match self.shape() {
            Shape::Field(f, _, _) => Some(f),
            _ => None,
        }
    }

    /// Bytes one member contributes to a get-data response.
    pub fn get_width(self) -> usize {
        match self.shape() {
            Shape::Record => BATTLE_RECORD_LEN,
            Shape::MovesPp => MOVE_PP_LEN,
            Shape::PpData => 5,
            Shape::AllIvs => 6,
            Shape::Unused => 0,
            Shape::Field(_, get, _) => get,
        }
    }

    /// Bytes a set-data command carries after its header.
    pub fn set_width(self) -> usize {
        match self.shape() {
            Shape::Record => BATTLE_RECORD_LEN,
            Shape::MovesPp => MOVE_PP_LEN,
            Shape::PpData => 5,
            Shape::AllIvs => 6,
            Shape::Unused => 0,
            Shape::Field(_, _, set) => set,
        }
    }

    /// Append this request's bytes for `mon` to `out`.
    pub fn encode_get(self, mon: &Pokemon, species: &dyn SpeciesInfo, out: &mut Vec<u8>) {
        match self.shape() {
            Shape::Record => out.extend_from_slice(&encode_battle_record(mon, species)),
            Shape::MovesPp => out.extend_from_slice(&encode_move_pp(mon)),
            Shape::PpData => {
                out.extend_from_slice(&mon.pp);
                out.push(mon.pp_bonuses);
            }
            Shape::AllIvs => out.extend_from_slice(&mon.ivs),
            Shape::Unused => {}
            Shape::Field(f, width, _) => {
                let v = mon.get(f);
                match width {
                    1 => out.push(v as u8),
                    2 => push_u16(out, v as u16),
                    3 => push_u24(out, v),
                    _ => push_u32(out, v),
                }
            }
        }
    }

    /// Apply set-data bytes to `mon`. `data` must hold at least
    /// [`set_width`](Self::set_width) bytes.
    pub fn apply_set(self, mon: &mut Pokemon, data: &[u8]) {
        match self.shape() {
            Shape::Record => apply_battle_record(mon, data),
            Shape::MovesPp => apply_move_pp(mon, data),
            Shape::PpData => {
                mon.pp.copy_from_slice(&data[..4]);
                mon.pp_bonuses = data[4];
            }
            Shape::AllIvs => {
                for (field, v) in IV_FIELDS.iter().zip(data) {
                    mon.set(*field, *v as u32);
                }
            }
            Shape::Unused => {}
            Shape::Field(f, _, width) => {
                let v = match width {
                    1 => data[0] as u32,
                    2 => get_u16(data, 0) as u32,
                    _ => get_u32(data, 0),
                };
                mon.set(f, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::get_u24;
    use crate::species::{BaseStats, GrowthRate};

    struct NoData;

    impl SpeciesInfo for NoData {
        fn growth_rate(&self, _species: u16) -> GrowthRate {
            GrowthRate::MediumFast
        }
        fn base_stats(&self, _species: u16) -> BaseStats {
            BaseStats::default()
        }
    }

    #[test]
    fn every_request_byte_decodes() {
        for b in 0..=MonDataRequest::LAST {
            let r = MonDataRequest::from_byte(b).unwrap();
            assert_eq!(r as u8, b);
        }
        assert!(MonDataRequest::from_byte(MonDataRequest::LAST + 1).is_none());
    }

    #[test]
    fn exp_is_answered_in_three_bytes() {
        let mon = Pokemon {
            experience: 0x0102_0304,
            ..Pokemon::default()
        };
        let mut out = Vec::new();
        MonDataRequest::Exp.encode_get(&mon, &NoData, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(get_u24(&out, 0), 0x02_0304);
    }

    #[test]
    fn set_exp_reads_four_bytes() {
        let mut mon = Pokemon::default();
        MonDataRequest::Exp.apply_set(&mut mon, &0x0102_0304u32.to_le_bytes());
        assert_eq!(mon.experience, 0x0102_0304);
        assert_eq!(MonDataRequest::Exp.set_width(), 4);
    }

    #[test]
    fn unused_requests_are_inert() {
        let mut mon = Pokemon::default();
        let before = mon.clone();
        MonDataRequest::Unused14.apply_set(&mut mon, &[0xFF; 4]);
        assert_eq!(mon, before);
        let mut out = Vec::new();
        MonDataRequest::Unused14.encode_get(&mon, &NoData, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn pp_data_layout() {
        let mon = Pokemon {
            pp: [1, 2, 3, 4],
            pp_bonuses: 9,
            ..Pokemon::default()
        };
        let mut out = Vec::new();
        MonDataRequest::PpData.encode_get(&mon, &NoData, &mut out);
        assert_eq!(out, [1, 2, 3, 4, 9]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn single_field_set_then_get(req in 0u8..=MonDataRequest::LAST, raw in any::<u32>()) {
                let request = MonDataRequest::from_byte(req).unwrap();
                if let Some(field) = request.field() {
                    let get_bits = 8 * request.get_width() as u32;
                    let mask = field.max_value() & (u32::MAX >> (32 - get_bits));
                    let v = raw & mask;

                    let mut mon = Pokemon::default();
                    let mut data = vec![0u8; request.set_width()];
                    data.copy_from_slice(&v.to_le_bytes()[..request.set_width()]);
                    request.apply_set(&mut mon, &data);

                    let mut out = Vec::new();
                    request.encode_get(&mon, &NoData, &mut out);
                    let mut wide = [0u8; 4];
                    wide[..out.len()].copy_from_slice(&out);
                    prop_assert_eq!(u32::from_le_bytes(wide), v);
                }
            }
        }
    }
}
