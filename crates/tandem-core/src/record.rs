//! Fixed byte layouts for a [`Pokemon`].
//!
//! Three layouts are used on the wire and in save blocks:
//!
//! - the 100-byte party image ([`PARTY_IMAGE_LEN`]), stored in the world
//!   save block and targeted by raw data writes;
//! - the 88-byte battle record ([`BATTLE_RECORD_LEN`]), answered for the
//!   all-fields data request;
//! - the 14-byte move/PP record ([`MOVE_PP_LEN`]).
//!
//! Offsets are part of the persisted format and must not move.

use crate::codec::{get_u16, get_u32, put_u16, put_u32};
use crate::mon::{Pokemon, MAX_MOVES, NICKNAME_LEN, OT_NAME_LEN};
use crate::traits::SpeciesInfo;

// ── Party image ────────────────────────────────────────────────

/// Size of the party image in bytes.
pub const PARTY_IMAGE_LEN: usize = 100;

mod party {
    pub const PERSONALITY: usize = 0x00;
    pub const OT_ID: usize = 0x04;
    pub const NICKNAME: usize = 0x08;
    pub const OT_NAME: usize = 0x12;
    pub const ABILITY_NUM: usize = 0x19;
    pub const SPECIES: usize = 0x1A;
    pub const HELD_ITEM: usize = 0x1C;
    pub const EXPERIENCE: usize = 0x1E;
    pub const PP_BONUSES: usize = 0x22;
    pub const FRIENDSHIP: usize = 0x23;
    pub const MOVES: usize = 0x24;
    pub const PP: usize = 0x2C;
    pub const EVS: usize = 0x30;
    pub const CONTEST: usize = 0x36;
    pub const POKERUS: usize = 0x3C;
    pub const MET_LOCATION: usize = 0x3D;
    pub const MET_LEVEL: usize = 0x3E;
    pub const MET_GAME: usize = 0x3F;
    pub const POKEBALL: usize = 0x40;
    pub const RIBBONS: usize = 0x41;
    pub const IVS: usize = 0x46;
    pub const CHECKSUM: usize = 0x4C;
    pub const STATUS: usize = 0x4E;
    pub const LEVEL: usize = 0x52;
    pub const FLAGS: usize = 0x53;
    pub const HP: usize = 0x54;
    pub const MAX_HP: usize = 0x56;
    pub const ATTACK: usize = 0x58;
    pub const DEFENSE: usize = 0x5A;
    pub const SPEED: usize = 0x5C;
    pub const SP_ATTACK: usize = 0x5E;
    pub const SP_DEFENSE: usize = 0x60;
}

impl Pokemon {
    /// Encode the 100-byte party image.
    pub fn to_party_image(&self) -> [u8; PARTY_IMAGE_LEN] {
        use party::*;
        let mut b = [0u8; PARTY_IMAGE_LEN];
        put_u32(&mut b, PERSONALITY, self.personality);
        put_u32(&mut b, OT_ID, self.ot_id);
        b[NICKNAME..NICKNAME + NICKNAME_LEN].copy_from_slice(&self.nickname);
        b[OT_NAME..OT_NAME + OT_NAME_LEN].copy_from_slice(&self.ot_name);
        b[ABILITY_NUM] = self.ability_num;
        put_u16(&mut b, SPECIES, self.species);
        put_u16(&mut b, HELD_ITEM, self.held_item);
        put_u32(&mut b, EXPERIENCE, self.experience);
        b[PP_BONUSES] = self.pp_bonuses;
        b[FRIENDSHIP] = self.friendship;
        for (i, m) in self.moves.iter().enumerate() {
            put_u16(&mut b, MOVES + 2 * i, *m);
        }
        b[PP..PP + MAX_MOVES].copy_from_slice(&self.pp);
        b[EVS..EVS + 6].copy_from_slice(&self.evs);
        b[CONTEST..CONTEST + 6].copy_from_slice(&self.contest);
        b[POKERUS] = self.pokerus;
        b[MET_LOCATION] = self.met_location;
        b[MET_LEVEL] = self.met_level;
        b[MET_GAME] = self.met_game;
        b[POKEBALL] = self.pokeball;
        b[RIBBONS..RIBBONS + 5].copy_from_slice(&self.ribbons);
        b[IVS..IVS + 6].copy_from_slice(&self.ivs);
        put_u16(&mut b, CHECKSUM, self.checksum);
        put_u32(&mut b, STATUS, self.status);
        b[LEVEL] = self.level;
        b[FLAGS] = self.is_egg as u8;
        put_u16(&mut b, HP, self.hp);
        put_u16(&mut b, MAX_HP, self.max_hp);
        put_u16(&mut b, ATTACK, self.attack);
        put_u16(&mut b, DEFENSE, self.defense);
        put_u16(&mut b, SPEED, self.speed);
        put_u16(&mut b, SP_ATTACK, self.sp_attack);
        put_u16(&mut b, SP_DEFENSE, self.sp_defense);
        b
    }

    /// Decode a 100-byte party image.
    pub fn from_party_image(b: &[u8; PARTY_IMAGE_LEN]) -> Self {
        use party::*;
        let mut mon = Pokemon {
            personality: get_u32(b, PERSONALITY),
            ot_id: get_u32(b, OT_ID),
            ability_num: b[ABILITY_NUM],
            species: get_u16(b, SPECIES),
            held_item: get_u16(b, HELD_ITEM),
            experience: get_u32(b, EXPERIENCE),
            pp_bonuses: b[PP_BONUSES],
            friendship: b[FRIENDSHIP],
            pokerus: b[POKERUS],
            met_location: b[MET_LOCATION],
            met_level: b[MET_LEVEL],
            met_game: b[MET_GAME],
            pokeball: b[POKEBALL],
            is_egg: b[FLAGS] & 1 != 0,
            checksum: get_u16(b, CHECKSUM),
            status: get_u32(b, STATUS),
            level: b[LEVEL],
            hp: get_u16(b, HP),
            max_hp: get_u16(b, MAX_HP),
            attack: get_u16(b, ATTACK),
            defense: get_u16(b, DEFENSE),
            speed: get_u16(b, SPEED),
            sp_attack: get_u16(b, SP_ATTACK),
            sp_defense: get_u16(b, SP_DEFENSE),
            ..Pokemon::default()
        };
        mon.nickname.copy_from_slice(&b[NICKNAME..NICKNAME + NICKNAME_LEN]);
        mon.ot_name.copy_from_slice(&b[OT_NAME..OT_NAME + OT_NAME_LEN]);
        for (i, m) in mon.moves.iter_mut().enumerate() {
            *m = get_u16(b, MOVES + 2 * i);
        }
        mon.pp.copy_from_slice(&b[PP..PP + MAX_MOVES]);
        mon.evs.copy_from_slice(&b[EVS..EVS + 6]);
        mon.contest.copy_from_slice(&b[CONTEST..CONTEST + 6]);
        mon.ribbons.copy_from_slice(&b[RIBBONS..RIBBONS + 5]);
        mon.ivs.copy_from_slice(&b[IVS..IVS + 6]);
        mon
    }
}

// ── Battle record ──────────────────────────────────────────────

/// Size of the battle record in bytes.
pub const BATTLE_RECORD_LEN: usize = 88;

/// Neutral stat stage written into fresh battle records.
pub const DEFAULT_STAT_STAGE: u8 = 6;

mod battle {
    pub const SPECIES: usize = 0;
    pub const ATTACK: usize = 2;
    pub const DEFENSE: usize = 4;
    pub const SPEED: usize = 6;
    pub const SP_ATTACK: usize = 8;
    pub const SP_DEFENSE: usize = 10;
    pub const MOVES: usize = 12;
    /// Six 5-bit IVs, then is-egg and ability-num bits.
    pub const PACKED_IVS: usize = 20;
    pub const STAT_STAGES: usize = 24;
    pub const ABILITY: usize = 32;
    pub const TYPES: usize = 33;
    pub const PP: usize = 36;
    pub const HP: usize = 40;
    pub const LEVEL: usize = 42;
    pub const FRIENDSHIP: usize = 43;
    pub const MAX_HP: usize = 44;
    pub const ITEM: usize = 46;
    /// Nickname plus terminator.
    pub const NICKNAME: usize = 48;
    pub const PP_BONUSES: usize = 59;
    /// OT name plus terminator.
    pub const OT_NAME: usize = 60;
    pub const EXPERIENCE: usize = 68;
    pub const PERSONALITY: usize = 72;
    pub const STATUS1: usize = 76;
    pub const STATUS2: usize = 80;
    pub const OT_ID: usize = 84;
}

/// String terminator byte used after names in the battle record.
pub const EOS: u8 = 0xFF;

/// Encode the battle record for `mon`, looking up ability and types.
pub fn encode_battle_record(mon: &Pokemon, species: &dyn SpeciesInfo) -> [u8; BATTLE_RECORD_LEN] {
    use battle::*;
    let mut b = [0u8; BATTLE_RECORD_LEN];
    put_u16(&mut b, SPECIES, mon.species);
    put_u16(&mut b, ATTACK, mon.attack);
    put_u16(&mut b, DEFENSE, mon.defense);
    put_u16(&mut b, SPEED, mon.speed);
    put_u16(&mut b, SP_ATTACK, mon.sp_attack);
    put_u16(&mut b, SP_DEFENSE, mon.sp_defense);
    for (i, m) in mon.moves.iter().enumerate() {
        put_u16(&mut b, MOVES + 2 * i, *m);
    }
    let mut packed = 0u32;
    for (i, iv) in mon.ivs.iter().enumerate() {
        packed |= (*iv as u32 & 0x1F) << (5 * i);
    }
    packed |= (mon.is_egg as u32) << 30;
    packed |= (mon.ability_num as u32 & 1) << 31;
    put_u32(&mut b, PACKED_IVS, packed);
    b[STAT_STAGES..STAT_STAGES + 8].fill(DEFAULT_STAT_STAGE);
    b[ABILITY] = species.ability(mon.species, mon.ability_num);
    let [t1, t2] = species.types(mon.species);
    b[TYPES] = t1;
    b[TYPES + 1] = t2;
    b[PP..PP + MAX_MOVES].copy_from_slice(&mon.pp);
    put_u16(&mut b, HP, mon.hp);
    b[LEVEL] = mon.level;
    b[FRIENDSHIP] = mon.friendship;
    put_u16(&mut b, MAX_HP, mon.max_hp);
    put_u16(&mut b, ITEM, mon.held_item);
    b[NICKNAME..NICKNAME + NICKNAME_LEN].copy_from_slice(&mon.nickname);
    b[NICKNAME + NICKNAME_LEN] = EOS;
    b[PP_BONUSES] = mon.pp_bonuses;
    b[OT_NAME..OT_NAME + OT_NAME_LEN].copy_from_slice(&mon.ot_name);
    b[OT_NAME + OT_NAME_LEN] = EOS;
    put_u32(&mut b, EXPERIENCE, mon.experience);
    put_u32(&mut b, PERSONALITY, mon.personality);
    put_u32(&mut b, STATUS1, mon.status);
    put_u32(&mut b, STATUS2, 0);
    put_u32(&mut b, OT_ID, mon.ot_id);
    b
}

/// Apply a battle record to `mon`.
///
/// Only the fields a battle can change are written back: species, item,
/// moves and PP, PP bonuses, friendship, experience, IVs, personality,
/// status, level, HP and stats. Names, OT id and stat stages are ignored.
pub fn apply_battle_record(mon: &mut Pokemon, b: &[u8]) {
    use battle::*;
    mon.species = get_u16(b, SPECIES);
    mon.held_item = get_u16(b, ITEM);
    for i in 0..MAX_MOVES {
        mon.moves[i] = get_u16(b, MOVES + 2 * i);
        mon.pp[i] = b[PP + i];
    }
    mon.pp_bonuses = b[PP_BONUSES];
    mon.friendship = b[FRIENDSHIP];
    mon.experience = get_u32(b, EXPERIENCE);
    let packed = get_u32(b, PACKED_IVS);
    for (i, iv) in mon.ivs.iter_mut().enumerate() {
        *iv = ((packed >> (5 * i)) & 0x1F) as u8;
    }
    mon.personality = get_u32(b, PERSONALITY);
    mon.status = get_u32(b, STATUS1);
    mon.level = b[LEVEL];
    mon.hp = get_u16(b, HP);
    mon.max_hp = get_u16(b, MAX_HP);
    mon.attack = get_u16(b, ATTACK);
    mon.defense = get_u16(b, DEFENSE);
    mon.speed = get_u16(b, SPEED);
    mon.sp_attack = get_u16(b, SP_ATTACK);
    mon.sp_defense = get_u16(b, SP_DEFENSE);
}

// ── Move/PP record ─────────────────────────────────────────────

/// Size of the move/PP record: four u16 moves, four PP bytes, bonuses, pad.
pub const MOVE_PP_LEN: usize = 14;

/// Encode the move/PP record.
pub fn encode_move_pp(mon: &Pokemon) -> [u8; MOVE_PP_LEN] {
    let mut b = [0u8; MOVE_PP_LEN];
    for (i, m) in mon.moves.iter().enumerate() {
        put_u16(&mut b, 2 * i, *m);
    }
    b[8..12].copy_from_slice(&mon.pp);
    b[12] = mon.pp_bonuses;
    b
}

/// Apply a move/PP record.
pub fn apply_move_pp(mon: &mut Pokemon, b: &[u8]) {
    for i in 0..MAX_MOVES {
        mon.moves[i] = get_u16(b, 2 * i);
        mon.pp[i] = b[8 + i];
    }
    mon.pp_bonuses = b[12];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{BaseStats, GrowthRate};

    struct Typed;

    impl SpeciesInfo for Typed {
        fn growth_rate(&self, _species: u16) -> GrowthRate {
            GrowthRate::Fast
        }
        fn base_stats(&self, _species: u16) -> BaseStats {
            BaseStats::default()
        }
        fn types(&self, _species: u16) -> [u8; 2] {
            [10, 12]
        }
        fn ability(&self, _species: u16, ability_num: u8) -> u8 {
            40 + ability_num
        }
    }

    fn sample() -> Pokemon {
        Pokemon {
            personality: 0x1234_5678,
            ot_id: 0x0BAD_CAFE,
            nickname: *b"TORCHIC\xFF\0\0",
            ot_name: *b"MAY\xFF\0\0\0",
            ability_num: 1,
            species: 280,
            held_item: 7,
            experience: 4_200,
            pp_bonuses: 0b0110_0001,
            friendship: 70,
            moves: [10, 45, 52, 0],
            pp: [35, 40, 25, 0],
            evs: [1, 2, 3, 4, 5, 6],
            contest: [7, 8, 9, 10, 11, 12],
            pokerus: 3,
            met_location: 16,
            met_level: 5,
            met_game: 3,
            pokeball: 4,
            ribbons: [1, 0, 2, 0, 4],
            ivs: [31, 0, 15, 7, 30, 1],
            is_egg: false,
            checksum: 0xA5A5,
            status: 0x08,
            level: 16,
            hp: 41,
            max_hp: 45,
            attack: 30,
            defense: 22,
            speed: 28,
            sp_attack: 35,
            sp_defense: 25,
        }
    }

    #[test]
    fn party_image_round_trip() {
        let mon = sample();
        let image = mon.to_party_image();
        assert_eq!(Pokemon::from_party_image(&image), mon);
    }

    #[test]
    fn party_image_offsets_are_stable() {
        let image = sample().to_party_image();
        assert_eq!(&image[0x1A..0x1C], &280u16.to_le_bytes());
        assert_eq!(&image[0x1E..0x22], &4_200u32.to_le_bytes());
        assert_eq!(image[0x52], 16);
        assert_eq!(&image[0x60..0x62], &25u16.to_le_bytes());
    }

    #[test]
    fn battle_record_packs_ivs_and_lookups() {
        let mon = sample();
        let rec = encode_battle_record(&mon, &Typed);
        let packed = u32::from_le_bytes([rec[20], rec[21], rec[22], rec[23]]);
        assert_eq!(packed & 0x1F, 31);
        assert_eq!((packed >> 10) & 0x1F, 15);
        assert_eq!(packed >> 31, 1);
        assert_eq!(rec[32], 41);
        assert_eq!(&rec[33..35], &[10, 12]);
        assert_eq!(rec[58], EOS);
        assert!(rec[24..32].iter().all(|&s| s == DEFAULT_STAT_STAGE));
    }

    #[test]
    fn battle_record_applies_battle_fields() {
        let src = sample();
        let rec = encode_battle_record(&src, &Typed);
        let mut dst = Pokemon {
            ot_id: 99,
            ..Pokemon::default()
        };
        apply_battle_record(&mut dst, &rec);
        assert_eq!(dst.species, src.species);
        assert_eq!(dst.ivs, src.ivs);
        assert_eq!(dst.experience, src.experience);
        assert_eq!(dst.sp_defense, src.sp_defense);
        assert_eq!(dst.ot_id, 99);
    }

    #[test]
    fn move_pp_round_trip() {
        let src = sample();
        let mut dst = Pokemon::default();
        apply_move_pp(&mut dst, &encode_move_pp(&src));
        assert_eq!(dst.moves, src.moves);
        assert_eq!(dst.pp, src.pp);
        assert_eq!(dst.pp_bonuses, src.pp_bonuses);
    }
}
