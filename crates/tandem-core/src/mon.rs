//! The party member record, its field-id space, and the party container.
//!
//! [`Pokemon`] is the in-memory record. Every scalar on it is reachable
//! through [`MonField`] via [`Pokemon::get`] / [`Pokemon::set`], which is
//! what the get/set data commands and the save block use. The byte
//! layouts live in [`record`](crate::record).

use crate::id::{PartyIndex, PARTY_SIZE};

/// Nickname length in bytes, without terminator.
pub const NICKNAME_LEN: usize = 10;
/// Original trainer name length in bytes, without terminator.
pub const OT_NAME_LEN: usize = 7;
/// Number of move slots.
pub const MAX_MOVES: usize = 4;

/// Stat index into IV and EV arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Hit points.
    Hp = 0,
    /// Attack.
    Attack = 1,
    /// Defense.
    Defense = 2,
    /// Speed.
    Speed = 3,
    /// Special attack.
    SpAttack = 4,
    /// Special defense.
    SpDefense = 5,
}

impl Stat {
    /// All stats in storage order.
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::Speed,
        Stat::SpAttack,
        Stat::SpDefense,
    ];
}

/// A party member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pokemon {
    /// Personality value.
    pub personality: u32,
    /// Original trainer id.
    pub ot_id: u32,
    /// Nickname bytes.
    pub nickname: [u8; NICKNAME_LEN],
    /// Original trainer name bytes.
    pub ot_name: [u8; OT_NAME_LEN],
    /// Which of the species' abilities this member has.
    pub ability_num: u8,
    /// Species id. Zero marks an empty slot.
    pub species: u16,
    /// Held item id.
    pub held_item: u16,
    /// Total experience.
    pub experience: u32,
    /// Packed PP-up counts, two bits per move.
    pub pp_bonuses: u8,
    /// Friendship.
    pub friendship: u8,
    /// Known moves.
    pub moves: [u16; MAX_MOVES],
    /// Remaining PP per move.
    pub pp: [u8; MAX_MOVES],
    /// Effort values, indexed by [`Stat`].
    pub evs: [u8; 6],
    /// Cool, beauty, cute, smart, tough, sheen.
    pub contest: [u8; 6],
    /// Pokerus strain and days.
    pub pokerus: u8,
    /// Location met.
    pub met_location: u8,
    /// Level met.
    pub met_level: u8,
    /// Game of origin.
    pub met_game: u8,
    /// Ball caught in.
    pub pokeball: u8,
    /// Contest ribbon ranks: cool, beauty, cute, smart, tough.
    pub ribbons: [u8; 5],
    /// Individual values (0..=31), indexed by [`Stat`].
    pub ivs: [u8; 6],
    /// Egg flag.
    pub is_egg: bool,
    /// Stored checksum.
    pub checksum: u16,
    /// Primary status condition.
    pub status: u32,
    /// Current level.
    pub level: u8,
    /// Current hit points.
    pub hp: u16,
    /// Maximum hit points.
    pub max_hp: u16,
    /// Attack.
    pub attack: u16,
    /// Defense.
    pub defense: u16,
    /// Speed.
    pub speed: u16,
    /// Special attack.
    pub sp_attack: u16,
    /// Special defense.
    pub sp_defense: u16,
}

/// Addressable scalar fields of a [`Pokemon`].
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonField {
    Personality,
    OtId,
    Species,
    HeldItem,
    Experience,
    PpBonuses,
    Friendship,
    Move1,
    Move2,
    Move3,
    Move4,
    Pp1,
    Pp2,
    Pp3,
    Pp4,
    HpEv,
    AttackEv,
    DefenseEv,
    SpeedEv,
    SpAttackEv,
    SpDefenseEv,
    Cool,
    Beauty,
    Cute,
    Smart,
    Tough,
    Sheen,
    Pokerus,
    MetLocation,
    MetLevel,
    MetGame,
    Pokeball,
    HpIv,
    AttackIv,
    DefenseIv,
    SpeedIv,
    SpAttackIv,
    SpDefenseIv,
    AbilityNum,
    IsEgg,
    CoolRibbon,
    BeautyRibbon,
    CuteRibbon,
    SmartRibbon,
    ToughRibbon,
    Checksum,
    Status,
    Level,
    Hp,
    MaxHp,
    Attack,
    Defense,
    Speed,
    SpAttack,
    SpDefense,
}

impl MonField {
    /// Largest value the field can hold. [`Pokemon::set`] masks to this.
    pub fn max_value(self) -> u32 {
        use MonField::*;
        match self {
            Personality | OtId | Experience | Status => u32::MAX,
            Species | HeldItem | Move1 | Move2 | Move3 | Move4 | Checksum | Hp | MaxHp
            | Attack | Defense | Speed | SpAttack | SpDefense => u16::MAX as u32,
            HpIv | AttackIv | DefenseIv | SpeedIv | SpAttackIv | SpDefenseIv => 31,
            AbilityNum | IsEgg => 1,
            _ => u8::MAX as u32,
        }
    }
}

impl Pokemon {
    /// Whether this slot holds a member.
    pub fn is_present(&self) -> bool {
        self.species != 0
    }

    /// Read a field, widened to u32.
    pub fn get(&self, field: MonField) -> u32 {
        use MonField::*;
        match field {
            Personality => self.personality,
            OtId => self.ot_id,
            Species => self.species as u32,
            HeldItem => self.held_item as u32,
            Experience => self.experience,
            PpBonuses => self.pp_bonuses as u32,
            Friendship => self.friendship as u32,
            Move1 => self.moves[0] as u32,
            Move2 => self.moves[1] as u32,
            Move3 => self.moves[2] as u32,
            Move4 => self.moves[3] as u32,
            Pp1 => self.pp[0] as u32,
            Pp2 => self.pp[1] as u32,
            Pp3 => self.pp[2] as u32,
            Pp4 => self.pp[3] as u32,
            HpEv => self.evs[0] as u32,
            AttackEv => self.evs[1] as u32,
            DefenseEv => self.evs[2] as u32,
            SpeedEv => self.evs[3] as u32,
            SpAttackEv => self.evs[4] as u32,
            SpDefenseEv => self.evs[5] as u32,
            Cool => self.contest[0] as u32,
            Beauty => self.contest[1] as u32,
            Cute => self.contest[2] as u32,
            Smart => self.contest[3] as u32,
            Tough => self.contest[4] as u32,
            Sheen => self.contest[5] as u32,
            Pokerus => self.pokerus as u32,
            MetLocation => self.met_location as u32,
            MetLevel => self.met_level as u32,
            MetGame => self.met_game as u32,
            Pokeball => self.pokeball as u32,
            HpIv => self.ivs[0] as u32,
            AttackIv => self.ivs[1] as u32,
            DefenseIv => self.ivs[2] as u32,
            SpeedIv => self.ivs[3] as u32,
            SpAttackIv => self.ivs[4] as u32,
            SpDefenseIv => self.ivs[5] as u32,
            AbilityNum => self.ability_num as u32,
            IsEgg => self.is_egg as u32,
            CoolRibbon => self.ribbons[0] as u32,
            BeautyRibbon => self.ribbons[1] as u32,
            CuteRibbon => self.ribbons[2] as u32,
            SmartRibbon => self.ribbons[3] as u32,
            ToughRibbon => self.ribbons[4] as u32,
            Checksum => self.checksum as u32,
            Status => self.status,
            Level => self.level as u32,
            Hp => self.hp as u32,
            MaxHp => self.max_hp as u32,
            Attack => self.attack as u32,
            Defense => self.defense as u32,
            Speed => self.speed as u32,
            SpAttack => self.sp_attack as u32,
            SpDefense => self.sp_defense as u32,
        }
    }

    /// Write a field. Bits above [`MonField::max_value`] are dropped.
    pub fn set(&mut self, field: MonField, value: u32) {
        use MonField::*;
        let v = value & field.max_value();
        let b = v as u8;
        let h = v as u16;
        match field {
            Personality => self.personality = v,
            OtId => self.ot_id = v,
            Species => self.species = h,
            HeldItem => self.held_item = h,
            Experience => self.experience = v,
            PpBonuses => self.pp_bonuses = b,
            Friendship => self.friendship = b,
            Move1 => self.moves[0] = h,
            Move2 => self.moves[1] = h,
            Move3 => self.moves[2] = h,
            Move4 => self.moves[3] = h,
            Pp1 => self.pp[0] = b,
            Pp2 => self.pp[1] = b,
            Pp3 => self.pp[2] = b,
            Pp4 => self.pp[3] = b,
            HpEv => self.evs[0] = b,
            AttackEv => self.evs[1] = b,
            DefenseEv => self.evs[2] = b,
            SpeedEv => self.evs[3] = b,
            SpAttackEv => self.evs[4] = b,
            SpDefenseEv => self.evs[5] = b,
            Cool => self.contest[0] = b,
            Beauty => self.contest[1] = b,
            Cute => self.contest[2] = b,
            Smart => self.contest[3] = b,
            Tough => self.contest[4] = b,
            Sheen => self.contest[5] = b,
            Pokerus => self.pokerus = b,
            MetLocation => self.met_location = b,
            MetLevel => self.met_level = b,
            MetGame => self.met_game = b,
            Pokeball => self.pokeball = b,
            HpIv => self.ivs[0] = b,
            AttackIv => self.ivs[1] = b,
            DefenseIv => self.ivs[2] = b,
            SpeedIv => self.ivs[3] = b,
            SpAttackIv => self.ivs[4] = b,
            SpDefenseIv => self.ivs[5] = b,
            AbilityNum => self.ability_num = b,
            IsEgg => self.is_egg = v != 0,
            CoolRibbon => self.ribbons[0] = b,
            BeautyRibbon => self.ribbons[1] = b,
            CuteRibbon => self.ribbons[2] = b,
            SmartRibbon => self.ribbons[3] = b,
            ToughRibbon => self.ribbons[4] = b,
            Checksum => self.checksum = h,
            Status => self.status = v,
            Level => self.level = b,
            Hp => self.hp = h,
            MaxHp => self.max_hp = h,
            Attack => self.attack = h,
            Defense => self.defense = h,
            Speed => self.speed = h,
            SpAttack => self.sp_attack = h,
            SpDefense => self.sp_defense = h,
        }
    }
}

// ── Party ──────────────────────────────────────────────────────

/// A fixed-size party of six slots plus a member count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Party {
    members: [Pokemon; PARTY_SIZE],
    count: u8,
}

impl Party {
    /// An empty party.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a party from up to six members. Extra members are ignored.
    pub fn from_members(members: impl IntoIterator<Item = Pokemon>) -> Self {
        let mut party = Self::new();
        for (slot, mon) in party.members.iter_mut().zip(members) {
            *slot = mon;
            party.count += 1;
        }
        party
    }

    /// Number of occupied leading slots.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Override the recorded member count, clamped to the party size.
    pub fn set_count(&mut self, count: u8) {
        self.count = count.min(PARTY_SIZE as u8);
    }

    /// Member at `index`, if the index is a valid slot.
    pub fn get(&self, index: PartyIndex) -> Option<&Pokemon> {
        self.members.get(index.index())
    }

    /// Mutable member at `index`, if the index is a valid slot.
    pub fn get_mut(&mut self, index: PartyIndex) -> Option<&mut Pokemon> {
        self.members.get_mut(index.index())
    }

    /// All six slots, occupied or not.
    pub fn slots(&self) -> &[Pokemon; PARTY_SIZE] {
        &self.members
    }

    /// All six slots, mutably.
    pub fn slots_mut(&mut self) -> &mut [Pokemon; PARTY_SIZE] {
        &mut self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVERY_FIELD: [MonField; 55] = {
        use MonField::*;
        [
            Personality, OtId, Species, HeldItem, Experience, PpBonuses, Friendship, Move1,
            Move2, Move3, Move4, Pp1, Pp2, Pp3, Pp4, HpEv, AttackEv, DefenseEv, SpeedEv,
            SpAttackEv, SpDefenseEv, Cool, Beauty, Cute, Smart, Tough, Sheen, Pokerus,
            MetLocation, MetLevel, MetGame, Pokeball, HpIv, AttackIv, DefenseIv, SpeedIv,
            SpAttackIv, SpDefenseIv, AbilityNum, IsEgg, CoolRibbon, BeautyRibbon, CuteRibbon,
            SmartRibbon, ToughRibbon, Checksum, Status, Level, Hp, MaxHp, Attack, Defense,
            Speed, SpAttack, SpDefense,
        ]
    };

    #[test]
    fn set_masks_to_field_width() {
        let mut mon = Pokemon::default();
        mon.set(MonField::HpIv, 0xFF);
        assert_eq!(mon.ivs[0], 31);
        mon.set(MonField::Species, 0x1_0005);
        assert_eq!(mon.species, 5);
    }

    #[test]
    fn every_field_round_trips_its_max() {
        for field in EVERY_FIELD {
            let mut mon = Pokemon::default();
            mon.set(field, field.max_value());
            assert_eq!(mon.get(field), field.max_value(), "{field:?}");
        }
    }

    #[test]
    fn fields_are_independent() {
        let mut mon = Pokemon::default();
        for (i, field) in EVERY_FIELD.iter().enumerate() {
            mon.set(*field, (i as u32 + 1) & field.max_value());
        }
        for (i, field) in EVERY_FIELD.iter().enumerate() {
            assert_eq!(mon.get(*field), (i as u32 + 1) & field.max_value(), "{field:?}");
        }
    }

    #[test]
    fn party_from_members_counts() {
        let mon = Pokemon {
            species: 25,
            ..Pokemon::default()
        };
        let party = Party::from_members(vec![mon.clone(), mon]);
        assert_eq!(party.count(), 2);
        assert!(party.get(PartyIndex(1)).is_some_and(Pokemon::is_present));
        assert!(!party.slots()[2].is_present());
        assert!(party.get(PartyIndex(6)).is_none());
    }
}
