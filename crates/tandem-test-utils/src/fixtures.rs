//! Reusable party fixtures.
//!
//! - [`partner_party`]: six conscious members with distinct species.
//! - [`member`]: one member with consistent level, experience and stats.

use tandem_core::{recalculate_stats, GrowthRate, Party, Pokemon, MAX_LEVEL};

use crate::TableSpecies;

/// A member of `species` at `level`, with experience at the level's
/// threshold and stats derived from [`TableSpecies`] defaults.
pub fn member(species: u16, level: u8, moves: [u16; 4]) -> Pokemon {
    let mut mon = Pokemon {
        personality: 0x1234_0000 | species as u32,
        ot_id: 0x0000_BEEF,
        species,
        experience: GrowthRate::MediumFast.experience_for_level(level),
        friendship: 70,
        moves,
        pp: [20, 15, 10, 5],
        ivs: [15, 20, 25, 10, 5, 30],
        ..Pokemon::default()
    };
    mon.nickname[..4].copy_from_slice(b"MON\xFF");
    recalculate_stats(&mut mon, &TableSpecies::default(), MAX_LEVEL);
    mon
}

/// Six members, species 1..=6. The partner's own half is slots 3..6.
pub fn partner_party() -> Party {
    Party::from_members([
        member(1, 12, [33, 45, 0, 0]),
        member(2, 14, [10, 39, 0, 0]),
        member(3, 10, [52, 0, 0, 0]),
        member(4, 20, [33, 45, 164, 52]),
        member(5, 18, [55, 98, 0, 0]),
        member(6, 16, [17, 84, 0, 0]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::PARTY_SIZE;

    #[test]
    fn party_is_full_and_conscious() {
        let party = partner_party();
        assert_eq!(party.count() as usize, PARTY_SIZE);
        for mon in party.slots() {
            assert!(mon.is_present());
            assert!(mon.hp > 0);
            assert_eq!(mon.hp, mon.max_hp);
        }
    }

    #[test]
    fn level_matches_experience() {
        let mon = member(9, 30, [1, 0, 0, 0]);
        assert_eq!(mon.level, 30);
    }
}
