//! Experience curves and stat formulas.
//!
//! Species tables themselves are external; [`SpeciesInfo`](crate::traits::SpeciesInfo)
//! supplies the growth rate and base stats per species.

use crate::mon::{Pokemon, Stat};
use crate::traits::SpeciesInfo;

/// Highest level a member can reach.
pub const MAX_LEVEL: u8 = 100;

/// Experience curve shared by a group of species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GrowthRate {
    /// `n^3`.
    #[default]
    MediumFast,
    /// Piecewise, fast early and slow late.
    Erratic,
    /// Piecewise, slow early and fast late.
    Fluctuating,
    /// `6/5 n^3 - 15 n^2 + 100 n - 140`.
    MediumSlow,
    /// `4/5 n^3`.
    Fast,
    /// `5/4 n^3`.
    Slow,
}

impl GrowthRate {
    /// Total experience needed to be at `level`. Level 1 and below need none.
    pub fn experience_for_level(self, level: u8) -> u32 {
        if level <= 1 {
            return 0;
        }
        let n = level as i64;
        let cube = n * n * n;
        let exp = match self {
            Self::MediumFast => cube,
            Self::Erratic => {
                if n <= 50 {
                    cube * (100 - n) / 50
                } else if n <= 68 {
                    cube * (150 - n) / 100
                } else if n <= 98 {
                    cube * ((1911 - 10 * n) / 3) / 500
                } else {
                    cube * (160 - n) / 100
                }
            }
            Self::Fluctuating => {
                if n <= 15 {
                    cube * ((n + 1) / 3 + 24) / 50
                } else if n <= 36 {
                    cube * (n + 14) / 50
                } else {
                    cube * (n / 2 + 32) / 50
                }
            }
            Self::MediumSlow => 6 * cube / 5 - 15 * n * n + 100 * n - 140,
            Self::Fast => 4 * cube / 5,
            Self::Slow => 5 * cube / 4,
        };
        exp.max(0) as u32
    }

    /// Highest level in `1..=max_level` whose threshold `experience` meets.
    pub fn level_for_experience(self, experience: u32, max_level: u8) -> u8 {
        let mut level = 1;
        while level < max_level && self.experience_for_level(level + 1) <= experience {
            level += 1;
        }
        level
    }
}

/// Per-species base stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BaseStats {
    /// Base hit points.
    pub hp: u8,
    /// Base attack.
    pub attack: u8,
    /// Base defense.
    pub defense: u8,
    /// Base speed.
    pub speed: u8,
    /// Base special attack.
    pub sp_attack: u8,
    /// Base special defense.
    pub sp_defense: u8,
}

fn stat_core(base: u8, iv: u8, ev: u8, level: u8) -> u32 {
    (2 * base as u32 + iv as u32 + ev as u32 / 4) * level as u32 / 100
}

/// Re-derive level from experience and recompute every derived stat.
///
/// Current HP moves by the change in max HP. A fainted member stays at 0
/// unless it had never been initialised, in which case it starts full.
pub fn recalculate_stats(mon: &mut Pokemon, species: &dyn SpeciesInfo, max_level: u8) {
    let base = species.base_stats(mon.species);
    let level = species
        .growth_rate(mon.species)
        .level_for_experience(mon.experience, max_level);
    let old_max = mon.max_hp as i32;

    let stat = |s: Stat, b: u8| stat_core(b, mon.ivs[s as usize], mon.evs[s as usize], level);
    let new_max = (stat(Stat::Hp, base.hp) + level as u32 + 10).min(u16::MAX as u32) as u16;
    let attack = (stat(Stat::Attack, base.attack) + 5) as u16;
    let defense = (stat(Stat::Defense, base.defense) + 5) as u16;
    let speed = (stat(Stat::Speed, base.speed) + 5) as u16;
    let sp_attack = (stat(Stat::SpAttack, base.sp_attack) + 5) as u16;
    let sp_defense = (stat(Stat::SpDefense, base.sp_defense) + 5) as u16;

    mon.level = level;
    mon.max_hp = new_max;
    mon.attack = attack;
    mon.defense = defense;
    mon.speed = speed;
    mon.sp_attack = sp_attack;
    mon.sp_defense = sp_defense;

    if mon.hp == 0 && old_max == 0 {
        mon.hp = new_max;
    } else if mon.hp != 0 {
        let hp = mon.hp as i32 + new_max as i32 - old_max;
        mon.hp = hp.clamp(1, new_max as i32) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(GrowthRate);

    impl SpeciesInfo for Flat {
        fn growth_rate(&self, _species: u16) -> GrowthRate {
            self.0
        }
        fn base_stats(&self, _species: u16) -> BaseStats {
            BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                speed: 50,
                sp_attack: 50,
                sp_defense: 50,
            }
        }
    }

    #[test]
    fn known_thresholds() {
        assert_eq!(GrowthRate::MediumFast.experience_for_level(100), 1_000_000);
        assert_eq!(GrowthRate::Erratic.experience_for_level(100), 600_000);
        assert_eq!(GrowthRate::Fluctuating.experience_for_level(100), 1_640_000);
        assert_eq!(GrowthRate::MediumSlow.experience_for_level(100), 1_059_860);
        assert_eq!(GrowthRate::Fast.experience_for_level(100), 800_000);
        assert_eq!(GrowthRate::Slow.experience_for_level(100), 1_250_000);
        assert_eq!(GrowthRate::MediumSlow.experience_for_level(2), 9);
        assert_eq!(GrowthRate::Slow.experience_for_level(1), 0);
    }

    #[test]
    fn curves_are_monotonic() {
        for rate in [
            GrowthRate::MediumFast,
            GrowthRate::Erratic,
            GrowthRate::Fluctuating,
            GrowthRate::MediumSlow,
            GrowthRate::Fast,
            GrowthRate::Slow,
        ] {
            for level in 1..MAX_LEVEL {
                assert!(
                    rate.experience_for_level(level) <= rate.experience_for_level(level + 1),
                    "{rate:?} at {level}"
                );
            }
        }
    }

    #[test]
    fn level_from_exact_threshold() {
        let rate = GrowthRate::MediumFast;
        assert_eq!(rate.level_for_experience(125, MAX_LEVEL), 5);
        assert_eq!(rate.level_for_experience(124, MAX_LEVEL), 4);
        assert_eq!(rate.level_for_experience(u32::MAX, MAX_LEVEL), MAX_LEVEL);
    }

    #[test]
    fn recalc_carries_hp_delta() {
        let mut mon = Pokemon {
            species: 1,
            level: 5,
            experience: 125,
            ..Pokemon::default()
        };
        let info = Flat(GrowthRate::MediumFast);
        recalculate_stats(&mut mon, &info, MAX_LEVEL);
        let full = mon.max_hp;
        assert_eq!(mon.hp, full);

        mon.hp = full - 3;
        mon.experience = 216;
        recalculate_stats(&mut mon, &info, MAX_LEVEL);
        assert_eq!(mon.level, 6);
        assert_eq!(mon.hp, mon.max_hp - 3);
    }

    #[test]
    fn fainted_stays_fainted() {
        let mut mon = Pokemon {
            species: 1,
            experience: 125,
            max_hp: 20,
            hp: 0,
            ..Pokemon::default()
        };
        recalculate_stats(&mut mon, &Flat(GrowthRate::MediumFast), MAX_LEVEL);
        assert_eq!(mon.hp, 0);
    }
}
