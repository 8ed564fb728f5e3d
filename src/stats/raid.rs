//! Raid weapon bonuses and raid armor set bonuses.

use crate::data::catalog::{RaidBonus, SetBonus2, SetBonus4, SpecDef};
use crate::data::types::Stat;
use crate::loadout::Loadout;
use crate::stats::stacking::StackContribution;
use crate::stats::{bump, Accumulator};

pub const SET_2PC_PIECES: usize = 2;
pub const SET_4PC_PIECES: usize = 4;
pub const MAX_WEAPON_BUFFS: usize = 2;

pub fn set_flags(raid_pieces: usize) -> (bool, bool) {
    (raid_pieces >= SET_2PC_PIECES, raid_pieces >= SET_4PC_PIECES)
}

pub(crate) fn apply_raid(
    acc: &mut Accumulator,
    loadout: &Loadout,
    spec: Option<&SpecDef>,
    main_stat: Option<Stat>,
) {
    let Some(spec) = spec else {
        return;
    };

    if loadout.has_raid_weapon() {
        match spec.raid_bonus {
            Some(RaidBonus::StatPercent { stat, value }) => {
                acc.stacking.add(StackContribution::percent(stat, value));
                bump(&mut acc.raid_bonus, &format!("{stat}_pct"), value);
                acc.raid_effects.push(format!("raid weapon: {stat} +{value}%"));
            }
            Some(RaidBonus::FlatBuff { stat, value }) => {
                acc.stacking.add(StackContribution::flat(stat, value));
                bump(&mut acc.raid_bonus, stat.as_str(), value);
                acc.raid_effects.push(format!("raid weapon: {stat} +{value}"));
            }
            None => {}
        }
        for buff in spec.weapon_buffs.iter().take(MAX_WEAPON_BUFFS) {
            acc.stacking
                .add(StackContribution::percent(buff.stat, buff.value));
            bump(&mut acc.raid_bonus, &format!("{}_pct", buff.stat), buff.value);
            acc.raid_effects
                .push(format!("weapon buff: {} +{}%", buff.stat, buff.value));
        }
    }

    let (two_piece, four_piece) = set_flags(loadout.raid_armor_count());
    acc.set_2pc = two_piece;
    acc.set_4pc = four_piece;

    if two_piece {
        if let Some(bonus) = spec.set_2pc {
            match bonus {
                SetBonus2::StatPercent { stat, value } => {
                    acc.stacking.add(StackContribution::percent(stat, value));
                    bump(&mut acc.raid_bonus, &format!("{stat}_pct"), value);
                }
                SetBonus2::AttackSpeed { value } => {
                    acc.set_aspd += value;
                    bump(&mut acc.raid_bonus, "aspd", value);
                }
                SetBonus2::CastSpeed { value } => {
                    acc.set_cspd += value;
                    bump(&mut acc.raid_bonus, "cspd", value);
                }
                SetBonus2::MasteryToCritDamage { ratio } => {
                    acc.mastery_to_crit_damage += ratio;
                }
                SetBonus2::ArmorIgnore { value } => {
                    acc.attack.armor_ignore_pct += value;
                    bump(&mut acc.raid_bonus, "armor_ignore", value);
                }
                SetBonus2::ConditionalAttackSpeed { value, below } => {
                    acc.conditional_aspd = Some((value, below));
                }
            }
            acc.raid_effects.push(format!("2pc: {}", bonus.describe()));
        }
    }

    if four_piece {
        if let Some(bonus) = spec.set_4pc {
            match bonus {
                SetBonus4::CritDamage { value } => {
                    acc.attack.crit_damage_pct += value;
                    bump(&mut acc.raid_bonus, "crit_damage", value);
                }
                SetBonus4::Haste { value } => {
                    *acc.pct_points.entry(Stat::Haste).or_insert(0.0) += value;
                    bump(&mut acc.raid_bonus, "haste_pct", value);
                }
                SetBonus4::MainStatPercent { value } => {
                    if let Some(stat) = main_stat {
                        acc.stacking.add(StackContribution::percent(stat, value));
                        bump(&mut acc.raid_bonus, &format!("{stat}_pct"), value);
                    }
                }
            }
            acc.raid_effects.push(format!("4pc: {}", bonus.describe()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_gating() {
        assert_eq!(set_flags(0), (false, false));
        assert_eq!(set_flags(1), (false, false));
        assert_eq!(set_flags(2), (true, false));
        assert_eq!(set_flags(3), (true, false));
        assert_eq!(set_flags(4), (true, true));
        assert_eq!(set_flags(9), (true, true));
    }
}
