//! Module affix points → levels → stat bundles.

use std::collections::BTreeMap;

use crate::data::catalog::{Catalog, ClassDef, ModuleTarget};
use crate::data::types::AttackType;
use crate::loadout::Loadout;
use crate::stats::stacking::StackContribution;
use crate::stats::{bump, Accumulator};

/// Cumulative points needed for module levels 1 through 6.
pub const MODULE_LEVEL_THRESHOLDS: [u32; 6] = [1, 4, 8, 12, 16, 20];

pub fn module_level(points: u32) -> u8 {
    MODULE_LEVEL_THRESHOLDS
        .iter()
        .filter(|threshold| points >= **threshold)
        .count() as u8
}

/// Points per affix summed across all module slots (rarity-active sub-slots only).
pub fn affix_points(loadout: &Loadout) -> BTreeMap<String, u32> {
    let mut points = BTreeMap::new();
    for module in &loadout.modules {
        for (affix, value) in module.active_affixes() {
            *points.entry(affix.to_string()).or_insert(0) += u32::from(value);
        }
    }
    points
}

pub(crate) fn apply_modules(
    acc: &mut Accumulator,
    loadout: &Loadout,
    catalog: &Catalog,
    class: Option<&ClassDef>,
) {
    for (affix, points) in affix_points(loadout) {
        let level = module_level(points);
        let Some(bonuses) = catalog.module_bonus(&affix, level) else {
            continue;
        };
        for bonus in bonuses {
            match bonus.target {
                ModuleTarget::Stat(stat) => {
                    acc.stacking.add(StackContribution::base(stat, bonus.value));
                    bump(&mut acc.module, stat.as_str(), bonus.value);
                }
                ModuleTarget::MainStat => {
                    if let Some(class) = class {
                        acc.stacking
                            .add(StackContribution::base(class.main_stat, bonus.value));
                        bump(&mut acc.module, class.main_stat.as_str(), bonus.value);
                    }
                }
                ModuleTarget::Attack => {
                    let label = match class.map(|c| c.attack_type).unwrap_or_default() {
                        AttackType::Physical => "atk",
                        AttackType::Magic => "matk",
                    };
                    acc.attack.flat_attack += bonus.value;
                    bump(&mut acc.module, label, bonus.value);
                }
                ModuleTarget::AttackPercent => {
                    acc.attack.attack_pct += bonus.value;
                    bump(&mut acc.module, "attack_pct", bonus.value);
                }
                ModuleTarget::AttackSpeed => bump(&mut acc.module, "aspd", bonus.value),
                ModuleTarget::CastSpeed => bump(&mut acc.module, "cspd", bonus.value),
                ModuleTarget::CritDamage => {
                    acc.attack.crit_damage_pct += bonus.value;
                    bump(&mut acc.module, "crit_damage", bonus.value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::ModuleRarity;
    use crate::loadout::{AffixRoll, ModuleSlot};

    #[test]
    fn level_thresholds() {
        assert_eq!(module_level(0), 0);
        assert_eq!(module_level(1), 1);
        assert_eq!(module_level(3), 1);
        assert_eq!(module_level(4), 2);
        assert_eq!(module_level(19), 5);
        assert_eq!(module_level(20), 6);
        assert_eq!(module_level(1000), 6);
    }

    #[test]
    fn points_accumulate_across_slots() {
        let mut loadout = Loadout::default();
        for slot in loadout.modules.iter_mut().take(2) {
            *slot = ModuleSlot {
                rarity: ModuleRarity::Blue,
                affixes: vec![
                    AffixRoll {
                        affix: "crit_focus".to_string(),
                        points: 6,
                    },
                    AffixRoll {
                        affix: "ignored".to_string(),
                        points: 10,
                    },
                ],
            };
        }
        let points = affix_points(&loadout);
        assert_eq!(points.get("crit_focus"), Some(&12));
        assert!(!points.contains_key("ignored"));
    }
}
