//! Built-in reference dataset used when no catalog file is configured.

use std::collections::BTreeMap;

use crate::data::catalog::{
    BondTier, Catalog, ClassDef, DrConstant, FactorDef, FactorEffectDef, FactorKind, GearTier,
    ImagineDef, LegacyTiers, ModuleAffix, ModuleBonus, ModuleTarget, ProjectionDef,
    ProjectionRow, RaidBonus, SetBonus2, SetBonus4, SigilDef, SpecDef, StatBonus, TalentDef,
    TierValues, DEFAULT_BOND_UNLOCK_LEVEL,
};
use crate::data::types::{AttackType, PurpleKind, Stat};

pub const DEFAULT_GOLD_TIER: &str = "gold_t1";
pub const DEFAULT_RAID_TIER: &str = "raid_t1";

/// Full built-in catalog with talent and bond text already compiled.
pub fn builtin_catalog() -> Catalog {
    let mut catalog = Catalog {
        dr: default_dr(),
        tiers: default_tiers(),
        legacy: LegacyTiers {
            weapon_gold: tier(700.0, 460.0, 230.0),
            weapon_raid: tier(940.0, 620.0, 310.0),
            other_gold: tier(460.0, 300.0, 150.0),
            other_raid: tier(620.0, 410.0, 205.0),
        },
        sigils: default_sigils(),
        module_affixes: default_module_affixes(),
        imagines: default_imagines(),
        purple: default_purple(),
        talents: default_talents(),
        classes: default_classes(),
        factors: default_factors(),
        projections: default_projections(),
        gold_tier: DEFAULT_GOLD_TIER.to_string(),
        raid_tier: DEFAULT_RAID_TIER.to_string(),
    };
    catalog.compile_effects();
    catalog
}

fn default_dr() -> BTreeMap<Stat, DrConstant> {
    BTreeMap::from([
        (Stat::Versatility, DrConstant { base: 0.0, constant: 11200.0 }),
        (Stat::Mastery, DrConstant { base: 6.0, constant: 19975.0 }),
        (Stat::Crit, DrConstant { base: 5.0, constant: 19975.0 }),
        (Stat::Luck, DrConstant { base: 5.0, constant: 19975.0 }),
        (Stat::Haste, DrConstant { base: 0.0, constant: 19975.0 }),
    ])
}

fn tier(primary: f64, secondary: f64, reforge: f64) -> TierValues {
    TierValues {
        primary,
        secondary,
        reforge,
    }
}

fn default_tiers() -> BTreeMap<String, GearTier> {
    BTreeMap::from([
        (
            DEFAULT_GOLD_TIER.to_string(),
            GearTier {
                raid: false,
                weapon: tier(756.0, 504.0, 252.0),
                armor: tier(504.0, 336.0, 168.0),
                accessory: tier(378.0, 252.0, 126.0),
            },
        ),
        (
            DEFAULT_RAID_TIER.to_string(),
            GearTier {
                raid: true,
                weapon: tier(1008.0, 672.0, 336.0),
                armor: tier(672.0, 448.0, 224.0),
                accessory: tier(504.0, 336.0, 168.0),
            },
        ),
    ])
}

fn bonus(stat: Stat, value: f64) -> StatBonus {
    StatBonus { stat, value }
}

fn sigil(main: Stat, main_step: f64, sub: Option<(Stat, f64)>) -> SigilDef {
    let levels = (1..=3)
        .map(|level| {
            let level = f64::from(level);
            let mut bonuses = vec![bonus(main, main_step * level)];
            if let Some((stat, step)) = sub {
                bonuses.push(bonus(stat, step * level));
            }
            bonuses
        })
        .collect();
    SigilDef { levels }
}

fn default_sigils() -> BTreeMap<String, SigilDef> {
    BTreeMap::from([
        (
            "vanguard".to_string(),
            sigil(Stat::Agility, 30.0, Some((Stat::Crit, 40.0))),
        ),
        (
            "sage".to_string(),
            sigil(Stat::Intellect, 30.0, Some((Stat::Mastery, 40.0))),
        ),
        (
            "bulwark".to_string(),
            sigil(Stat::Strength, 30.0, Some((Stat::Versatility, 40.0))),
        ),
        ("swift".to_string(), sigil(Stat::Haste, 60.0, None)),
        ("fortune".to_string(), sigil(Stat::Luck, 60.0, None)),
    ])
}

/// Six module levels growing linearly by `step`.
fn ladder(target: ModuleTarget, step: f64) -> ModuleAffix {
    let levels = (1..=6)
        .map(|level| {
            vec![ModuleBonus {
                target,
                value: step * f64::from(level),
            }]
        })
        .collect();
    ModuleAffix { levels }
}

fn default_module_affixes() -> BTreeMap<String, ModuleAffix> {
    let mut adaptive_power = ladder(ModuleTarget::MainStat, 10.0);
    if let Some(top) = adaptive_power.levels.last_mut() {
        top.push(ModuleBonus {
            target: ModuleTarget::AttackPercent,
            value: 2.0,
        });
    }

    BTreeMap::from([
        ("crit_focus".to_string(), ladder(ModuleTarget::Stat(Stat::Crit), 30.0)),
        ("luck_focus".to_string(), ladder(ModuleTarget::Stat(Stat::Luck), 30.0)),
        ("haste_focus".to_string(), ladder(ModuleTarget::Stat(Stat::Haste), 30.0)),
        ("mastery_focus".to_string(), ladder(ModuleTarget::Stat(Stat::Mastery), 30.0)),
        (
            "versatility_focus".to_string(),
            ladder(ModuleTarget::Stat(Stat::Versatility), 30.0),
        ),
        ("agile_body".to_string(), ladder(ModuleTarget::Stat(Stat::Agility), 10.0)),
        ("adaptive_power".to_string(), adaptive_power),
        ("adaptive_attack".to_string(), ladder(ModuleTarget::Attack, 15.0)),
        ("swift_strikes".to_string(), ladder(ModuleTarget::AttackSpeed, 1.0)),
        ("spell_tempo".to_string(), ladder(ModuleTarget::CastSpeed, 1.0)),
        ("lethal_focus".to_string(), ladder(ModuleTarget::CritDamage, 2.0)),
    ])
}

fn default_imagines() -> BTreeMap<String, ImagineDef> {
    let values = [120.0, 150.0, 180.0, 210.0, 240.0, 300.0];
    [
        ("storm_eye", Stat::Crit),
        ("lucky_charm", Stat::Luck),
        ("hourglass", Stat::Haste),
        ("sage_tome", Stat::Mastery),
        ("aegis_idol", Stat::Versatility),
    ]
    .into_iter()
    .map(|(name, stat)| (name.to_string(), ImagineDef { stat, values }))
    .collect()
}

fn default_purple() -> BTreeMap<PurpleKind, Vec<f64>> {
    BTreeMap::from([
        (PurpleKind::AttackSpeed, vec![2.0, 2.5, 3.0, 3.5, 4.0]),
        (PurpleKind::CastSpeed, vec![2.0, 2.5, 3.0, 3.5, 4.0]),
        (PurpleKind::CritDamage, vec![4.0, 5.0, 6.0, 7.0, 8.0]),
        (PurpleKind::AttackPercent, vec![2.0, 2.5, 3.0, 3.5, 4.0]),
        (PurpleKind::MaxHp, vec![3.0, 4.0, 5.0, 6.0, 7.0]),
    ])
}

fn default_talents() -> BTreeMap<String, TalentDef> {
    [
        ("swift_edge", "Attack Speed +6%"),
        ("arcane_flow", "Cast Speed +8%"),
        ("keen_eye", "Crit +3%"),
        ("fortune_favored", "Luck +3%"),
        ("deep_focus", "Mastery +3%"),
        ("adaptability", "Versatility +2%"),
        ("lethal_edge", "Crit DMG +10%"),
        ("vitality", "Max HP +8%"),
        ("iron_skin", "Armor +10%"),
        ("honed_mastery", "Mastery +300"),
        ("plated", "Armor +500"),
        ("tempo", "When Haste ≥ 3000: Attack Speed +5%"),
        ("storm_rhythm", "Haste conversion +100%"),
        ("blade_reservoir", "Blade Intent capacity raised by 20"),
        ("quickening", "Blade Intent and Sigil regeneration are 50% faster"),
        ("double_edge", "Skill hits strike twice while Blade Intent is at least 70"),
    ]
    .into_iter()
    .map(|(name, text)| {
        (
            name.to_string(),
            TalentDef {
                text: text.to_string(),
                ..TalentDef::default()
            },
        )
    })
    .collect()
}

fn default_classes() -> BTreeMap<String, ClassDef> {
    let stormblade = ClassDef {
        main_stat: Stat::Agility,
        attack_type: AttackType::Physical,
        aspd_ratio: 1.0,
        cspd_ratio: 0.5,
        specs: BTreeMap::from([
            (
                "iaido".to_string(),
                SpecDef {
                    primary: Stat::Crit,
                    secondary: Stat::Haste,
                    raid_bonus: Some(RaidBonus::StatPercent {
                        stat: Stat::Crit,
                        value: 8.0,
                    }),
                    weapon_buffs: vec![bonus(Stat::Crit, 4.0), bonus(Stat::Haste, 4.0)],
                    set_2pc: Some(SetBonus2::ConditionalAttackSpeed {
                        value: 10.0,
                        below: 80.0,
                    }),
                    set_4pc: Some(SetBonus4::CritDamage { value: 12.0 }),
                },
            ),
            (
                "moonstrike".to_string(),
                SpecDef {
                    primary: Stat::Haste,
                    secondary: Stat::Luck,
                    raid_bonus: Some(RaidBonus::FlatBuff {
                        stat: Stat::Luck,
                        value: 300.0,
                    }),
                    weapon_buffs: vec![bonus(Stat::Luck, 5.0)],
                    set_2pc: Some(SetBonus2::AttackSpeed { value: 6.0 }),
                    set_4pc: Some(SetBonus4::Haste { value: 4.0 }),
                },
            ),
        ]),
    };

    let frost_mage = ClassDef {
        main_stat: Stat::Intellect,
        attack_type: AttackType::Magic,
        aspd_ratio: 0.4,
        cspd_ratio: 1.0,
        specs: BTreeMap::from([
            (
                "icicle".to_string(),
                SpecDef {
                    primary: Stat::Mastery,
                    secondary: Stat::Crit,
                    raid_bonus: Some(RaidBonus::StatPercent {
                        stat: Stat::Mastery,
                        value: 8.0,
                    }),
                    weapon_buffs: vec![bonus(Stat::Mastery, 5.0)],
                    set_2pc: Some(SetBonus2::MasteryToCritDamage { ratio: 0.5 }),
                    set_4pc: Some(SetBonus4::MainStatPercent { value: 6.0 }),
                },
            ),
            (
                "frostbeam".to_string(),
                SpecDef {
                    primary: Stat::Haste,
                    secondary: Stat::Mastery,
                    raid_bonus: Some(RaidBonus::FlatBuff {
                        stat: Stat::Haste,
                        value: 300.0,
                    }),
                    weapon_buffs: Vec::new(),
                    set_2pc: Some(SetBonus2::CastSpeed { value: 8.0 }),
                    set_4pc: Some(SetBonus4::Haste { value: 4.0 }),
                },
            ),
        ]),
    };

    let shield_knight = ClassDef {
        main_stat: Stat::Strength,
        attack_type: AttackType::Physical,
        aspd_ratio: 0.8,
        cspd_ratio: 0.4,
        specs: BTreeMap::from([
            (
                "bulwark".to_string(),
                SpecDef {
                    primary: Stat::Versatility,
                    secondary: Stat::Mastery,
                    raid_bonus: Some(RaidBonus::StatPercent {
                        stat: Stat::Versatility,
                        value: 8.0,
                    }),
                    weapon_buffs: vec![bonus(Stat::Versatility, 3.0), bonus(Stat::Mastery, 3.0)],
                    set_2pc: Some(SetBonus2::ArmorIgnore { value: 10.0 }),
                    set_4pc: Some(SetBonus4::MainStatPercent { value: 5.0 }),
                },
            ),
            (
                "recovery".to_string(),
                SpecDef {
                    primary: Stat::Mastery,
                    secondary: Stat::Versatility,
                    raid_bonus: None,
                    weapon_buffs: Vec::new(),
                    set_2pc: Some(SetBonus2::StatPercent {
                        stat: Stat::Versatility,
                        value: 6.0,
                    }),
                    set_4pc: Some(SetBonus4::CritDamage { value: 8.0 }),
                },
            ),
        ]),
    };

    BTreeMap::from([
        ("stormblade".to_string(), stormblade),
        ("frost_mage".to_string(), frost_mage),
        ("shield_knight".to_string(), shield_knight),
    ])
}

fn factor(description: &str, effects: Vec<FactorEffectDef>) -> FactorDef {
    FactorDef {
        description: description.to_string(),
        effects,
    }
}

fn effect(kind: FactorKind, grade10: f64, grade1: Option<f64>) -> FactorEffectDef {
    FactorEffectDef {
        kind,
        grade10,
        grade1,
    }
}

fn default_factors() -> BTreeMap<String, FactorDef> {
    let flat = |stat| FactorKind::FlatStat { stat };
    BTreeMap::from([
        (
            "crit_resonance".to_string(),
            factor("Crit +600", vec![effect(flat(Stat::Crit), 600.0, Some(120.0))]),
        ),
        (
            "luck_resonance".to_string(),
            factor("Luck +600", vec![effect(flat(Stat::Luck), 600.0, Some(120.0))]),
        ),
        (
            "haste_resonance".to_string(),
            factor("Haste +600", vec![effect(flat(Stat::Haste), 600.0, Some(120.0))]),
        ),
        (
            "mastery_resonance".to_string(),
            factor(
                "Mastery +600",
                vec![effect(flat(Stat::Mastery), 600.0, Some(120.0))],
            ),
        ),
        (
            "agility_surge".to_string(),
            factor("Agility +200", vec![effect(flat(Stat::Agility), 200.0, None)]),
        ),
        (
            "crit_amplify".to_string(),
            factor(
                "Crit +10%",
                vec![effect(FactorKind::StatPercent { stat: Stat::Crit }, 10.0, None)],
            ),
        ),
        (
            "luck_gain".to_string(),
            factor(
                "Luck gain +12%, Versatility gain -6%",
                vec![
                    effect(FactorKind::GainMultiplier { stat: Stat::Luck }, 12.0, None),
                    effect(
                        FactorKind::GainMultiplier {
                            stat: Stat::Versatility,
                        },
                        -6.0,
                        None,
                    ),
                ],
            ),
        ),
        (
            "storm_conduit".to_string(),
            factor(
                "Stormblade ATK +5% of Haste",
                vec![effect(
                    FactorKind::AttackFromStat {
                        class: "stormblade".to_string(),
                        stat: Stat::Haste,
                    },
                    5.0,
                    None,
                )],
            ),
        ),
        (
            "elemental_core".to_string(),
            factor(
                "All element +80",
                vec![effect(FactorKind::AllElement, 80.0, Some(8.0))],
            ),
        ),
        (
            "special_edge".to_string(),
            factor(
                "Special skill damage +10%",
                vec![effect(FactorKind::SpecialSkillDamage, 10.0, None)],
            ),
        ),
        (
            "expertise_edge".to_string(),
            factor(
                "Expertise skill damage +10%",
                vec![effect(FactorKind::ExpertiseSkillDamage, 10.0, None)],
            ),
        ),
        (
            "surge_fury".to_string(),
            factor(
                "ATK +12% during Volt Surge",
                vec![effect(
                    FactorKind::ConditionalAttack {
                        buff: "volt_surge".to_string(),
                    },
                    12.0,
                    None,
                )],
            ),
        ),
        (
            "storm_element".to_string(),
            factor(
                "Element damage +8% during Volt Surge",
                vec![effect(
                    FactorKind::ConditionalElement {
                        buff: "volt_surge".to_string(),
                    },
                    8.0,
                    None,
                )],
            ),
        ),
        (
            "thunder_focus".to_string(),
            factor(
                "Thunder Strike damage +15%",
                vec![effect(
                    FactorKind::SkillDamage {
                        skill: "thunder_strike".to_string(),
                    },
                    15.0,
                    None,
                )],
            ),
        ),
    ])
}

fn default_projections() -> BTreeMap<String, ProjectionDef> {
    let tempest = ProjectionDef {
        rows: vec![
            ProjectionRow::Root,
            ProjectionRow::BranchPair { left: 0, right: 1 },
            ProjectionRow::FactorSlot { slot: 2 },
            ProjectionRow::FactorSlot { slot: 3 },
            ProjectionRow::BranchPair { left: 4, right: 5 },
            ProjectionRow::FactorSlot { slot: 6 },
            ProjectionRow::FactorSlot { slot: 7 },
            ProjectionRow::BranchPair { left: 8, right: 9 },
            ProjectionRow::Final,
        ],
        bond_general: vec![
            BondTier {
                level: 2,
                bonuses: vec![bonus(Stat::Crit, 50.0)],
            },
            BondTier {
                level: 5,
                bonuses: vec![bonus(Stat::Luck, 50.0)],
            },
            BondTier {
                level: 12,
                bonuses: vec![bonus(Stat::Haste, 80.0)],
            },
            BondTier {
                level: 20,
                bonuses: vec![bonus(Stat::Crit, 100.0)],
            },
            BondTier {
                level: 25,
                bonuses: vec![bonus(Stat::Luck, 100.0), bonus(Stat::MaxHp, 500.0)],
            },
        ],
        unlock_level: DEFAULT_BOND_UNLOCK_LEVEL,
        exclusive_text: vec![
            "Dream DMG +6%".to_string(),
            "Main stats +120".to_string(),
            "When HP above 70%, Crit +4% and Luck +4%".to_string(),
        ],
        exclusive: Vec::new(),
    };

    let glacier = ProjectionDef {
        rows: vec![
            ProjectionRow::Root,
            ProjectionRow::FactorSlot { slot: 0 },
            ProjectionRow::BranchPair { left: 1, right: 2 },
            ProjectionRow::FactorSlot { slot: 3 },
            ProjectionRow::BranchPair { left: 4, right: 5 },
            ProjectionRow::Final,
        ],
        bond_general: vec![
            BondTier {
                level: 2,
                bonuses: vec![bonus(Stat::Mastery, 50.0)],
            },
            BondTier {
                level: 5,
                bonuses: vec![bonus(Stat::Versatility, 50.0)],
            },
            BondTier {
                level: 12,
                bonuses: vec![bonus(Stat::Mastery, 80.0)],
            },
            BondTier {
                level: 20,
                bonuses: vec![bonus(Stat::Versatility, 100.0)],
            },
            BondTier {
                level: 25,
                bonuses: vec![bonus(Stat::Armor, 400.0)],
            },
        ],
        unlock_level: 30,
        exclusive_text: vec![
            "Dream DMG +4%".to_string(),
            "Crit +2%".to_string(),
            "Luck +2%".to_string(),
        ],
        exclusive: Vec::new(),
    };

    BTreeMap::from([
        ("tempest".to_string(), tempest),
        ("glacier".to_string(), glacier),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::SlotType;

    #[test]
    fn builtin_catalog_has_default_dr_constants() {
        let catalog = builtin_catalog();
        let mastery = catalog.dr(Stat::Mastery).expect("mastery constant");
        assert_eq!(mastery.base, 6.0);
        assert_eq!(mastery.constant, 19975.0);
        let vers = catalog.dr(Stat::Versatility).expect("versatility constant");
        assert_eq!(vers.constant, 11200.0);
    }

    #[test]
    fn optimizer_tiers_exist() {
        let catalog = builtin_catalog();
        assert!(catalog.tier(&catalog.gold_tier).is_some());
        assert!(catalog.tier(&catalog.raid_tier).map(|t| t.raid).unwrap_or(false));
        assert_eq!(
            catalog
                .tier_values(DEFAULT_GOLD_TIER, SlotType::Weapon)
                .map(|t| t.primary),
            Some(756.0)
        );
    }

    #[test]
    fn stat_talents_compile_and_combat_talents_do_not() {
        let catalog = builtin_catalog();
        assert!(!catalog.talent("swift_edge").expect("swift_edge").effects.is_empty());
        assert!(catalog.talent("tempo").and_then(|t| t.condition).is_some());
        let mut uncompiled = catalog.uncompiled_talents();
        uncompiled.sort_unstable();
        assert_eq!(uncompiled, vec!["blade_reservoir", "double_edge", "quickening"]);
    }

    #[test]
    fn projections_compile_exclusive_bonuses() {
        let catalog = builtin_catalog();
        assert_eq!(
            catalog.projection("tempest").map(|p| p.exclusive.len()),
            Some(3)
        );
        assert_eq!(catalog.projection("glacier").map(|p| p.unlock_level), Some(30));
    }
}
