//! Psychoscope factor resolution: walks the selected projection tree and turns
//! factor assignments and bond level into [FactorEffects].

pub mod config;
pub mod effects;

pub use config::{
    BranchSide, FactorAssignment, PsychoscopeConfig, FACTOR_SLOT_COUNT, MAX_BOND_LEVEL,
    MAX_GRADE,
};
pub use effects::{ConditionalCritLuck, FactorEffects};

use crate::data::catalog::{Catalog, FactorEffectDef, FactorKind};

/// Magnitude at `grade`: linear between grade 1 and grade 10 when both are
/// defined, otherwise proportional to the grade-10 value.
pub fn interpolate(grade10: f64, grade1: Option<f64>, grade: u8) -> f64 {
    let grade = f64::from(grade.clamp(1, MAX_GRADE));
    match grade1 {
        Some(v1) => v1 + (grade10 - v1) * (grade - 1.0) / 9.0,
        None => grade10 * grade / 10.0,
    }
}

fn apply_factor_effect(
    out: &mut FactorEffects,
    effect: &FactorEffectDef,
    value: f64,
    class_name: &str,
) {
    match &effect.kind {
        FactorKind::FlatStat { stat } => out.add_flat(*stat, value),
        FactorKind::StatPercent { stat } => out.add_percent(*stat, value),
        FactorKind::GainMultiplier { stat } => out.add_gain(*stat, value),
        FactorKind::AllElement => out.all_element_flat += value,
        FactorKind::SpecialSkillDamage => out.special_skill_pct += value,
        FactorKind::ExpertiseSkillDamage => out.expertise_skill_pct += value,
        FactorKind::AttackFromStat { class, stat } => {
            if class == class_name {
                *out.attack_from_stat.entry(*stat).or_insert(0.0) += value;
            }
        }
        FactorKind::ConditionalAttack { buff } => {
            *out.conditional_attack_pct.entry(buff.clone()).or_insert(0.0) += value;
        }
        FactorKind::ConditionalElement { buff } => {
            *out.conditional_element_pct.entry(buff.clone()).or_insert(0.0) += value;
        }
        FactorKind::SkillDamage { skill } => {
            *out.skill_damage_pct.entry(skill.clone()).or_insert(0.0) += value;
        }
    }
}

/// Resolve a psychoscope configuration. Unknown projections and factors
/// contribute nothing.
pub fn resolve(config: &PsychoscopeConfig, class_name: &str, catalog: &Catalog) -> FactorEffects {
    let mut out = FactorEffects::default();
    let Some(projection) = config
        .projection
        .as_deref()
        .and_then(|name| catalog.projection(name))
    else {
        return out;
    };

    for slot in config.active_slots(projection) {
        let Some(assignment) = config.assignment(slot) else {
            continue;
        };
        let Some(def) = catalog.factor(&assignment.factor) else {
            continue;
        };
        let grade = assignment.clamped_grade();
        for effect in &def.effects {
            let value = interpolate(effect.grade10, effect.grade1, grade);
            apply_factor_effect(&mut out, effect, value, class_name);
        }
        let label = if def.description.is_empty() {
            assignment.factor.as_str()
        } else {
            def.description.as_str()
        };
        out.descriptions
            .push(format!("{} (G{grade}): {label}", assignment.factor));
    }

    let bond = config.clamped_bond_level();
    for tier in &projection.bond_general {
        if bond >= tier.level {
            for bonus in &tier.bonuses {
                out.add_bond_flat(bonus.stat, bonus.value);
            }
            out.descriptions.push(format!("bond {} reached", tier.level));
        }
    }
    if bond >= projection.unlock_level {
        for clause in &projection.exclusive {
            out.apply_exclusive(clause);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::builtin_catalog;
    use crate::data::types::Stat;

    #[test]
    fn interpolation_uses_grade_one_anchor_when_present() {
        assert_eq!(interpolate(600.0, Some(120.0), 1), 120.0);
        assert_eq!(interpolate(600.0, Some(120.0), 10), 600.0);
        assert!((interpolate(600.0, Some(120.0), 4) - 280.0).abs() < 1e-9);
    }

    #[test]
    fn interpolation_is_proportional_without_anchor() {
        assert_eq!(interpolate(10.0, None, 5), 5.0);
        assert_eq!(interpolate(10.0, None, 0), 1.0);
        assert_eq!(interpolate(10.0, None, 15), 10.0);
    }

    #[test]
    fn no_projection_resolves_to_empty() {
        let catalog = builtin_catalog();
        let effects = resolve(&PsychoscopeConfig::default(), "stormblade", &catalog);
        assert_eq!(effects, FactorEffects::default());
    }

    #[test]
    fn attack_from_stat_only_for_matching_class() {
        let catalog = builtin_catalog();
        let projection = catalog.projection("tempest").expect("tempest");
        let mut config = PsychoscopeConfig::new("tempest");
        config.assign(projection, 2, "storm_conduit", 10);

        let own = resolve(&config, "stormblade", &catalog);
        assert_eq!(own.attack_from_stat.get(&Stat::Haste), Some(&5.0));
        let other = resolve(&config, "frost_mage", &catalog);
        assert!(other.attack_from_stat.is_empty());
    }

    #[test]
    fn bond_thresholds_and_exclusive_unlock() {
        let catalog = builtin_catalog();
        let mut config = PsychoscopeConfig::new("tempest");
        config.bond_level = 12;
        let partial = resolve(&config, "stormblade", &catalog);
        assert_eq!(partial.bond_flat.get(&Stat::Crit), Some(&50.0));
        assert_eq!(partial.bond_flat.get(&Stat::Haste), Some(&80.0));
        assert_eq!(partial.dream_damage_pct, 0.0);

        config.bond_level = 35;
        let full = resolve(&config, "stormblade", &catalog);
        assert_eq!(full.bond_flat.get(&Stat::Crit), Some(&150.0));
        assert_eq!(full.dream_damage_pct, 6.0);
        assert_eq!(full.main_stat_flat, 120.0);
        assert_eq!(full.conditional_crit_luck.len(), 1);
    }

    #[test]
    fn paired_gain_multipliers_resolve_with_sign() {
        let catalog = builtin_catalog();
        let projection = catalog.projection("tempest").expect("tempest");
        let mut config = PsychoscopeConfig::new("tempest");
        config.assign(projection, 3, "luck_gain", 10);
        let effects = resolve(&config, "stormblade", &catalog);
        assert_eq!(effects.gain_for(Stat::Luck), 12.0);
        assert_eq!(effects.gain_for(Stat::Versatility), -6.0);
    }
}
