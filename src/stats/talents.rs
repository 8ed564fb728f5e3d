//! Talent resolution over compiled effect clauses.

use crate::data::catalog::Catalog;
use crate::data::types::Stat;
use crate::effects::EffectClause;
use crate::loadout::Loadout;
use crate::stats::stacking::StackContribution;
use crate::stats::{bump, Accumulator};

/// Which itemized map a clause is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClauseSource {
    Talent,
    Bond,
}

impl Accumulator {
    pub(crate) fn apply_clause(
        &mut self,
        clause: &EffectClause,
        main_stat: Option<Stat>,
        source: ClauseSource,
    ) {
        let item = match clause {
            EffectClause::AttackSpeedPercent { value } => {
                self.clause_aspd += value;
                Some(("aspd".to_string(), *value))
            }
            EffectClause::CastSpeedPercent { value } => {
                self.clause_cspd += value;
                Some(("cspd".to_string(), *value))
            }
            EffectClause::StatPercentPoints { stat, value } => {
                *self.pct_points.entry(*stat).or_insert(0.0) += value;
                Some((format!("{stat}_pct"), *value))
            }
            EffectClause::CritDamagePercent { value } => {
                self.attack.crit_damage_pct += value;
                Some(("crit_damage".to_string(), *value))
            }
            EffectClause::MaxHpPercent { value } => {
                self.stacking
                    .add(StackContribution::percent(Stat::MaxHp, *value));
                self.max_hp_pct += value;
                Some(("max_hp_pct".to_string(), *value))
            }
            EffectClause::ArmorPercent { value } => {
                self.stacking
                    .add(StackContribution::percent(Stat::Armor, *value));
                self.armor_pct += value;
                Some(("armor_pct".to_string(), *value))
            }
            EffectClause::FlatStat { stat, value } => {
                self.stacking.add(StackContribution::flat(*stat, *value));
                Some((stat.as_str().to_string(), *value))
            }
            EffectClause::HasteRatioBonus { value } => {
                self.haste_ratio_bonus += value;
                Some(("haste_ratio".to_string(), *value))
            }
            EffectClause::DreamDamagePercent { value } => {
                self.dream_damage_pct += value;
                Some(("dream_damage".to_string(), *value))
            }
            EffectClause::MainStatFlat { value } => main_stat.map(|stat| {
                self.stacking.add(StackContribution::flat(stat, *value));
                (stat.as_str().to_string(), *value)
            }),
            EffectClause::ConditionalCritLuck { crit, luck, .. } => {
                self.conditional_crit += crit;
                self.conditional_luck += luck;
                None
            }
        };

        if let Some((key, value)) = item {
            let map = match source {
                ClauseSource::Talent => &mut self.talent,
                ClauseSource::Bond => &mut self.bond,
            };
            bump(map, &key, value);
        }
    }
}

/// Apply selected talents. A gated talent applies only if the current raw
/// total meets its threshold; unknown talents are skipped.
pub(crate) fn apply_talents(
    acc: &mut Accumulator,
    loadout: &Loadout,
    catalog: &Catalog,
    main_stat: Option<Stat>,
) {
    for name in &loadout.talents {
        let Some(talent) = catalog.talent(name) else {
            continue;
        };
        if let Some(condition) = talent.condition {
            let current = acc.stacking.composed_for(&condition.stat);
            if !condition.is_met(current) {
                continue;
            }
        }
        for clause in &talent.effects {
            acc.apply_clause(clause, main_stat, ClauseSource::Talent);
        }
    }
}
