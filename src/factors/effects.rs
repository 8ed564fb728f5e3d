use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::types::Stat;
use crate::effects::EffectClause;

/// A Crit%/Luck% pair that only applies while a combat condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalCritLuck {
    pub crit: f64,
    pub luck: f64,
    pub condition: String,
}

/// Resolved psychoscope magnitudes. Percent values are percentage points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorEffects {
    pub flat: BTreeMap<Stat, f64>,
    /// Multiplies the stat total by `1 + value/100`.
    pub percent: BTreeMap<Stat, f64>,
    /// Rescales the stat total from every source; applied last.
    pub gain: BTreeMap<Stat, f64>,
    pub all_element_flat: f64,
    pub special_skill_pct: f64,
    pub expertise_skill_pct: f64,
    /// ATK gained per point of the stat, as a percent ratio.
    pub attack_from_stat: BTreeMap<Stat, f64>,
    pub conditional_attack_pct: BTreeMap<String, f64>,
    pub conditional_element_pct: BTreeMap<String, f64>,
    pub skill_damage_pct: BTreeMap<String, f64>,
    pub bond_flat: BTreeMap<Stat, f64>,
    pub dream_damage_pct: f64,
    /// Percentage points added straight to derived stat percentages.
    pub stat_pct_points: BTreeMap<Stat, f64>,
    pub main_stat_flat: f64,
    pub conditional_crit_luck: Vec<ConditionalCritLuck>,
    /// Bond-exclusive clauses with no dedicated field (speed, crit damage, ...).
    pub extra_clauses: Vec<EffectClause>,
    pub descriptions: Vec<String>,
}

fn add(map: &mut BTreeMap<Stat, f64>, stat: Stat, value: f64) {
    *map.entry(stat).or_insert(0.0) += value;
}

impl FactorEffects {
    pub fn add_flat(&mut self, stat: Stat, value: f64) {
        add(&mut self.flat, stat, value);
    }

    pub fn add_percent(&mut self, stat: Stat, value: f64) {
        add(&mut self.percent, stat, value);
    }

    /// Gain multipliers on the same stat are summed and applied once.
    pub fn add_gain(&mut self, stat: Stat, value: f64) {
        add(&mut self.gain, stat, value);
    }

    pub fn add_bond_flat(&mut self, stat: Stat, value: f64) {
        add(&mut self.bond_flat, stat, value);
    }

    pub fn flat_for(&self, stat: Stat) -> f64 {
        self.flat.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn percent_for(&self, stat: Stat) -> f64 {
        self.percent.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn gain_for(&self, stat: Stat) -> f64 {
        self.gain.get(&stat).copied().unwrap_or(0.0)
    }

    /// Fold one bond-exclusive clause into the bundle.
    pub fn apply_exclusive(&mut self, clause: &EffectClause) {
        match clause {
            EffectClause::DreamDamagePercent { value } => self.dream_damage_pct += value,
            EffectClause::StatPercentPoints { stat, value } => {
                add(&mut self.stat_pct_points, *stat, *value)
            }
            EffectClause::MainStatFlat { value } => self.main_stat_flat += value,
            EffectClause::FlatStat { stat, value } => add(&mut self.bond_flat, *stat, *value),
            EffectClause::ConditionalCritLuck {
                crit,
                luck,
                condition,
            } => self.conditional_crit_luck.push(ConditionalCritLuck {
                crit: *crit,
                luck: *luck,
                condition: condition.clone(),
            }),
            other => self.extra_clauses.push(other.clone()),
        }
        self.descriptions.push(format!("bond: {}", clause.describe()));
    }
}
