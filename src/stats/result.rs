use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::types::{AttackType, PurpleKind, Stat};
use crate::factors::FactorEffects;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackBundle {
    pub flat_attack: f64,
    pub attack_pct: f64,
    pub attack_type: AttackType,
    /// Bonus crit damage in percentage points, on top of the base crit multiplier.
    pub crit_damage_pct: f64,
    pub armor_ignore_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub class_name: String,
    pub spec_name: String,
    /// Final raw totals for core stats and attributes.
    pub raw: BTreeMap<Stat, f64>,
    /// Derived percentages for the five core stats.
    pub percentages: BTreeMap<Stat, f64>,
    pub aspd: f64,
    pub cspd: f64,
    pub purple: BTreeMap<PurpleKind, f64>,
    pub module: BTreeMap<String, f64>,
    pub talent: BTreeMap<String, f64>,
    pub bond: BTreeMap<String, f64>,
    pub raid_bonus: BTreeMap<String, f64>,
    pub raid_effects: Vec<String>,
    pub factors: FactorEffects,
    pub set_2pc: bool,
    pub set_4pc: bool,
    pub attack: AttackBundle,
    pub max_hp_pct: f64,
    pub armor_pct: f64,
    pub dream_damage_pct: f64,
    /// Crit%/Luck% that only apply while a combat condition holds.
    pub conditional_crit_pct: f64,
    pub conditional_luck_pct: f64,
}

impl StatsResult {
    pub fn raw(&self, stat: Stat) -> f64 {
        self.raw.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn percent(&self, stat: Stat) -> f64 {
        self.percentages.get(&stat).copied().unwrap_or(0.0)
    }
}
