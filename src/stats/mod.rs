//! Stat aggregation: Loadout + Catalog → [StatsResult].
//!
//! Stage order: base inputs, gear and sigils, imagines, modules, the
//! Agility→Haste conversion, talents, raid bonuses, psychoscope factors, then
//! DR percentages and attack/cast speed. Anything the catalog does not know
//! contributes zero.

pub mod dr;
pub mod gear;
pub mod modules;
pub mod raid;
pub mod result;
pub mod stacking;
mod talents;

use std::collections::BTreeMap;

use crate::data::catalog::Catalog;
use crate::data::types::{PurpleKind, Stat, CORE_STATS};
use crate::factors;
use crate::loadout::Loadout;

pub use dr::{diminish, display_diminish, display_percent, stat_percent};
pub use result::{AttackBundle, StatsResult};
use stacking::{StackContribution, StatStacking};
use talents::ClauseSource;

/// Haste gained per point of total Agility.
pub const AGILITY_TO_HASTE: f64 = 0.45;

/// Working state threaded through the aggregation stages.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    pub(crate) stacking: StatStacking<Stat>,
    pub(crate) pct_points: BTreeMap<Stat, f64>,
    pub(crate) purple: BTreeMap<PurpleKind, f64>,
    pub(crate) module: BTreeMap<String, f64>,
    pub(crate) talent: BTreeMap<String, f64>,
    pub(crate) bond: BTreeMap<String, f64>,
    pub(crate) raid_bonus: BTreeMap<String, f64>,
    pub(crate) raid_effects: Vec<String>,
    pub(crate) attack: AttackBundle,
    pub(crate) clause_aspd: f64,
    pub(crate) clause_cspd: f64,
    pub(crate) set_aspd: f64,
    pub(crate) set_cspd: f64,
    pub(crate) haste_ratio_bonus: f64,
    /// `(value, below)` from a conditional 2pc.
    pub(crate) conditional_aspd: Option<(f64, f64)>,
    pub(crate) mastery_to_crit_damage: f64,
    pub(crate) max_hp_pct: f64,
    pub(crate) armor_pct: f64,
    pub(crate) dream_damage_pct: f64,
    pub(crate) conditional_crit: f64,
    pub(crate) conditional_luck: f64,
    pub(crate) set_2pc: bool,
    pub(crate) set_4pc: bool,
}

pub(crate) fn bump(map: &mut BTreeMap<String, f64>, key: &str, value: f64) {
    *map.entry(key.to_string()).or_insert(0.0) += value;
}

fn lookup(map: &BTreeMap<String, f64>, key: &str) -> f64 {
    map.get(key).copied().unwrap_or(0.0)
}

/// Compute final stats for a loadout. Pure; never fails.
pub fn aggregate(loadout: &Loadout, catalog: &Catalog) -> StatsResult {
    let class = catalog.class(&loadout.class_name);
    let spec = catalog.spec(&loadout.class_name, &loadout.spec_name);
    let main_stat = class.map(|c| c.main_stat);
    let factor_effects = factors::resolve(&loadout.psychoscope, &loadout.class_name, catalog);

    let mut acc = Accumulator::default();
    acc.attack.attack_type = class.map(|c| c.attack_type).unwrap_or_default();

    for (stat, value) in &loadout.base_stats {
        acc.stacking.add(StackContribution::base(*stat, *value));
    }
    gear::apply_gear(&mut acc, loadout, catalog);
    gear::apply_imagines(&mut acc, loadout, catalog);
    modules::apply_modules(&mut acc, loadout, catalog, class);

    let agility = acc.stacking.totals_for(&Stat::Agility);
    let agility_total = (agility.base + factor_effects.flat_for(Stat::Agility))
        * (1.0 + factor_effects.percent_for(Stat::Agility) / 100.0);
    acc.stacking.add(StackContribution::base(
        Stat::Haste,
        agility_total * AGILITY_TO_HASTE,
    ));

    talents::apply_talents(&mut acc, loadout, catalog, main_stat);
    raid::apply_raid(&mut acc, loadout, spec, main_stat);
    apply_factor_effects(&mut acc, &factor_effects, main_stat);

    let mut raw: BTreeMap<Stat, f64> = acc
        .stacking
        .composed_values()
        .into_iter()
        .map(|(stat, value)| (*stat, value))
        .collect();
    for stat in CORE_STATS {
        raw.entry(stat).or_insert(0.0);
    }

    let percentages: BTreeMap<Stat, f64> = CORE_STATS
        .iter()
        .map(|stat| {
            let pct = stat_percent(catalog, *stat, raw[stat])
                + loadout.external.stat(*stat)
                + acc.pct_points.get(stat).copied().unwrap_or(0.0);
            (*stat, pct)
        })
        .collect();

    let haste_pct = percentages.get(&Stat::Haste).copied().unwrap_or(0.0);
    let (aspd_ratio, cspd_ratio) = class
        .map(|c| (c.aspd_ratio, c.cspd_ratio))
        .unwrap_or((0.0, 0.0));
    let purple = |kind| acc.purple.get(&kind).copied().unwrap_or(0.0);

    let mut aspd = haste_pct * (aspd_ratio + acc.haste_ratio_bonus)
        + purple(PurpleKind::AttackSpeed)
        + loadout.external.aspd_pct
        + lookup(&acc.module, "aspd")
        + acc.clause_aspd
        + acc.set_aspd;
    if let Some((value, below)) = acc.conditional_aspd {
        if aspd < below {
            aspd += value;
            bump(&mut acc.raid_bonus, "aspd", value);
        }
    }
    if let Some(manual) = loadout.aspd_override.filter(|v| v.is_finite()) {
        aspd = manual;
    }

    let cspd = haste_pct * cspd_ratio
        + purple(PurpleKind::CastSpeed)
        + loadout.external.cspd_pct
        + lookup(&acc.module, "cspd")
        + acc.clause_cspd
        + acc.set_cspd;

    acc.attack.crit_damage_pct += purple(PurpleKind::CritDamage);
    acc.attack.attack_pct += purple(PurpleKind::AttackPercent);
    for (stat, ratio) in &factor_effects.attack_from_stat {
        acc.attack.flat_attack += raw.get(stat).copied().unwrap_or(0.0) * ratio / 100.0;
    }

    // Reads final percentages, so it runs after every multiplier.
    if acc.mastery_to_crit_damage != 0.0 {
        let extra = percentages.get(&Stat::Mastery).copied().unwrap_or(0.0)
            * acc.mastery_to_crit_damage;
        acc.attack.crit_damage_pct += extra;
        bump(&mut acc.raid_bonus, "crit_damage", extra);
    }

    StatsResult {
        class_name: loadout.class_name.clone(),
        spec_name: loadout.spec_name.clone(),
        raw,
        percentages,
        aspd,
        cspd,
        purple: acc.purple,
        module: acc.module,
        talent: acc.talent,
        bond: acc.bond,
        raid_bonus: acc.raid_bonus,
        raid_effects: acc.raid_effects,
        factors: factor_effects,
        set_2pc: acc.set_2pc,
        set_4pc: acc.set_4pc,
        attack: acc.attack,
        max_hp_pct: acc.max_hp_pct,
        armor_pct: acc.armor_pct,
        dream_damage_pct: acc.dream_damage_pct,
        conditional_crit_pct: acc.conditional_crit,
        conditional_luck_pct: acc.conditional_luck,
    }
}

fn apply_factor_effects(
    acc: &mut Accumulator,
    effects: &factors::FactorEffects,
    main_stat: Option<Stat>,
) {
    for (stat, value) in &effects.flat {
        acc.stacking.add(StackContribution::flat(*stat, *value));
    }
    for (stat, value) in &effects.percent {
        acc.stacking.add(StackContribution::percent(*stat, *value));
    }
    for (stat, value) in &effects.gain {
        acc.stacking.add(StackContribution::gain(*stat, *value));
    }
    for (stat, value) in &effects.bond_flat {
        acc.stacking.add(StackContribution::flat(*stat, *value));
        bump(&mut acc.bond, stat.as_str(), *value);
    }
    if let Some(stat) = main_stat {
        if effects.main_stat_flat != 0.0 {
            acc.stacking
                .add(StackContribution::flat(stat, effects.main_stat_flat));
            bump(&mut acc.bond, "main_stat", effects.main_stat_flat);
        }
    }
    for (stat, value) in &effects.stat_pct_points {
        *acc.pct_points.entry(*stat).or_insert(0.0) += value;
        bump(&mut acc.bond, &format!("{stat}_pct"), *value);
    }
    for clause in &effects.extra_clauses {
        acc.apply_clause(clause, main_stat, ClauseSource::Bond);
    }
    acc.dream_damage_pct += effects.dream_damage_pct;
    for pair in &effects.conditional_crit_luck {
        acc.conditional_crit += pair.crit;
        acc.conditional_luck += pair.luck;
    }
}
