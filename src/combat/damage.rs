//! Expected-value damage model. Every probabilistic term is folded into an
//! average multiplier so identical inputs give identical totals.

use crate::combat::skills::{
    Skill, SkillType, DOUBLE_EDGE_INTENT, LUCKY_STRIKE_MOTION_VALUE, SURGE_ASPD_PCT,
    WAR_CRY_ATTACK_PCT,
};
use crate::combat::state::{SimState, WAR_CRY_BUFF};
use crate::combat::SimInputs;
use crate::data::types::Stat;
use crate::stats::StatsResult;

pub const BASE_CRIT_DAMAGE_PCT: f64 = 50.0;
/// Average extra damage of a lucky hit, per unit of Luck rate.
pub const LUCK_DAMAGE_WEIGHT: f64 = 0.25;
pub const MIN_CAST_TIME: f64 = 0.1;

/// Luck% breakpoints for the guaranteed-crit finisher, highest first.
pub const FINISHER_LUCK_BREAKPOINTS: [(f64, f64); 2] = [(40.0, 1.15), (25.0, 1.08)];

pub fn finisher_breakpoint(luck_pct: f64) -> f64 {
    FINISHER_LUCK_BREAKPOINTS
        .iter()
        .find(|(threshold, _)| luck_pct >= *threshold)
        .map(|(_, mult)| *mult)
        .unwrap_or(1.0)
}

/// Read-only view of everything a hit needs besides live state.
#[derive(Debug, Clone, Copy)]
pub struct DamageModel<'a> {
    stats: &'a StatsResult,
    inputs: &'a SimInputs,
}

impl<'a> DamageModel<'a> {
    pub fn new(stats: &'a StatsResult, inputs: &'a SimInputs) -> Self {
        Self { stats, inputs }
    }

    fn uptime(&self) -> f64 {
        self.inputs.conditional_uptime.clamp(0.0, 1.0)
    }

    pub fn crit_pct(&self) -> f64 {
        self.stats.percent(Stat::Crit) + self.stats.conditional_crit_pct * self.uptime()
    }

    pub fn luck_pct(&self) -> f64 {
        self.stats.percent(Stat::Luck) + self.stats.conditional_luck_pct * self.uptime()
    }

    fn crit_rate(&self) -> f64 {
        (self.crit_pct() / 100.0).clamp(0.0, 1.0)
    }

    pub fn luck_rate(&self) -> f64 {
        (self.luck_pct() / 100.0).clamp(0.0, 1.0)
    }

    pub fn crit_damage_pct(&self) -> f64 {
        BASE_CRIT_DAMAGE_PCT + self.stats.attack.crit_damage_pct
    }

    fn versatility_mult(&self) -> f64 {
        1.0 + self.stats.percent(Stat::Versatility) / 100.0
    }

    fn mastery_mult(&self, kind: SkillType) -> f64 {
        1.0 + self.stats.percent(Stat::Mastery) / 100.0 * kind.mastery_scale()
    }

    /// Share of damage that gets through the target's mitigation.
    pub fn mitigation_mult(&self) -> f64 {
        let mitigation = self.inputs.target_mitigation_pct.clamp(0.0, 100.0)
            * (1.0 - self.stats.attack.armor_ignore_pct.clamp(0.0, 100.0) / 100.0);
        1.0 - mitigation / 100.0
    }

    pub fn effective_aspd(&self, state: &SimState) -> f64 {
        if state.surge_active() {
            self.stats.aspd + SURGE_ASPD_PCT
        } else {
            self.stats.aspd
        }
    }

    pub fn cast_time(&self, skill: &Skill, state: &SimState) -> f64 {
        let base = if skill.scales_with_aspd {
            skill.cast_time / (1.0 + self.effective_aspd(state).max(0.0) / 100.0)
        } else {
            skill.cast_time
        };
        base.max(MIN_CAST_TIME)
    }

    /// ATK including live buffs.
    pub fn attack_now(&self, state: &SimState) -> f64 {
        let attack = &self.stats.attack;
        let mut pct = attack.attack_pct;
        if state.buff_active(WAR_CRY_BUFF) {
            pct += WAR_CRY_ATTACK_PCT;
        }
        for (buff, value) in &self.stats.factors.conditional_attack_pct {
            if state.buff_active(buff) {
                pct += value;
            }
        }
        (self.inputs.base_attack + attack.flat_attack) * (1.0 + pct / 100.0)
    }

    fn additive_pct(&self, skill: &Skill, state: &SimState) -> f64 {
        let factors = &self.stats.factors;
        let mut total = self.inputs.damage_bonus_pct + self.stats.dream_damage_pct;
        if skill.element.is_elemental() {
            total += self.inputs.element_bonus_pct;
            for (buff, value) in &factors.conditional_element_pct {
                if state.buff_active(buff) {
                    total += value;
                }
            }
        }
        total += match skill.kind {
            SkillType::Special => factors.special_skill_pct,
            SkillType::Expertise => factors.expertise_skill_pct,
            _ => 0.0,
        };
        total + factors.skill_damage_pct.get(skill.key).copied().unwrap_or(0.0)
    }

    /// Damage before the crit/luck term.
    fn base_hit_damage(&self, skill: &Skill, state: &SimState) -> f64 {
        let mut per_hit = self.attack_now(state) * skill.motion_value / 100.0 + skill.flat_damage;
        if skill.element.is_elemental() {
            per_hit += self.stats.factors.all_element_flat;
        }
        f64::from(skill.hits)
            * per_hit
            * self.versatility_mult()
            * self.mastery_mult(skill.kind)
            * (1.0 + self.additive_pct(skill, state) / 100.0)
            * self.mitigation_mult()
    }

    pub fn average_multiplier(&self) -> f64 {
        1.0 + self.crit_rate() * self.crit_damage_pct() / 100.0
            + self.luck_rate() * LUCK_DAMAGE_WEIGHT
    }

    /// Guaranteed crit plus proportional luck, scaled by the Luck% breakpoint.
    pub fn finisher_multiplier(&self) -> f64 {
        (1.0 + self.crit_damage_pct() / 100.0 + self.luck_rate() * LUCK_DAMAGE_WEIGHT)
            * finisher_breakpoint(self.luck_pct())
    }

    pub fn hit(&self, skill: &Skill, state: &SimState) -> f64 {
        let mut damage = self.base_hit_damage(skill, state) * self.average_multiplier();
        if state.talents().double_edge
            && skill.kind == SkillType::Skill
            && state.intent >= DOUBLE_EDGE_INTENT
        {
            damage *= 2.0;
        }
        damage
    }

    pub fn finisher(&self, skill: &Skill, state: &SimState) -> f64 {
        self.base_hit_damage(skill, state) * self.finisher_multiplier()
    }

    /// Expected lucky-strike damage riding on a cast with `hits` hits.
    pub fn lucky_strike(&self, hits: u32, state: &SimState) -> f64 {
        self.luck_rate()
            * f64::from(hits)
            * self.attack_now(state)
            * LUCKY_STRIKE_MOTION_VALUE
            / 100.0
            * self.versatility_mult()
            * self.mitigation_mult()
    }
}
