//! Mutable per-run simulator state. Created fresh for each run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::skills::{
    Skill, HAWK_INTERVAL, HAWK_LIFETIME, INTENT_CAP, INTENT_REGEN_PER_SEC, MARK_INTERVAL,
    MARK_SEED, QUICKENING_REGEN_MULT, RESERVOIR_INTENT_BONUS, SIGIL_CAP, SIGIL_REGEN_PER_SEC,
    SURGE_REGEN_MULT,
};

pub const SURGE_BUFF: &str = "volt_surge";
pub const WAR_CRY_BUFF: &str = "war_cry";
pub const ICD_PROC_TIMER: &str = "static_discharge";

/// Talents the simulator reads from the loadout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTalents {
    pub blade_reservoir: bool,
    pub quickening: bool,
    pub double_edge: bool,
}

impl CombatTalents {
    /// Picks the combat talents out of a selected-talent list; others are ignored.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut talents = Self::default();
        for name in names {
            match name {
                "blade_reservoir" => talents.blade_reservoir = true,
                "quickening" => talents.quickening = true,
                "double_edge" => talents.double_edge = true,
                _ => {}
            }
        }
        talents
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minion {
    pub remaining: f64,
    pub accumulated: f64,
}

/// Fired periodic events produced by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub minion_ticks: u32,
    pub mark_procs: u32,
}

#[derive(Debug, Clone)]
pub struct SimState {
    pub time: f64,
    pub total_damage: f64,
    pub intent: f64,
    pub intent_cap: f64,
    pub sigils: f64,
    pub sigil_cap: f64,
    pub charge_seeds: u32,
    pub gale_streak: u32,
    pub cooldowns: BTreeMap<&'static str, f64>,
    pub buffs: BTreeMap<&'static str, f64>,
    pub minions: Vec<Minion>,
    pub mark_accumulator: f64,
    talents: CombatTalents,
}

impl SimState {
    pub fn new(talents: CombatTalents) -> Self {
        let intent_cap = if talents.blade_reservoir {
            INTENT_CAP + RESERVOIR_INTENT_BONUS
        } else {
            INTENT_CAP
        };
        Self {
            time: 0.0,
            total_damage: 0.0,
            intent: intent_cap,
            intent_cap,
            sigils: 0.0,
            sigil_cap: SIGIL_CAP,
            charge_seeds: 0,
            gale_streak: 0,
            cooldowns: BTreeMap::new(),
            buffs: BTreeMap::new(),
            minions: Vec::new(),
            mark_accumulator: MARK_SEED,
            talents,
        }
    }

    pub fn talents(&self) -> CombatTalents {
        self.talents
    }

    pub fn cooldown(&self, key: &str) -> f64 {
        self.cooldowns.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, key: &str) -> bool {
        self.cooldown(key) <= f64::EPSILON
    }

    pub fn buff_active(&self, key: &str) -> bool {
        self.buffs.get(key).is_some_and(|remaining| *remaining > 0.0)
    }

    pub fn surge_active(&self) -> bool {
        self.buff_active(SURGE_BUFF)
    }

    pub fn has_resources(&self, skill: &Skill) -> bool {
        self.intent + f64::EPSILON >= skill.intent_cost
            && self.sigils + f64::EPSILON >= skill.sigil_cost
    }

    pub fn start_cooldown(&mut self, key: &'static str, duration: f64) {
        if duration > 0.0 {
            self.cooldowns.insert(key, duration);
        }
    }

    pub fn activate_buff(&mut self, key: &'static str, duration: f64) {
        self.buffs.insert(key, duration);
    }

    pub fn summon(&mut self) {
        self.minions.push(Minion {
            remaining: HAWK_LIFETIME,
            accumulated: 0.0,
        });
    }

    /// Spend costs then apply grants, capped. Under the surge buff any Sigil
    /// grant fills Sigils to the cap.
    pub fn apply_resources(&mut self, skill: &Skill) {
        self.intent = (self.intent - skill.intent_cost).max(0.0);
        self.sigils = (self.sigils - skill.sigil_cost).max(0.0);
        self.intent = (self.intent + skill.intent_gain).min(self.intent_cap);
        if skill.sigil_gain > 0.0 {
            self.sigils = if self.surge_active() {
                self.sigil_cap
            } else {
                (self.sigils + skill.sigil_gain).min(self.sigil_cap)
            };
        }
        self.charge_seeds += skill.seed_gain;
    }

    pub fn regen_multiplier(&self) -> f64 {
        let mut mult = 1.0;
        if self.talents.quickening {
            mult *= QUICKENING_REGEN_MULT;
        }
        if self.surge_active() {
            mult *= SURGE_REGEN_MULT;
        }
        mult
    }

    /// Advance the clock by `dt`: count timers down, regenerate resources and
    /// accrue periodic effects.
    pub fn tick(&mut self, dt: f64) -> TickEvents {
        let dt = dt.max(0.0);
        let regen = self.regen_multiplier();
        self.time += dt;

        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        for remaining in self.buffs.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        self.buffs.retain(|_, remaining| *remaining > 0.0);

        self.intent = (self.intent + INTENT_REGEN_PER_SEC * regen * dt).min(self.intent_cap);
        self.sigils = (self.sigils + SIGIL_REGEN_PER_SEC * regen * dt).min(self.sigil_cap);

        let mut events = TickEvents::default();
        for minion in &mut self.minions {
            let alive_for = dt.min(minion.remaining);
            minion.remaining -= dt;
            minion.accumulated += alive_for;
            while minion.accumulated + f64::EPSILON >= HAWK_INTERVAL {
                minion.accumulated -= HAWK_INTERVAL;
                events.minion_ticks += 1;
            }
        }
        self.minions.retain(|minion| minion.remaining > 0.0);

        self.mark_accumulator += dt;
        while self.mark_accumulator + f64::EPSILON >= MARK_INTERVAL {
            self.mark_accumulator -= MARK_INTERVAL;
            events.mark_procs += 1;
        }

        events
    }
}
