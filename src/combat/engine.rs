use std::collections::BTreeMap;

use crate::combat::damage::DamageModel;
use crate::combat::rotation::{Rotation, RotationCursor, RotationStep};
use crate::combat::skills::{
    find_skill, Skill, BASIC_ATTACK, BREATH_INTENT_BELOW, FILLERS, GALE_SLASH,
    GALE_SLASH_ENHANCED, GALE_STREAK_THRESHOLD, GATHER_SIGILS_BELOW, HAWK_LUCK_EXTRA,
    HAWK_MOTION_VALUE, ICD_PROC_CHANCE, ICD_PROC_COOLDOWN, ICD_PROC_TRIGGERS,
    LIGHTNING_AFTERIMAGE, PRIORITY, SEED_THRESHOLD, STATIC_DISCHARGE, SURGE_DURATION,
    THUNDERCLAP, THUNDER_HAWK, THUNDER_MARK, WAR_CRY_DURATION,
};
use crate::combat::state::{SimState, ICD_PROC_TIMER, SURGE_BUFF, WAR_CRY_BUFF};
use crate::combat::trace::{TraceCollector, TraceSample};
use crate::combat::{SimInputs, SimResult, SkillBreakdown};
use crate::stats::StatsResult;

const HAWK_TICK: Skill = Skill {
    cast_time: 0.0,
    motion_value: HAWK_MOTION_VALUE,
    ..THUNDER_HAWK
};

const LUCKY_STRIKE_KEY: &str = "lucky_strike";

fn castable(skill: &Skill, state: &SimState) -> bool {
    state.is_ready(skill.key) && state.has_resources(skill)
}

/// Situational gates used when the simulator picks a skill on its own.
fn worth_casting(skill: &Skill, state: &SimState) -> bool {
    if !castable(skill, state) {
        return false;
    }
    match skill.key {
        "centered_breath" => state.intent < BREATH_INTENT_BELOW,
        "storm_gather" => state.sigils < GATHER_SIGILS_BELOW,
        _ => true,
    }
}

fn filler(state: &SimState) -> &'static Skill {
    FILLERS
        .iter()
        .filter_map(|key| find_skill(key))
        .find(|skill| worth_casting(skill, state))
        .unwrap_or(&BASIC_ATTACK)
}

fn from_priority(state: &SimState) -> &'static Skill {
    PRIORITY
        .iter()
        .filter_map(|key| find_skill(key))
        .find(|skill| worth_casting(skill, state))
        .unwrap_or(&BASIC_ATTACK)
}

fn from_sequence(
    steps: &[RotationStep],
    cursor: &mut RotationCursor,
    state: &SimState,
) -> &'static Skill {
    let Some(step) = cursor.current(steps) else {
        return from_priority(state);
    };
    match find_skill(&step.skill).filter(|skill| skill.rotation_castable) {
        None => {
            tracing::trace!(skill = %step.skill, "unknown rotation skill, skipping step");
            cursor.skip(steps);
            filler(state)
        }
        Some(skill) if castable(skill, state) => {
            cursor.advance(steps);
            skill
        }
        Some(_) => filler(state),
    }
}

/// Reactive overrides beat the rotation; they consume their counters.
fn reactive_override(state: &mut SimState) -> Option<&'static Skill> {
    if state.charge_seeds >= SEED_THRESHOLD {
        state.charge_seeds = 0;
        return Some(&THUNDERCLAP);
    }
    if state.gale_streak >= GALE_STREAK_THRESHOLD && state.has_resources(&GALE_SLASH_ENHANCED) {
        state.gale_streak = 0;
        return Some(&GALE_SLASH_ENHANCED);
    }
    None
}

struct Run<'a> {
    model: DamageModel<'a>,
    state: SimState,
    breakdown: BTreeMap<String, SkillBreakdown>,
}

impl Run<'_> {
    fn credit(&mut self, key: &str, hits: u32, damage: f64, cast: bool) {
        let entry = self.breakdown.entry(key.to_string()).or_default();
        if cast {
            entry.casts += 1;
        }
        entry.hits += u64::from(hits);
        entry.damage += damage;
        self.state.total_damage += damage;
    }

    /// Cast one skill and resolve its same-cast side effects. Returns the
    /// damage dealt by the cast itself plus anything it triggered.
    fn cast(&mut self, skill: &'static Skill) -> f64 {
        let before = self.state.total_damage;

        let damage = if skill.key == THUNDERCLAP.key {
            self.model.finisher(skill, &self.state)
        } else {
            self.model.hit(skill, &self.state)
        };
        self.credit(skill.key, skill.hits, damage, true);
        self.state.start_cooldown(skill.key, skill.cooldown);

        match skill.key {
            "war_cry" => self.state.activate_buff(WAR_CRY_BUFF, WAR_CRY_DURATION),
            "volt_surge" => {
                self.state.activate_buff(SURGE_BUFF, SURGE_DURATION);
                self.state.sigils = self.state.sigil_cap;
            }
            "thunder_hawk" => self.state.summon(),
            "lightning_flash" => {
                let echo = self.model.hit(&LIGHTNING_AFTERIMAGE, &self.state);
                self.credit(LIGHTNING_AFTERIMAGE.key, LIGHTNING_AFTERIMAGE.hits, echo, true);
            }
            _ => {}
        }
        self.state.apply_resources(skill);

        if skill.key == GALE_SLASH.key {
            self.state.gale_streak += 1;
        } else {
            self.state.gale_streak = 0;
        }

        if ICD_PROC_TRIGGERS.contains(&skill.key) && self.state.is_ready(ICD_PROC_TIMER) {
            let proc = self.model.hit(&STATIC_DISCHARGE, &self.state) * ICD_PROC_CHANCE;
            self.credit(STATIC_DISCHARGE.key, 0, proc, false);
            self.state.start_cooldown(ICD_PROC_TIMER, ICD_PROC_COOLDOWN);
        }

        if skill.hits > 0 && skill.motion_value > 0.0 {
            let lucky = self.model.lucky_strike(skill.hits, &self.state);
            if lucky > 0.0 {
                self.credit(LUCKY_STRIKE_KEY, 0, lucky, false);
            }
        }

        self.state.total_damage - before
    }

    /// Advance the clock and resolve periodic damage for the elapsed time.
    fn advance(&mut self, dt: f64) -> f64 {
        let before = self.state.total_damage;
        let events = self.state.tick(dt);
        if events.minion_ticks > 0 {
            let per_tick = self.model.hit(&HAWK_TICK, &self.state)
                * (1.0 + self.model.luck_rate() * HAWK_LUCK_EXTRA);
            let ticks = events.minion_ticks;
            self.credit(THUNDER_HAWK.key, ticks, per_tick * f64::from(ticks), false);
        }
        if events.mark_procs > 0 {
            let per_proc = self.model.hit(&THUNDER_MARK, &self.state);
            let procs = events.mark_procs;
            self.credit(THUNDER_MARK.key, procs, per_proc * f64::from(procs), false);
        }
        self.state.total_damage - before
    }
}

/// Run one fight. Sequential and fully deterministic: every chance-based
/// effect contributes its expected value.
pub fn simulate(stats: &StatsResult, inputs: &SimInputs, rotation: &Rotation) -> SimResult {
    run_fight(stats, inputs, rotation, SimState::new(inputs.talents))
}

fn run_fight(
    stats: &StatsResult,
    inputs: &SimInputs,
    rotation: &Rotation,
    state: SimState,
) -> SimResult {
    let duration = if inputs.fight_duration.is_finite() {
        inputs.fight_duration.max(0.0)
    } else {
        0.0
    };
    let mut run = Run {
        model: DamageModel::new(stats, inputs),
        state,
        breakdown: BTreeMap::new(),
    };
    let mut trace = TraceCollector::new(inputs.trace_mode);
    let mut cursor = RotationCursor::default();

    while run.state.time < duration {
        let skill = match reactive_override(&mut run.state) {
            Some(skill) => skill,
            None => match rotation {
                Rotation::Priority => from_priority(&run.state),
                Rotation::Sequence(steps) => from_sequence(steps, &mut cursor, &run.state),
            },
        };

        let cast_time = run.model.cast_time(skill, &run.state);
        let aspd = run.model.effective_aspd(&run.state);
        let mut damage = run.cast(skill);
        damage += run.advance(cast_time);

        tracing::trace!(
            time = run.state.time,
            skill = skill.key,
            damage,
            intent = run.state.intent,
            sigils = run.state.sigils,
            "cast"
        );
        if trace.enabled() {
            trace.record(TraceSample {
                time: run.state.time,
                skill: skill.key.to_string(),
                damage,
                cumulative_damage: run.state.total_damage,
                intent: run.state.intent,
                sigils: run.state.sigils,
                charge_seeds: run.state.charge_seeds,
                aspd,
            });
        }
    }

    let total = run.state.total_damage;
    for entry in run.breakdown.values_mut() {
        entry.share = if total > 0.0 { entry.damage / total } else { 0.0 };
    }
    let elapsed = run.state.time.max(duration);
    let (trace, log) = trace.finish();
    SimResult {
        total_damage: total,
        dps: if elapsed > 0.0 { total / elapsed } else { 0.0 },
        duration: elapsed,
        breakdown: run.breakdown,
        trace,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::state::CombatTalents;
    use crate::combat::trace::TraceMode;
    use crate::data::types::Stat;

    fn stats() -> StatsResult {
        let mut stats = StatsResult::default();
        for (stat, pct) in [
            (Stat::Crit, 25.0),
            (Stat::Haste, 15.0),
            (Stat::Luck, 30.0),
            (Stat::Mastery, 20.0),
            (Stat::Versatility, 10.0),
        ] {
            stats.percentages.insert(stat, pct);
        }
        stats.aspd = 12.0;
        stats
    }

    #[test]
    fn identical_inputs_give_identical_traces() {
        let stats = stats();
        let inputs = SimInputs {
            trace_mode: TraceMode::Full,
            ..SimInputs::default()
        };
        let a = simulate(&stats, &inputs, &Rotation::Priority);
        let b = simulate(&stats, &inputs, &Rotation::Priority);
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.log, b.log);
        assert_eq!(a.total_damage.to_bits(), b.total_damage.to_bits());
    }

    #[test]
    fn priority_run_casts_the_kit() {
        let result = simulate(&stats(), &SimInputs::default(), &Rotation::Priority);
        for key in ["volt_surge", "war_cry", "thunder_hawk", "thunder_strike", "thunderclap"] {
            assert!(
                result.breakdown.get(key).is_some_and(|b| b.damage > 0.0 || b.casts > 0),
                "{key} missing from breakdown"
            );
        }
        let share: f64 = result.breakdown.values().map(|b| b.share).sum();
        assert!((share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_keys_fall_back_to_fillers() {
        let rotation = Rotation::Sequence(vec![RotationStep::new("meteor", 1)]);
        let result = simulate(&stats(), &SimInputs::default(), &rotation);
        assert!(result.total_damage > 0.0);
        assert!(result.duration >= 120.0);
        assert!(!result.breakdown.contains_key("meteor"));
    }

    #[test]
    fn progresses_when_everything_is_on_cooldown() {
        let mut state = SimState::new(CombatTalents::default());
        state.intent = 0.0;
        for skill in crate::combat::skills::SKILLS.iter() {
            state.start_cooldown(skill.key, 1_000.0);
        }
        assert_eq!(from_priority(&state).key, "basic_attack");
        assert_eq!(filler(&state).key, "basic_attack");
    }

    #[test]
    fn fight_loop_finishes_on_basic_attacks_alone() {
        let mut state = SimState::new(CombatTalents::default());
        state.intent = 0.0;
        for skill in crate::combat::skills::SKILLS.iter() {
            if skill.key != BASIC_ATTACK.key {
                state.start_cooldown(skill.key, 1.0e9);
            }
        }
        let inputs = SimInputs {
            fight_duration: 30.0,
            trace_mode: TraceMode::Samples,
            ..SimInputs::default()
        };
        let result = run_fight(&stats(), &inputs, &Rotation::Priority, state);

        let (last, earlier) = result.trace.split_last().expect("at least one cast");
        assert!(earlier.iter().all(|sample| sample.time < inputs.fight_duration));
        assert!(last.time >= inputs.fight_duration);
        assert!(last.time < inputs.fight_duration + BASIC_ATTACK.cast_time);
        assert_eq!(result.duration, last.time);
        assert!(result.trace.iter().all(|sample| sample.skill == BASIC_ATTACK.key));
        let basic = &result.breakdown[BASIC_ATTACK.key];
        assert_eq!(basic.casts as usize, result.trace.len());
        assert!(result
            .breakdown
            .iter()
            .filter(|(key, _)| key.as_str() != BASIC_ATTACK.key)
            .all(|(_, entry)| entry.casts == 0));
    }

    #[test]
    fn seeds_trigger_the_finisher() {
        let mut state = SimState::new(CombatTalents::default());
        state.charge_seeds = SEED_THRESHOLD;
        assert_eq!(reactive_override(&mut state).map(|s| s.key), Some("thunderclap"));
        assert_eq!(state.charge_seeds, 0);
    }

    #[test]
    fn gale_streak_needs_intent() {
        let mut state = SimState::new(CombatTalents::default());
        state.gale_streak = GALE_STREAK_THRESHOLD;
        state.intent = 5.0;
        assert!(reactive_override(&mut state).is_none());
        state.intent = 50.0;
        assert_eq!(
            reactive_override(&mut state).map(|s| s.key),
            Some("gale_slash_enhanced")
        );
        assert_eq!(state.gale_streak, 0);
    }

    #[test]
    fn zero_duration_runs_nothing() {
        let inputs = SimInputs {
            fight_duration: 0.0,
            ..SimInputs::default()
        };
        let result = simulate(&stats(), &inputs, &Rotation::Priority);
        assert_eq!(result.total_damage, 0.0);
        assert_eq!(result.dps, 0.0);
        assert!(result.trace.is_empty());
    }
}
