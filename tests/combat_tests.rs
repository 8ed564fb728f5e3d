use resonance::combat::{
    compare, export_trace_csv, simulate, Rotation, RotationStep, SimInputs, TraceMode,
};
use resonance::data::builtin_catalog;
use resonance::data::types::Stat;
use resonance::factors::PsychoscopeConfig;
use resonance::loadout::Loadout;
use resonance::stats::{aggregate, StatsResult};

fn loadout_with(crit: f64) -> Loadout {
    let mut loadout = Loadout::new("stormblade", "iaido");
    loadout.base_stats.insert(Stat::Crit, crit);
    loadout.base_stats.insert(Stat::Haste, 4000.0);
    loadout.base_stats.insert(Stat::Luck, 5000.0);
    loadout.base_stats.insert(Stat::Agility, 1200.0);
    loadout
}

fn stats_with(crit: f64) -> StatsResult {
    aggregate(&loadout_with(crit), &builtin_catalog())
}

#[test]
fn simulation_is_deterministic() {
    let stats = stats_with(5000.0);
    let inputs = SimInputs::default();
    let first = simulate(&stats, &inputs, &Rotation::Priority);
    let second = simulate(&stats, &inputs, &Rotation::Priority);
    assert_eq!(first, second);
    assert!(first.total_damage > 0.0);
    assert!((first.dps - first.total_damage / first.duration).abs() < 1e-6);
}

#[test]
fn breakdown_shares_sum_to_one() {
    let result = simulate(&stats_with(5000.0), &SimInputs::default(), &Rotation::Priority);
    let share: f64 = result.breakdown.values().map(|entry| entry.share).sum();
    assert!((share - 1.0).abs() < 1e-9);
    let damage: f64 = result.breakdown.values().map(|entry| entry.damage).sum();
    assert!((damage - result.total_damage).abs() < 1e-6 * result.total_damage);
}

#[test]
fn unknown_sequence_keys_are_skipped() {
    let rotation = Rotation::Sequence(vec![
        RotationStep::new("not_a_skill", 2),
        RotationStep::new("thunder_strike", 1),
        RotationStep::new("gale_slash", 2),
    ]);
    let result = simulate(&stats_with(5000.0), &SimInputs::default(), &rotation);
    assert!(result.total_damage > 0.0);
    assert!(!result.breakdown.contains_key("not_a_skill"));
    assert!(result.breakdown.contains_key("thunder_strike"));
}

#[test]
fn more_crit_never_lowers_damage() {
    let inputs = SimInputs {
        trace_mode: TraceMode::Off,
        ..SimInputs::default()
    };
    let low = simulate(&stats_with(1000.0), &inputs, &Rotation::Priority);
    let high = simulate(&stats_with(12000.0), &inputs, &Rotation::Priority);
    assert!(high.total_damage > low.total_damage);
}

#[test]
fn conditional_uptime_scales_bond_crit() {
    let catalog = builtin_catalog();
    let mut loadout = loadout_with(5000.0);
    loadout.psychoscope = PsychoscopeConfig::new("tempest");
    loadout.psychoscope.bond_level = 35;
    let stats = aggregate(&loadout, &catalog);
    assert!(stats.conditional_crit_pct > 0.0);

    let never = SimInputs {
        conditional_uptime: 0.0,
        ..SimInputs::default()
    };
    let always = SimInputs {
        conditional_uptime: 1.0,
        ..SimInputs::default()
    };
    let off = simulate(&stats, &never, &Rotation::Priority);
    let on = simulate(&stats, &always, &Rotation::Priority);
    assert!(on.total_damage > off.total_damage);
}

#[test]
fn trace_modes_control_output() {
    let stats = stats_with(5000.0);
    let off = simulate(
        &stats,
        &SimInputs {
            trace_mode: TraceMode::Off,
            ..SimInputs::default()
        },
        &Rotation::Priority,
    );
    assert!(off.trace.is_empty());
    assert!(off.log.is_empty());

    let full = simulate(
        &stats,
        &SimInputs {
            trace_mode: TraceMode::Full,
            ..SimInputs::default()
        },
        &Rotation::Priority,
    );
    assert!(!full.trace.is_empty());
    assert!(!full.log.is_empty());
    let last = full.trace.last().expect("trace sample");
    assert!(last.cumulative_damage <= full.total_damage + 1e-6);
    assert!(full
        .trace
        .windows(2)
        .all(|pair| pair[0].time <= pair[1].time));
}

#[test]
fn trace_exports_to_csv_file() {
    let result = simulate(&stats_with(5000.0), &SimInputs::default(), &Rotation::Priority);
    let path = std::env::temp_dir().join(format!(
        "resonance_trace_{}.csv",
        std::process::id()
    ));
    export_trace_csv(&path, &result.trace).expect("export trace");

    let mut reader = csv::Reader::from_path(&path).expect("open exported csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "time");
    assert_eq!(&headers[1], "skill");
    assert_eq!(reader.records().count(), result.trace.len());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn compare_keeps_input_order() {
    let catalog = builtin_catalog();
    let loadouts = vec![
        ("baseline".to_string(), loadout_with(2000.0)),
        ("crit_heavy".to_string(), loadout_with(9000.0)),
        ("crit_light".to_string(), loadout_with(500.0)),
    ];
    let entries = compare(&loadouts, &SimInputs::default(), &Rotation::Priority, &catalog);
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, ["baseline", "crit_heavy", "crit_light"]);
    assert_eq!(entries[0].dps_delta_pct, 0.0);
    assert!(entries[1].dps_delta_pct > 0.0);
    assert!(entries[2].dps_delta_pct < 0.0);
}

#[test]
fn loadout_talents_feed_the_simulator() {
    let mut loadout = loadout_with(5000.0);
    loadout.talents.insert("double_edge".to_string());
    let inputs = SimInputs::default().with_loadout_talents(&loadout);
    assert!(inputs.talents.double_edge);
    assert!(!inputs.talents.quickening);
}
