use resonance::data::builtin_catalog;
use resonance::data::types::{GearSlot, Stat};
use resonance::loadout::{GearPiece, Loadout};
use resonance::optimizer::{calc_diff, optimize, OptimizeOptions, TargetStats};
use resonance::stats::aggregate;

fn current() -> Loadout {
    let mut loadout = Loadout::new("stormblade", "iaido");
    loadout.base_stats.insert(Stat::Agility, 1000.0);
    loadout
}

fn target() -> TargetStats {
    TargetStats::from_array([30.0, 22.0, 26.0, 38.0, 10.0])
}

fn small(workers: usize) -> OptimizeOptions {
    OptimizeOptions {
        population: 8,
        generations: 40,
        seed: 7,
        workers,
        ..OptimizeOptions::default()
    }
}

#[test]
fn history_never_increases() {
    let catalog = builtin_catalog();
    let outcome = optimize(&current(), &target(), &small(0), &catalog);
    assert_eq!(outcome.history.len(), 41);
    assert!(outcome
        .history
        .windows(2)
        .all(|pair| pair[1] <= pair[0]));
    assert_eq!(outcome.history.last().copied(), Some(outcome.distance));
}

#[test]
fn reported_distance_matches_reaggregation() {
    let catalog = builtin_catalog();
    let outcome = optimize(&current(), &target(), &small(0), &catalog);
    let stats = aggregate(&outcome.loadout, &catalog);
    assert!((calc_diff(&stats, &target()) - outcome.distance).abs() < 1e-9);
}

#[test]
fn outcome_is_independent_of_worker_count() {
    let catalog = builtin_catalog();
    let single = optimize(&current(), &target(), &small(1), &catalog);
    let several = optimize(&current(), &target(), &small(3), &catalog);
    assert_eq!(single.restart, several.restart);
    assert_eq!(single.loadout, several.loadout);
    assert_eq!(single.distance.to_bits(), several.distance.to_bits());
}

#[test]
fn locked_gear_survives_the_search() {
    let catalog = builtin_catalog();
    let mut start = current();
    let helmet = GearPiece::with_tier("gold_t1", false).rolls(Stat::Versatility, Stat::Luck, None);
    start.set_piece(GearSlot::Helmet, helmet.clone());
    let options = OptimizeOptions {
        lock_current_gear: true,
        ..small(0)
    };
    let outcome = optimize(&start, &target(), &options, &catalog);
    assert_eq!(outcome.loadout.piece(GearSlot::Helmet), Some(&helmet));
    assert!(outcome.loadout.piece(GearSlot::Weapon).is_some());
}

#[test]
fn raid_cap_limits_set_pieces() {
    let catalog = builtin_catalog();
    let outcome = optimize(&current(), &target(), &small(0), &catalog);
    assert!(outcome.loadout.raid_armor_count() <= 4);
    assert!(outcome.loadout.has_raid_weapon());
}

#[test]
fn unset_targets_are_ignored() {
    let catalog = builtin_catalog();
    let stats = aggregate(&current(), &catalog);
    let only_crit = TargetStats {
        crit: Some(stats.percent(Stat::Crit)),
        ..TargetStats::default()
    };
    assert!(calc_diff(&stats, &only_crit).abs() < 1e-9);
}
