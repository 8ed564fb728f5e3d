use resonance::data::builtin_catalog;
use resonance::data::types::Stat;
use resonance::factors::{resolve, BranchSide, PsychoscopeConfig};
use resonance::loadout::Loadout;
use resonance::stats::aggregate;

const TEMPEST: &str = "tempest";

#[test]
fn branch_assignment_clears_opposite_side() {
    let catalog = builtin_catalog();
    let projection = catalog.projection(TEMPEST).expect("tempest projection");
    let mut config = PsychoscopeConfig::new(TEMPEST);

    assert!(config.assign(projection, 0, "crit_resonance", 10));
    assert!(config.assign(projection, 1, "luck_resonance", 10));
    assert!(config.assignment(0).is_none());
    assert_eq!(config.branches.first().copied().flatten(), Some(BranchSide::Right));
    assert!(config.branch_conflicts(projection).is_empty());

    assert!(!config.assign(projection, 10, "crit_resonance", 10));
}

#[test]
fn deserialized_conflict_resolves_to_left_side() {
    let catalog = builtin_catalog();
    let raw = r#"{
        "projection": "tempest",
        "slots": [
            { "factor": "crit_resonance", "grade": 10 },
            { "factor": "luck_resonance", "grade": 10 },
            null, null, null, null, null, null, null, null
        ]
    }"#;
    let config: PsychoscopeConfig = serde_json::from_str(raw).expect("parse psychoscope");
    let projection = catalog.projection(TEMPEST).expect("tempest projection");
    assert_eq!(config.branch_conflicts(projection), vec![(0, 1)]);

    let effects = resolve(&config, "stormblade", &catalog);
    assert_eq!(effects.flat_for(Stat::Crit), 600.0);
    assert_eq!(effects.flat_for(Stat::Luck), 0.0);
}

#[test]
fn grade_interpolates_between_anchors() {
    let catalog = builtin_catalog();
    let projection = catalog.projection(TEMPEST).expect("tempest projection");
    let mut config = PsychoscopeConfig::new(TEMPEST);
    config.assign(projection, 2, "crit_resonance", 1);
    config.assign(projection, 3, "haste_resonance", 10);
    let effects = resolve(&config, "stormblade", &catalog);
    assert_eq!(effects.flat_for(Stat::Crit), 120.0);
    assert_eq!(effects.flat_for(Stat::Haste), 600.0);
    assert_eq!(effects.descriptions.len(), 2);
}

#[test]
fn gain_multiplier_rescales_totals() {
    let catalog = builtin_catalog();
    let projection = catalog.projection(TEMPEST).expect("tempest projection");
    let mut loadout = Loadout::new("stormblade", "iaido");
    loadout.base_stats.insert(Stat::Luck, 1000.0);
    loadout.base_stats.insert(Stat::Versatility, 1000.0);
    loadout.psychoscope = PsychoscopeConfig::new(TEMPEST);
    loadout.psychoscope.assign(projection, 2, "luck_gain", 10);

    let stats = aggregate(&loadout, &catalog);
    assert!((stats.raw(Stat::Luck) - 1120.0).abs() < 1e-9);
    assert!((stats.raw(Stat::Versatility) - 940.0).abs() < 1e-9);
}

#[test]
fn class_gated_factor_only_applies_to_its_class() {
    let catalog = builtin_catalog();
    let projection = catalog.projection(TEMPEST).expect("tempest projection");
    let mut config = PsychoscopeConfig::new(TEMPEST);
    config.assign(projection, 6, "storm_conduit", 10);

    let own = resolve(&config, "stormblade", &catalog);
    assert_eq!(own.attack_from_stat.get(&Stat::Haste), Some(&5.0));
    let other = resolve(&config, "frost_mage", &catalog);
    assert!(other.attack_from_stat.is_empty());
}

#[test]
fn bond_tiers_and_exclusive_unlock() {
    let catalog = builtin_catalog();
    let mut config = PsychoscopeConfig::new(TEMPEST);

    config.bond_level = 12;
    let partial = resolve(&config, "stormblade", &catalog);
    assert_eq!(partial.bond_flat.get(&Stat::Crit), Some(&50.0));
    assert_eq!(partial.bond_flat.get(&Stat::Haste), Some(&80.0));
    assert_eq!(partial.dream_damage_pct, 0.0);

    config.bond_level = 40;
    let full = resolve(&config, "stormblade", &catalog);
    assert_eq!(full.bond_flat.get(&Stat::Crit), Some(&150.0));
    assert_eq!(full.dream_damage_pct, 6.0);
    assert_eq!(full.main_stat_flat, 120.0);
    assert_eq!(full.conditional_crit_luck.len(), 1);
}

#[test]
fn unknown_projection_resolves_empty() {
    let catalog = builtin_catalog();
    let mut config = PsychoscopeConfig::new("nowhere");
    config.bond_level = 35;
    let effects = resolve(&config, "stormblade", &catalog);
    assert!(effects.flat.is_empty());
    assert!(effects.descriptions.is_empty());
}
