//! Catalog and loadout diagnostics. Validation never fails; it reports.

use std::collections::HashSet;
use std::fmt;

use crate::combat::skills::COMBAT_TALENTS;
use crate::data::catalog::{Catalog, ProjectionRow};
use crate::data::types::{GearSlot, CORE_STATS};
use crate::factors::FACTOR_SLOT_COUNT;
use crate::loadout::{Loadout, MAX_PERFECTION, MAX_SIGIL_LEVEL};
use crate::stats::modules::MODULE_LEVEL_THRESHOLDS;

/// Bond levels at which general bonuses are expected to accrue.
pub const BOND_THRESHOLDS: [u8; 5] = [2, 5, 12, 20, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for stat in CORE_STATS {
        match catalog.dr(stat) {
            None => report.push(
                ValidationSeverity::Error,
                format!("dr.{stat}"),
                "missing diminishing-returns constant",
            ),
            Some(constant) if constant.constant <= 0.0 => report.push(
                ValidationSeverity::Error,
                format!("dr.{stat}"),
                format!("constant must be positive, got {}", constant.constant),
            ),
            Some(_) => {}
        }
    }

    for (label, tier) in [("gold_tier", &catalog.gold_tier), ("raid_tier", &catalog.raid_tier)] {
        if catalog.tier(tier).is_none() {
            report.push(
                ValidationSeverity::Warning,
                label,
                format!("tier '{tier}' is not defined; optimizer pieces will roll zero"),
            );
        }
    }

    for name in catalog.uncompiled_talents() {
        let severity = if COMBAT_TALENTS.contains(&name) {
            ValidationSeverity::Info
        } else {
            ValidationSeverity::Warning
        };
        report.push(
            severity,
            format!("talents.{name}"),
            "text compiled to no stat effect",
        );
    }

    for (name, affix) in &catalog.module_affixes {
        if affix.levels.len() > MODULE_LEVEL_THRESHOLDS.len() {
            report.push(
                ValidationSeverity::Warning,
                format!("module_affixes.{name}"),
                format!(
                    "{} levels defined, only {} are reachable",
                    affix.levels.len(),
                    MODULE_LEVEL_THRESHOLDS.len()
                ),
            );
        }
    }

    for (class_name, class) in &catalog.classes {
        for (spec_name, spec) in &class.specs {
            if spec.weapon_buffs.len() > 2 {
                report.push(
                    ValidationSeverity::Warning,
                    format!("classes.{class_name}.specs.{spec_name}.weapon_buffs"),
                    "only the first two weapon buffs apply",
                );
            }
        }
    }

    for (name, factor) in &catalog.factors {
        if factor.effects.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("factors.{name}"),
                "factor has no effects",
            );
        }
    }

    for (name, projection) in &catalog.projections {
        let context = format!("projections.{name}");
        if !matches!(projection.rows.first(), Some(ProjectionRow::Root)) {
            report.push(ValidationSeverity::Warning, context.clone(), "first row is not root");
        }
        let mut seen = HashSet::new();
        for slot in projection.slot_indices() {
            if slot >= FACTOR_SLOT_COUNT {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("slot {slot} is out of range (max {})", FACTOR_SLOT_COUNT - 1),
                );
            } else if !seen.insert(slot) {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("slot {slot} appears in more than one row"),
                );
            }
        }
        for tier in &projection.bond_general {
            if !BOND_THRESHOLDS.contains(&tier.level) {
                report.push(
                    ValidationSeverity::Info,
                    format!("{context}.bond_general"),
                    format!("unusual bond threshold {}", tier.level),
                );
            }
        }
        if projection.exclusive.is_empty() && !projection.exclusive_text.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.exclusive_text"),
                "no exclusive bonus text compiled",
            );
        }
    }

    report
}

pub fn validate_loadout(loadout: &Loadout, catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    if catalog.class(&loadout.class_name).is_none() {
        report.push(
            ValidationSeverity::Warning,
            "class_name",
            format!("unknown class '{}'", loadout.class_name),
        );
    } else if catalog.spec(&loadout.class_name, &loadout.spec_name).is_none() {
        report.push(
            ValidationSeverity::Warning,
            "spec_name",
            format!("unknown spec '{}'", loadout.spec_name),
        );
    }

    for (slot, piece) in loadout.equipped() {
        let context = format!("gear.{slot:?}");
        if let Some(tier) = piece.tier.as_deref() {
            if catalog.tier(tier).is_none() {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("unknown tier '{tier}'"),
                );
            }
        }
        if !(0.0..=MAX_PERFECTION).contains(&piece.perfection) {
            report.push(
                ValidationSeverity::Info,
                context.clone(),
                format!("perfection {} is clamped to 0..=100", piece.perfection),
            );
        }
        if let Some(sigil) = &piece.sigil {
            if catalog.sigils.get(&sigil.name).is_none() {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("unknown sigil '{}'", sigil.name),
                );
            } else if sigil.level == 0 || sigil.level > MAX_SIGIL_LEVEL {
                report.push(
                    ValidationSeverity::Info,
                    context.clone(),
                    format!("sigil level {} is clamped to 1..=3", sigil.level),
                );
            }
        }
        if let Some(purple) = piece.purple {
            if piece.raid {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    "raid pieces do not roll purple stats",
                );
            }
            let known = catalog
                .purple_values(purple.kind)
                .is_some_and(|values| values.iter().any(|v| (*v - purple.value).abs() < 1e-9));
            if !known {
                report.push(
                    ValidationSeverity::Info,
                    context.clone(),
                    format!("purple value {} is not a catalog roll", purple.value),
                );
            }
        }
        if slot == GearSlot::Weapon && piece.raid && piece.tier.is_none() {
            report.push(
                ValidationSeverity::Info,
                context,
                "raid weapon without tier uses legacy values",
            );
        }
    }

    for (index, module) in loadout.modules.iter().enumerate() {
        let active = module.rarity.active_affixes();
        if module.affixes.len() > active {
            report.push(
                ValidationSeverity::Info,
                format!("modules[{index}]"),
                format!("only the first {active} affixes count for this rarity"),
            );
        }
        for roll in module.affixes.iter().take(active) {
            if !catalog.module_affixes.contains_key(&roll.affix) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("modules[{index}]"),
                    format!("unknown affix '{}'", roll.affix),
                );
            }
        }
    }

    for (index, imagine) in loadout.imagines.iter().enumerate() {
        if let Some(imagine) = imagine {
            if !catalog.imagines.contains_key(&imagine.name) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("imagines[{index}]"),
                    format!("unknown imagine '{}'", imagine.name),
                );
            }
        }
    }

    for talent in &loadout.talents {
        if catalog.talent(talent).is_none() {
            report.push(
                ValidationSeverity::Warning,
                "talents",
                format!("unknown talent '{talent}'"),
            );
        }
    }

    let psychoscope = &loadout.psychoscope;
    if let Some(name) = psychoscope.projection.as_deref() {
        match catalog.projection(name) {
            None => report.push(
                ValidationSeverity::Warning,
                "psychoscope.projection",
                format!("unknown projection '{name}'"),
            ),
            Some(projection) => {
                for (left, right) in psychoscope.branch_conflicts(projection) {
                    report.push(
                        ValidationSeverity::Warning,
                        "psychoscope.slots",
                        format!("branch slots {left} and {right} are both filled; {left} is used"),
                    );
                }
            }
        }
    }
    for (index, assignment) in psychoscope.slots.iter().enumerate() {
        if let Some(assignment) = assignment {
            if catalog.factor(&assignment.factor).is_none() {
                report.push(
                    ValidationSeverity::Warning,
                    format!("psychoscope.slots[{index}]"),
                    format!("unknown factor '{}'", assignment.factor),
                );
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::builtin_catalog;
    use crate::data::types::{PurpleKind, Stat};
    use crate::factors::FactorAssignment;
    use crate::loadout::{GearPiece, PurpleStat};

    #[test]
    fn builtin_catalog_has_no_errors() {
        let report = validate_catalog(&builtin_catalog());
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        assert_eq!(report.count(ValidationSeverity::Warning), 0);
        assert_eq!(report.count(ValidationSeverity::Info), COMBAT_TALENTS.len());
    }

    #[test]
    fn empty_catalog_reports_missing_dr_constants() {
        let report = validate_catalog(&Catalog::default());
        assert_eq!(report.count(ValidationSeverity::Error), CORE_STATS.len());
    }

    #[test]
    fn loadout_diagnostics_cover_unknowns_and_conflicts() {
        let catalog = builtin_catalog();
        let mut loadout = Loadout::new("stormblade", "iaido");
        loadout.talents.insert("mystery".to_string());
        loadout.set_piece(
            GearSlot::Helmet,
            GearPiece {
                purple: Some(PurpleStat {
                    kind: PurpleKind::AttackSpeed,
                    value: 4.0,
                }),
                ..GearPiece::with_tier("raid_t1", true).rolls(Stat::Crit, Stat::Haste, None)
            },
        );
        loadout.psychoscope.projection = Some("tempest".to_string());
        loadout.psychoscope.slots[0] = Some(FactorAssignment {
            factor: "crit_resonance".to_string(),
            grade: 10,
        });
        loadout.psychoscope.slots[1] = Some(FactorAssignment {
            factor: "luck_resonance".to_string(),
            grade: 10,
        });

        let report = validate_loadout(&loadout, &catalog);
        let messages: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("unknown talent 'mystery'")));
        assert!(messages.iter().any(|m| m.contains("do not roll purple")));
        assert!(messages.iter().any(|m| m.contains("both filled")));
        assert!(!report.has_errors());
    }
}
