//! Gear rolls, sigils, purple stats and imagines.

use crate::data::catalog::{Catalog, TierValues};
use crate::data::types::{GearSlot, PurpleKind, SlotType, Stat};
use crate::loadout::{GearPiece, Loadout};
use crate::stats::stacking::StackContribution;
use crate::stats::Accumulator;

/// `(229 + 149·p/100) / 378`; exactly 1.0 at full perfection.
pub fn perfection_factor(perfection: f64) -> f64 {
    (229.0 + 149.0 * perfection / 100.0) / 378.0
}

/// Scaled roll values: primary rounds to nearest, secondary and reforge floor.
pub fn scaled_rolls(values: TierValues, perfection: f64) -> TierValues {
    let factor = perfection_factor(perfection);
    TierValues {
        primary: (values.primary * factor).round(),
        secondary: (values.secondary * factor).floor(),
        reforge: (values.reforge * factor).floor(),
    }
}

/// Base values for a piece. An unknown tier id contributes nothing.
pub fn piece_values(catalog: &Catalog, slot: GearSlot, piece: &GearPiece) -> TierValues {
    match piece.tier.as_deref() {
        Some(tier) => catalog
            .tier_values(tier, slot.slot_type())
            .unwrap_or_default(),
        None => catalog.legacy_values(slot.slot_type() == SlotType::Weapon, piece.raid),
    }
}

pub(crate) fn apply_gear(acc: &mut Accumulator, loadout: &Loadout, catalog: &Catalog) {
    for (slot, piece) in loadout.equipped() {
        let rolls = scaled_rolls(piece_values(catalog, slot, piece), piece.clamped_perfection());
        for (stat, value) in [
            (piece.primary, rolls.primary),
            (piece.secondary, rolls.secondary),
            (piece.reforge, rolls.reforge),
        ] {
            if let Some(stat) = stat {
                acc.stacking.add(StackContribution::base(stat, value));
            }
        }

        if let Some(sigil) = &piece.sigil {
            for bonus in catalog
                .sigil_bonus(&sigil.name, sigil.clamped_level())
                .unwrap_or_default()
            {
                acc.stacking.add(StackContribution::base(bonus.stat, bonus.value));
            }
        }

        if let Some(purple) = piece.purple {
            *acc.purple.entry(purple.kind).or_insert(0.0) += purple.value;
            if purple.kind == PurpleKind::MaxHp {
                acc.stacking
                    .add(StackContribution::percent(Stat::MaxHp, purple.value));
                acc.max_hp_pct += purple.value;
            }
        }
    }
}

pub(crate) fn apply_imagines(acc: &mut Accumulator, loadout: &Loadout, catalog: &Catalog) {
    for imagine in loadout.imagines.iter().flatten() {
        if let Some((stat, value)) = catalog.imagine_value(&imagine.name, imagine.clamped_tier()) {
            acc.stacking.add(StackContribution::base(stat, value));
        }
    }
}
