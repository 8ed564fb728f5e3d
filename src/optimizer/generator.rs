//! Random candidate generation (`gen_layout`) and the shared search space.

use crate::data::catalog::Catalog;
use crate::data::types::{GearSlot, PurpleKind, Stat, CORE_STATS, GEAR_SLOT_COUNT};
use crate::loadout::{GearPiece, ImagineSlot, Loadout, PurpleStat, MAX_IMAGINE_TIER};
use crate::optimizer::rng::Rng;
use crate::optimizer::OptimizeOptions;

/// Everything a restart needs to build and mutate candidates. Built once per
/// optimize call and shared read-only by every restart.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    pub base: Loadout,
    pub locked: [bool; GEAR_SLOT_COUNT],
    /// Raid armor pieces the generator may add on top of locked ones.
    pub raid_budget: usize,
    pub gold_tier: String,
    pub raid_tier: String,
    /// Raid rolls: the spec's stat priority.
    pub raid_rolls: (Stat, Stat),
    pub purple: Vec<(PurpleKind, f64)>,
    pub imagines: Vec<String>,
    pub randomize_purple: bool,
    pub randomize_imagines: bool,
    pub purple_chance: f64,
}

impl SearchSpace {
    pub fn new(current: &Loadout, options: &OptimizeOptions, catalog: &Catalog) -> Self {
        let mut locked = [false; GEAR_SLOT_COUNT];
        if options.lock_current_gear {
            for slot in GearSlot::ALL {
                locked[slot.index()] = current.piece(slot).is_some();
            }
        }
        let locked_raid = GearSlot::RAID_SET
            .iter()
            .filter(|slot| locked[slot.index()])
            .filter(|slot| current.piece(**slot).is_some_and(|piece| piece.raid))
            .count();
        let raid_rolls = catalog
            .spec(&current.class_name, &current.spec_name)
            .map(|spec| (spec.primary, spec.secondary))
            .unwrap_or((Stat::Crit, Stat::Haste));
        let purple = PurpleKind::ALL
            .iter()
            .filter_map(|kind| catalog.purple_max(*kind).map(|value| (*kind, value)))
            .collect();

        let mut base = current.clone();
        for slot in GearSlot::ALL {
            if !locked[slot.index()] {
                base.gear[slot.index()] = None;
            }
        }

        Self {
            base,
            locked,
            raid_budget: options.raid_cap().saturating_sub(locked_raid),
            gold_tier: catalog.gold_tier.clone(),
            raid_tier: catalog.raid_tier.clone(),
            raid_rolls,
            purple,
            imagines: catalog.imagines.keys().cloned().collect(),
            randomize_purple: options.randomize_purple,
            randomize_imagines: options.randomize_imagines,
            purple_chance: options.purple_chance.clamp(0.0, 1.0),
        }
    }

    pub fn unlocked_slots(&self) -> Vec<GearSlot> {
        GearSlot::ALL
            .into_iter()
            .filter(|slot| !self.locked[slot.index()])
            .collect()
    }

    pub fn can_add_raid(&self, candidate: &Loadout) -> bool {
        let added = GearSlot::RAID_SET
            .iter()
            .filter(|slot| !self.locked[slot.index()])
            .filter(|slot| candidate.piece(**slot).is_some_and(|piece| piece.raid))
            .count();
        added < self.raid_budget
    }

    /// Primary and secondary are distinct; the reforge differs from both.
    pub fn random_rolls(&self, rng: &mut Rng) -> (Stat, Stat, Stat) {
        let mut pool = CORE_STATS;
        rng.shuffle(&mut pool);
        (pool[0], pool[1], pool[2])
    }

    pub fn random_reforge(&self, primary: Option<Stat>, secondary: Option<Stat>, rng: &mut Rng) -> Stat {
        let options: Vec<Stat> = CORE_STATS
            .into_iter()
            .filter(|stat| Some(*stat) != primary && Some(*stat) != secondary)
            .collect();
        rng.pick(&options).copied().unwrap_or(Stat::Versatility)
    }

    pub fn random_purple(&self, rng: &mut Rng) -> Option<PurpleStat> {
        rng.pick(&self.purple)
            .map(|(kind, value)| PurpleStat { kind: *kind, value: *value })
    }

    pub fn gold_piece(&self, rng: &mut Rng) -> GearPiece {
        let (primary, secondary, reforge) = self.random_rolls(rng);
        let mut piece =
            GearPiece::with_tier(self.gold_tier.clone(), false).rolls(primary, secondary, Some(reforge));
        if self.randomize_purple && rng.chance(self.purple_chance) {
            piece.purple = self.random_purple(rng);
        }
        piece
    }

    pub fn raid_piece(&self, rng: &mut Rng) -> GearPiece {
        let (primary, secondary) = self.raid_rolls;
        let reforge = self.random_reforge(Some(primary), Some(secondary), rng);
        GearPiece::with_tier(self.raid_tier.clone(), true).rolls(primary, secondary, Some(reforge))
    }

    /// Imagine names are kept distinct across the two slots.
    pub fn random_imagine(&self, other: Option<&str>, rng: &mut Rng) -> Option<ImagineSlot> {
        let choices: Vec<&String> = self
            .imagines
            .iter()
            .filter(|name| Some(name.as_str()) != other)
            .collect();
        rng.pick(&choices).map(|name| ImagineSlot {
            name: (*name).clone(),
            tier: MAX_IMAGINE_TIER,
        })
    }
}

/// Build one random candidate around the locked pieces.
pub fn gen_layout(space: &SearchSpace, rng: &mut Rng) -> Loadout {
    let mut candidate = space.base.clone();

    let mut eligible: Vec<GearSlot> = GearSlot::RAID_SET
        .into_iter()
        .filter(|slot| !space.locked[slot.index()])
        .collect();
    rng.shuffle(&mut eligible);
    let promoted = rng.below(space.raid_budget.min(eligible.len()) + 1);
    eligible.truncate(promoted);

    for slot in space.unlocked_slots() {
        let raid = slot == GearSlot::Weapon || eligible.contains(&slot);
        let piece = if raid {
            space.raid_piece(rng)
        } else {
            space.gold_piece(rng)
        };
        candidate.set_piece(slot, piece);
    }

    if space.randomize_imagines {
        let first = space.random_imagine(None, rng);
        let second = space.random_imagine(first.as_ref().map(|slot| slot.name.as_str()), rng);
        candidate.imagines = [first, second];
    }
    candidate
}
