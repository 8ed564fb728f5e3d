//! Single-step loadout mutations for the local search. A mutation never
//! touches locked slots and never pushes the raid piece count past the cap.

use crate::data::types::GearSlot;
use crate::loadout::Loadout;
use crate::optimizer::generator::SearchSpace;
use crate::optimizer::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    RerollRolls(GearSlot),
    RerollReforge(GearSlot),
    ToggleRaid(GearSlot),
    RerollPurple(GearSlot),
    RerollImagine(usize),
}

/// Mutations that can legally apply to `candidate` right now.
pub fn available_mutations(space: &SearchSpace, candidate: &Loadout) -> Vec<Mutation> {
    let mut moves = Vec::new();
    let room_for_raid = space.can_add_raid(candidate);
    for slot in space.unlocked_slots() {
        let Some(piece) = candidate.piece(slot) else {
            continue;
        };
        if !piece.raid {
            moves.push(Mutation::RerollRolls(slot));
            if space.randomize_purple && !space.purple.is_empty() {
                moves.push(Mutation::RerollPurple(slot));
            }
        }
        moves.push(Mutation::RerollReforge(slot));
        if slot.counts_toward_raid_set() && (piece.raid || room_for_raid) {
            moves.push(Mutation::ToggleRaid(slot));
        }
    }
    if space.randomize_imagines && !space.imagines.is_empty() {
        moves.push(Mutation::RerollImagine(0));
        moves.push(Mutation::RerollImagine(1));
    }
    moves
}

pub fn apply_mutation(space: &SearchSpace, candidate: &mut Loadout, mutation: Mutation, rng: &mut Rng) {
    match mutation {
        Mutation::RerollRolls(slot) => {
            let (primary, secondary, reforge) = space.random_rolls(rng);
            if let Some(piece) = candidate.piece_mut(slot) {
                piece.primary = Some(primary);
                piece.secondary = Some(secondary);
                piece.reforge = Some(reforge);
            }
        }
        Mutation::RerollReforge(slot) => {
            if let Some(piece) = candidate.piece_mut(slot) {
                piece.reforge = Some(space.random_reforge(piece.primary, piece.secondary, rng));
            }
        }
        Mutation::ToggleRaid(slot) => {
            let to_raid = candidate.piece(slot).is_some_and(|piece| !piece.raid);
            let piece = if to_raid {
                space.raid_piece(rng)
            } else {
                space.gold_piece(rng)
            };
            candidate.set_piece(slot, piece);
        }
        Mutation::RerollPurple(slot) => {
            let purple = if rng.chance(space.purple_chance) {
                space.random_purple(rng)
            } else {
                None
            };
            if let Some(piece) = candidate.piece_mut(slot) {
                piece.purple = purple;
            }
        }
        Mutation::RerollImagine(index) => {
            let other = candidate
                .imagines
                .get(1 - index.min(1))
                .and_then(|slot| slot.as_ref())
                .map(|slot| slot.name.clone());
            let imagine = space.random_imagine(other.as_deref(), rng);
            if let Some(slot) = candidate.imagines.get_mut(index) {
                *slot = imagine;
            }
        }
    }
}

/// Clone `candidate` and apply exactly one random mutation to the clone.
/// Returns an unchanged clone when nothing can be mutated.
pub fn mutate(space: &SearchSpace, candidate: &Loadout, rng: &mut Rng) -> Loadout {
    let mut mutant = candidate.clone();
    let moves = available_mutations(space, candidate);
    if let Some(mutation) = rng.pick(&moves).copied() {
        apply_mutation(space, &mut mutant, mutation, rng);
    }
    mutant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_catalog;
    use crate::optimizer::generator::gen_layout;
    use crate::optimizer::OptimizeOptions;

    fn setup(options: OptimizeOptions) -> (SearchSpace, Loadout, Rng) {
        let space = SearchSpace::new(&Loadout::new("stormblade", "iaido"), &options, &builtin_catalog());
        let mut rng = Rng::new(21);
        let candidate = gen_layout(&space, &mut rng);
        (space, candidate, rng)
    }

    #[test]
    fn weapon_never_toggles_raid() {
        let (space, candidate, _) = setup(OptimizeOptions::default());
        let moves = available_mutations(&space, &candidate);
        assert!(!moves.contains(&Mutation::ToggleRaid(GearSlot::Weapon)));
        assert!(!moves.contains(&Mutation::RerollRolls(GearSlot::Weapon)));
    }

    #[test]
    fn mutations_keep_the_raid_cap() {
        let options = OptimizeOptions::default();
        let cap = options.raid_cap();
        let (space, mut candidate, mut rng) = setup(options);
        for _ in 0..500 {
            candidate = mutate(&space, &candidate, &mut rng);
            assert!(candidate.raid_armor_count() <= cap);
        }
    }

    #[test]
    fn mutate_leaves_the_original_untouched() {
        let (space, candidate, mut rng) = setup(OptimizeOptions::default());
        let snapshot = candidate.clone();
        let _ = mutate(&space, &candidate, &mut rng);
        assert_eq!(candidate, snapshot);
    }

    #[test]
    fn fully_locked_candidate_has_no_moves() {
        let options = OptimizeOptions {
            lock_current_gear: true,
            randomize_imagines: false,
            ..OptimizeOptions::default()
        };
        let first = setup(OptimizeOptions::default()).1;
        let space = SearchSpace::new(&first, &options, &builtin_catalog());
        assert!(available_mutations(&space, &first).is_empty());
        assert_eq!(mutate(&space, &first, &mut Rng::new(1)), first);
    }
}
