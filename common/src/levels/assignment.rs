use rand::{Rng, seq::SliceRandom};
use tracing::{debug, warn};

use super::catalog::{Encounter, LevelCatalog};
use crate::constants::PHYSICS_EPSILON;

// ============================================================================
// Room Slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSlot {
    // Index into the flattened catalog
    Encounter(usize),
    Empty,
}

// How filled slots are picked from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    // First N entries in declaration order
    #[default]
    Prefix,
    // N draws without replacement, weighted by encounter probability
    Weighted,
}

// Which encounter lives behind each physical room door for one playthrough
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoomAssignment {
    slots: Vec<RoomSlot>,
}

impl RoomAssignment {
    #[must_use]
    pub const fn from_slots(slots: Vec<RoomSlot>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[RoomSlot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [RoomSlot] {
        &mut self.slots
    }

    #[must_use]
    pub fn get(&self, room: usize) -> Option<RoomSlot> {
        self.slots.get(room).copied()
    }

    // None for empty slots, out-of-range rooms and dangling catalog indices
    #[must_use]
    pub fn encounter_for<'a>(&self, room: usize, catalog: &'a LevelCatalog) -> Option<&'a Encounter> {
        match self.get(room)? {
            RoomSlot::Encounter(index) => catalog.get(index),
            RoomSlot::Empty => None,
        }
    }

    // Every occupied room with its encounter, in slot order
    pub fn encounters<'a>(&'a self, catalog: &'a LevelCatalog) -> impl Iterator<Item = (usize, &'a Encounter)> {
        (0..self.slots.len()).filter_map(move |room| self.encounter_for(room, catalog).map(|e| (room, e)))
    }
}

// ============================================================================
// Generation
// ============================================================================

// Fill `total` slots: pick round(total * (1 - empty_ratio)) catalog entries,
// pad with empty rooms, then shuffle the whole lot.
pub fn generate_assignment<R: Rng + ?Sized>(
    catalog: &LevelCatalog,
    total: usize,
    empty_ratio: f32,
    mode: SelectionMode,
    rng: &mut R,
) -> RoomAssignment {
    let ratio = empty_ratio.clamp(0.0, 1.0);
    if (ratio - empty_ratio).abs() > PHYSICS_EPSILON {
        warn!("empty ratio {empty_ratio} clamped to {ratio}");
    }

    let wanted = ((total as f32) * (1.0 - ratio)).round() as usize;
    let filled = wanted.min(catalog.len()).min(total);
    if filled < wanted {
        warn!("catalog only has {} encounters, {} rooms requested", catalog.len(), wanted);
    }

    let mut slots: Vec<RoomSlot> = match mode {
        SelectionMode::Prefix => (0..filled).map(RoomSlot::Encounter).collect(),
        SelectionMode::Weighted => weighted_draw(catalog, filled, rng)
            .into_iter()
            .map(RoomSlot::Encounter)
            .collect(),
    };
    slots.resize(total, RoomSlot::Empty);
    slots.shuffle(rng);

    debug!("generated room assignment ({mode:?}): {filled} encounters, {} empty", total - filled);
    RoomAssignment { slots }
}

fn weighted_draw<R: Rng + ?Sized>(catalog: &LevelCatalog, count: usize, rng: &mut R) -> Vec<usize> {
    let mut remaining: Vec<(usize, f32)> = catalog
        .flatten()
        .enumerate()
        .map(|(index, encounter)| (index, encounter.probability.max(0.0)))
        .collect();
    let mut picked = Vec::with_capacity(count);

    while picked.len() < count && !remaining.is_empty() {
        let total_weight: f32 = remaining.iter().map(|(_, weight)| weight).sum();
        let position = if total_weight > PHYSICS_EPSILON {
            let roll = rng.random_range(0.0..total_weight);
            let mut cumulative = 0.0;
            remaining
                .iter()
                .position(|(_, weight)| {
                    cumulative += weight;
                    roll < cumulative
                })
                .unwrap_or(remaining.len() - 1)
        } else {
            // Only zero-weight entries left
            rng.random_range(0..remaining.len())
        };
        picked.push(remaining.swap_remove(position).0);
    }

    picked
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::constants::ROOM_COUNT;

    fn encounter_indices(assignment: &RoomAssignment) -> Vec<usize> {
        assignment
            .slots()
            .iter()
            .filter_map(|slot| match slot {
                RoomSlot::Encounter(index) => Some(*index),
                RoomSlot::Empty => None,
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Prefix selection
    // ------------------------------------------------------------------------

    #[test]
    fn length_matches_slot_count_for_any_ratio() {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        for step in 0..20 {
            let ratio = step as f32 / 20.0;
            for total in [0, 1, 5, ROOM_COUNT] {
                let assignment = generate_assignment(&catalog, total, ratio, SelectionMode::Prefix, &mut rng);
                assert_eq!(assignment.len(), total, "ratio {ratio}, total {total}");
            }
        }
    }

    #[test]
    fn each_entry_appears_at_most_once() {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(2);
        for mode in [SelectionMode::Prefix, SelectionMode::Weighted] {
            for _ in 0..50 {
                let assignment = generate_assignment(&catalog, ROOM_COUNT, 0.1, mode, &mut rng);
                let mut indices = encounter_indices(&assignment);
                let count = indices.len();
                indices.sort_unstable();
                indices.dedup();
                assert_eq!(indices.len(), count);
                assert!(indices.iter().all(|&i| i < catalog.len()));
            }
        }
    }

    #[test]
    fn prefix_takes_the_first_entries_in_declaration_order() {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let assignment = generate_assignment(&catalog, 10, 0.3, SelectionMode::Prefix, &mut rng);

        let mut indices = encounter_indices(&assignment);
        indices.sort_unstable();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
        assert_eq!(assignment.slots().iter().filter(|s| **s == RoomSlot::Empty).count(), 3);
    }

    #[test]
    fn filled_count_is_clamped_to_catalog_size() {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(4);
        let total = catalog.len() + 6;
        let assignment = generate_assignment(&catalog, total, 0.0, SelectionMode::Prefix, &mut rng);
        assert_eq!(assignment.len(), total);
        assert_eq!(encounter_indices(&assignment).len(), catalog.len());
    }

    #[test]
    fn out_of_range_ratio_is_clamped() {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let all_empty = generate_assignment(&catalog, ROOM_COUNT, 3.0, SelectionMode::Prefix, &mut rng);
        assert!(encounter_indices(&all_empty).is_empty());
        let all_full = generate_assignment(&catalog, ROOM_COUNT, -1.0, SelectionMode::Prefix, &mut rng);
        assert_eq!(encounter_indices(&all_full).len(), ROOM_COUNT);
    }

    #[test]
    fn same_seed_gives_same_assignment() {
        let catalog = LevelCatalog::builtin();
        let a = generate_assignment(&catalog, ROOM_COUNT, 0.2, SelectionMode::Prefix, &mut StdRng::seed_from_u64(9));
        let b = generate_assignment(&catalog, ROOM_COUNT, 0.2, SelectionMode::Prefix, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    // ------------------------------------------------------------------------
    // Weighted selection
    // ------------------------------------------------------------------------

    #[test]
    fn weighted_never_draws_zero_probability_while_others_remain() {
        let mut catalog = LevelCatalog::builtin();
        for encounter in catalog.groups[0].encounters.iter_mut() {
            encounter.probability = 0.0;
        }
        let zero_count = catalog.groups[0].encounters.len();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let assignment = generate_assignment(&catalog, 8, 0.0, SelectionMode::Weighted, &mut rng);
            assert!(encounter_indices(&assignment).iter().all(|&i| i >= zero_count));
        }
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    #[test]
    fn missing_room_data_has_no_encounter() {
        let catalog = LevelCatalog::builtin();
        let assignment = RoomAssignment::from_slots(vec![RoomSlot::Empty, RoomSlot::Encounter(999), RoomSlot::Encounter(0)]);
        assert!(assignment.encounter_for(0, &catalog).is_none());
        assert!(assignment.encounter_for(1, &catalog).is_none());
        assert!(assignment.encounter_for(2, &catalog).is_some());
        assert!(assignment.encounter_for(50, &catalog).is_none());
        assert_eq!(assignment.encounters(&catalog).count(), 1);
    }
}
