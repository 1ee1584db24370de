use bevy_math::Vec3;

use crate::{
    doors::DoorStates,
    levels::{Encounter, LevelCatalog, RoomAssignment},
    map::{Cell, SpatialGrid, room_index_at},
};

// Read-only view of the world handed to the per-frame resolvers
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub grid: &'a SpatialGrid,
    pub doors: &'a DoorStates,
    pub catalog: &'a LevelCatalog,
    pub assignment: &'a RoomAssignment,
}

impl<'a> FrameContext<'a> {
    #[must_use]
    pub fn room_at(&self, pos: Vec3) -> Option<usize> {
        room_index_at(pos, self.assignment.len())
    }

    #[must_use]
    pub fn cell_at(&self, pos: Vec3) -> Cell {
        self.grid.cell_at_world(pos)
    }

    #[must_use]
    pub fn encounter_in(&self, room: usize) -> Option<&'a Encounter> {
        self.assignment.encounter_for(room, self.catalog)
    }
}
