mod cells;
mod helpers;
mod layout;

use bevy_math::Vec3;
use tracing::{debug, info};

use crate::{
    constants::{GRID_COLS, GRID_ROWS},
    levels::{LevelCatalog, RoomAssignment},
};

pub use cells::{Cell, CellType, CurtainVariant, DoorVariant, Fixture, HidingSpot};
pub use helpers::{
    RoomSide, cell_center, grid_coords_from_position, grid_line_x, grid_line_z, room_index_at, room_local_to_world,
    room_origin,
};
pub use layout::{Rect, room_template_rects, shell_rects};

// ============================================================================
// Spatial Grid
// ============================================================================

// Dense occupancy map of the whole hotel, indexed by packed (x, z).
// Built once per session and read-only afterwards until an explicit reset.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cols: i32,
    rows: i32,
    cells: Vec<Cell>,
    initialized: bool,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_COLS, GRID_ROWS)
    }
}

impl SpatialGrid {
    #[must_use]
    pub fn new(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            cells: vec![Cell::EMPTY; (cols * rows) as usize],
            initialized: false,
        }
    }

    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    const fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.cols || z >= self.rows {
            None
        } else {
            Some((z * self.cols + x) as usize)
        }
    }

    // Out-of-range coordinates read as an empty cell
    #[must_use]
    pub fn get_cell(&self, x: i32, z: i32) -> Cell {
        self.index(x, z).map_or(Cell::EMPTY, |i| self.cells[i])
    }

    #[must_use]
    pub fn cell_at_world(&self, pos: Vec3) -> Cell {
        let (x, z) = grid_coords_from_position(pos);
        self.get_cell(x, z)
    }

    // Build the grid unless it already is; a second call without reset() is a no-op
    pub fn initialize_if_needed(&mut self, assignment: &RoomAssignment, catalog: &LevelCatalog) -> bool {
        if self.initialized {
            debug!("spatial grid already initialized, skipping build");
            return false;
        }
        self.build(assignment, catalog);
        true
    }

    pub fn reset(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.initialized = false;
    }

    fn build(&mut self, assignment: &RoomAssignment, catalog: &LevelCatalog) {
        self.rasterize_boundary();

        for rect in shell_rects() {
            self.rasterize(&rect);
        }

        let template = room_template_rects();
        for room in 0..assignment.len() {
            for rect in &template {
                self.rasterize(&rect.placed_in_room(room));
            }
        }

        // Markers only go on open floor; furniture under a rest position keeps its kind and tag
        let mut markers = 0;
        for (room, encounter) in assignment.encounters(catalog) {
            let rest = room_local_to_world(room, encounter.monster.rest_position);
            let (x, z) = grid_coords_from_position(rest);
            if self.index(x, z).is_none() || self.get_cell(x, z) != Cell::EMPTY {
                debug!("no marker for '{}' in room {room}, rest cell ({x}, {z}) is occupied", encounter.id);
                continue;
            }
            if self.set(x, z, Cell::new(CellType::MonsterSpawnMarker)) {
                markers += 1;
            }
        }

        self.initialized = true;
        info!(
            "built spatial grid {}x{} for {} rooms with {} monster markers",
            self.cols,
            self.rows,
            assignment.len(),
            markers
        );
    }

    fn rasterize_boundary(&mut self) {
        for x in 0..self.cols {
            self.set(x, 0, Cell::new(CellType::Boundary));
            self.set(x, self.rows - 1, Cell::new(CellType::Boundary));
        }
        for z in 0..self.rows {
            self.set(0, z, Cell::new(CellType::Boundary));
            self.set(self.cols - 1, z, Cell::new(CellType::Boundary));
        }
    }

    // Later rectangles overwrite earlier ones where they overlap
    pub fn rasterize(&mut self, rect: &Rect) {
        let (min_x, max_x, min_z, max_z) = rect.bounds_xz();
        let cell = Cell {
            kind: rect.kind,
            hiding_spot: rect.hiding_spot,
        };
        for z in grid_line_z(min_z)..grid_line_z(max_z) {
            for x in grid_line_x(min_x)..grid_line_x(max_x) {
                self.set(x, z, cell);
            }
        }
    }

    fn set(&mut self, x: i32, z: i32, cell: Cell) -> bool {
        if let Some(i) = self.index(x, z) {
            self.cells[i] = cell;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn count_of(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        constants::{ROOM_COUNT, ROOM_PITCH},
        levels::{RoomSlot, SelectionMode, generate_assignment},
    };

    fn built_grid() -> (SpatialGrid, RoomAssignment, LevelCatalog) {
        let catalog = LevelCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let assignment = generate_assignment(&catalog, ROOM_COUNT, 0.2, SelectionMode::Prefix, &mut rng);
        let mut grid = SpatialGrid::default();
        assert!(grid.initialize_if_needed(&assignment, &catalog));
        (grid, assignment, catalog)
    }

    #[test]
    fn out_of_range_queries_read_empty() {
        let (grid, _, _) = built_grid();
        for (x, z) in [(-1, 0), (0, -1), (i32::MIN, i32::MAX), (GRID_COLS, 5), (5, GRID_ROWS)] {
            assert_eq!(grid.get_cell(x, z), Cell::EMPTY);
        }
    }

    #[test]
    fn rim_is_boundary() {
        let (grid, _, _) = built_grid();
        assert_eq!(grid.get_cell(0, 0).kind, CellType::Boundary);
        assert_eq!(grid.get_cell(GRID_COLS - 1, GRID_ROWS - 1).kind, CellType::Boundary);
    }

    #[test]
    fn second_initialize_is_a_no_op() {
        let (mut grid, assignment, catalog) = built_grid();
        let before = grid.cells.clone();

        let mut other = assignment.clone();
        other.slots_mut().reverse();
        assert!(!grid.initialize_if_needed(&other, &catalog));
        assert_eq!(grid.cells, before);
    }

    #[test]
    fn reset_clears_and_allows_rebuild() {
        let (mut grid, assignment, catalog) = built_grid();
        grid.reset();
        assert!(!grid.is_initialized());
        assert_eq!(grid.count_of(CellType::Wall), 0);
        assert!(grid.initialize_if_needed(&assignment, &catalog));
        assert!(grid.count_of(CellType::Wall) > 0);
    }

    #[test]
    fn room_doors_open_onto_the_corridor() {
        let (grid, _, _) = built_grid();
        for room in 0..ROOM_COUNT {
            let door = room_local_to_world(room, Vec3::new(4.1, 0.0, 0.1));
            assert_eq!(
                grid.cell_at_world(door).kind,
                CellType::DoorClosed(DoorVariant::Room),
                "room {room}"
            );
        }
    }

    #[test]
    fn later_rectangles_win() {
        let (grid, _, _) = built_grid();
        // Door cells are drawn over the front wall
        let wall = room_local_to_world(0, Vec3::new(2.0, 0.0, 0.1));
        let door = room_local_to_world(0, Vec3::new(4.0, 0.0, 0.1));
        assert_eq!(grid.cell_at_world(wall).kind, CellType::Wall);
        assert_eq!(grid.cell_at_world(door).kind, CellType::DoorClosed(DoorVariant::Room));

        // Hiding spot overlays keep their tag
        let desk = room_local_to_world(3, Vec3::new(0.6, 0.0, 1.6));
        let cell = grid.cell_at_world(desk);
        assert_eq!(cell.kind, CellType::CrouchOnly);
        assert_eq!(cell.hiding_spot, Some(HidingSpot::Desk));
    }

    // Same rooms with every slot left empty, so no markers are drawn
    fn grid_without_markers(rooms: usize) -> SpatialGrid {
        let empty = RoomAssignment::from_slots(vec![RoomSlot::Empty; rooms]);
        let mut grid = SpatialGrid::default();
        grid.initialize_if_needed(&empty, &LevelCatalog::builtin());
        grid
    }

    #[test]
    fn markers_land_only_on_open_floor() {
        let (grid, assignment, catalog) = built_grid();
        let bare = grid_without_markers(assignment.len());
        for (room, encounter) in assignment.encounters(&catalog) {
            let rest = room_local_to_world(room, encounter.monster.rest_position);
            let expected = if bare.cell_at_world(rest) == Cell::EMPTY {
                CellType::MonsterSpawnMarker
            } else {
                bare.cell_at_world(rest).kind
            };
            assert_eq!(grid.cell_at_world(rest).kind, expected, "room {room} ({})", encounter.id);
        }
    }

    #[test]
    fn furniture_keeps_its_kind_under_rest_positions() {
        let catalog = LevelCatalog::builtin();
        // Every builtin encounter, including the ones resting on the bed and inside furniture
        let slots = (0..catalog.len().min(ROOM_COUNT)).map(RoomSlot::Encounter).collect();
        let assignment = RoomAssignment::from_slots(slots);
        let mut grid = SpatialGrid::default();
        grid.initialize_if_needed(&assignment, &catalog);

        let bare = grid_without_markers(assignment.len());
        for (built, plain) in grid.cells.iter().zip(&bare.cells) {
            if *plain != Cell::EMPTY {
                assert_eq!(built, plain);
            }
        }

        // The bed under the do-not-look rest position is still solid
        let bed = catalog.flatten().position(|e| e.id == "dont_look_bed");
        if let Some(room) = bed.filter(|room| *room < assignment.len()) {
            let rest = room_local_to_world(room, Vec3::new(3.8, 0.0, 3.0));
            assert_eq!(grid.cell_at_world(rest).kind, CellType::Bed);
        }
    }

    #[test]
    fn corridor_is_open_floor() {
        let (grid, _, _) = built_grid();
        let mut x = 0.05;
        while x < ROOM_PITCH * 6.0 {
            assert_eq!(grid.cell_at_world(Vec3::new(x, 0.0, 0.0)).kind, CellType::Empty, "x = {x}");
            x += 0.1;
        }
    }
}
