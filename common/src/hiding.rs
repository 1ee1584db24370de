use crate::{
    doors::DoorStates,
    map::{HidingSpot, SpatialGrid},
};

// ============================================================================
// Hiding Resolver
// ============================================================================

// True when the player's cell carries the required spot and the fixture that
// conceals it is shut. The window curtain is wide, so for it any of the eight
// neighbouring cells counts as well.
#[must_use]
pub fn is_player_hidden(
    grid: &SpatialGrid,
    player_cell: (i32, i32),
    required: Option<HidingSpot>,
    room: Option<usize>,
    doors: &DoorStates,
) -> bool {
    let Some(spot) = required else {
        return false;
    };
    if doors.is_open(spot.governing_fixture(), room) {
        return false;
    }

    let (x, z) = player_cell;
    let on_spot = |dx: i32, dz: i32| grid.get_cell(x + dx, z + dz).hiding_spot == Some(spot);

    match spot {
        HidingSpot::RoomCurtain => (-1..=1).any(|dz| (-1..=1).any(|dx| on_spot(dx, dz))),
        HidingSpot::BathroomCurtain | HidingSpot::Desk | HidingSpot::Nightstand => on_spot(0, 0),
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::Vec3;

    use super::*;
    use crate::map::{CellType, CurtainVariant, DoorVariant, Fixture, Rect, grid_coords_from_position};

    fn grid_with(rect: Rect) -> SpatialGrid {
        let mut grid = SpatialGrid::default();
        grid.rasterize(&rect);
        grid
    }

    fn cell(x: f32, z: f32) -> (i32, i32) {
        grid_coords_from_position(Vec3::new(x, 0.0, z))
    }

    #[test]
    fn no_requirement_is_never_hidden() {
        let grid = grid_with(Rect::new(0.0, 0.0, 1.0, 1.0, CellType::CrouchOnly).with_spot(HidingSpot::Desk));
        let mut doors = DoorStates::new();
        doors.close(Fixture::Door(DoorVariant::Desk), Some(0));
        assert!(!is_player_hidden(&grid, cell(0.5, 0.5), None, Some(0), &doors));
    }

    #[test]
    fn desk_needs_exact_cell_and_closed_door() {
        let grid = grid_with(Rect::new(0.0, 0.0, 1.0, 1.0, CellType::CrouchOnly).with_spot(HidingSpot::Desk));
        let desk = Fixture::Door(DoorVariant::Desk);
        let mut doors = DoorStates::new();

        assert!(is_player_hidden(&grid, cell(0.5, 0.5), Some(HidingSpot::Desk), Some(0), &doors));
        // One cell outside the desk
        assert!(!is_player_hidden(&grid, cell(1.05, 0.5), Some(HidingSpot::Desk), Some(0), &doors));

        doors.open(desk, Some(0));
        assert!(!is_player_hidden(&grid, cell(0.5, 0.5), Some(HidingSpot::Desk), Some(0), &doors));
    }

    #[test]
    fn wrong_spot_does_not_count() {
        let grid = grid_with(Rect::new(0.0, 0.0, 1.0, 1.0, CellType::CrouchOnly).with_spot(HidingSpot::Nightstand));
        let doors = DoorStates::new();
        assert!(!is_player_hidden(&grid, cell(0.5, 0.5), Some(HidingSpot::Desk), Some(0), &doors));
        assert!(is_player_hidden(&grid, cell(0.5, 0.5), Some(HidingSpot::Nightstand), Some(0), &doors));
    }

    #[test]
    fn room_curtain_counts_neighbouring_cells() {
        let grid = grid_with(
            Rect::new(0.0, 0.0, 1.0, 0.1, CellType::CurtainClosed(CurtainVariant::Room)).with_spot(HidingSpot::RoomCurtain),
        );
        let curtain = Fixture::Curtain(CurtainVariant::Room);
        let mut doors = DoorStates::new();

        // Curtains start open
        assert!(!is_player_hidden(&grid, cell(0.5, -0.05), Some(HidingSpot::RoomCurtain), Some(0), &doors));

        doors.close(curtain, Some(0));
        assert!(is_player_hidden(&grid, cell(0.5, -0.05), Some(HidingSpot::RoomCurtain), Some(0), &doors));
        assert!(is_player_hidden(&grid, cell(0.5, 0.15), Some(HidingSpot::RoomCurtain), Some(0), &doors));
        assert!(!is_player_hidden(&grid, cell(0.5, -0.15), Some(HidingSpot::RoomCurtain), Some(0), &doors));
    }

    #[test]
    fn bathroom_curtain_has_no_neighbour_search() {
        let grid = grid_with(Rect::new(0.0, 0.0, 1.0, 0.1, CellType::Empty).with_spot(HidingSpot::BathroomCurtain));
        let mut doors = DoorStates::new();
        doors.close(Fixture::Curtain(CurtainVariant::Bathroom), Some(0));
        assert!(is_player_hidden(&grid, cell(0.5, 0.05), Some(HidingSpot::BathroomCurtain), Some(0), &doors));
        assert!(!is_player_hidden(&grid, cell(0.5, -0.05), Some(HidingSpot::BathroomCurtain), Some(0), &doors));
    }

    #[test]
    fn closing_in_another_room_does_not_help() {
        let grid = grid_with(Rect::new(0.0, 0.0, 1.0, 1.0, CellType::Empty).with_spot(HidingSpot::BathroomCurtain));
        let mut doors = DoorStates::new();
        doors.close(Fixture::Curtain(CurtainVariant::Bathroom), Some(4));
        assert!(!is_player_hidden(&grid, cell(0.5, 0.5), Some(HidingSpot::BathroomCurtain), Some(0), &doors));
    }
}
