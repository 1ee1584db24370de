use bevy_math::Vec3;

use crate::constants::*;

// ============================================================================
// World <-> Grid
// ============================================================================

// Convert a world position to grid coordinates
#[must_use]
pub fn grid_coords_from_position(pos: Vec3) -> (i32, i32) {
    let grid_x = ((pos.x + GRID_OFFSET_X) * GRID_SCALE).floor() as i32;
    let grid_z = ((pos.z + GRID_OFFSET_Z) * GRID_SCALE).floor() as i32;
    (grid_x, grid_z)
}

// Calculate the world position of a grid cell's center (on the floor)
#[must_use]
pub fn cell_center(grid_x: i32, grid_z: i32) -> Vec3 {
    Vec3::new(
        (grid_x as f32 + 0.5) / GRID_SCALE - GRID_OFFSET_X,
        0.0,
        (grid_z as f32 + 0.5) / GRID_SCALE - GRID_OFFSET_Z,
    )
}

// Rectangle edges are snapped to the nearest grid line so that 0.2 * 10 lands on 2, not 1.
#[must_use]
pub fn grid_line_x(x: f32) -> i32 {
    ((x + GRID_OFFSET_X) * GRID_SCALE).round() as i32
}

#[must_use]
pub fn grid_line_z(z: f32) -> i32 {
    ((z + GRID_OFFSET_Z) * GRID_SCALE).round() as i32
}

// ============================================================================
// Room Slots
// ============================================================================

// Which side of the corridor a room slot opens onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSide {
    North,
    South,
}

impl RoomSide {
    #[must_use]
    pub const fn of_slot(room: usize) -> Self {
        if room % 2 == 0 { Self::North } else { Self::South }
    }

    // South rooms are the north template mirrored on z
    #[must_use]
    pub const fn z_sign(self) -> f32 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }
}

// World position of a room's origin: corridor-side wall, left edge of its column
#[must_use]
pub fn room_origin(room: usize) -> Vec3 {
    let column = (room / 2) as f32;
    let side = RoomSide::of_slot(room);
    Vec3::new(column * ROOM_PITCH, 0.0, side.z_sign() * CORRIDOR_HALF_WIDTH)
}

// Transform a room-local point (x along the corridor, z away from it) into world space
#[must_use]
pub fn room_local_to_world(room: usize, local: Vec3) -> Vec3 {
    let origin = room_origin(room);
    let sign = RoomSide::of_slot(room).z_sign();
    Vec3::new(origin.x + local.x, local.y, sign.mul_add(local.z, origin.z))
}

// Room slot containing a world position, or None in the corridor, reception or outside.
// Only slots below `room_count` are reported.
#[must_use]
pub fn room_index_at(pos: Vec3, room_count: usize) -> Option<usize> {
    if pos.x < 0.0 {
        return None;
    }
    let column = (pos.x / ROOM_PITCH).floor() as usize;

    let depth = pos.z.abs() - CORRIDOR_HALF_WIDTH;
    if !(0.0..ROOM_DEPTH).contains(&depth) {
        return None;
    }

    let room = if pos.z > 0.0 { column * 2 } else { column * 2 + 1 };
    (room < room_count).then_some(room)
}
