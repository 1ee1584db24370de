use super::cells::{CellType, CurtainVariant, DoorVariant, HidingSpot};
use super::helpers::{RoomSide, room_origin};
use crate::constants::*;

// ============================================================================
// Rectangles
// ============================================================================

// Axis-aligned rectangle in the xz plane, rasterized over every cell it covers.
// `x1..x2` and `z1..z2` may be given in either order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f32,
    pub z1: f32,
    pub x2: f32,
    pub z2: f32,
    pub kind: CellType,
    pub hiding_spot: Option<HidingSpot>,
}

impl Rect {
    #[must_use]
    pub const fn new(x1: f32, z1: f32, x2: f32, z2: f32, kind: CellType) -> Self {
        Self {
            x1,
            z1,
            x2,
            z2,
            kind,
            hiding_spot: None,
        }
    }

    #[must_use]
    pub const fn with_spot(mut self, spot: HidingSpot) -> Self {
        self.hiding_spot = Some(spot);
        self
    }

    #[must_use]
    pub fn bounds_xz(&self) -> (f32, f32, f32, f32) {
        (self.x1.min(self.x2), self.x1.max(self.x2), self.z1.min(self.z2), self.z1.max(self.z2))
    }

    // Move a room-local rectangle into the world frame of the given room slot
    #[must_use]
    pub fn placed_in_room(&self, room: usize) -> Self {
        let origin = room_origin(room);
        let sign = RoomSide::of_slot(room).z_sign();
        Self {
            x1: origin.x + self.x1,
            z1: sign.mul_add(self.z1, origin.z),
            x2: origin.x + self.x2,
            z2: sign.mul_add(self.z2, origin.z),
            ..*self
        }
    }
}

const W: f32 = WALL_THICKNESS;

// ============================================================================
// Hotel Shell (world coordinates)
// ============================================================================

// Reception area, the doors around it and the far end of the corridor
#[must_use]
pub fn shell_rects() -> Vec<Rect> {
    let min_x = RECEPTION_MIN_X;
    let half = RECEPTION_HALF_DEPTH;
    let corridor_end = ROOM_PITCH * (ROOM_COUNT / 2) as f32;

    vec![
        // Reception walls
        Rect::new(min_x, half - W, 0.0, half, CellType::Wall),
        Rect::new(min_x, -half, 0.0, -half + W, CellType::Wall),
        Rect::new(min_x, -half, min_x + W, half, CellType::Wall),
        Rect::new(-W, -half, 0.0, half, CellType::Wall),
        // Tutorial closet in the north-west corner
        Rect::new(min_x, 2.0, -5.0, 2.0 + W, CellType::Wall),
        Rect::new(-5.0 - W, 2.0, -5.0, half, CellType::Wall),
        Rect::new(-7.0, 2.0, -6.0, 2.0 + W, CellType::DoorClosed(DoorVariant::Tutorial)),
        // Reception counter, luggage step and the shelf players crawl under
        Rect::new(-6.0, -3.0, -4.5, -1.5, CellType::RaisedAreaHigh),
        Rect::new(-2.0, 2.8, -1.0, half - W, CellType::RaisedAreaLow),
        Rect::new(-2.0, -half + W, -1.0, -2.8, CellType::CrouchOnly),
        // Exit to the street and door into the corridor
        Rect::new(min_x, -0.6, min_x + W, 0.6, CellType::DoorClosed(DoorVariant::Exit)),
        Rect::new(-W, -0.6, 0.0, 0.6, CellType::DoorClosed(DoorVariant::Corridor)),
        // Corridor sides (room fronts are drawn over these) and its far end
        Rect::new(0.0, CORRIDOR_HALF_WIDTH, corridor_end, CORRIDOR_HALF_WIDTH + W, CellType::Wall),
        Rect::new(0.0, -CORRIDOR_HALF_WIDTH - W, corridor_end, -CORRIDOR_HALF_WIDTH, CellType::Wall),
        Rect::new(corridor_end, -CORRIDOR_HALF_WIDTH, corridor_end + W, CORRIDOR_HALF_WIDTH, CellType::Wall),
    ]
}

// ============================================================================
// Room Template (room-local coordinates)
// ============================================================================

// x runs along the corridor (0..ROOM_PITCH), z runs away from it (0..ROOM_DEPTH).
// Order matters: furniture and hiding spots are drawn over the walls and floor.
#[must_use]
pub fn room_template_rects() -> Vec<Rect> {
    let width = ROOM_PITCH;
    let depth = ROOM_DEPTH;

    vec![
        // Shell
        Rect::new(0.0, 0.0, width, W, CellType::Wall),
        Rect::new(0.0, depth - W, width, depth, CellType::Wall),
        Rect::new(0.0, 0.0, W, depth, CellType::Wall),
        Rect::new(width - W, 0.0, width, depth, CellType::Wall),
        // Entrance from the corridor and its threshold
        Rect::new(3.6, 0.0, 4.6, W, CellType::DoorClosed(DoorVariant::Room)),
        Rect::new(3.6, W, 4.6, 2.0 * W, CellType::DoorOpen(DoorVariant::Room)),
        // Desk against the west wall, entered on hands and knees
        Rect::new(W, 1.0, 1.0, 1.0 + W, CellType::Wall),
        Rect::new(W, 2.2 - W, 1.0, 2.2, CellType::Wall),
        Rect::new(W, 1.0 + W, 1.0, 2.2 - W, CellType::CrouchOnly).with_spot(HidingSpot::Desk),
        Rect::new(1.0, 1.0, 1.0 + W / 2.0, 2.2, CellType::DoorClosed(DoorVariant::Desk)),
        // Bathroom walls and door
        Rect::new(W, 3.6, 2.2, 3.6 + W, CellType::Wall),
        Rect::new(2.2 - W, 3.6, 2.2, depth - W, CellType::Wall),
        Rect::new(0.8, 3.6, 1.6, 3.6 + W, CellType::DoorClosed(DoorVariant::Bathroom)),
        // Bathtub: curtain rail on the rim, the tub behind it
        Rect::new(W, 4.8, 2.2 - W, 5.0, CellType::CurtainClosed(CurtainVariant::Bathroom)),
        Rect::new(W, 5.0, 2.2 - W, depth - W, CellType::Empty).with_spot(HidingSpot::BathroomCurtain),
        // Bed
        Rect::new(3.0, 2.0, 4.6, 4.0, CellType::Bed),
        // Nightstand cabinet beside the bed, door on its west face
        Rect::new(4.0, 4.1, width - W, 4.2, CellType::Wall),
        Rect::new(4.0, 4.8, width - W, 4.9, CellType::Wall),
        Rect::new(4.2, 4.2, width - W, 4.8, CellType::CrouchOnly).with_spot(HidingSpot::Nightstand),
        Rect::new(4.0, 4.2, 4.2, 4.8, CellType::DoorClosed(DoorVariant::Nightstand)),
        // Window curtain along the back wall; the curtain line is tagged too so
        // standing right in front of it counts as behind it
        Rect::new(2.8, 5.4, 4.4, 5.5, CellType::CurtainClosed(CurtainVariant::Room))
            .with_spot(HidingSpot::RoomCurtain),
        Rect::new(2.8, 5.5, 4.4, depth - W, CellType::Empty).with_spot(HidingSpot::RoomCurtain),
    ]
}
