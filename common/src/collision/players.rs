use bevy_math::{Vec2, Vec3};
use tracing::trace;

use crate::{
    constants::*,
    context::FrameContext,
    map::{CellType, DoorVariant, Fixture},
    players::PlayerBody,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerdict {
    Blocked,
    // Allowed; carries the door-transition flag the player has after the move
    Allowed { in_transition: bool },
}

impl MoveVerdict {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

// Doors let the player through exactly when they are open; furniture doors
// also need the player on hands and knees
#[must_use]
pub const fn door_passable(variant: DoorVariant, door_open: bool, crouching: bool) -> bool {
    door_open && (!variant.needs_crouch() || crouching)
}

// Decide a move into a cell of the given kind. `fixture_open` is the live state
// of the door or curtain in that cell, ignored for other kinds.
#[must_use]
pub fn move_verdict(kind: CellType, feet_y: f32, crouching: bool, fixture_open: bool, in_transition: bool) -> MoveVerdict {
    let allow = |in_transition| MoveVerdict::Allowed { in_transition };

    match kind {
        CellType::Wall | CellType::Boundary => MoveVerdict::Blocked,
        // Only open floor ends a crossing. Desk and nightstand interiors are CrouchOnly, so a player
        // who crawled in keeps the flag and may stand or leave through the shut door until back on Empty.
        _ if in_transition => allow(kind != CellType::Empty),
        CellType::DoorClosed(variant) | CellType::DoorOpen(variant) => {
            if door_passable(variant, fixture_open, crouching) {
                allow(true)
            } else {
                MoveVerdict::Blocked
            }
        }
        CellType::CurtainClosed(_) => {
            if feet_y < LOW_STEP_HEIGHT {
                MoveVerdict::Blocked
            } else {
                allow(true)
            }
        }
        CellType::RaisedAreaLow if feet_y < LOW_STEP_HEIGHT => MoveVerdict::Blocked,
        CellType::RaisedAreaHigh | CellType::Bed if feet_y < HIGH_STEP_HEIGHT => MoveVerdict::Blocked,
        CellType::CrouchOnly if !crouching => MoveVerdict::Blocked,
        _ => allow(false),
    }
}

// Live state of whatever fixture occupies a cell at `pos`
fn fixture_open_at(ctx: &FrameContext, kind: CellType, pos: Vec3) -> bool {
    let fixture = match kind {
        CellType::DoorClosed(variant) | CellType::DoorOpen(variant) => Fixture::Door(variant),
        CellType::CurtainClosed(variant) => Fixture::Curtain(variant),
        _ => return false,
    };
    ctx.doors.is_open(fixture, ctx.room_at(pos))
}

// Try to move the player along one axis. Returns true if the move was taken.
pub fn resolve_axis_move(ctx: &FrameContext, body: &mut PlayerBody, axis: Axis, displacement: f32) -> bool {
    if displacement.abs() <= PHYSICS_EPSILON {
        return false;
    }

    let mut candidate = body.position;
    match axis {
        Axis::X => candidate.x += displacement,
        Axis::Z => candidate.z += displacement,
    }

    let kind = ctx.cell_at(candidate).kind;
    let verdict = move_verdict(
        kind,
        body.position.y,
        body.crouching,
        fixture_open_at(ctx, kind, candidate),
        body.inside_door_transition,
    );

    match verdict {
        MoveVerdict::Blocked => {
            trace!("{axis:?} move into {kind:?} blocked at {candidate:?}");
            false
        }
        MoveVerdict::Allowed { in_transition } => {
            body.position = candidate;
            body.inside_door_transition = in_transition;
            true
        }
    }
}

// Jump, gravity, landing on the floor of the current cell and the ceiling clamp
pub fn integrate_vertical(ctx: &FrameContext, body: &mut PlayerBody, jump: bool, delta: f32) {
    let floor = ctx.cell_at(body.position).kind.floor_height();

    if jump && body.grounded && !body.crouching {
        body.vertical_velocity = JUMP_SPEED;
        body.grounded = false;
    }

    body.vertical_velocity -= GRAVITY * delta;
    body.position.y = body.vertical_velocity.mul_add(delta, body.position.y);

    if body.position.y <= floor {
        body.position.y = floor;
        body.vertical_velocity = 0.0;
        body.grounded = true;
    } else {
        body.grounded = false;
    }

    let ceiling = body.ceiling_limit();
    if body.position.y > ceiling {
        body.position.y = ceiling;
        body.vertical_velocity = body.vertical_velocity.min(0.0);
    }
}

// One frame of player movement: horizontal intent resolved per axis (sliding), then the vertical integrator
pub fn step_player(ctx: &FrameContext, body: &mut PlayerBody, velocity: Vec2, jump: bool, delta: f32) {
    let velocity = velocity.clamp_length_max(body.walk_speed());
    let moved_x = resolve_axis_move(ctx, body, Axis::X, velocity.x * delta);
    let moved_z = resolve_axis_move(ctx, body, Axis::Z, velocity.y * delta);
    integrate_vertical(ctx, body, jump, delta);
    body.making_sound = (moved_x || moved_z) && !body.crouching;
}
