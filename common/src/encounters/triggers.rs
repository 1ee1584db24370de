use bevy_math::Vec3;

use crate::{
    collision::{horizontal_distance, point_in_box_xz, ray_hits_box, within_look_cone},
    levels::{Encounter, Zone},
    map::room_local_to_world,
    players::PlayerBody,
};

// A catalog zone placed in a specific room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldZone {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl WorldZone {
    #[must_use]
    pub fn in_room(zone: &Zone, room: usize) -> Self {
        Self {
            center: room_local_to_world(room, zone.position),
            half_extents: zone.scale.abs() / 2.0,
        }
    }

    #[must_use]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point_in_box_xz(point, self.center, self.half_extents)
    }
}

// Encounters flagged `requires_sound` only react to a walking, standing player
#[must_use]
pub const fn sound_gate_open(encounter: &Encounter, player: &PlayerBody) -> bool {
    !encounter.requires_sound || player.making_sound
}

// Close enough to the corner and facing it
#[must_use]
pub fn corner_triggered(player: &PlayerBody, zone: &WorldZone, max_distance: f32, max_angle_degrees: f32) -> bool {
    horizontal_distance(player.position, zone.center) <= max_distance
        && within_look_cone(player.eye_position(), player.look, zone.center, max_angle_degrees)
}

// The view ray from the eye hits the box, and the eye is within range of its center
#[must_use]
pub fn looking_at(player: &PlayerBody, zone: &WorldZone, max_distance: f32) -> bool {
    let eye = player.eye_position();
    eye.distance(zone.center) <= max_distance
        && ray_hits_box(eye, player.look, zone.center, zone.half_extents, max_distance).is_some()
}
