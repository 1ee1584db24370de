use bevy_math::Vec3;

use crate::constants::*;

// ============================================================================
// Player Body
// ============================================================================

// Kinematic state of the first-person player; `position.y` is feet height above the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub crouching: bool,
    pub grounded: bool,
    pub look: Vec3,
    pub inside_door_transition: bool,
    // Moved horizontally this frame while standing
    pub making_sound: bool,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::at_spawn()
    }
}

impl PlayerBody {
    #[must_use]
    pub const fn at_spawn() -> Self {
        Self {
            position: Vec3::new(PLAYER_SPAWN_X, 0.0, PLAYER_SPAWN_Z),
            vertical_velocity: 0.0,
            crouching: false,
            grounded: true,
            // Facing down the corridor
            look: Vec3::X,
            inside_door_transition: false,
            making_sound: false,
        }
    }

    #[must_use]
    pub const fn height(&self) -> f32 {
        if self.crouching { PLAYER_CROUCH_HEIGHT } else { PLAYER_HEIGHT }
    }

    #[must_use]
    pub const fn eye_height(&self) -> f32 {
        if self.crouching { PLAYER_CROUCH_EYE_HEIGHT } else { PLAYER_EYE_HEIGHT }
    }

    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.eye_height()
    }

    // Highest feet height before the head touches the ceiling
    #[must_use]
    pub fn ceiling_limit(&self) -> f32 {
        CEILING_HEIGHT - self.height()
    }

    #[must_use]
    pub const fn walk_speed(&self) -> f32 {
        if self.crouching { SPEED_CROUCH } else { SPEED_WALK }
    }

    // Update the look direction, ignoring degenerate vectors
    pub fn look_towards(&mut self, look: Vec3) {
        if let Some(dir) = look.try_normalize() {
            self.look = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crouching_lowers_eye_and_raises_ceiling_limit() {
        let mut body = PlayerBody::at_spawn();
        let standing_eye = body.eye_position().y;
        let standing_limit = body.ceiling_limit();
        body.crouching = true;
        assert!(body.eye_position().y < standing_eye);
        assert!(body.ceiling_limit() > standing_limit);
        assert!((body.walk_speed() - SPEED_CROUCH).abs() < PHYSICS_EPSILON);
    }

    #[test]
    fn zero_look_keeps_previous_direction() {
        let mut body = PlayerBody::at_spawn();
        body.look_towards(Vec3::ZERO);
        assert_eq!(body.look, Vec3::X);
        body.look_towards(Vec3::new(0.0, 0.0, 3.0));
        assert!((body.look - Vec3::Z).length() < PHYSICS_EPSILON);
    }
}
