#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use bevy_ecs::{message::Message, prelude::Resource};
use bevy_math::{Vec2, Vec3};

use crate::{
    encounters::{MonsterState, Outcome},
    map::Fixture,
};

// Macro to reduce boilerplate for structs
macro_rules! message {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Message)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        pub struct $name $body
    };
}

// ============================================================================
// Core Events
// ============================================================================

// Everything a session tick reports back to the presentation layer, in the order it happened
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum GameEvent {
    Died { room: usize, reason: String },
    EncounterResolved { room: usize, outcome: Outcome },
    MonsterStateChanged { room: usize, state: MonsterState },
    // The monster opened a door the player had shut
    DoorForced { room: usize, fixture: Fixture },
}

// ============================================================================
// Input
// ============================================================================

// Semantic per-frame input, already normalised by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct PlayerIntent {
    // Desired horizontal velocity (x, z) in meters per second
    pub velocity: Vec2,
    pub look: Vec3,
    pub crouch: bool,
    pub jump: bool,
}

impl Default for PlayerIntent {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            look: Vec3::X,
            crouch: false,
            jump: false,
        }
    }
}

// ============================================================================
// Inbound Messages
// ============================================================================

message! {
// Presentation -> core: the player opened or closed a door or curtain.
struct SetFixture {
    pub fixture: Fixture,
    pub room: Option<usize>,
    pub open: bool,
}
}

message! {
// Presentation -> core: every chore in the current room is done.
struct ObjectivesCompleted {}
}

message! {
// Presentation -> core: start a new playthrough.
struct RestartRequested {}
}

// ============================================================================
// Outbound Messages
// ============================================================================

message! {
// Core -> presentation: the player was caught.
struct PlayerDied {
    pub room: usize,
    pub reason: String,
    pub death_count: u32,
}
}

message! {
// Core -> presentation: a room's encounter is over for this playthrough.
struct EncounterResolved {
    pub room: usize,
    pub outcome: Outcome,
}
}

message! {
// Core -> presentation: drive the monster's animation.
struct MonsterStateChanged {
    pub room: usize,
    pub state: MonsterState,
}
}

message! {
// Core -> presentation: a door swung open without the player touching it.
struct FixtureForced {
    pub room: usize,
    pub fixture: Fixture,
}
}
