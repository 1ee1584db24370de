mod director;
mod knock;
mod triggers;

use std::time::Duration;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::{context::FrameContext, players::PlayerBody, protocol::GameEvent, timers::{Epoch, Scheduler}};

pub use director::EncounterDirector;
pub use triggers::{WorldZone, corner_triggered, looking_at, sound_gate_open};

// ============================================================================
// Encounter State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum MonsterState {
    #[default]
    Idle,
    Knocking,
    Entering,
    Run,
    Leaving,
    Chase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Outcome {
    Death,
    Survived,
}

// Where a room's encounter is in its lifecycle; Resolved is final for the playthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncounterPhase {
    #[default]
    Idle,
    Armed,
    Resolved(Outcome),
}

impl EncounterPhase {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

// The death flag and its reason are cleared on restart, the counter is not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeathState {
    pub dead: bool,
    pub reason: Option<String>,
    pub room: Option<usize>,
    pub count: u32,
}

impl DeathState {
    pub fn revive(&mut self) {
        self.dead = false;
        self.reason = None;
        self.room = None;
    }
}

// ============================================================================
// Frame Inputs & Outputs
// ============================================================================

// What the encounter pass reads this frame
#[derive(Debug, Clone, Copy)]
pub struct EncounterFrame<'a> {
    pub ctx: FrameContext<'a>,
    pub player: &'a PlayerBody,
    pub hidden: bool,
    pub delta: Duration,
    pub epoch: Epoch,
}

// What the encounter pass writes this frame
#[derive(Debug)]
pub struct Effects<'s> {
    pub scheduler: &'s mut Scheduler,
    pub death: &'s mut DeathState,
    pub events: &'s mut Vec<GameEvent>,
}
