use tracing::{debug, info, warn};

use super::{EncounterDirector, EncounterFrame, Effects, MonsterState, Outcome};
use crate::{
    constants::{KNOCK_DURATION, MONSTER_DEPART_DELAY},
    levels::Encounter,
    map::{DoorVariant, Fixture},
    protocol::GameEvent,
    timers::{FiredTask, TaskKind},
};

const ROOM_DOOR: Fixture = Fixture::Door(DoorVariant::Room);

// ============================================================================
// Knock Sequence
// ============================================================================

impl EncounterDirector {
    // Chores done in a hiding room: the monster comes to the door
    pub(super) fn start_knock(&mut self, room: usize, encounter: &Encounter, frame: &EncounterFrame, fx: &mut Effects) {
        // One knock per visit; repeated completions while it runs change nothing
        if self.knock_room.is_some() || self.monster_state(room) != MonsterState::Idle {
            debug!("room {room} already has a knock in progress");
            return;
        }
        if frame.ctx.doors.is_open(ROOM_DOOR, Some(room)) {
            info!("room {room} door left open, the monster walks straight in");
            self.set_monster(room, MonsterState::Chase, fx);
            self.kill(room, encounter, fx);
            return;
        }

        info!("knocking on room {room}, hide in {:?}", encounter.kind.required_hiding_spot());
        self.knock_room = Some(room);
        self.set_monster(room, MonsterState::Knocking, fx);
        fx.scheduler.schedule(TaskKind::KnockTimeout { room }, KNOCK_DURATION, frame.epoch);
    }

    pub(super) fn check_hidden_during_knock(&mut self, room: usize, frame: &EncounterFrame, fx: &mut Effects) {
        if frame.hidden && self.knock_room == Some(room) && self.monster_state(room) == MonsterState::Knocking {
            debug!("player hid before the knock ran out in room {room}");
            self.monster_leaves(room, frame, fx);
        }
    }

    // Player walked out while the monster was still knocking
    pub(super) fn abandon_knock(&mut self, room: usize, fx: &mut Effects) {
        if self.knock_room != Some(room) {
            return;
        }
        self.knock_room = None;
        fx.scheduler.cancel_where(|kind| *kind == TaskKind::KnockTimeout { room });
        if self.monster_state(room) == MonsterState::Knocking {
            debug!("knock in room {room} abandoned");
            self.set_monster(room, MonsterState::Idle, fx);
        }
    }

    fn monster_leaves(&mut self, room: usize, frame: &EncounterFrame, fx: &mut Effects) {
        self.knock_room = None;
        fx.scheduler.cancel_where(|kind| *kind == TaskKind::KnockTimeout { room });
        self.set_monster(room, MonsterState::Leaving, fx);
        self.resolve(room, Outcome::Survived, fx);
        fx.scheduler.schedule(TaskKind::MonsterDepart { room }, MONSTER_DEPART_DELAY, frame.epoch);
    }

    pub(super) fn handle_task(&mut self, task: FiredTask, frame: &EncounterFrame, fx: &mut Effects) {
        if task.epoch != frame.epoch {
            warn!("discarding stale {:?} from epoch {}", task.kind, task.epoch.value());
            return;
        }

        match task.kind {
            TaskKind::KnockTimeout { room } => {
                if self.knock_room != Some(room) || self.monster_state(room) != MonsterState::Knocking {
                    debug!("knock timeout for room {room} no longer applies");
                    return;
                }
                let Some(encounter) = frame.ctx.encounter_in(room) else {
                    return;
                };

                self.knock_room = None;
                fx.events.push(GameEvent::DoorForced { room, fixture: ROOM_DOOR });
                self.set_monster(room, MonsterState::Entering, fx);

                if frame.hidden && self.current_room() == Some(room) {
                    info!("monster opened room {room} and found nobody");
                    self.monster_leaves(room, frame, fx);
                } else {
                    self.set_monster(room, MonsterState::Chase, fx);
                    self.kill(room, encounter, fx);
                }
            }
            TaskKind::MonsterDepart { room } => {
                if self.monster_state(room) == MonsterState::Leaving {
                    self.set_monster(room, MonsterState::Idle, fx);
                } else {
                    debug!("monster departure for room {room} no longer applies");
                }
            }
        }
    }
}
