use std::collections::HashMap;

use bevy_time::{Timer, TimerMode};
use tracing::{debug, info};

use super::{
    EncounterFrame, EncounterPhase, Effects, MonsterState, Outcome,
    triggers::{WorldZone, corner_triggered, looking_at, sound_gate_open},
};
use crate::{levels::{Encounter, EncounterKind}, protocol::GameEvent};

// Timers that only exist while a room's encounter is armed
#[derive(Debug, Clone, Default)]
struct ArmedState {
    close_timer: Option<Timer>,
    run_timer: Option<Timer>,
}

#[derive(Debug, Clone, Default)]
struct RoomRecord {
    phase: EncounterPhase,
    armed: ArmedState,
}

enum Verdict {
    Nothing,
    Kill,
    Survive,
    MonsterRuns,
}

// ============================================================================
// Encounter Director
// ============================================================================

// Tracks the room the player is in, every room's encounter phase, the monster
// and the knock sequence. Driven once per frame after movement and hiding.
#[derive(Debug, Clone, Default)]
pub struct EncounterDirector {
    rooms: HashMap<usize, RoomRecord>,
    pub(super) monsters: HashMap<usize, MonsterState>,
    pub(super) knock_room: Option<usize>,
    current_room: Option<usize>,
    objectives_pending: bool,
}

impl EncounterDirector {
    #[must_use]
    pub fn phase(&self, room: usize) -> EncounterPhase {
        self.rooms.get(&room).map_or(EncounterPhase::Idle, |record| record.phase)
    }

    #[must_use]
    pub fn monster_state(&self, room: usize) -> MonsterState {
        self.monsters.get(&room).copied().unwrap_or_default()
    }

    #[must_use]
    pub const fn current_room(&self) -> Option<usize> {
        self.current_room
    }

    #[must_use]
    pub const fn knock_room(&self) -> Option<usize> {
        self.knock_room
    }

    #[must_use]
    pub const fn objectives_pending(&self) -> bool {
        self.objectives_pending
    }

    // Picked up by the next encounter pass
    pub fn queue_objectives(&mut self) {
        self.objectives_pending = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // One encounter pass: room transitions, due tasks, objectives, then the room's rule
    pub fn update(&mut self, frame: &EncounterFrame, fx: &mut Effects) {
        if fx.death.dead {
            return;
        }

        self.track_room(frame, fx);

        for task in fx.scheduler.tick(frame.delta) {
            self.handle_task(task, frame, fx);
        }

        if std::mem::take(&mut self.objectives_pending) {
            self.complete_objectives(frame, fx);
        }

        if !fx.death.dead {
            self.evaluate(frame, fx);
        }
    }

    // ------------------------------------------------------------------------
    // Room transitions
    // ------------------------------------------------------------------------

    fn track_room(&mut self, frame: &EncounterFrame, fx: &mut Effects) {
        let room = frame.ctx.room_at(frame.player.position);
        if room == self.current_room {
            return;
        }

        if let Some(old) = self.current_room {
            self.leave_room(old, frame, fx);
        }
        self.current_room = room;
        if let Some(new) = room {
            self.enter_room(new, frame);
        }
    }

    fn enter_room(&mut self, room: usize, frame: &EncounterFrame) {
        let Some(encounter) = frame.ctx.encounter_in(room) else {
            debug!("entered room {room} (no encounter)");
            return;
        };
        let record = self.rooms.entry(room).or_default();
        if record.phase == EncounterPhase::Idle {
            record.phase = EncounterPhase::Armed;
            record.armed = ArmedState::default();
            debug!("entered room {room}, armed '{}'", encounter.id);
        }
    }

    fn leave_room(&mut self, room: usize, frame: &EncounterFrame, fx: &mut Effects) {
        let Some(encounter) = frame.ctx.encounter_in(room) else {
            return;
        };
        if self.phase(room) != EncounterPhase::Armed {
            return;
        }

        if encounter.kind.is_objective_gated() {
            debug!("left room {room} before '{}' resolved", encounter.id);
            if let Some(record) = self.rooms.get_mut(&room) {
                record.phase = EncounterPhase::Idle;
                record.armed = ArmedState::default();
            }
            self.abandon_knock(room, fx);
        } else {
            self.resolve(room, Outcome::Survived, fx);
        }
    }

    // ------------------------------------------------------------------------
    // Objectives
    // ------------------------------------------------------------------------

    fn complete_objectives(&mut self, frame: &EncounterFrame, fx: &mut Effects) {
        let Some(room) = self.current_room else {
            debug!("objectives completed outside any room");
            return;
        };
        let Some(encounter) = frame.ctx.encounter_in(room) else {
            debug!("objectives completed in empty room {room}");
            return;
        };
        if self.phase(room) != EncounterPhase::Armed {
            return;
        }

        if encounter.kind.is_objective_gated() {
            self.start_knock(room, encounter, frame, fx);
        } else {
            self.resolve(room, Outcome::Survived, fx);
        }
    }

    // ------------------------------------------------------------------------
    // Per-frame rule evaluation
    // ------------------------------------------------------------------------

    fn evaluate(&mut self, frame: &EncounterFrame, fx: &mut Effects) {
        let Some(room) = self.current_room else {
            return;
        };
        let Some(encounter) = frame.ctx.encounter_in(room) else {
            return;
        };
        if self.phase(room) != EncounterPhase::Armed {
            return;
        }

        if encounter.kind.is_objective_gated() {
            self.check_hidden_during_knock(room, frame, fx);
            return;
        }

        let verdict = self.rule_verdict(room, encounter, frame);
        match verdict {
            Verdict::Nothing => {}
            Verdict::Kill => self.kill(room, encounter, fx),
            Verdict::Survive => self.resolve(room, Outcome::Survived, fx),
            Verdict::MonsterRuns => self.set_monster(room, MonsterState::Run, fx),
        }
    }

    fn rule_verdict(&mut self, room: usize, encounter: &Encounter, frame: &EncounterFrame) -> Verdict {
        let player = frame.player;
        let sound = sound_gate_open(encounter, player);
        let Some(record) = self.rooms.get_mut(&room) else {
            return Verdict::Nothing;
        };
        let armed = &mut record.armed;

        match &encounter.kind {
            EncounterKind::HidingSpot { .. } => Verdict::Nothing,
            EncounterKind::Corner {
                danger_zone,
                max_distance,
                max_angle_degrees,
            } => {
                let zone = WorldZone::in_room(danger_zone, room);
                if sound && corner_triggered(player, &zone, *max_distance, *max_angle_degrees) {
                    Verdict::Kill
                } else {
                    Verdict::Nothing
                }
            }
            EncounterKind::DoNotOpen { fixture } => {
                if sound && frame.ctx.doors.is_open(*fixture, Some(room)) {
                    Verdict::Kill
                } else {
                    Verdict::Nothing
                }
            }
            EncounterKind::CloseQuickly { fixture, window_secs } => {
                let open = frame.ctx.doors.is_open(*fixture, Some(room));
                match (open, armed.close_timer.as_mut()) {
                    (true, None) => {
                        debug!("{fixture:?} opened in room {room}, {window_secs}s to close it");
                        armed.close_timer = Some(Timer::from_seconds(*window_secs, TimerMode::Once));
                        Verdict::Nothing
                    }
                    (true, Some(timer)) => {
                        if timer.tick(frame.delta).is_finished() {
                            Verdict::Kill
                        } else {
                            Verdict::Nothing
                        }
                    }
                    (false, Some(_)) => Verdict::Survive,
                    (false, None) => Verdict::Nothing,
                }
            }
            EncounterKind::DoNotLook {
                trigger_zone,
                instant_zone,
                max_distance,
            } => {
                let in_instant = instant_zone
                    .as_ref()
                    .is_some_and(|zone| WorldZone::in_room(zone, room).contains_xz(player.position));
                let looked = sound && looking_at(player, &WorldZone::in_room(trigger_zone, room), *max_distance);
                if in_instant || looked { Verdict::Kill } else { Verdict::Nothing }
            }
            EncounterKind::Running {
                trigger_zone,
                window_secs,
            } => match armed.run_timer.as_mut() {
                None => {
                    if sound && WorldZone::in_room(trigger_zone, room).contains_xz(player.position) {
                        armed.run_timer = Some(Timer::from_seconds(*window_secs, TimerMode::Once));
                        Verdict::MonsterRuns
                    } else {
                        Verdict::Nothing
                    }
                }
                Some(timer) => {
                    if timer.tick(frame.delta).is_finished() {
                        Verdict::Kill
                    } else {
                        Verdict::Nothing
                    }
                }
            },
        }
    }

    // ------------------------------------------------------------------------
    // Outcomes
    // ------------------------------------------------------------------------

    pub(super) fn resolve(&mut self, room: usize, outcome: Outcome, fx: &mut Effects) {
        let record = self.rooms.entry(room).or_default();
        record.phase = EncounterPhase::Resolved(outcome);
        record.armed = ArmedState::default();
        info!("encounter in room {room} resolved: {outcome:?}");
        fx.events.push(GameEvent::EncounterResolved { room, outcome });
    }

    pub(super) fn kill(&mut self, room: usize, encounter: &Encounter, fx: &mut Effects) {
        if fx.death.dead {
            return;
        }
        fx.death.dead = true;
        fx.death.reason = Some(encounter.death_reason.clone());
        fx.death.room = Some(room);
        fx.death.count += 1;
        info!(
            "player died in room {room} to '{}' (death #{}): {}",
            encounter.id, fx.death.count, encounter.death_reason
        );
        fx.events.push(GameEvent::Died {
            room,
            reason: encounter.death_reason.clone(),
        });
        self.resolve(room, Outcome::Death, fx);
    }

    pub(super) fn set_monster(&mut self, room: usize, state: MonsterState, fx: &mut Effects) {
        let previous = self.monsters.insert(room, state).unwrap_or_default();
        if previous != state {
            debug!("monster in room {room}: {previous:?} -> {state:?}");
            fx.events.push(GameEvent::MonsterStateChanged { room, state });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy_math::Vec3;

    use super::*;
    use crate::{
        constants::ROOM_COUNT,
        context::FrameContext,
        doors::DoorStates,
        encounters::DeathState,
        levels::{LevelCatalog, RoomAssignment, RoomSlot},
        map::{DoorVariant, Fixture, SpatialGrid, room_local_to_world},
        players::PlayerBody,
        timers::{Epoch, Scheduler},
    };

    // Room 0 holds the catalog entry with the given id, every other room is empty
    struct Harness {
        grid: SpatialGrid,
        doors: DoorStates,
        catalog: LevelCatalog,
        assignment: RoomAssignment,
        director: EncounterDirector,
        scheduler: Scheduler,
        death: DeathState,
        player: PlayerBody,
        events: Vec<GameEvent>,
    }

    impl Harness {
        fn with_encounter(id: &str) -> Self {
            let catalog = LevelCatalog::builtin();
            let index = catalog.flatten().position(|e| e.id == id).expect("encounter exists");
            let mut slots = vec![RoomSlot::Empty; ROOM_COUNT];
            slots[0] = RoomSlot::Encounter(index);
            Self {
                grid: SpatialGrid::default(),
                doors: DoorStates::new(),
                catalog,
                assignment: RoomAssignment::from_slots(slots),
                director: EncounterDirector::default(),
                scheduler: Scheduler::default(),
                death: DeathState::default(),
                player: PlayerBody::at_spawn(),
                events: Vec::new(),
            }
        }

        fn place(&mut self, local: Vec3, look: Vec3) {
            self.player.position = room_local_to_world(0, local);
            self.player.look = look;
        }

        fn step(&mut self, secs: f32) {
            let frame = EncounterFrame {
                ctx: FrameContext {
                    grid: &self.grid,
                    doors: &self.doors,
                    catalog: &self.catalog,
                    assignment: &self.assignment,
                },
                player: &self.player,
                hidden: false,
                delta: Duration::from_secs_f32(secs),
                epoch: Epoch::default(),
            };
            let mut fx = Effects {
                scheduler: &mut self.scheduler,
                death: &mut self.death,
                events: &mut self.events,
            };
            self.director.update(&frame, &mut fx);
        }

        fn died(&self) -> bool {
            self.events.iter().any(|e| matches!(e, GameEvent::Died { .. }))
        }
    }

    #[test]
    fn entering_arms_and_leaving_survives() {
        let mut h = Harness::with_encounter("dont_open_bathroom");
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        assert_eq!(h.director.phase(0), EncounterPhase::Armed);
        assert_eq!(h.director.current_room(), Some(0));

        h.player.position = Vec3::new(2.5, 0.0, 0.0);
        h.step(0.1);
        assert_eq!(h.director.phase(0), EncounterPhase::Resolved(Outcome::Survived));

        // Retired: opening the door on a return visit is harmless
        h.doors.open(Fixture::Door(DoorVariant::Bathroom), Some(0));
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        assert!(!h.died());
    }

    #[test]
    fn do_not_open_kills_with_reason() {
        let mut h = Harness::with_encounter("dont_open_bathroom");
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        h.doors.open(Fixture::Door(DoorVariant::Bathroom), Some(0));
        h.step(0.1);

        assert!(h.death.dead);
        assert_eq!(h.death.count, 1);
        let reason = h.catalog.flatten().find(|e| e.id == "dont_open_bathroom").map(|e| e.death_reason.clone());
        assert_eq!(h.death.reason, reason);
        assert!(matches!(
            h.events.as_slice(),
            [GameEvent::Died { room: 0, .. }, GameEvent::EncounterResolved { room: 0, outcome: Outcome::Death }]
        ));
    }

    #[test]
    fn close_quickly_survives_when_closed_in_time() {
        let mut h = Harness::with_encounter("close_bathroom_quickly");
        let door = Fixture::Door(DoorVariant::Bathroom);
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        h.doors.open(door, Some(0));
        h.step(0.1);
        h.step(1.0);
        h.doors.close(door, Some(0));
        h.step(0.1);
        assert!(!h.died());
        assert_eq!(h.director.phase(0), EncounterPhase::Resolved(Outcome::Survived));
    }

    #[test]
    fn close_quickly_kills_when_left_open() {
        let mut h = Harness::with_encounter("close_bathroom_quickly");
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        h.doors.open(Fixture::Door(DoorVariant::Bathroom), Some(0));
        for _ in 0..20 {
            h.step(0.1);
        }
        assert!(h.died());
    }

    #[test]
    fn corner_kills_only_when_facing_it() {
        let mut h = Harness::with_encounter("corner_bathroom_shadow");
        // Danger zone sits at local (0.6, 1.0, 3.2)
        h.place(Vec3::new(2.0, 0.0, 3.2), Vec3::Z);
        h.step(0.1);
        assert!(!h.died());
        h.player.look = -Vec3::X;
        h.step(0.1);
        assert!(h.died());
    }

    #[test]
    fn sound_gated_corner_ignores_a_silent_player() {
        let mut h = Harness::with_encounter("corner_window");
        // Danger zone at local (4.5, 1.0, 5.3); facing +z from local (4.5, 3.5)
        h.place(Vec3::new(4.5, 0.0, 3.5), Vec3::Z);
        h.step(0.1);
        assert!(!h.died());
        h.player.making_sound = true;
        h.step(0.1);
        assert!(h.died());
    }

    #[test]
    fn running_kills_if_still_in_room_when_window_closes() {
        let mut h = Harness::with_encounter("running_past_bed");
        // Trigger zone at local (2.6, 4.5)
        h.place(Vec3::new(2.6, 0.0, 4.5), Vec3::Z);
        h.step(0.1);
        assert_eq!(h.director.monster_state(0), MonsterState::Run);
        for _ in 0..40 {
            h.step(0.1);
        }
        assert!(h.died());
    }

    #[test]
    fn running_survives_if_out_before_window_closes() {
        let mut h = Harness::with_encounter("running_past_bed");
        h.place(Vec3::new(2.6, 0.0, 4.5), Vec3::Z);
        h.step(0.1);
        h.step(1.0);
        h.player.position = Vec3::new(2.6, 0.0, 0.0);
        h.step(0.1);
        for _ in 0..40 {
            h.step(0.1);
        }
        assert!(!h.died());
        assert_eq!(h.director.phase(0), EncounterPhase::Resolved(Outcome::Survived));
    }

    #[test]
    fn do_not_look_instant_zone_always_kills() {
        let mut h = Harness::with_encounter("dont_look_window");
        // Instant zone at local (3.6, 5.1), facing away from the window
        h.place(Vec3::new(3.6, 0.0, 5.1), -Vec3::Z);
        h.step(0.1);
        assert!(h.died());
    }

    #[test]
    fn objectives_resolve_non_knock_rooms() {
        let mut h = Harness::with_encounter("dont_open_nightstand");
        h.place(Vec3::new(2.5, 0.0, 2.5), Vec3::Z);
        h.step(0.1);
        h.director.queue_objectives();
        h.step(0.1);
        assert_eq!(h.director.phase(0), EncounterPhase::Resolved(Outcome::Survived));
        assert!(!h.director.objectives_pending());
    }

    #[test]
    fn empty_rooms_never_kill() {
        let mut h = Harness::with_encounter("dont_open_bathroom");
        h.player.position = room_local_to_world(2, Vec3::new(2.5, 0.0, 2.5));
        h.doors.open(Fixture::Door(DoorVariant::Bathroom), Some(2));
        h.director.queue_objectives();
        for _ in 0..10 {
            h.step(0.1);
        }
        assert!(!h.died());
        assert_eq!(h.director.phase(2), EncounterPhase::Idle);
    }
}
