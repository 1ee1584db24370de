use std::collections::VecDeque;

use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use hotel_common::{
    HotelSession,
    constants::{KNOCK_DURATION, MONSTER_DEPART_DELAY, PLAYER_EYE_HEIGHT, SPEED_CROUCH, SPEED_WALK},
    levels::EncounterKind,
    map::{DoorVariant, Fixture, HidingSpot, room_local_to_world},
    protocol::{ObjectivesCompleted, PlayerIntent, RestartRequested, SetFixture},
    timers::Epoch,
};

// Within this horizontal distance a walk leg counts as done
const ARRIVAL_TOLERANCE: f32 = 0.01;
// Frames without any progress before a walk leg is abandoned
const STALL_FRAMES: u32 = 90;
// Where the chores of every room are done (room-local x, z)
const CHORE_SPOT: (f32, f32) = (4.1, 1.2);
// In front of the corridor door, on the reception side
const RECEPTION_DOOR_APPROACH: Vec3 = Vec3::new(-1.0, 0.0, 0.0);

// ============================================================================
// Plan
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Walk { target: Vec3, crouch: bool, jump: bool },
    Fixture { fixture: Fixture, room: Option<usize>, open: bool },
    CompleteObjectives,
    Wait { secs: f32 },
    // Face a world point from the current eye position
    Look { target: Vec3 },
    RoomDone { room: usize },
}

const fn walk(target: Vec3) -> Step {
    Step::Walk {
        target,
        crouch: false,
        jump: false,
    }
}

const fn crawl(target: Vec3) -> Step {
    Step::Walk {
        target,
        crouch: true,
        jump: false,
    }
}

const fn leap(target: Vec3) -> Step {
    Step::Walk {
        target,
        crouch: false,
        jump: true,
    }
}

const fn set(fixture: Fixture, room: usize, open: bool) -> Step {
    Step::Fixture {
        fixture,
        room: Some(room),
        open,
    }
}

// From the front desk to the corridor, opening the door between them
#[must_use]
pub fn plan_entry() -> Vec<Step> {
    vec![
        walk(RECEPTION_DOOR_APPROACH),
        Step::Fixture {
            fixture: Fixture::Door(DoorVariant::Corridor),
            room: None,
            open: true,
        },
    ]
}

// Walk in from the corridor, do the chores, deal with the room's rule and walk back out.
// A careless visit ignores the rule.
#[must_use]
pub fn plan_room(room: usize, kind: Option<&EncounterKind>, careless: bool) -> Vec<Step> {
    let door = Fixture::Door(DoorVariant::Room);
    let doorway = room_local_to_world(room, Vec3::new(CHORE_SPOT.0, 0.0, 0.0));
    let corridor = Vec3::new(doorway.x, 0.0, 0.0);
    let chore_spot = room_local_to_world(room, Vec3::new(CHORE_SPOT.0, 0.0, CHORE_SPOT.1));

    let mut steps = vec![
        walk(corridor),
        set(door, room, true),
        walk(chore_spot),
        set(door, room, false),
        Step::Look {
            target: corridor + Vec3::Y * PLAYER_EYE_HEIGHT,
        },
    ];
    steps.extend(room_chores(room, kind, careless));
    steps.extend([
        set(door, room, true),
        walk(corridor),
        set(door, room, false),
        Step::RoomDone { room },
    ]);
    steps
}

fn room_chores(room: usize, kind: Option<&EncounterKind>, careless: bool) -> Vec<Step> {
    let Some(kind) = kind else {
        return vec![Step::CompleteObjectives, Step::Wait { secs: 0.5 }];
    };

    match kind {
        EncounterKind::HidingSpot { hiding_spot } => {
            let mut steps = vec![Step::CompleteObjectives];
            if careless {
                steps.push(Step::Wait {
                    secs: KNOCK_DURATION + 1.0,
                });
            } else {
                let (hide, leave) = hiding_route(room, *hiding_spot);
                steps.extend(hide);
                steps.push(Step::Wait {
                    secs: KNOCK_DURATION + MONSTER_DEPART_DELAY,
                });
                steps.extend(leave);
            }
            steps
        }
        EncounterKind::DoNotOpen { fixture } => {
            let mut steps = Vec::new();
            if careless {
                steps.extend([set(*fixture, room, true), Step::Wait { secs: 0.5 }]);
            }
            steps.push(Step::CompleteObjectives);
            steps
        }
        EncounterKind::CloseQuickly { fixture, window_secs } => {
            let held = if careless { window_secs + 0.5 } else { window_secs * 0.4 };
            vec![
                set(*fixture, room, true),
                Step::Wait { secs: held },
                set(*fixture, room, false),
                Step::CompleteObjectives,
            ]
        }
        EncounterKind::DoNotLook { trigger_zone, .. } if careless => vec![
            Step::Look {
                target: room_local_to_world(room, trigger_zone.position),
            },
            Step::Wait { secs: 0.5 },
            Step::CompleteObjectives,
        ],
        EncounterKind::Corner { .. } | EncounterKind::DoNotLook { .. } | EncounterKind::Running { .. } => {
            vec![Step::CompleteObjectives]
        }
    }
}

// Legs from the chore spot into a hiding spot and back, in room-local coordinates
fn hiding_route(room: usize, spot: HidingSpot) -> (Vec<Step>, Vec<Step>) {
    let at = |x: f32, z: f32| room_local_to_world(room, Vec3::new(x, 0.0, z));
    let chore_spot = at(CHORE_SPOT.0, CHORE_SPOT.1);
    let cover = spot.governing_fixture();

    match spot {
        HidingSpot::Desk => (
            vec![walk(at(4.1, 1.6)), set(cover, room, true), crawl(at(0.6, 1.6)), set(cover, room, false)],
            vec![
                set(cover, room, true),
                crawl(at(1.5, 1.6)),
                set(cover, room, false),
                walk(at(4.1, 1.6)),
                walk(chore_spot),
            ],
        ),
        HidingSpot::Nightstand => (
            vec![
                walk(at(2.5, 1.2)),
                walk(at(2.5, 4.5)),
                set(cover, room, true),
                crawl(at(4.5, 4.5)),
                set(cover, room, false),
            ],
            vec![
                set(cover, room, true),
                crawl(at(3.5, 4.5)),
                set(cover, room, false),
                walk(at(2.5, 4.5)),
                walk(at(2.5, 1.2)),
                walk(chore_spot),
            ],
        ),
        // The tub rim can only be cleared with a jump
        HidingSpot::BathroomCurtain => {
            let bathroom = Fixture::Door(DoorVariant::Bathroom);
            (
                vec![
                    walk(at(1.3, 1.2)),
                    set(bathroom, room, true),
                    walk(at(1.3, 4.3)),
                    leap(at(1.3, 5.4)),
                    set(cover, room, false),
                ],
                vec![
                    set(cover, room, true),
                    walk(at(1.3, 5.7)),
                    leap(at(1.3, 4.3)),
                    walk(at(1.3, 1.2)),
                    walk(chore_spot),
                ],
            )
        }
        HidingSpot::RoomCurtain => (
            vec![
                walk(at(2.5, 1.2)),
                walk(at(2.5, 5.35)),
                walk(at(3.6, 5.35)),
                set(cover, room, false),
            ],
            vec![
                set(cover, room, true),
                walk(at(2.5, 5.35)),
                walk(at(2.5, 1.2)),
                walk(chore_spot),
            ],
        ),
    }
}

// ============================================================================
// Autopilot
// ============================================================================

// What the autopilot wants to happen this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PilotOutput {
    pub intent: PlayerIntent,
    pub fixtures: Vec<SetFixture>,
    pub objectives_completed: bool,
    pub lap_completed: bool,
}

// Plays the hotel room by room, standing in for a human at the keyboard
#[derive(Debug, Resource)]
pub struct Pilot {
    steps: VecDeque<Step>,
    epoch: Epoch,
    next_room: usize,
    rooms_done: usize,
    finished: bool,
    careless: f32,
    rng: StdRng,
    look: Vec3,
    crouch: bool,
    waited: f32,
    last_position: Vec3,
    stalled_frames: u32,
}

impl Pilot {
    #[must_use]
    pub fn new(careless: f32, seed: Option<u64>) -> Self {
        Self {
            steps: plan_entry().into(),
            epoch: Epoch::default(),
            next_room: 0,
            rooms_done: 0,
            finished: false,
            careless: careless.clamp(0.0, 1.0),
            rng: seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64),
            look: Vec3::X,
            crouch: false,
            waited: 0.0,
            last_position: Vec3::ZERO,
            stalled_frames: 0,
        }
    }

    // Rooms finished in the current playthrough
    #[must_use]
    pub const fn rooms_done(&self) -> usize {
        self.rooms_done
    }

    #[must_use]
    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    fn reset(&mut self, epoch: Epoch) {
        debug!("autopilot starting over for epoch {}", epoch.value());
        self.steps = plan_entry().into();
        self.epoch = epoch;
        self.next_room = 0;
        self.rooms_done = 0;
        self.finished = false;
        self.look = Vec3::X;
        self.crouch = false;
        self.waited = 0.0;
        self.stalled_frames = 0;
    }

    fn idle_intent(&self) -> PlayerIntent {
        PlayerIntent {
            velocity: Vec2::ZERO,
            look: self.look,
            crouch: self.crouch,
            jump: false,
        }
    }

    fn plan_next_room(&mut self, session: &HotelSession) -> bool {
        let room = self.next_room;
        if room >= session.assignment().len() {
            return false;
        }
        self.next_room += 1;

        let kind = session
            .assignment()
            .encounter_for(room, session.catalog())
            .map(|encounter| &encounter.kind);
        let careless = self.careless > 0.0 && self.rng.random::<f32>() < self.careless;
        if careless {
            info!("autopilot ignores the rule in room {room}");
        }
        self.steps.extend(plan_room(room, kind, careless));
        true
    }

    fn pop_step(&mut self) {
        self.steps.pop_front();
        self.waited = 0.0;
        self.stalled_frames = 0;
    }

    // Decide this frame's intent. Instant steps are taken until one that needs time.
    pub fn drive(&mut self, session: &HotelSession, delta: f32) -> PilotOutput {
        if session.epoch() != self.epoch {
            self.reset(session.epoch());
        }
        let mut output = PilotOutput {
            intent: self.idle_intent(),
            ..PilotOutput::default()
        };
        if session.is_dead() {
            return output;
        }

        loop {
            if self.steps.is_empty() && !self.plan_next_room(session) {
                if !self.finished {
                    self.finished = true;
                    output.lap_completed = true;
                    info!("autopilot visited all {} rooms", self.rooms_done);
                }
                return output;
            }
            let Some(step) = self.steps.front().copied() else {
                return output;
            };

            match step {
                Step::Walk { target, crouch, jump } => {
                    let position = session.player().position;
                    let remaining = Vec2::new(target.x - position.x, target.z - position.z);
                    if remaining.length() < ARRIVAL_TOLERANCE {
                        self.pop_step();
                        continue;
                    }

                    if position.distance(self.last_position) < 1e-4 {
                        self.stalled_frames += 1;
                    } else {
                        self.stalled_frames = 0;
                    }
                    self.last_position = position;
                    if self.stalled_frames > STALL_FRAMES {
                        warn!("autopilot stuck at {position} on the way to {target}, skipping leg");
                        self.pop_step();
                        continue;
                    }

                    let speed = if crouch { SPEED_CROUCH } else { SPEED_WALK };
                    let velocity = if delta > 0.0 && remaining.length() <= speed * delta {
                        remaining / delta
                    } else {
                        remaining.normalize_or_zero() * speed
                    };
                    // Jump only on the first frame of the leg
                    if jump && let Some(Step::Walk { jump: pending, .. }) = self.steps.front_mut() {
                        *pending = false;
                    }

                    self.crouch = crouch;
                    self.look = Vec3::new(velocity.x, 0.0, velocity.y);
                    output.intent = PlayerIntent {
                        velocity,
                        look: self.look,
                        crouch,
                        jump,
                    };
                    return output;
                }
                Step::Wait { secs } => {
                    self.waited += delta;
                    if self.waited >= secs {
                        self.pop_step();
                        continue;
                    }
                    return output;
                }
                Step::Fixture { fixture, room, open } => {
                    output.fixtures.push(SetFixture { fixture, room, open });
                }
                Step::CompleteObjectives => {
                    output.objectives_completed = true;
                }
                Step::Look { target } => {
                    self.look = target - session.player().eye_position();
                    output.intent.look = self.look;
                }
                Step::RoomDone { room } => {
                    self.rooms_done = room + 1;
                    debug!("autopilot done with room {room}");
                }
            }
            self.pop_step();
        }
    }
}

// ============================================================================
// Autopilot System
// ============================================================================

// Runs first each frame so its messages are applied before the session ticks
pub fn pilot_system(
    time: Res<Time>,
    session: Res<HotelSession>,
    mut pilot: ResMut<Pilot>,
    mut intent: ResMut<PlayerIntent>,
    mut fixtures: MessageWriter<SetFixture>,
    mut objectives: MessageWriter<ObjectivesCompleted>,
    mut restart: MessageWriter<RestartRequested>,
) {
    let output = pilot.drive(&session, time.delta_secs());

    *intent = output.intent;
    for fixture in output.fixtures {
        fixtures.write(fixture);
    }
    if output.objectives_completed {
        objectives.write(ObjectivesCompleted {});
    }
    if output.lap_completed {
        restart.write(RestartRequested {});
    }
}
