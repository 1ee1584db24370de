use std::f32::consts::PI;

use bevy_math::Vec3;

use super::catalog::{Category, Encounter, EncounterGroup, EncounterKind, LevelCatalog, MonsterPose, Zone};
use crate::map::{DoorVariant, Fixture, HidingSpot};

// Monster arrives through the room door from the corridor
const CORRIDOR_SPAWN: Vec3 = Vec3::new(4.1, 0.0, -0.6);
const FACING_ROOM: Vec3 = Vec3::new(0.0, PI, 0.0);

fn pose(rest: Vec3, spawn: Vec3, rotation: Vec3) -> MonsterPose {
    MonsterPose {
        rest_position: rest,
        spawn_position: spawn,
        spawn_rotation: rotation,
    }
}

fn encounter(id: &str, probability: f32, death_reason: &str, animation: &str, monster: MonsterPose, kind: EncounterKind) -> Encounter {
    Encounter {
        id: id.to_string(),
        probability,
        death_reason: death_reason.to_string(),
        monster,
        animation: animation.to_string(),
        requires_sound: false,
        kind,
    }
}

fn knock(id: &str, probability: f32, hiding_spot: HidingSpot, death_reason: &str) -> Encounter {
    encounter(
        id,
        probability,
        death_reason,
        "knock",
        pose(Vec3::new(2.5, 0.0, 2.8), CORRIDOR_SPAWN, FACING_ROOM),
        EncounterKind::HidingSpot { hiding_spot },
    )
}

impl LevelCatalog {
    // The encounters shipped with the game
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        let hiding = EncounterGroup {
            category: Category::HidingSpot,
            encounters: vec![
                knock(
                    "knock_window_curtain",
                    0.6,
                    HidingSpot::RoomCurtain,
                    "It let itself in. The curtain by the window was the only place to hide.",
                ),
                knock(
                    "knock_bathtub",
                    0.5,
                    HidingSpot::BathroomCurtain,
                    "It let itself in. You should have been in the bathtub with the curtain drawn.",
                ),
                knock(
                    "knock_desk",
                    0.4,
                    HidingSpot::Desk,
                    "It let itself in. Crawling under the desk and shutting it would have saved you.",
                ),
                knock(
                    "knock_nightstand",
                    0.3,
                    HidingSpot::Nightstand,
                    "It let itself in. The nightstand was big enough for you.",
                ),
            ],
        };

        let corner = EncounterGroup {
            category: Category::Corner,
            encounters: vec![
                encounter(
                    "corner_bathroom_shadow",
                    0.5,
                    "You walked right up to the thing standing by the bathroom.",
                    "corner_idle",
                    pose(Vec3::new(0.5, 0.0, 3.2), Vec3::new(0.5, 0.0, 3.2), Vec3::new(0.0, PI / 2.0, 0.0)),
                    EncounterKind::Corner {
                        danger_zone: Zone::new(Vec3::new(0.6, 1.0, 3.2), Vec3::new(0.8, 2.0, 0.6)),
                        max_distance: 2.0,
                        max_angle_degrees: 25.0,
                    },
                ),
                Encounter {
                    requires_sound: true,
                    ..encounter(
                        "corner_window",
                        0.4,
                        "It heard your footsteps and turned around.",
                        "corner_turn",
                        pose(Vec3::new(4.5, 0.0, 5.3), Vec3::new(4.5, 0.0, 5.3), Vec3::new(0.0, -PI / 2.0, 0.0)),
                        EncounterKind::Corner {
                            danger_zone: Zone::new(Vec3::new(4.5, 1.0, 5.3), Vec3::new(0.6, 2.0, 0.6)),
                            max_distance: 2.5,
                            max_angle_degrees: 20.0,
                        },
                    )
                },
            ],
        };

        let do_not_open = EncounterGroup {
            category: Category::DoNotOpen,
            encounters: vec![
                encounter(
                    "dont_open_bathroom",
                    0.6,
                    "Something was waiting behind the bathroom door.",
                    "lunge",
                    pose(Vec3::new(1.2, 0.0, 4.4), Vec3::new(1.2, 0.0, 4.0), FACING_ROOM),
                    EncounterKind::DoNotOpen {
                        fixture: Fixture::Door(DoorVariant::Bathroom),
                    },
                ),
                encounter(
                    "dont_open_nightstand",
                    0.3,
                    "The nightstand was not empty.",
                    "crawl_out",
                    pose(Vec3::new(4.5, 0.0, 4.5), Vec3::new(4.1, 0.0, 4.5), Vec3::new(0.0, PI / 2.0, 0.0)),
                    EncounterKind::DoNotOpen {
                        fixture: Fixture::Door(DoorVariant::Nightstand),
                    },
                ),
            ],
        };

        let close_quickly = EncounterGroup {
            category: Category::CloseQuickly,
            encounters: vec![
                encounter(
                    "close_bathroom_quickly",
                    0.5,
                    "You left the bathroom door open long enough for it to get out.",
                    "push_door",
                    pose(Vec3::new(1.0, 0.0, 4.2), Vec3::new(1.2, 0.0, 3.9), FACING_ROOM),
                    EncounterKind::CloseQuickly {
                        fixture: Fixture::Door(DoorVariant::Bathroom),
                        window_secs: 1.5,
                    },
                ),
                encounter(
                    "close_desk_quickly",
                    0.3,
                    "A hand came out from under the desk before you shut it.",
                    "grab",
                    pose(Vec3::new(0.6, 0.0, 1.6), Vec3::new(1.1, 0.0, 1.6), Vec3::new(0.0, -PI / 2.0, 0.0)),
                    EncounterKind::CloseQuickly {
                        fixture: Fixture::Door(DoorVariant::Desk),
                        window_secs: 1.0,
                    },
                ),
            ],
        };

        let do_not_look = EncounterGroup {
            category: Category::DoNotLook,
            encounters: vec![
                encounter(
                    "dont_look_bed",
                    0.5,
                    "You looked at what was lying in the bed.",
                    "sit_up",
                    pose(Vec3::new(3.8, 0.7, 3.0), Vec3::new(3.8, 0.7, 3.0), Vec3::ZERO),
                    EncounterKind::DoNotLook {
                        trigger_zone: Zone::new(Vec3::new(3.8, 0.9, 3.0), Vec3::new(1.6, 0.6, 2.0)),
                        instant_zone: None,
                        max_distance: 3.5,
                    },
                ),
                encounter(
                    "dont_look_window",
                    0.4,
                    "You looked at the face in the window.",
                    "window_stare",
                    pose(Vec3::new(3.6, 0.0, 5.2), Vec3::new(3.6, 1.4, 5.9), FACING_ROOM),
                    EncounterKind::DoNotLook {
                        trigger_zone: Zone::new(Vec3::new(3.6, 1.4, 5.6), Vec3::new(1.6, 1.2, 0.3)),
                        instant_zone: Some(Zone::new(Vec3::new(3.6, 1.0, 5.1), Vec3::new(1.6, 2.0, 0.4))),
                        max_distance: 4.0,
                    },
                ),
            ],
        };

        let running = EncounterGroup {
            category: Category::Running,
            encounters: vec![
                Encounter {
                    requires_sound: true,
                    ..encounter(
                        "running_from_bathroom",
                        0.4,
                        "It heard you and came running out of the bathroom.",
                        "sprint",
                        pose(Vec3::new(1.2, 0.0, 4.4), Vec3::new(1.2, 0.0, 3.9), FACING_ROOM),
                        EncounterKind::Running {
                            trigger_zone: Zone::new(Vec3::new(1.2, 1.0, 2.8), Vec3::new(1.8, 2.0, 1.0)),
                            window_secs: 2.5,
                        },
                    )
                },
                encounter(
                    "running_past_bed",
                    0.3,
                    "It came out from behind the bed faster than you could leave.",
                    "sprint",
                    pose(Vec3::new(2.6, 0.0, 4.8), Vec3::new(2.6, 0.0, 4.8), Vec3::ZERO),
                    EncounterKind::Running {
                        trigger_zone: Zone::new(Vec3::new(2.6, 1.0, 4.5), Vec3::new(1.0, 2.0, 1.5)),
                        window_secs: 3.0,
                    },
                ),
            ],
        };

        Self::new(vec![hiding, corner, do_not_open, close_quickly, do_not_look, running])
    }
}
