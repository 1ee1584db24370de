#[allow(clippy::wildcard_imports)]
use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::info;

use crate::{
    protocol::*,
    session::HotelSession,
};

// ============================================================================
// Hotel Systems
// ============================================================================
//
// Run chained in this order each frame:
// fixture_commands -> objectives -> session_tick -> restart

// Apply door and curtain changes from the presentation layer before the resolvers run
pub fn fixture_commands_system(mut session: ResMut<HotelSession>, mut commands: MessageReader<SetFixture>) {
    for command in commands.read() {
        session.doors_mut().set(command.fixture, command.room, command.open);
    }
}

pub fn objectives_system(mut session: ResMut<HotelSession>, mut completed: MessageReader<ObjectivesCompleted>) {
    if completed.read().count() > 0 {
        session.complete_objectives();
    }
}

// Advance the session by one frame and forward what happened as messages
pub fn session_tick_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    mut session: ResMut<HotelSession>,
    mut died: MessageWriter<PlayerDied>,
    mut resolved: MessageWriter<EncounterResolved>,
    mut monster: MessageWriter<MonsterStateChanged>,
    mut forced: MessageWriter<FixtureForced>,
) {
    let events = session.tick(&intent, time.delta());
    let death_count = session.death_count();

    for event in events {
        match event {
            GameEvent::Died { room, reason } => {
                died.write(PlayerDied {
                    room,
                    reason,
                    death_count,
                });
            }
            GameEvent::EncounterResolved { room, outcome } => {
                resolved.write(EncounterResolved { room, outcome });
            }
            GameEvent::MonsterStateChanged { room, state } => {
                monster.write(MonsterStateChanged { room, state });
            }
            GameEvent::DoorForced { room, fixture } => {
                forced.write(FixtureForced { room, fixture });
            }
        }
    }
}

pub fn restart_system(mut session: ResMut<HotelSession>, mut requests: MessageReader<RestartRequested>) {
    if requests.read().count() > 0 {
        session.restart();
        info!("playthrough restarted on request");
    }
}
