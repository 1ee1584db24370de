use bevy::prelude::*;
use tracing::{debug, info, warn};

use hotel_common::{
    encounters::Outcome,
    timers::clamp_delay,
    protocol::{EncounterResolved, FixtureForced, MonsterStateChanged, PlayerDied, RestartRequested},
};

// ============================================================================
// Run Report
// ============================================================================

// Tallies what happened during the run and restarts the playthrough after a death
#[derive(Debug, Resource)]
pub struct RunReport {
    pub deaths: u32,
    pub survived: u32,
    pub restarts: u32,
    restart_delay: f32,
    pending_restart: Option<Timer>,
}

impl RunReport {
    #[must_use]
    pub fn new(restart_delay: f32) -> Self {
        Self {
            deaths: 0,
            survived: 0,
            restarts: 0,
            restart_delay: clamp_delay(restart_delay),
            pending_restart: None,
        }
    }

    #[must_use]
    pub const fn restart_pending(&self) -> bool {
        self.pending_restart.is_some()
    }

    fn schedule_restart(&mut self) {
        if self.pending_restart.is_none() {
            self.pending_restart = Some(Timer::from_seconds(self.restart_delay, TimerMode::Once));
        }
    }
}

// ============================================================================
// Report System
// ============================================================================

pub fn report_system(
    time: Res<Time>,
    mut report: ResMut<RunReport>,
    mut died: MessageReader<PlayerDied>,
    mut resolved: MessageReader<EncounterResolved>,
    mut monster: MessageReader<MonsterStateChanged>,
    mut forced: MessageReader<FixtureForced>,
    mut restart: MessageWriter<RestartRequested>,
) {
    for msg in monster.read() {
        debug!("room {} monster -> {:?}", msg.room, msg.state);
    }
    for msg in forced.read() {
        info!("room {}: {:?} forced open", msg.room, msg.fixture);
    }
    for msg in resolved.read() {
        match msg.outcome {
            Outcome::Survived => {
                report.survived += 1;
                info!("room {} survived", msg.room);
            }
            Outcome::Death => debug!("room {} resolved with a death", msg.room),
        }
    }
    for msg in died.read() {
        report.deaths += 1;
        warn!("died in room {}: {} (death #{})", msg.room, msg.reason, msg.death_count);
        report.schedule_restart();
    }

    let restart_due = report
        .pending_restart
        .as_mut()
        .is_some_and(|timer| timer.tick(time.delta()).is_finished());
    if restart_due {
        report.pending_restart = None;
        report.restarts += 1;
        restart.write(RestartRequested {});
    }
}
