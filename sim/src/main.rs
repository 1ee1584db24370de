use anyhow::{Result, bail};
use bevy::{prelude::*, time::TimeUpdateStrategy};
use clap::Parser;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use hotel_common::{
    HotelSession,
    levels::{LevelCatalog, RoomSlot},
    protocol::{
        EncounterResolved, FixtureForced, MonsterStateChanged, ObjectivesCompleted, PlayerDied, PlayerIntent,
        RestartRequested, SetFixture,
    },
    systems::{fixture_commands_system, objectives_system, restart_system, session_tick_system},
};
use hotel_sim::{Args, Pilot, RunReport, init_tracing, pilot_system, report_system};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_filter)?;

    if args.frequency == 0 {
        bail!("loop frequency must be at least 1 Hz");
    }

    let config = args.session_config();
    let session = match &args.catalog {
        Some(path) => HotelSession::with_catalog(config, LevelCatalog::from_json_file(path)?)?,
        None => HotelSession::new(config),
    };
    for (room, slot) in session.assignment().slots().iter().enumerate() {
        match slot {
            RoomSlot::Encounter(index) => {
                let id = session.catalog().get(*index).map_or("?", |encounter| encounter.id.as_str());
                debug!("room {room}: {id}");
            }
            RoomSlot::Empty => debug!("room {room}: empty"),
        }
    }

    let tick_duration = Duration::from_nanos(1_000_000_000 / args.frequency);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        // Every update advances simulated time by exactly one tick
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration))
        .insert_resource(session)
        .insert_resource(PlayerIntent::default())
        .insert_resource(Pilot::new(args.careless, args.seed))
        .insert_resource(RunReport::new(args.restart_delay))
        .add_message::<SetFixture>()
        .add_message::<ObjectivesCompleted>()
        .add_message::<RestartRequested>()
        .add_message::<PlayerDied>()
        .add_message::<EncounterResolved>()
        .add_message::<MonsterStateChanged>()
        .add_message::<FixtureForced>()
        .add_systems(
            Update,
            (
                // Input first, then door changes and objectives, then the session itself.
                // Restarts go last so a restart never races the frame that caused it.
                pilot_system,
                fixture_commands_system,
                objectives_system,
                session_tick_system,
                report_system,
                restart_system,
            )
                .chain(),
        );

    info!("starting simulation loop at {} Hz...", args.frequency);

    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frame: u64 = 0;
    while args.ticks == 0 || frame < args.ticks {
        if !args.fast {
            interval.tick().await;
        }

        let update_start = Instant::now();
        app.update();
        let update_elapsed = update_start.elapsed();

        if update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                frame,
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        frame += 1;
    }

    let report = app.world().resource::<RunReport>();
    let session = app.world().resource::<HotelSession>();
    info!(
        "stopped after {} ticks: {} encounters survived, {} deaths ({} total), {} restarts",
        frame,
        report.survived,
        report.deaths,
        session.death_count(),
        report.restarts
    );
    Ok(())
}
