use std::time::Duration;

use anyhow::Context;
use bevy_ecs::prelude::Resource;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    collision::step_player,
    config::SessionConfig,
    context::FrameContext,
    doors::DoorStates,
    encounters::{DeathState, EncounterDirector, EncounterFrame, EncounterPhase, Effects, MonsterState},
    hiding::is_player_hidden,
    levels::{Encounter, LevelCatalog, RoomAssignment, generate_assignment},
    map::{Cell, SpatialGrid, grid_coords_from_position, room_index_at},
    players::PlayerBody,
    protocol::{GameEvent, PlayerIntent},
    timers::{Epoch, Scheduler},
};

// ============================================================================
// Hotel Session
// ============================================================================

// Owns every piece of per-playthrough state. The presentation layer feeds it
// intent and door changes; `tick` runs movement, hiding and encounters in that order.
#[derive(Debug, Resource)]
pub struct HotelSession {
    config: SessionConfig,
    catalog: LevelCatalog,
    assignment: RoomAssignment,
    grid: SpatialGrid,
    doors: DoorStates,
    player: PlayerBody,
    director: EncounterDirector,
    scheduler: Scheduler,
    epoch: Epoch,
    death: DeathState,
    hidden: bool,
    rng: StdRng,
}

impl HotelSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::build(config, LevelCatalog::builtin())
    }

    pub fn with_catalog(config: SessionConfig, catalog: LevelCatalog) -> anyhow::Result<Self> {
        catalog.validate().context("Refusing to start a session with an invalid catalog")?;
        Ok(Self::build(config, catalog))
    }

    fn build(config: SessionConfig, catalog: LevelCatalog) -> Self {
        let config = config.sanitized();
        let mut rng = config.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let assignment = generate_assignment(&catalog, config.room_count, config.empty_ratio, config.selection, &mut rng);
        info!(
            "new session: {} rooms, {} encounters in catalog, {:?} selection",
            assignment.len(),
            catalog.len(),
            config.selection
        );

        Self {
            config,
            catalog,
            assignment,
            grid: SpatialGrid::default(),
            doors: DoorStates::new(),
            player: PlayerBody::at_spawn(),
            director: EncounterDirector::default(),
            scheduler: Scheduler::default(),
            epoch: Epoch::default(),
            death: DeathState::default(),
            hidden: false,
            rng,
        }
    }

    // ------------------------------------------------------------------------
    // Grid
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn get_cell(&self, x: i32, z: i32) -> Cell {
        self.grid.get_cell(x, z)
    }

    pub fn initialize_grid_if_needed(&mut self) -> bool {
        self.grid.initialize_if_needed(&self.assignment, &self.catalog)
    }

    pub fn reset_grid(&mut self) {
        self.grid.reset();
    }

    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn assignment(&self) -> &RoomAssignment {
        &self.assignment
    }

    #[must_use]
    pub fn current_room_index(&self) -> Option<usize> {
        room_index_at(self.player.position, self.assignment.len())
    }

    // Hidden verdict from the last tick
    #[must_use]
    pub const fn is_player_hidden(&self) -> bool {
        self.hidden
    }

    // The unresolved encounter in the player's room, if any
    #[must_use]
    pub fn active_encounter(&self) -> Option<(usize, &Encounter)> {
        let room = self.current_room_index()?;
        if self.director.phase(room).is_resolved() {
            return None;
        }
        self.assignment.encounter_for(room, &self.catalog).map(|encounter| (room, encounter))
    }

    #[must_use]
    pub fn encounter_phase(&self, room: usize) -> EncounterPhase {
        self.director.phase(room)
    }

    #[must_use]
    pub fn monster_state(&self, room: usize) -> MonsterState {
        self.director.monster_state(room)
    }

    #[must_use]
    pub const fn director(&self) -> &EncounterDirector {
        &self.director
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn doors(&self) -> &DoorStates {
        &self.doors
    }

    pub const fn doors_mut(&mut self) -> &mut DoorStates {
        &mut self.doors
    }

    #[must_use]
    pub const fn player(&self) -> &PlayerBody {
        &self.player
    }

    // Direct access for scripted sequences and debugging tools
    pub const fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    #[must_use]
    pub const fn death(&self) -> &DeathState {
        &self.death
    }

    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.death.dead
    }

    #[must_use]
    pub const fn death_count(&self) -> u32 {
        self.death.count
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    // Chores in the current room are done; handled on the next tick
    pub fn complete_objectives(&mut self) {
        if self.death.dead {
            debug!("ignoring objective completion while dead");
            return;
        }
        self.director.queue_objectives();
    }

    // One frame: movement, then hiding, then encounters
    pub fn tick(&mut self, intent: &PlayerIntent, delta: Duration) -> Vec<GameEvent> {
        self.initialize_grid_if_needed();

        let ctx = FrameContext {
            grid: &self.grid,
            doors: &self.doors,
            catalog: &self.catalog,
            assignment: &self.assignment,
        };

        // Movement
        if self.death.dead {
            self.player.making_sound = false;
        } else {
            self.player.crouching = intent.crouch;
            self.player.look_towards(intent.look);
            step_player(&ctx, &mut self.player, intent.velocity, intent.jump, delta.as_secs_f32());
        }

        // Hiding
        self.hidden = hidden_now(&ctx, &self.director, &self.player);

        // Encounters
        let mut events = Vec::new();
        let frame = EncounterFrame {
            ctx,
            player: &self.player,
            hidden: self.hidden,
            delta,
            epoch: self.epoch,
        };
        let mut fx = Effects {
            scheduler: &mut self.scheduler,
            death: &mut self.death,
            events: &mut events,
        };
        self.director.update(&frame, &mut fx);

        for event in &events {
            if let GameEvent::DoorForced { room, fixture } = event {
                self.doors.open(*fixture, Some(*room));
            }
        }
        events
    }

    // New playthrough: fresh assignment and grid, player back at the front desk,
    // every door shut and every encounter forgotten. The death counter survives.
    pub fn restart(&mut self) {
        self.epoch = self.epoch.next();
        self.assignment = generate_assignment(
            &self.catalog,
            self.config.room_count,
            self.config.empty_ratio,
            self.config.selection,
            &mut self.rng,
        );
        self.grid.reset();
        self.grid.initialize_if_needed(&self.assignment, &self.catalog);
        self.player = PlayerBody::at_spawn();
        self.doors.reset();
        self.director.clear();
        self.scheduler.clear();
        self.death.revive();
        self.hidden = false;
        info!("restarted (epoch {}, {} deaths so far)", self.epoch.value(), self.death.count);
    }
}

fn hidden_now(ctx: &FrameContext, director: &EncounterDirector, player: &PlayerBody) -> bool {
    let room = ctx.room_at(player.position);
    let required = room
        .filter(|room| !director.phase(*room).is_resolved())
        .and_then(|room| ctx.encounter_in(room))
        .and_then(|encounter| encounter.kind.required_hiding_spot());
    is_player_hidden(ctx.grid, grid_coords_from_position(player.position), required, room, ctx.doors)
}
