use std::collections::HashMap;

use tracing::debug;

use crate::map::Fixture;

// ============================================================================
// Door & Curtain State
// ============================================================================

// Room-scoped fixtures are keyed by their room, reception doors have no room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoorKey {
    pub room: Option<usize>,
    pub fixture: Fixture,
}

impl DoorKey {
    #[must_use]
    pub const fn new(fixture: Fixture, room: Option<usize>) -> Self {
        let room = if fixture.is_room_scoped() { room } else { None };
        Self { room, fixture }
    }
}

// Live open/closed state of every door and curtain. The presentation layer
// writes it; the core reads it, and forces a room door open during a knock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoorStates {
    states: HashMap<DoorKey, bool>,
}

impl DoorStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Fixtures nobody has touched report their default (doors shut, curtains open)
    #[must_use]
    pub fn is_open(&self, fixture: Fixture, room: Option<usize>) -> bool {
        self.states
            .get(&DoorKey::new(fixture, room))
            .copied()
            .unwrap_or_else(|| fixture.default_open())
    }

    #[must_use]
    pub fn is_closed(&self, fixture: Fixture, room: Option<usize>) -> bool {
        !self.is_open(fixture, room)
    }

    // Returns true when the state actually changed
    pub fn set(&mut self, fixture: Fixture, room: Option<usize>, open: bool) -> bool {
        let changed = self.is_open(fixture, room) != open;
        let key = DoorKey::new(fixture, room);
        self.states.insert(key, open);
        if changed {
            debug!("{:?} in room {:?} now {}", key.fixture, key.room, if open { "open" } else { "closed" });
        }
        changed
    }

    pub fn open(&mut self, fixture: Fixture, room: Option<usize>) -> bool {
        self.set(fixture, room, true)
    }

    pub fn close(&mut self, fixture: Fixture, room: Option<usize>) -> bool {
        self.set(fixture, room, false)
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (DoorKey, bool)> + '_ {
        self.states.iter().map(|(key, open)| (*key, *open))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{CurtainVariant, DoorVariant};

    const ROOM_DOOR: Fixture = Fixture::Door(DoorVariant::Room);
    const BATH_CURTAIN: Fixture = Fixture::Curtain(CurtainVariant::Bathroom);

    #[test]
    fn untouched_fixtures_use_defaults() {
        let doors = DoorStates::new();
        assert!(doors.is_closed(ROOM_DOOR, Some(3)));
        assert!(doors.is_open(BATH_CURTAIN, Some(3)));
    }

    #[test]
    fn room_doors_are_independent_per_room() {
        let mut doors = DoorStates::new();
        assert!(doors.open(ROOM_DOOR, Some(2)));
        assert!(doors.is_open(ROOM_DOOR, Some(2)));
        assert!(doors.is_closed(ROOM_DOOR, Some(3)));
    }

    #[test]
    fn reception_doors_ignore_the_room() {
        let exit = Fixture::Door(DoorVariant::Exit);
        let mut doors = DoorStates::new();
        doors.open(exit, Some(7));
        assert!(doors.is_open(exit, None));
        assert!(doors.is_open(exit, Some(1)));
    }

    #[test]
    fn set_reports_changes_only() {
        let mut doors = DoorStates::new();
        assert!(!doors.close(ROOM_DOOR, Some(0)));
        assert!(doors.open(ROOM_DOOR, Some(0)));
        assert!(!doors.open(ROOM_DOOR, Some(0)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut doors = DoorStates::new();
        doors.open(ROOM_DOOR, Some(0));
        doors.close(BATH_CURTAIN, Some(0));
        doors.reset();
        assert!(doors.is_closed(ROOM_DOOR, Some(0)));
        assert!(doors.is_open(BATH_CURTAIN, Some(0)));
        assert_eq!(doors.iter().count(), 0);
    }
}
