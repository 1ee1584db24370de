#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Fixture Variants
// ============================================================================

// Every kind of hinged door the hotel has. Room-scoped doors are keyed by room
// index in the door store, the reception doors are global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum DoorVariant {
    Room,
    Bathroom,
    Desk,
    Nightstand,
    Tutorial,
    Corridor,
    Exit,
}

impl DoorVariant {
    pub const ALL: [Self; 7] = [
        Self::Room,
        Self::Bathroom,
        Self::Desk,
        Self::Nightstand,
        Self::Tutorial,
        Self::Corridor,
        Self::Exit,
    ];

    #[must_use]
    pub const fn is_room_scoped(self) -> bool {
        matches!(self, Self::Room | Self::Bathroom | Self::Desk | Self::Nightstand)
    }

    // Furniture doors lead into spaces the player can only crawl into
    #[must_use]
    pub const fn needs_crouch(self) -> bool {
        matches!(self, Self::Desk | Self::Nightstand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum CurtainVariant {
    Room,
    Bathroom,
}

// A door or a curtain: anything with a live open/closed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Fixture {
    Door(DoorVariant),
    Curtain(CurtainVariant),
}

impl Fixture {
    #[must_use]
    pub const fn is_room_scoped(self) -> bool {
        match self {
            Self::Door(variant) => variant.is_room_scoped(),
            Self::Curtain(_) => true,
        }
    }

    // Doors start shut, curtains start drawn aside
    #[must_use]
    pub const fn default_open(self) -> bool {
        matches!(self, Self::Curtain(_))
    }
}

// ============================================================================
// Hiding Spots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum HidingSpot {
    RoomCurtain,
    BathroomCurtain,
    Desk,
    Nightstand,
}

impl HidingSpot {
    // The door or curtain that has to be closed for the spot to conceal the player
    #[must_use]
    pub const fn governing_fixture(self) -> Fixture {
        match self {
            Self::RoomCurtain => Fixture::Curtain(CurtainVariant::Room),
            Self::BathroomCurtain => Fixture::Curtain(CurtainVariant::Bathroom),
            Self::Desk => Fixture::Door(DoorVariant::Desk),
            Self::Nightstand => Fixture::Door(DoorVariant::Nightstand),
        }
    }
}

// ============================================================================
// Cell Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellType {
    #[default]
    Empty,
    Wall,
    RaisedAreaLow,
    RaisedAreaHigh,
    CrouchOnly,
    Bed,
    DoorClosed(DoorVariant),
    DoorOpen(DoorVariant),
    CurtainClosed(CurtainVariant),
    MonsterSpawnMarker,
    Boundary,
}

impl CellType {
    #[must_use]
    pub const fn door_variant(self) -> Option<DoorVariant> {
        match self {
            Self::DoorClosed(variant) | Self::DoorOpen(variant) => Some(variant),
            _ => None,
        }
    }

    // Door and curtain cells start a door transition when entered
    #[must_use]
    pub const fn is_passage(self) -> bool {
        matches!(self, Self::DoorClosed(_) | Self::DoorOpen(_) | Self::CurtainClosed(_))
    }

    // Height of the surface a player stands on when inside this cell
    #[must_use]
    pub const fn floor_height(self) -> f32 {
        use crate::constants::{HIGH_STEP_HEIGHT, LOW_STEP_HEIGHT};
        match self {
            Self::RaisedAreaLow | Self::CurtainClosed(_) => LOW_STEP_HEIGHT,
            Self::RaisedAreaHigh | Self::Bed => HIGH_STEP_HEIGHT,
            _ => 0.0,
        }
    }
}

// One grid cell: its type plus an optional hiding spot tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub kind: CellType,
    pub hiding_spot: Option<HidingSpot>,
}

impl Cell {
    pub const EMPTY: Self = Self {
        kind: CellType::Empty,
        hiding_spot: None,
    };

    #[must_use]
    pub const fn new(kind: CellType) -> Self {
        Self { kind, hiding_spot: None }
    }
}
