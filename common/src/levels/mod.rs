mod assignment;
mod builtin;
mod catalog;

pub use assignment::{RoomAssignment, RoomSlot, SelectionMode, generate_assignment};
pub use catalog::{Category, Encounter, EncounterGroup, EncounterKind, LevelCatalog, MonsterPose, Zone};
