use bevy_math::Vec3;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::map::{Fixture, HidingSpot};

// ============================================================================
// Encounter Data
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Category {
    HidingSpot,
    Corner,
    DoNotOpen,
    CloseQuickly,
    DoNotLook,
    Running,
}

// Box volume given by its center and full extents, in room-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Zone {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Zone {
    #[must_use]
    pub const fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }
}

// Where the monster waits, where it appears and which way it faces (room-local)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct MonsterPose {
    pub rest_position: Vec3,
    pub spawn_position: Vec3,
    pub spawn_rotation: Vec3,
}

// Per-category trigger data; each variant carries only what its rule reads
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum EncounterKind {
    // Finishing the room's chores makes the monster knock; hide in the given spot
    HidingSpot { hiding_spot: HidingSpot },
    // Monster lurks in a corner; approaching it while facing it is fatal
    Corner {
        danger_zone: Zone,
        max_distance: f32,
        max_angle_degrees: f32,
    },
    // Opening this fixture while in the room is fatal
    DoNotOpen { fixture: Fixture },
    // Once opened, this fixture must be shut again within the window
    CloseQuickly { fixture: Fixture, window_secs: f32 },
    // Looking at the trigger box from close enough is fatal, stepping into the instant zone always is
    DoNotLook {
        trigger_zone: Zone,
        instant_zone: Option<Zone>,
        max_distance: f32,
    },
    // Entering the zone sets the monster running; be out of the room before the window closes
    Running { trigger_zone: Zone, window_secs: f32 },
}

impl EncounterKind {
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::HidingSpot { .. } => Category::HidingSpot,
            Self::Corner { .. } => Category::Corner,
            Self::DoNotOpen { .. } => Category::DoNotOpen,
            Self::CloseQuickly { .. } => Category::CloseQuickly,
            Self::DoNotLook { .. } => Category::DoNotLook,
            Self::Running { .. } => Category::Running,
        }
    }

    #[must_use]
    pub const fn required_hiding_spot(&self) -> Option<HidingSpot> {
        match self {
            Self::HidingSpot { hiding_spot } => Some(*hiding_spot),
            _ => None,
        }
    }

    // Encounters whose outcome is decided by the knock sequence after the chores are done
    #[must_use]
    pub const fn is_objective_gated(&self) -> bool {
        matches!(self, Self::HidingSpot { .. })
    }

    fn zones(&self) -> Vec<&Zone> {
        match self {
            Self::Corner { danger_zone, .. } => vec![danger_zone],
            Self::DoNotLook {
                trigger_zone,
                instant_zone,
                ..
            } => std::iter::once(trigger_zone).chain(instant_zone.as_ref()).collect(),
            Self::Running { trigger_zone, .. } => vec![trigger_zone],
            Self::HidingSpot { .. } | Self::DoNotOpen { .. } | Self::CloseQuickly { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Encounter {
    pub id: String,
    pub probability: f32,
    pub death_reason: String,
    pub monster: MonsterPose,
    pub animation: String,
    #[cfg_attr(feature = "json", serde(default))]
    pub requires_sound: bool,
    pub kind: EncounterKind,
}

impl Encounter {
    #[must_use]
    pub const fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.id.is_empty(), "encounter has an empty id");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.probability),
            "encounter '{}' has probability {} outside [0, 1]",
            self.id,
            self.probability
        );
        anyhow::ensure!(
            !self.death_reason.trim().is_empty(),
            "encounter '{}' has no death reason",
            self.id
        );
        for zone in self.kind.zones() {
            anyhow::ensure!(
                zone.scale.min_element() >= 0.0,
                "encounter '{}' has a zone with negative scale {:?}",
                self.id,
                zone.scale
            );
        }
        match &self.kind {
            EncounterKind::CloseQuickly { window_secs, .. } | EncounterKind::Running { window_secs, .. } => {
                anyhow::ensure!(
                    window_secs.is_finite() && *window_secs > 0.0,
                    "encounter '{}' has window {} that is not a positive number of seconds",
                    self.id,
                    window_secs
                );
            }
            EncounterKind::Corner { max_distance, .. } | EncounterKind::DoNotLook { max_distance, .. } => {
                anyhow::ensure!(
                    max_distance.is_finite() && *max_distance > 0.0,
                    "encounter '{}' has trigger distance {} that is not a positive length",
                    self.id,
                    max_distance
                );
            }
            EncounterKind::HidingSpot { .. } | EncounterKind::DoNotOpen { .. } => {}
        }
        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct EncounterGroup {
    pub category: Category,
    pub encounters: Vec<Encounter>,
}

// Every encounter a playthrough can draw from, grouped by category in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct LevelCatalog {
    pub groups: Vec<EncounterGroup>,
}

impl LevelCatalog {
    #[must_use]
    pub const fn new(groups: Vec<EncounterGroup>) -> Self {
        Self { groups }
    }

    // All encounters in declaration order; indices into this sequence identify encounters
    pub fn flatten(&self) -> impl Iterator<Item = &Encounter> {
        self.groups.iter().flat_map(|group| group.encounters.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.encounters.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Encounter> {
        self.flatten().nth(index)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for group in &self.groups {
            for encounter in &group.encounters {
                anyhow::ensure!(
                    encounter.category() == group.category,
                    "encounter '{}' is a {:?} encounter listed under {:?}",
                    encounter.id,
                    encounter.category(),
                    group.category
                );
                encounter.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "json")]
impl LevelCatalog {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let catalog: Self = serde_json::from_str(json).context("Failed to parse level catalog")?;
        catalog.validate().context("Invalid level catalog")?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
