// ============================================================================
// Grid & World Transform
// ============================================================================

pub const GRID_SCALE: f32 = 10.0; // Grid units per world unit
pub const GRID_OFFSET_X: f32 = 9.0; // World x offset so every hotel cell is non-negative
pub const GRID_OFFSET_Z: f32 = 8.0; // World z offset so every hotel cell is non-negative
pub const GRID_COLS: i32 = 400; // Number of grid columns (X axis)
pub const GRID_ROWS: i32 = 160; // Number of grid rows (Z axis)

// ============================================================================
// Hotel Layout (world units)
// ============================================================================

pub const ROOM_COUNT: usize = 12; // Physical room slots, two per corridor column
pub const ROOM_PITCH: f32 = 5.0; // Corridor length taken by one column of rooms
pub const ROOM_DEPTH: f32 = 6.0; // Distance from the corridor wall to the back wall
pub const CORRIDOR_HALF_WIDTH: f32 = 1.0;
pub const WALL_THICKNESS: f32 = 0.2;

pub const RECEPTION_MIN_X: f32 = -8.0;
pub const RECEPTION_HALF_DEPTH: f32 = 4.0;

// ============================================================================
// Player
// ============================================================================

pub const PLAYER_SPAWN_X: f32 = -4.0;
pub const PLAYER_SPAWN_Z: f32 = 0.0;

// Heights above the floor (meters)
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_CROUCH_HEIGHT: f32 = 1.0;
pub const PLAYER_EYE_HEIGHT: f32 = 1.6;
pub const PLAYER_CROUCH_EYE_HEIGHT: f32 = 0.9;
pub const CEILING_HEIGHT: f32 = 2.6;

// Step thresholds for climbable furniture
pub const LOW_STEP_HEIGHT: f32 = 0.5;
pub const HIGH_STEP_HEIGHT: f32 = 0.7;

// Vertical motion
pub const JUMP_SPEED: f32 = 4.0; // meters per second
pub const GRAVITY: f32 = 9.81; // meters per second squared

// Speeds (meters per second)
pub const SPEED_WALK: f32 = 2.5;
pub const SPEED_CROUCH: f32 = 1.2;

// ============================================================================
// Room Assignment
// ============================================================================

pub const DEFAULT_EMPTY_RATIO: f32 = 0.2;

// ============================================================================
// Encounters
// ============================================================================

pub const KNOCK_DURATION: f32 = 6.0; // seconds between the first knock and the door opening
pub const MONSTER_DEPART_DELAY: f32 = 3.0; // seconds the leaving animation holds the monster in the room
pub const MAX_TIMER_SECS: f32 = 3600.0; // longest delay any scheduled task or restart may wait

// ============================================================================
// Floating-Point Comparisons
// ============================================================================

pub const PHYSICS_EPSILON: f32 = 1e-6;
