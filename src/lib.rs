//! Spin Doctor - a rotating-wand grid puzzle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wand rotation, latching, collisions, game loop)
//! - `renderer`: Draw-list generation for an external drawing surface
//! - `audio`: Sound effect triggers and the sink trait collaborators implement
//! - `levels`: Built-in level catalog
//! - `scores`: In-memory score banking
//! - `settings`: Runtime configuration
//! - `pilot`: Seeded idle input driver for the headless runner

pub mod audio;
pub mod levels;
pub mod pilot;
pub mod renderer;
pub mod scores;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, SoundEffect};
pub use scores::ScoreBook;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World units per grid cell
    pub const SCALE: f32 = 64.0;
    /// Playfield size in grid cells
    pub const MAX_WIDTH: usize = 9;
    pub const MAX_HEIGHT: usize = 7;

    /// Fixed tick interval of the game loop (ms)
    pub const TICK_INTERVAL_MS: u32 = 30;

    /// Per-axis tolerance for "wand tip is over an anchor"
    pub const CLOSE_EPSILON: f32 = 1.3;
    /// Obstacles farther than this from a pivot can never touch its wand
    pub const FAR_DISTANCE: f32 = SCALE * 2.0;

    /// Wand defaults
    pub const WAND_LENGTH: f32 = SCALE;
    /// Degrees per tick
    pub const WAND_SPEED: f32 = 1.5;
    /// Wand-vs-wand checks use segments shortened by this much
    pub const WAND_SHORTEN: f32 = 2.0;
    /// Two wands on one anchor closer than this (degrees) collide
    pub const SHARED_ANCHOR_MIN_SEPARATION: f32 = 40.0;

    /// Ticks a wall bounce pushes the player back
    pub const BOUNCE_BACKOFF_TICKS: u32 = 2;

    /// Gate openness change per tick
    pub const GATE_ALPHA_STEP: f32 = 0.05;
    /// Ticks before a pressed field releases
    pub const FIELD_RELEASE_TICKS: u32 = 100;
    pub const FIELD_HALF_EXTENT: f32 = SCALE / 4.0;
    pub const SPIKE_HALF_EXTENT: f32 = SCALE / 8.0;

    /// Death fade: frame counter runs 0..MAX in STEP increments
    pub const DEATH_FADE_MAX: u32 = 200;
    pub const DEATH_FADE_STEP: u32 = 3;

    /// Grid cell bit layout
    pub const MASK_TYPE: u8 = 0x0f;
    pub const MASK_EPHEMERAL: u8 = 0x10;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Point at `length` from `origin` along `angle` (degrees)
#[inline]
pub fn polar_offset(origin: Vec2, angle: f32, length: f32) -> Vec2 {
    let theta = angle.to_radians();
    origin + Vec2::new(theta.cos(), theta.sin()) * length
}

/// Grid cell to world coordinates
#[inline]
pub fn cell_to_world(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y) * consts::SCALE
}
