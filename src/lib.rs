//! Scrapstorm - simulation core for an arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, system pipeline, RNG)
//! - `engine`: Facade owning the world, input latch and snapshot emission
//! - `game_loop`: Fixed-timestep accumulator driver
//! - `hud`: Snapshot types handed to rendering/UI collaborators
//! - `settings`: Consumed preferences bag (cosmetic-only effects)

pub mod engine;
pub mod game_loop;
pub mod hud;
pub mod settings;
pub mod sim;

pub use engine::{Engine, RestartMode};
pub use game_loop::FixedStep;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frame delta clamp - avoids runaway catch-up after a suspend
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;
    /// Soft boundary margin: a push-back force ramps up inside this band
    pub const BOUNDARY_MARGIN: f32 = 36.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_MAX_SPEED: f32 = 220.0;
    pub const PLAYER_ACCEL: f32 = 900.0;
    /// Blend factor for steering toward lateral intent
    pub const TURN_BLEND: f32 = 0.65;
    /// Exponential decay constants (per second) for velocity components
    pub const FORWARD_DECAY: f32 = 2.4;
    pub const LATERAL_DECAY: f32 = 4.8;
    /// Extra lateral damping with no input (drift killing)
    pub const IDLE_LATERAL_DECAY: f32 = 9.0;

    /// Dash
    pub const DASH_IMPULSE: f32 = 340.0;
    pub const DASH_COOLDOWN: f32 = 1.6;
    pub const DASH_INVULN: f32 = 0.35;
    /// Post-hit grace window and the damage scale applied inside it
    pub const GRACE_DURATION: f32 = 0.5;
    pub const GRACE_DAMAGE_SCALE: f32 = 0.3;

    /// Spawning
    pub const SPAWN_COOLDOWN_BASE: f32 = 0.8;
    pub const SPAWN_COOLDOWN_FLOOR: f32 = 0.25;
    pub const SAFE_SPAWN_RADIUS: f32 = 140.0;
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 40;

    /// Scheduled waves
    pub const WAVE_INTERVAL: f32 = 45.0;
    pub const WAVE_DURATION: f32 = 8.0;

    /// Boss
    pub const BOSS_SPAWN_TIME: f32 = 180.0;

    /// Scrap pickups
    pub const SCRAP_LIFETIME: f32 = 20.0;
    pub const MAGNET_RADIUS: f32 = 80.0;
    pub const PICKUP_RADIUS: f32 = 14.0;

    /// Leveling: threshold grows by `round(prev * 1.3 + 4)` each level
    pub const XP_GROWTH_MUL: f32 = 1.3;
    pub const XP_GROWTH_ADD: f32 = 4.0;
    pub const XP_TO_FIRST_LEVEL: f32 = 10.0;

    /// Cosmetic caps
    pub const MAX_PARTICLES: usize = 256;
    pub const TRAIL_LENGTH: usize = 16;
}

/// Normalize a vector, falling back to a default unit vector when the
/// length is near zero. NaN/Infinity must never leak into positions.
#[inline]
pub fn safe_normalize(v: Vec2, fallback: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > 1e-8 { v / len_sq.sqrt() } else { fallback }
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Exponential decay factor for a rate over dt (frame-rate independent)
#[inline]
pub fn decay_factor(rate: f32, dt: f32) -> f32 {
    (-rate * dt).exp()
}
