//! Horde Arena - a top-down survival arena simulation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (movement, spawning, weapons, collisions, progression)
//! - `settings`: Run configuration (seed, character class, viewport, clock policy)
//! - `error`: Caller-facing error type
//!
//! Rendering, UI and raw input capture live outside this crate. The host feeds a
//! normalized [`sim::TickInput`] every frame and reads back [`sim::Snapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{CharacterClass, CooldownClock, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed into a tick (seconds). Longer stalls are clamped.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playable world extent as a multiple of the viewport size
    pub const WORLD_SCALE: f32 = 1.5;
    /// Camera offset limit as a multiple of the viewport size
    pub const CAMERA_LIMIT_SCALE: f32 = 0.5;
    /// Default viewport before the host reports its surface size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const FIRST_LEVEL_THRESHOLD: u32 = 10;
    /// Experience threshold growth per level, in percent (floored)
    pub const LEVEL_THRESHOLD_GROWTH_PCT: u64 = 140;
    /// Invulnerability window after taking contact damage (ms)
    pub const INVULNERABILITY_MS: f64 = 1000.0;

    /// Pickups
    pub const PICKUP_SIZE: f32 = 16.0;
    /// Extra reach on every side of the player box when collecting pickups
    pub const PICKUP_REACH: f32 = 120.0;
    pub const HEALTH_DROP_CHANCE: f64 = 0.05;
    pub const HEALTH_DROP_VALUE: f32 = 10.0;
    pub const HEALTH_DROP_OFFSET: f32 = 20.0;

    /// Projectiles outside the world by more than this are discarded
    pub const PROJECTILE_BOUNDS_BUFFER: f32 = 100.0;

    /// Weapons
    pub const MAX_WEAPON_LEVEL: u32 = 8;
    pub const WEAPON_LEVEL_DAMAGE_MULT: f32 = 1.2;
    pub const NEW_WEAPON_DAMAGE: f32 = 10.0;
    pub const NEW_WEAPON_COOLDOWN_MS: f64 = 1000.0;
    /// Angle between adjacent knives in a fan (radians)
    pub const KNIFE_SPREAD: f32 = 0.2;
    pub const KNIFE_DURATION_MS: f64 = 2000.0;
    pub const WAND_DURATION_MS: f64 = 2000.0;
    pub const AXE_DURATION_MS: f64 = 3000.0;
    pub const BIBLE_DURATION_MS: f64 = 500.0;
    pub const BIBLE_ORBIT_RADIUS: f32 = 60.0;
    pub const GARLIC_DURATION_MS: f64 = 1000.0;

    /// Passive modifiers, per stack
    pub const MIGHT_PER_STACK: f32 = 0.10;
    pub const AREA_PER_STACK: f32 = 0.10;
    pub const COOLDOWN_PER_STACK: f64 = 0.08;
    pub const DURATION_PER_STACK: f64 = 0.15;
    pub const MAX_HEALTH_PASSIVE: f32 = 20.0;
    pub const SPEED_PASSIVE: f32 = 20.0;

    /// Spawning
    pub const SPAWN_EDGE_BUFFER: f32 = 50.0;
    /// Enemy spawn positions are clamped as if every enemy were this large
    pub const SPAWN_CLAMP_SIZE: f32 = 32.0;
    pub const BOSS_DRAW_CHANCE: f64 = 0.05;
    pub const MAX_DIFFICULTY: f32 = 5.0;

    /// Population cap: min(MAX, BASE + floor(t / STEP))
    pub const POPULATION_CAP_MAX: usize = 50;
    pub const POPULATION_CAP_BASE: usize = 20;
    pub const POPULATION_CAP_STEP_MS: f64 = 30_000.0;

    /// Number of upgrade options presented on level-up
    pub const UPGRADE_CHOICES: usize = 3;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Clamp into `[0, max]`, collapsing to 0 when `max` is negative
///
/// `f32::clamp` panics on an inverted range, which happens whenever an entity is
/// larger than the world (tiny viewports).
#[inline]
pub fn clamp_extent(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

/// Clamp a top-left position so a box of `size` stays inside `[0, extent]`
#[inline]
pub fn clamp_to_world(pos: Vec2, size: Vec2, extent: Vec2) -> Vec2 {
    Vec2::new(
        clamp_extent(pos.x, extent.x - size.x),
        clamp_extent(pos.y, extent.y - size.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_extent_inverted_range() {
        assert_eq!(clamp_extent(50.0, -10.0), 0.0);
        assert_eq!(clamp_extent(-5.0, 100.0), 0.0);
        assert_eq!(clamp_extent(150.0, 100.0), 100.0);
    }

    #[test]
    fn test_clamp_to_world() {
        let pos = clamp_to_world(Vec2::new(1190.0, -3.0), Vec2::splat(32.0), Vec2::new(1200.0, 900.0));
        assert_eq!(pos, Vec2::new(1168.0, 0.0));
    }
}
