//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and frame
//! timings a run replays identically:
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod movement;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapons;

pub use clock::SimulationClock;
pub use collision::{Aabb, check_collision};
pub use movement::DirectionKeys;
pub use state::{
    Enemy, EnemyKind, EntityId, GameEvent, GamePhase, GameState, GameStats, PassiveKind, Pickup,
    PickupKind, Player, Projectile, Snapshot, UpgradeKind, UpgradeOption, Weapon, WeaponKind,
};
pub use tick::{TickInput, tick};
pub use upgrades::select_upgrade;
