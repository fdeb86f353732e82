//! Idle/demo mode - the game plays itself
//!
//! Flees the nearest enemy when it gets close, otherwise walks to the nearest
//! pickup. Used by the headless runner and handy for soak tests.

use glam::Vec2;

use super::state::{GameState, UpgradeOption};
use super::tick::TickInput;

/// Enemies closer than this (center to center) trigger a retreat
const DANGER_RADIUS: f32 = 200.0;

/// Input for this frame
pub fn autopilot_input(state: &GameState, now_ms: f64) -> TickInput {
    let center = state.player.center();

    let nearest_enemy = state
        .enemies
        .iter()
        .map(|e| e.center())
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));

    let swipe = match nearest_enemy {
        Some(enemy) if enemy.distance(center) < DANGER_RADIUS => {
            let away = (center - enemy).normalize_or_zero();
            // Enemy exactly on top of us: any direction will do
            Some(if away == Vec2::ZERO { Vec2::X } else { away })
        }
        _ => state
            .pickups
            .iter()
            .map(|p| p.center())
            .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)))
            .map(|target| (target - center).normalize_or_zero()),
    };

    TickInput {
        swipe,
        now_ms,
        ..Default::default()
    }
}

/// Upgrade the autopilot takes: always the first offer
pub fn autopilot_upgrade(state: &GameState) -> Option<UpgradeOption> {
    state.upgrade_options.first().cloned()
}
