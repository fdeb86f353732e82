//! Per-frame simulation tick
//!
//! Core game loop that advances every system in a fixed order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::update_camera;
use super::collision::{
    player_enemy_collisions, player_pickup_collisions, projectile_enemy_collisions,
};
use super::movement::{DirectionKeys, move_player, update_enemies, update_projectiles};
use super::progression::{
    collect_pickup, damage_player, resolve_projectile_hits, update_invulnerability,
};
use super::spawn::{enforce_population_cap, run_spawner};
use super::state::{GameEvent, GamePhase, GameState};
use super::weapons::fire_all;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held direction keys
    pub keys: DirectionKeys,
    /// Swipe/joystick vector; overrides the keys when present
    pub swipe: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Monotonic wall-clock timestamp (ms)
    pub now_ms: f64,
}

/// Advance the game state by one frame
///
/// `dt` is wall-clock seconds since the previous frame; it is clamped to
/// `MAX_FRAME_DT` so a stalled host cannot teleport entities.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // The menu owns the pause state until an upgrade is picked
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                log::debug!("Resumed");
            }
            GamePhase::UpgradeMenu | GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Running {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.events.clear();
    state.game_time_ms += dt as f64 * 1000.0;
    state.stats.time_alive_secs = state.game_time_ms / 1000.0;

    let now = state.effect_clock(input.now_ms);
    update_invulnerability(state, now);

    // Player, camera, weapons
    move_player(state, input.keys, input.swipe, dt);
    update_camera(state);
    fire_all(state, now);

    // Enemies and projectiles
    update_enemies(state, dt);
    update_projectiles(state, now, dt);

    // Projectile hits
    let hits = projectile_enemy_collisions(&mut state.projectiles, &state.enemies);
    resolve_projectile_hits(state, &hits, now);

    // Contact damage
    for contact in player_enemy_collisions(&state.player, &state.enemies) {
        if damage_player(state, contact.damage, now) {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
            log::info!(
                "Game over at {:.1}s: level {}, {} kills",
                state.stats.time_alive_secs,
                state.player.level,
                state.stats.enemies_killed
            );
            return;
        }
    }

    // Pickups
    for id in player_pickup_collisions(&state.player, &state.pickups) {
        collect_pickup(state, id);
    }

    // Spawning
    run_spawner(state);
    enforce_population_cap(state);

    state.normalize_order();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::progression::gain_experience;
    use crate::sim::state::{Enemy, EnemyKind, Pickup, PickupKind};

    const FRAME: f32 = 1.0 / 60.0;

    fn at(now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345);
        tick(&mut state, &at(0.0), FRAME);
        let time = state.game_time_ms;

        // Pause
        let pause = TickInput {
            pause: true,
            ..at(16.0)
        };
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.is_paused());

        // Paused ticks are no-ops
        tick(&mut state, &at(32.0), FRAME);
        assert_eq!(state.game_time_ms, time);

        // Unpause resumes within the same tick
        let resume = TickInput {
            pause: true,
            ..at(48.0)
        };
        tick(&mut state, &resume, FRAME);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.game_time_ms > time);
    }

    #[test]
    fn test_pause_ignored_while_menu_open() {
        let mut state = GameState::new(1);
        gain_experience(&mut state, 10);
        assert_eq!(state.phase, GamePhase::UpgradeMenu);

        let pause = TickInput {
            pause: true,
            ..at(100.0)
        };
        let time = state.game_time_ms;
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::UpgradeMenu);
        assert_eq!(state.game_time_ms, time);
    }

    #[test]
    fn test_dt_clamped() {
        let mut state = GameState::new(1);
        tick(&mut state, &at(0.0), 5.0);
        assert!((state.game_time_ms - 100.0).abs() < 1e-3);
        assert!((state.stats.time_alive_secs - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_first_tick_spawns_and_fires() {
        let mut state = GameState::new(7);
        tick(&mut state, &at(10_000.0), FRAME);
        assert!(!state.enemies.is_empty());
        assert!(!state.projectiles.is_empty());
    }

    #[test]
    fn test_contact_death_ends_run() {
        let mut state = GameState::new(1);
        state.player.health = 5.0;
        let pos = state.player.pos;
        state
            .enemies
            .push(Enemy::new(900, EnemyKind::Tank, pos, 1.0));
        tick(&mut state, &at(5000.0), FRAME);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.health, 0.0);
        assert!(state.events.contains(&GameEvent::GameOver));

        // Terminal: further ticks change nothing
        let time = state.game_time_ms;
        tick(&mut state, &at(6000.0), FRAME);
        assert_eq!(state.game_time_ms, time);
    }

    #[test]
    fn test_pickups_collected_in_reach() {
        let mut state = GameState::new(1);
        let pos = state.player.pos + Vec2::new(100.0, 0.0);
        state.pickups.push(Pickup {
            id: 500,
            kind: PickupKind::Experience,
            pos,
            value: 3,
        });
        tick(&mut state, &at(0.0), FRAME);
        assert_eq!(state.player.experience, 3);
        assert!(state.pickups.iter().all(|p| p.id != 500));
    }

    #[test]
    fn test_two_level_ups_in_one_tick_need_one_pick() {
        let mut state = GameState::new(1);
        for (id, value) in [(500, 10), (501, 14)] {
            let pos = state.player.pos + Vec2::new(50.0, 0.0);
            state.pickups.push(Pickup {
                id,
                kind: PickupKind::Experience,
                pos,
                value,
            });
        }
        tick(&mut state, &at(0.0), FRAME);
        assert_eq!(state.phase, GamePhase::UpgradeMenu);
        assert_eq!(state.player.level, 3);
        assert_eq!(state.upgrade_options.len(), UPGRADE_CHOICES);

        let option = state.upgrade_options[0].clone();
        crate::sim::select_upgrade(&mut state, &option).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_simulation_clock_freezes_cooldowns_while_paused() {
        let mut state = GameState::from_settings(&crate::Settings {
            cooldown_clock: crate::CooldownClock::Simulation,
            ..Default::default()
        });
        state.player.weapons[0].cooldown_ms = 10.0;
        // Wall clock far ahead; cooldowns only see game time
        tick(&mut state, &at(1_000_000.0), FRAME);
        let fired = state.player.weapons[0].last_fired;
        assert!((fired - state.game_time_ms).abs() < 1e-9);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for i in 0..600 {
            let input = TickInput {
                keys: DirectionKeys {
                    left: i % 120 < 60,
                    up: i % 90 < 30,
                    ..Default::default()
                },
                now_ms: i as f64 * 16.0,
                ..Default::default()
            };
            tick(&mut state1, &input, FRAME);
            tick(&mut state2, &input, FRAME);
        }

        assert_eq!(state1.game_time_ms, state2.game_time_ms);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.stats, state2.stats);
    }
}
