//! Movement integration for the player, enemies and projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Facing, GameState};
use crate::clamp_to_world;
use crate::consts::PROJECTILE_BOUNDS_BUFFER;

/// Held direction keys (keyboard or d-pad)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Facing along the dominant axis of a direction
fn dominant_facing(dir: Vec2) -> Facing {
    if dir.x.abs() > dir.y.abs() {
        if dir.x > 0.0 { Facing::Right } else { Facing::Left }
    } else if dir.y > 0.0 {
        Facing::Down
    } else {
        Facing::Up
    }
}

/// Move the player from swipe or key input
///
/// A swipe vector, when present, is authoritative and the keys are ignored.
/// Key input is not normalized: holding two perpendicular keys moves at
/// `speed * sqrt(2)`.
pub fn move_player(state: &mut GameState, keys: DirectionKeys, swipe: Option<Vec2>, dt: f32) {
    let extent = state.world_extent();
    let player = &mut state.player;

    let mut delta = Vec2::ZERO;
    let mut facing = Facing::Idle;
    let mut moving = false;

    if let Some(swipe) = swipe {
        let dir = swipe.normalize_or_zero();
        if dir != Vec2::ZERO {
            delta = dir * player.speed * dt;
            facing = dominant_facing(dir);
            moving = true;
            player.last_direction = Some(dir);
        }
    } else {
        let mut dir = Vec2::ZERO;
        // Later keys win the facing, so horizontal input dominates diagonals
        if keys.up {
            dir.y -= 1.0;
            facing = Facing::Up;
        }
        if keys.down {
            dir.y += 1.0;
            facing = Facing::Down;
        }
        if keys.left {
            dir.x -= 1.0;
            facing = Facing::Left;
        }
        if keys.right {
            dir.x += 1.0;
            facing = Facing::Right;
        }
        moving = keys.any();
        delta = dir * player.speed * dt;
        if dir != Vec2::ZERO {
            player.last_direction = Some(dir.normalize());
        }
    }

    player.pos = clamp_to_world(player.pos + delta, player.size, extent);
    player.facing = facing;
    player.moving = moving;
}

/// Steer every enemy straight at the player's center
pub fn update_enemies(state: &mut GameState, dt: f32) {
    let extent = state.world_extent();
    let target = state.player.center();

    for enemy in &mut state.enemies {
        let dir = (target - enemy.center()).normalize_or_zero();
        let next = enemy.pos + dir * enemy.speed * dt;
        enemy.pos = clamp_to_world(next, enemy.size, extent);
    }
}

/// Expire finished or escaped projectiles, then advance the rest
pub fn update_projectiles(state: &mut GameState, now: f64, dt: f32) {
    let extent = state.world_extent();
    let before = state.projectiles.len();

    state.projectiles.retain(|p| {
        if now - p.created_at > p.duration_ms {
            return false;
        }
        let max = p.bounds().max();
        let out_of_bounds = max.x < -PROJECTILE_BOUNDS_BUFFER
            || max.y < -PROJECTILE_BOUNDS_BUFFER
            || p.pos.x > extent.x + PROJECTILE_BOUNDS_BUFFER
            || p.pos.y > extent.y + PROJECTILE_BOUNDS_BUFFER;
        !out_of_bounds
    });

    let expired = before - state.projectiles.len();
    if expired > 0 {
        log::trace!("{expired} projectiles expired");
    }

    for p in &mut state.projectiles {
        p.pos += p.direction * p.speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, Projectile, WeaponKind};

    fn state_at(pos: Vec2) -> GameState {
        let mut state = GameState::new(1);
        state.player.pos = pos;
        state
    }

    #[test]
    fn test_diagonal_keys_not_normalized() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        let keys = DirectionKeys {
            up: true,
            left: true,
            ..Default::default()
        };
        move_player(&mut state, keys, None, 0.1);
        // 200 px/s for 0.1 s on both axes
        assert!((state.player.pos - Vec2::new(480.0, 480.0)).length() < 1e-3);
        assert_eq!(state.player.facing, Facing::Left);
        assert!(state.player.moving);
        let dir = state.player.last_direction.unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_swipe_overrides_keys() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        let keys = DirectionKeys {
            left: true,
            ..Default::default()
        };
        move_player(&mut state, keys, Some(Vec2::new(0.0, 1.0)), 0.5);
        assert_eq!(state.player.pos, Vec2::new(500.0, 600.0));
        assert_eq!(state.player.facing, Facing::Down);
        assert_eq!(state.player.last_direction, Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_zero_swipe_does_not_move_or_poison_direction() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        state.player.last_direction = Some(Vec2::new(1.0, 0.0));
        move_player(&mut state, DirectionKeys::default(), Some(Vec2::ZERO), 0.5);
        assert_eq!(state.player.pos, Vec2::new(500.0, 500.0));
        assert!(!state.player.moving);
        assert_eq!(state.player.last_direction, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_last_direction_persists_when_idle() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        let keys = DirectionKeys {
            right: true,
            ..Default::default()
        };
        move_player(&mut state, keys, None, 0.1);
        move_player(&mut state, DirectionKeys::default(), None, 0.1);
        assert_eq!(state.player.facing, Facing::Idle);
        assert!(!state.player.moving);
        assert_eq!(state.player.last_direction, Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_player_clamped_to_world() {
        // World is 1200 x 900 for the default 800 x 600 viewport
        let mut state = state_at(Vec2::new(1160.0, 5.0));
        let keys = DirectionKeys {
            up: true,
            right: true,
            ..Default::default()
        };
        move_player(&mut state, keys, None, 1.0);
        assert_eq!(state.player.pos, Vec2::new(1168.0, 0.0));
    }

    #[test]
    fn test_enemy_steers_toward_player_center() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        // Enemy center (304, 516) is level with the player center (516, 516)
        state.enemies.push(Enemy::new(9, EnemyKind::Basic, Vec2::new(292.0, 504.0), 1.0));
        update_enemies(&mut state, 0.5);
        assert_eq!(state.enemies[0].pos, Vec2::new(332.0, 504.0));
    }

    #[test]
    fn test_enemy_on_player_center_stays_finite() {
        let mut state = state_at(Vec2::new(500.0, 500.0));
        // 24px enemy centered on the 32px player
        state.enemies.push(Enemy::new(9, EnemyKind::Basic, Vec2::new(504.0, 504.0), 1.0));
        update_enemies(&mut state, 0.5);
        let pos = state.enemies[0].pos;
        assert!(pos.is_finite());
        assert_eq!(pos, Vec2::new(504.0, 504.0));
    }

    fn bolt(id: u32, pos: Vec2, created_at: f64) -> Projectile {
        Projectile {
            id,
            weapon: WeaponKind::Knife,
            pos,
            size: Vec2::splat(16.0),
            speed: 100.0,
            damage: 1.0,
            direction: Vec2::new(1.0, 0.0),
            duration_ms: 2000.0,
            created_at,
            passthrough: false,
            hit_enemies: Vec::new(),
        }
    }

    #[test]
    fn test_projectiles_advance_and_expire() {
        let mut state = GameState::new(1);
        state.projectiles.push(bolt(1, Vec2::new(100.0, 100.0), 1000.0));
        state.projectiles.push(bolt(2, Vec2::new(100.0, 100.0), 0.0));
        update_projectiles(&mut state, 2500.0, 0.5);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(150.0, 100.0));

        // Exactly at the duration is still alive
        update_projectiles(&mut state, 3000.0, 0.0);
        assert_eq!(state.projectiles.len(), 1);
        update_projectiles(&mut state, 3000.5, 0.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectiles_leaving_world_are_dropped() {
        let mut state = GameState::new(1);
        state.projectiles.push(bolt(1, Vec2::new(1301.0, 100.0), 0.0));
        state.projectiles.push(bolt(2, Vec2::new(-117.0, 100.0), 0.0));
        state.projectiles.push(bolt(3, Vec2::new(1299.0, 100.0), 0.0));
        update_projectiles(&mut state, 10.0, 0.0);
        let ids: Vec<_> = state.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
