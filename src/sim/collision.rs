//! Collision detection
//!
//! Everything in the arena is an axis-aligned box anchored at its top-left
//! corner. Detection only reports; damage and removal happen in progression.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, Pickup, Player, Projectile};
use crate::consts::PICKUP_REACH;

/// Axis-aligned bounding box (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Grow by `amount` on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            pos: self.pos - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// Strict overlap test; boxes that only touch along an edge do not collide
#[inline]
pub fn check_collision(a: &Aabb, b: &Aabb) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// A projectile touching an enemy it has not hit before
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub projectile: EntityId,
    pub enemy: EntityId,
    pub damage: f32,
}

/// An enemy overlapping the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactHit {
    pub enemy: EntityId,
    pub damage: f32,
}

/// Find projectile/enemy overlaps
///
/// Passthrough projectiles record every enemy they touch so the same instance
/// never reports that enemy again. Any other projectile reports at most one hit,
/// since it is consumed by it.
pub fn projectile_enemy_collisions(
    projectiles: &mut [Projectile],
    enemies: &[Enemy],
) -> Vec<ProjectileHit> {
    let mut hits = Vec::new();

    for projectile in projectiles.iter_mut() {
        let bounds = projectile.bounds();
        for enemy in enemies {
            if projectile.has_hit(enemy.id) {
                continue;
            }
            if !check_collision(&bounds, &enemy.bounds()) {
                continue;
            }

            hits.push(ProjectileHit {
                projectile: projectile.id,
                enemy: enemy.id,
                damage: projectile.damage,
            });

            if projectile.passthrough {
                projectile.hit_enemies.push(enemy.id);
            } else {
                break;
            }
        }
    }

    hits
}

/// Every enemy overlapping the player, every tick
pub fn player_enemy_collisions(player: &Player, enemies: &[Enemy]) -> Vec<ContactHit> {
    let bounds = player.bounds();
    enemies
        .iter()
        .filter(|e| check_collision(&bounds, &e.bounds()))
        .map(|e| ContactHit {
            enemy: e.id,
            damage: e.damage,
        })
        .collect()
}

/// Pickups within reach; the player box is expanded generously
pub fn player_pickup_collisions(player: &Player, pickups: &[Pickup]) -> Vec<EntityId> {
    let reach = player.bounds().expand(PICKUP_REACH);
    pickups
        .iter()
        .filter(|p| check_collision(&reach, &p.bounds()))
        .map(|p| p.id)
        .collect()
}
