//! Damage, death, pickups and leveling
//!
//! Collision detection only reports overlaps; this module turns them into
//! health changes, kills, drops and experience.

use glam::Vec2;
use rand::Rng;

use super::collision::ProjectileHit;
use super::state::{EntityId, GameEvent, GamePhase, GameState, Pickup, PickupKind};
use super::upgrades::generate_upgrade_options;
use crate::consts::*;

/// Damage an enemy; returns true if this call killed it
///
/// Unknown ids (already removed) are a no-op.
pub fn damage_enemy(state: &mut GameState, id: EntityId, amount: f32, now: f64) -> bool {
    let Some(index) = state.enemies.iter().position(|e| e.id == id) else {
        return false;
    };

    let enemy = &mut state.enemies[index];
    enemy.health = (enemy.health - amount).max(0.0);
    enemy.last_hit = now;
    state.stats.damage_dealt += amount as f64;

    if enemy.health > 0.0 {
        return false;
    }

    let dead = state.enemies.remove(index);
    state.stats.enemies_killed += 1;
    state.events.push(GameEvent::EnemyKilled {
        id: dead.id,
        kind: dead.kind,
    });
    log::trace!("Enemy {} ({:?}) killed", dead.id, dead.kind);
    true
}

/// Damage the player; returns true if health is now depleted
///
/// Ignored while the invulnerability window from the previous hit is open.
pub fn damage_player(state: &mut GameState, amount: f32, now: f64) -> bool {
    let player = &mut state.player;
    if player.invulnerable && now - player.invulnerable_since < INVULNERABILITY_MS {
        return false;
    }

    player.health = (player.health - amount).max(0.0);
    player.invulnerable = true;
    player.invulnerable_since = now;

    state.events.push(GameEvent::PlayerHit {
        damage: amount,
        health: player.health,
    });
    player.health <= 0.0
}

/// Close the invulnerability window once it has run its course
pub fn update_invulnerability(state: &mut GameState, now: f64) {
    let player = &mut state.player;
    if player.invulnerable && now - player.invulnerable_since > INVULNERABILITY_MS {
        player.invulnerable = false;
    }
}

/// Add experience and level up when the threshold is reached
pub fn gain_experience(state: &mut GameState, amount: u32) {
    state.player.experience += amount;
    state.stats.experience_collected += amount as u64;

    if state.player.experience >= state.player.experience_to_next_level {
        level_up(state);
    }
}

/// Advance one level and open the upgrade menu
///
/// Leftover experience is discarded rather than carried into the next level.
/// Leveling again while the menu is already open replaces the offer with one
/// built for the new level; a single pick still closes the menu.
pub fn level_up(state: &mut GameState) {
    let player = &mut state.player;
    player.level += 1;
    player.experience = 0;
    // Integer math so floor(threshold * 1.4) is exact
    let grown = player.experience_to_next_level as u64 * LEVEL_THRESHOLD_GROWTH_PCT / 100;
    player.experience_to_next_level = u32::try_from(grown).unwrap_or(u32::MAX);

    let level = player.level;
    state.stats.max_level = state.stats.max_level.max(level);
    state.events.push(GameEvent::LevelUp { level });

    state.upgrade_options = generate_upgrade_options(&state.player, &mut state.rng);
    state.phase = GamePhase::UpgradeMenu;
    log::debug!(
        "Level up to {level}; next at {} xp",
        state.player.experience_to_next_level
    );
}

/// Collect a pickup by id; returns false if it no longer exists
pub fn collect_pickup(state: &mut GameState, id: EntityId) -> bool {
    let Some(index) = state.pickups.iter().position(|p| p.id == id) else {
        return false;
    };
    let pickup = state.pickups.remove(index);

    match pickup.kind {
        PickupKind::Experience => gain_experience(state, pickup.value),
        PickupKind::Health => state.player.heal(pickup.value as f32),
        PickupKind::Magnet => {
            let (gems, rest): (Vec<Pickup>, Vec<Pickup>) = std::mem::take(&mut state.pickups)
                .into_iter()
                .partition(|p| p.kind == PickupKind::Experience);
            state.pickups = rest;
            for gem in gems {
                gain_experience(state, gem.value);
            }
        }
    }

    state.events.push(GameEvent::PickupCollected {
        kind: pickup.kind,
        value: pickup.value,
    });
    true
}

/// Drop loot where an enemy died
fn spawn_drops(state: &mut GameState, center: Vec2, experience: u32) {
    let pos = center - Vec2::splat(PICKUP_SIZE / 2.0);

    let id = state.next_entity_id();
    state.pickups.push(Pickup {
        id,
        kind: PickupKind::Experience,
        pos,
        value: experience,
    });

    if state.rng.random_bool(HEALTH_DROP_CHANCE) {
        let id = state.next_entity_id();
        state.pickups.push(Pickup {
            id,
            kind: PickupKind::Health,
            pos: pos + Vec2::new(0.0, HEALTH_DROP_OFFSET),
            value: HEALTH_DROP_VALUE as u32,
        });
    }
}

/// Apply projectile hits: damage, drops and projectile consumption
///
/// A non-passthrough projectile is consumed by its hit whether or not the
/// target survives. A passthrough projectile is only consumed by a kill.
pub fn resolve_projectile_hits(state: &mut GameState, hits: &[ProjectileHit], now: f64) {
    let mut consumed: Vec<EntityId> = Vec::new();

    for hit in hits {
        let passthrough = state
            .projectiles
            .iter()
            .find(|p| p.id == hit.projectile)
            .is_some_and(|p| p.passthrough);
        let victim = state
            .enemy(hit.enemy)
            .map(|e| (e.center(), e.experience_value));

        let killed = damage_enemy(state, hit.enemy, hit.damage, now);
        if let (true, Some((center, experience))) = (killed, victim) {
            spawn_drops(state, center, experience);
        }

        if !passthrough || killed {
            consumed.push(hit.projectile);
        }
    }

    if !consumed.is_empty() {
        state.projectiles.retain(|p| !consumed.contains(&p.id));
    }
}
