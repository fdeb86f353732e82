//! Weapon cooldowns and per-archetype firing patterns
//!
//! Every weapon auto-fires as soon as its cooldown has elapsed. Firing only
//! synthesizes projectiles; the caller owns adding them to the store.
//!
//! Passive stacks on the player scale the result: might multiplies damage,
//! area scales sizes, cooldown shortens the wait, duration lengthens effects
//! and amount adds knives and bible pages.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Enemy, EntityId, GameState, IdAllocator, Player, Projectile, Weapon, WeaponKind,
};
use crate::consts::*;
use crate::rotate;

/// Direction used when the player has never moved
const DEFAULT_AIM: Vec2 = Vec2::new(0.0, -1.0);

/// Direction for aimed weapons: last movement, else facing, else straight up
pub fn aim_direction(player: &Player) -> Vec2 {
    player
        .last_direction
        .or_else(|| player.facing.unit())
        .unwrap_or(DEFAULT_AIM)
}

/// Cooldown after passive reductions (ms)
pub fn effective_cooldown(weapon: &Weapon, player: &Player) -> f64 {
    weapon.cooldown_ms * player.passives.cooldown_mult()
}

/// Whether the weapon may fire at `now`
pub fn is_ready(weapon: &Weapon, player: &Player, now: f64) -> bool {
    now - weapon.last_fired >= effective_cooldown(weapon, player)
}

/// Shared per-shot parameters after passive modifiers
struct Shot {
    center: Vec2,
    damage: f32,
    duration_mult: f64,
    area_mult: f32,
    created_at: f64,
}

impl Shot {
    fn projectile(
        &self,
        id: EntityId,
        weapon: &Weapon,
        pos: Vec2,
        size: f32,
        direction: Vec2,
        base_duration_ms: f64,
        passthrough: bool,
    ) -> Projectile {
        Projectile {
            id,
            weapon: weapon.kind,
            pos,
            size: Vec2::splat(size),
            speed: weapon
                .projectile_speed
                .unwrap_or_else(|| weapon.kind.default_projectile_speed()),
            damage: self.damage,
            direction,
            duration_ms: base_duration_ms * self.duration_mult,
            created_at: self.created_at,
            passthrough,
            hit_enemies: Vec::new(),
        }
    }

    /// Projectile size for bolt-style weapons
    fn bolt_size(&self, weapon: &Weapon) -> f32 {
        weapon
            .projectile_size
            .unwrap_or_else(|| weapon.kind.default_projectile_size())
            * self.area_mult
    }

    /// Footprint for area weapons
    fn area_size(&self, weapon: &Weapon) -> f32 {
        weapon
            .area
            .unwrap_or_else(|| weapon.kind.default_projectile_size())
            * self.area_mult
    }

    /// Top-left that centers a box of `size` on `point`
    fn centered_on(point: Vec2, size: f32) -> Vec2 {
        point - Vec2::splat(size / 2.0)
    }
}

/// Fire one weapon if it is off cooldown
///
/// Returns the new projectiles, or nothing while cooling down. `last_fired`
/// only advances when something was actually produced, so a wand with no
/// target fires the moment one appears.
pub fn fire_weapon(
    weapon: &mut Weapon,
    player: &Player,
    enemies: &[Enemy],
    now: f64,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
) -> Vec<Projectile> {
    if !is_ready(weapon, player, now) {
        return Vec::new();
    }

    let passives = player.passives;
    let shot = Shot {
        center: player.center(),
        damage: weapon.damage * passives.damage_mult(),
        duration_mult: passives.duration_mult(),
        area_mult: passives.area_mult(),
        created_at: now,
    };

    let mut projectiles = Vec::new();

    match weapon.kind {
        WeaponKind::Knife => {
            let aim = aim_direction(player);
            let count = weapon.count.unwrap_or(1) + passives.amount;
            let size = shot.bolt_size(weapon);
            let pos = Shot::centered_on(shot.center, size);
            let first = -KNIFE_SPREAD * (count as f32 - 1.0) / 2.0;
            for i in 0..count {
                let direction = if count > 1 {
                    rotate(aim, first + i as f32 * KNIFE_SPREAD)
                } else {
                    aim
                };
                projectiles.push(shot.projectile(
                    ids.next_id(),
                    weapon,
                    pos,
                    size,
                    direction,
                    KNIFE_DURATION_MS,
                    weapon.passthrough,
                ));
            }
        }

        WeaponKind::Axe => {
            let raw = Vec2::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let direction = raw.try_normalize().unwrap_or(DEFAULT_AIM);
            let size = shot.bolt_size(weapon);
            projectiles.push(shot.projectile(
                ids.next_id(),
                weapon,
                Shot::centered_on(shot.center, size),
                size,
                direction,
                AXE_DURATION_MS,
                true,
            ));
        }

        WeaponKind::Wand => {
            let nearest = enemies.iter().min_by(|a, b| {
                a.center()
                    .distance_squared(shot.center)
                    .total_cmp(&b.center().distance_squared(shot.center))
            });
            if let Some(target) = nearest {
                let direction = (target.center() - shot.center).normalize_or_zero();
                let size = shot.bolt_size(weapon);
                projectiles.push(shot.projectile(
                    ids.next_id(),
                    weapon,
                    Shot::centered_on(shot.center, size),
                    size,
                    direction,
                    WAND_DURATION_MS,
                    weapon.passthrough,
                ));
            }
        }

        WeaponKind::Whip => {
            let aim = aim_direction(player);
            let area = shot.area_size(weapon);
            let reach = player.size / 2.0 + Vec2::splat(area / 2.0);
            let center = shot.center + aim * reach;
            let duration = weapon
                .duration_ms
                .unwrap_or_else(|| weapon.kind.default_duration_ms());
            let whip = shot.projectile(
                ids.next_id(),
                weapon,
                Shot::centered_on(center, area),
                area,
                aim,
                duration,
                true,
            );
            projectiles.push(whip);
        }

        WeaponKind::Bible => {
            let count = weapon.level + 1 + passives.amount;
            let size = shot.bolt_size(weapon);
            // Phase advances one radian per second of clock time
            let phase = (now / 1000.0) as f32;
            for i in 0..count {
                let angle = i as f32 / count as f32 * std::f32::consts::TAU + phase;
                let orbit = shot.center + Vec2::from_angle(angle) * BIBLE_ORBIT_RADIUS;
                projectiles.push(shot.projectile(
                    ids.next_id(),
                    weapon,
                    Shot::centered_on(orbit, size),
                    size,
                    Vec2::ZERO,
                    BIBLE_DURATION_MS,
                    true,
                ));
            }
        }

        WeaponKind::Garlic => {
            let area = shot.area_size(weapon);
            projectiles.push(shot.projectile(
                ids.next_id(),
                weapon,
                Shot::centered_on(shot.center, area),
                area,
                Vec2::ZERO,
                GARLIC_DURATION_MS,
                true,
            ));
        }
    }

    if !projectiles.is_empty() {
        weapon.last_fired = now;
    }
    projectiles
}

/// Fire every equipped weapon and add the results to the store
pub fn fire_all(state: &mut GameState, now: f64) {
    // Weapons live on the player; detach them so the player can be read while firing
    let mut weapons = std::mem::take(&mut state.player.weapons);
    let mut fired = 0;

    for weapon in &mut weapons {
        let projectiles = fire_weapon(
            weapon,
            &state.player,
            &state.enemies,
            now,
            &mut state.ids,
            &mut state.rng,
        );
        fired += projectiles.len();
        state.projectiles.extend(projectiles);
    }

    state.player.weapons = weapons;
    if fired > 0 {
        log::trace!("Fired {fired} projectiles");
    }
}
