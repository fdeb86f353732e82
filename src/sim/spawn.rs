//! Enemy spawn policy and population cap
//!
//! Difficulty is a pure function of elapsed game time: the spawner gets faster,
//! bigger batches roll in, new archetypes unlock and base stats scale up.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, EntityId, GameEvent, GameState, Player};
use crate::clamp_to_world;
use crate::consts::*;

/// Delay before the next batch (ms): shrinks with time, floors at 500, plus jitter
pub fn spawn_interval(game_time_ms: f64, rng: &mut impl Rng) -> f64 {
    let base = (2000.0 - game_time_ms / 15_000.0).max(500.0);
    base + rng.random_range(0.0..500.0)
}

/// Enemies per batch: `floor(1 + t/30000 + random(0,2))`
pub fn spawn_count(game_time_ms: f64, rng: &mut impl Rng) -> usize {
    let roll: f64 = rng.random_range(0.0..2.0);
    (1.0 + game_time_ms / 30_000.0 + roll).floor() as usize
}

/// Stat multiplier applied to freshly spawned enemies
pub fn difficulty(game_time_ms: f64) -> f32 {
    ((1.0 + game_time_ms / 60_000.0) as f32).min(MAX_DIFFICULTY)
}

/// Maximum simultaneous enemies
pub fn population_cap(game_time_ms: f64) -> usize {
    let grown = POPULATION_CAP_BASE + (game_time_ms / POPULATION_CAP_STEP_MS).floor() as usize;
    grown.min(POPULATION_CAP_MAX)
}

/// Archetypes eligible for this draw
///
/// Bosses only join the pool on a 5% roll once unlocked.
pub fn eligible_kinds(game_time_ms: f64, rng: &mut impl Rng) -> Vec<EnemyKind> {
    let mut kinds = vec![EnemyKind::Basic];
    if game_time_ms > 30_000.0 {
        kinds.push(EnemyKind::Fast);
    }
    if game_time_ms > 60_000.0 {
        kinds.push(EnemyKind::Tank);
    }
    if game_time_ms > 120_000.0 {
        kinds.push(EnemyKind::Ranged);
    }
    if game_time_ms > 300_000.0 && rng.random_bool(BOSS_DRAW_CHANCE) {
        kinds.push(EnemyKind::Boss);
    }
    kinds
}

/// Spawn point just past the edge of the player's view, clamped into the world
fn spawn_position(player: &Player, viewport: Vec2, rng: &mut impl Rng) -> Vec2 {
    let quarter = viewport / 4.0;
    let b = SPAWN_EDGE_BUFFER;
    let p = player.pos;

    let along_x = p.x - quarter.x - b + rng.random::<f32>() * (viewport.x / 2.0 + b * 2.0);
    let along_y = p.y - quarter.y - b + rng.random::<f32>() * (viewport.y / 2.0 + b * 2.0);

    let pos = match rng.random_range(0..4) {
        0 => Vec2::new(along_x, p.y - quarter.y - b),
        1 => Vec2::new(p.x + quarter.x + b, along_y),
        2 => Vec2::new(along_x, p.y + quarter.y + b),
        _ => Vec2::new(p.x - quarter.x - b, along_y),
    };

    clamp_to_world(pos, Vec2::splat(SPAWN_CLAMP_SIZE), viewport * WORLD_SCALE)
}

/// Create one enemy appropriate for the elapsed time
pub fn generate_enemy(
    id: EntityId,
    game_time_ms: f64,
    player: &Player,
    viewport: Vec2,
    rng: &mut impl Rng,
) -> Enemy {
    let pos = spawn_position(player, viewport, rng);
    let kinds = eligible_kinds(game_time_ms, rng);
    let kind = kinds[rng.random_range(0..kinds.len())];
    Enemy::new(id, kind, pos, difficulty(game_time_ms))
}

/// Spawn a batch if the spawn timer has elapsed
pub fn run_spawner(state: &mut GameState) {
    if state.game_time_ms < state.next_spawn_at_ms {
        return;
    }

    let t = state.game_time_ms;
    let count = spawn_count(t, &mut state.rng);
    for _ in 0..count {
        let id = state.next_entity_id();
        let enemy = generate_enemy(id, t, &state.player, state.viewport, &mut state.rng);
        state.enemies.push(enemy);
    }

    state.next_spawn_at_ms = t + spawn_interval(t, &mut state.rng);
    log::debug!(
        "Spawned {count} enemies at t={:.1}s ({} alive)",
        t / 1000.0,
        state.enemies.len()
    );
}

/// Cull the enemies farthest from the player until the cap holds
///
/// Equal distances are broken by id (lowest id culled first). Returns the
/// number of enemies removed.
pub fn enforce_population_cap(state: &mut GameState) -> usize {
    let cap = population_cap(state.game_time_ms);
    let excess = state.enemies.len().saturating_sub(cap);
    if excess == 0 {
        return 0;
    }

    let center = state.player.center();
    let mut by_distance: Vec<(f32, EntityId)> = state
        .enemies
        .iter()
        .map(|e| (e.center().distance(center), e.id))
        .collect();
    by_distance.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let culled: Vec<EntityId> = by_distance.iter().take(excess).map(|&(_, id)| id).collect();
    state.enemies.retain(|e| !culled.contains(&e.id));

    log::debug!("Culled {excess} distant enemies (cap {cap})");
    state.events.push(GameEvent::EnemiesCulled { count: excess });
    excess
}
