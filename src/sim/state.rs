//! Game state and core simulation types
//!
//! `GameState` is the single authoritative store. Systems receive it by `&mut`
//! and nothing else holds entity data between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::settings::{CharacterClass, CooldownClock, Settings};

/// Entity identifier, allocated from a per-run monotonic counter
pub type EntityId = u32;

/// Monotonic entity ID source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        // Wraps instead of overflowing on absurdly long runs
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Current phase of the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Systems advance every tick
    Running,
    /// Pause toggle is on
    Paused,
    /// Level-up menu is open, waiting for `select_upgrade`
    UpgradeMenu,
    /// Player died; the run is over
    GameOver,
}

/// Facing direction for animation and idle aiming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Idle,
}

impl Facing {
    /// Unit vector for this facing (screen space, +y is down)
    pub fn unit(&self) -> Option<Vec2> {
        match self {
            Facing::Up => Some(Vec2::new(0.0, -1.0)),
            Facing::Down => Some(Vec2::new(0.0, 1.0)),
            Facing::Left => Some(Vec2::new(-1.0, 0.0)),
            Facing::Right => Some(Vec2::new(1.0, 0.0)),
            Facing::Idle => None,
        }
    }
}

/// Stacks of passive upgrades that modify weapons at fire time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveStacks {
    pub might: u32,
    pub area: u32,
    pub cooldown: u32,
    pub duration: u32,
    pub amount: u32,
}

impl PassiveStacks {
    pub fn damage_mult(&self) -> f32 {
        1.0 + MIGHT_PER_STACK * self.might as f32
    }

    pub fn area_mult(&self) -> f32 {
        1.0 + AREA_PER_STACK * self.area as f32
    }

    /// Multiplicative so stacking never reaches zero
    pub fn cooldown_mult(&self) -> f64 {
        (1.0 - COOLDOWN_PER_STACK).powi(self.cooldown as i32)
    }

    pub fn duration_mult(&self) -> f64 {
        1.0 + DURATION_PER_STACK * self.duration as f64
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub level: u32,
    pub weapons: Vec<Weapon>,
    pub facing: Facing,
    pub moving: bool,
    pub invulnerable: bool,
    /// Timestamp of the hit that opened the current invulnerability window
    pub invulnerable_since: f64,
    /// Last nonzero movement direction (unit), kept after movement stops
    pub last_direction: Option<Vec2>,
    pub passives: PassiveStacks,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            experience: 0,
            experience_to_next_level: FIRST_LEVEL_THRESHOLD,
            level: 1,
            weapons: Vec::new(),
            facing: Facing::Idle,
            moving: false,
            invulnerable: false,
            invulnerable_since: 0.0,
            last_direction: None,
            passives: PassiveStacks::default(),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Restore health, never above max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Owned weapon of the given archetype, if any
    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }

    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Ranged,
    Boss,
}

/// Unscaled stat template for an enemy archetype
#[derive(Debug, Clone, Copy)]
pub struct EnemyTemplate {
    pub size: f32,
    pub speed: f32,
    pub health: f32,
    pub damage: f32,
    pub experience: u32,
}

impl EnemyKind {
    pub fn template(&self) -> EnemyTemplate {
        match self {
            EnemyKind::Basic => EnemyTemplate {
                size: 24.0,
                speed: 80.0,
                health: 20.0,
                damage: 10.0,
                experience: 1,
            },
            EnemyKind::Fast => EnemyTemplate {
                size: 20.0,
                speed: 60.0,
                health: 15.0,
                damage: 5.0,
                experience: 2,
            },
            EnemyKind::Tank => EnemyTemplate {
                size: 32.0,
                speed: 50.0,
                health: 50.0,
                damage: 15.0,
                experience: 5,
            },
            EnemyKind::Ranged => EnemyTemplate {
                size: 22.0,
                speed: 70.0,
                health: 25.0,
                damage: 8.0,
                experience: 3,
            },
            EnemyKind::Boss => EnemyTemplate {
                size: 48.0,
                speed: 40.0,
                health: 200.0,
                damage: 25.0,
                experience: 20,
            },
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage per tick of overlap
    pub damage: f32,
    pub experience_value: u32,
    /// Timestamp of the last hit taken (hit-flash feedback)
    pub last_hit: f64,
}

impl Enemy {
    /// Build an enemy from its archetype template scaled by `difficulty`
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, difficulty: f32) -> Self {
        let t = kind.template();
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(t.size),
            speed: t.speed * difficulty,
            health: t.health * difficulty,
            max_health: t.health * difficulty,
            damage: t.damage,
            experience_value: t.experience,
            last_hit: 0.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Knife,
    Axe,
    Wand,
    Whip,
    Bible,
    Garlic,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Knife,
        WeaponKind::Axe,
        WeaponKind::Wand,
        WeaponKind::Whip,
        WeaponKind::Bible,
        WeaponKind::Garlic,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            WeaponKind::Knife => "Throwing Knife",
            WeaponKind::Axe => "Axe",
            WeaponKind::Wand => "Magic Wand",
            WeaponKind::Whip => "Whip",
            WeaponKind::Bible => "Bible",
            WeaponKind::Garlic => "Garlic",
        }
    }

    pub fn description(&self, level: u32) -> String {
        if level <= 1 {
            return match self {
                WeaponKind::Knife => "A basic knife that flies in a straight line".into(),
                WeaponKind::Axe => "A spinning axe that can hit several enemies".into(),
                WeaponKind::Wand => "A magic wand that aims at the nearest enemy".into(),
                WeaponKind::Whip => "A whip that lashes enemies in front of you".into(),
                WeaponKind::Bible => "A bible that circles you and damages enemies".into(),
                WeaponKind::Garlic => "An aura that damages everything nearby".into(),
            };
        }
        match self {
            WeaponKind::Knife => format!("Level {level} knife - more damage and speed"),
            WeaponKind::Axe => format!("Level {level} axe - more size and damage"),
            WeaponKind::Wand => format!("Level {level} wand - faster and stronger"),
            WeaponKind::Whip => format!("Level {level} whip - more reach and damage"),
            WeaponKind::Bible => format!("Level {level} bible - {} orbiting books", level + 1),
            WeaponKind::Garlic => format!("Level {level} garlic - bigger and stronger"),
        }
    }

    /// Fallback projectile speed when a weapon leaves it unset
    pub fn default_projectile_speed(&self) -> f32 {
        match self {
            WeaponKind::Knife => 300.0,
            WeaponKind::Axe => 250.0,
            WeaponKind::Wand => 350.0,
            WeaponKind::Whip | WeaponKind::Bible | WeaponKind::Garlic => 0.0,
        }
    }

    /// Fallback projectile size when a weapon leaves it unset
    pub fn default_projectile_size(&self) -> f32 {
        match self {
            WeaponKind::Knife | WeaponKind::Bible => 16.0,
            WeaponKind::Axe => 24.0,
            WeaponKind::Wand => 12.0,
            WeaponKind::Whip | WeaponKind::Garlic => 100.0,
        }
    }

    /// Fallback effect duration (ms) for area weapons
    pub fn default_duration_ms(&self) -> f64 {
        match self {
            WeaponKind::Knife => KNIFE_DURATION_MS,
            WeaponKind::Axe => AXE_DURATION_MS,
            WeaponKind::Wand => WAND_DURATION_MS,
            WeaponKind::Whip => 300.0,
            WeaponKind::Bible => BIBLE_DURATION_MS,
            WeaponKind::Garlic => GARLIC_DURATION_MS,
        }
    }
}

/// An equipped weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub id: EntityId,
    pub kind: WeaponKind,
    pub damage: f32,
    pub cooldown_ms: f64,
    pub last_fired: f64,
    pub level: u32,
    pub projectile_speed: Option<f32>,
    pub projectile_size: Option<f32>,
    pub area: Option<f32>,
    pub duration_ms: Option<f64>,
    pub passthrough: bool,
    pub count: Option<u32>,
}

impl Weapon {
    /// A freshly acquired weapon at base stats
    pub fn new(id: EntityId, kind: WeaponKind) -> Self {
        Self {
            id,
            kind,
            damage: NEW_WEAPON_DAMAGE,
            cooldown_ms: NEW_WEAPON_COOLDOWN_MS,
            last_fired: 0.0,
            level: 1,
            projectile_speed: None,
            projectile_size: None,
            area: None,
            duration_ms: None,
            passthrough: false,
            count: None,
        }
    }

    /// Starting loadout for a character class
    pub fn starting(id: EntityId, class: CharacterClass) -> Self {
        match class {
            CharacterClass::Warrior => Self {
                damage: 10.0,
                cooldown_ms: 300.0,
                projectile_speed: Some(300.0),
                projectile_size: Some(16.0),
                ..Self::new(id, WeaponKind::Knife)
            },
            CharacterClass::Mage => Self {
                damage: 8.0,
                cooldown_ms: 250.0,
                projectile_speed: Some(350.0),
                projectile_size: Some(12.0),
                ..Self::new(id, WeaponKind::Wand)
            },
            CharacterClass::Rogue => Self {
                damage: 6.0,
                cooldown_ms: 200.0,
                projectile_speed: Some(400.0),
                projectile_size: Some(10.0),
                count: Some(2),
                ..Self::new(id, WeaponKind::Knife)
            },
            CharacterClass::Necromancer => Self {
                damage: 12.0,
                cooldown_ms: 350.0,
                area: Some(100.0),
                duration_ms: Some(300.0),
                ..Self::new(id, WeaponKind::Whip)
            },
        }
    }

    /// Re-selecting an owned archetype: one level, 20% more damage
    pub fn level_up(&mut self) {
        self.level += 1;
        self.damage *= WEAPON_LEVEL_DAMAGE_MULT;
    }
}

/// A projectile or area-effect volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// Unit direction (zero for stationary effects)
    pub direction: Vec2,
    pub duration_ms: f64,
    pub created_at: f64,
    pub passthrough: bool,
    /// Enemies already damaged by this instance (passthrough only)
    pub hit_enemies: Vec<EntityId>,
}

impl Projectile {
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn has_hit(&self, enemy: EntityId) -> bool {
        self.hit_enemies.contains(&enemy)
    }
}

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Experience,
    Health,
    /// Pulls in every experience gem on the field
    Magnet,
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub value: u32,
}

impl Pickup {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PICKUP_SIZE / 2.0)
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(PICKUP_SIZE))
    }
}

/// Passive upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveKind {
    MaxHealth,
    Speed,
    Might,
    Area,
    Cooldown,
    Duration,
    Amount,
}

impl PassiveKind {
    pub const ALL: [PassiveKind; 7] = [
        PassiveKind::MaxHealth,
        PassiveKind::Speed,
        PassiveKind::Might,
        PassiveKind::Area,
        PassiveKind::Cooldown,
        PassiveKind::Duration,
        PassiveKind::Amount,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PassiveKind::MaxHealth => "Max Health Up",
            PassiveKind::Speed => "Move Speed Up",
            PassiveKind::Might => "Might",
            PassiveKind::Area => "Area Up",
            PassiveKind::Cooldown => "Cooldown Down",
            PassiveKind::Duration => "Duration Up",
            PassiveKind::Amount => "Amount Up",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PassiveKind::MaxHealth => "Max health +20",
            PassiveKind::Speed => "Movement speed +20",
            PassiveKind::Might => "All weapon damage +10%",
            PassiveKind::Area => "All weapon area +10%",
            PassiveKind::Cooldown => "Weapon cooldowns -8%",
            PassiveKind::Duration => "Effect duration +15%",
            PassiveKind::Amount => "Knives and bibles fire one more projectile",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            PassiveKind::MaxHealth => "max-health",
            PassiveKind::Speed => "speed",
            PassiveKind::Might => "might",
            PassiveKind::Area => "area",
            PassiveKind::Cooldown => "cooldown",
            PassiveKind::Duration => "duration",
            PassiveKind::Amount => "amount",
        }
    }
}

/// What an upgrade option grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Weapon(WeaponKind),
    Passive(PassiveKind),
}

/// One choice presented on level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: UpgradeKind,
    /// Weapon level after taking this option (1 for new weapons and passives)
    pub level: u32,
}

impl UpgradeOption {
    pub fn weapon(kind: WeaponKind, level: u32) -> Self {
        let (id, name) = if level <= 1 {
            (
                format!("new-{kind:?}").to_lowercase(),
                kind.display_name().to_string(),
            )
        } else {
            (
                format!("upgrade-{kind:?}-{level}").to_lowercase(),
                format!("{} Lv.{level}", kind.display_name()),
            )
        };
        Self {
            id,
            name,
            description: kind.description(level),
            kind: UpgradeKind::Weapon(kind),
            level,
        }
    }

    pub fn passive(kind: PassiveKind) -> Self {
        Self {
            id: format!("passive-{}", kind.slug()),
            name: kind.display_name().to_string(),
            description: kind.description().to_string(),
            kind: UpgradeKind::Passive(kind),
            level: 1,
        }
    }
}

/// Cumulative run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub time_alive_secs: f64,
    pub enemies_killed: u64,
    pub damage_dealt: f64,
    pub experience_collected: u64,
    pub max_level: u32,
}

/// Viewport offset, derived from the player every running tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
}

/// Notable things that happened during a tick (for audio/HUD collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { id: EntityId, kind: EnemyKind },
    PlayerHit { damage: f32, health: f32 },
    PickupCollected { kind: PickupKind, value: u32 },
    LevelUp { level: u32 },
    EnemiesCulled { count: usize },
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded PRNG for spawns, drops and upgrade offers
    pub rng: Pcg32,
    pub cooldown_clock: CooldownClock,
    pub character_class: CharacterClass,
    /// Host surface size; the world is `viewport * WORLD_SCALE`
    pub viewport: Vec2,
    /// Unpaused time accumulated by ticks (ms)
    pub game_time_ms: f64,
    pub phase: GamePhase,
    pub player: Player,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active projectiles (sorted by id for determinism)
    pub projectiles: Vec<Projectile>,
    /// Active pickups (sorted by id for determinism)
    pub pickups: Vec<Pickup>,
    pub camera: Camera,
    pub stats: GameStats,
    /// Exactly `UPGRADE_CHOICES` entries while the menu is open (fewer only if the pool ran dry)
    pub upgrade_options: Vec<UpgradeOption>,
    /// Game time at which the spawner fires next
    pub next_spawn_at_ms: f64,
    /// Events from the most recent running tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Entity ID source
    pub ids: IdAllocator,
}

impl GameState {
    /// Create a new run with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::from_settings(&Settings {
            seed,
            ..Default::default()
        })
    }

    /// Create a new run from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let viewport = Vec2::new(settings.viewport_width, settings.viewport_height);
        let start = viewport / 2.0 - Vec2::splat(PLAYER_SIZE / 2.0);

        let mut state = Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            cooldown_clock: settings.cooldown_clock,
            character_class: settings.character_class,
            viewport,
            game_time_ms: 0.0,
            phase: GamePhase::Running,
            player: Player::new(start),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            camera: Camera::default(),
            stats: GameStats {
                max_level: 1,
                ..Default::default()
            },
            upgrade_options: Vec::new(),
            next_spawn_at_ms: 0.0,
            events: Vec::new(),
            ids: IdAllocator::default(),
        };

        let weapon_id = state.next_entity_id();
        state
            .player
            .weapons
            .push(Weapon::starting(weapon_id, settings.character_class));

        log::info!(
            "New run: seed={} class={}",
            settings.seed,
            settings.character_class.as_str()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Playable world size
    #[inline]
    pub fn world_extent(&self) -> Vec2 {
        self.viewport * WORLD_SCALE
    }

    /// Host surface resized
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        } else {
            log::warn!("Ignoring degenerate viewport {width}x{height}");
        }
    }

    /// Timestamp used for cooldowns and timed effects this tick
    #[inline]
    pub fn effect_clock(&self, wall_now_ms: f64) -> f64 {
        match self.cooldown_clock {
            CooldownClock::Wall => wall_now_ms,
            CooldownClock::Simulation => self.game_time_ms,
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Paused | GamePhase::UpgradeMenu)
    }

    pub fn show_upgrade_menu(&self) -> bool {
        self.phase == GamePhase::UpgradeMenu
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.pickups.sort_by_key(|p| p.id);
    }

    /// Read-only view for renderers and HUDs
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            game_time_ms: self.game_time_ms,
            player: &self.player,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            pickups: &self.pickups,
            camera: self.camera,
            stats: &self.stats,
            upgrade_options: &self.upgrade_options,
            events: &self.events,
        }
    }
}

/// Borrowed view of the world after a tick
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub game_time_ms: f64,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub pickups: &'a [Pickup],
    pub camera: Camera,
    pub stats: &'a GameStats,
    pub upgrade_options: &'a [UpgradeOption],
    pub events: &'a [GameEvent],
}
