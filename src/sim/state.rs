//! World state and core simulation types
//!
//! The single aggregate every system mutates. Gameplay state is
//! serializable for capture/replay; cosmetic bookkeeping is skipped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fx::FxState;
use super::pool::Pool;
use super::rng::SimRng;
use super::upgrades::{DraftState, UpgradeId};
use crate::consts::*;

/// The player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians; tracks velocity once moving
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    /// Seconds until dash is available again
    pub dash_cooldown: f32,
    /// Full damage suppression window after a dash
    pub invuln_remaining: f32,
    /// Post-hit window of reduced incoming damage
    pub grace_remaining: f32,
    // Upgrade multipliers
    pub move_speed_mult: f32,
    pub dash_cooldown_mult: f32,
    pub magnet_mult: f32,
}

impl Player {
    fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: 0.0,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            radius: PLAYER_RADIUS,
            dash_cooldown: 0.0,
            invuln_remaining: 0.0,
            grace_remaining: 0.0,
            move_speed_mult: 1.0,
            dash_cooldown_mult: 1.0,
            magnet_mult: 1.0,
        }
    }

    /// Dash cooldown duration after the current multipliers
    pub fn dash_cooldown_total(&self) -> f32 {
        DASH_COOLDOWN * self.dash_cooldown_mult
    }
}

/// Enemy variants. A closed tag switched on in the AI system; per-kind
/// behavioral timers live as plain fields on [`Enemy`] so the collection
/// stays one flat record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Weak, drifts toward the player with a lateral oscillation
    Glider,
    /// Holds a standoff distance and fires leading shots
    Shard,
    /// Heavy charger with a windup/charge state machine
    Ram,
    /// Unique, phase-driven
    Boss,
}

impl EnemyKind {
    pub fn label(self) -> &'static str {
        match self {
            EnemyKind::Glider => "glider",
            EnemyKind::Shard => "shard",
            EnemyKind::Ram => "ram",
            EnemyKind::Boss => "Rustbreaker",
        }
    }
}

/// Ram attack phases (also reused for the boss dash-charge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChargeState {
    #[default]
    Approach,
    Windup,
    Charging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub speed: f32,
    pub elite: bool,
    pub xp_value: f32,
    pub contact_damage: f32,
    /// Per-enemy cooldown preventing contact double-hits
    pub contact_cooldown: f32,
    /// Shard shot / boss volley timer
    pub fire_cooldown: f32,
    pub charge: ChargeState,
    pub charge_timer: f32,
    /// Glider lateral oscillation phase
    pub wobble_phase: f32,
    /// Dedupe timer for saw/mine area damage
    pub hazard_cooldown: f32,
    /// Boss reinforcement spawn timer
    pub reinforce_cooldown: f32,
}

/// Player-fired projectile record; pooled, reset on allocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime: f32,
    pub damage: f32,
    pub pierce_remaining: u32,
    pub chain_remaining: u32,
    pub crit_chance: f32,
    pub knockback: f32,
    /// Enemies already damaged by this projectile (hit at most once each)
    pub hit_ids: Vec<u32>,
    /// Short cosmetic trail, newest first
    #[serde(skip)]
    pub trail: Vec<Vec2>,
    pub expired: bool,
}

/// Enemy-fired projectile record; pooled, reset on allocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime: f32,
    pub damage: f32,
    #[serde(skip)]
    pub trail: Vec<Vec2>,
    pub expired: bool,
}

/// Dropped xp pickup, magnet-pulled toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scrap {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: f32,
    pub lifetime: f32,
}

/// Orbiting blade hazard; unlocked and leveled by upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SawRing {
    pub level: u32,
    pub angle: f32,
    pub orbit_radius: f32,
    pub blade_radius: f32,
    pub damage: f32,
}

impl SawRing {
    pub fn new() -> Self {
        Self {
            level: 1,
            angle: 0.0,
            orbit_radius: 48.0,
            blade_radius: 9.0,
            damage: 8.0,
        }
    }

    pub fn blade_count(&self) -> u32 {
        1 + self.level
    }
}

/// Proximity mine layer; unlocked and leveled by upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineLayer {
    pub level: u32,
    pub place_cooldown: f32,
    pub mines: Vec<Mine>,
}

impl MineLayer {
    pub fn new() -> Self {
        Self { level: 1, place_cooldown: 0.0, mines: Vec::new() }
    }

    pub fn max_mines(&self) -> usize {
        (1 + self.level) as usize
    }

    pub fn damage(&self) -> f32 {
        20.0 + 8.0 * self.level as f32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub pos: Vec2,
    pub arm_timer: f32,
    pub trigger_radius: f32,
    pub blast_radius: f32,
}

/// Continuous difficulty multipliers recomputed from elapsed time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub spawn_rate: f32,
    pub enemy_speed: f32,
    pub enemy_hp: f32,
    pub elite_chance: f32,
}

impl Default for Director {
    fn default() -> Self {
        Self { spawn_rate: 1.0, enemy_speed: 1.0, enemy_hp: 1.0, elite_chance: 0.0 }
    }
}

/// Scheduled scripted spawn-event override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    pub active: bool,
    pub forced_kind: Option<EnemyKind>,
    pub label: String,
    pub ends_at: f32,
    pub next_event_at: f32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            active: false,
            forced_kind: None,
            label: String::new(),
            ends_at: 0.0,
            next_event_at: WAVE_INTERVAL,
        }
    }
}

/// One-shot boss flags for the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BossState {
    pub spawned: bool,
    pub defeated: bool,
    pub enemy_id: Option<u32>,
}

/// Current weapon stats, mutated in place by upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub range: f32,
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub projectile_speed: f32,
    pub pierce: u32,
    pub chain: u32,
    pub crit_chance: f32,
    pub knockback: f32,
    /// Seconds until the next autofire shot
    pub cooldown: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            name: "Scrap Cannon".to_string(),
            range: 240.0,
            damage: 12.0,
            fire_rate: 2.5,
            projectile_speed: 420.0,
            pierce: 0,
            chain: 0,
            crit_chance: 0.05,
            knockback: 60.0,
            cooldown: 0.0,
        }
    }
}

/// Complete simulation state. Exclusively owned by the engine; every
/// system takes it by mutable reference for one step of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    /// Monotonic simulation clock; paused/draft/game-over time does not
    /// advance it
    pub elapsed: f32,
    pub seed: u32,
    pub rng: SimRng,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Pool<Projectile>,
    pub enemy_projectiles: Pool<EnemyProjectile>,
    pub scrap: Vec<Scrap>,
    pub saw: Option<SawRing>,
    pub mines: Option<MineLayer>,

    pub director: Director,
    pub wave: WaveState,
    pub boss: BossState,
    pub weapon: Weapon,

    pub xp: f32,
    pub level: u32,
    pub xp_to_next: f32,
    pub kills: u32,

    /// Seconds until the spawner may fire again
    pub spawn_cooldown: f32,

    pub paused: bool,
    pub game_over: bool,
    pub debug_overlay: bool,

    pub draft: DraftState,
    /// Level-ups still owed a draft; a multi-level jump queues one draft
    /// per level and each choice opens the next
    pub pending_drafts: u32,
    /// Stack-counted applied upgrades, keyed by id
    pub inventory: Vec<(UpgradeId, u32)>,

    /// Cosmetic bookkeeping; never read by gameplay systems
    #[serde(skip)]
    pub fx: FxState,

    next_id: u32,
}

impl World {
    /// Fresh run state for a seed
    pub fn new(seed: u32) -> Self {
        let width = ARENA_WIDTH;
        let height = ARENA_HEIGHT;
        Self {
            width,
            height,
            elapsed: 0.0,
            seed,
            rng: SimRng::new(seed),
            player: Player::new(Vec2::new(width * 0.5, height * 0.5)),
            enemies: Vec::new(),
            player_projectiles: Pool::with_capacity(64),
            enemy_projectiles: Pool::with_capacity(64),
            scrap: Vec::new(),
            saw: None,
            mines: None,
            director: Director::default(),
            wave: WaveState::default(),
            boss: BossState::default(),
            weapon: Weapon::default(),
            xp: 0.0,
            level: 1,
            xp_to_next: XP_TO_FIRST_LEVEL,
            kills: 0,
            spawn_cooldown: SPAWN_COOLDOWN_BASE,
            paused: false,
            game_over: false,
            debug_overlay: false,
            draft: DraftState::Idle,
            pending_drafts: 0,
            inventory: Vec::new(),
            fx: FxState::default(),
            next_id: 1,
        }
    }

    /// Allocate a run-unique, monotonically increasing entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record an applied upgrade, stacking a counter per id
    pub fn record_upgrade(&mut self, id: UpgradeId) {
        if let Some(entry) = self.inventory.iter_mut().find(|(i, _)| *i == id) {
            entry.1 += 1;
        } else {
            self.inventory.push((id, 1));
        }
    }

    /// Total live transient entities (debug snapshot)
    pub fn entity_count(&self) -> usize {
        self.enemies.len()
            + self.player_projectiles.len()
            + self.enemy_projectiles.len()
            + self.scrap.len()
    }

    /// Clamp the player back inside the arena after a resize mid-run
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let r = self.player.radius;
        self.player.pos.x = self.player.pos.x.clamp(r, width - r);
        self.player.pos.y = self.player.pos.y.clamp(r, height - r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_are_monotonic() {
        let mut world = World::new(1);
        let a = world.next_entity_id();
        let b = world.next_entity_id();
        let c = world.next_entity_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn resize_reclamps_player() {
        let mut world = World::new(1);
        world.player.pos = Vec2::new(900.0, 500.0);
        world.resize(400.0, 300.0);
        assert!(world.player.pos.x <= 400.0 - world.player.radius);
        assert!(world.player.pos.y <= 300.0 - world.player.radius);
    }

    #[test]
    fn inventory_stacks_by_id() {
        let mut world = World::new(1);
        world.record_upgrade(UpgradeId::Damage);
        world.record_upgrade(UpgradeId::Damage);
        world.record_upgrade(UpgradeId::FireRate);
        assert_eq!(world.inventory.len(), 2);
        assert_eq!(world.inventory[0], (UpgradeId::Damage, 2));
    }
}
