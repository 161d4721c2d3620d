//! Snapshot types handed to rendering/UI collaborators
//!
//! Derived from world state at the end of each update step (or once per
//! paused/drafting frame). Plain data, serializable, no references back
//! into the simulation.

use serde::Serialize;

use crate::sim::enemy::boss_phase;
use crate::sim::{DraftState, EnemyKind, Rarity, UpgradeId, World};

#[derive(Debug, Clone, Serialize)]
pub struct BossSummary {
    pub active: bool,
    pub name: &'static str,
    pub hp: f32,
    pub max_hp: f32,
    pub phase: u32,
    /// Hp fractions where the phase changes, for bar markers
    pub phase_markers: [f32; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub elapsed: f32,
    pub level: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub seed: u32,
    pub kills: u32,
    pub dash_cooldown: f32,
    pub dash_cooldown_total: f32,
    pub xp: f32,
    pub xp_to_next: f32,
    pub weapon_name: String,
    pub wave_label: Option<String>,
    pub boss: Option<BossSummary>,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DebugSnapshot {
    /// Smoothed instantaneous frame rate
    pub fps: f32,
    /// Last step delta in milliseconds
    pub last_dt_ms: f32,
    pub entity_count: usize,
    pub seed: u32,
    pub paused: bool,
    pub overlay_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftOptionView {
    pub id: UpgradeId,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftSnapshot {
    pub active: bool,
    pub options: Vec<DraftOptionView>,
}

/// Stack-counted applied upgrades
#[derive(Debug, Clone, Serialize)]
pub struct InventorySnapshot {
    pub entries: Vec<(UpgradeId, u32)>,
}

impl HudSnapshot {
    pub fn from_world(world: &World) -> Self {
        let boss = world.boss.enemy_id.and_then(|id| {
            world.enemies.iter().find(|e| e.id == id).map(|e| BossSummary {
                active: true,
                name: EnemyKind::Boss.label(),
                hp: e.hp,
                max_hp: e.max_hp,
                phase: boss_phase(e.hp, e.max_hp),
                phase_markers: [2.0 / 3.0, 1.0 / 3.0],
            })
        });
        Self {
            elapsed: world.elapsed,
            level: world.level,
            hp: world.player.hp,
            max_hp: world.player.max_hp,
            seed: world.seed,
            kills: world.kills,
            dash_cooldown: world.player.dash_cooldown,
            dash_cooldown_total: world.player.dash_cooldown_total(),
            xp: world.xp,
            xp_to_next: world.xp_to_next,
            weapon_name: world.weapon.name.clone(),
            wave_label: world.wave.active.then(|| world.wave.label.clone()),
            boss,
            game_over: world.game_over,
        }
    }
}

impl DraftSnapshot {
    pub fn from_world(world: &World) -> Self {
        match &world.draft {
            DraftState::Idle => Self { active: false, options: Vec::new() },
            DraftState::Active { options } => Self {
                active: true,
                options: options
                    .iter()
                    .map(|o| DraftOptionView {
                        id: o.id,
                        title: o.title.clone(),
                        description: o.description.clone(),
                        rarity: o.rarity,
                        icon: o.icon.clone(),
                    })
                    .collect(),
            },
        }
    }
}
