//! Upgrade draft engine
//!
//! On level-up the run freezes and the player drafts one of three
//! options rolled without replacement from a rarity-weighted pool. The
//! pool is rebuilt from current state each time: locked hazards show up
//! as unlock entries, owned ones as level-ups. Choosing applies the
//! effect exactly once and returns the draft to `Idle`, or straight into
//! the next queued draft when a jump cleared several levels at once.

use serde::{Deserialize, Serialize};

use super::state::{MineLayer, SawRing, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeId {
    Damage,
    FireRate,
    ProjectileSpeed,
    Range,
    Pierce,
    Chain,
    CritChance,
    Knockback,
    MoveSpeed,
    DashCooldown,
    Magnet,
    MaxHp,
    SawUnlock,
    SawLevel,
    MinesUnlock,
    MinesLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    /// Draft roll weight; commons dominate, epics are scarce
    fn weight(self) -> f32 {
        match self {
            Rarity::Common => 100.0,
            Rarity::Rare => 35.0,
            Rarity::Epic => 10.0,
        }
    }
}

/// One offered draft entry, as shown to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub id: UpgradeId,
    pub title: String,
    pub description: String,
    pub rarity: Rarity,
    pub icon: String,
}

/// Draft gate. While `Active` the gameplay pipeline is suspended; only
/// draft-choice input is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum DraftState {
    #[default]
    Idle,
    Active {
        options: Vec<UpgradeOption>,
    },
}

impl DraftState {
    pub fn is_active(&self) -> bool {
        matches!(self, DraftState::Active { .. })
    }
}

fn option(id: UpgradeId, title: &str, desc: &str, rarity: Rarity, icon: &'static str) -> UpgradeOption {
    UpgradeOption {
        id,
        title: title.to_string(),
        description: desc.to_string(),
        rarity,
        icon: icon.to_string(),
    }
}

/// Build the draftable pool from current weapon/hazard state
fn build_pool(world: &World) -> Vec<UpgradeOption> {
    use Rarity::*;
    use UpgradeId::*;

    let mut pool = vec![
        option(Damage, "Hardened Slugs", "+15% projectile damage", Common, "slug"),
        option(FireRate, "Rapid Feed", "+12% fire rate", Common, "feed"),
        option(ProjectileSpeed, "Hot Load", "+15% projectile speed", Common, "bolt"),
        option(Range, "Long Barrel", "+12% weapon range", Common, "barrel"),
        option(MoveSpeed, "Greased Servos", "+10% move speed", Common, "servo"),
        option(MaxHp, "Plating", "+20 max hp, heal 20", Common, "plate"),
        option(Magnet, "Scrap Magnet", "+25% pickup radius", Common, "magnet"),
        option(Knockback, "Heavy Rounds", "+30% knockback", Common, "round"),
        option(DashCooldown, "Coolant Flush", "-15% dash cooldown", Rare, "vent"),
        option(CritChance, "Weak-Point Scanner", "+6% crit chance", Rare, "lens"),
        option(Pierce, "Penetrator Tips", "+1 pierce", Rare, "tip"),
        option(Chain, "Arc Coupler", "Shots chain to +1 enemy", Epic, "arc"),
    ];

    // Hazards appear as unlocks until owned, then as level-ups
    match &world.saw {
        None => pool.push(option(SawUnlock, "Saw Ring", "Unlock orbiting blades", Rare, "saw")),
        Some(_) => pool.push(option(SawLevel, "Saw Ring+", "+1 blade, +damage", Rare, "saw")),
    }
    match &world.mines {
        None => pool.push(option(MinesUnlock, "Mine Dropper", "Unlock proximity mines", Rare, "mine")),
        Some(_) => pool.push(option(MinesLevel, "Mine Dropper+", "+1 mine, +damage", Rare, "mine")),
    }

    pool
}

/// Roll exactly 3 options without replacement, weighted by rarity, and
/// activate the draft
pub fn open_draft(world: &mut World) {
    let mut pool = build_pool(world);
    let mut options = Vec::with_capacity(3);

    while options.len() < 3 && !pool.is_empty() {
        let total: f32 = pool.iter().map(|o| o.rarity.weight()).sum();
        let mut roll = world.rng.next_f32() * total;
        let mut picked = pool.len() - 1;
        for (i, opt) in pool.iter().enumerate() {
            roll -= opt.rarity.weight();
            if roll <= 0.0 {
                picked = i;
                break;
            }
        }
        options.push(pool.remove(picked));
    }

    log::debug!(
        "draft opened at level {}: {:?}",
        world.level,
        options.iter().map(|o| o.id).collect::<Vec<_>>()
    );
    world.draft = DraftState::Active { options };
}

/// Apply the chosen option and close the draft. Out-of-range indices and
/// calls while the draft is idle are no-ops.
pub fn choose(world: &mut World, index: usize) {
    let chosen = match &world.draft {
        DraftState::Active { options } => options.get(index).cloned(),
        DraftState::Idle => None,
    };
    let Some(opt) = chosen else { return };

    apply(world, opt.id);
    world.record_upgrade(opt.id);
    world.draft = DraftState::Idle;
    log::info!("upgrade chosen: {:?}", opt.id);

    // A multi-level jump queues further drafts; serve the next one now
    if world.pending_drafts > 0 {
        world.pending_drafts -= 1;
        open_draft(world);
    }
}

fn apply(world: &mut World, id: UpgradeId) {
    use UpgradeId::*;
    match id {
        Damage => world.weapon.damage *= 1.15,
        FireRate => world.weapon.fire_rate *= 1.12,
        ProjectileSpeed => world.weapon.projectile_speed *= 1.15,
        Range => world.weapon.range *= 1.12,
        Pierce => world.weapon.pierce += 1,
        Chain => world.weapon.chain += 1,
        CritChance => world.weapon.crit_chance = (world.weapon.crit_chance + 0.06).min(0.8),
        Knockback => world.weapon.knockback *= 1.3,
        MoveSpeed => world.player.move_speed_mult *= 1.1,
        DashCooldown => world.player.dash_cooldown_mult *= 0.85,
        Magnet => world.player.magnet_mult *= 1.25,
        MaxHp => {
            world.player.max_hp += 20.0;
            world.player.hp = (world.player.hp + 20.0).min(world.player.max_hp);
        }
        SawUnlock => world.saw = Some(SawRing::new()),
        SawLevel => {
            if let Some(saw) = &mut world.saw {
                saw.level += 1;
                saw.damage += 3.0;
            }
        }
        MinesUnlock => world.mines = Some(MineLayer::new()),
        MinesLevel => {
            if let Some(mines) = &mut world.mines {
                mines.level += 1;
            }
        }
    }
}
