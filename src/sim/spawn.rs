//! Enemy spawner: cooldown pacing, danger-banded kind selection, elite
//! rolls, and safe edge placement.

use glam::Vec2;

use super::state::{ChargeState, Enemy, EnemyKind, World};
use crate::consts::*;

/// Base stats per kind before director scaling
fn base_stats(kind: EnemyKind) -> (f32, f32, f32, f32, f32) {
    // (hp, radius, speed, contact_damage, xp_value)
    match kind {
        EnemyKind::Glider => (12.0, 8.0, 95.0, 10.0, 2.0),
        EnemyKind::Shard => (20.0, 9.0, 70.0, 12.0, 4.0),
        EnemyKind::Ram => (45.0, 13.0, 60.0, 24.0, 7.0),
        EnemyKind::Boss => (1400.0, 34.0, 55.0, 30.0, 120.0),
    }
}

/// Pick a spawn point on the arena edges at a safe distance from the
/// player. Bounded sampling: accept the first of up to 40 edge points
/// far enough away, else fall back to a point exactly at the safe
/// radius in a random direction.
pub fn pick_spawn_point(world: &mut World) -> Vec2 {
    let (w, h) = (world.width, world.height);
    let player = world.player.pos;
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        let edge = world.rng.index(4);
        let t = world.rng.next_f32();
        let p = match edge {
            0 => Vec2::new(t * w, 0.0),
            1 => Vec2::new(t * w, h),
            2 => Vec2::new(0.0, t * h),
            _ => Vec2::new(w, t * h),
        };
        if p.distance_squared(player) >= SAFE_SPAWN_RADIUS * SAFE_SPAWN_RADIUS {
            return p;
        }
    }
    let angle = world.rng.next_f32() * std::f32::consts::TAU;
    player + Vec2::new(angle.cos(), angle.sin()) * SAFE_SPAWN_RADIUS
}

/// Danger-banded kind weighting: weak kinds only at low danger, tougher
/// kinds gain weight as the run ramps up. Wave overrides force one kind.
fn choose_kind(world: &mut World) -> EnemyKind {
    if let Some(forced) = world.wave.forced_kind {
        return forced;
    }
    let danger = world.director.spawn_rate; // 1.0 .. 3.0
    let roll = world.rng.next_f32();
    if danger < 1.3 {
        EnemyKind::Glider
    } else if danger < 2.0 {
        // shards phase in
        if roll < 0.7 { EnemyKind::Glider } else { EnemyKind::Shard }
    } else if roll < 0.5 {
        EnemyKind::Glider
    } else if roll < 0.8 {
        EnemyKind::Shard
    } else {
        EnemyKind::Ram
    }
}

/// Construct one enemy of the given kind at a position, applying
/// director hp/speed scaling and the elite roll
pub fn make_enemy(world: &mut World, kind: EnemyKind, pos: Vec2, allow_elite: bool) -> Enemy {
    let (hp, radius, speed, contact_damage, xp_value) = base_stats(kind);
    let elite = allow_elite
        && kind != EnemyKind::Boss
        && world.rng.chance(world.director.elite_chance);

    let hp_mult = world.director.enemy_hp * if elite { 2.5 } else { 1.0 };
    let speed_mult = world.director.enemy_speed * if elite { 1.2 } else { 1.0 };
    let hp = hp * hp_mult;

    Enemy {
        id: world.next_entity_id(),
        kind,
        pos,
        vel: Vec2::ZERO,
        hp,
        max_hp: hp,
        radius: if elite { radius * 1.4 } else { radius },
        speed: speed * speed_mult,
        elite,
        xp_value: if elite { xp_value * 3.0 } else { xp_value },
        contact_damage,
        contact_cooldown: 0.0,
        fire_cooldown: 1.0,
        charge: ChargeState::Approach,
        charge_timer: 0.0,
        wobble_phase: world.rng.next_f32() * std::f32::consts::TAU,
        hazard_cooldown: 0.0,
        reinforce_cooldown: 6.0,
    }
}

/// Spawn the boss at a safe edge point. Returns its entity id.
pub fn spawn_boss(world: &mut World) -> u32 {
    let pos = pick_spawn_point(world);
    let boss = make_enemy(world, EnemyKind::Boss, pos, false);
    let id = boss.id;
    world.enemies.push(boss);
    id
}

pub fn run(world: &mut World, dt: f32) {
    world.spawn_cooldown -= dt;
    if world.spawn_cooldown > 0.0 {
        return;
    }
    // Cooldown shrinks with danger, down to a floor
    world.spawn_cooldown =
        (SPAWN_COOLDOWN_BASE / world.director.spawn_rate).max(SPAWN_COOLDOWN_FLOOR);

    let boss_alive = world
        .boss
        .enemy_id
        .is_some_and(|id| world.enemies.iter().any(|e| e.id == id));

    // 1-2 enemies per firing, boosted during waves, throttled while the
    // boss is alive
    let mut count = 1 + world.rng.index(2);
    if world.wave.active {
        count += 2;
    }
    if boss_alive {
        count = 1;
    }

    for _ in 0..count {
        let kind = choose_kind(world);
        let pos = pick_spawn_point(world);
        let enemy = make_enemy(world, kind, pos, true);
        world.enemies.push(enemy);
    }
}
