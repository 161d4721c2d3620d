//! Per-kind enemy behavior
//!
//! Each variant is a distinct steering routine keyed off the direction
//! and distance to the player. Projectile and reinforcement spawns are
//! deferred to after the iteration so the world stays singly borrowed.

use glam::Vec2;

use super::spawn;
use super::state::{ChargeState, EnemyKind, World};
use crate::consts::SAFE_SPAWN_RADIUS;
use crate::safe_normalize;

const SHARD_STANDOFF: f32 = 180.0;
const SHARD_SHOT_SPEED: f32 = 220.0;
const SHARD_FIRE_INTERVAL: f32 = 2.2;
const RAM_WINDUP: f32 = 0.55;
const RAM_CHARGE_TRIGGER: f32 = 150.0;
const RAM_CHARGE_SPEED: f32 = 3.4;
const RAM_CHARGE_MAX: f32 = 1.1;
const BOSS_VOLLEY_INTERVAL: f32 = 3.2;
const BOSS_REINFORCE_INTERVAL: f32 = 9.0;

/// Boss phase 1-3 from hp thirds; higher phases attack faster
pub fn boss_phase(hp: f32, max_hp: f32) -> u32 {
    let frac = hp / max_hp;
    if frac > 2.0 / 3.0 {
        1
    } else if frac > 1.0 / 3.0 {
        2
    } else {
        3
    }
}

pub fn run(world: &mut World, dt: f32) {
    let player_pos = world.player.pos;
    let player_vel = world.player.vel;

    // (pos, vel, damage) for shots; spawn kinds for boss reinforcements
    let mut shots: Vec<(Vec2, Vec2, f32)> = Vec::new();
    let mut reinforcements = 0u32;
    let mut reinforce_origin = Vec2::ZERO;

    for i in 0..world.enemies.len() {
        // Timers first; shared across kinds
        {
            let e = &mut world.enemies[i];
            e.contact_cooldown = (e.contact_cooldown - dt).max(0.0);
            e.hazard_cooldown = (e.hazard_cooldown - dt).max(0.0);
            e.fire_cooldown -= dt;
        }

        let (kind, pos, speed) = {
            let e = &world.enemies[i];
            (e.kind, e.pos, e.speed)
        };
        let to_player = player_pos - pos;
        let dist = to_player.length();
        let dir = safe_normalize(to_player, Vec2::X);

        match kind {
            EnemyKind::Glider => {
                let e = &mut world.enemies[i];
                e.wobble_phase += dt * 6.0;
                // Lateral oscillation around the approach vector
                let right = Vec2::new(-dir.y, dir.x);
                let steer = dir + right * e.wobble_phase.sin() * 0.6;
                e.vel = safe_normalize(steer, dir) * speed;
            }
            EnemyKind::Shard => {
                // Hold the standoff band; drift slowly inside it
                let band = dist - SHARD_STANDOFF;
                let approach = (band / 40.0).clamp(-1.0, 1.0);
                world.enemies[i].vel = dir * speed * approach;

                if world.enemies[i].fire_cooldown <= 0.0 {
                    world.enemies[i].fire_cooldown = SHARD_FIRE_INTERVAL;
                    // Lead the shot at the player's predicted position
                    let eta = dist / SHARD_SHOT_SPEED;
                    let predicted = player_pos + player_vel * eta;
                    let aim = safe_normalize(predicted - pos, dir);
                    shots.push((pos, aim * SHARD_SHOT_SPEED, 12.0));
                }
            }
            EnemyKind::Ram => ram_step(world, i, dir, dist, dt, RAM_CHARGE_TRIGGER),
            EnemyKind::Boss => {
                let phase = {
                    let e = &world.enemies[i];
                    boss_phase(e.hp, e.max_hp)
                };
                let cadence = 1.0 / (0.7 + 0.3 * phase as f32);

                // Slow pursuit plus a periodic dash-charge, reusing the
                // ram state machine with a longer trigger range
                ram_step(world, i, dir, dist, dt, 240.0);

                let e = &mut world.enemies[i];
                if e.fire_cooldown <= 0.0 {
                    e.fire_cooldown = BOSS_VOLLEY_INTERVAL * cadence;
                    // Fan volley widens with phase
                    let count = 3 + 2 * phase;
                    let spread = 0.9;
                    let base_angle = dir.y.atan2(dir.x);
                    for s in 0..count {
                        let frac = s as f32 / (count - 1) as f32 - 0.5;
                        let a = base_angle + frac * spread;
                        let v = Vec2::new(a.cos(), a.sin()) * SHARD_SHOT_SPEED;
                        shots.push((pos, v, 14.0));
                    }
                }

                e.reinforce_cooldown -= dt;
                if e.reinforce_cooldown <= 0.0 {
                    e.reinforce_cooldown = BOSS_REINFORCE_INTERVAL * cadence;
                    reinforcements = 1 + phase;
                    reinforce_origin = e.pos;
                }
            }
        }

        let e = &mut world.enemies[i];
        e.pos += e.vel * dt;
    }

    for (pos, vel, damage) in shots {
        let p = world.enemy_projectiles.alloc();
        p.pos = pos;
        p.vel = vel;
        p.radius = 4.0;
        p.lifetime = 4.0;
        p.damage = damage;
        p.trail.clear();
        p.expired = false;
    }

    for i in 0..reinforcements {
        let angle = world.rng.next_f32() * std::f32::consts::TAU;
        let mut pos =
            reinforce_origin + Vec2::new(angle.cos(), angle.sin()) * (50.0 + 10.0 * i as f32);
        // The boss fights at melee range; push the drop point out to the
        // safe spawn distance from the player if it lands inside
        if pos.distance_squared(player_pos) < SAFE_SPAWN_RADIUS * SAFE_SPAWN_RADIUS {
            pos = player_pos + safe_normalize(pos - player_pos, Vec2::X) * SAFE_SPAWN_RADIUS;
        }
        let enemy = spawn::make_enemy(world, EnemyKind::Glider, pos, false);
        world.enemies.push(enemy);
    }
}

/// Three-phase charger: idle approach, telegraphed windup, then a
/// high-speed burst that decays back into approach
fn ram_step(world: &mut World, i: usize, dir: Vec2, dist: f32, dt: f32, trigger: f32) {
    let e = &mut world.enemies[i];
    match e.charge {
        ChargeState::Approach => {
            e.vel = dir * e.speed;
            if dist < trigger {
                e.charge = ChargeState::Windup;
                e.charge_timer = RAM_WINDUP;
            }
        }
        ChargeState::Windup => {
            // Telegraph: bleed off speed while aiming
            e.vel *= 0.85;
            e.charge_timer -= dt;
            if e.charge_timer <= 0.0 {
                e.charge = ChargeState::Charging;
                e.charge_timer = RAM_CHARGE_MAX;
                e.vel = dir * e.speed * RAM_CHARGE_SPEED;
            }
        }
        ChargeState::Charging => {
            // Friction decay; re-enter approach once the burst dissipates
            e.vel *= 1.0 - 2.2 * dt;
            e.charge_timer -= dt;
            if e.charge_timer <= 0.0 || e.vel.length() < e.speed {
                e.charge = ChargeState::Approach;
            }
        }
    }
}
