//! Autofire, hazards, projectile integration, combat resolution and
//! leveling.
//!
//! Resolution is pairwise circle-circle overlap, the reference
//! semantics. Ordering matters: projectiles must have integrated and
//! enemies moved before hits are resolved in the same step.

use glam::Vec2;

use super::state::{EnemyKind, Scrap, World};
use super::upgrades;
use crate::consts::*;
use crate::{angle_to_vec, safe_normalize};

const CONTACT_COOLDOWN: f32 = 0.6;
const HAZARD_COOLDOWN: f32 = 0.4;
const CHAIN_RANGE: f32 = 150.0;
const PROJECTILE_BOUND_MARGIN: f32 = 60.0;
const PROJECTILE_TRAIL: usize = 8;

/// Fire at the nearest in-range enemy. Squared-distance scan with no
/// early exit; ties break to the first found. With no target the shot
/// goes out along the current facing.
pub fn autofire(world: &mut World, dt: f32) {
    world.weapon.cooldown -= dt;
    if world.weapon.cooldown > 0.0 {
        return;
    }
    world.weapon.cooldown = 1.0 / world.weapon.fire_rate;

    let origin = world.player.pos;
    let range_sq = world.weapon.range * world.weapon.range;
    let mut best: Option<(f32, Vec2)> = None;
    for e in &world.enemies {
        let d = e.pos.distance_squared(origin);
        if d <= range_sq && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, e.pos));
        }
    }

    let dir = match best {
        Some((_, target)) => safe_normalize(target - origin, angle_to_vec(world.player.facing)),
        None => angle_to_vec(world.player.facing),
    };

    let weapon = &world.weapon;
    let (vel, lifetime, damage, pierce, chain, crit, knockback) = (
        dir * weapon.projectile_speed,
        weapon.range / weapon.projectile_speed,
        weapon.damage,
        weapon.pierce,
        weapon.chain,
        weapon.crit_chance,
        weapon.knockback,
    );
    let p = world.player_projectiles.alloc();
    p.pos = origin;
    p.vel = vel;
    p.radius = 4.0;
    p.lifetime = lifetime;
    p.damage = damage;
    p.pierce_remaining = pierce;
    p.chain_remaining = chain;
    p.crit_chance = crit;
    p.knockback = knockback;
    p.hit_ids.clear();
    p.trail.clear();
    p.expired = false;
}

/// Saw-ring and mine hazards: continuous or triggered area damage,
/// independent of projectiles
pub fn hazards(world: &mut World, dt: f32) {
    let player_pos = world.player.pos;

    if let Some(mut saw) = world.saw.take() {
        saw.angle += dt * (2.5 + 0.2 * saw.level as f32);
        let blades = saw.blade_count();
        for b in 0..blades {
            let a = saw.angle + b as f32 * std::f32::consts::TAU / blades as f32;
            let blade_pos = player_pos + angle_to_vec(a) * saw.orbit_radius;
            for e in &mut world.enemies {
                if e.hazard_cooldown > 0.0 {
                    continue;
                }
                let reach = saw.blade_radius + e.radius;
                if e.pos.distance_squared(blade_pos) <= reach * reach {
                    e.hp = (e.hp - saw.damage).max(0.0);
                    e.hazard_cooldown = HAZARD_COOLDOWN;
                    let push = safe_normalize(e.pos - player_pos, Vec2::X);
                    e.vel += push * 40.0;
                    world.fx.damage_number(e.pos, saw.damage, false);
                }
            }
        }
        world.saw = Some(saw);
    }

    if let Some(mut layer) = world.mines.take() {
        layer.place_cooldown -= dt;
        if layer.place_cooldown <= 0.0 && layer.mines.len() < layer.max_mines() {
            layer.place_cooldown = 3.0;
            layer.mines.push(super::state::Mine {
                pos: player_pos,
                arm_timer: 0.8,
                trigger_radius: 26.0,
                blast_radius: 60.0,
            });
        }

        let damage = layer.damage();
        layer.mines.retain_mut(|mine| {
            mine.arm_timer -= dt;
            if mine.arm_timer > 0.0 {
                return true;
            }
            let triggered = world.enemies.iter().any(|e| {
                let reach = mine.trigger_radius + e.radius;
                e.pos.distance_squared(mine.pos) <= reach * reach
            });
            if !triggered {
                return true;
            }
            for e in &mut world.enemies {
                let reach = mine.blast_radius + e.radius;
                if e.pos.distance_squared(mine.pos) <= reach * reach {
                    e.hp = (e.hp - damage).max(0.0);
                    world.fx.damage_number(e.pos, damage, false);
                }
            }
            world.fx.burst(mine.pos, 18, 160.0, mine.pos.x.to_bits());
            world.fx.request_shake(0.3);
            false
        });
        world.mines = Some(layer);
    }
}

/// Move every projectile, age trails, and expire by lifetime or by
/// leaving the expanded arena bound
pub fn integrate_projectiles(world: &mut World, dt: f32) {
    let m = PROJECTILE_BOUND_MARGIN;
    let (w, h) = (world.width, world.height);
    let out = |pos: Vec2| pos.x < -m || pos.x > w + m || pos.y < -m || pos.y > h + m;

    for p in world.player_projectiles.iter_mut() {
        p.pos += p.vel * dt;
        p.lifetime -= dt;
        p.trail.insert(0, p.pos);
        p.trail.truncate(PROJECTILE_TRAIL);
        if p.lifetime <= 0.0 || out(p.pos) {
            p.expired = true;
        }
    }
    for p in world.enemy_projectiles.iter_mut() {
        p.pos += p.vel * dt;
        p.lifetime -= dt;
        p.trail.insert(0, p.pos);
        p.trail.truncate(PROJECTILE_TRAIL);
        if p.lifetime <= 0.0 || out(p.pos) {
            p.expired = true;
        }
    }
}

/// Magnet pull, collection, and the repeated level-up loop
pub fn pickups(world: &mut World, dt: f32) {
    let player_pos = world.player.pos;
    let magnet_radius = MAGNET_RADIUS * world.player.magnet_mult;
    let collect_radius = PICKUP_RADIUS + world.player.radius;

    let mut gained = 0.0;
    world.scrap.retain_mut(|s| {
        s.lifetime -= dt;
        if s.lifetime <= 0.0 {
            return false;
        }
        let to_player = player_pos - s.pos;
        let dist = to_player.length();
        if dist < magnet_radius {
            // Pull hardens as the gap closes
            let pull = 600.0 * (1.0 - dist / magnet_radius) + 120.0;
            s.vel += safe_normalize(to_player, Vec2::X) * pull * dt;
        }
        s.vel *= 0.92;
        s.pos += s.vel * dt;

        if dist < collect_radius {
            gained += s.value;
            false
        } else {
            true
        }
    });

    if gained > 0.0 {
        world.xp += gained;
        // A single big pickup can clear several thresholds; each level
        // owes its own draft, served one at a time
        while world.xp >= world.xp_to_next {
            world.xp -= world.xp_to_next;
            world.level += 1;
            world.xp_to_next = (world.xp_to_next * XP_GROWTH_MUL + XP_GROWTH_ADD).round();
            world.pending_drafts += 1;
            log::info!("level up -> {} (next at {} xp)", world.level, world.xp_to_next);
        }
        if world.pending_drafts > 0 && !world.draft.is_active() {
            world.pending_drafts -= 1;
            upgrades::open_draft(world);
        }
    }
}

fn damage_player(world: &mut World, amount: f32) {
    let player = &mut world.player;
    if player.invuln_remaining > 0.0 {
        return;
    }
    let scaled = if player.grace_remaining > 0.0 {
        amount * GRACE_DAMAGE_SCALE
    } else {
        player.grace_remaining = GRACE_DURATION;
        amount
    };
    player.hp = (player.hp - scaled).max(0.0);
    world.fx.request_shake(0.25);
    world.fx.request_hit_stop(0.05);
    if world.player.hp <= 0.0 && !world.game_over {
        world.game_over = true;
        log::info!("run over at {:.1}s, level {}", world.elapsed, world.level);
    }
}

/// Pairwise hit resolution: enemy contact, enemy shots, player shots
/// (with crit/pierce/chain), then death sweep and scrap drops
pub fn resolve(world: &mut World, _dt: f32) {
    let player_pos = world.player.pos;
    let player_radius = world.player.radius;

    // (a) enemy contact vs player
    let mut contact_damage = 0.0;
    let mut knock = Vec2::ZERO;
    for e in &mut world.enemies {
        if e.contact_cooldown > 0.0 {
            continue;
        }
        let reach = e.radius + player_radius;
        if e.pos.distance_squared(player_pos) <= reach * reach {
            e.contact_cooldown = CONTACT_COOLDOWN;
            contact_damage += e.contact_damage;
            knock += safe_normalize(player_pos - e.pos, Vec2::X) * 160.0;
        }
    }
    if contact_damage > 0.0 {
        damage_player(world, contact_damage);
        world.player.vel += knock;
    }

    // (b) enemy projectile vs player; consumed on hit
    let mut shot_damage = 0.0;
    for p in world.enemy_projectiles.iter_mut() {
        let reach = p.radius + player_radius;
        if p.pos.distance_squared(player_pos) <= reach * reach {
            shot_damage += p.damage;
            p.expired = true;
        }
    }
    if shot_damage > 0.0 {
        damage_player(world, shot_damage);
    }

    // (c) player projectile vs each not-yet-hit enemy. The pool moves
    // out of the world for the scan so enemies, rng and fx stay freely
    // borrowable.
    let mut projectiles = std::mem::take(&mut world.player_projectiles);
    for p in projectiles.iter_mut() {
        if p.expired {
            continue;
        }
        let mut scan = 0;
        while scan < world.enemies.len() {
            let (eid, epos, eradius) = {
                let e = &world.enemies[scan];
                (e.id, e.pos, e.radius)
            };
            scan += 1;
            if p.hit_ids.contains(&eid) {
                continue;
            }
            let reach = p.radius + eradius;
            if p.pos.distance_squared(epos) > reach * reach {
                continue;
            }

            let crit = world.rng.chance(p.crit_chance);
            let dealt = if crit { p.damage * 2.0 } else { p.damage };
            let push = safe_normalize(epos - p.pos, Vec2::X) * p.knockback;
            {
                let e = &mut world.enemies[scan - 1];
                e.hp = (e.hp - dealt).max(0.0);
                e.vel += push;
            }
            p.hit_ids.push(eid);
            world.fx.damage_number(epos, dealt, crit);
            world.fx.hit_burst(epos, dealt);

            if p.pierce_remaining > 0 {
                // Pass through and keep scanning
                p.pierce_remaining -= 1;
                continue;
            }
            if p.chain_remaining > 0 {
                // Retarget from the hit point toward the nearest enemy
                // not yet on the hit list
                let mut best: Option<(f32, Vec2)> = None;
                for e in &world.enemies {
                    if p.hit_ids.contains(&e.id) {
                        continue;
                    }
                    let d = e.pos.distance_squared(p.pos);
                    if d <= CHAIN_RANGE * CHAIN_RANGE && best.is_none_or(|(bd, _)| d < bd) {
                        best = Some((d, e.pos));
                    }
                }
                if let Some((_, target)) = best {
                    p.chain_remaining -= 1;
                    let speed = p.vel.length();
                    p.vel = safe_normalize(target - p.pos, Vec2::X) * speed;
                    break;
                }
            }
            p.expired = true;
            break;
        }
    }
    world.player_projectiles = projectiles;

    // Death sweep: scrap drops first, removal in the same frame
    let mut drops: Vec<(Vec2, f32, bool)> = Vec::new();
    for e in &world.enemies {
        if e.hp <= 0.0 {
            drops.push((e.pos, e.xp_value, e.kind == EnemyKind::Boss));
        }
    }
    if !drops.is_empty() {
        world.kills += drops.len() as u32;
        world.enemies.retain(|e| e.hp > 0.0);
        for (pos, value, was_boss) in drops {
            // Bigger rewards scatter into several pieces
            let pieces = if was_boss { 8 } else if value >= 6.0 { 2 } else { 1 };
            for _ in 0..pieces {
                let angle = world.rng.next_f32() * std::f32::consts::TAU;
                let speed = world.rng.range(20.0, 70.0);
                let id = world.next_entity_id();
                world.scrap.push(Scrap {
                    id,
                    pos,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    value: value / pieces as f32,
                    lifetime: SCRAP_LIFETIME,
                });
            }
            world.fx.burst(pos, 12, 140.0, pos.x.to_bits());
            if was_boss {
                world.boss.defeated = true;
                world.wave.active = true;
                world.wave.forced_kind = None;
                world.wave.label = "Rustbreaker down".to_string();
                world.wave.ends_at = world.elapsed + WAVE_DURATION;
                world.fx.request_shake(0.8);
                log::info!("boss defeated at {:.1}s", world.elapsed);
            }
        }
    }

    // End-of-frame slot recycling
    world.player_projectiles.release_where(|p| p.expired);
    world.enemy_projectiles.release_where(|p| p.expired);
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::spawn;
    use crate::consts::SIM_DT;

    #[test]
    fn contact_hit_applies_type_damage_and_grace() {
        let mut world = World::new(11);
        let pos = world.player.pos;
        let ram = spawn::make_enemy(&mut world, EnemyKind::Ram, pos, false);
        world.enemies.push(ram);
        resolve(&mut world, SIM_DT);
        assert_eq!(world.player.hp, 76.0);
        assert_eq!(world.player.grace_remaining, GRACE_DURATION);
        assert_eq!(world.player.invuln_remaining, 0.0);
    }

    #[test]
    fn grace_scales_followup_damage() {
        let mut world = World::new(11);
        world.player.grace_remaining = 0.3;
        let pos = world.player.pos;
        let ram = spawn::make_enemy(&mut world, EnemyKind::Ram, pos, false);
        world.enemies.push(ram);
        resolve(&mut world, SIM_DT);
        assert!((world.player.hp - (100.0 - 24.0 * GRACE_DAMAGE_SCALE)).abs() < 1e-3);
    }

    #[test]
    fn dash_invuln_suppresses_damage() {
        let mut world = World::new(11);
        world.player.invuln_remaining = 0.2;
        let pos = world.player.pos;
        let ram = spawn::make_enemy(&mut world, EnemyKind::Ram, pos, false);
        world.enemies.push(ram);
        resolve(&mut world, SIM_DT);
        assert_eq!(world.player.hp, 100.0);
    }

    #[test]
    fn projectile_hits_each_enemy_at_most_once() {
        let mut world = World::new(11);
        let pos = world.player.pos + Vec2::X * 10.0;
        let e = spawn::make_enemy(&mut world, EnemyKind::Glider, pos, false);
        let id = e.id;
        world.enemies.push(e);
        let p = world.player_projectiles.alloc();
        p.pos = world.player.pos + Vec2::X * 10.0;
        p.vel = Vec2::ZERO;
        p.radius = 4.0;
        p.lifetime = 1.0;
        p.damage = 1.0;
        p.pierce_remaining = 5;
        p.crit_chance = 0.0;
        p.hit_ids.clear();
        p.expired = false;

        resolve(&mut world, SIM_DT);
        let hp_after_first = world.enemies[0].hp;
        resolve(&mut world, SIM_DT);
        assert_eq!(world.enemies[0].hp, hp_after_first);
        let proj = world.player_projectiles.iter().next().unwrap();
        assert_eq!(proj.hit_ids.iter().filter(|i| **i == id).count(), 1);
    }

    #[test]
    fn defeated_enemy_drops_scrap_and_is_removed() {
        let mut world = World::new(11);
        let mut e = spawn::make_enemy(&mut world, EnemyKind::Glider, Vec2::new(300.0, 300.0), false);
        e.hp = 0.0;
        world.enemies.push(e);
        resolve(&mut world, SIM_DT);
        assert!(world.enemies.is_empty());
        assert!(!world.scrap.is_empty());
        assert_eq!(world.kills, 1);
    }

    #[test]
    fn boss_defeat_sets_run_flag_and_banner() {
        let mut world = World::new(11);
        let mut boss = spawn::make_enemy(&mut world, EnemyKind::Boss, Vec2::new(300.0, 300.0), false);
        boss.hp = 0.0;
        world.enemies.push(boss);
        resolve(&mut world, SIM_DT);
        assert!(world.boss.defeated);
        assert!(world.wave.active);
        assert!(world.wave.label.contains("down"));
    }

    #[test]
    fn pickup_collection_levels_up_in_a_loop() {
        let mut world = World::new(11);
        world.xp = 8.0;
        world.xp_to_next = 10.0;
        world.scrap.push(Scrap {
            id: 1,
            pos: world.player.pos,
            vel: Vec2::ZERO,
            value: 5.0,
            lifetime: 5.0,
        });
        pickups(&mut world, SIM_DT);
        assert_eq!(world.level, 2);
        assert!((world.xp - 3.0).abs() < 1e-4);
        assert_eq!(world.xp_to_next, (10.0f32 * XP_GROWTH_MUL + XP_GROWTH_ADD).round());
        assert!(world.draft.is_active());
    }

    #[test]
    fn oversized_pickup_drafts_once_per_level() {
        let mut world = World::new(11);
        world.xp_to_next = 10.0;
        world.scrap.push(Scrap {
            id: 1,
            pos: world.player.pos,
            vel: Vec2::ZERO,
            value: 60.0,
            lifetime: 5.0,
        });
        pickups(&mut world, SIM_DT);
        // 60 xp clears 10, 17 and 26 -> three levels
        assert_eq!(world.level, 4);

        let mut drafted = 0u32;
        while world.draft.is_active() {
            upgrades::choose(&mut world, 0);
            drafted += 1;
            assert!(drafted <= 3, "more drafts than levels gained");
        }
        assert_eq!(drafted, 3);
        assert_eq!(world.pending_drafts, 0);
        let stacks: u32 = world.inventory.iter().map(|(_, n)| n).sum();
        assert_eq!(stacks, 3);
    }

    #[test]
    fn autofire_prefers_nearest_enemy() {
        let mut world = World::new(11);
        let pos = world.player.pos + Vec2::X * 50.0;
        let near = spawn::make_enemy(&mut world, EnemyKind::Glider, pos, false);
        let far_pos = world.player.pos + Vec2::X * 120.0;
        let far = spawn::make_enemy(&mut world, EnemyKind::Glider, far_pos, false);
        world.enemies.push(far);
        world.enemies.push(near);
        world.weapon.cooldown = 0.0;
        autofire(&mut world, SIM_DT);
        let p = world.player_projectiles.iter().next().unwrap();
        assert!(p.vel.x > 0.0 && p.vel.y.abs() < 1.0);
    }

    #[test]
    fn saw_damage_respects_hazard_cooldown() {
        let mut world = World::new(11);
        world.saw = Some(super::super::state::SawRing::new());
        let orbit = world.saw.as_ref().unwrap().orbit_radius;
        let pos = world.player.pos;
        let mut e = spawn::make_enemy(&mut world, EnemyKind::Ram, pos, false);
        // Park the enemy right on the first blade
        e.pos = world.player.pos + Vec2::X * orbit;
        e.radius = orbit; // covers every blade position
        world.enemies.push(e);
        hazards(&mut world, SIM_DT);
        let hp1 = world.enemies[0].hp;
        assert!(hp1 < world.enemies[0].max_hp);
        hazards(&mut world, SIM_DT);
        assert_eq!(world.enemies[0].hp, hp1);
    }
}
