//! Difficulty director, scheduled waves, and the boss trigger
//!
//! The director recomputes four saturating multipliers from elapsed
//! time every step, so difficulty ramps without discontinuities. A wave
//! scheduler overrides the spawner on a fixed cadence, and a one-shot
//! boss spawn fires at a fixed time threshold.

use super::spawn;
use super::state::{EnemyKind, World};
use crate::consts::*;

fn ramp(base: f32, t: f32, slope: f32, cap: f32) -> f32 {
    (base + t * slope).min(cap)
}

/// Themed wave cycle: kind forced on the spawner plus a banner label
const WAVE_CYCLE: [(EnemyKind, &str); 3] = [
    (EnemyKind::Glider, "Glider swarm"),
    (EnemyKind::Shard, "Shard volley"),
    (EnemyKind::Ram, "Ram stampede"),
];

pub fn run(world: &mut World, _dt: f32) {
    let t = world.elapsed;

    world.director.spawn_rate = ramp(1.0, t, 1.0 / 90.0, 3.0);
    world.director.enemy_speed = ramp(1.0, t, 1.0 / 400.0, 1.6);
    world.director.enemy_hp = ramp(1.0, t, 1.0 / 120.0, 4.0);
    world.director.elite_chance = ramp(0.0, t, 1.0 / 800.0, 0.25);

    // Scheduled waves; cycle through the three themed overrides
    if world.wave.active && t >= world.wave.ends_at {
        world.wave.active = false;
        world.wave.forced_kind = None;
        world.wave.label.clear();
    }
    if !world.wave.active && t >= world.wave.next_event_at {
        let cycle_index =
            ((world.wave.next_event_at / WAVE_INTERVAL) as usize).saturating_sub(1) % WAVE_CYCLE.len();
        let (kind, label) = WAVE_CYCLE[cycle_index];
        world.wave.active = true;
        world.wave.forced_kind = Some(kind);
        world.wave.label = label.to_string();
        world.wave.ends_at = t + WAVE_DURATION;
        world.wave.next_event_at += WAVE_INTERVAL;
        log::info!("wave event at {t:.1}s: {label}");
    }

    // One-shot boss spawn, even if the threshold is crossed mid-frame
    if !world.boss.spawned && t >= BOSS_SPAWN_TIME {
        world.boss.spawned = true;
        let id = spawn::spawn_boss(world);
        world.boss.enemy_id = Some(id);
        world.wave.active = true;
        world.wave.forced_kind = None;
        world.wave.label = format!("{} approaches", EnemyKind::Boss.label());
        world.wave.ends_at = t + WAVE_DURATION;
        log::info!("boss spawned at {t:.1}s (id {id})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn ramps_are_monotonic_and_capped() {
        let mut world = World::new(1);
        let mut prev = 0.0;
        for i in 0..1200 {
            world.elapsed = i as f32;
            run(&mut world, SIM_DT);
            assert!(world.director.spawn_rate >= prev);
            prev = world.director.spawn_rate;
        }
        assert_eq!(world.director.spawn_rate, 3.0);
        assert_eq!(world.director.enemy_hp, 4.0);
        assert!(world.director.elite_chance <= 0.25);
    }

    #[test]
    fn wave_fires_on_schedule_and_ends() {
        let mut world = World::new(1);
        world.elapsed = WAVE_INTERVAL + 0.01;
        run(&mut world, SIM_DT);
        assert!(world.wave.active);
        assert_eq!(world.wave.forced_kind, Some(EnemyKind::Glider));
        assert!(!world.wave.label.is_empty());

        world.elapsed = WAVE_INTERVAL + WAVE_DURATION + 0.1;
        run(&mut world, SIM_DT);
        assert!(!world.wave.active);
        assert!(world.wave.forced_kind.is_none());
    }

    #[test]
    fn boss_spawns_exactly_once() {
        let mut world = World::new(1);
        world.elapsed = BOSS_SPAWN_TIME + 5.0;
        run(&mut world, SIM_DT);
        assert!(world.boss.spawned);
        let boss_count = world
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Boss)
            .count();
        assert_eq!(boss_count, 1);

        // Threshold crossed again on later steps: still one boss
        world.elapsed += 10.0;
        run(&mut world, SIM_DT);
        let boss_count = world
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Boss)
            .count();
        assert_eq!(boss_count, 1);
    }
}
