//! Cosmetic visual-effect bookkeeping
//!
//! Everything here is render-facing only: trails, rings, bursts,
//! floating damage numbers, ambient particles, camera-shake and
//! hit-stop requests. Gameplay systems write into this state but never
//! read it back, so a headless build may drop it without changing a run.

use glam::Vec2;

use super::pool::Pool;
use crate::consts::{MAX_PARTICLES, TRAIL_LENGTH};

#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub age: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct DashRing {
    pub pos: Vec2,
    pub age: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct HitBurst {
    pub pos: Vec2,
    pub strength: f32,
    pub age: f32,
}

#[derive(Debug, Clone)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub amount: f32,
    pub crit: bool,
    pub age: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
    pub expired: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FxState {
    /// Player movement trail, newest first
    pub trail: Vec<TrailPoint>,
    pub dash_rings: Vec<DashRing>,
    pub hit_bursts: Vec<HitBurst>,
    pub damage_numbers: Vec<DamageNumber>,
    pub particles: Pool<Particle>,
    /// Camera-shake magnitude request, decays each step
    pub shake: f32,
    /// Hit-stop request in seconds; renderer-only, never consulted by sim
    pub hit_stop: f32,
    /// Particle spawn-count multiplier (reduce-motion throttling)
    pub particle_scale: f32,
}

impl FxState {
    pub fn record_trail(&mut self, pos: Vec2) {
        self.trail.insert(0, TrailPoint { pos, age: 0.0 });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    pub fn dash_ring(&mut self, pos: Vec2) {
        self.dash_rings.push(DashRing { pos, age: 0.0 });
    }

    pub fn hit_burst(&mut self, pos: Vec2, strength: f32) {
        self.hit_bursts.push(HitBurst { pos, strength, age: 0.0 });
    }

    pub fn damage_number(&mut self, pos: Vec2, amount: f32, crit: bool) {
        self.damage_numbers.push(DamageNumber { pos, amount, crit, age: 0.0 });
    }

    pub fn request_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(1.0);
    }

    pub fn request_hit_stop(&mut self, seconds: f32) {
        self.hit_stop = self.hit_stop.max(seconds);
    }

    /// Spawn a radial particle burst, honoring the throttle scale and
    /// the global particle cap
    pub fn burst(&mut self, pos: Vec2, count: usize, speed: f32, hash: u32) {
        let scale = if self.particle_scale > 0.0 { self.particle_scale } else { 1.0 };
        let count = ((count as f32 * scale) as usize).min(count);
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            // Cheap deterministic spread; cosmetic only, off the run RNG
            let h = hash.wrapping_mul(2_654_435_761).wrapping_add(i as u32 * 7919);
            let angle = (h % 1000) as f32 / 1000.0 * std::f32::consts::TAU;
            let mag = speed * (0.5 + (h >> 10 & 0x3FF) as f32 / 2048.0);
            let p = self.particles.alloc();
            p.pos = pos;
            p.vel = Vec2::new(angle.cos(), angle.sin()) * mag;
            p.life = 0.4 + (h >> 20 & 0xFF) as f32 / 512.0;
            p.size = 2.0 + (h >> 12 & 0x7) as f32 * 0.5;
            p.expired = false;
        }
    }

    /// Age every cosmetic record and drop the ones past their life
    pub fn age(&mut self, dt: f32) {
        for p in &mut self.trail {
            p.age += dt;
        }
        self.trail.retain(|p| p.age < 0.5);

        for r in &mut self.dash_rings {
            r.age += dt;
        }
        self.dash_rings.retain(|r| r.age < 0.4);

        for b in &mut self.hit_bursts {
            b.age += dt;
        }
        self.hit_bursts.retain(|b| b.age < 0.3);

        for n in &mut self.damage_numbers {
            n.age += dt;
            n.pos.y -= 24.0 * dt;
        }
        self.damage_numbers.retain(|n| n.age < 0.8);

        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel *= 0.97;
            p.life -= dt;
            if p.life <= 0.0 {
                p.expired = true;
            }
        }
        self.particles.release_where(|p| p.expired);

        self.shake *= 0.88;
        if self.shake < 0.01 {
            self.shake = 0.0;
        }
        self.hit_stop = (self.hit_stop - dt).max(0.0);
    }
}
