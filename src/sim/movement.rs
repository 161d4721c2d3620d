//! Player movement: facing-relative acceleration, split-axis drag,
//! dash, and the soft arena boundary.

use glam::Vec2;

use super::state::World;
use super::update::FrameInput;
use crate::consts::*;
use crate::{angle_to_vec, decay_factor, safe_normalize};

pub fn run(world: &mut World, input: &FrameInput, dt: f32) {
    let player = &mut world.player;

    player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    player.invuln_remaining = (player.invuln_remaining - dt).max(0.0);
    player.grace_remaining = (player.grace_remaining - dt).max(0.0);

    let intent = if input.movement.length_squared() > 1.0 {
        input.movement.normalize()
    } else {
        input.movement
    };
    let has_input = intent.length_squared() > 1e-4;

    // Forward/right basis from the current facing
    let forward = angle_to_vec(player.facing);
    let right = Vec2::new(-forward.y, forward.x);

    // Blend intent into forward thrust plus a lateral turn-assist term
    if has_input {
        let thrust = intent.dot(forward);
        let turn = intent.dot(right);
        player.vel += forward * thrust * PLAYER_ACCEL * dt;
        player.vel += right * turn * PLAYER_ACCEL * TURN_BLEND * dt;
    }

    // Exponential drag, split into longitudinal and lateral components
    // with different decay rates; lateral damping doubles down when idle
    let long = player.vel.dot(forward);
    let lat = player.vel.dot(right);
    let lat_rate = if has_input { LATERAL_DECAY } else { IDLE_LATERAL_DECAY };
    let long_decayed = long * decay_factor(FORWARD_DECAY, dt);
    let lat_decayed = lat * decay_factor(lat_rate, dt);
    player.vel = forward * long_decayed + right * lat_decayed;

    // Dash: instantaneous impulse along intent (or facing), short full
    // invulnerability, cooldown reset
    if input.dash && player.dash_cooldown <= 0.0 {
        let dir = if has_input { intent.normalize() } else { forward };
        player.vel += dir * DASH_IMPULSE;
        player.invuln_remaining = DASH_INVULN;
        player.dash_cooldown = player.dash_cooldown_total();
        let pos = player.pos;
        world.fx.dash_ring(pos);
        world.fx.burst(pos, 10, 120.0, world.elapsed.to_bits());
        world.fx.request_shake(0.2);
    }

    let player = &mut world.player;

    // Speed clamp, scaled by the movement upgrade
    let max_speed = PLAYER_MAX_SPEED * player.move_speed_mult;
    let speed = player.vel.length();
    if speed > max_speed {
        player.vel *= max_speed / speed;
    }

    // Soft boundary: push-back force proportional to penetration into
    // the margin band on each edge
    let m = BOUNDARY_MARGIN;
    let push = 14.0;
    if player.pos.x < m {
        player.vel.x += (m - player.pos.x) * push * dt;
    }
    if player.pos.x > world.width - m {
        player.vel.x -= (player.pos.x - (world.width - m)) * push * dt;
    }
    if player.pos.y < m {
        player.vel.y += (m - player.pos.y) * push * dt;
    }
    if player.pos.y > world.height - m {
        player.vel.y -= (player.pos.y - (world.height - m)) * push * dt;
    }

    player.pos += player.vel * dt;

    // Hard clamp as a backstop behind the soft force
    let r = player.radius;
    player.pos.x = player.pos.x.clamp(r, world.width - r);
    player.pos.y = player.pos.y.clamp(r, world.height - r);

    // Facing tracks velocity once actually moving
    if player.vel.length_squared() > 4.0 {
        let dir = safe_normalize(player.vel, angle_to_vec(player.facing));
        player.facing = dir.y.atan2(dir.x);
    }

    if speed > 30.0 {
        let pos = player.pos;
        world.fx.record_trail(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn step(world: &mut World, input: &FrameInput) {
        run(world, input, SIM_DT);
    }

    #[test]
    fn no_input_means_no_drift() {
        let mut world = World::new(1);
        let start = world.player.pos;
        for _ in 0..400 {
            step(&mut world, &FrameInput::default());
        }
        assert!((world.player.pos - start).length() < 0.5);
    }

    #[test]
    fn dash_applies_impulse_and_cooldown() {
        let mut world = World::new(1);
        let input = FrameInput { movement: Vec2::X, dash: true, ..Default::default() };
        step(&mut world, &input);
        assert!(world.player.vel.length() > 100.0);
        assert!(world.player.dash_cooldown > 0.0);
        assert!(world.player.invuln_remaining > 0.0);

        // Second dash during cooldown adds no fresh invulnerability reset
        let cd = world.player.dash_cooldown;
        step(&mut world, &input);
        assert!(world.player.dash_cooldown < cd);
    }

    #[test]
    fn player_stays_in_bounds() {
        let mut world = World::new(1);
        let input = FrameInput { movement: Vec2::new(1.0, 0.0), ..Default::default() };
        for _ in 0..2000 {
            step(&mut world, &input);
        }
        let r = world.player.radius;
        assert!(world.player.pos.x >= r && world.player.pos.x <= world.width - r);
    }

    #[test]
    fn facing_tracks_movement_direction() {
        let mut world = World::new(1);
        let input = FrameInput { movement: Vec2::new(0.0, 1.0), ..Default::default() };
        for _ in 0..60 {
            step(&mut world, &input);
        }
        let facing = angle_to_vec(world.player.facing);
        assert!(facing.y > 0.7);
    }
}
