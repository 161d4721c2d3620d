//! Engine facade
//!
//! Owns the world, the fixed-step driver, and the emission boundary.
//! Collaborators feed it per-frame input intents and register callbacks
//! for HUD, debug, draft, and upgrade-inventory snapshots; the engine
//! invokes them synchronously after each update step. Draft and
//! inventory callbacks fire only when their content changes.

use crate::game_loop::FixedStep;
use crate::hud::{DebugSnapshot, DraftSnapshot, HudSnapshot, InventorySnapshot};
use crate::settings::Settings;
use crate::sim::{self, FrameInput, World};

pub use crate::sim::RestartMode;

type HudFn = Box<dyn FnMut(&HudSnapshot)>;
type DebugFn = Box<dyn FnMut(&DebugSnapshot)>;
type DraftFn = Box<dyn FnMut(&DraftSnapshot)>;
type InventoryFn = Box<dyn FnMut(&InventorySnapshot)>;

#[derive(Default)]
struct Callbacks {
    hud: Option<HudFn>,
    debug: Option<DebugFn>,
    draft: Option<DraftFn>,
    inventory: Option<InventoryFn>,
}

pub struct Engine {
    world: World,
    looper: FixedStep,
    settings: Settings,
    callbacks: Callbacks,
    // fps smoothing for the debug snapshot
    fps: f32,
    last_frame_time: Option<f64>,
    last_step_ms: f32,
    // change tracking for draft/inventory notifications
    draft_was_active: bool,
    inventory_stacks: u32,
}

impl Engine {
    pub fn new(seed: u32) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u32, settings: Settings) -> Self {
        let settings = settings.clamped();
        let mut world = World::new(seed);
        world.fx.particle_scale = settings.particle_scale();
        log::info!("run started with seed {seed}");
        Self {
            world,
            looper: FixedStep::new(),
            settings,
            callbacks: Callbacks::default(),
            fps: 0.0,
            last_frame_time: None,
            last_step_ms: 0.0,
            draft_was_active: false,
            inventory_stacks: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.clamped();
        self.world.fx.particle_scale = self.settings.particle_scale();
    }

    pub fn on_hud(&mut self, f: impl FnMut(&HudSnapshot) + 'static) {
        self.callbacks.hud = Some(Box::new(f));
    }

    pub fn on_debug(&mut self, f: impl FnMut(&DebugSnapshot) + 'static) {
        self.callbacks.debug = Some(Box::new(f));
    }

    pub fn on_draft_change(&mut self, f: impl FnMut(&DraftSnapshot) + 'static) {
        self.callbacks.draft = Some(Box::new(f));
    }

    pub fn on_inventory_change(&mut self, f: impl FnMut(&InventorySnapshot) + 'static) {
        self.callbacks.inventory = Some(Box::new(f));
    }

    pub fn start(&mut self) {
        self.looper.start();
    }

    pub fn stop(&mut self) {
        self.looper.stop();
    }

    /// Synchronous full reset. No pooled records or draft options from
    /// the previous run survive.
    pub fn restart(&mut self, mode: RestartMode) {
        let seed = match mode {
            RestartMode::KeepSeed => self.world.seed,
            RestartMode::NewSeed => sim::fresh_seed(),
        };
        self.world = World::new(seed);
        self.world.fx.particle_scale = self.settings.particle_scale();
        self.draft_was_active = false;
        self.inventory_stacks = 0;
        self.last_frame_time = None;
        // Fresh timing baseline so the new run does not replay the old
        // run's accumulated wall time
        if self.looper.is_running() {
            self.looper.start();
        }
        log::info!("restart ({mode:?}) with seed {seed}");
    }

    /// Arena resize mid-run; the player is re-clamped into bounds
    pub fn resize(&mut self, width: f32, height: f32) {
        self.world.resize(width, height);
    }

    /// Drive one external frame at wall time `now` (seconds). One-shot
    /// input pulses are consumed by the first update step of the frame.
    /// Returns the number of update steps taken.
    pub fn frame(&mut self, now: f64, input: &FrameInput) -> u32 {
        // Restart pulses are honored regardless of pause/draft/game-over
        if let Some(mode) = input.restart {
            self.restart(mode);
        }

        if let Some(last) = self.last_frame_time {
            let dt = (now - last) as f32;
            if dt > 1e-6 {
                self.fps = if self.fps == 0.0 {
                    1.0 / dt
                } else {
                    self.fps * 0.9 + (1.0 / dt) * 0.1
                };
            }
        }
        self.last_frame_time = Some(now);

        let Self { world, looper, callbacks, fps, last_step_ms, draft_was_active, inventory_stacks, settings, .. } = self;

        let mut pending = input.clone();
        let steps = looper.tick(
            now,
            |dt| {
                sim::update(world, &pending, dt);
                pending = FrameInput { movement: pending.movement, ..Default::default() };
                *last_step_ms = dt * 1000.0;
                if !settings.effective_screen_shake() {
                    world.fx.shake = 0.0;
                }
                if !settings.effective_hit_stop() {
                    world.fx.hit_stop = 0.0;
                }
                Self::emit(world, callbacks, *fps, *last_step_ms, draft_was_active, inventory_stacks);
            },
            || {},
        );

        if steps == 0 && self.looper.is_running() {
            // Paused-frame cadence still emits so the UI stays live
            let Self { world, callbacks, fps, last_step_ms, draft_was_active, inventory_stacks, .. } = self;
            Self::emit(world, callbacks, *fps, *last_step_ms, draft_was_active, inventory_stacks);
        }
        steps
    }

    fn emit(
        world: &World,
        callbacks: &mut Callbacks,
        fps: f32,
        last_step_ms: f32,
        draft_was_active: &mut bool,
        inventory_stacks: &mut u32,
    ) {
        if let Some(f) = &mut callbacks.hud {
            f(&HudSnapshot::from_world(world));
        }
        if let Some(f) = &mut callbacks.debug {
            f(&DebugSnapshot {
                fps,
                last_dt_ms: last_step_ms,
                entity_count: world.entity_count(),
                seed: world.seed,
                paused: world.paused,
                overlay_enabled: world.debug_overlay,
            });
        }

        let draft_active = world.draft.is_active();
        if draft_active != *draft_was_active {
            *draft_was_active = draft_active;
            if let Some(f) = &mut callbacks.draft {
                f(&DraftSnapshot::from_world(world));
            }
        }

        let stacks: u32 = world.inventory.iter().map(|(_, n)| n).sum();
        if stacks != *inventory_stacks {
            *inventory_stacks = stacks;
            if let Some(f) = &mut callbacks.inventory {
                f(&InventorySnapshot { entries: world.inventory.clone() });
            }
        }
    }
}
