//! Fixed-timestep accumulator loop
//!
//! Decouples wall-clock frame delivery from simulation time. Each frame
//! tick adds clamped elapsed wall time to an accumulator, drains it in
//! whole fixed steps through the update callback, then invokes render
//! exactly once. Update may run zero or several times per displayed
//! frame; render always sees the freshest state.

use crate::consts::{MAX_FRAME_DT, SIM_DT};

pub struct FixedStep {
    accumulator: f32,
    last_time: Option<f64>,
    running: bool,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedStep {
    pub fn new() -> Self {
        Self { accumulator: 0.0, last_time: None, running: false }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
        self.accumulator = 0.0;
    }

    /// Idempotent; later ticks are ignored until the next start
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drive one external frame at wall-clock time `now` (seconds).
    /// Returns the number of update steps taken.
    pub fn tick(
        &mut self,
        now: f64,
        mut update: impl FnMut(f32),
        mut render: impl FnMut(),
    ) -> u32 {
        if !self.running {
            return 0;
        }
        let dt = match self.last_time {
            // Clamp: a suspended tab or a breakpoint must not trigger a
            // catch-up stampede
            Some(last) => ((now - last) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            update(SIM_DT);
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        render();
        steps
    }
}
