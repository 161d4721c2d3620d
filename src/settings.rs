//! Consumed game settings
//!
//! The core reads this bag and never writes or persists it; storage
//! belongs to an external collaborator. Nothing here may change a
//! gameplay outcome - reduce-motion throttles cosmetic particle counts
//! and shake only, never hit detection or damage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Output volume (0.0 - 1.0), cosmetic audio only
    pub volume: f32,
    /// Camera shake on impacts
    pub screen_shake: bool,
    /// Brief render freeze on heavy hits
    pub hit_stop: bool,
    /// High contrast palette (visual only)
    pub high_contrast: bool,
    /// Minimize shake and thin out particles
    pub reduce_motion: bool,
    /// Floating damage numbers
    pub show_damage_text: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            screen_shake: true,
            hit_stop: true,
            high_contrast: false,
            reduce_motion: false,
            show_damage_text: true,
        }
    }
}

impl Settings {
    pub fn clamped(mut self) -> Self {
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }

    /// Effective screen shake (respects reduce_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduce_motion
    }

    /// Effective hit-stop (respects reduce_motion)
    pub fn effective_hit_stop(&self) -> bool {
        self.hit_stop && !self.reduce_motion
    }

    /// Cosmetic particle spawn-count multiplier
    pub fn particle_scale(&self) -> f32 {
        if self.reduce_motion { 0.25 } else { 1.0 }
    }
}
