//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, one stream per run
//! - Stable iteration order (slot/index order)
//! - No rendering or platform dependencies

pub mod combat;
pub mod director;
pub mod enemy;
pub mod fx;
pub mod movement;
pub mod pool;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod update;
pub mod upgrades;

pub use pool::Pool;
pub use rng::{SimRng, fresh_seed};
pub use state::{
    BossState, ChargeState, Director, Enemy, EnemyKind, EnemyProjectile, MineLayer, Player,
    Projectile, SawRing, Scrap, WaveState, Weapon, World,
};
pub use update::{FrameInput, RestartMode, update};
pub use upgrades::{DraftState, Rarity, UpgradeId, UpgradeOption};
