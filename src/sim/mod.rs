//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = one logical frame at 60 Hz)
//! - Seeded RNG only
//! - No rendering or platform dependencies; side effects leave through the
//!   `GameEvent` queue on `GameState`

pub mod animation;
pub mod collision;
pub mod level;
pub mod particle;
pub mod state;
pub mod tick;

pub use animation::{FireAnimation, FireFrame, FirePhase};
pub use collision::Aabb;
pub use level::{StatBlock, bot_stats, configure_level, player_stats};
pub use particle::{Particle, spawn_explosion};
pub use state::{Bullet, Entity, GameEvent, GamePhase, GameState, Patrol, SoundId, Viewport};
pub use tick::{TickInput, tick};
