//! Duck Blast - a cannon-versus-duck arcade duel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, firing, collisions, game state)
//! - `progress`: Persistent meta-progression (gold, upgrades, level unlocks)
//! - `audio`: Fire-and-forget sound playback
//! - `render`: Canvas-2d frame renderer (wasm only)

pub mod audio;
pub mod progress;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod sim;

pub use audio::AudioBank;
pub use progress::{Progress, UpgradeError, UpgradeKind, Upgrades};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep - the sim ticks at a logical 60 Hz and all
    /// durations are expressed in frames at that rate
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player cannon sprite size (logical pixels)
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Bot duck sprite size
    pub const BOT_SIZE: f32 = 80.0;
    /// Player lane: distance of the cannon's top edge from the bottom
    pub const PLAYER_LANE_OFFSET: f32 = 150.0;
    /// Bot lane: distance of the duck's top edge from the top
    pub const BOT_LANE_Y: f32 = 80.0;

    /// Bullet sprite size (both sides)
    pub const BULLET_SIZE: f32 = 20.0;
    /// Player bullet vertical speed (px/frame, upward)
    pub const PLAYER_BULLET_SPEED: f32 = 8.0;
    /// Bot bullet vertical speed (px/frame, downward)
    pub const BOT_BULLET_SPEED: f32 = 4.5;
    /// Horizontal spacing between multi-shot bullets
    pub const BULLET_SPACING: f32 = 25.0;

    /// Fire animation phase lengths (frames)
    pub const ANIM_SQUASH_FRAMES: u32 = 15;
    pub const ANIM_STRETCH_FRAMES: u32 = 10;
    pub const ANIM_RECOVER_FRAMES: u32 = 20;
    /// Total fire animation length
    pub const ANIM_TOTAL_FRAMES: u32 =
        ANIM_SQUASH_FRAMES + ANIM_STRETCH_FRAMES + ANIM_RECOVER_FRAMES;

    /// Base stats shared by both combatants at tier/level 1
    pub const BASE_HP: f32 = 100.0;
    pub const BASE_DAMAGE: f32 = 1.0;
    pub const BASE_SPEED: f32 = 2.0;
    /// Base seconds between shots; upgrades/levels shorten this
    pub const BASE_FIRE_SECONDS: f32 = 1.5;
    /// Fastest permitted fire interval in seconds
    pub const MIN_FIRE_SECONDS: f32 = 0.5;
    /// Hard cap on movement speed (px/frame)
    pub const MAX_SPEED: f32 = 5.0;

    /// Particles per explosion burst
    pub const EXPLOSION_PARTICLES: usize = 20;
    /// Particle lifespan in frames
    pub const PARTICLE_LIFE: u32 = 60;

    /// Patrol direction-change countdown bounds (frames)
    pub const PATROL_CHANGE_MIN: u32 = 120;
    pub const PATROL_CHANGE_MAX: u32 = 240;
}
