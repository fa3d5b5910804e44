//! Game state and core simulation types
//!
//! The whole simulation is owned by a single `GameState` context object so
//! that independent game instances can run side by side in tests.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::FireAnimation;
use super::collision::Aabb;
use super::particle::Particle;
use crate::consts::*;
use crate::progress::Progress;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Overlay is up, no simulation running
    Menu,
    /// Active gameplay
    Playing,
    /// A combatant died this level; terminal until the shell restarts
    GameOver,
}

/// Sound effect identifiers, resolved to actual playback by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundId {
    PlayerShoot,
    BotShoot,
    PlayerHit,
    BotHit,
    Win,
    Lose,
    Upgrade,
    ButtonClick,
    NoGold,
}

/// Typed state-change events emitted by the sim and drained by the
/// presentation layer each frame. The sim never touches a platform API.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Play a sound effect at the given volume (0.0 - 1.0)
    Sound { id: SoundId, volume: f32 },
    /// The bot's health readout changed
    BotHealth { hp: f32, max_hp: f32 },
    /// Persistent gold balance changed
    GoldChanged { gold: u64 },
    /// Level cleared; the reward has already been added to gold and the
    /// progress record updated - the shell must persist it now
    LevelWon { reward: u64 },
    /// The player's cannon was destroyed
    LevelLost,
}

/// Logical viewport in resolution-independent pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub w: f32,
    pub h: f32,
}

impl Viewport {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// A projectile owned by the entity that fired it
///
/// `vel_y` is signed: negative travels up (player shots), positive travels
/// down (bot shots).
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, vel_y: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(BULLET_SIZE),
            vel_y,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A combatant - the player cannon or the bot duck share this shape
#[derive(Debug, Clone)]
pub struct Entity {
    /// Top-left corner in logical pixels
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    /// Horizontal movement speed (px/frame)
    pub speed: f32,
    /// Damage applied per bullet hit
    pub damage: f32,
    pub bullets: Vec<Bullet>,
    /// Frames since the last animation start
    pub fire_timer: u32,
    /// Frames between permitted shots (may be fractional)
    pub fire_interval: f32,
    pub anim: FireAnimation,
}

impl Entity {
    pub fn new(size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(size),
            hp: BASE_HP,
            max_hp: BASE_HP,
            speed: BASE_SPEED,
            damage: BASE_DAMAGE,
            bullets: Vec::new(),
            fire_timer: 0,
            fire_interval: BASE_FIRE_SECONDS * 60.0,
            anim: FireAnimation::default(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// True when the cooldown has elapsed and no fire animation is in
    /// flight. Re-entry while animating is what throttles the fire rate to
    /// one volley per animation + cooldown cycle.
    pub fn ready_to_fire(&self) -> bool {
        self.fire_timer as f32 >= self.fire_interval && !self.anim.active()
    }
}

/// Bot patrol state: current direction and a randomized countdown to the
/// next direction change
#[derive(Debug, Clone)]
pub struct Patrol {
    /// +1 right, -1 left
    pub dir: f32,
    pub change_timer: u32,
    /// Countdown bound, re-randomized on every timeout
    pub next_change: u32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            dir: 1.0,
            change_timer: 0,
            next_change: PATROL_CHANGE_MIN,
        }
    }
}

/// Complete simulation context
///
/// Mutated only by `tick` (and the explicit `start_level`/`resize` entry
/// points); the render step only reads it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Current level number (>= 1)
    pub level: u32,
    pub view: Viewport,
    pub player: Entity,
    pub bot: Entity,
    pub patrol: Patrol,
    pub particles: Vec<Particle>,
    /// Persistent meta-progression; the shell flushes it to storage when a
    /// `LevelWon` or purchase event says it changed
    pub progress: Progress,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending output events, drained by the shell each frame
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game in the menu phase. The starting level is the first
    /// uncompleted one.
    pub fn new(seed: u64, view: Viewport, progress: Progress) -> Self {
        let level = progress.highest_level_completed + 1;
        let mut state = Self {
            seed,
            phase: GamePhase::Menu,
            level,
            view,
            player: Entity::new(PLAYER_SIZE),
            bot: Entity::new(BOT_SIZE),
            patrol: Patrol::default(),
            particles: Vec::new(),
            progress,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        // Park both combatants in their lanes for the menu backdrop
        state.player.pos = state.player_idle_pos();
        state.bot.pos = state.bot_idle_pos();
        state
    }

    /// Start (or restart) the given level: derive stats, clear bullets,
    /// reposition both combatants, enter the playing phase.
    pub fn start_level(&mut self, level: u32) {
        super::level::configure_level(self, level);
        self.phase = GamePhase::Playing;
    }

    /// Drop back to the menu phase (overlay shown by the shell)
    pub fn open_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Handle a viewport resize. Only geometry is re-derived - in-flight
    /// animation and bullet state is untouched, so this is safe at any time
    /// between frames and idempotent.
    pub fn resize(&mut self, w: f32, h: f32) {
        self.view = Viewport::new(w, h);
        if self.phase == GamePhase::Menu {
            self.player.pos = self.player_idle_pos();
        }
    }

    /// Default player position: bottom-center lane
    pub fn player_idle_pos(&self) -> Vec2 {
        Vec2::new(
            self.view.w / 2.0 - self.player.size.x / 2.0,
            self.view.h - PLAYER_LANE_OFFSET,
        )
    }

    /// Default bot position: top-center lane
    pub fn bot_idle_pos(&self) -> Vec2 {
        Vec2::new(self.view.w / 2.0 - self.bot.size.x / 2.0, BOT_LANE_Y)
    }

    /// Drain pending output events for the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_sound(&mut self, id: SoundId, volume: f32) {
        self.events.push(GameEvent::Sound { id, volume });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> GameState {
        GameState::new(7, Viewport::new(800.0, 600.0), Progress::default())
    }

    #[test]
    fn new_game_starts_in_menu_at_first_uncompleted_level() {
        let state = test_state();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level, 1);

        let mut progress = Progress::default();
        progress.highest_level_completed = 4;
        let state = GameState::new(7, Viewport::new(800.0, 600.0), progress);
        assert_eq!(state.level, 5);
    }

    #[test]
    fn resize_reparks_player_only_in_menu() {
        let mut state = test_state();
        state.resize(1000.0, 700.0);
        assert_eq!(state.player.pos, state.player_idle_pos());

        state.start_level(1);
        state.player.pos.x = 12.0;
        let bullet = Bullet::new(Vec2::new(50.0, 50.0), -8.0);
        state.player.bullets.push(bullet);
        state.resize(640.0, 480.0);
        // Simulation state untouched, only the bounds changed
        assert_eq!(state.player.pos.x, 12.0);
        assert_eq!(state.player.bullets.len(), 1);
        assert_eq!(state.view, Viewport::new(640.0, 480.0));
    }

    #[test]
    fn ready_to_fire_gates_on_cooldown_and_animation() {
        let mut entity = Entity::new(60.0);
        entity.fire_interval = 10.0;
        entity.fire_timer = 9;
        assert!(!entity.ready_to_fire());
        entity.fire_timer = 10;
        assert!(entity.ready_to_fire());
        entity.anim.begin();
        assert!(!entity.ready_to_fire());
    }
}
