//! Level configurator
//!
//! Derives concrete combat stats from the persistent upgrade tiers (player)
//! or the level number (bot), and resets both combatants for a level start.
//! Both sides scale with the same formulas so an upgrade tier and a level
//! number buy the same increment.

use crate::consts::*;
use crate::progress::Upgrades;

use super::state::{GameState, Patrol};

/// Fully derived combat stats for one combatant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBlock {
    pub max_hp: f32,
    pub damage: f32,
    /// px/frame, capped at `MAX_SPEED`
    pub speed: f32,
    /// Frames between shots, floored at 30
    pub fire_interval: f32,
}

/// Movement speed for a tier: 2 + 0.2 per tier past the first, capped at 5
pub fn derived_speed(tier: u32) -> f32 {
    (BASE_SPEED + tier.saturating_sub(1) as f32 * 0.2).min(MAX_SPEED)
}

/// Seconds between shots for a tier: 1.5 - 0.2 per tier past the first,
/// floored at 0.5
pub fn derived_fire_seconds(tier: u32) -> f32 {
    (BASE_FIRE_SECONDS - tier.saturating_sub(1) as f32 * 0.2).max(MIN_FIRE_SECONDS)
}

fn scaled(tier: u32) -> StatBlock {
    let t = tier.saturating_sub(1) as f32;
    StatBlock {
        max_hp: BASE_HP + t * 10.0,
        damage: BASE_DAMAGE + t * 1.0,
        speed: derived_speed(tier),
        fire_interval: derived_fire_seconds(tier) * 60.0,
    }
}

/// Player stats from the five persistent upgrade tiers
pub fn player_stats(upgrades: &Upgrades) -> StatBlock {
    StatBlock {
        max_hp: BASE_HP + upgrades.hp.saturating_sub(1) as f32 * 10.0,
        damage: BASE_DAMAGE + upgrades.damage.saturating_sub(1) as f32 * 1.0,
        speed: derived_speed(upgrades.speed),
        fire_interval: derived_fire_seconds(upgrades.fire_rate) * 60.0,
    }
}

/// Bot stats for a level number - every stat scales with the level
pub fn bot_stats(level: u32) -> StatBlock {
    scaled(level)
}

/// (Re)configure both combatants for a level start. Idempotent given the
/// same level and upgrade tiers; called exactly once per (re)start,
/// including retries.
pub fn configure_level(state: &mut GameState, level: u32) {
    state.level = level;

    let stats = player_stats(&state.progress.upgrades);
    apply(&mut state.player, stats);
    state.player.pos = state.player_idle_pos();

    let stats = bot_stats(level);
    apply(&mut state.bot, stats);
    state.bot.pos = state.bot_idle_pos();
    state.patrol = Patrol::default();

    state.particles.clear();
}

fn apply(entity: &mut super::state::Entity, stats: StatBlock) {
    entity.max_hp = stats.max_hp;
    entity.hp = stats.max_hp;
    entity.damage = stats.damage;
    entity.speed = stats.speed;
    entity.fire_interval = stats.fire_interval;
    entity.fire_timer = 0;
    entity.bullets.clear();
    entity.anim.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;

    #[test]
    fn tier_one_is_base_stats() {
        let stats = player_stats(&Upgrades::default());
        assert_eq!(stats.max_hp, 100.0);
        assert_eq!(stats.damage, 1.0);
        assert_eq!(stats.speed, 2.0);
        assert_eq!(stats.fire_interval, 90.0);
    }

    #[test]
    fn bot_scales_with_level() {
        let stats = bot_stats(5);
        assert_eq!(stats.max_hp, 140.0);
        assert_eq!(stats.damage, 5.0);
        assert!((stats.speed - 2.8).abs() < 1e-5);
        assert!((stats.fire_interval - 42.0).abs() < 1e-3);
    }

    #[test]
    fn fire_interval_floors_at_30_frames() {
        assert_eq!(bot_stats(6).fire_interval, 30.0);
        assert_eq!(bot_stats(60).fire_interval, 30.0);
    }

    #[test]
    fn speed_caps_at_5() {
        assert_eq!(derived_speed(16), 5.0);
        assert_eq!(derived_speed(100), 5.0);
    }

    #[test]
    fn configure_resets_both_combatants() {
        let mut state = GameState::new(3, Viewport::new(800.0, 600.0), Progress::default());
        state.start_level(1);
        state.player.hp = 10.0;
        state.bot.hp = 10.0;
        state.player.bullets.push(crate::sim::state::Bullet::new(
            glam::Vec2::new(1.0, 1.0),
            -8.0,
        ));
        state.player.anim.begin();

        configure_level(&mut state, 3);
        assert_eq!(state.level, 3);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.bot.hp, 120.0);
        assert!(state.player.bullets.is_empty());
        assert!(!state.player.anim.active());
        assert_eq!(state.player.pos, state.player_idle_pos());
        assert_eq!(state.bot.pos, state.bot_idle_pos());
    }

    #[test]
    fn configure_is_idempotent() {
        let mut state = GameState::new(3, Viewport::new(800.0, 600.0), Progress::default());
        configure_level(&mut state, 2);
        let hp = state.bot.hp;
        let pos = state.bot.pos;
        configure_level(&mut state, 2);
        assert_eq!(state.bot.hp, hp);
        assert_eq!(state.bot.pos, pos);
    }

    proptest! {
        #[test]
        fn speed_is_monotone_and_capped(tier in 1u32..200) {
            let lo = derived_speed(tier);
            let hi = derived_speed(tier + 1);
            prop_assert!(hi >= lo);
            prop_assert!(hi <= 5.0);
            prop_assert!(lo >= 2.0);
        }

        #[test]
        fn fire_interval_is_monotone_and_floored(level in 1u32..200) {
            let lo = bot_stats(level + 1).fire_interval;
            let hi = bot_stats(level).fire_interval;
            prop_assert!(lo <= hi);
            prop_assert!(lo >= 30.0);
            prop_assert!(hi <= 90.0);
        }

        #[test]
        fn bot_hp_matches_formula(level in 1u32..500) {
            prop_assert_eq!(bot_stats(level).max_hp, 100.0 + (level - 1) as f32 * 10.0);
        }
    }
}
