//! Per-frame loop controller
//!
//! Advances one logical frame in a fixed order: player movement, player
//! firing, bot patrol and firing, bullets and collisions, particles, then
//! the terminal win/lose check. A tick is a no-op outside the playing
//! phase.

use glam::Vec2;

use super::particle::{self, BOT_HIT_COLOR, PLAYER_HIT_COLOR};
use super::state::{Entity, GameEvent, GamePhase, GameState, SoundId};
use crate::consts::*;
use rand::Rng;

/// Distance a hit bullet is teleported off-screen. Invalidated bullets are
/// pruned on the next frame instead of being removed mid-iteration, so a
/// bullet can never damage twice.
const OFFSCREEN: f32 = 9999.0;

/// Input state for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance the game by one logical frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    // 1. Player movement, clamped to the viewport
    if input.move_left {
        state.player.pos.x -= state.player.speed;
    }
    if input.move_right {
        state.player.pos.x += state.player.speed;
    }
    state.player.pos.x = state
        .player
        .pos
        .x
        .clamp(0.0, state.view.w - state.player.size.x);

    // 2-3. Player cooldown and fire animation
    state.player.fire_timer += 1;
    if state.player.ready_to_fire() {
        // Cooldown resets when the animation begins, not when the shot fires
        state.player.fire_timer = 0;
        state.player.anim.begin();
    }
    if state.player.anim.step().fire_now {
        let shots = state.progress.upgrades.shot;
        spawn_player_volley(&mut state.player, shots);
        state.push_sound(SoundId::PlayerShoot, 0.3);
    }

    // 4. Bot patrol and firing
    step_patrol(state);
    state.bot.fire_timer += 1;
    if state.bot.ready_to_fire() {
        state.bot.fire_timer = 0;
        state.bot.anim.begin();
    }
    if state.bot.anim.step().fire_now {
        spawn_bot_shot(&mut state.bot);
        state.push_sound(SoundId::BotShoot, 0.3);
    }

    // 5. Bullets: advance, prune off-screen, then collide
    for b in &mut state.player.bullets {
        b.pos.y += b.vel_y;
    }
    for b in &mut state.bot.bullets {
        b.pos.y += b.vel_y;
    }
    let view = state.view;
    state.player.bullets.retain(|b| b.pos.y + b.size.y > 0.0);
    state.bot.bullets.retain(|b| b.pos.y < view.h);

    let mut bot_was_hit = false;
    let bot_box = state.bot.aabb();
    for b in &mut state.player.bullets {
        if b.aabb().overlaps(&bot_box) {
            let contact = Vec2::new(b.pos.x + b.size.x / 2.0, b.pos.y);
            particle::spawn_explosion(&mut state.particles, &mut state.rng, contact, BOT_HIT_COLOR);
            state.bot.hp -= state.player.damage;
            b.pos.y = -OFFSCREEN;
            state.events.push(GameEvent::Sound {
                id: SoundId::BotHit,
                volume: 0.4,
            });
            bot_was_hit = true;
        }
    }
    let player_box = state.player.aabb();
    for b in &mut state.bot.bullets {
        if b.aabb().overlaps(&player_box) {
            let contact = Vec2::new(b.pos.x + b.size.x / 2.0, b.pos.y + b.size.y);
            particle::spawn_explosion(
                &mut state.particles,
                &mut state.rng,
                contact,
                PLAYER_HIT_COLOR,
            );
            state.player.hp -= state.bot.damage;
            b.pos.y = view.h + OFFSCREEN;
            state.events.push(GameEvent::Sound {
                id: SoundId::PlayerHit,
                volume: 0.5,
            });
        }
    }

    // 6. Particles
    particle::age_particles(&mut state.particles);

    // 7. UI readouts
    if bot_was_hit {
        state.events.push(GameEvent::BotHealth {
            hp: state.bot.hp,
            max_hp: state.bot.max_hp,
        });
    }

    // 8. Terminal check, after all damage this frame; bot death wins ties
    if state.bot.hp <= 0.0 {
        state.phase = GamePhase::GameOver;
        let reward = level_reward(state.level, state.progress.highest_level_completed);
        if state.level > state.progress.highest_level_completed {
            state.progress.highest_level_completed = state.level;
        }
        state.progress.gold += reward;
        state.events.push(GameEvent::GoldChanged {
            gold: state.progress.gold,
        });
        state.events.push(GameEvent::LevelWon { reward });
    } else if state.player.hp <= 0.0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::LevelLost);
    }
}

/// Gold for clearing a level: a scaling first-clear bonus, a flat 20 on
/// replays
pub fn level_reward(level: u32, highest_completed: u32) -> u64 {
    if level > highest_completed {
        100 + (level as u64 - 1) * 20
    } else {
        20
    }
}

fn step_patrol(state: &mut GameState) {
    state.patrol.change_timer += 1;
    if state.patrol.change_timer > state.patrol.next_change {
        state.patrol.dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        state.patrol.change_timer = 0;
        state.patrol.next_change = state
            .rng
            .random_range(PATROL_CHANGE_MIN..=PATROL_CHANGE_MAX);
    }

    state.bot.pos.x += state.bot.speed * state.patrol.dir;
    if state.bot.pos.x <= 0.0 {
        state.bot.pos.x = 0.0;
        state.patrol.dir = 1.0;
    }
    if state.bot.pos.x + state.bot.size.x >= state.view.w {
        state.bot.pos.x = state.view.w - state.bot.size.x;
        state.patrol.dir = -1.0;
    }
}

/// Spawn 1-3 bullets from the scaled top edge of the cannon, spread
/// horizontally around its center
fn spawn_player_volley(player: &mut Entity, shots: u32) {
    let center_x = player.pos.x + player.size.x / 2.0 - BULLET_SIZE / 2.0;
    let muzzle_y = player.pos.y + player.size.y / 2.0
        - (player.size.y / 2.0) * player.anim.scale().y
        - BULLET_SIZE;

    let offsets: &[f32] = match shots {
        0 | 1 => &[0.0],
        2 => &[-0.5, 0.5],
        _ => &[0.0, -1.0, 1.0],
    };
    for &offset in offsets {
        player.bullets.push(super::state::Bullet::new(
            Vec2::new(center_x + offset * BULLET_SPACING, muzzle_y),
            -PLAYER_BULLET_SPEED,
        ));
    }
}

/// Spawn one bullet from the scaled bottom edge of the duck
fn spawn_bot_shot(bot: &mut Entity) {
    let x = bot.pos.x + bot.size.x / 2.0 - BULLET_SIZE / 2.0;
    let y = bot.pos.y + bot.size.y / 2.0 + (bot.size.y / 2.0) * bot.anim.scale().y;
    bot.bullets.push(super::state::Bullet::new(
        Vec2::new(x, y),
        BOT_BULLET_SPEED,
    ));
}
