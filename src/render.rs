//! Canvas-2d frame renderer (wasm only)
//!
//! Pure read of the simulation state: one `render` call draws the whole
//! scene in logical coordinates. Sprites whose image has not finished
//! loading are skipped for that frame and appear once loaded.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::sim::{Entity, GameState};

/// Player health bar dimensions relative to the cannon sprite
const HP_BAR_EXTRA_WIDTH: f64 = 20.0;
const HP_BAR_HEIGHT: f64 = 14.0;
const HP_BAR_GAP: f64 = 8.0;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    player_img: HtmlImageElement,
    bot_img: HtmlImageElement,
    player_bullet_img: HtmlImageElement,
    bot_bullet_img: HtmlImageElement,
}

impl Renderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Result<Self, JsValue> {
        Ok(Self {
            ctx,
            player_img: load_image("cannon.png")?,
            bot_img: load_image("rubber-duck.png")?,
            player_bullet_img: load_image("ball.png")?,
            bot_bullet_img: load_image("egg.png")?,
        })
    }

    /// Draw one frame
    pub fn render(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, state.view.w as f64, state.view.h as f64);

        self.draw_entity(&state.player, &self.player_img);
        self.draw_entity(&state.bot, &self.bot_img);
        self.draw_player_health(&state.player);

        for b in &state.player.bullets {
            self.draw_bullet(b, &self.player_bullet_img);
        }
        for b in &state.bot.bullets {
            self.draw_bullet(b, &self.bot_bullet_img);
        }

        for p in &state.particles {
            ctx.set_global_alpha(p.alpha() as f64);
            let [r, g, b] = p.color;
            ctx.set_fill_style_str(&format!("rgb({r},{g},{b})"));
            ctx.fill_rect(p.pos.x as f64, p.pos.y as f64, p.size as f64, p.size as f64);
        }
        ctx.set_global_alpha(1.0);
    }

    /// Draw a sprite with the squash/stretch scale applied around its
    /// center
    fn draw_entity(&self, entity: &Entity, img: &HtmlImageElement) {
        if !img.complete() || img.natural_height() == 0 {
            return;
        }
        let ctx = &self.ctx;
        let scale = entity.anim.scale();
        let (w, h) = (entity.size.x as f64, entity.size.y as f64);

        ctx.save();
        let _ = ctx.translate(entity.pos.x as f64 + w / 2.0, entity.pos.y as f64 + h / 2.0);
        let _ = ctx.scale(scale.x as f64, scale.y as f64);
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            -w / 2.0,
            -h / 2.0,
            w,
            h,
        );
        ctx.restore();
    }

    fn draw_bullet(&self, bullet: &crate::sim::Bullet, img: &HtmlImageElement) {
        if !img.complete() || img.natural_height() == 0 {
            return;
        }
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            bullet.pos.x as f64,
            bullet.pos.y as f64,
            bullet.size.x as f64,
            bullet.size.y as f64,
        );
    }

    /// The player's health bar floats just below the cannon
    fn draw_player_health(&self, player: &Entity) {
        let ctx = &self.ctx;
        let bar_w = player.size.x as f64 + HP_BAR_EXTRA_WIDTH;
        let bar_x = player.pos.x as f64 + (player.size.x as f64 - bar_w) / 2.0;
        let bar_y = (player.pos.y + player.size.y) as f64 + HP_BAR_GAP;
        let fill_w = (player.hp / player.max_hp).max(0.0) as f64 * bar_w;

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.4)");
        ctx.fill_rect(bar_x, bar_y, bar_w, HP_BAR_HEIGHT);
        ctx.set_fill_style_str("#4ade80");
        ctx.fill_rect(bar_x, bar_y, fill_w, HP_BAR_HEIGHT);

        ctx.set_fill_style_str("#fff");
        ctx.set_font("bold 11px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let label = format!(
            "{} / {}",
            player.hp.max(0.0).ceil() as u32,
            player.max_hp as u32
        );
        let _ = ctx.fill_text(
            &label,
            bar_x + bar_w / 2.0,
            bar_y + HP_BAR_HEIGHT / 2.0 + 1.0,
        );
    }
}

fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    Ok(img)
}
