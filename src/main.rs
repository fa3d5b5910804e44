//! Duck Blast entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use duck_blast::audio::AudioBank;
    use duck_blast::consts::*;
    use duck_blast::progress::{Progress, UpgradeError, UpgradeKind};
    use duck_blast::render::Renderer;
    use duck_blast::sim::level::{bot_stats, derived_fire_seconds, player_stats};
    use duck_blast::sim::{GameEvent, GameState, SoundId, TickInput, Viewport, tick};

    /// Which overlay the menu is showing
    #[derive(Debug, Clone, Copy)]
    enum OverlayKind {
        Start,
        Win { reward: u64 },
        Lose,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        audio: AudioBank,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Level the overlay's main button starts
        pending_level: u32,
    }

    impl Game {
        fn new(seed: u64, view: Viewport, progress: Progress, renderer: Renderer) -> Self {
            let state = GameState::new(seed, view, progress);
            let pending_level = state.level;
            Self {
                state,
                renderer,
                audio: AudioBank::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                pending_level,
            }
        }

        /// Run simulation ticks at the fixed logical rate
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.handle_events();
        }

        /// Drain sim output events into audio and DOM side effects
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound { id, volume } => self.audio.play(id, volume),
                    GameEvent::BotHealth { hp, max_hp } => update_bot_health(hp, max_hp),
                    GameEvent::GoldChanged { gold } => {
                        set_text(&document(), "playerGold", &gold.to_string());
                    }
                    GameEvent::LevelWon { reward } => {
                        // Flush progress before anything else can happen
                        self.state.progress.save();
                        self.audio.play(SoundId::Win, 0.7);
                        self.show_overlay(OverlayKind::Win { reward });
                    }
                    GameEvent::LevelLost => {
                        self.audio.play(SoundId::Lose, 0.7);
                        self.show_overlay(OverlayKind::Lose);
                    }
                }
            }
        }

        fn render(&self) {
            self.renderer.render(&self.state);
        }

        fn start_level(&mut self, level: u32) {
            self.state.start_level(level);
            self.pending_level = level;
            set_display(&document(), "gameOverlay", "none");
            self.sync_hud();
        }

        /// Push the current gold/level/bot-health readouts into the DOM
        fn sync_hud(&self) {
            let document = document();
            set_text(&document, "playerGold", &self.state.progress.gold.to_string());
            set_text(&document, "currentLevelDisplay", &self.state.level.to_string());
            update_bot_health(self.state.bot.hp, self.state.bot.max_hp);
        }

        /// Drop to the menu phase and raise the overlay
        fn show_overlay(&mut self, kind: OverlayKind) {
            self.state.open_menu();
            let document = document();

            match kind {
                OverlayKind::Start => {
                    self.pending_level = self.state.level;
                    set_text(&document, "overlayTitle", "Duck Blast");
                    set_text(
                        &document,
                        "overlayText",
                        &format!("Ready for level {}?", self.pending_level),
                    );
                    set_text(&document, "btnMainAction", "Play");
                }
                OverlayKind::Win { reward } => {
                    self.pending_level = self.state.level + 1;
                    set_text(&document, "overlayTitle", "Victory!");
                    set_text(&document, "overlayText", &format!("You earned {reward} gold."));
                    set_text(&document, "btnMainAction", "Next Level");
                }
                OverlayKind::Lose => {
                    self.pending_level = self.state.level;
                    set_text(&document, "overlayTitle", "Defeat!");
                    set_text(
                        &document,
                        "overlayText",
                        "Try again, or buy some upgrades first.",
                    );
                    set_text(&document, "btnMainAction", "Retry");
                }
            }
            set_display(&document, "gameOverlay", "flex");
        }

        /// Handle an upgrade button press
        fn buy(&mut self, kind: UpgradeKind) {
            self.audio.play(SoundId::ButtonClick, 0.5);
            match self.state.progress.buy_upgrade(kind) {
                Ok(cost) => {
                    log::info!("Bought {kind:?} for {cost} gold");
                    self.state.progress.save();
                    self.audio.play(SoundId::Upgrade, 1.0);
                    self.sync_hud();
                }
                Err(UpgradeError::InsufficientGold { cost }) => {
                    log::info!("Refused {kind:?}: need {cost} gold");
                    self.audio.play(SoundId::NoGold, 1.0);
                }
                Err(UpgradeError::Maxed) => {}
            }
            self.refresh_upgrade_modal();
        }

        /// Fill the upgrade modal with current stats and costs
        fn refresh_upgrade_modal(&self) {
            let document = document();
            let progress = &self.state.progress;
            let stats = player_stats(&progress.upgrades);

            set_text(&document, "currentHP", &format!("{}", stats.max_hp as u32));
            set_text(&document, "currentDamage", &format!("{}", stats.damage as u32));
            set_text(&document, "currentSpeed", &format!("{:.1}", stats.speed));
            let per_second = 1.0 / derived_fire_seconds(progress.upgrades.fire_rate);
            set_text(
                &document,
                "currentFireRate",
                &format!("{:.1}/s ({} shots)", per_second, progress.upgrades.shot),
            );

            set_cost_label(&document, "upgradeHP", progress.next_cost(UpgradeKind::Hp));
            set_cost_label(
                &document,
                "upgradeDamage",
                progress.next_cost(UpgradeKind::Damage),
            );
            set_cost_label(
                &document,
                "upgradeSpeed",
                progress.next_cost(UpgradeKind::Speed),
            );
            set_cost_label(
                &document,
                "upgradeFireRate",
                progress.next_cost(UpgradeKind::FireRate),
            );

            // The fire-rate button doubles as the barrel purchase once the
            // interval is floored
            let label = if derived_fire_seconds(progress.upgrades.fire_rate) > MIN_FIRE_SECONDS {
                "Upgrade"
            } else {
                match progress.upgrades.shot {
                    1 => "2nd Barrel",
                    2 => "3rd Barrel",
                    _ => "Maxed",
                }
            };
            if let Some(el) = document.query_selector("#upgradeFireRate .label").ok().flatten() {
                el.set_text_content(Some(label));
            }
        }

        /// Fill the bot info modal for the current level
        fn refresh_bot_info(&self) {
            let document = document();
            let stats = bot_stats(self.state.level);
            set_text(
                &document,
                "botInfoTitle",
                &format!("Bot Info - Level {}", self.state.level),
            );
            set_text(&document, "botInfoHP", &format!("{}", stats.max_hp as u32));
            set_text(&document, "botInfoDamage", &format!("{}", stats.damage as u32));
            set_text(&document, "botInfoSpeed", &format!("{:.1}", stats.speed));
            let per_second = 60.0 / stats.fire_interval;
            set_text(&document, "botInfoFireRate", &format!("{per_second:.1}/s"));
        }

        /// Rebuild the level select grid: every completed level plus the
        /// next uncompleted one
        fn rebuild_level_grid(&self, game: Rc<RefCell<Game>>) {
            let document = document();
            let Some(grid) = document.get_element_by_id("levelGrid") else {
                return;
            };
            grid.set_inner_html("");

            let highest = self.state.progress.highest_level_completed;
            for level in 1..=highest + 1 {
                let Ok(button) = document.create_element("button") else {
                    continue;
                };
                button.set_text_content(Some(&level.to_string()));
                let class = if level <= highest {
                    "level-button unlocked"
                } else {
                    "level-button"
                };
                let _ = button.set_attribute("class", class);

                let game = game.clone();
                let doc = document.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.audio.play(SoundId::ButtonClick, 0.5);
                    set_display(&doc, "levelSelectModal", "none");
                    g.start_level(level);
                });
                let _ = button
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
                let _ = grid.append_child(&button);
            }
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, value: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if let Some(el) = el.dyn_ref::<web_sys::HtmlElement>() {
                let _ = el.style().set_property("display", value);
            }
        }
    }

    /// Write a "(N gold)" cost tag into a button's `.cost` span; "(Max)"
    /// when there is nothing left to buy
    fn set_cost_label(document: &Document, button_id: &str, cost: Option<u64>) {
        let selector = format!("#{button_id} .cost");
        if let Some(el) = document.query_selector(&selector).ok().flatten() {
            match cost {
                Some(cost) => el.set_text_content(Some(&format!("({cost} gold)"))),
                None => el.set_text_content(Some("(Max)")),
            }
        }
        if let Some(btn) = document.get_element_by_id(button_id) {
            if let Some(btn) = btn.dyn_ref::<web_sys::HtmlButtonElement>() {
                btn.set_disabled(cost.is_none());
            }
        }
    }

    fn update_bot_health(hp: f32, max_hp: f32) {
        let document = document();
        let percent = (hp / max_hp * 100.0).clamp(0.0, 100.0);
        if let Some(el) = document.get_element_by_id("botHPFill") {
            if let Some(el) = el.dyn_ref::<web_sys::HtmlElement>() {
                let _ = el.style().set_property("width", &format!("{percent}%"));
            }
        }
        set_text(
            &document,
            "botHPText",
            &format!("{} / {}", hp.max(0.0).ceil() as u32, max_hp as u32),
        );
    }

    /// Size the canvas to the window at device-pixel resolution and
    /// re-derive the logical viewport
    fn fit_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, game: &mut Game) {
        let window = web_sys::window().unwrap();
        let dpr = window.device_pixel_ratio();
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);

        let _ = canvas.style().set_property("width", &format!("{w}px"));
        let _ = canvas.style().set_property("height", &format!("{h}px"));
        canvas.set_width((w * dpr).floor() as u32);
        canvas.set_height((h * dpr).floor() as u32);
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);

        game.state.resize(w as f32, h as f32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Duck Blast starting...");

        let document = document();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("2d context unavailable")
            .expect("2d context missing")
            .dyn_into()
            .expect("not a 2d context");

        let progress = Progress::load();
        let seed = js_sys::Date::now() as u64;
        let renderer = Renderer::new(ctx.clone()).expect("failed to load sprites");
        let view = Viewport::new(800.0, 600.0); // Replaced by fit_canvas below
        let game = Rc::new(RefCell::new(Game::new(seed, view, progress, renderer)));

        fit_canvas(&canvas, &ctx, &mut game.borrow_mut());
        log::info!("Game initialized with seed: {}", seed);

        game.borrow_mut().sync_hud();
        game.borrow_mut().show_overlay(OverlayKind::Start);

        setup_input_handlers(game.clone());
        setup_overlay_buttons(game.clone());
        setup_modal_buttons(game.clone());
        setup_resize_handler(canvas, ctx, game.clone());

        request_animation_frame(game);
        log::info!("Duck Blast running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.move_left = true,
                    "ArrowRight" => g.input.move_right = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.move_left = false,
                    "ArrowRight" => g.input.move_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen touch buttons
        bind_move_button(game.clone(), "btnLeft", MoveSide::Left);
        bind_move_button(game, "btnRight", MoveSide::Right);
    }

    #[derive(Clone, Copy)]
    enum MoveSide {
        Left,
        Right,
    }

    /// Wire touch and mouse press/release on an on-screen button to a
    /// movement flag
    fn bind_move_button(game: Rc<RefCell<Game>>, id: &str, side: MoveSide) {
        let document = document();
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };

        let set = move |g: &mut Game, pressed: bool| match side {
            MoveSide::Left => g.input.move_left = pressed,
            MoveSide::Right => g.input.move_right = pressed,
        };

        for event in ["touchstart", "mousedown"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                e.prevent_default();
                set(&mut game.borrow_mut(), true);
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                e.prevent_default();
                set(&mut game.borrow_mut(), false);
            });
            let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        // Mouse release anywhere ends the press
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_e: web_sys::MouseEvent| {
                set(&mut game.borrow_mut(), false);
            });
            let _ =
                window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_overlay_buttons(game: Rc<RefCell<Game>>) {
        on_click(game, "btnMainAction", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            let level = g.pending_level;
            g.start_level(level);
        });
    }

    fn setup_modal_buttons(game: Rc<RefCell<Game>>) {
        // Upgrade shop
        on_click(game.clone(), "btnUpgrades", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            g.refresh_upgrade_modal();
            set_display(&document(), "upgradeModal", "flex");
        });
        on_click(game.clone(), "closeUpgradeModal", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            set_display(&document(), "upgradeModal", "none");
        });
        on_click(game.clone(), "upgradeSpeed", |g| g.buy(UpgradeKind::Speed));
        on_click(game.clone(), "upgradeFireRate", |g| g.buy(UpgradeKind::FireRate));
        on_click(game.clone(), "upgradeDamage", |g| g.buy(UpgradeKind::Damage));
        on_click(game.clone(), "upgradeHP", |g| g.buy(UpgradeKind::Hp));

        // Level select
        {
            let game_for_handler = game.clone();
            let game_for_grid = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                {
                    let g = game_for_handler.borrow();
                    g.audio.play(SoundId::ButtonClick, 0.5);
                    g.rebuild_level_grid(game_for_grid.clone());
                }
                set_display(&document(), "levelSelectModal", "flex");
            });
            if let Some(btn) = document().get_element_by_id("btnLevelSelect") {
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
        on_click(game.clone(), "closeLevelSelectModal", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            set_display(&document(), "levelSelectModal", "none");
        });

        // Bot info
        on_click(game.clone(), "btnBotInfo", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            g.refresh_bot_info();
            set_display(&document(), "botInfoModal", "flex");
        });
        on_click(game.clone(), "closeBotInfoModal", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            set_display(&document(), "botInfoModal", "none");
        });

        // Reset progress, behind a confirm dialog
        on_click(game.clone(), "btnReset", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            set_display(&document(), "resetConfirmModal", "flex");
        });
        on_click(game.clone(), "btnCancelReset", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            set_display(&document(), "resetConfirmModal", "none");
        });
        on_click(game, "btnConfirmReset", |g| {
            g.audio.play(SoundId::ButtonClick, 0.5);
            Progress::clear_saved();
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
    }

    /// Register a borrow-and-call click handler on an element
    fn on_click(game: Rc<RefCell<Game>>, id: &str, handler: fn(&mut Game)) {
        let Some(el) = document().get_element_by_id(id) else {
            log::warn!("Button #{id} missing");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler(&mut game.borrow_mut());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        game: Rc<RefCell<Game>>,
    ) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&canvas, &ctx, &mut game.borrow_mut());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use duck_blast::progress::Progress;
    use duck_blast::sim::{GamePhase, GameState, TickInput, Viewport, tick};

    env_logger::init();
    log::info!("Duck Blast (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: one level, a few seconds of simulated combat
    let mut state = GameState::new(0xD0CBA57, Viewport::new(800.0, 600.0), Progress::default());
    state.start_level(1);
    for _ in 0..600 {
        tick(&mut state, &TickInput::default());
        if state.phase != GamePhase::Playing {
            break;
        }
    }
    println!(
        "After {} ticks: player {:.0}/{:.0} hp, bot {:.0}/{:.0} hp, {} particles",
        state.time_ticks,
        state.player.hp,
        state.player.max_hp,
        state.bot.hp,
        state.bot.max_hp,
        state.particles.len()
    );
}
