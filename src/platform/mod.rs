//! Host bridge
//!
//! On wasm32 this exposes the game core to a JS presentation layer: the host
//! owns the canvas, sprites, text, tween timing and DOM wiring, and talks to
//! the core through `NeonChain`. The host should register its resize listener
//! once per page instance and feed `viewport_resized` from it; the core keeps
//! its own single-countdown discipline across restarts.
//!
//! Native builds drive `sim::GameState` directly (see the demo binary).

#[cfg(target_arch = "wasm32")]
mod web {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use crate::render;
    use crate::settings::Settings;
    use crate::sim::{GameState, OrbId};

    fn init_logging() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            console_error_panic_hook::set_once();
            console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        });
    }

    /// JS-facing game handle
    #[wasm_bindgen]
    pub struct NeonChain {
        state: GameState,
        /// Sub-millisecond remainder carried between frames
        accumulator: f64,
    }

    #[wasm_bindgen]
    impl NeonChain {
        /// Start a session sized for the given viewport, seeded from the
        /// wall clock (fresh board every game)
        #[wasm_bindgen(constructor)]
        pub fn new(viewport_width: f32, viewport_height: f32) -> NeonChain {
            init_logging();
            let seed = js_sys::Date::now() as u64;
            NeonChain {
                state: GameState::new(seed, viewport_width, viewport_height),
                accumulator: 0.0,
            }
        }

        /// Advance the logical clock by elapsed milliseconds (call once per
        /// animation frame)
        pub fn advance(&mut self, elapsed_ms: f64) {
            self.accumulator += elapsed_ms.max(0.0);
            let whole = self.accumulator.floor();
            self.accumulator -= whole;
            self.state.advance(whole as u64);
        }

        /// Pointer-down in canvas coordinates
        pub fn pointer_down(&mut self, x: f32, y: f32) {
            self.state.pointer_down(Vec2::new(x, y));
        }

        pub fn viewport_resized(&mut self, width: f32, height: f32) {
            self.state.viewport_resized(width, height);
        }

        /// Report the measured top UI band height after text re-scaling
        pub fn set_ui_height(&mut self, ui_height: f32) {
            self.state.set_ui_height(ui_height);
        }

        /// The explosion visual for the orb id from an `OrbExploded` event
        /// has fully finished
        pub fn explosion_finished(&mut self, orb_id: u32) {
            self.state.explosion_finished(OrbId(orb_id));
        }

        pub fn restart(&mut self) {
            self.state.restart();
        }

        pub fn score(&self) -> u32 {
            self.state.score
        }

        pub fn time_left(&self) -> i32 {
            self.state.time_left
        }

        pub fn game_over(&self) -> bool {
            self.state.game_over
        }

        pub fn canvas_width(&self) -> f32 {
            self.state.canvas_width
        }

        pub fn canvas_height(&self) -> f32 {
            self.state.canvas_height
        }

        /// JSON array of per-orb draw directives for this frame
        pub fn draw_frame(&self) -> String {
            serde_json::to_string(&render::frame(&self.state)).unwrap_or_else(|_| "[]".into())
        }

        /// JSON array of game events since the last drain
        pub fn drain_events(&mut self) -> String {
            serde_json::to_string(&self.state.drain_events()).unwrap_or_else(|_| "[]".into())
        }

        /// Current settings as JSON (loads LocalStorage on first use)
        pub fn settings(&self) -> String {
            serde_json::to_string(&Settings::load()).unwrap_or_else(|_| "{}".into())
        }

        /// Persist settings passed back from the host UI
        pub fn save_settings(&self, json: &str) {
            match serde_json::from_str::<Settings>(json) {
                Ok(settings) => settings.save(),
                Err(err) => log::warn!("ignoring malformed settings payload: {err}"),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::NeonChain;
