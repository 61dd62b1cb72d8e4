//! Neon Chain - an orb-popping chain-reaction arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid generation, layout, chain reactions, session)
//! - `render`: Draw-directive surface consumed by a presentation layer
//! - `platform`: Browser host bridge (wasm-bindgen)
//! - `settings`: Player presentation preferences

pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (fixed for a session)
    pub const GRID_COLS: usize = 8;
    pub const GRID_ROWS: usize = 6;

    /// Design-time orb radius; the chain reach was tuned against it
    pub const BASE_ORB_RADIUS: f32 = 35.0;
    /// Chain reach scales with the responsive orb radius (~120 px at the
    /// 35 px design radius)
    pub const EXPLOSION_RADIUS_FACTOR: f32 = 120.0 / BASE_ORB_RADIUS;

    /// Points for the click that starts a reaction
    pub const INITIAL_POP_POINTS: u32 = 10;
    /// Per-combo points for each chained pop
    pub const CHAIN_POP_POINTS: u32 = 5;
    /// Combo banner shows once the combo count exceeds this
    pub const COMBO_DISPLAY_MIN: u32 = 2;

    /// Session length in countdown seconds
    pub const SESSION_SECONDS: i32 = 60;

    /// Logical time-units between a pop and its propagation sweep, and
    /// between the sweep and each triggered pop
    pub const CHAIN_STEP_DELAY: u64 = 100;
    /// Logical time-units per countdown second
    pub const COUNTDOWN_INTERVAL: u64 = 1000;

    /// Canvas aspect ratio (width / height)
    pub const ASPECT_RATIO: f32 = 4.0 / 3.0;
    /// Padding kept between the canvas and the viewport edges
    pub const VIEWPORT_PAD: f32 = 20.0;
    /// Canvas size floors for degenerate viewports
    pub const MIN_CANVAS_WIDTH: f32 = 320.0;
    pub const MIN_CANVAS_HEIGHT: f32 = 240.0;
}
