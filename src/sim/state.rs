//! Game state and core simulation types
//!
//! The `GameState` owns everything a session needs: the color grid, the orb
//! registry, score/time/combo accounting, the seeded RNG, the logical-clock
//! scheduler, and the outgoing event buffer drained by the host.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{self, ColorGrid};
use super::layout::{self, LayoutState};
use super::schedule::{Scheduler, TaskId};
use crate::consts::*;

/// The five-color neon palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbColor {
    Red,
    Cyan,
    Yellow,
    Green,
    Purple,
}

impl OrbColor {
    pub const ALL: [OrbColor; 5] = [
        OrbColor::Red,
        OrbColor::Cyan,
        OrbColor::Yellow,
        OrbColor::Green,
        OrbColor::Purple,
    ];

    /// Presentation RGB value
    pub fn rgb(self) -> u32 {
        match self {
            OrbColor::Red => 0xff1744,
            OrbColor::Cyan => 0x00e5ff,
            OrbColor::Yellow => 0xffea00,
            OrbColor::Green => 0x76ff03,
            OrbColor::Purple => 0xe040fb,
        }
    }
}

/// Stable orb identifier: the row-major cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrbId(pub u32);

impl OrbId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single clickable grid cell entity
///
/// Lifecycle: `active` (idle) -> `exploding` (detonated, visual running) ->
/// gone (both flags false). There is no way back; an orb pops at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    pub id: OrbId,
    pub column: usize,
    pub row: usize,
    pub color: OrbColor,
    pub center: Vec2,
    pub radius: f32,
    pub active: bool,
    pub exploding: bool,
}

impl Orb {
    /// Popped and finished exploding; permanently out of the session
    #[inline]
    pub fn is_gone(&self) -> bool {
        !self.active && !self.exploding
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreChanged {
        score: u32,
    },
    TimeChanged {
        time_left: i32,
    },
    /// An orb detonated; presentation runs the explosion visual and calls
    /// back `explosion_finished` when it completes
    OrbExploded {
        id: OrbId,
        center: Vec2,
        radius: f32,
        color: OrbColor,
        combo: u32,
    },
    /// Combo banner request (combo count already past the display threshold)
    ComboDisplay {
        combo: u32,
    },
    SessionEnded {
        final_score: u32,
    },
    /// Restart finished; presentation rebuilds orb sprites from scratch
    GridRebuilt,
}

/// Complete session state
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Color assignment produced once at session start
    pub grid: ColorGrid,
    /// Orb registry: exactly one orb per grid cell, row-major
    pub orbs: Vec<Orb>,
    /// Derived grid geometry for the current canvas
    pub layout: LayoutState,
    /// Canvas size (4:3 fit of the viewport)
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Measured top UI band height reported by the presentation layer
    ui_height: f32,
    pub score: u32,
    pub time_left: i32,
    pub game_over: bool,
    pub current_combo: u32,
    pub(crate) scheduler: Scheduler,
    /// Countdown task handle; taking it cancels the timer exactly once
    pub(crate) countdown: Option<TaskId>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session for the given seed and viewport
    pub fn new(seed: u64, viewport_width: f32, viewport_height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (canvas_width, canvas_height) = layout::fit_canvas(viewport_width, viewport_height);
        let layout = layout::compute(canvas_width, canvas_height, 0.0);
        let grid = grid::generate(GRID_COLS, GRID_ROWS, &OrbColor::ALL, &mut rng);
        let orbs = Self::build_orbs(&grid, &layout);

        let mut state = Self {
            seed,
            rng,
            grid,
            orbs,
            layout,
            canvas_width,
            canvas_height,
            ui_height: 0.0,
            score: 0,
            time_left: SESSION_SECONDS,
            game_over: false,
            current_combo: 0,
            scheduler: Scheduler::new(),
            countdown: None,
            events: Vec::new(),
        };
        state.start_countdown();

        log::info!(
            "session started (seed {seed}, canvas {}x{})",
            canvas_width,
            canvas_height
        );
        state
    }

    /// Materialize one orb per grid cell at its laid-out position
    pub(crate) fn build_orbs(grid: &ColorGrid, layout: &LayoutState) -> Vec<Orb> {
        let mut orbs = Vec::with_capacity(grid.cols() * grid.rows());
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                orbs.push(Orb {
                    id: OrbId(orbs.len() as u32),
                    column: col,
                    row,
                    color: grid.color(col, row),
                    center: layout.cell_center(col, row),
                    radius: layout.orb_radius,
                    active: true,
                    exploding: false,
                });
            }
        }
        orbs
    }

    /// Re-apply the current layout to all orbs. Gone orbs are skipped (their
    /// presentation resource is already torn down); exploding orbs keep their
    /// pre-explosion radius so the running visual is not rescaled mid-tween.
    pub(crate) fn apply_layout(&mut self) {
        for orb in &mut self.orbs {
            if orb.is_gone() {
                continue;
            }
            orb.center = self.layout.cell_center(orb.column, orb.row);
            if orb.active && !orb.exploding {
                orb.radius = self.layout.orb_radius;
            }
        }
    }

    fn relayout(&mut self) {
        self.layout = layout::compute(self.canvas_width, self.canvas_height, self.ui_height);
        self.apply_layout();
    }

    /// The environment reports a new viewport; refit the canvas and redo the
    /// full layout
    pub fn viewport_resized(&mut self, viewport_width: f32, viewport_height: f32) {
        let (w, h) = layout::fit_canvas(viewport_width, viewport_height);
        self.canvas_width = w;
        self.canvas_height = h;
        self.relayout();
        log::debug!("viewport resized, canvas now {w}x{h}");
    }

    /// The presentation layer reports the measured height of the top UI band
    /// after text re-scaling; geometry refines around it (second pass of the
    /// layout contract)
    pub fn set_ui_height(&mut self, ui_height: f32) {
        self.ui_height = ui_height;
        self.relayout();
    }

    pub fn ui_height(&self) -> f32 {
        self.ui_height
    }

    pub fn orb(&self, id: OrbId) -> Option<&Orb> {
        self.orbs.get(id.index())
    }

    pub(crate) fn orb_mut(&mut self, id: OrbId) -> Option<&mut Orb> {
        self.orbs.get_mut(id.index())
    }

    /// Registry lookup by grid coordinate
    pub fn orb_id(&self, column: usize, row: usize) -> Option<OrbId> {
        if column < self.grid.cols() && row < self.grid.rows() {
            Some(OrbId((row * self.grid.cols() + column) as u32))
        } else {
            None
        }
    }

    /// Hit test for click handling: the topmost live orb whose disc contains
    /// the point
    pub fn orb_at(&self, point: Vec2) -> Option<OrbId> {
        self.orbs
            .iter()
            .find(|o| o.active && !o.exploding && o.center.distance(point) <= o.radius)
            .map(|o| o.id)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all buffered presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
