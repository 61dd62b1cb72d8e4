//! Responsive grid geometry
//!
//! Converts canvas dimensions into grid geometry (spacing, orb radius,
//! centering offsets) under the margin policy, and fits the canvas itself to
//! the viewport at a fixed 4:3 aspect ratio.
//!
//! The top margin must clear a UI band whose height depends on rendered text,
//! which in turn depends on the canvas scale. That fixed point is resolved by
//! contract with exactly two passes: a coarse pass from the margin policy,
//! then one refinement using the measured UI height.

use glam::Vec2;

use crate::consts::*;

/// Fraction of canvas width reserved per side, with absolute bounds
const SIDE_MARGIN_FRAC: f32 = 0.04;
const SIDE_MARGIN_MIN: f32 = 16.0;
const SIDE_MARGIN_MAX: f32 = 40.0;

const TOP_MARGIN_FRAC: f32 = 0.12;
const TOP_MARGIN_MIN: f32 = 60.0;
const TOP_MARGIN_MAX: f32 = 150.0;

const BOTTOM_MARGIN_FRAC: f32 = 0.06;
const BOTTOM_MARGIN_MIN: f32 = 16.0;
const BOTTOM_MARGIN_MAX: f32 = 60.0;

/// Orb radius as a fraction of spacing, with absolute bounds
const RADIUS_FACTOR: f32 = 0.39;
const RADIUS_MIN: f32 = 12.0;
const RADIUS_MAX: f32 = 60.0;

/// Gap kept between the UI band and the first orb row
const UI_CLEARANCE: f32 = 16.0;

/// Derived grid geometry for the current canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// Distance between adjacent orb centers (both axes)
    pub spacing: f32,
    /// Current responsive orb radius
    pub orb_radius: f32,
    /// Canvas position of the first column's centers
    pub offset_x: f32,
    /// Canvas position of the first row's centers
    pub offset_y: f32,
}

impl LayoutState {
    /// Center of the orb at the given grid cell
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            self.offset_x + col as f32 * self.spacing,
            self.offset_y + row as f32 * self.spacing,
        )
    }
}

fn margin(dimension: f32, frac: f32, min: f32, max: f32) -> f32 {
    (dimension * frac).round().clamp(min, max)
}

fn spacing_and_radius(spacing_x: f32, avail_h: f32) -> (f32, f32) {
    let spacing_y = avail_h / (GRID_ROWS - 1) as f32;
    let spacing = spacing_x.min(spacing_y).max(0.0);
    let radius = (spacing * RADIUS_FACTOR).clamp(RADIUS_MIN, RADIUS_MAX);
    (spacing, radius)
}

/// Compute grid geometry for a canvas and the measured UI band height
pub fn compute(width: f32, height: f32, ui_height: f32) -> LayoutState {
    let side = margin(width, SIDE_MARGIN_FRAC, SIDE_MARGIN_MIN, SIDE_MARGIN_MAX);
    let mut top = margin(height, TOP_MARGIN_FRAC, TOP_MARGIN_MIN, TOP_MARGIN_MAX);
    let bottom = margin(height, BOTTOM_MARGIN_FRAC, BOTTOM_MARGIN_MIN, BOTTOM_MARGIN_MAX);

    // First pass: estimate spacing and radius from the margin policy
    let spacing_x = (width - side * 2.0) / (GRID_COLS - 1) as f32;
    let mut avail_h = height - (top + bottom);
    let (mut spacing, mut orb_radius) = spacing_and_radius(spacing_x, avail_h);

    // Second pass: the top row must clear the UI text plus the orb itself
    let min_top = (ui_height + orb_radius + UI_CLEARANCE).ceil();
    if top < min_top {
        top = min_top;
        avail_h = height - (top + bottom);
        (spacing, orb_radius) = spacing_and_radius(spacing_x, avail_h);
    }

    let grid_w = (GRID_COLS - 1) as f32 * spacing;
    let grid_h = (GRID_ROWS - 1) as f32 * spacing;

    LayoutState {
        spacing,
        orb_radius,
        offset_x: ((width - grid_w) / 2.0).floor(),
        offset_y: (top + (avail_h - grid_h) / 2.0).floor(),
    }
}

/// Best-fit canvas size for a viewport, preserving the 4:3 aspect ratio
/// inside the padded bounds. Chooses width-driven or height-driven sizing,
/// whichever fits.
pub fn fit_canvas(viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    let max_w = (viewport_width - VIEWPORT_PAD).max(MIN_CANVAS_WIDTH);
    let max_h = (viewport_height - VIEWPORT_PAD).max(MIN_CANVAS_HEIGHT);

    let w_from_h = (max_h * ASPECT_RATIO).floor();
    let h_from_w = (max_w / ASPECT_RATIO).floor();

    if w_from_h <= max_w {
        (w_from_h, max_h)
    } else {
        (max_w, h_from_w)
    }
}
