//! Color grid generation with biased clustering
//!
//! Colors are assigned cell by cell in row-major order. Each cell weights the
//! palette toward the colors of its already-assigned neighbors (runs to the
//! left and above, plus the diagonals), damped by how often a color has been
//! used globally. The result is organic same-color blobs without any
//! guarantee of solvability or bounded cluster size.

use rand::Rng;

use super::state::OrbColor;

/// Base weight every color starts from
const BASE_WEIGHT: f32 = 1.0;
/// Bonus for an immediate left/top neighbor match
const NEIGHBOR_BONUS: f32 = 8.0;
/// Additional bonus when the matching run extends two cells
const RUN2_BONUS: f32 = 10.0;
/// Additional bonus when the matching run extends three cells
const RUN3_BONUS: f32 = 6.0;
/// Bonus per matching diagonal-above neighbor
const DIAGONAL_BONUS: f32 = 3.0;
/// Bonus when left and top agree with each other and with the candidate
const CORNER_BONUS: f32 = 18.0;
/// Damping per prior global use of a color
const USAGE_DAMPING: f32 = 0.01;
/// Every color stays selectable no matter how damped
const WEIGHT_EPSILON: f32 = 0.0001;

/// Immutable color assignment for the session, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    cols: usize,
    rows: usize,
    cells: Vec<OrbColor>,
}

impl ColorGrid {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn color(&self, col: usize, row: usize) -> OrbColor {
        self.cells[row * self.cols + col]
    }
}

/// Already-assigned neighbors of the cell being colored. Index 0 is the
/// immediate neighbor, higher indices extend the run away from the cell.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Neighborhood {
    pub left: [Option<OrbColor>; 3],
    pub above: [Option<OrbColor>; 3],
    pub diag_left: Option<OrbColor>,
    pub diag_right: Option<OrbColor>,
}

impl Neighborhood {
    fn at(cells: &[OrbColor], cols: usize, col: usize, row: usize) -> Self {
        let peek = |c: isize, r: isize| -> Option<OrbColor> {
            if c < 0 || r < 0 || c >= cols as isize {
                return None;
            }
            let idx = r as usize * cols + c as usize;
            // Only cells earlier in row-major order are assigned
            cells.get(idx).copied()
        };
        let (c, r) = (col as isize, row as isize);
        Self {
            left: [peek(c - 1, r), peek(c - 2, r), peek(c - 3, r)],
            above: [peek(c, r - 1), peek(c, r - 2), peek(c, r - 3)],
            diag_left: peek(c - 1, r - 1),
            diag_right: peek(c + 1, r - 1),
        }
    }
}

/// Weight each palette color for one cell given its neighborhood and the
/// global usage tally. Output is aligned with `palette`.
pub(crate) fn cluster_weights(
    palette: &[OrbColor],
    hood: &Neighborhood,
    usage: &[u32],
) -> Vec<f32> {
    palette
        .iter()
        .zip(usage)
        .map(|(&color, &used)| {
            let c = Some(color);
            let left = hood.left;
            let above = hood.above;
            let mut w = BASE_WEIGHT;

            if left[0] == c {
                w += NEIGHBOR_BONUS;
            }
            if above[0] == c {
                w += NEIGHBOR_BONUS;
            }
            if left[0] == c && left[1] == c {
                w += RUN2_BONUS;
            }
            if above[0] == c && above[1] == c {
                w += RUN2_BONUS;
            }
            if left[0] == c && left[1] == c && left[2] == c {
                w += RUN3_BONUS;
            }
            if above[0] == c && above[1] == c && above[2] == c {
                w += RUN3_BONUS;
            }
            if hood.diag_left == c {
                w += DIAGONAL_BONUS;
            }
            if hood.diag_right == c {
                w += DIAGONAL_BONUS;
            }
            // Left and top forming a corner of the same color: grow the blob
            if left[0].is_some() && left[0] == above[0] && left[0] == c {
                w += CORNER_BONUS;
            }

            // Damp globally dominant colors
            w /= 1.0 + used as f32 * USAGE_DAMPING;

            w.max(WEIGHT_EPSILON)
        })
        .collect()
}

/// Cumulative-walk weighted selection. `draw` must lie in `[0, total]`;
/// the color whose cumulative weight first reaches the draw wins.
pub(crate) fn pick_weighted(palette: &[OrbColor], weights: &[f32], draw: f32) -> OrbColor {
    let mut remaining = draw;
    for (&color, &w) in palette.iter().zip(weights) {
        remaining -= w;
        if remaining <= 0.0 {
            return color;
        }
    }
    palette[palette.len() - 1]
}

/// Generate a `cols` x `rows` color assignment over `palette`
pub fn generate(
    cols: usize,
    rows: usize,
    palette: &[OrbColor],
    rng: &mut impl Rng,
) -> ColorGrid {
    let mut cells: Vec<OrbColor> = Vec::with_capacity(cols * rows);
    let mut usage = vec![0u32; palette.len()];

    for row in 0..rows {
        for col in 0..cols {
            let hood = Neighborhood::at(&cells, cols, col, row);
            let weights = cluster_weights(palette, &hood, &usage);
            let total: f32 = weights.iter().sum();
            let draw = rng.random_range(0.0..total);
            let color = pick_weighted(palette, &weights, draw);

            let slot = palette.iter().position(|&p| p == color).unwrap_or(0);
            usage[slot] += 1;
            cells.push(color);
        }
    }

    ColorGrid { cols, rows, cells }
}
