//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical clock only (the host advances time explicitly)
//! - Seeded RNG only
//! - Stable task order (by due time, then schedule order)
//! - No rendering or platform dependencies

pub mod chain;
pub mod grid;
pub mod layout;
pub mod schedule;
pub mod session;
pub mod state;

pub use grid::{ColorGrid, generate};
pub use layout::{LayoutState, compute, fit_canvas};
pub use schedule::{Scheduler, Task, TaskId, Ticks};
pub use state::{GameEvent, GameState, Orb, OrbColor, OrbId};
