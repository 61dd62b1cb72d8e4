//! Session lifecycle: time advancement, countdown, game over, restart
//!
//! The host moves the logical clock forward with `advance`; everything
//! time-driven (countdown seconds, chain staggering) is dispatched from the
//! scheduler here, so the whole session replays deterministically under a
//! scripted clock.

use super::grid;
use super::schedule::{Task, Ticks};
use super::state::{GameEvent, GameState, OrbColor};
use crate::consts::*;

impl GameState {
    /// Advance the logical clock, firing every task due in the window.
    /// Tasks scheduled by fired tasks run in the same window when due.
    pub fn advance(&mut self, dt: Ticks) {
        let horizon = self.scheduler.now() + dt;
        while let Some((_, task)) = self.scheduler.pop_due(horizon) {
            self.run_task(task);
        }
        self.scheduler.finish(horizon);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Propagate { source } => self.propagate(source),
            Task::ChainExplode { target } => self.explode(target, false),
            Task::CountdownTick => self.countdown_tick(),
        }
    }

    /// Arm the once-per-second countdown. The handle enforces the
    /// one-live-timer discipline across restarts.
    pub(crate) fn start_countdown(&mut self) {
        debug_assert!(self.countdown.is_none());
        self.countdown = Some(self.scheduler.schedule(COUNTDOWN_INTERVAL, Task::CountdownTick));
    }

    fn countdown_tick(&mut self) {
        // This occurrence has fired; the handle now refers to the next one
        self.countdown = None;
        if self.game_over {
            return;
        }

        self.time_left -= 1;
        self.push_event(GameEvent::TimeChanged {
            time_left: self.time_left,
        });

        if self.time_left <= 0 {
            // Ending beats rescheduling the next tick
            self.end_session();
        } else {
            self.countdown = Some(self.scheduler.schedule(COUNTDOWN_INTERVAL, Task::CountdownTick));
        }
    }

    /// End the session: freeze scoring, cancel the countdown (exactly once),
    /// surface the final score
    pub(crate) fn end_session(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        if let Some(handle) = self.countdown.take() {
            self.scheduler.cancel(handle);
        }
        self.push_event(GameEvent::SessionEnded {
            final_score: self.score,
        });
        log::info!("session over, final score {}", self.score);
    }

    /// Tear the session down and bootstrap a fresh one on the same canvas:
    /// new grid, new orbs, reset accounting, fresh countdown
    pub fn restart(&mut self) {
        if let Some(handle) = self.countdown.take() {
            self.scheduler.cancel(handle);
        }
        // Pending chain tasks reference orbs of the discarded board
        self.scheduler.clear();

        self.score = 0;
        self.time_left = SESSION_SECONDS;
        self.current_combo = 0;
        self.game_over = false;

        self.grid = grid::generate(GRID_COLS, GRID_ROWS, &OrbColor::ALL, &mut self.rng);
        self.orbs = Self::build_orbs(&self.grid, &self.layout);
        self.start_countdown();

        self.push_event(GameEvent::GridRebuilt);
        log::info!("session restarted (seed {})", self.seed);
    }
}
