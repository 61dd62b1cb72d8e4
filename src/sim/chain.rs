//! Chain reaction engine
//!
//! Per-orb state machine: Idle(active) -> Exploding -> Removed, never back.
//! A click starts a reaction tree; each pop schedules a propagation sweep one
//! chain step later, and each sweep schedules matching in-reach pops another
//! step after that. Every guard here is an idempotency check, not an error:
//! deferred tasks may legitimately arrive after the session ended or after an
//! orb is already gone.

use glam::Vec2;

use super::schedule::Task;
use super::state::{GameEvent, GameState, Orb, OrbId};
use crate::consts::*;

impl GameState {
    /// Pointer-down from the presentation layer: hit-test and click
    pub fn pointer_down(&mut self, point: Vec2) {
        if let Some(id) = self.orb_at(point) {
            self.handle_click(id);
        }
    }

    /// Click an orb, starting a new reaction tree
    pub fn handle_click(&mut self, id: OrbId) {
        if self.game_over {
            return;
        }
        let Some(orb) = self.orb(id) else { return };
        if !orb.active || orb.exploding {
            return;
        }
        self.current_combo = 0;
        self.explode(id, true);
    }

    /// Detonate an orb. No-op on inactive/exploding orbs and after session
    /// end, so chain tasks can fire late without consequence.
    pub(crate) fn explode(&mut self, id: OrbId, is_initial: bool) {
        if self.game_over {
            return;
        }
        let Some(orb) = self.orb_mut(id) else { return };
        if !orb.active || orb.exploding {
            return;
        }
        orb.exploding = true;
        orb.active = false;
        let (center, radius, color) = (orb.center, orb.radius, orb.color);
        let (column, row) = (orb.column, orb.row);

        let points = if is_initial {
            INITIAL_POP_POINTS
        } else {
            CHAIN_POP_POINTS * self.current_combo
        };
        self.score += points;
        self.current_combo += 1;
        let combo = self.current_combo;

        self.push_event(GameEvent::ScoreChanged { score: self.score });
        if combo > COMBO_DISPLAY_MIN {
            self.push_event(GameEvent::ComboDisplay { combo });
        }
        self.push_event(GameEvent::OrbExploded {
            id,
            center,
            radius,
            color,
            combo,
        });
        log::debug!("orb ({column},{row}) popped for {points} (combo {combo})");

        self.scheduler
            .schedule(CHAIN_STEP_DELAY, Task::Propagate { source: id });
    }

    /// Sweep for live same-color orbs within the explosion radius of the
    /// source and schedule their (non-initial) pops one chain step out
    pub(crate) fn propagate(&mut self, source: OrbId) {
        if self.game_over {
            return;
        }
        let Some(src) = self.orb(source) else { return };
        let (src_center, src_color) = (src.center, src.color);
        let reach = EXPLOSION_RADIUS_FACTOR * self.layout.orb_radius;

        let targets: Vec<OrbId> = self
            .orbs
            .iter()
            .filter(|o| o.id != source && o.active && !o.exploding)
            .filter(|o| o.color == src_color && o.center.distance(src_center) < reach)
            .map(|o| o.id)
            .collect();

        for target in targets {
            self.scheduler
                .schedule(CHAIN_STEP_DELAY, Task::ChainExplode { target });
        }
    }

    /// The presentation layer reports an orb's explosion visual has fully
    /// finished; the orb is now removed and the board may have emptied
    pub fn explosion_finished(&mut self, id: OrbId) {
        let Some(orb) = self.orb_mut(id) else { return };
        if !orb.exploding {
            return;
        }
        orb.exploding = false;
        self.check_all_cleared();
    }

    fn check_all_cleared(&mut self) {
        if self.game_over {
            return;
        }
        if self.orbs.iter().all(Orb::is_gone) {
            log::info!("board cleared");
            self.end_session();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::OrbColor;

    /// A state where every orb is already gone except the listed cells,
    /// which are recolored and repositioned for exact distance control.
    fn rigged(live: &[(usize, usize, OrbColor, Vec2)]) -> GameState {
        let mut state = GameState::new(4242, 820.0, 620.0);
        state.layout.orb_radius = 35.0; // explosion reach exactly 120
        for orb in &mut state.orbs {
            orb.active = false;
        }
        for &(col, row, color, center) in live {
            let id = state.orb_id(col, row).unwrap();
            let orb = state.orb_mut(id).unwrap();
            orb.active = true;
            orb.color = color;
            orb.center = center;
        }
        state
    }

    fn count_session_ended(state: &GameState) -> usize {
        state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count()
    }

    #[test]
    fn test_click_awards_initial_points() {
        let mut state = rigged(&[(0, 0, OrbColor::Red, Vec2::ZERO)]);
        let id = state.orb_id(0, 0).unwrap();
        state.handle_click(id);

        assert_eq!(state.score, 10);
        assert_eq!(state.current_combo, 1);
        let orb = state.orb(id).unwrap();
        assert!(!orb.active);
        assert!(orb.exploding);
    }

    #[test]
    fn test_explode_is_idempotent() {
        let mut state = rigged(&[(0, 0, OrbColor::Red, Vec2::ZERO)]);
        let id = state.orb_id(0, 0).unwrap();
        state.explode(id, true);
        let after_one = (state.score, state.current_combo, state.orb(id).cloned());
        state.explode(id, true);
        state.explode(id, false);
        assert_eq!(
            (state.score, state.current_combo, state.orb(id).cloned()),
            after_one
        );
    }

    #[test]
    fn test_click_ignored_on_popped_orb() {
        let mut state = rigged(&[(0, 0, OrbColor::Red, Vec2::ZERO)]);
        let id = state.orb_id(0, 0).unwrap();
        state.handle_click(id);
        assert_eq!(state.score, 10);
        state.handle_click(id);
        assert_eq!(state.score, 10);
        assert_eq!(state.current_combo, 1);
    }

    #[test]
    fn test_click_ignored_after_session_end() {
        let mut state = rigged(&[(0, 0, OrbColor::Red, Vec2::ZERO)]);
        state.end_session();
        let id = state.orb_id(0, 0).unwrap();
        state.handle_click(id);
        assert_eq!(state.score, 0);
        assert!(state.orb(id).unwrap().active);
    }

    #[test]
    fn test_combo_scoring_sequence() {
        // A reaches only B; B reaches C; combo chain of three
        let mut state = rigged(&[
            (0, 0, OrbColor::Cyan, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Cyan, Vec2::new(100.0, 0.0)),
            (2, 0, OrbColor::Cyan, Vec2::new(200.0, 0.0)),
        ]);
        let a = state.orb_id(0, 0).unwrap();
        let b = state.orb_id(1, 0).unwrap();
        let c = state.orb_id(2, 0).unwrap();

        state.handle_click(a);
        assert_eq!(state.score, 10);

        // t=100: A's sweep schedules B; t=200: B pops for 5 * combo(1)
        state.advance(200);
        assert_eq!(state.score, 15);
        assert!(state.orb(b).unwrap().exploding);
        assert!(state.orb(c).unwrap().active);

        // t=300: B's sweep schedules C; t=400: C pops for 5 * combo(2)
        state.advance(200);
        assert_eq!(state.score, 25);
        assert!(state.orb(c).unwrap().exploding);
        assert_eq!(state.current_combo, 3);
    }

    #[test]
    fn test_combo_display_fires_past_threshold() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Cyan, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Cyan, Vec2::new(50.0, 0.0)),
            (2, 0, OrbColor::Cyan, Vec2::new(100.0, 0.0)),
        ]);
        state.handle_click(state.orb_id(0, 0).unwrap());
        state.advance(400);

        let combos: Vec<u32> = state
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::ComboDisplay { combo } => Some(*combo),
                _ => None,
            })
            .collect();
        // Banner only once the third pop lands
        assert_eq!(combos, vec![3]);
    }

    #[test]
    fn test_propagation_radius_boundary_is_strict() {
        // Reach is (120/35) * 35 = 120: a matching orb at exactly 120 stays
        let mut state = rigged(&[
            (0, 0, OrbColor::Green, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Green, Vec2::new(120.0, 0.0)),
            (2, 0, OrbColor::Green, Vec2::new(-119.9, 0.0)),
        ]);
        let boundary = state.orb_id(1, 0).unwrap();
        let inside = state.orb_id(2, 0).unwrap();

        state.handle_click(state.orb_id(0, 0).unwrap());
        state.advance(1000);

        assert!(state.orb(boundary).unwrap().active);
        assert!(!state.orb(inside).unwrap().active);
        assert_eq!(state.score, 15);
    }

    #[test]
    fn test_propagation_requires_matching_color() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Red, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Yellow, Vec2::new(40.0, 0.0)),
        ]);
        state.handle_click(state.orb_id(0, 0).unwrap());
        state.advance(1000);

        assert!(state.orb(state.orb_id(1, 0).unwrap()).unwrap().active);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_chain_is_time_staggered() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Purple, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Purple, Vec2::new(60.0, 0.0)),
        ]);
        let b = state.orb_id(1, 0).unwrap();
        state.handle_click(state.orb_id(0, 0).unwrap());

        // Sweep at t=100 has fired, but B's pop lands only at t=200
        state.advance(150);
        assert!(state.orb(b).unwrap().active);
        state.advance(50);
        assert!(state.orb(b).unwrap().exploding);
    }

    #[test]
    fn test_reach_scales_with_current_orb_radius() {
        // Half the design radius halves the reach: 60 apart is now too far
        let mut state = rigged(&[
            (0, 0, OrbColor::Cyan, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Cyan, Vec2::new(65.0, 0.0)),
        ]);
        state.layout.orb_radius = 17.5;
        state.handle_click(state.orb_id(0, 0).unwrap());
        state.advance(1000);
        assert!(state.orb(state.orb_id(1, 0).unwrap()).unwrap().active);
    }

    #[test]
    fn test_late_chain_tasks_are_harmless_after_end() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Red, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Red, Vec2::new(50.0, 0.0)),
        ]);
        state.handle_click(state.orb_id(0, 0).unwrap());
        state.end_session();
        let score = state.score;

        // Pending sweep and pop fire into an ended session
        state.advance(1000);
        assert_eq!(state.score, score);
        assert!(state.orb(state.orb_id(1, 0).unwrap()).unwrap().active);
    }

    #[test]
    fn test_board_clear_ends_session_once() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Red, Vec2::new(0.0, 0.0)),
            (1, 0, OrbColor::Red, Vec2::new(50.0, 0.0)),
        ]);
        let a = state.orb_id(0, 0).unwrap();
        let b = state.orb_id(1, 0).unwrap();

        state.handle_click(a);
        state.advance(200);
        assert!(state.orb(b).unwrap().exploding);

        state.explosion_finished(a);
        assert!(!state.game_over);
        state.explosion_finished(b);
        assert!(state.game_over);
        assert_eq!(count_session_ended(&state), 1);

        // Duplicate completion signals change nothing
        state.explosion_finished(b);
        assert_eq!(count_session_ended(&state), 1);
    }

    #[test]
    fn test_no_score_mutation_after_end() {
        let mut state = rigged(&[
            (0, 0, OrbColor::Red, Vec2::ZERO),
            (1, 0, OrbColor::Yellow, Vec2::new(400.0, 0.0)),
        ]);
        state.end_session();
        state.handle_click(state.orb_id(1, 0).unwrap());
        state.explode(state.orb_id(1, 0).unwrap(), true);
        state.advance(5000);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pointer_down_routes_through_hit_test() {
        let mut state = rigged(&[(3, 2, OrbColor::Green, Vec2::new(250.0, 250.0))]);
        state.pointer_down(Vec2::new(250.0, 250.0));
        assert_eq!(state.score, 10);
        // A miss does nothing
        state.pointer_down(Vec2::new(0.0, 0.0));
        assert_eq!(state.score, 10);
    }
}
