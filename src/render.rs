//! Render surface contract
//!
//! The core never draws. Each frame it emits one `DrawDirective` per
//! surviving orb; the presentation layer owns circles, glow, tweening and
//! text. Cosmetic reactions (explosion flashes, combo banners, the breathing
//! glow tick) go through the optional `VisualEffectsSink` capability, which
//! the core never depends on for correctness.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{GameEvent, GameState};

/// One orb's worth of drawing state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawDirective {
    pub center: Vec2,
    pub radius: f32,
    /// Presentation RGB
    pub color: u32,
    pub opacity: f32,
    /// False while the explosion visual is still running
    pub active: bool,
}

/// Draw directives for every orb that still has a presentation resource.
/// Orbs that finished exploding are gone and emit nothing.
pub fn frame(state: &GameState) -> Vec<DrawDirective> {
    state
        .orbs
        .iter()
        .filter(|o| !o.is_gone())
        .map(|o| DrawDirective {
            center: o.center,
            radius: o.radius,
            color: o.color.rgb(),
            opacity: 1.0,
            active: o.active,
        })
        .collect()
}

/// Capability interface for cosmetic effects. All methods default to no-ops;
/// a host implements whichever visuals it supports.
pub trait VisualEffectsSink {
    /// An orb detonated at `center`; run the explosion visual and particles,
    /// then report back through `GameState::explosion_finished`
    fn explosion_started(&mut self, center: Vec2, radius: f32, color: u32, combo: u32) {
        let _ = (center, radius, color, combo);
    }

    /// Combo banner request
    fn combo_flash(&mut self, combo: u32) {
        let _ = combo;
    }

    /// Final-score screen request
    fn session_ended(&mut self, final_score: u32) {
        let _ = final_score;
    }

    /// Per-frame cosmetic tick (breathing glow and the like). Driven by the
    /// host's render loop; game state never changes here.
    fn frame_tick(&mut self, elapsed: f32) {
        let _ = elapsed;
    }
}

/// Fan drained game events out to a sink. Score/time updates are plain UI
/// text and stay with the host's HUD; only effectful events route here.
pub fn forward_events(events: &[GameEvent], sink: &mut impl VisualEffectsSink) {
    for event in events {
        match event {
            GameEvent::OrbExploded {
                center,
                radius,
                color,
                combo,
                ..
            } => sink.explosion_started(*center, *radius, color.rgb(), *combo),
            GameEvent::ComboDisplay { combo } => sink.combo_flash(*combo),
            GameEvent::SessionEnded { final_score } => sink.session_ended(*final_score),
            GameEvent::ScoreChanged { .. }
            | GameEvent::TimeChanged { .. }
            | GameEvent::GridRebuilt => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRID_COLS, GRID_ROWS};
    use crate::sim::OrbId;

    #[derive(Default)]
    struct RecordingSink {
        explosions: Vec<u32>,
        combos: Vec<u32>,
        ended_with: Option<u32>,
    }

    impl VisualEffectsSink for RecordingSink {
        fn explosion_started(&mut self, _c: Vec2, _r: f32, color: u32, _combo: u32) {
            self.explosions.push(color);
        }
        fn combo_flash(&mut self, combo: u32) {
            self.combos.push(combo);
        }
        fn session_ended(&mut self, final_score: u32) {
            self.ended_with = Some(final_score);
        }
    }

    #[test]
    fn test_frame_covers_live_orbs_only() {
        let mut state = GameState::new(7, 820.0, 620.0);
        assert_eq!(frame(&state).len(), GRID_COLS * GRID_ROWS);

        // A popped-and-finished orb drops out; an exploding one stays
        state.handle_click(OrbId(0));
        let during = frame(&state);
        assert_eq!(during.len(), GRID_COLS * GRID_ROWS);
        assert!(!during[0].active);

        state.explosion_finished(OrbId(0));
        assert_eq!(frame(&state).len(), GRID_COLS * GRID_ROWS - 1);
    }

    #[test]
    fn test_frame_reports_layout_geometry() {
        let state = GameState::new(7, 820.0, 620.0);
        let directives = frame(&state);
        let orb = &state.orbs[5];
        assert_eq!(directives[5].center, orb.center);
        assert_eq!(directives[5].radius, state.layout.orb_radius);
        assert_eq!(directives[5].color, orb.color.rgb());
    }

    #[test]
    fn test_forward_events_routes_effects() {
        let mut state = GameState::new(7, 820.0, 620.0);
        state.handle_click(OrbId(0));
        state.advance(30_000);

        let events = state.drain_events();
        let mut sink = RecordingSink::default();
        forward_events(&events, &mut sink);

        assert!(!sink.explosions.is_empty());
        let combo_events = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ComboDisplay { .. }))
            .count();
        assert_eq!(sink.combos.len(), combo_events);
        assert_eq!(sink.ended_with, None);
    }
}
