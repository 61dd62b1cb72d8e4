//! Neon Chain entry point
//!
//! The web build is driven through `platform::NeonChain` by a JS
//! presentation layer. The native binary runs a headless scripted session
//! for smoke-testing and log inspection.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Chain (headless) starting...");
    run_demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts construct platform::NeonChain from JS; nothing to do here
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo_session() {
    use neon_chain::render::{self, VisualEffectsSink};
    use neon_chain::sim::{GameEvent, GameState};

    struct LogEffects;

    impl VisualEffectsSink for LogEffects {
        fn explosion_started(&mut self, center: glam::Vec2, _radius: f32, color: u32, combo: u32) {
            log::info!(
                "boom at ({:.0},{:.0}) color #{color:06x} combo {combo}",
                center.x,
                center.y
            );
        }

        fn combo_flash(&mut self, combo: u32) {
            log::info!("COMBO x{combo}!");
        }

        fn session_ended(&mut self, final_score: u32) {
            log::info!("FINAL SCORE: {final_score}");
        }
    }

    let seed: u64 = rand::random();
    let mut state = GameState::new(seed, 1280.0, 960.0);
    let mut effects = LogEffects;

    // Click the middle of the board and let the reaction play out,
    // acknowledging each explosion visual as finished one frame later
    let target = state.orbs[state.orbs.len() / 2].center;
    state.pointer_down(target);

    for _ in 0..100 {
        state.advance(100);
        let events = state.drain_events();
        render::forward_events(&events, &mut effects);
        for event in &events {
            if let GameEvent::OrbExploded { id, .. } = event {
                state.explosion_finished(*id);
            }
        }
        if state.game_over {
            break;
        }
    }

    log::info!(
        "after the first reaction: score {}, {} orbs left, {} draw directives",
        state.score,
        state.orbs.iter().filter(|o| o.active).count(),
        render::frame(&state).len()
    );

    // Second board, then let the countdown run out
    state.restart();
    while !state.game_over {
        state.advance(1000);
        render::forward_events(&state.drain_events(), &mut effects);
    }
}
