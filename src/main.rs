//! Headless demo driver
//!
//! Stands in for the real input/render collaborators: feeds scripted
//! movement intents at a synthetic 60 Hz frame cadence, auto-picks
//! draft options, and prints HUD snapshots as JSON lines. Useful for
//! balance runs and for eyeballing a seed.
//!
//! Usage: scrapstorm [seed] [seconds]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use scrapstorm::consts::SIM_DT;
use scrapstorm::hud::HudSnapshot;
use scrapstorm::sim::{self, FrameInput};
use scrapstorm::Engine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(sim::fresh_seed);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let mut engine = Engine::new(seed);

    let latest: Rc<RefCell<Option<HudSnapshot>>> = Rc::new(RefCell::new(None));
    let sink = latest.clone();
    engine.on_hud(move |hud| {
        *sink.borrow_mut() = Some(hud.clone());
    });
    engine.on_draft_change(|draft| {
        if draft.active {
            for (i, opt) in draft.options.iter().enumerate() {
                log::info!("draft option {i}: {} - {}", opt.title, opt.description);
            }
        }
    });

    engine.start();

    let frames = (seconds / SIM_DT) as u64;
    let mut draft_pending = false;
    for frame in 0..frames {
        let t = frame as f32 * SIM_DT;

        // Scripted pilot: wander in a slow circle, dash periodically
        let movement = Vec2::new((t * 0.35).cos(), (t * 0.23).sin());
        let input = FrameInput {
            movement,
            dash: frame % 240 == 120,
            draft_choice: draft_pending.then_some(0),
            ..Default::default()
        };

        engine.frame((frame + 1) as f64 * SIM_DT as f64, &input);
        draft_pending = engine.world().draft.is_active();

        if frame % 300 == 299 {
            if let Some(hud) = latest.borrow().as_ref() {
                match serde_json::to_string(hud) {
                    Ok(line) => println!("{line}"),
                    Err(err) => log::warn!("snapshot serialization failed: {err}"),
                }
            }
        }
        if engine.world().game_over {
            log::info!("game over at {t:.1}s");
            break;
        }
    }

    let world = engine.world();
    log::info!(
        "demo finished: seed {} level {} kills {} elapsed {:.1}s",
        world.seed,
        world.level,
        world.kills,
        world.elapsed
    );
}
