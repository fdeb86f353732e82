//! Horde Arena headless runner
//!
//! Plays one run on autopilot at 60 frames per second of simulated wall time
//! and prints the final stats as JSON.
//!
//! Usage: `horde-arena [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use horde_arena::sim::autopilot::{autopilot_input, autopilot_upgrade};
#[cfg(not(target_arch = "wasm32"))]
use horde_arena::sim::{GameState, SimulationClock, select_upgrade};
#[cfg(not(target_arch = "wasm32"))]
use horde_arena::{Settings, SimError};

/// Frame length at 60 Hz (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten minutes of game time
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Horde Arena (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host drives the simulation through the library; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), SimError> {
    let mut args = std::env::args().skip(1);

    let mut settings = match args.next() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    if let Some(seed) = args.next() {
        settings.seed = seed.parse().map_err(|_| SimError::InvalidSetting {
            field: "seed",
            reason: "must be an unsigned integer",
        })?;
    }

    let mut state = GameState::from_settings(&settings);
    let mut clock = SimulationClock::new();

    for frame in 0..MAX_FRAMES {
        let now = frame as f64 * FRAME_MS;

        if state.show_upgrade_menu() {
            if let Some(option) = autopilot_upgrade(&state) {
                log::info!("Level {}: taking {}", state.player.level, option.name);
                select_upgrade(&mut state, &option)?;
            }
        }

        let input = autopilot_input(&state, now);
        if !clock.frame(&mut state, &input, now) {
            break;
        }
    }

    log::info!(
        "Run finished after {:.1}s at level {}",
        state.stats.time_alive_secs,
        state.player.level
    );
    println!("{}", serde_json::to_string_pretty(&state.stats)?);
    Ok(())
}
