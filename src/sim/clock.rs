//! Frame-driven tick loop
//!
//! Hosts call [`SimulationClock::frame`] once per display frame with the
//! frame's timestamp. The clock derives `dt` from consecutive timestamps and
//! stops itself when the run ends.

use super::state::GameState;
use super::tick::{TickInput, tick};

#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    last_frame_ms: Option<f64>,
    stopped: bool,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick for a frame at `frame_ms`; returns false once stopped
    ///
    /// The first frame only records its timestamp, so it advances by zero.
    pub fn frame(&mut self, state: &mut GameState, input: &TickInput, frame_ms: f64) -> bool {
        if self.stopped {
            return false;
        }

        let dt = match self.last_frame_ms {
            Some(last) => ((frame_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(frame_ms);

        let input = TickInput {
            now_ms: frame_ms,
            ..input.clone()
        };
        tick(state, &input, dt);

        if state.is_game_over() {
            log::debug!("Simulation clock stopped: game over");
            self.stopped = true;
        }
        !self.stopped
    }

    /// Stop between ticks; later frames are ignored
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
