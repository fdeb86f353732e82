//! Camera follow

use glam::Vec2;

use super::state::{GameState, Player};
use crate::consts::CAMERA_LIMIT_SCALE;

/// Viewport offset that keeps the player centered, limited to the world
pub fn camera_offset(player: &Player, viewport: Vec2) -> Vec2 {
    let target = (player.pos - viewport / 2.0 + player.size / 2.0).max(Vec2::ZERO);
    let limit = (viewport * CAMERA_LIMIT_SCALE).max(Vec2::ZERO);
    target.min(limit)
}

pub fn update_camera(state: &mut GameState) {
    state.camera.offset = camera_offset(&state.player, state.viewport);
}
