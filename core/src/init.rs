use crate::constants::*;
use crate::types::*;

/// The permanent ground platform occupying slot 0.
pub fn ground_block() -> Block {
    Block {
        rect: Rect::new(GROUND_X, GROUND_Y, GROUND_WIDTH, GROUND_HEIGHT),
        active: true,
        color: BlockColor::Gray,
        shape: BlockShape::Rect,
    }
}

/// Respawn point above the ground. LAN peers are spread out by id so they
/// do not spawn inside each other; the solo player uses id 0.
pub fn spawn_point(ground: &Block, id: PeerId) -> Vec2 {
    Vec2::new(
        ground.rect.x + SPAWN_OFFSET_X + id as f32 * SPAWN_SPACING_X,
        ground.rect.y + SPAWN_OFFSET_Y,
    )
}

/// A fresh player standing at its spawn point.
pub fn create_player(ground: &Block, id: PeerId) -> Player {
    Player {
        position: spawn_point(ground, id),
        velocity: Vec2::ZERO,
        grounded: false,
        facing_right: true,
        color_index: id.rem_euclid(PLAYER_COLOR_COUNT as i32) as u8,
        active: true,
    }
}

/// Send the player back to its spawn point, keeping colour and activity.
pub fn reset_player(p: &mut Player, ground: &Block, id: PeerId) {
    p.position = spawn_point(ground, id);
    p.velocity = Vec2::ZERO;
    p.facing_right = true;
}
