use crate::constants::*;
use crate::init::reset_player;
use crate::types::*;
use crate::world::World;

/// Cap a frame delta so a hitch cannot tunnel the player through a block.
pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_FRAME_DT)
}

/// Overwrite vx from the direction keys and start a jump on a fresh press.
/// Right wins over left; the run modifier only matters while moving.
pub fn apply_player_input(p: &Player, input: &FrameInput, infinite_jump: bool) -> Player {
    let speed = if input.down(key::DOWN) {
        PLAYER_RUN_SPEED
    } else {
        PLAYER_SPEED
    };

    let (vx, facing_right) = if input.down(key::RIGHT) {
        (speed, true)
    } else if input.down(key::LEFT) {
        (-speed, false)
    } else {
        (0.0, p.facing_right)
    };

    let mut vy = p.velocity.y;
    let mut grounded = p.grounded;
    if input.just_pressed(key::UP) && (p.grounded || infinite_jump) {
        vy = -JUMP_FORCE;
        grounded = false;
    }

    Player {
        velocity: Vec2::new(vx, vy),
        facing_right,
        grounded,
        ..*p
    }
}

/// Integrate gravity into vy, clamped to MAX_FALL_SPEED.
pub fn apply_gravity(p: &Player, dt: f32) -> Player {
    Player {
        velocity: Vec2::new(p.velocity.x, (p.velocity.y + GRAVITY * dt).min(MAX_FALL_SPEED)),
        ..*p
    }
}

/// Move along x, then push out of every overlapping block.
///
/// The hitbox is taken once before the scan and every hit overwrites the
/// position, so with several overlaps the highest slot decides.
pub fn resolve_horizontal(p: &mut Player, world: &World) {
    let hitbox = p.hitbox();
    for (_, b) in world.active_blocks() {
        if hitbox.intersects(&b.rect) {
            if p.velocity.x > 0.0 {
                p.position.x = b.rect.x - PLAYER_SIZE;
            } else if p.velocity.x < 0.0 {
                p.position.x = b.rect.x + b.rect.w;
            }
        }
    }
}

/// Land on or bump against every overlapping block. Clears `grounded` first.
///
/// The first hit zeroes vy, so later overlaps in the same pass leave the
/// position alone.
pub fn resolve_vertical(p: &mut Player, world: &World) {
    p.grounded = false;
    let hitbox = p.hitbox();
    for (_, b) in world.active_blocks() {
        if hitbox.intersects(&b.rect) {
            if p.velocity.y > 0.0 {
                p.position.y = b.rect.y - PLAYER_SIZE;
                p.velocity.y = 0.0;
                p.grounded = true;
            } else if p.velocity.y < 0.0 {
                p.position.y = b.rect.y + b.rect.h;
                p.velocity.y = 0.0;
            }
        }
    }
}

pub fn fell_into_void(p: &Player) -> bool {
    p.position.y > VOID_DEPTH
}

/// Teleport back to spawn if below the void line. Returns true on death.
pub fn apply_void_death(p: &mut Player, world: &World, id: PeerId) -> bool {
    if !fell_into_void(p) {
        return false;
    }
    reset_player(p, world.ground(), id);
    true
}

/// Arrow-key offset for `speed` units per second.
fn directional_offset(input: &FrameInput, speed: f32, dt: f32) -> Vec2 {
    let step = speed * dt;
    let mut d = Vec2::ZERO;
    if input.down(key::RIGHT) {
        d.x += step;
    }
    if input.down(key::LEFT) {
        d.x -= step;
    }
    if input.down(key::UP) {
        d.y -= step;
    }
    if input.down(key::DOWN) {
        d.y += step;
    }
    d
}

/// Fly: arrows move the body directly, velocity is held at zero.
pub fn fly_move(p: &mut Player, input: &FrameInput, dt: f32) {
    let d = directional_offset(input, PLAYER_SPEED * FLY_SPEED_FACTOR, dt);
    p.position.x += d.x;
    p.position.y += d.y;
    p.velocity = Vec2::ZERO;
}

/// Free camera: arrows pan the camera target, the body stays put.
pub fn pan_camera(target: &mut Vec2, p: &mut Player, input: &FrameInput, dt: f32) {
    let d = directional_offset(input, FREE_CAM_SPEED, dt);
    target.x += d.x;
    target.y += d.y;
    p.velocity = Vec2::ZERO;
}
