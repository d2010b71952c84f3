use crate::physics::*;
use crate::types::*;
use crate::world::World;

/// What happened to the player during a step, for the caller's side effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Crossed the void line and was sent back to spawn.
    pub died: bool,
}

/// Canonical per-player frame transition.
///
/// Sub-step order (the horizontal pass always runs before the vertical one):
///  0. Clamp dt
///  1. Steer: fly moves the body, free camera pans the camera, otherwise
///     walk/run/jump input then gravity
///  2. Integrate x (skipped while flying)
///  3. Resolve x against blocks (skipped with no-clip)
///  4. Integrate y (skipped while flying)
///  5. Resolve y against blocks (skipped with no-clip)
///  6. Void death (skipped while flying)
///
/// `id` selects the respawn point. The step draws no random numbers, so the
/// same inputs always produce the same state.
pub fn step_player(
    p: &mut Player,
    camera_target: &mut Vec2,
    world: &World,
    input: &FrameInput,
    dt: f32,
    modifiers: u8,
    id: PeerId,
) -> StepOutcome {
    // 0. Clamp dt
    let dt = clamp_dt(dt);
    let flying = modifiers & modifier::FLY != 0;
    let no_clip = modifiers & modifier::NO_CLIP != 0;

    // 1. Steer
    if flying {
        fly_move(p, input, dt);
        *camera_target = p.position;
    } else if modifiers & modifier::FREE_CAMERA != 0 {
        pan_camera(camera_target, p, input, dt);
    } else {
        let steered = apply_player_input(p, input, modifiers & modifier::INFINITE_JUMP != 0);
        *p = apply_gravity(&steered, dt);
    }

    // 2. Integrate x
    if !flying {
        p.position.x += p.velocity.x * dt;
    }

    // 3. Resolve x
    if !no_clip {
        resolve_horizontal(p, world);
    }

    // 4. Integrate y
    if !flying {
        p.position.y += p.velocity.y * dt;
    }

    // 5. Resolve y
    if no_clip {
        p.grounded = false;
    } else {
        resolve_vertical(p, world);
    }

    // 6. Void death
    let died = !flying && apply_void_death(p, world, id);

    StepOutcome { died }
}
