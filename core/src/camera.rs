use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// The camera stays where it was left.
    Fixed,
    /// Eases toward the player every frame.
    #[default]
    Smooth,
    /// Arrow keys pan the camera instead of moving the player.
    Free,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            Self::Fixed => Self::Smooth,
            Self::Smooth => Self::Free,
            Self::Free => Self::Fixed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Smooth => "smooth",
            Self::Free => "free",
        }
    }
}

/// 2D camera centred on `target`, zoom fixed at 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub target: Vec2,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Camera {
    pub fn new(target: Vec2, screen_width: f32, screen_height: f32) -> Self {
        Self {
            target,
            screen_width,
            screen_height,
        }
    }

    /// Exponential ease toward `pos`, `CAMERA_FOLLOW_RATE` per second.
    pub fn follow(&mut self, pos: Vec2, dt: f32) {
        self.target.x += (pos.x - self.target.x) * CAMERA_FOLLOW_RATE * dt;
        self.target.y += (pos.y - self.target.y) * CAMERA_FOLLOW_RATE * dt;
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x - self.screen_width / 2.0 + self.target.x,
            screen.y - self.screen_height / 2.0 + self.target.y,
        )
    }

    /// World-space rectangle currently on screen.
    pub fn view(&self) -> Rect {
        Rect::new(
            self.target.x - self.screen_width / 2.0,
            self.target.y - self.screen_height / 2.0,
            self.screen_width,
            self.screen_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_cycle() {
        assert_eq!(CameraMode::Fixed.next(), CameraMode::Smooth);
        assert_eq!(CameraMode::Free.next(), CameraMode::Fixed);
        assert_eq!(CameraMode::default(), CameraMode::Smooth);
    }

    #[test]
    fn follow_closes_a_fraction_of_the_gap() {
        let mut cam = Camera::new(Vec2::ZERO, 1280.0, 720.0);
        cam.follow(Vec2::new(100.0, -100.0), 0.1);
        assert_eq!(cam.target, Vec2::new(50.0, -50.0));
    }

    #[test]
    fn screen_centre_maps_to_target() {
        let cam = Camera::new(Vec2::new(10.0, 20.0), 1280.0, 720.0);
        assert_eq!(cam.screen_to_world(Vec2::new(640.0, 360.0)), Vec2::new(10.0, 20.0));
        assert_eq!(cam.screen_to_world(Vec2::ZERO), Vec2::new(-630.0, -340.0));
    }

    #[test]
    fn view_is_centred_on_target() {
        let cam = Camera::new(Vec2::new(0.0, 0.0), 1280.0, 720.0);
        assert_eq!(cam.view(), Rect::new(-640.0, -360.0, 1280.0, 720.0));
    }
}
