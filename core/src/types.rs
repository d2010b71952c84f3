use serde::{Deserialize, Serialize};

use crate::constants::*;

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, origin at the top-left corner, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Left/top edges are inside, right/bottom edges are not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

pub type PeerId = i32;

// ── Blocks ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockColor {
    Blue,
    Red,
    Green,
    Yellow,
    Pink,
    /// Ground only; not part of the selectable palette.
    Gray,
}

impl BlockColor {
    pub const PALETTE: [BlockColor; 5] = [
        BlockColor::Blue,
        BlockColor::Red,
        BlockColor::Green,
        BlockColor::Yellow,
        BlockColor::Pink,
    ];

    pub fn from_index(v: i32) -> Option<Self> {
        usize::try_from(v).ok().and_then(|i| Self::PALETTE.get(i).copied())
    }

    /// Palette position, `None` for the ground colour.
    pub fn index(self) -> Option<i32> {
        Self::PALETTE.iter().position(|c| *c == self).map(|i| i as i32)
    }

    pub fn rgba(self) -> [u8; 4] {
        match self {
            BlockColor::Blue => [0, 121, 241, 255],
            BlockColor::Red => [230, 41, 55, 255],
            BlockColor::Green => [0, 228, 48, 255],
            BlockColor::Yellow => [253, 249, 0, 255],
            BlockColor::Pink => [255, 109, 194, 255],
            BlockColor::Gray => [130, 130, 130, 255],
        }
    }

    pub fn from_rgba(rgba: [u8; 4]) -> Option<Self> {
        Self::PALETTE
            .iter()
            .chain(std::iter::once(&BlockColor::Gray))
            .copied()
            .find(|c| c.rgba() == rgba)
    }
}

pub const BASE_SHAPE_COUNT: i32 = 5;
pub const CUSTOM_SHAPE_COUNT: u8 = 12;
pub const SHAPE_COUNT: i32 = BASE_SHAPE_COUNT + CUSTOM_SHAPE_COUNT as i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockShape {
    Square,
    Rect,
    Triangle,
    Circle,
    Rhombus,
    /// Textured block, numbered 1..=12.
    Custom(u8),
}

impl BlockShape {
    pub fn from_index(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Square),
            1 => Some(Self::Rect),
            2 => Some(Self::Triangle),
            3 => Some(Self::Circle),
            4 => Some(Self::Rhombus),
            5..=16 => Some(Self::Custom((v - BASE_SHAPE_COUNT + 1) as u8)),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Self::Square => 0,
            Self::Rect => 1,
            Self::Triangle => 2,
            Self::Circle => 3,
            Self::Rhombus => 4,
            Self::Custom(n) => BASE_SHAPE_COUNT + n as i32 - 1,
        }
    }

    /// Footprint of a freshly placed block of this shape.
    pub fn size(self) -> (f32, f32) {
        match self {
            Self::Rect => (BLOCK_SIZE * 2.0, BLOCK_SIZE),
            _ => (BLOCK_SIZE, BLOCK_SIZE),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub active: bool,
    pub color: BlockColor,
    pub shape: BlockShape,
}

pub const EMPTY_BLOCK: Block = Block {
    rect: Rect::new(0.0, 0.0, 0.0, 0.0),
    active: false,
    color: BlockColor::Blue,
    shape: BlockShape::Square,
};

// ── Particles / environment ─────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub speed: f32,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    None,
    Rain,
    Snow,
}

impl Weather {
    pub fn from_index(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Rain),
            2 => Some(Self::Snow),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Rain,
            Self::Rain => Self::Snow,
            Self::Snow => Self::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub night: bool,
    pub weather: Weather,
}

// ── Player ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub facing_right: bool,
    /// Index into the six-colour player palette.
    pub color_index: u8,
    /// LAN only: whether this slot is rendered.
    pub active: bool,
}

impl Player {
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

// ── Input ───────────────────────────────────────────────────

/// Key and mouse button bitmask constants.
pub mod key {
    pub const LEFT: u32 = 1;
    pub const RIGHT: u32 = 1 << 1;
    /// Jump on the press edge; moves up when flying or panning.
    pub const UP: u32 = 1 << 2;
    /// Run modifier while walking; moves down when flying or panning.
    pub const DOWN: u32 = 1 << 3;
    pub const PLACE: u32 = 1 << 4;
    pub const REMOVE: u32 = 1 << 5;
    pub const CYCLE_COLOR: u32 = 1 << 6;
    pub const PAUSE: u32 = 1 << 7;
    pub const TOGGLE_NIGHT: u32 = 1 << 8;
    pub const CYCLE_WEATHER: u32 = 1 << 9;
    pub const CYCLE_CAMERA: u32 = 1 << 10;
    pub const NEXT_SONG: u32 = 1 << 11;
    pub const SAVE: u32 = 1 << 12;
    pub const LOAD: u32 = 1 << 13;
    pub const CYCLE_PLAYER_COLOR: u32 = 1 << 14;
    pub const RESET: u32 = 1 << 15;
    pub const CHEAT_PANEL: u32 = 1 << 16;
    pub const CHEAT_CLEAR: u32 = 1 << 17;
    pub const BACKSPACE: u32 = 1 << 18;
}

/// One frame of polled input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Keys currently down.
    pub held: u32,
    /// Keys that went down this frame.
    pub pressed: u32,
    /// Cursor in screen coordinates.
    pub cursor: Vec2,
    pub wheel: i32,
    /// Digits typed this frame (cheat panel).
    pub digits: Vec<u8>,
}

impl FrameInput {
    /// Build from two held masks, deriving press edges the way a key poller would.
    pub fn from_held(held: u32, prev_held: u32) -> Self {
        Self {
            held,
            pressed: held & !prev_held,
            ..Self::default()
        }
    }

    pub fn down(&self, k: u32) -> bool {
        self.held & k != 0
    }

    pub fn just_pressed(&self, k: u32) -> bool {
        self.pressed & k != 0
    }
}

/// Physics modifier bitmask constants.
pub mod modifier {
    pub const NO_CLIP: u8 = 1;
    pub const FLY: u8 = 2;
    pub const FREE_CAMERA: u8 = 4;
    pub const INFINITE_JUMP: u8 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(40.0, 0.0, 40.0, 40.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(39.0, 39.0, 40.0, 40.0)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(!r.contains(Vec2::new(40.0, 10.0)));
        assert!(!r.contains(Vec2::new(10.0, 40.0)));
    }

    #[test]
    fn shape_indices_cover_custom_range() {
        for i in 0..SHAPE_COUNT {
            let shape = BlockShape::from_index(i).unwrap();
            assert_eq!(shape.index(), i);
        }
        assert_eq!(BlockShape::from_index(5), Some(BlockShape::Custom(1)));
        assert_eq!(BlockShape::from_index(16), Some(BlockShape::Custom(12)));
        assert_eq!(BlockShape::from_index(17), None);
        assert_eq!(BlockShape::from_index(-1), None);
    }

    #[test]
    fn rect_shape_is_double_width() {
        assert_eq!(BlockShape::Rect.size(), (80.0, 40.0));
        assert_eq!(BlockShape::Circle.size(), (40.0, 40.0));
    }

    #[test]
    fn ground_color_is_not_in_palette() {
        assert_eq!(BlockColor::Gray.index(), None);
        assert_eq!(BlockColor::from_index(1), Some(BlockColor::Red));
        assert_eq!(BlockColor::from_index(5), None);
        assert_eq!(BlockColor::from_rgba(BlockColor::Gray.rgba()), Some(BlockColor::Gray));
    }

    #[test]
    fn weather_cycles_back_to_clear() {
        assert_eq!(Weather::None.next().next().next(), Weather::None);
    }

    #[test]
    fn press_edges_from_held_masks() {
        let input = FrameInput::from_held(key::UP | key::RIGHT, key::RIGHT);
        assert!(input.just_pressed(key::UP));
        assert!(!input.just_pressed(key::RIGHT));
        assert!(input.down(key::RIGHT));
    }

    #[test]
    fn environment_serializes() {
        let env = Environment { night: true, weather: Weather::Snow };
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"night":true,"weather":"Snow"}"#);
    }
}
