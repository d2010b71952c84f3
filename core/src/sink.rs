use crate::types::*;

pub const DAY_SKY: [u8; 4] = [102, 191, 255, 255];
pub const NIGHT_SKY: [u8; 4] = [10, 10, 30, 255];

/// Player body colours, indexed by `Player::color_index`.
pub const PLAYER_PALETTE: [[u8; 4]; 6] = [
    [130, 130, 130, 255],
    [255, 161, 0, 255],
    [135, 60, 190, 255],
    [255, 203, 0, 255],
    [0, 158, 47, 255],
    [0, 121, 241, 255],
];

pub fn sky_color(night: bool) -> [u8; 4] {
    if night {
        NIGHT_SKY
    } else {
        DAY_SKY
    }
}

pub fn player_color(index: u8) -> [u8; 4] {
    PLAYER_PALETTE[index as usize % PLAYER_PALETTE.len()]
}

/// Draw requests for one frame, in world coordinates.
pub trait RenderSink {
    fn clear(&mut self, sky: [u8; 4]);
    fn block(&mut self, block: &Block);
    /// `label` is the peer id shown above LAN players.
    fn player(&mut self, player: &Player, color: [u8; 4], label: Option<PeerId>);
    fn particle(&mut self, position: Vec2, weather: Weather);
    /// White outline of the block that a click would place.
    fn placement_outline(&mut self, rect: Rect);
    /// Selection preview panel, shown while the preview timer runs.
    fn preview(&mut self, color: BlockColor, shape: BlockShape);
}

pub trait AudioSink {
    fn death(&mut self);
    fn play_song(&mut self, path: &str);
    fn stop_song(&mut self, path: &str);
}

/// Audio backend that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn death(&mut self) {}
    fn play_song(&mut self, _path: &str) {}
    fn stop_song(&mut self, _path: &str) {}
}

/// Counts what a frame asked to draw. Used by the headless runner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub sky: [u8; 4],
    pub blocks: usize,
    pub players: usize,
    pub particles: usize,
    pub outline: Option<Rect>,
    pub preview: bool,
}

impl RenderSink for FrameStats {
    fn clear(&mut self, sky: [u8; 4]) {
        *self = Self {
            sky,
            ..Self::default()
        };
    }

    fn block(&mut self, _block: &Block) {
        self.blocks += 1;
    }

    fn player(&mut self, _player: &Player, _color: [u8; 4], _label: Option<PeerId>) {
        self.players += 1;
    }

    fn particle(&mut self, _position: Vec2, _weather: Weather) {
        self.particles += 1;
    }

    fn placement_outline(&mut self, rect: Rect) {
        self.outline = Some(rect);
    }

    fn preview(&mut self, _color: BlockColor, _shape: BlockShape) {
        self.preview = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_counts() {
        let mut stats = FrameStats::default();
        stats.particle(Vec2::ZERO, Weather::Rain);
        stats.clear(NIGHT_SKY);
        assert_eq!(stats.particles, 0);
        assert_eq!(stats.sky, NIGHT_SKY);
    }

    #[test]
    fn player_colour_wraps() {
        assert_eq!(player_color(6), player_color(0));
        assert_eq!(sky_color(false), DAY_SKY);
    }
}
