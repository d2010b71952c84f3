use std::path::PathBuf;

use crate::camera::{Camera, CameraMode};
use crate::config::GameConfig;
use crate::console::{CheatCodes, Console};
use crate::constants::*;
use crate::init::{create_player, reset_player};
use crate::prng::RandomSource;
use crate::save::{self, GameData};
use crate::sink::{player_color, sky_color, AudioSink, RenderSink};
use crate::step::step_player;
use crate::types::*;
use crate::weather::ParticlePool;
use crate::world::{snap_to_grid, World};

pub fn song_path(index: usize) -> String {
    format!("sounds/song{}.mp3", index % SONG_COUNT + 1)
}

/// Single-player session: one player, a world to build in, weather,
/// save/load and cheats.
pub struct SoloGame {
    pub world: World,
    pub player: Player,
    pub env: Environment,
    pub particles: ParticlePool,
    pub camera: Camera,
    pub camera_mode: CameraMode,
    pub console: Console,
    pub cheats: CheatCodes,
    pub cheat_panel: bool,
    pub paused: bool,
    pub block_color: BlockColor,
    pub block_shape: BlockShape,
    pub preview_timer: f32,
    pub song: usize,
    save_path: PathBuf,
    /// Grid cell under the cursor, refreshed every unpaused frame.
    cursor_block: Rect,
}

impl SoloGame {
    pub fn new(config: &GameConfig) -> Self {
        let world = World::new();
        let player = create_player(world.ground(), 0);
        let (w, h) = config.screen_size();
        Self {
            camera: Camera::new(player.position, w, h),
            world,
            player,
            env: Environment::default(),
            particles: ParticlePool::new(),
            camera_mode: CameraMode::default(),
            console: Console::new(),
            cheats: CheatCodes::new(),
            cheat_panel: false,
            paused: false,
            block_color: BlockColor::Blue,
            block_shape: BlockShape::Square,
            preview_timer: 0.0,
            song: 0,
            save_path: config.save_path.clone(),
            cursor_block: Rect::default(),
        }
    }

    pub fn current_song(&self) -> String {
        song_path(self.song)
    }

    pub fn modifiers(&self) -> u8 {
        let mut m = self.cheats.modifiers();
        if self.camera_mode == CameraMode::Free {
            m |= modifier::FREE_CAMERA;
        }
        m
    }

    /// Advance one frame.
    ///
    /// Order: pause, key toggles, cheat panel, selection, physics, camera,
    /// cursor edits, weather. While paused only the pause key is read.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        dt: f32,
        rng: &mut impl RandomSource,
        audio: &mut impl AudioSink,
    ) {
        let dt = crate::physics::clamp_dt(dt);

        if input.just_pressed(key::PAUSE) {
            self.paused = !self.paused;
            self.console.push(if self.paused { "Game paused" } else { "Game resumed" });
        }
        if self.paused {
            return;
        }

        self.handle_toggles(input, audio);
        self.handle_cheat_panel(input);
        self.handle_selection(input, dt);

        let modifiers = self.modifiers();
        let outcome = step_player(
            &mut self.player,
            &mut self.camera.target,
            &self.world,
            input,
            dt,
            modifiers,
            0,
        );
        if outcome.died {
            audio.death();
            self.console.push("Player died in void");
        }

        if self.camera_mode == CameraMode::Smooth && modifiers & modifier::FLY == 0 {
            self.camera.follow(self.player.position, dt);
        }

        let cursor = self.camera.screen_to_world(input.cursor);
        self.cursor_block = snap_to_grid(cursor, self.block_shape);
        if !self.cheat_panel {
            if input.down(key::PLACE) {
                self.world.place_clear_of(
                    self.cursor_block,
                    self.block_color,
                    self.block_shape,
                    &[self.player.hitbox()],
                );
            }
            if input.down(key::REMOVE) {
                self.world.remove_at(cursor);
            }
        }

        self.particles.update(
            self.env.weather,
            self.camera.target,
            self.camera.screen_width,
            self.camera.screen_height,
            dt,
            rng,
        );
    }

    fn handle_toggles(&mut self, input: &FrameInput, audio: &mut impl AudioSink) {
        if input.just_pressed(key::NEXT_SONG) {
            audio.stop_song(&self.current_song());
            self.song = (self.song + 1) % SONG_COUNT;
            let song = self.current_song();
            audio.play_song(&song);
            self.console.push(format!("Music changed to: {song}"));
        }
        if input.just_pressed(key::SAVE) {
            self.save();
        }
        if input.just_pressed(key::LOAD) {
            self.load();
        }
        if input.just_pressed(key::TOGGLE_NIGHT) {
            self.env.night = !self.env.night;
            self.console.push(if self.env.night { "Time: night" } else { "Time: day" });
        }
        if input.just_pressed(key::CYCLE_WEATHER) {
            self.env.weather = self.env.weather.next();
            self.particles.clear();
            self.console.push(format!("Weather set to: {}", self.env.weather.name()));
        }
        if input.just_pressed(key::CYCLE_CAMERA) {
            self.camera_mode = self.camera_mode.next();
            self.console.push(format!("Camera set to: {}", self.camera_mode.name()));
        }
        if input.just_pressed(key::CHEAT_PANEL) {
            if input.down(key::CHEAT_CLEAR) {
                self.cheats.clear();
                self.console.push("Cheats: all cleared");
            } else {
                self.cheat_panel = !self.cheat_panel;
            }
        }
        if input.just_pressed(key::CYCLE_PLAYER_COLOR) {
            self.player.color_index = (self.player.color_index + 1) % PLAYER_COLOR_COUNT;
        }
        if input.just_pressed(key::RESET) {
            audio.death();
            self.world.reset();
            reset_player(&mut self.player, self.world.ground(), 0);
            self.console.push("Game map reset");
        }
    }

    fn handle_cheat_panel(&mut self, input: &FrameInput) {
        if !self.cheat_panel {
            return;
        }
        for d in &input.digits {
            self.cheats.type_digit(*d);
        }
        if input.just_pressed(key::BACKSPACE) {
            self.cheats.backspace();
        }
    }

    fn handle_selection(&mut self, input: &FrameInput, dt: f32) {
        if !self.cheat_panel {
            if input.wheel != 0 {
                let mut index = self.block_shape.index() + input.wheel;
                if index < 0 {
                    index = SHAPE_COUNT - 1;
                }
                if index >= SHAPE_COUNT {
                    index = 0;
                }
                self.block_shape = BlockShape::from_index(index).unwrap_or(BlockShape::Square);
                self.preview_timer = PREVIEW_SECONDS;
            }
            if input.just_pressed(key::CYCLE_COLOR) {
                let next = (self.block_color.index().unwrap_or(0) + 1) % BlockColor::PALETTE.len() as i32;
                self.block_color = BlockColor::from_index(next).unwrap_or(BlockColor::Blue);
                self.preview_timer = PREVIEW_SECONDS;
            }
        }
        if self.preview_timer > 0.0 {
            self.preview_timer -= dt;
        }
    }

    pub fn snapshot(&self) -> GameData {
        GameData::capture(
            &self.player,
            &self.world,
            &self.env,
            self.block_color,
            self.block_shape,
        )
    }

    /// Write `level.dat`. Failures are reported on the console only.
    pub fn save(&mut self) {
        match save::save_to_path(&self.save_path, &self.snapshot()) {
            Ok(n) => self.console.push(format!("Game saved successfully: {n} blocks")),
            Err(e) => self.console.push(format!("Error saving game data: {e}")),
        }
    }

    /// Read `level.dat`. On any failure the session is left untouched.
    pub fn load(&mut self) {
        match save::load_from_path(&self.save_path) {
            Ok(data) => {
                self.apply(&data);
                self.console.push(format!("Game loaded successfully: {} blocks", data.blocks.len()));
            }
            Err(e) => self.console.push(format!("Load failed: {e}")),
        }
    }

    pub fn apply(&mut self, data: &GameData) {
        self.world.restore(&data.blocks);
        self.player.position = data.player_position;
        self.player.velocity = Vec2::ZERO;
        self.player.grounded = false;
        self.player.color_index = data.player_color;
        self.env = data.environment();
        self.block_color = data.block_color;
        self.block_shape = data.block_shape;
        self.particles.clear();
    }

    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.clear(sky_color(self.env.night));
        let view = self.camera.view();
        for (_, b) in self.world.active_blocks() {
            if view.intersects(&b.rect) {
                sink.block(b);
            }
        }
        sink.player(&self.player, player_color(self.player.color_index), None);
        if self.env.weather != Weather::None {
            for p in self.particles.active() {
                sink.particle(p.position, self.env.weather);
            }
        }
        if !self.paused {
            sink.placement_outline(self.cursor_block);
        }
        if self.preview_timer > 0.0 {
            sink.preview(self.block_color, self.block_shape);
        }
    }
}
