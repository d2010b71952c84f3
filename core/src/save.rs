//! `level.dat` codec.
//!
//! The record is a fixed 56 032-byte little-endian image:
//!
//! | offset | size | field |
//! |-------:|-----:|-------|
//! | 0      | 8    | player position (f32 x, f32 y) |
//! | 8      | 1    | night flag, then 3 bytes padding |
//! | 12     | 4    | weather (i32) |
//! | 16     | 4    | player colour index (i32) |
//! | 20     | 4    | selected block colour (i32) |
//! | 24     | 4    | selected block shape (i32) |
//! | 28     | 4    | active block count (i32) |
//! | 32     | 28 × 2000 | block records |
//!
//! Each block record is `rect (4 × f32)`, `active (i32)`, `colour (RGBA)`,
//! `shape (i32)`. Only the first `count` records are meaningful; the rest
//! are zero.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::types::*;
use crate::world::World;

pub const HEADER_SIZE: usize = 32;
pub const BLOCK_RECORD_SIZE: usize = 28;
pub const SAVE_SIZE: usize = HEADER_SIZE + BLOCK_RECORD_SIZE * MAX_BLOCKS;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file not found: {0}")]
    NotFound(String),
    #[error("file size mismatch: expected at least {expected} bytes, found {found}")]
    TooShort { expected: usize, found: usize },
    #[error("corrupted save data: {0}")]
    Corrupt(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Everything a save captures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub player_position: Vec2,
    pub night: bool,
    pub weather: Weather,
    pub player_color: u8,
    pub block_color: BlockColor,
    pub block_shape: BlockShape,
    /// Active blocks in slot order, ground first.
    pub blocks: Vec<Block>,
}

impl GameData {
    pub fn capture(
        player: &Player,
        world: &World,
        env: &Environment,
        block_color: BlockColor,
        block_shape: BlockShape,
    ) -> Self {
        Self {
            player_position: player.position,
            night: env.night,
            weather: env.weather,
            player_color: player.color_index,
            block_color,
            block_shape,
            blocks: world.active_blocks().map(|(_, b)| *b).collect(),
        }
    }

    pub fn environment(&self) -> Environment {
        Environment {
            night: self.night,
            weather: self.weather,
        }
    }
}

fn put_i32(buf: &mut [u8], offset: usize, v: i32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_f32(buf: &mut [u8], offset: usize, v: f32) {
    buf[offset..offset + 4].copy_from_slice(&v.to_le_bytes());
}

fn get_i32(buf: &[u8], offset: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    i32::from_le_bytes(b)
}

fn get_f32(buf: &[u8], offset: usize) -> f32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[offset..offset + 4]);
    f32::from_le_bytes(b)
}

/// Serialize into a zero-filled record. Blocks past capacity are dropped.
pub fn encode(data: &GameData) -> Vec<u8> {
    let mut buf = vec![0u8; SAVE_SIZE];
    put_f32(&mut buf, 0, data.player_position.x);
    put_f32(&mut buf, 4, data.player_position.y);
    buf[8] = data.night as u8;
    put_i32(&mut buf, 12, data.weather.index());
    put_i32(&mut buf, 16, data.player_color as i32);
    put_i32(&mut buf, 20, data.block_color.index().unwrap_or(0));
    put_i32(&mut buf, 24, data.block_shape.index());

    let count = data.blocks.len().min(MAX_BLOCKS);
    put_i32(&mut buf, 28, count as i32);
    for (i, b) in data.blocks.iter().take(count).enumerate() {
        let off = HEADER_SIZE + i * BLOCK_RECORD_SIZE;
        put_f32(&mut buf, off, b.rect.x);
        put_f32(&mut buf, off + 4, b.rect.y);
        put_f32(&mut buf, off + 8, b.rect.w);
        put_f32(&mut buf, off + 12, b.rect.h);
        put_i32(&mut buf, off + 16, 1);
        buf[off + 20..off + 24].copy_from_slice(&b.color.rgba());
        put_i32(&mut buf, off + 24, b.shape.index());
    }
    buf
}

/// Parse a record. Trailing bytes past the fixed size are ignored.
pub fn decode(bytes: &[u8]) -> Result<GameData, SaveError> {
    if bytes.len() < SAVE_SIZE {
        return Err(SaveError::TooShort {
            expected: SAVE_SIZE,
            found: bytes.len(),
        });
    }

    let weather_raw = get_i32(bytes, 12);
    let weather = Weather::from_index(weather_raw)
        .ok_or_else(|| SaveError::Corrupt(format!("weather {weather_raw}")))?;
    let player_raw = get_i32(bytes, 16);
    let player_color = u8::try_from(player_raw)
        .ok()
        .filter(|c| *c < PLAYER_COLOR_COUNT)
        .ok_or_else(|| SaveError::Corrupt(format!("player colour {player_raw}")))?;
    let color_raw = get_i32(bytes, 20);
    let block_color = BlockColor::from_index(color_raw)
        .ok_or_else(|| SaveError::Corrupt(format!("block colour {color_raw}")))?;
    let shape_raw = get_i32(bytes, 24);
    let block_shape = BlockShape::from_index(shape_raw)
        .ok_or_else(|| SaveError::Corrupt(format!("block shape {shape_raw}")))?;

    let count_raw = get_i32(bytes, 28);
    let count = usize::try_from(count_raw)
        .ok()
        .filter(|c| *c <= MAX_BLOCKS)
        .ok_or_else(|| SaveError::Corrupt(format!("block count {count_raw}")))?;

    let player_position = Vec2::new(get_f32(bytes, 0), get_f32(bytes, 4));
    if !(player_position.x.is_finite() && player_position.y.is_finite()) {
        return Err(SaveError::Corrupt(format!("player position {player_position:?}")));
    }

    let mut blocks = Vec::with_capacity(count);
    for i in 0..count {
        let off = HEADER_SIZE + i * BLOCK_RECORD_SIZE;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&bytes[off + 20..off + 24]);
        let color = BlockColor::from_rgba(rgba)
            .ok_or_else(|| SaveError::Corrupt(format!("block {i} colour {rgba:?}")))?;
        let shape_raw = get_i32(bytes, off + 24);
        let shape = BlockShape::from_index(shape_raw)
            .ok_or_else(|| SaveError::Corrupt(format!("block {i} shape {shape_raw}")))?;
        blocks.push(Block {
            rect: Rect::new(
                get_f32(bytes, off),
                get_f32(bytes, off + 4),
                get_f32(bytes, off + 8),
                get_f32(bytes, off + 12),
            ),
            active: true,
            color,
            shape,
        });
    }

    Ok(GameData {
        player_position,
        night: bytes[8] != 0,
        weather,
        player_color,
        block_color,
        block_shape,
        blocks,
    })
}

/// Write the record to `path`. Returns the number of blocks saved.
pub fn save_to_path(path: &Path, data: &GameData) -> Result<usize, SaveError> {
    fs::write(path, encode(data))?;
    Ok(data.blocks.len().min(MAX_BLOCKS))
}

pub fn load_from_path(path: &Path) -> Result<GameData, SaveError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SaveError::NotFound(path.display().to_string()),
        _ => SaveError::Io(e),
    })?;
    decode(&bytes)
}
