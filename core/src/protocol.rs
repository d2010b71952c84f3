//! LAN wire format.
//!
//! Every datagram is one 24-byte little-endian record:
//! `[kind u8][pad 3][player_id i32][x f32][y f32][data1 i32][data2 i32]`.
//! There is no version, checksum or sequence number.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::*;

pub const PACKET_SIZE: usize = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("datagram too short: {0} bytes")]
    TooShort(usize),
    #[error("unknown packet kind {0}")]
    UnknownKind(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PacketKind {
    Pos = 1,
    BlockAdd = 2,
    BlockRem = 3,
    EnvUpdate = 4,
    Hello = 5,
}

impl PacketKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Pos),
            2 => Some(Self::BlockAdd),
            3 => Some(Self::BlockRem),
            4 => Some(Self::EnvUpdate),
            5 => Some(Self::Hello),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetPacket {
    pub kind: PacketKind,
    pub player_id: PeerId,
    pub x: f32,
    pub y: f32,
    pub data1: i32,
    pub data2: i32,
}

impl NetPacket {
    fn new(kind: PacketKind, player_id: PeerId) -> Self {
        Self {
            kind,
            player_id,
            x: 0.0,
            y: 0.0,
            data1: 0,
            data2: 0,
        }
    }

    /// Heartbeat: position plus player colour index.
    pub fn pos(player_id: PeerId, position: Vec2, color_index: u8) -> Self {
        Self {
            x: position.x,
            y: position.y,
            data1: color_index as i32,
            ..Self::new(PacketKind::Pos, player_id)
        }
    }

    pub fn block_add(player_id: PeerId, origin: Vec2, color: BlockColor, shape: BlockShape) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            data1: color.index().unwrap_or(0),
            data2: shape.index(),
            ..Self::new(PacketKind::BlockAdd, player_id)
        }
    }

    pub fn block_remove(player_id: PeerId, point: Vec2) -> Self {
        Self {
            x: point.x,
            y: point.y,
            ..Self::new(PacketKind::BlockRem, player_id)
        }
    }

    pub fn env_update(player_id: PeerId, env: Environment) -> Self {
        Self {
            data1: env.weather.index(),
            data2: env.night as i32,
            ..Self::new(PacketKind::EnvUpdate, player_id)
        }
    }

    pub fn hello(player_id: PeerId) -> Self {
        Self::new(PacketKind::Hello, player_id)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];
        buf[0] = self.kind as u8;
        buf[4..8].copy_from_slice(&self.player_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.x.to_le_bytes());
        buf[12..16].copy_from_slice(&self.y.to_le_bytes());
        buf[16..20].copy_from_slice(&self.data1.to_le_bytes());
        buf[20..24].copy_from_slice(&self.data2.to_le_bytes());
        buf
    }

    /// Parse a datagram. Bytes past the first 24 are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < PACKET_SIZE {
            return Err(CodecError::TooShort(bytes.len()));
        }
        let kind = PacketKind::from_u8(bytes[0]).ok_or(CodecError::UnknownKind(bytes[0]))?;
        let word = |at: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&bytes[at..at + 4]);
            b
        };
        Ok(Self {
            kind,
            player_id: i32::from_le_bytes(word(4)),
            x: f32::from_le_bytes(word(8)),
            y: f32::from_le_bytes(word(12)),
            data1: i32::from_le_bytes(word(16)),
            data2: i32::from_le_bytes(word(20)),
        })
    }
}
