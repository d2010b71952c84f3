pub mod camera;
pub mod config;
pub mod console;
pub mod constants;
pub mod hash;
pub mod init;
pub mod lan;
pub mod net;
pub mod physics;
pub mod prng;
pub mod protocol;
pub mod save;
pub mod sink;
pub mod solo;
pub mod step;
pub mod types;
pub mod weather;
pub mod world;

pub use camera::{Camera, CameraMode};
pub use config::{ConfigError, GameConfig};
pub use console::{CheatCodes, Console};
pub use constants::*;
pub use hash::*;
pub use init::*;
pub use lan::{LanGame, LanPeer};
pub use net::{Datagram, MemoryEndpoint, MemoryHub, Role, Transport};
pub use physics::{apply_gravity, apply_player_input, clamp_dt};
pub use prng::*;
pub use protocol::{CodecError, NetPacket, PacketKind, PACKET_SIZE};
pub use save::{GameData, SaveError, SAVE_SIZE};
pub use sink::{AudioSink, FrameStats, NullAudio, RenderSink};
pub use solo::SoloGame;
pub use step::{step_player, StepOutcome};
pub use types::*;
pub use weather::ParticlePool;
pub use world::{snap_to_grid, World};
