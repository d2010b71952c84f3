use crate::camera::Camera;
use crate::config::GameConfig;
use crate::constants::*;
use crate::init::create_player;
use crate::net::{Datagram, Transport};
use crate::prng::RandomSource;
use crate::protocol::{NetPacket, PacketKind};
use crate::sink::{player_color, sky_color, RenderSink};
use crate::step::step_player;
use crate::types::*;
use crate::weather::ParticlePool;
use crate::world::{snap_to_grid, World};

pub fn is_valid_peer(id: PeerId) -> bool {
    (0..MAX_PLAYERS as PeerId).contains(&id)
}

/// Replicated LAN session state as seen by one peer.
///
/// Only the local player is simulated; remote players are whatever their
/// last POS packet said.
pub struct LanGame {
    pub local_id: PeerId,
    pub world: World,
    pub players: [Player; MAX_PLAYERS],
    pub env: Environment,
    pub particles: ParticlePool,
    pub camera: Camera,
    pub block_color: BlockColor,
    pub block_shape: BlockShape,
    pub preview_timer: f32,
    cursor_block: Rect,
}

impl LanGame {
    pub fn new(local_id: PeerId, config: &GameConfig) -> Self {
        let world = World::new();
        let players = fresh_players(&world, local_id);
        let (w, h) = config.screen_size();
        let target = players[local_slot(local_id)].position;
        Self {
            local_id,
            world,
            players,
            env: Environment::default(),
            particles: ParticlePool::new(),
            camera: Camera::new(target, w, h),
            block_color: BlockColor::Blue,
            block_shape: BlockShape::Square,
            preview_timer: 0.0,
            cursor_block: Rect::default(),
        }
    }

    pub fn is_host(&self) -> bool {
        self.local_id == HOST_ID
    }

    pub fn local_player(&self) -> &Player {
        &self.players[local_slot(self.local_id)]
    }

    /// Clear the world and respawn everyone. Not sent to other peers.
    pub fn reset(&mut self) {
        self.world.reset();
        self.players = fresh_players(&self.world, self.local_id);
    }

    /// What the host sends a peer that just said HELLO: the environment, then
    /// every non-ground block in slot order.
    pub fn handshake_packets(&self) -> Vec<NetPacket> {
        let mut out = vec![NetPacket::env_update(self.local_id, self.env)];
        out.extend(self.world.active_blocks().filter(|(i, _)| *i != 0).map(|(_, b)| {
            NetPacket::block_add(self.local_id, Vec2::new(b.rect.x, b.rect.y), b.color, b.shape)
        }));
        out
    }

    /// Apply one inbound packet. Packets claiming our own id or an id outside
    /// the four player slots change nothing.
    pub fn apply_packet(&mut self, packet: &NetPacket) {
        let id = packet.player_id;
        if !is_valid_peer(id) || id == self.local_id {
            log::debug!("ignoring {:?} from peer {}", packet.kind, id);
            return;
        }
        match packet.kind {
            PacketKind::Pos => {
                let p = &mut self.players[id as usize];
                p.position = packet.position();
                p.color_index = packet.data1.rem_euclid(PLAYER_COLOR_COUNT as i32) as u8;
                p.active = true;
            }
            PacketKind::BlockAdd => {
                let (Some(color), Some(shape)) = (
                    BlockColor::from_index(packet.data1),
                    BlockShape::from_index(packet.data2),
                ) else {
                    log::debug!(
                        "peer {} sent block with colour {} shape {}",
                        id,
                        packet.data1,
                        packet.data2
                    );
                    return;
                };
                let (w, h) = shape.size();
                self.world.place(Rect::new(packet.x, packet.y, w, h), color, shape);
            }
            PacketKind::BlockRem => {
                self.world.remove_overlapping(packet.x, packet.y);
            }
            PacketKind::EnvUpdate => {
                let Some(weather) = Weather::from_index(packet.data1) else {
                    log::debug!("peer {} sent weather {}", id, packet.data1);
                    return;
                };
                if weather != self.env.weather {
                    self.particles.clear();
                }
                self.env = Environment {
                    night: packet.data2 != 0,
                    weather,
                };
            }
            PacketKind::Hello => {}
        }
    }

    /// Simulate the local peer for one frame and return what it wants sent,
    /// block edits already repeated.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        dt: f32,
        rng: &mut impl RandomSource,
    ) -> Vec<NetPacket> {
        let dt = crate::physics::clamp_dt(dt);
        let me = local_slot(self.local_id);
        let mut out = Vec::new();

        // 1. Local-only keys
        if input.just_pressed(key::RESET) {
            self.reset();
        }
        if input.just_pressed(key::CYCLE_PLAYER_COLOR) {
            let p = &mut self.players[me];
            p.color_index = (p.color_index + 1) % PLAYER_COLOR_COUNT;
        }

        // 2. Host owns the environment
        if self.is_host() {
            let mut changed = false;
            if input.just_pressed(key::TOGGLE_NIGHT) {
                self.env.night = !self.env.night;
                changed = true;
            }
            if input.just_pressed(key::CYCLE_WEATHER) {
                self.env.weather = self.env.weather.next();
                self.particles.clear();
                changed = true;
            }
            if changed {
                out.push(NetPacket::env_update(self.local_id, self.env));
            }
        }

        // 3. Selection (base shapes only)
        if input.wheel != 0 {
            let index = (self.block_shape.index() + input.wheel).rem_euclid(BASE_SHAPE_COUNT);
            self.block_shape = BlockShape::from_index(index).unwrap_or(BlockShape::Square);
            self.preview_timer = PREVIEW_SECONDS;
        }
        if self.preview_timer > 0.0 {
            self.preview_timer -= dt;
        }
        if input.just_pressed(key::CYCLE_COLOR) {
            let next = (self.block_color.index().unwrap_or(0) + 1) % BlockColor::PALETTE.len() as i32;
            self.block_color = BlockColor::from_index(next).unwrap_or(BlockColor::Blue);
            self.preview_timer = PREVIEW_SECONDS;
        }

        // 4. Physics, then heartbeat
        step_player(
            &mut self.players[me],
            &mut self.camera.target,
            &self.world,
            input,
            dt,
            0,
            self.local_id,
        );
        let local = self.players[me];
        out.push(NetPacket::pos(self.local_id, local.position, local.color_index));

        // 5. Camera
        self.camera.follow(local.position, dt);

        // 6. Block edits
        let cursor = self.camera.screen_to_world(input.cursor);
        self.cursor_block = snap_to_grid(cursor, self.block_shape);
        if input.just_pressed(key::PLACE) {
            let hitboxes: Vec<Rect> = self
                .players
                .iter()
                .filter(|p| p.active)
                .map(Player::hitbox)
                .collect();
            if self
                .world
                .place_clear_of(self.cursor_block, self.block_color, self.block_shape, &hitboxes)
            {
                let origin = Vec2::new(self.cursor_block.x, self.cursor_block.y);
                let add = NetPacket::block_add(self.local_id, origin, self.block_color, self.block_shape);
                out.extend(std::iter::repeat(add).take(EDIT_REPEATS));
            }
        }
        if input.just_pressed(key::REMOVE) {
            if let Some(b) = self.world.remove_first_at(cursor) {
                let rem = NetPacket::block_remove(self.local_id, Vec2::new(b.rect.x, b.rect.y));
                out.extend(std::iter::repeat(rem).take(EDIT_REPEATS));
            }
        }

        // 7. Weather
        self.particles.update(
            self.env.weather,
            self.camera.target,
            self.camera.screen_width,
            self.camera.screen_height,
            dt,
            rng,
        );

        out
    }

    pub fn render(&self, sink: &mut impl RenderSink) {
        sink.clear(sky_color(self.env.night));
        for (_, b) in self.world.active_blocks() {
            sink.block(b);
        }
        for (id, p) in self.players.iter().enumerate() {
            if p.active {
                sink.player(p, player_color(p.color_index), Some(id as PeerId));
            }
        }
        if self.env.weather != Weather::None {
            for p in self.particles.active() {
                sink.particle(p.position, self.env.weather);
            }
        }
        sink.placement_outline(self.cursor_block);
        if self.preview_timer > 0.0 {
            sink.preview(self.block_color, self.block_shape);
        }
    }
}

fn local_slot(id: PeerId) -> usize {
    usize::try_from(id).unwrap_or(0).min(MAX_PLAYERS - 1)
}

fn fresh_players(world: &World, local_id: PeerId) -> [Player; MAX_PLAYERS] {
    std::array::from_fn(|i| {
        let mut p = create_player(world.ground(), i as PeerId);
        p.active = i as PeerId == local_id;
        p
    })
}

/// A `LanGame` wired to a transport.
///
/// Each frame drains the socket (the host also relays and answers HELLOs),
/// simulates, then sends.
pub struct LanPeer<D> {
    pub game: LanGame,
    pub transport: Transport<D>,
}

impl<D: Datagram> LanPeer<D> {
    pub fn new(game: LanGame, transport: Transport<D>) -> Self {
        Self { game, transport }
    }

    /// Announce ourselves to the host. No acknowledgement is awaited.
    pub fn join(&self) {
        let hello = NetPacket::hello(self.game.local_id);
        for _ in 0..HELLO_REPEATS {
            self.transport.send(&hello);
        }
    }

    /// Drain and apply every pending packet. Returns how many were taken.
    pub fn pump(&mut self) -> usize {
        let inbound = self.transport.receive_all();
        let count = inbound.len();
        for (packet, from) in inbound {
            let id = packet.player_id;
            if !is_valid_peer(id) {
                log::debug!("dropping {:?} with peer id {}", packet.kind, id);
                continue;
            }
            if self.transport.is_host() && id != self.game.local_id {
                self.transport.register(id, from);
                if packet.kind == PacketKind::Hello {
                    for reply in self.game.handshake_packets() {
                        self.transport.send_to_addr(from, &reply);
                    }
                } else {
                    self.transport.broadcast(&packet, Some(id));
                }
            }
            self.game.apply_packet(&packet);
        }
        count
    }

    pub fn frame(&mut self, input: &FrameInput, dt: f32, rng: &mut impl RandomSource) {
        self.pump();
        for packet in self.game.frame(input, dt, rng) {
            self.transport.send(&packet);
        }
    }
}
