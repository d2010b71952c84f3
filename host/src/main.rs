use std::net::SocketAddr;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use platform_core::*;

const FRAME_DT: f32 = 1.0 / 60.0;
const DIGEST_EVERY: u32 = 60;

struct Args {
    config: Option<PathBuf>,
    frames: u32,
    seed: u32,
    save: bool,
    command: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        frames: 600,
        seed: 42,
        save: false,
        command: Vec::new(),
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a path")?.into()),
            "--frames" => {
                args.frames = it.next().context("--frames needs a count")?.parse()?;
            }
            "--seed" => args.seed = it.next().context("--seed needs a value")?.parse()?,
            "--save" => args.save = true,
            _ if arg.starts_with("--") => bail!("unknown flag {arg}"),
            _ => args.command.push(arg),
        }
    }
    Ok(args)
}

fn usage() {
    eprintln!("usage: platform-host [--config FILE] [--frames N] [--seed S] [--save] <command>");
    eprintln!("  solo              single player session");
    eprintln!("  host              LAN host (peer 0)");
    eprintln!("  join <id> [ip]    LAN client, id 1..3");
    eprintln!("  demo [peers]      host plus joiners over an in-process network");
}

/// Audio backend for a headless run: every request goes to the log.
struct LogAudio;

impl AudioSink for LogAudio {
    fn death(&mut self) {
        log::debug!("sfx: death");
    }
    fn play_song(&mut self, path: &str) {
        log::debug!("music: play {path}");
    }
    fn stop_song(&mut self, path: &str) {
        log::debug!("music: stop {path}");
    }
}

/// Deterministic input script: walk back and forth, hop, and build/dig a
/// block just ahead of the player.
fn scripted_input(frame: u32, prev_held: u32, screen: (f32, f32), phase: u32) -> FrameInput {
    let t = frame + phase;
    let mut held = if t % 240 < 120 { key::RIGHT } else { key::LEFT };
    if t % 45 == 0 {
        held |= key::UP;
    }
    if t % 90 == 30 {
        held |= key::PLACE;
    }
    if t % 90 == 75 {
        held |= key::REMOVE;
    }
    let mut input = FrameInput::from_held(held, prev_held);
    input.cursor = Vec2::new(screen.0 / 2.0 + 80.0, screen.1 / 2.0 + 40.0);
    input
}

fn digest(world: &World, env: &Environment) -> String {
    hex::encode(hash_world(world, env))
}

fn run_solo(config: &GameConfig, args: &Args) -> Result<serde_json::Value> {
    let mut game = SoloGame::new(config);
    let mut rng = Mulberry32::new(args.seed);
    let mut audio = LogAudio;
    let mut stats = FrameStats::default();
    audio.play_song(&game.current_song());

    let mut prev = 0;
    for frame in 0..args.frames {
        let mut input = scripted_input(frame, prev, config.screen_size(), 0);
        if frame == 100 {
            input.pressed |= key::CYCLE_WEATHER;
        }
        if frame == 200 {
            input.pressed |= key::TOGGLE_NIGHT;
        }
        prev = input.held;
        game.frame(&input, FRAME_DT, &mut rng, &mut audio);
        game.render(&mut stats);
        if frame % DIGEST_EVERY == 0 {
            log::info!("frame {frame} world {}", digest(&game.world, &game.env));
        }
    }
    if args.save {
        game.save();
    }

    Ok(serde_json::json!({
        "mode": "solo",
        "frames": args.frames,
        "blocks": game.world.active_count(),
        "player": game.player,
        "environment": game.env,
        "particles_drawn": stats.particles,
        "world_hash": digest(&game.world, &game.env),
        "console_tail": game.console.last(),
    }))
}

fn run_peer<D: Datagram>(
    mut peer: LanPeer<D>,
    config: &GameConfig,
    args: &Args,
) -> serde_json::Value {
    let mut rng = Mulberry32::new(args.seed.wrapping_add(peer.game.local_id as u32));
    let mut stats = FrameStats::default();
    let phase = peer.game.local_id as u32 * 37;
    let mut prev = 0;
    for frame in 0..args.frames {
        let started = Instant::now();
        let input = scripted_input(frame, prev, config.screen_size(), phase);
        prev = input.held;
        peer.frame(&input, FRAME_DT, &mut rng);
        peer.game.render(&mut stats);
        if frame % DIGEST_EVERY == 0 {
            log::info!(
                "peer {} frame {frame} world {} players {}",
                peer.game.local_id,
                digest(&peer.game.world, &peer.game.env),
                stats.players
            );
        }
        let budget = Duration::from_secs_f32(FRAME_DT);
        if let Some(rest) = budget.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    peer_summary(&peer)
}

fn peer_summary<D: Datagram>(peer: &LanPeer<D>) -> serde_json::Value {
    serde_json::json!({
        "peer": peer.game.local_id,
        "blocks": peer.game.world.active_count(),
        "players_active": peer.game.players.iter().filter(|p| p.active).count(),
        "environment": peer.game.env,
        "world_hash": digest(&peer.game.world, &peer.game.env),
    })
}

/// In-process address of demo joiner `id`: the host port plus the id.
fn joiner_port(base: u16, id: usize) -> Result<u16> {
    u16::try_from(id)
        .ok()
        .and_then(|id| base.checked_add(id))
        .with_context(|| format!("port {base} leaves no room for joiner {id}"))
}

fn run_demo(config: &GameConfig, args: &Args, joiners: usize) -> Result<serde_json::Value> {
    if joiners == 0 || joiners >= MAX_PLAYERS {
        bail!("demo supports 1..={} joiners", MAX_PLAYERS - 1);
    }
    let hub = MemoryHub::new();
    let server = SocketAddr::from(([127, 0, 0, 1], config.port));
    let mut host = LanPeer::new(
        LanGame::new(HOST_ID, config),
        Transport::new(hub.bind(server), Role::Host),
    );
    let mut peers = Vec::with_capacity(joiners);
    for id in 1..=joiners {
        let addr = SocketAddr::from(([127, 0, 0, 1], joiner_port(config.port, id)?));
        peers.push(LanPeer::new(
            LanGame::new(id as PeerId, config),
            Transport::new(hub.bind(addr), Role::Client { server }),
        ));
    }
    for p in &peers {
        p.join();
    }

    let mut rng = Mulberry32::new(args.seed);
    let mut prev = vec![0u32; joiners + 1];
    for frame in 0..args.frames {
        let input = scripted_input(frame, prev[0], config.screen_size(), 0);
        prev[0] = input.held;
        host.frame(&input, FRAME_DT, &mut rng);
        for (i, p) in peers.iter_mut().enumerate() {
            let input = scripted_input(frame, prev[i + 1], config.screen_size(), (i as u32 + 1) * 37);
            prev[i + 1] = input.held;
            p.frame(&input, FRAME_DT, &mut rng);
        }
    }
    // Let the last edits land everywhere.
    for _ in 0..2 {
        host.pump();
        for p in peers.iter_mut() {
            p.pump();
        }
    }

    let host_hash = hash_world(&host.game.world, &host.game.env);
    let consistent = peers
        .iter()
        .all(|p| hash_world(&p.game.world, &p.game.env) == host_hash);
    if !consistent {
        log::warn!("peers ended with different worlds");
    }
    let mut summaries = vec![peer_summary(&host)];
    summaries.extend(peers.iter().map(peer_summary));
    Ok(serde_json::json!({
        "mode": "demo",
        "frames": args.frames,
        "consistent": consistent,
        "peers": summaries,
    }))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let command: Vec<&str> = args.command.iter().map(String::as_str).collect();
    let summary = match command.as_slice() {
        ["solo"] => run_solo(&config, &args)?,
        ["host"] => {
            let transport = Transport::bind_host(config.port)
                .with_context(|| format!("binding udp port {}", config.port))?;
            run_peer(LanPeer::new(LanGame::new(HOST_ID, &config), transport), &config, &args)
        }
        ["join", id, rest @ ..] => {
            let id: PeerId = id.parse().context("peer id must be a number")?;
            if !(1..MAX_PLAYERS as PeerId).contains(&id) {
                bail!("peer id must be 1..{}", MAX_PLAYERS - 1);
            }
            let ip = rest.first().copied().unwrap_or(config.server_ip.as_str());
            let transport = Transport::connect_client(ip, config.port)
                .with_context(|| format!("connecting to {ip}:{}", config.port))?;
            let peer = LanPeer::new(LanGame::new(id, &config), transport);
            peer.join();
            run_peer(peer, &config, &args)
        }
        ["demo"] => run_demo(&config, &args, 1)?,
        ["demo", n] => run_demo(&config, &args, n.parse().context("peer count")?)?,
        _ => {
            usage();
            std::process::exit(2);
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
