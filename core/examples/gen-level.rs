//! Writes a sample level file: a staircase and a small arch next to the ground.
//!
//! Usage:
//!   cargo run -p platform-core --example gen-level -- [path]

use std::path::PathBuf;

use platform_core::save::{save_to_path, GameData};
use platform_core::*;

fn main() {
    let path = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| SAVE_FILE.to_string()));

    let mut world = World::new();
    // Staircase climbing right from the ground's edge
    for step in 0..6 {
        let x = 600.0 + step as f32 * BLOCK_SIZE;
        let y = 260.0 - step as f32 * BLOCK_SIZE;
        let color = BlockColor::PALETTE[step % BlockColor::PALETTE.len()];
        world.place(Rect::new(x, y, BLOCK_SIZE, BLOCK_SIZE), color, BlockShape::Square);
    }
    // Arch over the spawn
    world.place(Rect::new(-120.0, 140.0, 80.0, 40.0), BlockColor::Pink, BlockShape::Rect);
    world.place(Rect::new(-40.0, 140.0, 80.0, 40.0), BlockColor::Pink, BlockShape::Rect);
    world.place(Rect::new(40.0, 180.0, 40.0, 40.0), BlockColor::Yellow, BlockShape::Triangle);

    let player = create_player(world.ground(), 0);
    let env = Environment {
        night: false,
        weather: Weather::Snow,
    };
    let data = GameData::capture(&player, &world, &env, BlockColor::Blue, BlockShape::Square);

    match save_to_path(&path, &data) {
        Ok(n) => println!("wrote {} ({} blocks)", path.display(), n),
        Err(e) => {
            eprintln!("failed to write {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
