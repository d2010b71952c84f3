use sha2::{Digest, Sha256};

use crate::types::Environment;
use crate::world::World;

/// SHA-256 of the active block set and environment.
///
/// Slot indices are not hashed: two peers that applied the same edits in a
/// different order still agree as long as the same blocks ended up active.
pub fn hash_world(world: &World, env: &Environment) -> [u8; 32] {
    let mut blocks: Vec<[u8; 24]> = world
        .active_blocks()
        .map(|(_, b)| {
            let mut rec = [0u8; 24];
            rec[0..4].copy_from_slice(&b.rect.x.to_le_bytes());
            rec[4..8].copy_from_slice(&b.rect.y.to_le_bytes());
            rec[8..12].copy_from_slice(&b.rect.w.to_le_bytes());
            rec[12..16].copy_from_slice(&b.rect.h.to_le_bytes());
            let color = b.color.index().unwrap_or(-1);
            rec[16..20].copy_from_slice(&color.to_le_bytes());
            rec[20..24].copy_from_slice(&b.shape.index().to_le_bytes());
            rec
        })
        .collect();
    blocks.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update((blocks.len() as u32).to_le_bytes());
    for rec in &blocks {
        hasher.update(rec);
    }
    hasher.update([env.night as u8]);
    hasher.update(env.weather.index().to_le_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn square(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 40.0, 40.0)
    }

    #[test]
    fn world_hash_deterministic() {
        let world = World::new();
        let env = Environment::default();
        assert_eq!(hash_world(&world, &env), hash_world(&world, &env));
    }

    #[test]
    fn slot_order_does_not_matter() {
        let mut a = World::new();
        a.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        a.place(square(80.0, 0.0), BlockColor::Red, BlockShape::Square);

        let mut b = World::new();
        b.place(square(80.0, 0.0), BlockColor::Red, BlockShape::Square);
        b.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);

        let env = Environment::default();
        assert_eq!(hash_world(&a, &env), hash_world(&b, &env));
    }

    #[test]
    fn different_worlds_different_hash() {
        let a = World::new();
        let mut b = World::new();
        b.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        let env = Environment::default();
        assert_ne!(hash_world(&a, &env), hash_world(&b, &env));

        let night = Environment { night: true, ..env };
        assert_ne!(hash_world(&a, &env), hash_world(&a, &night));
    }

    #[test]
    fn removed_blocks_are_ignored() {
        let a = World::new();
        let mut b = World::new();
        b.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        b.remove_at(Vec2::new(1.0, 1.0));
        let env = Environment::default();
        assert_eq!(hash_world(&a, &env), hash_world(&b, &env));
    }
}
