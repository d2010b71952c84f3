use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::init::ground_block;
use crate::types::*;

/// Fixed-capacity block arena.
///
/// Slot 0 holds the ground. Placement reuses the first inactive slot at
/// index 1 or above, removal only clears the `active` flag, so slot order is
/// stable and matches the order in which a host dumps its world to joiners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct World {
    blocks: Vec<Block>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let mut blocks = vec![EMPTY_BLOCK; MAX_BLOCKS];
        blocks[0] = ground_block();
        Self { blocks }
    }

    pub fn ground(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Active blocks in ascending slot order.
    pub fn active_blocks(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.active).count()
    }

    pub fn overlaps_any(&self, rect: &Rect) -> bool {
        self.blocks.iter().any(|b| b.active && b.rect.intersects(rect))
    }

    /// Place a block unless it would overlap an active one.
    ///
    /// Returns false both on overlap and when every slot is taken; a full
    /// arena drops the block without further report.
    pub fn place(&mut self, rect: Rect, color: BlockColor, shape: BlockShape) -> bool {
        if self.overlaps_any(&rect) {
            return false;
        }
        match self.blocks.iter().skip(1).position(|b| !b.active) {
            Some(offset) => {
                self.blocks[offset + 1] = Block {
                    rect,
                    active: true,
                    color,
                    shape,
                };
                true
            }
            None => false,
        }
    }

    /// `place`, additionally refusing to bury any of the given hitboxes.
    pub fn place_clear_of(
        &mut self,
        rect: Rect,
        color: BlockColor,
        shape: BlockShape,
        hitboxes: &[Rect],
    ) -> bool {
        if hitboxes.iter().any(|h| h.intersects(&rect)) {
            return false;
        }
        self.place(rect, color, shape)
    }

    /// Deactivate every non-ground block containing `p`. Returns how many went.
    pub fn remove_at(&mut self, p: Vec2) -> usize {
        let mut removed = 0;
        for b in self.blocks.iter_mut().skip(1) {
            if b.active && b.rect.contains(p) {
                b.active = false;
                removed += 1;
            }
        }
        removed
    }

    /// Deactivate the lowest-slot non-ground block containing `p`.
    pub fn remove_first_at(&mut self, p: Vec2) -> Option<Block> {
        let b = self
            .blocks
            .iter_mut()
            .skip(1)
            .find(|b| b.active && b.rect.contains(p))?;
        b.active = false;
        Some(*b)
    }

    /// Deactivate every non-ground block overlapping a 1×1 probe at `(x, y)`.
    pub fn remove_overlapping(&mut self, x: f32, y: f32) -> usize {
        let probe = Rect::new(x, y, 1.0, 1.0);
        let mut removed = 0;
        for b in self.blocks.iter_mut().skip(1) {
            if b.active && b.rect.intersects(&probe) {
                b.active = false;
                removed += 1;
            }
        }
        removed
    }

    /// Clear every block except the ground.
    pub fn reset(&mut self) {
        for b in self.blocks.iter_mut().skip(1) {
            b.active = false;
        }
    }

    /// Replace the arena contents with `saved`, written from slot 0 upward.
    ///
    /// Slot 0 receives the first saved block; a save taken from a live world
    /// always lists the ground first, so the ground returns to its slot.
    pub fn restore(&mut self, saved: &[Block]) {
        for b in self.blocks.iter_mut() {
            b.active = false;
        }
        for (slot, b) in self.blocks.iter_mut().zip(saved) {
            *slot = Block { active: true, ..*b };
        }
    }
}

/// Candidate block under a world-space cursor, snapped down to the grid.
pub fn snap_to_grid(p: Vec2, shape: BlockShape) -> Rect {
    let gx = (p.x / BLOCK_SIZE).floor() * BLOCK_SIZE;
    let gy = (p.y / BLOCK_SIZE).floor() * BLOCK_SIZE;
    let (w, h) = shape.size();
    Rect::new(gx, gy, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32) -> Rect {
        Rect::new(x, y, BLOCK_SIZE, BLOCK_SIZE)
    }

    #[test]
    fn new_world_has_only_ground() {
        let world = World::new();
        assert_eq!(world.active_count(), 1);
        assert_eq!(world.ground().rect, Rect::new(-200.0, 300.0, 800.0, 40.0));
        assert_eq!(world.ground().color, BlockColor::Gray);
    }

    #[test]
    fn place_takes_first_free_slot() {
        let mut world = World::new();
        assert!(world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square));
        assert!(world.place(square(80.0, 0.0), BlockColor::Red, BlockShape::Square));
        world.remove_at(Vec2::new(10.0, 10.0));
        assert!(world.place(square(160.0, 0.0), BlockColor::Green, BlockShape::Square));
        assert_eq!(world.block(1).unwrap().rect, square(160.0, 0.0));
        assert_eq!(world.block(2).unwrap().rect, square(80.0, 0.0));
    }

    #[test]
    fn overlapping_placement_is_rejected() {
        let mut world = World::new();
        assert!(world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square));
        assert!(!world.place(square(20.0, 20.0), BlockColor::Red, BlockShape::Square));
        assert!(!world.place(square(0.0, 280.0), BlockColor::Red, BlockShape::Square));
        assert!(world.place(square(40.0, 0.0), BlockColor::Red, BlockShape::Square));
        assert_eq!(world.active_count(), 3);
    }

    #[test]
    fn placements_never_overlap() {
        let mut world = World::new();
        for i in 0..60 {
            let x = ((i * 37) % 400) as f32 - 200.0;
            let y = ((i * 53) % 300) as f32 - 100.0;
            let shape = if i % 3 == 0 { BlockShape::Rect } else { BlockShape::Square };
            let (w, h) = shape.size();
            world.place(Rect::new(x, y, w, h), BlockColor::Blue, shape);
        }
        let active: Vec<_> = world.active_blocks().map(|(_, b)| b.rect).collect();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn hitbox_blocks_placement() {
        let mut world = World::new();
        let player = Rect::new(10.0, 10.0, PLAYER_SIZE, PLAYER_SIZE);
        assert!(!world.place_clear_of(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square, &[player]));
        assert!(world.place_clear_of(square(80.0, 0.0), BlockColor::Blue, BlockShape::Square, &[player]));
    }

    #[test]
    fn full_arena_drops_silently() {
        let mut world = World::new();
        for i in 1..MAX_BLOCKS {
            assert!(world.place(square(i as f32 * BLOCK_SIZE, -1000.0), BlockColor::Blue, BlockShape::Square));
        }
        assert!(!world.place(square(0.0, -2000.0), BlockColor::Blue, BlockShape::Square));
        assert_eq!(world.active_count(), MAX_BLOCKS);
    }

    #[test]
    fn remove_twice_matches_remove_once() {
        let mut world = World::new();
        world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        world.place(square(40.0, 0.0), BlockColor::Blue, BlockShape::Square);
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(world.remove_at(p), 1);
        let once = world.clone();
        assert_eq!(world.remove_at(p), 0);
        assert_eq!(world, once);
    }

    #[test]
    fn ground_is_never_removed() {
        let mut world = World::new();
        assert_eq!(world.remove_at(Vec2::new(0.0, 310.0)), 0);
        assert!(world.remove_first_at(Vec2::new(0.0, 310.0)).is_none());
        assert_eq!(world.remove_overlapping(0.0, 310.0), 0);
        world.reset();
        assert!(world.ground().active);
    }

    #[test]
    fn remove_first_only_takes_one() {
        let mut world = World::new();
        world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        let removed = world.remove_first_at(Vec2::new(1.0, 1.0)).unwrap();
        assert_eq!(removed.rect, square(0.0, 0.0));
        assert!(!removed.active);
        assert_eq!(world.active_count(), 1);
    }

    #[test]
    fn probe_removal_uses_unit_rect() {
        let mut world = World::new();
        world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        assert_eq!(world.remove_overlapping(-0.5, -0.5), 1);
        world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        assert_eq!(world.remove_overlapping(-1.0, 0.0), 0);
    }

    #[test]
    fn reset_keeps_ground_only() {
        let mut world = World::new();
        world.place(square(0.0, 0.0), BlockColor::Blue, BlockShape::Square);
        world.place(square(80.0, 0.0), BlockColor::Blue, BlockShape::Square);
        world.reset();
        assert_eq!(world.active_count(), 1);
        assert!(world.ground().active);
    }

    #[test]
    fn snapping_floors_negative_coordinates() {
        assert_eq!(snap_to_grid(Vec2::new(-1.0, 79.0), BlockShape::Square), Rect::new(-40.0, 40.0, 40.0, 40.0));
        assert_eq!(snap_to_grid(Vec2::new(-40.0, 0.0), BlockShape::Rect), Rect::new(-40.0, 0.0, 80.0, 40.0));
    }
}
