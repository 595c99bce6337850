use std::collections::HashMap;

use super::block::{Block, BlockKind};
use crate::utils::GridCoord;

/// Outcome of [`VoxelWorld::put`]
#[derive(Debug)]
pub enum Put<'a> {
    Inserted(&'a Block),
    /// the cell was taken; nothing changed
    Occupied(&'a Block),
}

impl<'a> Put<'a> {
    pub fn block(&self) -> &'a Block {
        match self {
            Put::Inserted(b) | Put::Occupied(b) => b,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, Put::Inserted(_))
    }
}

/// Sparse block store: a coordinate index over an insertion-ordered block list.
///
/// `index[c]` is always the position in `blocks` of the one block whose
/// coordinate is `c`. Both are only ever extended together inside `put`.
#[derive(Default)]
pub struct VoxelWorld {
    blocks: Vec<Block>,
    index: HashMap<GridCoord, usize>,

    // bumped on every change to `blocks`, including visibility flips
    revision: u64,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block unless the cell is taken, in which case the existing block is returned untouched
    pub fn put(&mut self, coord: GridCoord, kind: BlockKind, is_terrain: bool) -> Put<'_> {
        if let Some(&idx) = self.index.get(&coord) {
            return Put::Occupied(&self.blocks[idx]);
        }
        let idx = self.blocks.len();
        self.blocks.push(Block::new(coord, kind, is_terrain));
        self.index.insert(coord, idx);
        self.revision += 1;
        Put::Inserted(&self.blocks[idx])
    }

    pub fn get(&self, coord: GridCoord) -> Option<&Block> {
        self.index.get(&coord).map(|&idx| &self.blocks[idx])
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// All blocks in insertion order
    pub fn all(&self) -> &[Block] {
        &self.blocks
    }

    pub fn visible(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.visible)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rewrite visibility flags. `decide` returns the new flag, or None to leave a block alone.
    /// Returns how many blocks changed.
    pub fn update_visibility<F>(&mut self, mut decide: F) -> usize
    where
        F: FnMut(&Block) -> Option<bool>,
    {
        let mut changed = 0;
        for block in self.blocks.iter_mut() {
            if let Some(visible) = decide(block) {
                if block.visible != visible {
                    block.visible = visible;
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.revision += 1;
        }
        changed
    }
}
