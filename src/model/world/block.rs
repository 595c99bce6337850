use crate::utils::GridCoord;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Grass = 0,
    Dirt = 1,
    Stone = 2,
}

/// Which texture slot of a cube a face samples
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSlot {
    Top,
    Side,
    Bottom,
}

impl FaceSlot {
    pub const ALL: [FaceSlot; 3] = [FaceSlot::Top, FaceSlot::Side, FaceSlot::Bottom];

    pub fn index(self) -> usize {
        match self {
            FaceSlot::Top => 0,
            FaceSlot::Side => 1,
            FaceSlot::Bottom => 2,
        }
    }
}

impl BlockKind {
    /// Fixed palette, in selector order
    pub const PALETTE: [BlockKind; 3] = [BlockKind::Grass, BlockKind::Dirt, BlockKind::Stone];

    pub fn from_index(v: usize) -> Self {
        Self::PALETTE[v % Self::PALETTE.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Grass => "grass",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
        }
    }

    /// Base RGB of a face before texture noise is applied
    pub fn face_rgb(self, slot: FaceSlot) -> [u8; 3] {
        match (self, slot) {
            (BlockKind::Grass, FaceSlot::Top) => [0x90, 0xEE, 0x90],
            (BlockKind::Grass, FaceSlot::Side) => [0x8B, 0x45, 0x13],
            (BlockKind::Grass, FaceSlot::Bottom) => [0x65, 0x43, 0x21],
            (BlockKind::Dirt, FaceSlot::Top) => [0x8B, 0x45, 0x13],
            (BlockKind::Dirt, _) => [0x65, 0x43, 0x21],
            (BlockKind::Stone, FaceSlot::Top) => [0x80, 0x80, 0x80],
            (BlockKind::Stone, _) => [0x69, 0x69, 0x69],
        }
    }
}

/// A placed cube. Coordinates and kind never change after placement; only the
/// derived `visible` flag is rewritten by the culling pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    kind: BlockKind,
    coord: GridCoord,
    is_terrain: bool,
    pub(crate) visible: bool,
}

impl Block {
    pub(crate) fn new(coord: GridCoord, kind: BlockKind, is_terrain: bool) -> Self {
        Self { kind, coord, is_terrain, visible: true }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn is_terrain(&self) -> bool {
        self.is_terrain
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
