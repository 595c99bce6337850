use image::RgbaImage;
use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{BlockKind, FaceSlot};

/// Edge length of one face texture in pixels
pub const TILE: u32 = 64;

// one row per block kind; columns are top, side, bottom, then the ground tile
const COLUMNS: u32 = 4;
const ROWS: u32 = 3;
const GROUND_RGB: [u8; 3] = [0x90, 0xEE, 0x90];
const NOISE_AMPLITUDE: f32 = 15.0;

/// Texture-space rectangle of one tile, inset by half a texel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl TileRect {
    fn at(column: u32, row: u32) -> Self {
        let (w, h) = ((TILE * COLUMNS) as f32, (TILE * ROWS) as f32);
        let inset = 0.5;
        let x0 = (column * TILE) as f32;
        let y0 = (row * TILE) as f32;
        Self {
            min: [(x0 + inset) / w, (y0 + inset) / h],
            max: [(x0 + TILE as f32 - inset) / w, (y0 + TILE as f32 - inset) / h],
        }
    }

    /// Corner UVs for a quad whose corners run bottom-left, bottom-right,
    /// top-right, top-left
    pub fn quad_uvs(&self) -> [[f32; 2]; 4] {
        [
            [self.min[0], self.max[1]],
            [self.max[0], self.max[1]],
            [self.max[0], self.min[1]],
            [self.min[0], self.min[1]],
        ]
    }
}

/// All block face textures packed into one image
pub struct TextureAtlas {
    pub image: RgbaImage,
}

impl TextureAtlas {
    /// Synthesize every face texture: the kind's base colour with uniform
    /// per-pixel noise. Nothing can be drawn until this has succeeded.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut image = RgbaImage::new(TILE * COLUMNS, TILE * ROWS);
        for kind in BlockKind::PALETTE {
            for slot in FaceSlot::ALL {
                let tile = noisy_tile(kind.face_rgb(slot), rng)?;
                blit(&mut image, &tile, slot.index() as u32, kind.index() as u32);
            }
        }
        let ground = noisy_tile(GROUND_RGB, rng)?;
        blit(&mut image, &ground, COLUMNS - 1, 0);

        info!("generated {}x{} texture atlas", image.width(), image.height());
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn tile(kind: BlockKind, slot: FaceSlot) -> TileRect {
        TileRect::at(slot.index() as u32, kind.index() as u32)
    }

    pub fn ground_tile() -> TileRect {
        TileRect::at(COLUMNS - 1, 0)
    }
}

fn noisy_tile<R: Rng + ?Sized>(rgb: [u8; 3], rng: &mut R) -> Result<RgbaImage> {
    let mut raw = Vec::with_capacity((TILE * TILE * 4) as usize);
    for _ in 0..TILE * TILE {
        // one offset per pixel, shared by all three channels
        let noise = rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
        for c in rgb {
            raw.push((c as f32 + noise).clamp(0.0, 255.0) as u8);
        }
        raw.push(255);
    }
    RgbaImage::from_raw(TILE, TILE, raw).ok_or_else(|| Error::TextureAtlas("tile buffer has the wrong size".into()))
}

fn blit(atlas: &mut RgbaImage, tile: &RgbaImage, column: u32, row: u32) {
    let (ox, oy) = (column * TILE, row * TILE);
    for (x, y, px) in tile.enumerate_pixels() {
        atlas.put_pixel(ox + x, oy + y, *px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn atlas() -> TextureAtlas {
        TextureAtlas::generate(&mut StdRng::seed_from_u64(17)).unwrap()
    }

    fn tile_pixels(atlas: &TextureAtlas, column: u32, row: u32) -> Vec<[u8; 4]> {
        let mut out = Vec::new();
        for y in 0..TILE {
            for x in 0..TILE {
                out.push(atlas.image.get_pixel(column * TILE + x, row * TILE + y).0);
            }
        }
        out
    }

    #[test]
    fn test_atlas_dimensions() {
        let atlas = atlas();
        assert_eq!((atlas.width(), atlas.height()), (256, 192));
        assert_eq!(atlas.rgba().len(), 256 * 192 * 4);
    }

    #[test]
    fn test_tiles_stay_near_base_colour() {
        let atlas = atlas();
        for kind in BlockKind::PALETTE {
            for slot in FaceSlot::ALL {
                let base = kind.face_rgb(slot);
                for px in tile_pixels(&atlas, slot.index() as u32, kind.index() as u32) {
                    assert_eq!(px[3], 255);
                    for c in 0..3 {
                        let d = px[c] as i32 - base[c] as i32;
                        assert!((-15..=15).contains(&d), "{kind:?} {slot:?} channel {c} off by {d}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_noise_is_not_flat() {
        let atlas = atlas();
        let pixels = tile_pixels(&atlas, 0, BlockKind::Stone.index() as u32);
        let first = pixels[0];
        assert!(pixels.iter().any(|p| *p != first));
    }

    #[test]
    fn test_noise_clamps_at_white() {
        let mut rng = StdRng::seed_from_u64(2);
        let tile = noisy_tile([250, 250, 250], &mut rng).unwrap();
        assert!(tile.pixels().all(|p| p.0[0] >= 235));
        assert!(tile.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn test_tile_rects_do_not_overlap() {
        let a = TextureAtlas::tile(BlockKind::Grass, FaceSlot::Top);
        let b = TextureAtlas::tile(BlockKind::Grass, FaceSlot::Side);
        let c = TextureAtlas::tile(BlockKind::Dirt, FaceSlot::Top);
        assert!(a.max[0] < b.min[0]);
        assert!(a.max[1] < c.min[1]);
        let g = TextureAtlas::ground_tile();
        assert!(g.min[0] > 0.75 && g.max[0] < 1.0);
    }
}
