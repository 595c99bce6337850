use std::time::Duration;

use glam::{IVec3, Vec3};
use tracing::debug;

use crate::config::PlacementConfig;
use crate::model::{BlockKind, Player, VoxelWorld};
use crate::utils::GridCoord;

/// Nearest block face under the crosshair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub coord: GridCoord,
    /// outward unit normal of the face that was hit
    pub normal: IVec3,
    pub distance: f32,
}

impl RayHit {
    /// The empty cell in front of the hit face
    pub fn adjacent(&self) -> GridCoord {
        self.coord.offset(self.normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(GridCoord, BlockKind),
    /// request arrived inside the cooldown window
    CoolingDown,
    NoTarget,
    Occupied(GridCoord),
    TooClose(GridCoord),
}

/// Click-to-place against the face under the crosshair.
///
/// Blocks only ever go into the cell in front of an existing block's face, so
/// nothing can be placed floating.
pub struct PlacementResolver {
    pub cooldown: Duration,
    pub reach: f32,
    pub candidate_radius: f32,
    pub min_player_distance: f32,

    // time of the last accepted request, placed or not
    last_attempt: Option<Duration>,
    // index into the palette of the last placed kind
    selector: usize,
}

impl PlacementResolver {
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(config.cooldown_ms),
            reach: config.reach,
            candidate_radius: config.candidate_radius,
            min_player_distance: config.min_player_distance,
            last_attempt: None,
            selector: 0,
        }
    }

    /// Kind the next successful placement will use
    pub fn next_kind(&self) -> BlockKind {
        BlockKind::from_index(self.selector + 1)
    }

    /// Nearest block hit by the ray, among blocks whose centre lies within
    /// `candidate_radius` of `origin`
    pub fn raycast(&self, world: &VoxelWorld, origin: Vec3, dir: Vec3) -> Option<RayHit> {
        let radius_sq = self.candidate_radius * self.candidate_radius;
        world
            .all()
            .iter()
            .filter(|b| b.coord().center().distance_squared(origin) < radius_sq)
            .filter_map(|b| {
                let (distance, normal) = b.coord().bounds().ray_hit(origin, dir, self.reach)?;
                Some(RayHit { coord: b.coord(), normal, distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Handle one placement click at session time `now`
    pub fn try_place(&mut self, world: &mut VoxelWorld, player: &Player, now: Duration) -> PlacementOutcome {
        if let Some(last) = self.last_attempt {
            if now.saturating_sub(last) < self.cooldown {
                debug!("placement dropped: cooling down");
                return PlacementOutcome::CoolingDown;
            }
        }
        self.last_attempt = Some(now);

        let outcome = match self.raycast(world, player.position, player.look_direction()) {
            Some(hit) => self.place_at_hit(world, &hit, player.position),
            None => PlacementOutcome::NoTarget,
        };
        debug!(?outcome, "placement");
        outcome
    }

    /// Validate and place against an already found hit
    pub fn place_at_hit(&mut self, world: &mut VoxelWorld, hit: &RayHit, player_pos: Vec3) -> PlacementOutcome {
        let target = hit.adjacent();
        if world.contains(target) {
            return PlacementOutcome::Occupied(target);
        }

        let min_sq = self.min_player_distance * self.min_player_distance;
        if target.center().distance_squared(player_pos) <= min_sq {
            return PlacementOutcome::TooClose(target);
        }

        self.selector = (self.selector + 1) % BlockKind::PALETTE.len();
        let kind = BlockKind::from_index(self.selector);
        world.put(target, kind, false);
        PlacementOutcome::Placed(target, kind)
    }
}

impl Default for PlacementResolver {
    fn default() -> Self {
        Self::new(&PlacementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::PI_HALF;
    use crate::model::TerrainGenerator;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn single_block_world() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, 0), BlockKind::Grass, true);
        world
    }

    fn looking_down_from(pos: Vec3) -> Player {
        let mut p = Player::new(pos);
        p.pitch = -PI_HALF;
        p
    }

    #[test]
    fn test_place_on_top_face() {
        let mut world = single_block_world();
        let mut placer = PlacementResolver::default();
        let player = looking_down_from(Vec3::new(0.0, 4.0, 0.0));

        let hit = placer.raycast(&world, player.position, player.look_direction()).unwrap();
        assert_eq!(hit.coord, GridCoord(0, 0, 0));
        assert_eq!(hit.normal, IVec3::Y);

        let outcome = placer.try_place(&mut world, &player, Duration::from_secs(1));
        assert_eq!(outcome, PlacementOutcome::Placed(GridCoord(0, 1, 0), BlockKind::Dirt));
        let placed = world.get(GridCoord(0, 1, 0)).unwrap();
        assert!(!placed.is_terrain());

        // the same cell again is rejected and the world doesn't grow
        let again = placer.place_at_hit(&mut world, &hit, player.position);
        assert_eq!(again, PlacementOutcome::Occupied(GridCoord(0, 1, 0)));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_too_close_to_player() {
        let mut world = single_block_world();
        let mut placer = PlacementResolver::default();
        // target centre (0, 1.5, 0) is exactly 1.5 away
        let player = looking_down_from(Vec3::new(0.0, 3.0, 0.0));
        let outcome = placer.try_place(&mut world, &player, Duration::from_secs(1));
        assert_eq!(outcome, PlacementOutcome::TooClose(GridCoord(0, 1, 0)));
        assert_eq!(world.len(), 1);
        assert_eq!(placer.next_kind(), BlockKind::Dirt, "rejections don't advance the selector");
    }

    #[test]
    fn test_cooldown_drops_second_request() {
        let mut world = single_block_world();
        let mut placer = PlacementResolver::default();
        let player = looking_down_from(Vec3::new(0.0, 6.0, 0.0));

        let first = placer.try_place(&mut world, &player, Duration::from_millis(1000));
        assert!(matches!(first, PlacementOutcome::Placed(..)));
        let second = placer.try_place(&mut world, &player, Duration::from_millis(1050));
        assert_eq!(second, PlacementOutcome::CoolingDown);
        assert_eq!(world.len(), 2);

        let third = placer.try_place(&mut world, &player, Duration::from_millis(1100));
        assert_eq!(third, PlacementOutcome::Placed(GridCoord(0, 2, 0), BlockKind::Stone));
    }

    #[test]
    fn test_failed_attempt_still_starts_cooldown() {
        let mut world = single_block_world();
        let mut placer = PlacementResolver::default();
        let mut player = looking_down_from(Vec3::new(0.0, 4.0, 0.0));
        player.pitch = PI_HALF; // looking at the sky

        assert_eq!(placer.try_place(&mut world, &player, Duration::from_millis(500)), PlacementOutcome::NoTarget);
        player.pitch = -PI_HALF;
        assert_eq!(placer.try_place(&mut world, &player, Duration::from_millis(550)), PlacementOutcome::CoolingDown);
        assert!(matches!(
            placer.try_place(&mut world, &player, Duration::from_millis(600)),
            PlacementOutcome::Placed(..)
        ));
    }

    #[test]
    fn test_selector_cycles_palette() {
        let mut world = single_block_world();
        let mut placer = PlacementResolver::default();
        let player = looking_down_from(Vec3::new(0.0, 9.0, 0.0));
        let mut kinds = Vec::new();
        for i in 0..4 {
            if let PlacementOutcome::Placed(_, kind) =
                placer.try_place(&mut world, &player, Duration::from_millis(1000 + 200 * i))
            {
                kinds.push(kind);
            }
        }
        assert_eq!(kinds, [BlockKind::Dirt, BlockKind::Stone, BlockKind::Grass, BlockKind::Dirt]);
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, -3), BlockKind::Stone, true);
        world.put(GridCoord(0, 0, -6), BlockKind::Stone, true);
        let placer = PlacementResolver::default();
        let hit = placer.raycast(&world, Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z).unwrap();
        assert_eq!(hit.coord, GridCoord(0, 0, -3));
        assert_eq!(hit.normal, IVec3::Z);
        assert_eq!(hit.adjacent(), GridCoord(0, 0, -2));
    }

    #[test]
    fn test_blocks_outside_candidate_radius_are_ignored() {
        let mut world = VoxelWorld::new();
        world.put(GridCoord(0, 0, -11), BlockKind::Stone, true);
        let mut placer = PlacementResolver::default();
        placer.reach = 100.0;
        assert!(placer.raycast(&world, Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z).is_none());
    }

    #[test]
    fn test_placed_blocks_always_touch_a_neighbor() {
        let mut world = VoxelWorld::new();
        let mut rng = StdRng::seed_from_u64(3);
        TerrainGenerator::new(4).generate(&mut world, &mut rng);
        let mut placer = PlacementResolver::default();

        let mut placed = 0;
        for i in 0..300u64 {
            let mut player = Player::new(Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(2.0..7.0),
                rng.gen_range(-4.0..4.0),
            ));
            player.yaw = rng.gen_range(-3.2..3.2);
            player.pitch = rng.gen_range(-PI_HALF..0.3);

            let before = world.len();
            let outcome = placer.try_place(&mut world, &player, Duration::from_millis(200 * i));
            if let PlacementOutcome::Placed(coord, _) = outcome {
                placed += 1;
                assert_eq!(world.len(), before + 1);
                let neighbors = coord.neighbors().filter(|n| world.contains(*n)).count();
                assert!(neighbors >= 1, "{coord:?} was placed floating");
            } else {
                assert_eq!(world.len(), before);
            }
        }
        assert!(placed > 0);
    }
}
