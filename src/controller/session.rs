use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::controller::camera_controller::CameraController;
use crate::controller::collision::{CollisionResolver, Contacts};
use crate::controller::culling::VisibilityCuller;
use crate::controller::input::InputSnapshot;
use crate::controller::physics::MotionIntegrator;
use crate::controller::placement::{PlacementOutcome, PlacementResolver};
use crate::model::{Player, TerrainGenerator, VoxelWorld};

/// One running game: the world, the player and the systems that advance them.
///
/// Everything here is driven by [`Session::tick`] with an explicit clock, so a
/// session runs the same headless as it does behind a window.
pub struct Session {
    pub config: SessionConfig,
    pub world: VoxelWorld,
    pub player: Player,

    pub look: CameraController,
    pub integrator: MotionIntegrator,
    pub collider: CollisionResolver,
    pub placement: PlacementResolver,
    pub culler: VisibilityCuller,

    /// contacts from the most recent tick
    pub contacts: Contacts,
    pub last_placement: Option<PlacementOutcome>,
    last_tick: Option<Duration>,
}

impl Session {
    /// New session with terrain generated from `rng`
    pub fn new<R: Rng + ?Sized>(config: SessionConfig, rng: &mut R) -> Self {
        let mut world = VoxelWorld::new();
        TerrainGenerator::new(config.terrain.half_extent).generate(&mut world, rng);
        Self::with_world(config, world)
    }

    /// New session over an existing world
    pub fn with_world(config: SessionConfig, world: VoxelWorld) -> Self {
        let player = Player::new(config.player.spawn);
        info!("session start: {} blocks, spawn at {}", world.len(), player.position);
        Self {
            look: CameraController::new(&config.look),
            integrator: MotionIntegrator::new(&config.physics),
            collider: CollisionResolver::new(&config.player, &config.physics),
            placement: PlacementResolver::new(&config.placement),
            culler: VisibilityCuller::new(&config.culling),
            contacts: Contacts::default(),
            last_placement: None,
            last_tick: None,
            config,
            world,
            player,
        }
    }

    /// Advance one frame at session time `now`.
    ///
    /// The first tick only records the clock; later ticks integrate the time
    /// elapsed since the previous one.
    pub fn tick(&mut self, input: &InputSnapshot, now: Duration) {
        let dt = match self.last_tick {
            Some(last) => now.saturating_sub(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);

        self.look.apply_look(&mut self.player, input);

        if self.culler.maybe_run(&mut self.world, self.player.position, now) {
            debug!(visible = self.world.visible().count(), "culled");
        }

        let candidate = self.integrator.integrate(&mut self.player, input, dt);
        self.contacts = self.collider.resolve(&mut self.player, candidate, &self.world);

        if input.place {
            let outcome = self.placement.try_place(&mut self.world, &self.player, now);
            self.last_placement = Some(outcome);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.last_tick.unwrap_or_default()
    }
}
