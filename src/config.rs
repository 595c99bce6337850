use std::path::Path;

use glam::Vec3;
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

/// Every tunable of a session. `Default` is the stock game; a TOML file may override any subset.
///
/// Usage:
///   let config = SessionConfig::load_or_default("sandbox.toml")?;
///   // or
///   let config: SessionConfig = toml::from_str("[physics]\ngravity = 50.0")?;
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub placement: PlacementConfig,
    pub culling: CullingConfig,
    pub terrain: TerrainConfig,
    pub look: LookConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// horizontal velocity decays by `1 - damping * dt` per tick
    pub damping: f32,
    pub acceleration: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// eye height of the world-bottom safety floor
    pub ground_level: f32,
    /// frame gaps longer than this are integrated as this long
    pub max_dt: f32,
    /// x/z velocity below this is left alone when bumping into a wall
    pub bounce_threshold: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            acceleration: 30.0,
            gravity: 98.0,
            jump_impulse: 15.0,
            ground_level: 1.7,
            max_dt: 0.1,
            bounce_threshold: 0.01,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec3,
    pub half_width: f32,
    /// box extent below the eye point
    pub eye_height: f32,
    /// box extent above the eye point
    pub head_room: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 10.0, 0.0),
            half_width: 0.3,
            eye_height: 1.7,
            head_room: 0.3,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementConfig {
    pub cooldown_ms: u64,
    pub reach: f32,
    /// only blocks within this radius of the camera are ray-tested
    pub candidate_radius: f32,
    pub min_player_distance: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 100,
            reach: 10.0,
            candidate_radius: 10.0,
            min_player_distance: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CullingConfig {
    pub interval_ms: u64,
    pub distance: f32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self { interval_ms: 100, distance: 70.0 }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub half_extent: i32,
    /// fixed seed for reproducible terrain; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self { half_extent: 15, seed: None }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookConfig {
    pub mouse_sensitivity: f32,
    /// extra factor for click-drag look while the pointer is free
    pub drag_factor: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self { mouse_sensitivity: 0.002, drag_factor: 0.1 }
    }
}

impl SessionConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(Error::from)
    }

    /// Read `path` if it exists, otherwise use the defaults. A file that exists but
    /// can't be read or parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let src = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&src)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
