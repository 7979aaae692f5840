//! Gameplay configuration
//!
//! Defaults match the classroom map. Overrides are persisted separately from
//! save games under their own storage key.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::platform::KeyValueStore;
use crate::{LatLng, latlng};

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid tile size in degrees
    pub tile_width: f64,
    /// Visibility window radius in tiles
    pub visibility_radius: u32,
    /// Probability that a cell hosts a cache (0.0 - 1.0)
    pub spawn_probability: f64,
    /// Fresh caches hold `0..max_initial_coins` coins
    pub max_initial_coins: u32,
    /// Where new games (and resets) begin
    pub start_location: LatLng,
    /// Seed mixed into cache placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_width: TILE_DEGREES,
            visibility_radius: VISIBILITY_RADIUS,
            spawn_probability: CACHE_SPAWN_PROBABILITY,
            max_initial_coins: MAX_INITIAL_COINS,
            start_location: latlng(START_LAT, START_LNG),
            seed: WORLD_SEED,
        }
    }
}

impl GameConfig {
    /// Storage key for config overrides
    const STORAGE_KEY: &'static str = "geocoin_config";

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !self.tile_width.is_finite() || self.tile_width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tile_width must be positive, got {}",
                self.tile_width
            )));
        }
        if self.visibility_radius == 0 || self.visibility_radius > MAX_VISIBILITY_RADIUS {
            return Err(Error::InvalidConfig(format!(
                "visibility_radius must be within [1, {}], got {}",
                MAX_VISIBILITY_RADIUS, self.visibility_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(Error::InvalidConfig(format!(
                "spawn_probability must be within [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if !self.start_location.is_finite() {
            return Err(Error::InvalidConfig(
                "start_location must be finite".to_string(),
            ));
        }
        // Every tile index reachable from the start must fit in an i32
        let extent = self.start_location.abs().max_element().max(180.0);
        let max_index = (extent / self.tile_width).ceil() + self.visibility_radius as f64 + 1.0;
        if max_index > i32::MAX as f64 {
            return Err(Error::InvalidConfig(format!(
                "tile_width {} is too small for the grid index range",
                self.tile_width
            )));
        }
        Ok(())
    }

    /// Load config overrides from storage, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let json = match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("Using default config");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read config: {}", e);
                return Self::default();
            }
        };

        let parsed = serde_json::from_str::<GameConfig>(&json)
            .map_err(Error::from)
            .and_then(|config| config.validate().map(|_| config));
        match parsed {
            Ok(config) => {
                log::info!("Loaded config from storage");
                config
            }
            Err(e) => {
                log::warn!("Ignoring stored config: {}", e);
                Self::default()
            }
        }
    }

    /// Save config overrides to storage
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Config saved");
        Ok(())
    }
}
