//! Geocoin - A location-based coin collecting game
//!
//! Core modules:
//! - `world`: Grid index, geocache store, cache spawning, coin transfer
//! - `persistence`: Versioned save/load of the session
//! - `platform`: Browser/native platform abstraction (storage)
//! - `config`: Tunable gameplay parameters

pub mod config;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod world;

pub use config::GameConfig;
pub use error::{Error, Result};

use glam::DVec2;

/// A geographic point. `x` holds latitude, `y` holds longitude.
pub type LatLng = DVec2;

/// Game configuration constants
pub mod consts {
    /// Location of the Oakes College classroom (lat, lng)
    pub const START_LAT: f64 = 36.98949379578401;
    pub const START_LNG: f64 = -122.06277128548504;

    /// Size of one grid tile in degrees
    pub const TILE_DEGREES: f64 = 1e-4;
    /// Tiles around the player within which caches are shown
    pub const VISIBILITY_RADIUS: u32 = 8;
    /// Largest visibility radius a config may ask for
    pub const MAX_VISIBILITY_RADIUS: u32 = 64;
    /// Chance that a given cell hosts a cache
    pub const CACHE_SPAWN_PROBABILITY: f64 = 0.1;
    /// Upper bound (exclusive) on a fresh cache's coin count
    pub const MAX_INITIAL_COINS: u32 = 100;

    /// Default world seed
    pub const WORLD_SEED: u64 = 0x6765_6f63_6f69_6e00;
}

/// Build a point from latitude and longitude
#[inline]
pub fn latlng(lat: f64, lng: f64) -> LatLng {
    DVec2::new(lat, lng)
}
