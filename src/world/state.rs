//! Session state
//!
//! Everything that must be persisted between visits lives here, owned by one
//! `Session` value instead of module-level registries.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, CellBounds};
use super::coin::{self, Cache, Coin, Inventory};
use super::geocache::GeocacheStore;
use super::spawner::Spawner;
use crate::LatLng;
use crate::config::GameConfig;

/// Notifications for the map/UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player marker and path changed
    PlayerMoved { location: LatLng },
    /// A cache site entered the visibility window
    CacheSpawned {
        cell: Cell,
        bounds: CellBounds,
        num_coins: u32,
    },
    /// A cache site left the visibility window
    CacheDespawned { cell: Cell },
    CacheOpened { cell: Cell, coins: Vec<Coin> },
    CacheClosed { cell: Cell },
    /// Coin count of an open cache changed
    CacheUpdated { cell: Cell, num_coins: u32 },
    InventoryChanged { count: usize },
    /// Collect or deposit had nothing to move
    NothingToTransfer,
    /// Everything was wiped and regenerated at the start location
    GameReset,
}

/// One-tile movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Unit offset in (lat, lng) tiles
    pub fn offset(&self) -> DVec2 {
        match self {
            Direction::North => DVec2::new(1.0, 0.0),
            Direction::South => DVec2::new(-1.0, 0.0),
            Direction::East => DVec2::new(0.0, 1.0),
            Direction::West => DVec2::new(0.0, -1.0),
        }
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub board: Board,
    pub geocaches: GeocacheStore,
    pub spawner: Spawner,
    pub inventory: Inventory,
    /// Current player location
    pub location: LatLng,
    /// Every location visited, oldest first
    pub path: Vec<LatLng>,
    /// Cache whose popup is open, if any
    open_cache: Option<Cache>,
}

impl Session {
    /// Start a fresh session at the configured start location
    pub fn new(config: GameConfig) -> Self {
        let location = config.start_location;
        let session = Self::from_parts(
            config,
            GeocacheStore::new(),
            Inventory::new(),
            location,
            vec![location],
        );
        log::info!(
            "New session at ({:.6}, {:.6}), {} caches in view",
            location.x,
            location.y,
            session.spawner.spawned_count()
        );
        session
    }

    /// Rebuild a session from persisted parts
    ///
    /// Caches around `location` are respawned from `geocaches`.
    pub fn from_parts(
        config: GameConfig,
        geocaches: GeocacheStore,
        inventory: Inventory,
        location: LatLng,
        path: Vec<LatLng>,
    ) -> Self {
        let mut session = Self {
            board: Board::new(config.tile_width),
            spawner: Spawner::new(&config),
            geocaches,
            inventory,
            location,
            path,
            open_cache: None,
            config,
        };
        session.refresh_caches();
        session
    }

    pub fn open_cache(&self) -> Option<&Cache> {
        self.open_cache.as_ref()
    }

    /// Respawn caches around the current location
    pub fn refresh_caches(&mut self) -> Vec<GameEvent> {
        let mut events =
            self.spawner
                .refresh(&mut self.board, &mut self.geocaches, self.location);
        // A cache only stays open while it is spawned
        let stale = self
            .open_cache
            .as_ref()
            .is_some_and(|cache| !self.spawner.is_spawned(&cache.cell));
        if stale {
            events.extend(self.close());
        }
        events
    }

    /// Move the player one tile in `direction`
    pub fn step(&mut self, direction: Direction) -> Vec<GameEvent> {
        let target = self.location + direction.offset() * self.config.tile_width;
        self.move_to(target)
    }

    /// Move the player to an arbitrary location (e.g. from geolocation)
    pub fn move_to(&mut self, location: LatLng) -> Vec<GameEvent> {
        self.location = location;
        self.path.push(location);
        let mut events = vec![GameEvent::PlayerMoved { location }];
        events.extend(self.refresh_caches());
        events
    }

    /// Open the cache at `cell` if one is spawned there
    pub fn open(&mut self, cell: Cell) -> Vec<GameEvent> {
        if !self.spawner.is_spawned(&cell) {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.open_cache.as_ref().is_some_and(|c| c.cell != cell) {
            events.extend(self.close());
        }
        let Some(geocache) = self.geocaches.get(&cell) else {
            return events;
        };
        let cache = Cache::materialize(geocache);
        events.push(GameEvent::CacheOpened {
            cell,
            coins: cache.coins.clone(),
        });
        self.open_cache = Some(cache);
        events
    }

    /// Close the open cache, if any
    pub fn close(&mut self) -> Vec<GameEvent> {
        match self.open_cache.take() {
            Some(cache) => vec![GameEvent::CacheClosed { cell: cache.cell }],
            None => Vec::new(),
        }
    }

    /// Take one coin from the open cache
    pub fn collect(&mut self) -> Option<Coin> {
        let cache = self.open_cache.as_mut()?;
        let geocache = self.geocaches.get_mut(&cache.cell)?;
        let coin = coin::collect(cache, geocache, &mut self.inventory)?;
        log::debug!("Collected coin {}", coin.id());
        Some(coin)
    }

    /// Put one inventory coin into the open cache
    pub fn deposit(&mut self) -> Option<Coin> {
        let cache = self.open_cache.as_mut()?;
        let geocache = self.geocaches.get_mut(&cache.cell)?;
        let coin = coin::deposit(cache, geocache, &mut self.inventory)?;
        log::debug!("Deposited coin {}", coin.id());
        Some(coin)
    }

    /// Wipe all progress and start over at the start location
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let mut events = self.close();
        for cell in self.spawner.spawned() {
            events.push(GameEvent::CacheDespawned { cell: *cell });
        }
        *self = Session::new(self.config.clone());
        events.push(GameEvent::GameReset);
        events.push(GameEvent::PlayerMoved {
            location: self.location,
        });
        events.push(GameEvent::InventoryChanged { count: 0 });
        events.extend(self.spawned_events());
        log::info!("Game reset");
        events
    }

    /// Spawn events for every cache currently in view (for a fresh map)
    pub fn spawned_events(&self) -> Vec<GameEvent> {
        self.spawner
            .spawned()
            .filter_map(|cell| {
                let geocache = self.geocaches.get(cell)?;
                Some(GameEvent::CacheSpawned {
                    cell: *cell,
                    bounds: self.board.cell_bounds(cell),
                    num_coins: geocache.num_coins,
                })
            })
            .collect()
    }
}
