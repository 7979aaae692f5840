//! Cache spawning within the player's visibility window
//!
//! Whether a cell hosts a cache is decided by seeded luck, so the world looks
//! the same on every visit. Coin counts come from the geocache store once a
//! site has been seen, never from resampling.

use std::collections::{BTreeSet, HashSet};

use super::board::{Board, Cell};
use super::geocache::GeocacheStore;
use super::luck::luck;
use super::state::GameEvent;
use crate::LatLng;
use crate::config::GameConfig;

/// Tracks which cache sites are currently on screen
#[derive(Debug, Clone)]
pub struct Spawner {
    spawn_probability: f64,
    max_initial_coins: u32,
    visibility_radius: u32,
    seed: u64,
    /// Spawn registry
    spawned: BTreeSet<Cell>,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            spawn_probability: config.spawn_probability,
            max_initial_coins: config.max_initial_coins,
            visibility_radius: config.visibility_radius,
            seed: config.seed,
            spawned: BTreeSet::new(),
        }
    }

    /// Deterministic cache-site predicate
    pub fn is_cache_site(&self, cell: &Cell) -> bool {
        luck(&format!("{},{}", cell.i, cell.j), self.seed) < self.spawn_probability
    }

    /// Coin count for a site seen for the first time
    pub fn initial_coins(&self, cell: &Cell) -> u32 {
        let roll = luck(&format!("{},{},initialValue", cell.i, cell.j), self.seed);
        (roll * self.max_initial_coins as f64).floor() as u32
    }

    pub fn is_spawned(&self, cell: &Cell) -> bool {
        self.spawned.contains(cell)
    }

    pub fn spawned(&self) -> impl Iterator<Item = &Cell> {
        self.spawned.iter()
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    pub fn clear(&mut self) {
        self.spawned.clear();
    }

    /// Bring the spawn registry in line with the window around `location`
    ///
    /// Sites leaving the window are despawned but keep their geocache.
    /// Sites entering it reuse their geocache or get a fresh one.
    pub fn refresh(
        &mut self,
        board: &mut Board,
        store: &mut GeocacheStore,
        location: LatLng,
    ) -> Vec<GameEvent> {
        let in_view: HashSet<Cell> = board
            .cells_near_point(location, self.visibility_radius)
            .into_iter()
            .map(|cell| *cell)
            .collect();

        let mut events = Vec::new();

        let leaving: Vec<Cell> = self
            .spawned
            .iter()
            .filter(|cell| !in_view.contains(*cell))
            .copied()
            .collect();
        for cell in leaving {
            self.spawned.remove(&cell);
            log::debug!("Despawned cache at {}", cell);
            events.push(GameEvent::CacheDespawned { cell });
        }

        let mut entering: Vec<Cell> = in_view
            .into_iter()
            .filter(|cell| !self.spawned.contains(cell) && self.is_cache_site(cell))
            .collect();
        entering.sort();
        for cell in entering {
            let num_coins = store
                .get_or_insert_with(cell, || self.initial_coins(&cell))
                .num_coins;
            self.spawned.insert(cell);
            log::debug!("Spawned cache at {} with {} coins", cell, num_coins);
            events.push(GameEvent::CacheSpawned {
                cell,
                bounds: board.cell_bounds(&cell),
                num_coins,
            });
        }

        events
    }
}
