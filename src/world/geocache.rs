//! Durable per-cell cache state
//!
//! A `Geocache` only records how many coins a cell holds. The coins
//! themselves are rebuilt on demand when the cache is opened.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::board::Cell;

/// Compact snapshot of one geocache, serialized as `[i, j, coins]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocacheMemento(pub i32, pub i32, pub u32);

impl GeocacheMemento {
    pub fn cell(&self) -> Cell {
        Cell::new(self.0, self.1)
    }

    pub fn num_coins(&self) -> u32 {
        self.2
    }
}

/// Persistent coin count for a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geocache {
    pub cell: Cell,
    pub num_coins: u32,
}

impl Geocache {
    pub fn new(cell: Cell, num_coins: u32) -> Self {
        Self { cell, num_coins }
    }

    pub fn save(&self) -> GeocacheMemento {
        GeocacheMemento(self.cell.i, self.cell.j, self.num_coins)
    }

    pub fn restore(memento: GeocacheMemento) -> Self {
        Self::new(memento.cell(), memento.num_coins())
    }
}

/// All known geocaches, at most one per cell
///
/// Ordered by cell so snapshots are stable.
#[derive(Debug, Clone, Default)]
pub struct GeocacheStore {
    caches: BTreeMap<Cell, Geocache>,
}

impl GeocacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: &Cell) -> Option<&Geocache> {
        self.caches.get(cell)
    }

    pub fn get_mut(&mut self, cell: &Cell) -> Option<&mut Geocache> {
        self.caches.get_mut(cell)
    }

    /// Create or overwrite the record for `cell`
    pub fn upsert(&mut self, cell: Cell, num_coins: u32) {
        self.caches
            .entry(cell)
            .and_modify(|g| g.num_coins = num_coins)
            .or_insert_with(|| Geocache::new(cell, num_coins));
    }

    /// Existing record for `cell`, or a new one holding `init()` coins
    pub fn get_or_insert_with(&mut self, cell: Cell, init: impl FnOnce() -> u32) -> &mut Geocache {
        self.caches
            .entry(cell)
            .or_insert_with(|| Geocache::new(cell, init()))
    }

    pub fn remove(&mut self, cell: &Cell) -> Option<Geocache> {
        self.caches.remove(cell)
    }

    pub fn clear(&mut self) {
        self.caches.clear();
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Geocache> {
        self.caches.values()
    }

    pub fn snapshot(&self) -> Vec<GeocacheMemento> {
        self.caches.values().map(Geocache::save).collect()
    }

    /// Replace every record with the snapshot's contents
    ///
    /// Later entries win if a cell appears twice.
    pub fn restore(&mut self, snapshot: &[GeocacheMemento]) {
        self.caches = snapshot
            .iter()
            .map(|m| (m.cell(), Geocache::restore(*m)))
            .collect();
    }
}
