//! Coins, open caches, and the player inventory
//!
//! Coins move between an open `Cache` and the `Inventory`; they are never
//! copied. The backing `Geocache` count follows every move.

use serde::{Deserialize, Serialize};

use super::board::Cell;
use super::geocache::Geocache;

/// A coin. `serial` is only unique within the cache it was last placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub cell: Cell,
    pub serial: u32,
}

impl Coin {
    /// Display identity, e.g. `369894:-1220628#3`
    pub fn id(&self) -> String {
        format!("{}:{}#{}", self.cell.i, self.cell.j, self.serial)
    }
}

/// Live coin list for an opened geocache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    pub cell: Cell,
    pub coins: Vec<Coin>,
}

impl Cache {
    /// Build the coin list from a geocache's count (serials `0..count`)
    pub fn materialize(geocache: &Geocache) -> Self {
        let cell = geocache.cell;
        let coins = (0..geocache.num_coins)
            .map(|serial| Coin { cell, serial })
            .collect();
        Self { cell, coins }
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// Coins held by the player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    coins: Vec<Coin>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn clear(&mut self) {
        self.coins.clear();
    }

    /// Status panel text
    pub fn status_line(&self) -> String {
        match self.coins.len() {
            0 => "No coins yet...".to_string(),
            1 => "1 coin accumulated".to_string(),
            n => format!("{} coins accumulated", n),
        }
    }
}

/// Move one coin from `cache` into `inventory`
///
/// Returns `None` when the cache is empty.
pub fn collect(cache: &mut Cache, geocache: &mut Geocache, inventory: &mut Inventory) -> Option<Coin> {
    let mut coin = cache.coins.pop()?;
    coin.cell = cache.cell;
    geocache.num_coins = geocache.num_coins.saturating_sub(1);
    inventory.coins.push(coin);
    Some(coin)
}

/// Move one coin from `inventory` into `cache`
///
/// The coin takes the cache's cell and the next serial there. Returns `None`
/// when the inventory is empty.
pub fn deposit(cache: &mut Cache, geocache: &mut Geocache, inventory: &mut Inventory) -> Option<Coin> {
    let mut coin = inventory.coins.pop()?;
    coin.cell = cache.cell;
    coin.serial = cache.coins.len() as u32;
    cache.coins.push(coin);
    geocache.num_coins += 1;
    Some(coin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(coins: u32) -> (Cache, Geocache, Inventory) {
        let geocache = Geocache::new(Cell::new(0, 0), coins);
        (Cache::materialize(&geocache), geocache, Inventory::new())
    }

    #[test]
    fn test_materialize_serials() {
        let (cache, _, _) = setup(3);
        let serials: Vec<u32> = cache.coins.iter().map(|c| c.serial).collect();
        assert_eq!(serials, vec![0, 1, 2]);
        assert!(cache.coins.iter().all(|c| c.cell == Cell::new(0, 0)));
    }

    #[test]
    fn test_collect_moves_coin() {
        let (mut cache, mut geocache, mut inventory) = setup(5);
        let coin = collect(&mut cache, &mut geocache, &mut inventory).unwrap();
        assert_eq!(coin.serial, 4);
        collect(&mut cache, &mut geocache, &mut inventory).unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(geocache.num_coins, 3);
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_collect_from_empty_is_noop() {
        let (mut cache, mut geocache, mut inventory) = setup(0);
        assert!(collect(&mut cache, &mut geocache, &mut inventory).is_none());
        assert_eq!(geocache.num_coins, 0);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_deposit_from_empty_is_noop() {
        let (mut cache, mut geocache, mut inventory) = setup(2);
        assert!(deposit(&mut cache, &mut geocache, &mut inventory).is_none());
        assert_eq!(cache.len(), 2);
        assert_eq!(geocache.num_coins, 2);
    }

    #[test]
    fn test_deposit_reassigns_cell_and_serial() {
        let mut inventory = Inventory::from_coins(vec![Coin {
            cell: Cell::new(7, 7),
            serial: 40,
        }]);
        let mut geocache = Geocache::new(Cell::new(1, -1), 2);
        let mut cache = Cache::materialize(&geocache);

        let coin = deposit(&mut cache, &mut geocache, &mut inventory).unwrap();
        assert_eq!(coin.cell, Cell::new(1, -1));
        assert_eq!(coin.serial, 2);
        assert_eq!(coin.id(), "1:-1#2");
        assert_eq!(geocache.num_coins, 3);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_collect_then_deposit_restores_count() {
        let (mut cache, mut geocache, mut inventory) = setup(4);
        collect(&mut cache, &mut geocache, &mut inventory).unwrap();
        deposit(&mut cache, &mut geocache, &mut inventory).unwrap();
        assert_eq!(geocache.num_coins, 4);
        assert_eq!(cache.len(), 4);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_status_line() {
        let mut inventory = Inventory::new();
        assert_eq!(inventory.status_line(), "No coins yet...");
        inventory.coins.push(Coin {
            cell: Cell::new(0, 0),
            serial: 0,
        });
        assert_eq!(inventory.status_line(), "1 coin accumulated");
    }
}
