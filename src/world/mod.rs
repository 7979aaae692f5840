//! Game world module
//!
//! All gameplay logic lives here. This module must stay deterministic and
//! free of rendering or platform dependencies:
//! - Cache placement from seeded luck only
//! - Stable iteration order (by cell)
//! - All state owned by an explicit `Session`

pub mod board;
pub mod coin;
pub mod command;
pub mod geocache;
pub mod luck;
pub mod spawner;
pub mod state;

pub use board::{Board, Cell, CellBounds};
pub use coin::{Cache, Coin, Inventory, collect, deposit};
pub use command::{Command, apply};
pub use geocache::{Geocache, GeocacheMemento, GeocacheStore};
pub use luck::luck;
pub use spawner::Spawner;
pub use state::{Direction, GameEvent, Session};
