//! Command dispatch
//!
//! Each UI action becomes a `Command`. `apply` runs it to completion and
//! reports what changed as a list of events for the map layer.

use serde::{Deserialize, Serialize};

use super::board::Cell;
use super::state::{Direction, GameEvent, Session};
use crate::LatLng;

/// A single player action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Move one tile (arrow buttons)
    Move(Direction),
    /// Jump to a real-world position (geolocation)
    MoveTo(LatLng),
    /// Open the popup of the cache at a cell
    Open(Cell),
    /// Close the open popup
    Close,
    /// Take a coin from the open cache
    Collect,
    /// Give a coin to the open cache
    Deposit,
    /// Erase all progress
    Reset,
}

/// Apply a command to the session
pub fn apply(session: &mut Session, command: &Command) -> Vec<GameEvent> {
    match command {
        Command::Move(direction) => session.step(*direction),
        Command::MoveTo(location) => session.move_to(*location),
        Command::Open(cell) => session.open(*cell),
        Command::Close => session.close(),
        Command::Collect => match session.collect() {
            Some(coin) => transfer_events(session, coin.cell),
            None => vec![GameEvent::NothingToTransfer],
        },
        Command::Deposit => match session.deposit() {
            Some(coin) => transfer_events(session, coin.cell),
            None => vec![GameEvent::NothingToTransfer],
        },
        Command::Reset => session.reset(),
    }
}

fn transfer_events(session: &Session, cell: Cell) -> Vec<GameEvent> {
    let num_coins = session
        .geocaches
        .get(&cell)
        .map(|g| g.num_coins)
        .unwrap_or_default();
    vec![
        GameEvent::CacheUpdated { cell, num_coins },
        GameEvent::InventoryChanged {
            count: session.inventory.len(),
        },
    ]
}
