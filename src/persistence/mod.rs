//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Validation on load (version, duplicate cells, empty path)
//! - Corruption is reported and replaced by a fresh game

pub mod envelope;

pub use envelope::{SAVE_VERSION, SaveData};

use crate::config::GameConfig;
use crate::error::Result;
use crate::platform::KeyValueStore;
use crate::world::Session;

/// Storage key for the saved game
pub const SAVE_KEY: &str = "geocoin_save";

/// Save the session to storage
pub fn save(session: &Session, store: &mut impl KeyValueStore) -> Result<()> {
    let json = SaveData::from_session(session).to_json()?;
    store.set(SAVE_KEY, &json)?;
    log::info!(
        "Game saved ({} geocaches, {} coins held)",
        session.geocaches.len(),
        session.inventory.len()
    );
    Ok(())
}

/// Load the saved game, if there is one
pub fn load(store: &impl KeyValueStore) -> Result<Option<SaveData>> {
    match store.get(SAVE_KEY)? {
        Some(json) => SaveData::from_json(&json).map(Some),
        None => Ok(None),
    }
}

/// Remove the saved game
pub fn clear(store: &mut impl KeyValueStore) -> Result<()> {
    store.remove(SAVE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}

/// Resume the saved game or start a new one
///
/// A save that fails to load is logged, discarded, and replaced by a fresh
/// session.
pub fn load_or_new(config: GameConfig, store: &mut impl KeyValueStore) -> Session {
    match load(&*store) {
        Ok(Some(save)) => {
            log::info!(
                "Loaded saved game ({} geocaches, {} coins held)",
                save.geocaches.len(),
                save.inventory.len()
            );
            save.into_session(config)
        }
        Ok(None) => {
            log::info!("No saved game found, starting fresh");
            Session::new(config)
        }
        Err(e) => {
            log::error!("Failed to load saved game: {}", e);
            if let Err(e) = clear(store) {
                log::warn!("Could not clear bad save: {}", e);
            }
            Session::new(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlng;
    use crate::platform::MemoryStore;
    use crate::world::{Cell, Command, Direction, apply};

    fn config() -> GameConfig {
        GameConfig {
            tile_width: 1e-4,
            visibility_radius: 2,
            spawn_probability: 1.0,
            start_location: latlng(0.00005, 0.00005),
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_save_reload() {
        let mut store = MemoryStore::new();
        let mut session = Session::new(config());
        session.geocaches.upsert(Cell::new(0, 0), 5);

        apply(&mut session, &Command::Open(Cell::new(0, 0)));
        apply(&mut session, &Command::Collect);
        apply(&mut session, &Command::Collect);
        assert_eq!(session.open_cache().map(|c| c.len()), Some(3));
        assert_eq!(session.inventory.len(), 2);

        save(&session, &mut store).unwrap();
        let reloaded = load_or_new(config(), &mut store);
        assert_eq!(
            reloaded.geocaches.get(&Cell::new(0, 0)).map(|g| g.num_coins),
            Some(3)
        );
        assert_eq!(reloaded.inventory.len(), 2);
        assert_eq!(reloaded.geocaches.snapshot(), session.geocaches.snapshot());
    }

    #[test]
    fn test_location_and_path_survive_reload() {
        let mut store = MemoryStore::new();
        let mut session = Session::new(config());
        apply(&mut session, &Command::Move(Direction::North));
        apply(&mut session, &Command::Move(Direction::East));
        save(&session, &mut store).unwrap();

        let reloaded = load_or_new(config(), &mut store);
        assert_eq!(reloaded.location, session.location);
        assert_eq!(reloaded.path, session.path);
        assert_eq!(reloaded.spawner.spawned_count(), session.spawner.spawned_count());
    }

    #[test]
    fn test_missing_save_starts_fresh() {
        let mut store = MemoryStore::new();
        assert!(load(&store).unwrap().is_none());
        let session = load_or_new(config(), &mut store);
        assert_eq!(session.path.len(), 1);
    }

    #[test]
    fn test_corrupt_save_is_reported_and_discarded() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{ definitely not a save").unwrap();
        assert!(load(&store).is_err());

        let session = load_or_new(config(), &mut store);
        assert!(session.inventory.is_empty());
        assert_eq!(session.location, config().start_location);
        assert!(store.get(SAVE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_save() {
        let mut store = MemoryStore::new();
        save(&Session::new(config()), &mut store).unwrap();
        clear(&mut store).unwrap();
        assert!(load(&store).unwrap().is_none());
    }
}
