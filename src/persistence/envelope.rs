//! Versioned save envelope

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::LatLng;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::world::{Coin, GeocacheMemento, GeocacheStore, Inventory, Session};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// `[i, j, coins]` per known geocache
    pub geocaches: Vec<GeocacheMemento>,
    pub inventory: Vec<Coin>,
    pub location: LatLng,
    pub path: Vec<LatLng>,
}

impl SaveData {
    pub fn from_session(session: &Session) -> Self {
        Self {
            version: SAVE_VERSION,
            geocaches: session.geocaches.snapshot(),
            inventory: session.inventory.coins().to_vec(),
            location: session.location,
            path: session.path.clone(),
        }
    }

    /// Parse and validate a JSON save
    pub fn from_json(json: &str) -> Result<Self> {
        let save: SaveData = serde_json::from_str(json)?;
        save.validate()?;
        Ok(save)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject saves that would break store or session invariants
    pub fn validate(&self) -> Result<()> {
        if self.version != SAVE_VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: SAVE_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for memento in &self.geocaches {
            if !seen.insert(memento.cell()) {
                return Err(Error::Corrupt(format!(
                    "duplicate geocache for cell {}",
                    memento.cell()
                )));
            }
        }

        if self.path.is_empty() {
            return Err(Error::Corrupt("empty travel path".to_string()));
        }
        if !self.location.is_finite() || self.path.iter().any(|p| !p.is_finite()) {
            return Err(Error::Corrupt("non-finite location".to_string()));
        }
        Ok(())
    }

    pub fn into_session(self, config: GameConfig) -> Session {
        let mut geocaches = GeocacheStore::new();
        geocaches.restore(&self.geocaches);
        Session::from_parts(
            config,
            geocaches,
            Inventory::from_coins(self.inventory),
            self.location,
            self.path,
        )
    }
}
