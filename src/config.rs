//! Configuration consumed (not defined) by this crate: declared safe zones,
//! per-building-type footprint templates, and the movement retry limit.
//!
//! The owning chain profile and its loader are external collaborators; this
//! module only deserialises the shape described in `spec.md` section 6.

use crate::error::ConfigError;
use crate::hex::HexCoord;
use crate::mapdata::Faction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Clone, Serialize, Deserialize)]
pub struct SafeZoneConfig {
    pub centre_x: i16,
    pub centre_y: i16,
    pub radius: u32,
    pub faction: Option<Faction>,
}

impl SafeZoneConfig {
    pub fn centre(&self) -> HexCoord {
        HexCoord::new(self.centre_x, self.centre_y)
    }
}

/// One relative tile offset within a building's footprint template.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct FootprintTile {
    pub dx: i16,
    pub dy: i16,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct FootprintTemplate {
    pub tiles: Vec<FootprintTile>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub safe_zones: Vec<SafeZoneConfig>,
    pub footprints: HashMap<String, FootprintTemplate>,
    pub blocked_step_retry_limit: u32,
    /// L1 radius bound applied to every path query the movement pipeline
    /// issues for a waypoint traversal attempt.
    pub movement_l1_range: i32,
}

impl Config {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn footprint(&self, kind: &str) -> Result<&FootprintTemplate, ConfigError> {
        self.footprints
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownFootprint(kind.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut footprints = HashMap::new();
        footprints.insert(
            "hq".to_string(),
            FootprintTemplate {
                tiles: vec![FootprintTile { dx: 0, dy: 0 }, FootprintTile { dx: 1, dy: 0 }],
            },
        );
        let config = Config {
            safe_zones: vec![SafeZoneConfig {
                centre_x: 0,
                centre_y: 0,
                radius: 5,
                faction: Some(Faction::Red),
            }],
            footprints,
            blocked_step_retry_limit: 3,
            movement_l1_range: 64,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed = Config::from_reader(json.as_bytes()).unwrap();
        assert_eq!(parsed.safe_zones.len(), 1);
        assert_eq!(parsed.footprint("hq").unwrap().tiles.len(), 2);
        assert!(parsed.footprint("missing").is_err());
    }
}
