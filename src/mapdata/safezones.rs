//! Precomputed 4-bit-per-tile classification of safe, neutral, and starter
//! zones.

use crate::hex::HexCoord;
use crate::mapdata::dyntiles::DynTiles;
use crate::mapdata::tiledata::TileData;
use serde::{Deserialize, Serialize};

/// A faction affiliation for a starter zone.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Faction {
    Red,
    Green,
    Blue,
}

/// The classification stored per tile.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SafeZoneEntry {
    None,
    Red,
    Green,
    Blue,
    Neutral,
}

/// A declared safe-zone circle from configuration: a centre, an L1 radius,
/// and an optional faction affiliation (`None` means a neutral safe zone).
pub struct SafeZoneSpec {
    pub centre: HexCoord,
    pub radius: u32,
    pub faction: Option<Faction>,
}

/// Precomputed safe/starter-zone classification for every tile on the map.
pub struct SafeZones<'a> {
    entries: DynTiles<'a, SafeZoneEntry>,
}

impl<'a> SafeZones<'a> {
    /// Builds the classification by painting every tile within each
    /// configured circle. Later specs in `zones` overwrite earlier ones for
    /// overlapping tiles (paint order is the order given).
    pub fn new(tiles: &'a TileData, zones: &[SafeZoneSpec]) -> Self {
        let mut entries = DynTiles::new(tiles, SafeZoneEntry::None);
        for zone in zones {
            let entry = match zone.faction {
                Some(Faction::Red) => SafeZoneEntry::Red,
                Some(Faction::Green) => SafeZoneEntry::Green,
                Some(Faction::Blue) => SafeZoneEntry::Blue,
                None => SafeZoneEntry::Neutral,
            };
            for y in (zone.centre.y() - zone.radius as i16)..=(zone.centre.y() + zone.radius as i16) {
                for x in (zone.centre.x() - zone.radius as i16)..=(zone.centre.x() + zone.radius as i16) {
                    let c = HexCoord::new(x, y);
                    if tiles.is_on_map(c) && HexCoord::distance_l1(zone.centre, c) <= zone.radius {
                        entries.set(c, entry);
                    }
                }
            }
        }
        SafeZones { entries }
    }

    pub fn entry(&self, c: HexCoord) -> SafeZoneEntry {
        self.entries.get(c)
    }

    pub fn is_no_combat(&self, c: HexCoord) -> bool {
        !matches!(self.entry(c), SafeZoneEntry::None)
    }

    pub fn starter_for(&self, c: HexCoord) -> Option<Faction> {
        match self.entry(c) {
            SafeZoneEntry::Red => Some(Faction::Red),
            SafeZoneEntry::Green => Some(Faction::Green),
            SafeZoneEntry::Blue => Some(Faction::Blue),
            SafeZoneEntry::None | SafeZoneEntry::Neutral => None,
        }
    }
}
