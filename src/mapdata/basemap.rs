//! Combines `TileData` + `RegionMap` + `SafeZones` into the map's static
//! query surface.

use crate::hex::HexCoord;
use crate::mapdata::regionmap::{RegionId, RegionMap};
use crate::mapdata::safezones::SafeZones;
use crate::mapdata::tiledata::TileData;
use crate::pathfinder::Distance;

/// Base travel cost for a single passable step on the static map.
pub const BASE_EDGE_WEIGHT: u32 = 1000;

/// Immutable static map: tile extents/passability, region lookup, and safe
/// zones, constructed once per process.
pub struct BaseMap<'a> {
    tiles: &'a TileData,
    regions: RegionMap,
    safe_zones: SafeZones<'a>,
}

impl<'a> BaseMap<'a> {
    pub fn new(tiles: &'a TileData, regions: RegionMap, safe_zones: SafeZones<'a>) -> Self {
        BaseMap { tiles, regions, safe_zones }
    }

    pub fn tiles(&self) -> &TileData {
        self.tiles
    }

    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    pub fn safe_zones(&self) -> &SafeZones<'a> {
        &self.safe_zones
    }

    pub fn is_on_map(&self, c: HexCoord) -> bool {
        self.tiles.is_on_map(c)
    }

    pub fn is_passable(&self, c: HexCoord) -> bool {
        self.tiles.is_on_map(c) && self.tiles.is_passable(c)
    }

    pub fn region_id(&self, c: HexCoord) -> RegionId {
        if self.tiles.is_on_map(c) {
            self.regions.region_id(c)
        } else {
            RegionId::OUT_OF_MAP
        }
    }

    pub fn is_no_combat(&self, c: HexCoord) -> bool {
        self.safe_zones.is_no_combat(c)
    }

    /// Base-map travel cost for stepping from `from` to `to`. Only valid for
    /// neighbouring tiles.
    pub fn edge_weight(&self, from: HexCoord, to: HexCoord) -> Distance {
        debug_assert_eq!(
            HexCoord::distance_l1(from, to),
            1,
            "edge_weight is only defined for neighbouring tiles"
        );
        if self.is_passable(from) && self.is_passable(to) {
            Distance::new(BASE_EDGE_WEIGHT)
        } else {
            Distance::NO_CONNECTION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapdata::safezones::SafeZoneSpec;

    fn make_map(tiles: &TileData) -> BaseMap<'_> {
        let regions = RegionMap::from_dense(tiles, |_x, _y| 1).unwrap();
        let safe = SafeZones::new(tiles, &[] as &[SafeZoneSpec]);
        BaseMap::new(tiles, regions, safe)
    }

    #[test]
    fn edge_weight_is_constant_or_no_connection() {
        let tiles = TileData::from_passability(0, 2, |_y| (0, 2), |x, y| !(x == 1 && y == 0));
        let map = make_map(&tiles);
        let passable_edge = map.edge_weight(HexCoord::new(0, 0), HexCoord::new(0, 1));
        assert_eq!(passable_edge, Distance::new(BASE_EDGE_WEIGHT));

        let blocked_edge = map.edge_weight(HexCoord::new(0, 0), HexCoord::new(1, 0));
        assert_eq!(blocked_edge, Distance::NO_CONNECTION);
    }

    #[test]
    fn region_id_is_out_of_map_sentinel_off_map() {
        let tiles = TileData::from_passability(0, 2, |_y| (0, 2), |_x, _y| true);
        let map = make_map(&tiles);
        assert_eq!(map.region_id(HexCoord::new(100, 100)), RegionId::OUT_OF_MAP);
        assert_ne!(map.region_id(HexCoord::new(0, 0)), RegionId::OUT_OF_MAP);
    }
}
