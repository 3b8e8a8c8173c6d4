//! Hash-backed map guarded by a presence bitmap, for overlays where most
//! tiles stay at the default value.

use crate::hex::HexCoord;
use crate::mapdata::dyntiles::BoolDynTiles;
use crate::mapdata::tiledata::TileData;
use fnv::FnvHashMap;

/// A `DynTiles<bool>` presence bitmap paired with a hash map, so that
/// "is anything here?" is a single bit test before ever touching the hash
/// map.
pub struct SparseTileMap<'a, T> {
    present: BoolDynTiles<'a>,
    default: T,
    values: FnvHashMap<HexCoord, T>,
}

impl<'a, T: Copy + PartialEq> SparseTileMap<'a, T> {
    pub fn new(tiles: &'a TileData, default: T) -> Self {
        SparseTileMap {
            present: BoolDynTiles::new(tiles, false),
            default,
            values: FnvHashMap::default(),
        }
    }

    pub fn get(&self, c: HexCoord) -> T {
        if self.present.get(c) {
            *self.values.get(&c).expect("presence bit set but no stored value")
        } else {
            self.default
        }
    }

    pub fn set(&mut self, c: HexCoord, value: T) {
        if value == self.default {
            self.present.set(c, false);
            self.values.remove(&c);
        } else {
            self.present.set(c, true);
            self.values.insert(c, value);
        }
    }
}
