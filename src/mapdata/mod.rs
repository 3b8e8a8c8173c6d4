//! Static map data: bit-packed obstacles, region lookup, safe zones, and the
//! dense/sparse per-tile containers they are built from.

mod basemap;
mod dyntiles;
mod rangemap;
mod regionmap;
mod safezones;
mod sparsemap;
mod tiledata;

pub use basemap::BaseMap;
pub use dyntiles::{BoolDynTiles, DynTiles};
pub use rangemap::{OutOfRange, RangeMap};
pub use regionmap::{RegionId, RegionMap};
pub use safezones::{Faction, SafeZoneEntry, SafeZoneSpec, SafeZones};
pub use sparsemap::SparseTileMap;
pub use tiledata::TileData;
