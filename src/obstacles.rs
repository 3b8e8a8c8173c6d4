//! In-memory overlay of current vehicle and building footprints, rebuilt
//! from the database at the start of every tick and mutated in place as
//! units move during the tick.

use crate::hex::HexCoord;
use crate::mapdata::{BoolDynTiles, SparseTileMap, TileData};
use std::fmt;

/// A building footprint: structure type plus the relative tile offsets
/// (already rotated/mirrored and translated to the placement centre).
pub struct BuildingFootprint {
    pub kind: String,
    pub tiles: Vec<HexCoord>,
}

/// Returned by `add_building` when the requested footprint overlaps an
/// already-placed building. Vehicle overlap never triggers this.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BuildingOverlap;

impl fmt::Display for BuildingOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building footprint overlaps an existing building")
    }
}

impl std::error::Error for BuildingOverlap {}

/// Live vehicle and building occupancy, mutated between path queries within
/// a tick.
pub struct DynObstacles<'a> {
    vehicles: SparseTileMap<'a, u32>,
    buildings: BoolDynTiles<'a>,
}

impl<'a> DynObstacles<'a> {
    /// An empty overlay, e.g. for offline path queries with no live units.
    pub fn empty(tiles: &'a TileData) -> Self {
        DynObstacles {
            vehicles: SparseTileMap::new(tiles, 0),
            buildings: BoolDynTiles::new(tiles, false),
        }
    }

    pub fn has_vehicle(&self, c: HexCoord) -> bool {
        self.vehicles.get(c) > 0
    }

    pub fn is_building(&self, c: HexCoord) -> bool {
        self.buildings.get(c)
    }

    pub fn is_free(&self, c: HexCoord) -> bool {
        !self.has_vehicle(c) && !self.is_building(c)
    }

    pub fn add_vehicle(&mut self, c: HexCoord) {
        let count = self.vehicles.get(c);
        self.vehicles.set(c, count + 1);
    }

    /// Removes one vehicle from `c`. Precondition: a vehicle was previously
    /// added there (the count must not go below zero).
    pub fn remove_vehicle(&mut self, c: HexCoord) {
        let count = self.vehicles.get(c);
        assert!(count > 0, "remove_vehicle: no vehicle at {c:?} to remove");
        self.vehicles.set(c, count - 1);
    }

    /// Marks every tile of a building's footprint as occupied. Fails
    /// (without mutating anything) if any tile already holds a building;
    /// overlapping with vehicles is always permitted.
    pub fn add_building(&mut self, footprint: &BuildingFootprint) -> Result<(), BuildingOverlap> {
        if footprint.tiles.iter().any(|&c| self.is_building(c)) {
            return Err(BuildingOverlap);
        }
        for &c in &footprint.tiles {
            self.buildings.set(c, true);
        }
        Ok(())
    }

    pub fn remove_building(&mut self, footprint: &BuildingFootprint) {
        for &c in &footprint.tiles {
            self.buildings.set(c, false);
        }
    }
}

/// RAII guard: removes a vehicle from `DynObstacles` on construction and
/// reinserts it (at the possibly-updated `final_position`) when dropped, so
/// the removal is always undone even if the caller returns early or panics
/// mid-movement.
pub struct VehicleRelocation<'a, 'b> {
    dyn_obstacles: &'b mut DynObstacles<'a>,
    final_position: HexCoord,
}

impl<'a, 'b> VehicleRelocation<'a, 'b> {
    pub fn new(dyn_obstacles: &'b mut DynObstacles<'a>, from: HexCoord) -> Self {
        dyn_obstacles.remove_vehicle(from);
        VehicleRelocation {
            dyn_obstacles,
            final_position: from,
        }
    }

    /// Sets the position at which the vehicle will be reinserted once this
    /// guard is dropped.
    pub fn set_final_position(&mut self, position: HexCoord) {
        self.final_position = position;
    }

    /// Read-only access to the overlay while the guard still owns the
    /// removed vehicle slot, for evaluating edge weights mid-move.
    pub fn obstacles(&self) -> &DynObstacles<'a> {
        self.dyn_obstacles
    }
}

impl Drop for VehicleRelocation<'_, '_> {
    fn drop(&mut self) {
        self.dyn_obstacles.add_vehicle(self.final_position);
    }
}
