//! Deterministic spatial engine for a hexagonal-grid game world.
//!
//! This crate answers the three families of queries the surrounding
//! game-state processor needs every block: whether a tile is on the map
//! and passable, the shortest path between two tiles under a caller-supplied
//! cost function, and which regions/safe-zones/dynamic obstacles cover a
//! tile. All of it is single-threaded and deterministic -- the same inputs
//! must produce the same outputs on every machine, since consensus depends
//! on it.

pub mod config;
pub mod error;
pub mod hex;
pub mod mapdata;
pub mod movement;
pub mod obstacles;
pub mod pathfinder;

pub use config::Config;
pub use error::ConfigError;
pub use hex::{Difference, HexCoord};
pub use mapdata::{BaseMap, Faction, RegionId, SafeZoneEntry, SafeZones, TileData};
pub use movement::UnitMovementState;
pub use obstacles::DynObstacles;
pub use pathfinder::{Distance, PathFinder, Stepper};
