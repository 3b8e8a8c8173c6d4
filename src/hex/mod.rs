//! Axial hex-coordinate algebra: [`HexCoord`], [`Difference`], neighbour
//! enumeration, rotation, and L1 distance.

mod coord;

pub use coord::{Difference, HexCoord};
