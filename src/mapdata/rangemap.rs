//! Dense storage over all tiles within an L1 radius of a centre.

use crate::hex::HexCoord;
use std::fmt;

/// Returned when a `RangeMap` is accessed outside its radius.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OutOfRange;

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile is outside the range map's radius")
    }
}

impl std::error::Error for OutOfRange {}

/// Dense map over all tiles with L1 distance `<= radius` from `centre`.
///
/// Backed by a flat `Vec<T>` of `(2r+1)^2` slots, roughly half of which
/// (the corners of the bounding square that fall outside the hex diamond)
/// are unused -- a deliberate trade for O(1) integer indexing instead of a
/// hash lookup.
pub struct RangeMap<T> {
    centre: HexCoord,
    radius: i32,
    side: i32,
    data: Vec<T>,
}

impl<T: Clone> RangeMap<T> {
    pub fn new(centre: HexCoord, radius: i32, default: T) -> Self {
        assert!(radius >= 0, "RangeMap radius must be non-negative");
        let side = 2 * radius + 1;
        RangeMap {
            centre,
            radius,
            side,
            data: vec![default; (side * side) as usize],
        }
    }

    #[inline]
    pub fn centre(&self) -> HexCoord {
        self.centre
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn is_in_range(&self, c: HexCoord) -> bool {
        HexCoord::distance_l1(self.centre, c) <= self.radius as u32
    }

    fn slot(&self, c: HexCoord) -> Option<usize> {
        if !self.is_in_range(c) {
            return None;
        }
        let dx = (c.x() - self.centre.x()) as i32 + self.radius;
        let dy = (c.y() - self.centre.y()) as i32 + self.radius;
        Some((dx * self.side + dy) as usize)
    }

    pub fn get(&self, c: HexCoord) -> Result<&T, OutOfRange> {
        self.slot(c).map(|i| &self.data[i]).ok_or(OutOfRange)
    }

    pub fn access(&mut self, c: HexCoord) -> Result<&mut T, OutOfRange> {
        match self.slot(c) {
            Some(i) => Ok(&mut self.data[i]),
            None => Err(OutOfRange),
        }
    }
}
