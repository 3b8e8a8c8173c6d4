//! Lookup of region ID for a tile, using a compact run-length
//! representation: per row, a sorted list of run-start x-coordinates paired
//! with one region ID per entry.

use crate::error::ConfigError;
use crate::hex::HexCoord;
use crate::mapdata::tiledata::TileData;
use std::collections::{HashSet, VecDeque};

/// A 24-bit region identifier, or the `OUT_OF_MAP` sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RegionId(u32);

impl RegionId {
    /// Sentinel for tiles that are not on the map. Not representable by any
    /// real 24-bit region ID.
    pub const OUT_OF_MAP: RegionId = RegionId(u32::MAX);

    pub const fn new(id: u32) -> Self {
        assert!(id <= 0x00FF_FFFF, "region id must fit in 24 bits");
        RegionId(id)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

struct Row {
    /// Sorted ascending run-start x-coordinates; first entry equals the
    /// row's `min_x`.
    xs: Vec<i16>,
    ids: Vec<RegionId>,
}

/// Compact, run-length-encoded region map: the canonical representation
/// described by `spec.md` section 3.
pub struct RegionMap {
    min_y: i16,
    rows: Vec<Row>,
}

impl RegionMap {
    /// Builds a `RegionMap` from per-row `(x, region_id)` run starts. Each
    /// row's entries must be sorted ascending by `x` and the first entry's
    /// `x` must equal that row's `min_x` (checked against `tiles`).
    pub fn from_compact_rows(
        tiles: &TileData,
        rows: Vec<Vec<(i16, u32)>>,
    ) -> Result<Self, ConfigError> {
        let min_y = tiles.min_y();
        let mut built = Vec::with_capacity(rows.len());

        for (row_idx, entries) in rows.into_iter().enumerate() {
            let y = min_y + row_idx as i16;
            if entries.is_empty() {
                return Err(ConfigError::MalformedBlob(format!("region row {y} has no entries")));
            }
            let expected_min_x = tiles
                .min_x_for_row(y)
                .ok_or_else(|| ConfigError::MalformedBlob(format!("region row {y} is outside the map")))?;
            if entries[0].0 != expected_min_x {
                return Err(ConfigError::MalformedBlob(format!(
                    "region row {y} does not start at the row's min_x"
                )));
            }
            if !entries.windows(2).all(|w| w[0].0 < w[1].0) {
                return Err(ConfigError::MalformedBlob(format!("region row {y} x-coordinates are not strictly ascending")));
            }

            let (xs, ids): (Vec<i16>, Vec<RegionId>) =
                entries.into_iter().map(|(x, id)| (x, RegionId::new(id))).unzip();
            built.push(Row { xs, ids });
        }

        Ok(RegionMap { min_y, rows: built })
    }

    /// Builds a `RegionMap` directly from a dense, one-id-per-tile
    /// assignment by run-length-encoding it per row. Convenient for tests
    /// and for the offline preprocessor.
    pub fn from_dense(tiles: &TileData, mut region_id: impl FnMut(i16, i16) -> u32) -> Result<Self, ConfigError> {
        let mut rows = Vec::new();
        for y in tiles.min_y()..=tiles.max_y() {
            let (lo, hi) = match (tiles.min_x_for_row(y), tiles.max_x_for_row(y)) {
                (Some(lo), Some(hi)) => (lo, hi),
                _ => continue,
            };
            let mut entries = Vec::new();
            let mut current: Option<(i16, u32)> = None;
            for x in lo..=hi {
                let id = region_id(x, y);
                match current {
                    Some((_, cur_id)) if cur_id == id => {}
                    _ => {
                        entries.push((x, id));
                        current = Some((x, id));
                    }
                }
            }
            rows.push(entries);
        }
        Self::from_compact_rows(tiles, rows)
    }

    /// Looks up the region ID for `c`. Precondition: `c` is on the map.
    pub fn region_id(&self, c: HexCoord) -> RegionId {
        let row_idx = (c.y() - self.min_y) as usize;
        let row = self
            .rows
            .get(row_idx)
            .unwrap_or_else(|| panic!("region_id: {c:?} is off the map"));
        // Greatest entry with x <= c.x(): upper_bound then step back one.
        let idx = row.xs.partition_point(|&x| x <= c.x());
        assert!(idx > 0, "region_id: {c:?} is before the row's first run");
        row.ids[idx - 1]
    }

    /// All tiles sharing `c`'s region ID, found by flood fill over the
    /// hex-neighbour graph restricted to tiles on the map with that ID.
    /// Precondition: `c` is on the map.
    pub fn region_shape(&self, tiles: &TileData, c: HexCoord) -> HashSet<HexCoord> {
        assert!(tiles.is_on_map(c), "region_shape: {c:?} is off the map");
        let id = self.region_id(c);

        let mut shape = HashSet::new();
        let mut queue = VecDeque::new();
        shape.insert(c);
        queue.push_back(c);

        while let Some(cur) = queue.pop_front() {
            for n in cur.neighbours() {
                if shape.contains(&n) || !tiles.is_on_map(n) {
                    continue;
                }
                if self.region_id(n) == id {
                    shape.insert(n);
                    queue.push_back(n);
                }
            }
        }

        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_map() -> (TileData, RegionMap) {
        // 4x4 square map, left half region 1, right half region 2.
        let tiles = TileData::from_passability(0, 3, |_y| (0, 3), |_x, _y| true);
        let regions = RegionMap::from_dense(&tiles, |x, _y| if x < 2 { 1 } else { 2 }).unwrap();
        (tiles, regions)
    }

    #[test]
    fn lookup_matches_dense_assignment() {
        let (_tiles, regions) = split_map();
        assert_eq!(regions.region_id(HexCoord::new(0, 0)).value(), 1);
        assert_eq!(regions.region_id(HexCoord::new(3, 0)).value(), 2);
    }

    #[test]
    fn region_shape_is_connected_and_uniform() {
        let (tiles, regions) = split_map();
        let shape = regions.region_shape(&tiles, HexCoord::new(0, 0));
        assert_eq!(shape.len(), 8); // 2 columns x 4 rows
        for c in &shape {
            assert_eq!(regions.region_id(*c), RegionId::new(1));
        }
    }
}
