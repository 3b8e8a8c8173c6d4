//! Immutable, bit-packed descriptors of map extent and passability.
//!
//! `TileData` is produced offline by a preprocessor (see
//! `src/bin/bake_mapdata.rs`) and loaded once at process start from the
//! baked obstacle blob described in `spec.md` section 6: one packed,
//! little-endian bit vector per row (bit set iff the tile is passable).

use crate::error::ConfigError;
use crate::hex::HexCoord;

/// Immutable map extent + passability, derived from baked input.
pub struct TileData {
    min_y: i16,
    max_y: i16,
    /// Inclusive column extent per row, indexed by `y - min_y`.
    min_x: Vec<i16>,
    max_x: Vec<i16>,
    /// Ordinal offset of the first tile of each row into a dense,
    /// row-major tile indexing used by `DynTiles`/`RangeMap`-adjacent code.
    offset_for_y: Vec<usize>,
    /// Packed little-endian bit vector per row; bit set iff passable.
    obstacle_bits: Vec<Vec<u8>>,
    num_tiles: usize,
}

impl TileData {
    /// Builds `TileData` from already-decoded per-row extents and a
    /// passability predicate. Used by the preprocessor binary (after
    /// decoding the raw input format) and directly by tests that want a
    /// small synthetic map without round-tripping through the baked blob
    /// format.
    pub fn from_passability<F>(min_y: i16, max_y: i16, row_extent: F, mut passable: impl FnMut(i16, i16) -> bool) -> Self
    where
        F: Fn(i16) -> (i16, i16),
    {
        assert!(max_y >= min_y, "TileData requires max_y >= min_y");

        let rows = (max_y - min_y + 1) as usize;
        let mut min_x = Vec::with_capacity(rows);
        let mut max_x = Vec::with_capacity(rows);
        let mut offset_for_y = Vec::with_capacity(rows);
        let mut obstacle_bits = Vec::with_capacity(rows);
        let mut offset = 0usize;

        for row in 0..rows {
            let y = min_y + row as i16;
            let (lo, hi) = row_extent(y);
            assert!(hi >= lo, "row {y} has empty extent");
            let width = (hi - lo + 1) as usize;

            let mut bytes = vec![0u8; width.div_ceil(8)];
            for (i, x) in (lo..=hi).enumerate() {
                if passable(x, y) {
                    bytes[i / 8] |= 1 << (i % 8);
                }
            }

            min_x.push(lo);
            max_x.push(hi);
            offset_for_y.push(offset);
            offset += width;
            obstacle_bits.push(bytes);
        }

        TileData {
            min_y,
            max_y,
            min_x,
            max_x,
            offset_for_y,
            obstacle_bits,
            num_tiles: offset,
        }
    }

    /// Builds `TileData` from the baked blob representation: a flat packed
    /// obstacle bit vector plus the generated per-row constants. This is the
    /// format `bin/bake_mapdata.rs` emits and the runtime loads.
    pub fn from_baked(
        min_y: i16,
        max_y: i16,
        min_x: Vec<i16>,
        max_x: Vec<i16>,
        bit_data: &[u8],
        bit_data_offset_for_y: &[usize],
    ) -> Result<Self, ConfigError> {
        let rows = (max_y - min_y + 1) as usize;
        if min_x.len() != rows || max_x.len() != rows || bit_data_offset_for_y.len() != rows {
            return Err(ConfigError::MalformedBlob(
                "row extent arrays do not match min_y/max_y range".to_string(),
            ));
        }

        let mut offset_for_y = Vec::with_capacity(rows);
        let mut obstacle_bits = Vec::with_capacity(rows);
        let mut offset = 0usize;

        for row in 0..rows {
            let width = (max_x[row] - min_x[row] + 1) as usize;
            let byte_len = width.div_ceil(8);
            let start = bit_data_offset_for_y[row];
            let end = start + byte_len;
            let row_bytes = bit_data
                .get(start..end)
                .ok_or_else(|| ConfigError::MalformedBlob(format!("row {row} bit data out of range")))?;

            offset_for_y.push(offset);
            offset += width;
            obstacle_bits.push(row_bytes.to_vec());
        }

        Ok(TileData {
            min_y,
            max_y,
            min_x,
            max_x,
            offset_for_y,
            obstacle_bits,
            num_tiles: offset,
        })
    }

    #[inline]
    pub fn min_y(&self) -> i16 {
        self.min_y
    }

    #[inline]
    pub fn max_y(&self) -> i16 {
        self.max_y
    }

    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    #[inline]
    fn row_index(&self, y: i16) -> Option<usize> {
        if y < self.min_y || y > self.max_y {
            None
        } else {
            Some((y - self.min_y) as usize)
        }
    }

    pub fn is_on_map(&self, c: HexCoord) -> bool {
        match self.row_index(c.y()) {
            Some(row) => c.x() >= self.min_x[row] && c.x() <= self.max_x[row],
            None => false,
        }
    }

    pub fn is_passable(&self, c: HexCoord) -> bool {
        let Some(row) = self.row_index(c.y()) else {
            return false;
        };
        if c.x() < self.min_x[row] || c.x() > self.max_x[row] {
            return false;
        }
        let col = (c.x() - self.min_x[row]) as usize;
        let byte = self.obstacle_bits[row][col / 8];
        (byte >> (col % 8)) & 1 != 0
    }

    pub fn min_x_for_row(&self, y: i16) -> Option<i16> {
        self.row_index(y).map(|row| self.min_x[row])
    }

    pub fn max_x_for_row(&self, y: i16) -> Option<i16> {
        self.row_index(y).map(|row| self.max_x[row])
    }

    /// Dense, row-major ordinal for `c`, used to index `DynTiles`. `c` must
    /// be on the map -- this is a precondition, not a recoverable error.
    pub fn tile_ordinal(&self, c: HexCoord) -> usize {
        let row = self
            .row_index(c.y())
            .unwrap_or_else(|| panic!("tile_ordinal: {c:?} is off the map (row)"));
        assert!(
            c.x() >= self.min_x[row] && c.x() <= self.max_x[row],
            "tile_ordinal: {c:?} is off the map (column)"
        );
        self.offset_for_y[row] + (c.x() - self.min_x[row]) as usize
    }
}
