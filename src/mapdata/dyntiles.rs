//! Dense map over every tile of the world, bucketed so that storage is
//! only allocated for the parts of the map actually mutated.

use crate::hex::HexCoord;
use crate::mapdata::tiledata::TileData;

/// Tiles per lazily-materialised bucket.
const BUCKET_SIZE: usize = 1 << 16;

/// Logical dense array of length `tile_data.num_tiles()`, indexed through
/// `TileData::tile_ordinal`. Physically a fixed array of buckets, each
/// materialised only on first mutation and initialised to `default` at that
/// point. Reading an unmaterialised bucket returns `default` without
/// allocating.
pub struct DynTiles<'a, T> {
    tiles: &'a TileData,
    default: T,
    buckets: Vec<Option<Box<[T]>>>,
}

impl<'a, T: Copy> DynTiles<'a, T> {
    pub fn new(tiles: &'a TileData, default: T) -> Self {
        let num_buckets = tiles.num_tiles().div_ceil(BUCKET_SIZE).max(1);
        DynTiles {
            tiles,
            default,
            buckets: (0..num_buckets).map(|_| None).collect(),
        }
    }

    fn bucket_and_offset(&self, ordinal: usize) -> (usize, usize) {
        (ordinal / BUCKET_SIZE, ordinal % BUCKET_SIZE)
    }

    /// Read-only access. `c` must be on the map.
    pub fn get(&self, c: HexCoord) -> T {
        let ordinal = self.tiles.tile_ordinal(c);
        let (bucket, offset) = self.bucket_and_offset(ordinal);
        match &self.buckets[bucket] {
            Some(b) => b[offset],
            None => self.default,
        }
    }

    /// Mutable access, materialising the covering bucket if necessary. `c`
    /// must be on the map.
    pub fn access(&mut self, c: HexCoord) -> &mut T {
        let ordinal = self.tiles.tile_ordinal(c);
        let (bucket, offset) = self.bucket_and_offset(ordinal);
        let default = self.default;
        let slot = self.buckets[bucket].get_or_insert_with(|| vec![default; BUCKET_SIZE].into_boxed_slice());
        &mut slot[offset]
    }

    pub fn set(&mut self, c: HexCoord, value: T) {
        *self.access(c) = value;
    }
}

/// Specialisation of `DynTiles` for `bool`, storing one bit per tile instead
/// of one byte. Preserves the same `get`/`set` API.
pub struct BoolDynTiles<'a> {
    tiles: &'a TileData,
    default: bool,
    /// One bucket of packed bits per `BUCKET_SIZE` tiles; `None` means every
    /// tile in that bucket is still at `default`.
    buckets: Vec<Option<Box<[u8]>>>,
}

const BUCKET_BYTES: usize = BUCKET_SIZE / 8;

impl<'a> BoolDynTiles<'a> {
    pub fn new(tiles: &'a TileData, default: bool) -> Self {
        let num_buckets = tiles.num_tiles().div_ceil(BUCKET_SIZE).max(1);
        BoolDynTiles {
            tiles,
            default,
            buckets: (0..num_buckets).map(|_| None).collect(),
        }
    }

    fn bucket_and_offset(&self, ordinal: usize) -> (usize, usize) {
        (ordinal / BUCKET_SIZE, ordinal % BUCKET_SIZE)
    }

    pub fn get(&self, c: HexCoord) -> bool {
        let ordinal = self.tiles.tile_ordinal(c);
        let (bucket, offset) = self.bucket_and_offset(ordinal);
        match &self.buckets[bucket] {
            Some(bits) => (bits[offset / 8] >> (offset % 8)) & 1 != 0,
            None => self.default,
        }
    }

    pub fn set(&mut self, c: HexCoord, value: bool) {
        let ordinal = self.tiles.tile_ordinal(c);
        let (bucket, offset) = self.bucket_and_offset(ordinal);
        let fill = if self.default { 0xFFu8 } else { 0x00u8 };
        let bits = self.buckets[bucket].get_or_insert_with(|| vec![fill; BUCKET_BYTES].into_boxed_slice());
        if value {
            bits[offset / 8] |= 1 << (offset % 8);
        } else {
            bits[offset / 8] &= !(1 << (offset % 8));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_tiles() -> TileData {
        TileData::from_passability(0, 3, |_y| (0, 3), |_x, _y| true)
    }

    #[test]
    fn get_on_unmaterialised_bucket_is_default() {
        let tiles = test_tiles();
        let map: DynTiles<u32> = DynTiles::new(&tiles, 7);
        assert_eq!(map.get(HexCoord::new(2, 2)), 7);
    }

    #[test]
    fn access_materialises_and_preserves_other_tiles() {
        let tiles = test_tiles();
        let mut map: DynTiles<u32> = DynTiles::new(&tiles, 0);
        map.set(HexCoord::new(1, 1), 99);
        assert_eq!(map.get(HexCoord::new(1, 1)), 99);
        assert_eq!(map.get(HexCoord::new(0, 0)), 0);
    }

    #[test]
    fn bool_specialisation_round_trips() {
        let tiles = test_tiles();
        let mut map = BoolDynTiles::new(&tiles, false);
        assert!(!map.get(HexCoord::new(2, 0)));
        map.set(HexCoord::new(2, 0), true);
        assert!(map.get(HexCoord::new(2, 0)));
        map.set(HexCoord::new(2, 0), false);
        assert!(!map.get(HexCoord::new(2, 0)));
    }

    #[test]
    fn bool_specialisation_honours_default_true() {
        let tiles = test_tiles();
        let map = BoolDynTiles::new(&tiles, true);
        assert!(map.get(HexCoord::new(0, 0)));
    }
}
