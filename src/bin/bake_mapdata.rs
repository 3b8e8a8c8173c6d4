//! Offline preprocessor: reads the raw obstacle/region input format
//! described in `spec.md` section 6 and emits the baked blobs the runtime
//! loads via `TileData::from_baked` / `RegionMap::from_compact_rows`.
//!
//! Raw input format (little-endian, both files): a 16-bit row count N, a
//! 16-bit column count M, then N*M records. Obstacle records are
//! `{int16 x, int16 y, int16 passable}`; region records are
//! `{int16 x, int16 y, int32 region_id}`.

use byteorder::{LittleEndian, ReadBytesExt};
use clap::Parser;
use hexmap_core::error::ConfigError;
use log::info;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Bakes raw obstacle/region input into the runtime's map blobs")]
struct Args {
    /// Raw obstacle input file ({x, y, passable} records).
    obstacle_input: PathBuf,
    /// Raw region input file ({x, y, region_id} records).
    region_input: PathBuf,
    /// Directory to write the baked blobs and sidecar metadata into.
    output_dir: PathBuf,
}

/// Generated constants accompanying the baked blobs, serialised alongside
/// them so the runtime can reconstruct `TileData`/`RegionMap` without
/// re-deriving row extents.
#[derive(serde::Serialize)]
struct BakedMetadata {
    min_y: i16,
    max_y: i16,
    min_x: Vec<i16>,
    max_x: Vec<i16>,
    bit_data_offset_for_y: Vec<usize>,
    bit_data_size: usize,
    region_id_offset_for_y: Vec<usize>,
    region_map_size: usize,
    bytes_per_id: usize,
    compact_offset_for_y: Vec<usize>,
    compact_entries: usize,
}

fn read_raw_records<T>(
    path: &std::path::Path,
    mut read_value: impl FnMut(&mut BufReader<File>) -> std::io::Result<T>,
) -> Result<BTreeMap<(i16, i16), T>, ConfigError> {
    let mut reader = BufReader::new(File::open(path)?);
    let rows = reader.read_u16::<LittleEndian>()?;
    let cols = reader.read_u16::<LittleEndian>()?;
    let count = rows as usize * cols as usize;

    let mut records = BTreeMap::new();
    for _ in 0..count {
        let x = reader.read_i16::<LittleEndian>()?;
        let y = reader.read_i16::<LittleEndian>()?;
        let value = read_value(&mut reader)?;
        records.insert((x, y), value);
    }
    Ok(records)
}

fn row_extents(keys: impl Iterator<Item = (i16, i16)>) -> Result<(i16, i16, BTreeMap<i16, (i16, i16)>), ConfigError> {
    let mut per_row: BTreeMap<i16, (i16, i16)> = BTreeMap::new();
    for (x, y) in keys {
        per_row
            .entry(y)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(x);
                *hi = (*hi).max(x);
            })
            .or_insert((x, x));
    }
    let min_y = *per_row
        .keys()
        .next()
        .ok_or_else(|| ConfigError::MalformedBlob("obstacle input has no records".to_string()))?;
    let max_y = *per_row.keys().next_back().unwrap();
    Ok((min_y, max_y, per_row))
}

struct BakedObstacles {
    bit_data: Vec<u8>,
    min_y: i16,
    max_y: i16,
    min_x: Vec<i16>,
    max_x: Vec<i16>,
    bit_data_offset_for_y: Vec<usize>,
}

fn bake_obstacles(records: &BTreeMap<(i16, i16), bool>) -> Result<BakedObstacles, ConfigError> {
    let (min_y, max_y, extents) = row_extents(records.keys().copied())?;

    let mut min_x = Vec::new();
    let mut max_x = Vec::new();
    let mut bit_data_offset_for_y = Vec::new();
    let mut bit_data = Vec::new();
    let mut offset = 0usize;

    for y in min_y..=max_y {
        let (lo, hi) = *extents
            .get(&y)
            .ok_or_else(|| ConfigError::MalformedBlob(format!("obstacle input row {y} has no records")))?;
        let width = (hi - lo + 1) as usize;
        let mut bytes = vec![0u8; width.div_ceil(8)];
        for (i, x) in (lo..=hi).enumerate() {
            let passable = *records.get(&(x, y)).unwrap_or(&false);
            if passable {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        min_x.push(lo);
        max_x.push(hi);
        bit_data_offset_for_y.push(offset);
        offset += bytes.len();
        bit_data.extend_from_slice(&bytes);
    }

    Ok(BakedObstacles {
        bit_data,
        min_y,
        max_y,
        min_x,
        max_x,
        bit_data_offset_for_y,
    })
}

fn write_int24_le(out: &mut Vec<u8>, value: u32) {
    assert!(value <= 0x00FF_FFFF, "region id does not fit in 24 bits");
    out.push((value & 0xFF) as u8);
    out.push(((value >> 8) & 0xFF) as u8);
    out.push(((value >> 16) & 0xFF) as u8);
}

struct BakedRegions {
    region_blob: Vec<u8>,
    region_id_offset_for_y: Vec<usize>,
    compact_xs: Vec<u8>,
    compact_ids: Vec<u8>,
    compact_offset_for_y: Vec<usize>,
    compact_entries: usize,
}

fn bake_regions(
    records: &BTreeMap<(i16, i16), u32>,
    min_y: i16,
    max_y: i16,
    min_x: &[i16],
    max_x: &[i16],
) -> Result<BakedRegions, ConfigError> {
    let mut region_blob = Vec::new();
    let mut region_id_offset_for_y = Vec::new();

    let mut compact_xs = Vec::new();
    let mut compact_ids = Vec::new();
    let mut compact_offset_for_y = Vec::new();
    let mut compact_entries = 0usize;

    for (row, y) in (min_y..=max_y).enumerate() {
        let lo = min_x[row];
        let hi = max_x[row];

        region_id_offset_for_y.push(region_blob.len());
        let mut last_id: Option<u32> = None;
        let mut row_entries = 0usize;

        for x in lo..=hi {
            let id = *records
                .get(&(x, y))
                .ok_or_else(|| ConfigError::MalformedBlob(format!("region input missing ({x}, {y})")))?;
            write_int24_le(&mut region_blob, id);

            if last_id != Some(id) {
                compact_xs.extend_from_slice(&x.to_le_bytes());
                write_int24_le(&mut compact_ids, id);
                last_id = Some(id);
                row_entries += 1;
            }
        }

        compact_offset_for_y.push(compact_entries);
        compact_entries += row_entries;
    }

    Ok(BakedRegions {
        region_blob,
        region_id_offset_for_y,
        compact_xs,
        compact_ids,
        compact_offset_for_y,
        compact_entries,
    })
}

fn run(args: Args) -> Result<(), ConfigError> {
    info!("reading obstacle input from {:?}", args.obstacle_input);
    let obstacle_records = read_raw_records(&args.obstacle_input, |r| Ok(r.read_i16::<LittleEndian>()? != 0))?;

    info!("reading region input from {:?}", args.region_input);
    let region_records = read_raw_records(&args.region_input, |r| r.read_i32::<LittleEndian>().map(|v| v as u32))?;

    let obstacles = bake_obstacles(&obstacle_records)?;
    let regions = bake_regions(&region_records, obstacles.min_y, obstacles.max_y, &obstacles.min_x, &obstacles.max_x)?;

    std::fs::create_dir_all(&args.output_dir)?;

    let mut obstacle_out = BufWriter::new(File::create(args.output_dir.join("obstacles.bin"))?);
    obstacle_out.write_all(&obstacles.bit_data)?;

    let mut region_out = BufWriter::new(File::create(args.output_dir.join("regions.bin"))?);
    region_out.write_all(&regions.region_blob)?;

    let mut compact_x_out = BufWriter::new(File::create(args.output_dir.join("compact_x.bin"))?);
    compact_x_out.write_all(&regions.compact_xs)?;

    let mut compact_id_out = BufWriter::new(File::create(args.output_dir.join("compact_ids.bin"))?);
    compact_id_out.write_all(&regions.compact_ids)?;

    let metadata = BakedMetadata {
        min_y: obstacles.min_y,
        max_y: obstacles.max_y,
        min_x: obstacles.min_x,
        max_x: obstacles.max_x,
        bit_data_size: obstacles.bit_data.len(),
        bit_data_offset_for_y: obstacles.bit_data_offset_for_y,
        region_map_size: regions.region_blob.len(),
        region_id_offset_for_y: regions.region_id_offset_for_y,
        bytes_per_id: 3,
        compact_entries: regions.compact_entries,
        compact_offset_for_y: regions.compact_offset_for_y,
    };
    let metadata_file = File::create(args.output_dir.join("metadata.json"))?;
    serde_json::to_writer_pretty(metadata_file, &metadata)?;

    info!(
        "baked {} rows, {} bytes of obstacle data, {} bytes of region data",
        metadata.max_y - metadata.min_y + 1,
        metadata.bit_data_size,
        metadata.region_map_size
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("bake-mapdata: {err}");
        std::process::exit(1);
    }
}
