//! # Seam Continuity Integration Test
//!
//! Proves neighbouring tiles meet exactly once moved to world space.

use std::collections::HashMap;

use cavern_core::{Grid, Vec3};
use cavern_mesh::{EdgePolicy, Tile, TileCoord, Tiler};
use cavern_procedural::{CarveParameters, CaveCarver};

fn carved(width: usize, height: usize, seed: i64) -> Grid {
    let params = CarveParameters::new(width, height)
        .with_border(3)
        .with_target_length((width * height / 6) as i64)
        .with_seed(seed);
    CaveCarver::new(params).unwrap().carve().unwrap()
}

fn by_coord(tiles: Vec<Tile>) -> HashMap<TileCoord, Tile> {
    tiles.into_iter().map(|t| (t.coord, t)).collect()
}

fn assert_seams(grid: &Grid, tiler: &Tiler, origin: Vec3) {
    let tiles = by_coord(tiler.tile(grid).unwrap());
    let mut shared_edges = 0;

    for (coord, tile) in &tiles {
        let world = tile.world_mesh(origin);
        let (w, h) = tile.size;

        // Right neighbour shares our last column.
        if let Some(right) = tiles.get(&TileCoord::new(coord.x + 1, coord.y)) {
            let right_world = right.world_mesh(origin);
            let rw = right.size.0;
            for y in 0..h.min(right.size.1) {
                assert_eq!(
                    world.vertices[y * w + (w - 1)],
                    right_world.vertices[y * rw],
                    "seam between {coord} and {} at row {y}",
                    right.coord
                );
            }
            shared_edges += 1;
        }

        // Upper neighbour shares our last row.
        if let Some(up) = tiles.get(&TileCoord::new(coord.x, coord.y + 1)) {
            let up_world = up.world_mesh(origin);
            for x in 0..w.min(up.size.0) {
                assert_eq!(
                    world.vertices[(h - 1) * w + x],
                    up_world.vertices[x],
                    "seam between {coord} and {} at column {x}",
                    up.coord
                );
            }
            shared_edges += 1;
        }
    }

    assert!(shared_edges > 0, "no adjacent tiles to compare");
}

/// Test: Shared vertices coincide under the default clamp policy.
#[test]
fn test_seams_clamp() {
    let grid = carved(64, 48, 77);
    let tiler = Tiler::new(16, 1.0).unwrap();
    assert_seams(&grid, &tiler, Vec3::ZERO);
}

/// Test: Shared vertices coincide with trimmed edge tiles, scale and origin.
#[test]
fn test_seams_trim_scaled() {
    let grid = carved(50, 37, 5);
    let tiler = Tiler::new(9, 2.0).unwrap().with_policy(EdgePolicy::Trim);
    assert_seams(&grid, &tiler, Vec3::new(-10.0, 4.0, 3.0));
}

/// Test: Cells on a shared edge carry the same occupancy in both tiles.
#[test]
fn test_shared_cells_agree() {
    let grid = carved(40, 40, 1234);
    let tiler = Tiler::new(8, 1.0).unwrap();

    for coord in tiler.coords(&grid) {
        let sub = tiler.extract(&grid, coord).unwrap();
        let next = TileCoord::new(coord.x + 1, coord.y);
        if !tiler.coords(&grid).contains(&next) {
            continue;
        }
        let right = tiler.extract(&grid, next).unwrap();
        for y in 0..8 {
            assert_eq!(sub.get(7, y).unwrap(), right.get(0, y).unwrap());
        }
    }
}

/// Test: Every tile mesh respects the buffer invariants.
#[test]
fn test_all_tiles_valid() {
    let grid = carved(64, 64, 420);
    for policy in [EdgePolicy::Clamp, EdgePolicy::Trim] {
        let tiler = Tiler::new(16, 1.0).unwrap().with_policy(policy);
        for tile in tiler.tile(&grid).unwrap() {
            let (w, h) = tile.size;
            assert!(tile.mesh.validate().is_ok(), "{policy} {}", tile.coord);
            assert_eq!(tile.mesh.vertex_count(), w * h);
            for uv in &tile.mesh.uvs {
                assert!((0.0..1.0).contains(&uv.x) && (0.0..1.0).contains(&uv.y));
            }
        }
    }
}
