//! Grid index: maps geographic points onto canonical tile cells
//!
//! A cell `(i, j)` covers latitudes `[i*w, (i+1)*w)` and longitudes
//! `[j*w, (j+1)*w)` for tile width `w`. The board interns cells so that two
//! points in the same tile resolve to the same `Rc<Cell>`.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{LatLng, latlng};

/// A grid tile, identified by its integer indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Chebyshev distance in tiles
    pub fn distance(&self, other: &Cell) -> u32 {
        self.i.abs_diff(other.i).max(self.j.abs_diff(other.j))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Geographic rectangle covered by a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    /// Lowest lat/lng corner (inclusive)
    pub south_west: LatLng,
    /// Highest lat/lng corner (exclusive)
    pub north_east: LatLng,
}

impl CellBounds {
    /// Half-open containment test
    pub fn contains(&self, point: LatLng) -> bool {
        point.x >= self.south_west.x
            && point.x < self.north_east.x
            && point.y >= self.south_west.y
            && point.y < self.north_east.y
    }

    pub fn center(&self) -> LatLng {
        (self.south_west + self.north_east) * 0.5
    }
}

/// Grid index with interned cells
#[derive(Debug, Clone)]
pub struct Board {
    tile_width: f64,
    known_cells: HashMap<(i32, i32), Rc<Cell>>,
}

impl Board {
    pub fn new(tile_width: f64) -> Self {
        Self {
            tile_width,
            known_cells: HashMap::new(),
        }
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Number of cells interned so far
    pub fn known_cells(&self) -> usize {
        self.known_cells.len()
    }

    fn canonical_cell(&mut self, i: i32, j: i32) -> Rc<Cell> {
        self.known_cells
            .entry((i, j))
            .or_insert_with(|| Rc::new(Cell::new(i, j)))
            .clone()
    }

    /// Cell containing `point`
    pub fn cell_for_point(&mut self, point: LatLng) -> Rc<Cell> {
        let i = (point.x / self.tile_width).floor() as i32;
        let j = (point.y / self.tile_width).floor() as i32;
        self.canonical_cell(i, j)
    }

    /// Rectangle covered by `cell`
    ///
    /// Edges are snapped so that `contains` agrees with `cell_for_point`
    /// exactly, including points that sit on a tile boundary.
    pub fn cell_bounds(&self, cell: &Cell) -> CellBounds {
        let w = self.tile_width;
        let (i, j) = (cell.i as f64, cell.j as f64);
        CellBounds {
            south_west: latlng(tile_edge(i, w), tile_edge(j, w)),
            north_east: latlng(tile_edge(i + 1.0, w), tile_edge(j + 1.0, w)),
        }
    }

    /// All cells in the `2r x 2r` square around the cell containing `point`
    ///
    /// Offsets run over `-radius..radius` on both axes, row-major. Indices
    /// saturate at the ends of the `i32` range.
    pub fn cells_near_point(&mut self, point: LatLng, radius: u32) -> Vec<Rc<Cell>> {
        let origin = self.cell_for_point(point);
        let r = radius.min(i32::MAX as u32) as i32;
        let mut cells = Vec::with_capacity((2 * r as usize).pow(2));
        for di in -r..r {
            for dj in -r..r {
                let (i, j) = (origin.i.saturating_add(di), origin.j.saturating_add(dj));
                cells.push(self.canonical_cell(i, j));
            }
        }
        cells
    }
}

/// Nudge budget for `tile_edge`; `k * w` is off by at most a couple of ulps
const MAX_EDGE_NUDGES: usize = 16;

/// Smallest `x` with `floor(x / w) >= k`
fn tile_edge(k: f64, w: f64) -> f64 {
    let mut x = k * w;
    if !x.is_finite() {
        return x;
    }
    for _ in 0..MAX_EDGE_NUDGES {
        if (x / w).floor() < k {
            x = next_up(x);
        } else if (next_down(x) / w).floor() >= k {
            x = next_down(x);
        } else {
            break;
        }
    }
    x
}

/// Next representable `f64` above `x`
fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Next representable `f64` below `x`
fn next_down(x: f64) -> f64 {
    -next_up(-x)
}
