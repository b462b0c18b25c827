//! Uniform grid over a point set, with cells of side `eps`.
//!
//! The grid does not own points: it borrows the shared point slice and
//! stores indices into it, one flat map keyed by the packed cell coordinate.
//!
//! # Memory Layout
//!
//! ```text
//! GridIndex
//! ├─ points: &[Poi]            shared, owned by the caller
//! ├─ cells: FxHashMap<CellKey, Vec<usize>>
//! │  ├─ (0, 0)  -> [0, 1, 2]
//! │  ├─ (0, -1) -> [4]
//! │  └─ (5, 5)  -> [3]
//! └─ order: [(0, 0), (5, 5), (0, -1)]   first-seen order of the cells
//! ```
//!
//! The origin is the first point of the slice, so cell coordinates (and the
//! iteration order of [`GridIndex::cells`]) depend on input order.

use crate::error::{LociError, Result};
use crate::spatial::{covers, expand_by};
use geo::{Coord, Rect, coord};
use loci_types::point::Poi;
use rustc_hash::FxHashMap;

/// Packed `(i, j)` cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    pub fn new(i: i32, j: i32) -> Self {
        CellKey(((i as u32 as u64) << 32) | (j as u32 as u64))
    }

    pub fn i(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub fn j(self) -> i32 {
        self.0 as u32 as i32
    }

    /// This cell and its 8 neighbors, row-major from `(i-1, j-1)`.
    ///
    /// Neighbors past the `i32` range are left out.
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        let (i, j) = (self.i(), self.j());
        (-1..=1).flat_map(move |di| {
            (-1..=1).filter_map(move |dj| {
                let ni = i.checked_add(di)?;
                let nj = j.checked_add(dj)?;
                Some(CellKey::new(ni, nj))
            })
        })
    }
}

fn cell_key(x: f64, y: f64, offset: Coord<f64>, eps: f64) -> Result<CellKey> {
    Ok(CellKey::new(
        axis_index(x, offset.x, eps)?,
        axis_index(y, offset.y, eps)?,
    ))
}

fn axis_index(value: f64, offset: f64, eps: f64) -> Result<i32> {
    let index = ((value - offset) / eps).floor();
    if !index.is_finite() || index < i32::MIN as f64 || index > i32::MAX as f64 {
        return Err(LociError::InvalidInput(format!(
            "coordinate {} is out of grid range for eps {}",
            value, eps
        )));
    }
    Ok(index as i32)
}

/// Grid index over a borrowed point slice.
#[derive(Debug)]
pub struct GridIndex<'a> {
    points: &'a [Poi],
    eps: f64,
    offset: Coord<f64>,
    cells: FxHashMap<CellKey, Vec<usize>>,
    order: Vec<CellKey>,
    bounds: Rect,
    max_cell_size: usize,
}

impl<'a> GridIndex<'a> {
    /// Assign every point to its cell.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `points` is empty, a coordinate is not finite, or a
    ///   cell coordinate does not fit in `i32`
    /// - `InvalidParameter` if `eps` is not a positive finite number
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loci::grid::GridIndex;
    /// use loci::Poi;
    ///
    /// let points = vec![
    ///     Poi::new("a", 0.0, 0.0),
    ///     Poi::new("b", 0.5, 0.5),
    ///     Poi::new("c", 9.0, 9.0),
    /// ];
    /// let grid = GridIndex::build(&points, 1.0).unwrap();
    ///
    /// assert_eq!(grid.cell_count(), 2);
    /// assert_eq!(grid.neighbors(0), vec![1]);
    /// ```
    pub fn build(points: &'a [Poi], eps: f64) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(LociError::InvalidInput(
                "cannot index an empty point set".to_string(),
            ));
        };
        if !eps.is_finite() || eps <= 0.0 {
            return Err(LociError::InvalidParameter(format!(
                "eps must be a positive number, got {}",
                eps
            )));
        }

        let offset = coord! { x: first.x(), y: first.y() };
        let mut cells: FxHashMap<CellKey, Vec<usize>> = FxHashMap::default();
        let mut order = Vec::new();
        let mut max_cell_size = 0;

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

        for (idx, poi) in points.iter().enumerate() {
            let key = cell_key(poi.x(), poi.y(), offset, eps).map_err(|e| {
                LociError::InvalidInput(format!("point '{}' at index {}: {}", poi.id(), idx, e))
            })?;

            let cell = cells.entry(key).or_default();
            if cell.is_empty() {
                order.push(key);
            }
            cell.push(idx);
            max_cell_size = max_cell_size.max(cell.len());

            min_x = min_x.min(poi.x());
            min_y = min_y.min(poi.y());
            max_x = max_x.max(poi.x());
            max_y = max_y.max(poi.y());
        }

        let grid = Self {
            points,
            eps,
            offset,
            cells,
            order,
            bounds: Rect::new(
                coord! { x: min_x, y: min_y },
                coord! { x: max_x, y: max_y },
            ),
            max_cell_size,
        };

        log::debug!(
            "Grid built: {} points, {} cells, max {} points per cell, bounds {:?}",
            points.len(),
            grid.cells.len(),
            grid.max_cell_size,
            grid.bounds
        );

        Ok(grid)
    }

    /// Cell containing `(x, y)`.
    pub fn cell_of(&self, x: f64, y: f64) -> Result<CellKey> {
        cell_key(x, y, self.offset, self.eps)
    }

    /// All points, other than `index` itself, within `eps` of it on both axes.
    ///
    /// Points sharing the id of `index` are excluded as well.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let Some(poi) = self.points.get(index) else {
            return Vec::new();
        };
        let Ok(key) = self.cell_of(poi.x(), poi.y()) else {
            return Vec::new();
        };

        let mut neighbors = Vec::new();
        for cell in key.neighborhood() {
            for &other_idx in self.cell(cell) {
                let other = &self.points[other_idx];
                if other.id() != poi.id()
                    && (poi.x() - other.x()).abs() <= self.eps
                    && (poi.y() - other.y()).abs() <= self.eps
                {
                    neighbors.push(other_idx);
                }
            }
        }
        neighbors
    }

    /// The `eps x eps` square of a cell.
    pub fn cell_footprint(&self, key: CellKey) -> Rect {
        let min_x = key.i() as f64 * self.eps + self.offset.x;
        let min_y = key.j() as f64 * self.eps + self.offset.y;
        Rect::new(
            coord! { x: min_x, y: min_y },
            coord! { x: min_x + self.eps, y: min_y + self.eps },
        )
    }

    /// Points of the cell and its 8 neighbors lying in the cell footprint
    /// grown by `margin` on every side.
    pub fn points_near_cell(&self, key: CellKey, margin: f64) -> Vec<usize> {
        let boundary = expand_by(&self.cell_footprint(key), margin);
        key.neighborhood()
            .flat_map(|cell| self.cell(cell).iter().copied())
            .filter(|&idx| covers(&boundary, self.points[idx].point()))
            .collect()
    }

    /// Indices of the points in one cell, empty if the cell is unoccupied.
    pub fn cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupied cells in first-seen order.
    pub fn cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.order.iter().copied()
    }

    pub fn points(&self) -> &'a [Poi] {
        self.points
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn offset(&self) -> Coord<f64> {
        self.offset
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Largest number of points in a single cell.
    pub fn max_cell_size(&self) -> usize {
        self.max_cell_size
    }

    /// Bounding box of all points.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}
