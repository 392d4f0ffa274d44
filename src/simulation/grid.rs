//! # Uniform spatial grid (2D broad phase)
//!
//! Buckets bodies into square cells so collision candidates only come from
//! the 3x3 block of cells around each occupied cell, instead of from every
//! other body.
//!
//! ## Layout
//!
//! - Cell side is `ceil(2 * max_radius)` over all bodies, so any two
//!   overlapping bodies always land in the same or in adjacent cells.
//! - Cell coordinates are `floor((position - origin) / cell_size)`, with the
//!   origin at the top-left corner of the bounding circle's square. Bodies
//!   outside that square just get negative or large indices.
//! - Storage is sparse: a hash map from [`CellKey`] to a bucket index, and a
//!   pool of buckets that is cleared but kept allocated between rebuilds.
//! - Occupied cells iterate in first-insertion order, so the sweep is
//!   deterministic for a given body order.
//!
//! ## Staleness
//!
//! The solver rebuilds the grid once per frame, not once per substep. Bodies
//! drift during the substeps without being re-bucketed; collisions are found
//! from the frame-start layout.

use std::collections::HashMap;

use crate::simulation::states::{Body, NVec2};

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This cell and its 8 neighbours, x-offset outer, y-offset inner.
    /// Neighbours past the `i32` range are skipped.
    pub fn block(self) -> impl Iterator<Item = CellKey> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter_map(move |dy| Some(CellKey::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?)))
        })
    }
}

/// Smallest and largest radius seen while building the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRange {
    pub min: f64,
    pub max: f64,
}

/// Cell side for a given largest radius, never below 1
pub fn cell_size_for(max_radius: f64) -> f64 {
    (2.0 * max_radius).ceil().max(1.0)
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    origin: NVec2,
    lookup: HashMap<CellKey, usize>, // cell -> bucket index
    keys: Vec<CellKey>,              // keys[i] owns buckets[i]
    buckets: Vec<Vec<usize>>,        // pooled; only the first `occupied` are live
    occupied: usize,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 1.0,
            origin: NVec2::zeros(),
            lookup: HashMap::new(),
            keys: Vec::new(),
            buckets: Vec::new(),
            occupied: 0,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn origin(&self) -> NVec2 {
        self.origin
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Forget all cells, keep bucket allocations
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets[..self.occupied] {
            bucket.clear();
        }
        self.lookup.clear();
        self.keys.clear();
        self.occupied = 0;
    }

    /// Rebuild from `(index, body)` pairs anchored at `origin`.
    ///
    /// Two passes: the first finds the radius range (and with it the cell
    /// size), the second buckets every index. Returns `None` and leaves the
    /// grid empty when there are no bodies.
    pub fn rebuild<'a, I>(&mut self, origin: NVec2, bodies: I) -> Option<RadiusRange>
    where
        I: Iterator<Item = (usize, &'a Body)> + Clone,
    {
        self.clear();

        let range = bodies.clone().fold(None, |acc: Option<RadiusRange>, (_, b)| {
            let r = b.radius();
            Some(match acc {
                None => RadiusRange { min: r, max: r },
                Some(RadiusRange { min, max }) => RadiusRange { min: min.min(r), max: max.max(r) },
            })
        })?;

        self.origin = origin;
        self.cell_size = cell_size_for(range.max);

        for (index, b) in bodies {
            let cell = self.cell_of(b.position());
            self.insert(cell, index);
        }

        Some(range)
    }

    /// Cell containing `position` under the current origin and cell size.
    /// Far-off positions saturate to the edge of the `i32` range.
    pub fn cell_of(&self, position: NVec2) -> CellKey {
        let local = (position - self.origin) / self.cell_size;
        CellKey::new(local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Indices bucketed in `cell`; empty for unoccupied cells
    pub fn bucket(&self, cell: CellKey) -> &[usize] {
        match self.lookup.get(&cell) {
            Some(&b) => self.buckets[b].as_slice(),
            None => &[],
        }
    }

    /// Union of the 3x3 block of cells centred on `cell`
    pub fn neighbors_of(&self, cell: CellKey) -> impl Iterator<Item = usize> + '_ {
        cell.block().flat_map(move |k| self.bucket(k).iter().copied())
    }

    /// Occupied cells with their contents, in first-insertion order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellKey, &[usize])> + '_ {
        self.keys
            .iter()
            .zip(self.buckets.iter())
            .map(|(k, b)| (*k, b.as_slice()))
    }

    /// Every ordered candidate pair `(i, j)`, `i != j`, the 3x3 sweep yields:
    /// for each occupied cell, each neighbour cell, each body of the cell
    /// against each body of the neighbour. An unordered pair therefore shows
    /// up once from each side.
    pub fn for_each_candidate_pair<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize),
    {
        for (cell, bucket) in self.occupied_cells() {
            for neighbor in cell.block() {
                let Some(&nb) = self.lookup.get(&neighbor) else {
                    continue;
                };
                let others = &self.buckets[nb];
                for &i in bucket {
                    for &j in others {
                        if i != j {
                            f(i, j);
                        }
                    }
                }
            }
        }
    }

    fn insert(&mut self, cell: CellKey, index: usize) {
        let slot = match self.lookup.get(&cell) {
            Some(&b) => b,
            None => {
                let b = self.occupied;
                if b == self.buckets.len() {
                    self.buckets.push(Vec::new());
                }
                self.lookup.insert(cell, b);
                self.keys.push(cell);
                self.occupied += 1;
                b
            }
        };
        self.buckets[slot].push(index);
    }
}
